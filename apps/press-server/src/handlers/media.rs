//! Serves stored uploads back from the storage disk.

use actix_web::http::header::{self, CacheControl, CacheDirective};
use actix_web::{HttpResponse, web};

use press_core::error::StorageError;

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /storage/{path}
pub async fn serve(state: web::Data<AppState>, path: web::Path<String>) -> AppResult<HttpResponse> {
    let path = path.into_inner();
    let bytes = state.storage.get(&path).await.map_err(|e| match e {
        StorageError::NotFound(_) | StorageError::InvalidPath(_) => {
            AppError::NotFound(format!("File {path} not found"))
        }
        StorageError::Io(e) => AppError::Internal(e.to_string()),
    })?;

    // Names are content hashes, so a path never changes meaning.
    Ok(HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, content_type(&path)))
        .insert_header(CacheControl(vec![
            CacheDirective::Public,
            CacheDirective::MaxAge(31_536_000),
        ]))
        .body(bytes))
}

fn content_type(path: &str) -> &'static str {
    let ext = path.rsplit_once('.').map(|(_, ext)| ext).unwrap_or_default();
    match ext {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}
