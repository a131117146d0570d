//! Health check endpoint.

use actix_web::{HttpResponse, web};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub posts: Option<u64>,
    pub timestamp: String,
}

/// GET /api/health
///
/// Always answers 200; `posts` is null when the repository cannot be counted.
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let posts = match state.posts.count().await {
        Ok(count) => Some(count),
        Err(e) => {
            tracing::warn!("Health check could not count posts: {}", e);
            None
        }
    };

    HttpResponse::Ok().json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        posts,
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}
