//! JSON API over posts.

use actix_web::{HttpResponse, web};

use press_shared::{MessageResponse, PostResource};

use crate::middleware::auth::OptionalIdentity;
use crate::middleware::error::{AppResult, parse_post_id};
use crate::middleware::form::FormInput;
use crate::state::AppState;

/// GET /api/posts
pub async fn index(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts = state.posts.list().await?;
    Ok(HttpResponse::Ok().json(PostResource::collection(posts)))
}

/// GET /api/posts/{id}
pub async fn show(state: web::Data<AppState>, path: web::Path<String>) -> AppResult<HttpResponse> {
    let id = parse_post_id(&path)?;
    let post = state.posts.show(id).await?;
    Ok(HttpResponse::Ok().json(PostResource::from(post)))
}

/// POST /api/posts
pub async fn store(state: web::Data<AppState>, form: FormInput) -> AppResult<HttpResponse> {
    let post = state.posts.create(form.into_inner()).await?;
    Ok(HttpResponse::Created().json(PostResource::from(post)))
}

/// PATCH|PUT /api/posts/{id}
pub async fn update(
    state: web::Data<AppState>,
    path: web::Path<String>,
    form: FormInput,
) -> AppResult<HttpResponse> {
    let id = parse_post_id(&path)?;
    let post = state.posts.update(id, form.into_inner()).await?;
    Ok(HttpResponse::Ok().json(PostResource::from(post)))
}

/// DELETE /api/posts/{id} - requires a bearer token.
pub async fn destroy(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = parse_post_id(&path)?;
    state.posts.delete(identity.principal(), id).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::deleted()))
}
