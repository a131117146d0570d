//! HTML pages over posts.
//!
//! Writes answer with an empty 200. Invalid submissions are sent back to the
//! referring page with the messages in a flash cookie.

use actix_web::{HttpRequest, HttpResponse, web};

use press_core::DomainError;

use crate::middleware::auth::OptionalIdentity;
use crate::middleware::error::parse_post_id;
use crate::middleware::form::FormInput;
use crate::state::AppState;
use crate::views::{self, IndexView, PageError, PageResult, ShowView};

const INDEX_PATH: &str = "/posts";

fn to_index(err: DomainError) -> PageError {
    PageError::from_domain(err, INDEX_PATH.to_string())
}

/// GET /posts
pub async fn index(req: HttpRequest, state: web::Data<AppState>) -> PageResult<HttpResponse> {
    let posts = state.posts.list().await.map_err(to_index)?;

    let view = IndexView {
        posts: &posts,
        errors: views::flashed_errors(&req),
    };
    views::render(&req, &view)
}

/// GET /posts/{id}
pub async fn show(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> PageResult<HttpResponse> {
    let id = parse_post_id(&path).map_err(to_index)?;
    let post = state.posts.show(id).await.map_err(to_index)?;

    let view = ShowView {
        post: &post,
        errors: views::flashed_errors(&req),
    };
    views::render(&req, &view)
}

/// POST /posts
pub async fn store(
    req: HttpRequest,
    state: web::Data<AppState>,
    form: FormInput,
) -> PageResult<HttpResponse> {
    state
        .posts
        .create(form.into_inner())
        .await
        .map_err(|e| PageError::from_domain(e, views::back(&req, INDEX_PATH)))?;

    Ok(HttpResponse::Ok().finish())
}

/// PATCH|PUT /posts/{id}
pub async fn update(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
    form: FormInput,
) -> PageResult<HttpResponse> {
    let to_back = |e: DomainError| PageError::from_domain(e, views::back(&req, INDEX_PATH));
    let id = parse_post_id(&path).map_err(to_back)?;
    state
        .posts
        .update(id, form.into_inner())
        .await
        .map_err(to_back)?;

    Ok(HttpResponse::Ok().finish())
}

/// DELETE /posts/{id} - anonymous visitors are sent to the login page.
pub async fn destroy(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<String>,
) -> PageResult<HttpResponse> {
    let id = parse_post_id(&path).map_err(to_index)?;
    state
        .posts
        .delete(identity.principal(), id)
        .await
        .map_err(to_index)?;

    Ok(HttpResponse::Ok().finish())
}
