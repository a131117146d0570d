//! Server-rendered pages and the HTML error/redirect responses.

use actix_web::cookie::{Cookie, SameSite, time::Duration};
use actix_web::http::{StatusCode, header};
use actix_web::{HttpRequest, HttpResponse, HttpResponseBuilder, ResponseError};
use askama::Template;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use thiserror::Error;

use press_core::domain::Post;
use press_core::error::DomainError;
use press_core::validation::ValidationErrors;

/// Cookie that carries validation errors across the redirect back to a form.
pub const FLASH_COOKIE: &str = "press_errors";

/// Where unauthenticated visitors are sent.
pub const LOGIN_PATH: &str = "/login";

#[derive(Template)]
#[template(path = "posts/index.html")]
pub struct IndexView<'a> {
    pub posts: &'a [Post],
    pub errors: Vec<String>,
}

#[derive(Template)]
#[template(path = "posts/show.html")]
pub struct ShowView<'a> {
    pub post: &'a Post,
    pub errors: Vec<String>,
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginView {
    pub errors: Vec<String>,
}

#[derive(Template)]
#[template(path = "error.html")]
struct ErrorView<'a> {
    status: u16,
    title: &'a str,
    detail: &'a str,
}

/// Failures on the HTML surface.
#[derive(Debug, Error)]
pub enum PageError {
    #[error("Page not found: {0}")]
    NotFound(String),

    #[error("Authentication required")]
    Unauthenticated,

    #[error("Invalid submission: {errors}")]
    Validation { errors: ValidationErrors, back: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl PageError {
    /// Map a domain failure, sending validation errors back to `back`.
    pub fn from_domain(err: DomainError, back: String) -> Self {
        match err {
            DomainError::NotFound { entity_type, .. } => {
                PageError::NotFound(format!("{entity_type} not found"))
            }
            DomainError::Validation(errors) => PageError::Validation { errors, back },
            DomainError::Unauthorized => PageError::Unauthenticated,
            DomainError::Duplicate(msg) | DomainError::Internal(msg) => PageError::Internal(msg),
        }
    }
}

impl From<askama::Error> for PageError {
    fn from(err: askama::Error) -> Self {
        PageError::Internal(format!("template rendering failed: {err}"))
    }
}

impl ResponseError for PageError {
    fn status_code(&self) -> StatusCode {
        match self {
            PageError::NotFound(_) => StatusCode::NOT_FOUND,
            PageError::Unauthenticated => StatusCode::FOUND,
            PageError::Validation { .. } => StatusCode::SEE_OTHER,
            PageError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            PageError::NotFound(detail) => error_page(self.status_code(), "Not Found", detail),
            PageError::Unauthenticated => HttpResponse::Found()
                .insert_header((header::LOCATION, LOGIN_PATH))
                .finish(),
            PageError::Validation { errors, back } => HttpResponse::SeeOther()
                .insert_header((header::LOCATION, back.as_str()))
                .cookie(flash_cookie(errors))
                .finish(),
            PageError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                error_page(self.status_code(), "Server Error", "Something went wrong.")
            }
        }
    }
}

pub type PageResult<T> = Result<T, PageError>;

fn error_page(status: StatusCode, title: &str, detail: &str) -> HttpResponse {
    let view = ErrorView {
        status: status.as_u16(),
        title,
        detail,
    };
    match view.render() {
        Ok(body) => html(HttpResponse::build(status), body),
        Err(e) => {
            tracing::error!("Failed to render error page: {}", e);
            HttpResponse::build(status).finish()
        }
    }
}

/// Render a view into a 200 response, consuming any flashed errors.
pub fn render(req: &HttpRequest, view: &impl Template) -> PageResult<HttpResponse> {
    let body = view.render()?;
    let mut builder = HttpResponse::Ok();
    if req.cookie(FLASH_COOKIE).is_some() {
        builder.cookie(expired_flash_cookie());
    }
    Ok(html(builder, body))
}

fn html(mut builder: HttpResponseBuilder, body: String) -> HttpResponse {
    builder.content_type("text/html; charset=utf-8").body(body)
}

/// Target for a redirect back to the submitting page. Only a local path or a
/// same-origin `Referer` is followed.
pub fn back(req: &HttpRequest, fallback: &str) -> String {
    req.headers()
        .get(header::REFERER)
        .and_then(|v| v.to_str().ok())
        .and_then(|referer| local_path(referer, req.connection_info().host()))
        .unwrap_or(fallback)
        .to_string()
}

fn local_path<'a>(referer: &'a str, host: &str) -> Option<&'a str> {
    let is_path = |p: &str| p.starts_with('/') && !p.starts_with("//") && !p.contains('\\');

    if is_path(referer) {
        return Some(referer);
    }

    let rest = referer
        .strip_prefix("https://")
        .or_else(|| referer.strip_prefix("http://"))?;
    let (authority, path) = match rest.find('/') {
        Some(i) => rest.split_at(i),
        None => (rest, "/"),
    };

    (authority.eq_ignore_ascii_case(host) && is_path(path)).then_some(path)
}

fn flash_cookie(errors: &ValidationErrors) -> Cookie<'static> {
    let encoded = serde_json::to_vec(errors)
        .map(|json| URL_SAFE_NO_PAD.encode(json))
        .unwrap_or_default();

    Cookie::build(FLASH_COOKIE, encoded)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(Duration::minutes(5))
        .finish()
}

fn expired_flash_cookie() -> Cookie<'static> {
    Cookie::build(FLASH_COOKIE, "")
        .path("/")
        .max_age(Duration::ZERO)
        .finish()
}

/// Messages flashed by the previous request, flattened for display.
pub fn flashed_errors(req: &HttpRequest) -> Vec<String> {
    let Some(cookie) = req.cookie(FLASH_COOKIE) else {
        return Vec::new();
    };

    let decoded = URL_SAFE_NO_PAD
        .decode(cookie.value())
        .ok()
        .and_then(|bytes| serde_json::from_slice::<ValidationErrors>(&bytes).ok());

    match decoded {
        Some(errors) => errors.into_inner().into_values().flatten().collect(),
        None => {
            tracing::debug!("Discarding unreadable flash cookie");
            Vec::new()
        }
    }
}
