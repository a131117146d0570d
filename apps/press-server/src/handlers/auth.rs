//! Account handlers: JSON registration and login, plus the HTML login page.

use actix_web::cookie::{Cookie, SameSite, time::Duration};
use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, web};

use press_core::domain::User;
use press_core::validation::ValidationErrors;
use press_shared::dto::{AuthResponse, LoginRequest, RegisterUserRequest, UserResponse};

use crate::middleware::auth::{ACCESS_TOKEN_COOKIE, Identity};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;
use crate::views::{self, LOGIN_PATH, LoginView, PageError, PageResult};

const MIN_PASSWORD_LENGTH: usize = 8;
const DEFAULT_ROLE: &str = "user";

/// POST /api/auth/register
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterUserRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let email = User::normalize_email(&req.email);

    if email.is_empty() || !email.contains('@') {
        return Err(AppError::BadRequest("Invalid email address".to_string()));
    }
    if req.password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AppError::BadRequest(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    if state.users.find_by_email(&email).await?.is_some() {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }

    let password_hash = state
        .passwords
        .hash(&req.password)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let user = state.users.insert(User::new(&email, password_hash)).await?;
    tracing::info!(user_id = %user.id, "User registered");

    Ok(HttpResponse::Created().json(issue_token(&state, &user)?))
}

/// POST /api/auth/login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let user = verify_credentials(&state, &body)
        .await?
        .ok_or(AppError::Unauthorized)?;

    Ok(HttpResponse::Ok().json(issue_token(&state, &user)?))
}

/// GET /api/auth/me - Protected route
pub async fn me(identity: Identity) -> HttpResponse {
    let principal = identity.0;
    HttpResponse::Ok().json(UserResponse {
        id: principal.user_id.to_string(),
        email: principal.email,
        roles: principal.roles,
    })
}

/// GET /login
pub async fn login_page(req: HttpRequest) -> PageResult<HttpResponse> {
    let view = LoginView {
        errors: views::flashed_errors(&req),
    };
    views::render(&req, &view)
}

/// POST /login - stores the token in a cookie and sends the visitor to the posts.
pub async fn login_submit(
    state: web::Data<AppState>,
    form: web::Form<LoginRequest>,
) -> PageResult<HttpResponse> {
    let user = verify_credentials(&state, &form)
        .await
        .map_err(|e| PageError::Internal(e.to_string()))?;

    let Some(user) = user else {
        let mut errors = ValidationErrors::new();
        errors.add("email", "These credentials do not match our records.");
        return Err(PageError::Validation {
            errors,
            back: LOGIN_PATH.to_string(),
        });
    };

    let tokens = issue_token(&state, &user).map_err(|e| PageError::Internal(e.to_string()))?;
    let cookie = Cookie::build(ACCESS_TOKEN_COOKIE, tokens.access_token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(Duration::seconds(tokens.expires_in as i64))
        .finish();

    Ok(HttpResponse::SeeOther()
        .insert_header((header::LOCATION, "/posts"))
        .cookie(cookie)
        .finish())
}

async fn verify_credentials(state: &AppState, req: &LoginRequest) -> AppResult<Option<User>> {
    let Some(user) = state.users.find_by_email(&req.email).await? else {
        tracing::debug!("Login attempt for unknown account");
        return Ok(None);
    };

    let valid = state
        .passwords
        .verify(&req.password, &user.password_hash)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(valid.then_some(user))
}

fn issue_token(state: &AppState, user: &User) -> AppResult<AuthResponse> {
    let token = state
        .tokens
        .generate_token(user.id, &user.email, vec![DEFAULT_ROLE.to_string()])
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(AuthResponse::bearer(
        token,
        state.tokens.expiration_seconds().max(0) as u64,
    ))
}
