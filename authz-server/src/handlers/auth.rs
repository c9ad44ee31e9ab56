use axum::{extract::State, response::IntoResponse, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use validator::Validate;

use crate::{
    dtos::{
        auth::{LoginRequest, LoginResponse, RegisterRequest},
        ApiResponse,
    },
    middleware::AUTH_COOKIE,
    services::ServiceError,
    AppState,
};
use service_core::error::AppError;

/// Register a new user account
#[utoipa::path(
    post,
    path = "/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "User registered successfully"),
        (status = 400, description = "Email already registered"),
        (status = 422, description = "Validation error")
    ),
    tag = "Authentication"
)]
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;

    let user = state
        .auth_service
        .register(req.name, req.email, req.password)
        .await?;

    Ok(Json(ApiResponse::new(
        "user registered successfully",
        user.sanitized(),
    )))
}

/// Authenticate with email and password
///
/// On success the signed token is delivered both in the response body
/// and as an HttpOnly cookie.
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful"),
        (status = 401, description = "Invalid email or password")
    ),
    tag = "Authentication"
)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;

    let (principal, issued) = state
        .auth_service
        .login(&req.email, &req.password)
        .await
        .map_err(|e| {
            if matches!(e, ServiceError::InvalidCredentials) {
                tracing::warn!(path = "/login", reason = %e, "Login rejected");
            }
            AppError::from(e)
        })?;

    let lifetime = issued.expires_at - issued.issued_at;
    let cookie = Cookie::build((AUTH_COOKIE, issued.token.clone()))
        .http_only(true)
        .secure(true)
        .path("/")
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(lifetime.num_seconds()))
        .build();

    let body = ApiResponse::new(
        "login successful",
        LoginResponse {
            user_id: principal.id,
            email: principal.email,
            token: issued.token,
            expires_at: issued.expires_at,
        },
    );

    Ok((jar.add(cookie), Json(body)))
}
