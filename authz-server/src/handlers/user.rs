use axum::{extract::State, response::IntoResponse, Json};

use crate::{dtos::ApiResponse, middleware::AuthUser, AppState};
use service_core::error::AppError;

/// Current user's profile
#[utoipa::path(
    get,
    path = "/users/me",
    responses(
        (status = 200, description = "User info fetched"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = [])),
    tag = "User"
)]
pub async fn get_me(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let claims = user.0;

    let user = state.auth_service.find_user(claims.user_id).await?;

    Ok(Json(ApiResponse::new("user info fetched", user.sanitized())))
}
