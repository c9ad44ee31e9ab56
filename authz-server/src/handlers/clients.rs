use axum::{extract::State, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    dtos::{
        clients::{RegisterClientRequest, RegisterClientResponse},
        ApiResponse,
    },
    AppState,
};
use service_core::error::AppError;

/// Register an OAuth2 client application
///
/// The response is the only place the plaintext client secret ever
/// appears.
#[utoipa::path(
    post,
    path = "/clients/register",
    request_body = RegisterClientRequest,
    responses(
        (status = 200, description = "Client registered successfully"),
        (status = 401, description = "Missing or invalid token"),
        (status = 409, description = "Client identifier already registered")
    ),
    security(("bearer_auth" = [])),
    tag = "Clients"
)]
pub async fn register_client(
    State(state): State<AppState>,
    Json(req): Json<RegisterClientRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;

    let registered = state.client_service.register_client(&req.into()).await?;

    let response =
        RegisterClientResponse::from_registered(&registered.client, registered.client_secret);

    Ok(Json(ApiResponse::new(
        "client registered successfully",
        response,
    )))
}
