pub mod config;
pub mod db;
pub mod dtos;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

use service_core::axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use service_core::middleware::{
    rate_limit::ip_rate_limit_middleware, security_headers::security_headers_middleware,
    tracing::request_id_middleware,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::{
    openapi::security::SecurityScheme,
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::config::AuthConfig;
use crate::services::{AuthService, ClientService, JwtService, KeyManager};
use service_core::error::AppError;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(OpenApi)]
#[openapi(
    paths(
        health_check,
        handlers::well_known::jwks,
        handlers::auth::register,
        handlers::auth::login,
        handlers::user::get_me,
        handlers::clients::register_client,
    ),
    components(
        schemas(
            dtos::auth::RegisterRequest,
            dtos::auth::LoginRequest,
            dtos::auth::LoginResponse,
            dtos::clients::RegisterClientRequest,
            dtos::clients::RegisterClientResponse,
            models::SanitizedUser,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "User authentication and token issuance"),
        (name = "User", description = "User profile"),
        (name = "Clients", description = "OAuth2 client registration"),
        (name = "Well-Known", description = "Public service metadata"),
        (name = "Observability", description = "Service health")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: AuthConfig,
    pub pool: PgPool,
    pub keys: Arc<KeyManager>,
    pub jwt: JwtService,
    pub auth_service: AuthService,
    pub client_service: ClientService,
    pub login_rate_limiter: service_core::middleware::rate_limit::IpRateLimiter,
    pub register_rate_limiter: service_core::middleware::rate_limit::IpRateLimiter,
    pub ip_rate_limiter: service_core::middleware::rate_limit::IpRateLimiter,
}

pub async fn build_router(state: AppState) -> Result<Router, AppError> {
    // Login and registration get their own, stricter limiters
    let login_limiter = state.login_rate_limiter.clone();
    let login_route = Router::new()
        .route("/login", post(handlers::auth::login))
        .layer(from_fn_with_state(login_limiter, ip_rate_limit_middleware));

    let register_limiter = state.register_rate_limiter.clone();
    let register_route = Router::new()
        .route("/register", post(handlers::auth::register))
        .layer(from_fn_with_state(
            register_limiter,
            ip_rate_limit_middleware,
        ));

    let ip_limiter = state.ip_rate_limiter.clone();

    let mut app = Router::new()
        .route("/health", get(health_check))
        .route("/.well-known/jwks.json", get(handlers::well_known::jwks));

    let swagger_enabled = match state.config.environment {
        crate::config::Environment::Dev => true,
        crate::config::Environment::Prod => {
            state.config.swagger.enabled == crate::config::SwaggerMode::Public
        }
    };

    if swagger_enabled {
        app =
            app.merge(SwaggerUi::new("/docs").url("/.well-known/openapi.json", ApiDoc::openapi()));
    } else {
        app = app.route(
            "/.well-known/openapi.json",
            get(|| async { service_core::axum::Json(ApiDoc::openapi()) }),
        );
    }

    let app = app
        .merge(login_route)
        .merge(register_route)
        .merge(
            Router::new()
                .route("/users/me", get(handlers::user::get_me))
                .route(
                    "/clients/register",
                    post(handlers::clients::register_client),
                )
                .layer(from_fn_with_state(
                    state.clone(),
                    middleware::auth_middleware,
                )),
        )
        .with_state(state.clone())
        // Global IP rate limiting
        .layer(from_fn_with_state(ip_limiter, ip_rate_limit_middleware))
        // Add tracing layer
        .layer(TraceLayer::new_for_http().make_span_with(
            |request: &service_core::axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            },
        ))
        // Add tracing middleware for request_id
        .layer(from_fn(request_id_middleware))
        // Add security headers middleware
        .layer(from_fn(security_headers_middleware))
        // Add CORS layer
        .layer(
            CorsLayer::new()
                .allow_origin(
                    state
                        .config
                        .security
                        .allowed_origins
                        .iter()
                        .map(|o| {
                            o.parse::<service_core::axum::http::HeaderValue>()
                                .unwrap_or_else(|e| {
                                    tracing::error!(
                                        "Invalid CORS origin '{}': {}. Using fallback.",
                                        o,
                                        e
                                    );
                                    service_core::axum::http::HeaderValue::from_static("*")
                                })
                        })
                        .collect::<Vec<service_core::axum::http::HeaderValue>>(),
                )
                .allow_methods([
                    service_core::axum::http::Method::GET,
                    service_core::axum::http::Method::POST,
                    service_core::axum::http::Method::OPTIONS,
                ])
                .allow_headers([
                    service_core::axum::http::header::AUTHORIZATION,
                    service_core::axum::http::header::CONTENT_TYPE,
                ]),
        );

    Ok(app)
}

/// Service health check
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy"),
        (status = 500, description = "Service is unhealthy")
    ),
    tag = "Observability"
)]
pub async fn health_check(
    service_core::axum::extract::State(state): service_core::axum::extract::State<AppState>,
) -> Result<service_core::axum::Json<serde_json::Value>, AppError> {
    db::health_check(&state.pool).await.map_err(|e| {
        tracing::error!(error = %e, "Database health check failed");
        AppError::DatabaseError(anyhow::Error::new(e))
    })?;

    Ok(service_core::axum::Json(serde_json::json!({
        "status": "healthy",
        "service": state.config.service_name,
        "version": state.config.service_version,
        "environment": format!("{:?}", state.config.environment),
        "checks": {
            "postgres": "up"
        }
    })))
}
