use authz_server::{
    build_router,
    config::AuthConfig,
    services::{AuthService, ClientService, JwtService, KeyManager, PasswordCredentialVerifier},
    AppState,
};
use service_core::middleware::rate_limit::create_ip_rate_limiter;
use service_core::observability::logging::init_tracing;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;

#[tokio::main]
async fn main() -> Result<(), service_core::error::AppError> {
    // Load configuration - fail fast if invalid
    let config = AuthConfig::from_env()?;

    init_tracing(&config.service_name, &config.log_level);

    tracing::info!(
        service = %config.service_name,
        version = %config.service_version,
        environment = ?config.environment,
        "Starting authorization server"
    );

    // Initialize database connection and schema
    let pool = authz_server::db::create_pool(&config.database)
        .await
        .map_err(|e| service_core::error::AppError::DatabaseError(anyhow::Error::new(e)))?;
    authz_server::db::run_migrations(&pool)
        .await
        .map_err(|e| service_core::error::AppError::DatabaseError(anyhow::Error::new(e)))?;
    tracing::info!("Database initialized successfully");

    // The signing key pair lives for this process only; a restart mints
    // a new pair and invalidates outstanding tokens
    let keys = Arc::new(KeyManager::generate()?);
    let jwt = JwtService::with_ttl(keys.clone(), config.jwt.token_ttl_seconds);
    tracing::info!("JWT service initialized");

    // Initialize rate limiters
    let login_rate_limiter = create_ip_rate_limiter(
        config.rate_limit.login_attempts,
        config.rate_limit.login_window_seconds,
    );
    let register_rate_limiter = create_ip_rate_limiter(
        config.rate_limit.register_attempts,
        config.rate_limit.register_window_seconds,
    );
    let ip_rate_limiter = create_ip_rate_limiter(
        config.rate_limit.global_ip_limit,
        config.rate_limit.global_ip_window_seconds,
    );
    tracing::info!("Rate limiters initialized: Login, Register, and Global IP");

    // Initialize services
    let verifier = Arc::new(PasswordCredentialVerifier::new(pool.clone())?);
    let auth_service = AuthService::new(pool.clone(), verifier, jwt.clone());
    let client_service = ClientService::new(pool.clone());

    let state = AppState {
        config: config.clone(),
        pool,
        keys,
        jwt,
        auth_service,
        client_service,
        login_rate_limiter,
        register_rate_limiter,
        ip_rate_limiter,
    };

    let app = build_router(state).await?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
    tracing::info!(address = %addr, "Listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;

    service_core::axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Service shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
