//! # Server Module
//!
//! HTTP server setup and route configuration for the prediction backend.

use anyhow::{Context, Result};
use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::get,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::auth::jwt::JwtService;
use crate::auth::middleware::AuthMiddleware;
use crate::catalog::{Catalog, default_catalog};
use crate::config::Config;
use crate::database::migrations::run_migrations;
use crate::database::{DatabaseConnection, InMemoryUserRepository, PgUserRepository, UserRepository};
use crate::routes::health::ping;
use crate::routes::{auth, catalog, predictions};
use crate::services::PredictionService;
use crate::services::upstream::UpstreamPredictionService;

/// Application state shared across all route handlers
#[derive(Clone)]
pub struct AppState {
    pub jwt_service: Arc<JwtService>,
    pub users: Arc<dyn UserRepository>,
    pub predictor: Arc<dyn PredictionService>,
    pub catalog: Arc<Catalog>,
    /// `None` when running on the in-memory repository
    pub db: Option<Arc<DatabaseConnection>>,
}

/// Assemble the router. Session and prediction routes sit behind the JWT middleware.
pub fn build_router(state: AppState, cors_origins: &[String]) -> Result<Router> {
    let protected_routes = Router::new()
        .merge(auth::create_session_routes())
        .merge(predictions::create_prediction_routes())
        .layer(middleware::from_fn_with_state(
            state.jwt_service.clone(),
            AuthMiddleware::validate_token,
        ));

    let origins = cors_origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .with_context(|| format!("Invalid CORS origin: {}", origin))
        })
        .collect::<Result<Vec<_>>>()?;

    let app = Router::new()
        .route("/ping", get(ping))
        .merge(auth::create_auth_routes())
        .merge(catalog::create_catalog_routes())
        .merge(protected_routes)
        .layer(
            ServiceBuilder::new().layer(
                CorsLayer::new()
                    .allow_origin(AllowOrigin::list(origins))
                    .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                    .allow_headers([
                        header::ORIGIN,
                        header::CONTENT_TYPE,
                        header::ACCEPT,
                        header::AUTHORIZATION,
                    ])
                    .allow_credentials(true),
            ),
        )
        .with_state(state);

    Ok(app)
}

/// Pick the user store: PostgreSQL when configured, otherwise process memory.
async fn open_user_store(
    config: &Config,
) -> Result<(Arc<dyn UserRepository>, Option<Arc<DatabaseConnection>>)> {
    let Some(db_config) = config.database.clone() else {
        tracing::warn!("DATABASE_URL not set, accounts are kept in memory and lost on restart");
        return Ok((Arc::new(InMemoryUserRepository::new()), None));
    };

    let db = Arc::new(DatabaseConnection::new(db_config));
    let pool = db
        .connect()
        .await
        .context("Failed to connect to the database")?;
    run_migrations(pool).await?;

    let users: Arc<dyn UserRepository> = Arc::new(PgUserRepository::new(pool.clone()));
    Ok((users, Some(db)))
}

/// Starts the HTTP server and runs until Ctrl+C.
pub async fn start(config: Config) -> Result<()> {
    let jwt_service = Arc::new(JwtService::new(
        &config.auth.jwt_secret,
        config.auth.token_ttl,
    ));

    let (users, db) = open_user_store(&config).await?;

    let predictor = Arc::new(UpstreamPredictionService::new(
        &config.prediction.service_url,
        config.prediction.request_timeout,
    )?);
    tracing::info!("Forwarding predictions to {}", predictor.endpoint());

    let app_state = AppState {
        jwt_service,
        users,
        predictor,
        catalog: Arc::new(default_catalog().clone()),
        db: db.clone(),
    };
    let app = build_router(app_state, &config.server.cors_origins)?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {} - port may already be in use", addr))?;

    tracing::info!("🚀 Prediction server starting...");
    tracing::info!("📡 Listening on http://{}", addr);
    tracing::info!("🏥 Health check available at http://{}/ping", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    if let Some(db) = db {
        db.disconnect();
    }
    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
