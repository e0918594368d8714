//! Catalog endpoints. Public, read-only.

use axum::{Json, Router, extract::State, routing::get};

use crate::catalog::{AiModel, Cryptocurrency};
use crate::server::AppState;

pub async fn list_cryptocurrencies(State(state): State<AppState>) -> Json<Vec<Cryptocurrency>> {
    Json(state.catalog.cryptocurrencies.clone())
}

pub async fn list_models(State(state): State<AppState>) -> Json<Vec<AiModel>> {
    Json(state.catalog.models.clone())
}

pub fn create_catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/catalog/cryptocurrencies", get(list_cryptocurrencies))
        .route("/api/v1/catalog/models", get(list_models))
}
