//! Prediction endpoint
//!
//! Validates the selection against the served catalog, forwards it to the
//! upstream prediction service and checks the answer before returning it.

use axum::{
    Extension, Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::post,
};
use tokio_util::sync::CancellationToken;

use crate::auth::jwt::Claims;
use crate::error::ServiceError;
use crate::routes::error::ApiError;
use crate::server::AppState;
use crate::services::{PredictionQuote, PredictionRequest};

pub async fn create_prediction(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    body: Result<Json<PredictionRequest>, JsonRejection>,
) -> Result<Json<PredictionQuote>, ApiError> {
    let Json(request) = body.map_err(|rejection| {
        tracing::debug!("Rejected prediction body: {}", rejection);
        ApiError::BadRequest("Malformed request body".to_string())
    })?;

    state
        .catalog
        .validate(&request.cryptocurrency_id, &request.model_id)
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    tracing::info!(
        "Prediction requested by {}: {} / {}",
        claims.sub,
        request.cryptocurrency_id,
        request.model_id
    );

    // Dropping this request (client disconnect) drops the upstream future with it
    let quote = state
        .predictor
        .predict(&request, CancellationToken::new())
        .await
        .map_err(|e| match e {
            ServiceError::Timeout => {
                tracing::warn!("Upstream prediction timed out");
                ApiError::GatewayTimeout
            }
            other => {
                tracing::error!("Upstream prediction failed: {}", other);
                ApiError::BadGateway
            }
        })?;

    if let Err(reason) = quote.validate() {
        tracing::error!("Upstream returned an unusable prediction: {}", reason);
        return Err(ApiError::BadGateway);
    }

    Ok(Json(quote))
}

pub fn create_prediction_routes() -> Router<AppState> {
    Router::new().route("/api/v1/predictions", post(create_prediction))
}
