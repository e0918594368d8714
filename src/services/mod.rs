//! # Services Module
//!
//! Collaborator contracts consumed by the session manager and the prediction
//! engine, the request/response shapes exchanged with them, and the HTTP
//! plumbing shared by their implementations.
//!
//! - `http`: status mapping and JSON decoding for reqwest responses
//! - `upstream`: the model-serving endpoint the backend forwards predictions to

pub mod http;
pub mod upstream;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::auth::models::{Credentials, Registration, SessionInfo, TokenResponse};
use crate::error::ServiceError;

/// Remote authority for credentials and tokens
#[async_trait]
pub trait AuthService: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> Result<TokenResponse, ServiceError>;

    async fn register(&self, registration: &Registration) -> Result<TokenResponse, ServiceError>;

    /// Resolve a previously issued token to its user
    async fn current_session(&self, token: &str) -> Result<SessionInfo, ServiceError>;

    /// Best-effort revocation of a token
    async fn invalidate(&self, token: &str) -> Result<(), ServiceError>;
}

/// Produces a price prediction for a (cryptocurrency, model) pair.
///
/// Implementations should stop work and return [`ServiceError::Cancelled`]
/// once `cancel` fires.
#[async_trait]
pub trait PredictionService: Send + Sync {
    async fn predict(
        &self,
        request: &PredictionRequest,
        cancel: CancellationToken,
    ) -> Result<PredictionQuote, ServiceError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionRequest {
    pub cryptocurrency_id: String,
    pub model_id: String,
}

/// Raw answer from a prediction service. Not trusted until [`validate`](Self::validate) passes.
///
/// Every field is required. A missing timestamp or a fractional or negative
/// confidence fails to decode and surfaces as [`ServiceError::Malformed`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionQuote {
    pub predicted_price: f64,
    /// Whole percent
    pub confidence: u8,
    pub timestamp: DateTime<Utc>,
}

impl PredictionQuote {
    /// Price must be a positive finite number, confidence at most 100.
    pub fn validate(&self) -> Result<(), String> {
        if !self.predicted_price.is_finite() || self.predicted_price <= 0.0 {
            return Err(format!("predicted price out of range: {}", self.predicted_price));
        }
        if self.confidence > 100 {
            return Err(format!("confidence out of range: {}", self.confidence));
        }
        Ok(())
    }
}
