//! # Client Module
//!
//! The client-side core consumed by views: the session manager, the
//! prediction request engine, credential persistence, and the HTTP client
//! for the backend API.

pub mod credentials;
pub mod http;
pub mod prediction;
pub mod session;

pub use credentials::{CredentialStore, FileCredentialStore, MemoryCredentialStore};
pub use http::ApiClient;
pub use prediction::{
    Prediction, PredictionEngine, PredictionState, PredictionStatus, SelectionField, SubmitOutcome,
};
pub use session::{SessionManager, SessionState, ViewAccess};
