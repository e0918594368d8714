//! Error Types
//!
//! Error taxonomy shared by the client core and the backend. Collaborators
//! report a [`ServiceError`]; the session manager and the prediction engine
//! translate it into user-facing [`AuthError`] / [`PredictionError`] values
//! that never echo remote detail.

use thiserror::Error;

/// Bad or missing local input. Resolved synchronously, never reaches the network.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Email is required")]
    MissingIdentifier,
    #[error("Password is required")]
    MissingSecret,
    #[error("Name is required")]
    MissingName,
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("Password must be at least {min_len} characters and contain a letter and a digit")]
    WeakPassword { min_len: usize },
    #[error("Select both a cryptocurrency and a model")]
    IncompleteSelection,
    #[error("Unknown cryptocurrency: {0}")]
    UnknownCryptocurrency(String),
    #[error("Unknown model: {0}")]
    UnknownModel(String),
}

/// Outcome of a failed collaborator call (auth service, prediction service, catalog).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("request timed out")]
    Timeout,
    #[error("network error: {0}")]
    Network(String),
    #[error("unauthorized")]
    Unauthorized,
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("request rejected: {0}")]
    InvalidInput(String),
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("request cancelled")]
    Cancelled,
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ServiceError::Timeout
        } else if err.is_decode() {
            ServiceError::Malformed(err.to_string())
        } else {
            ServiceError::Network(err.to_string())
        }
    }
}

/// Session operation failures. Messages are deliberately generic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Unable to complete registration with the details provided")]
    RegistrationRejected,
    #[error("Your session has expired, please sign in again")]
    Expired,
    #[error("Another sign-in request is already in progress")]
    Busy,
    #[error("Authentication service is unavailable, please try again")]
    Unavailable,
    #[error("Sign-in was cancelled")]
    Cancelled,
}

/// Coarse classification used by views to decide whether to offer a retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Timeout,
    Network,
    InvalidInput,
    Server,
    MalformedResponse,
}

/// Terminal error of a prediction request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PredictionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("The prediction service did not respond in time")]
    Timeout,
    #[error("Could not reach the prediction service")]
    Network,
    #[error("The prediction request was rejected as invalid")]
    InvalidInput,
    #[error("The prediction service failed to produce a prediction")]
    Server,
    #[error("The prediction service returned an invalid response")]
    MalformedResponse(String),
}

impl PredictionError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            PredictionError::Validation(_) => ErrorCategory::Validation,
            PredictionError::Timeout => ErrorCategory::Timeout,
            PredictionError::Network => ErrorCategory::Network,
            PredictionError::InvalidInput => ErrorCategory::InvalidInput,
            PredictionError::Server => ErrorCategory::Server,
            PredictionError::MalformedResponse(_) => ErrorCategory::MalformedResponse,
        }
    }

    /// Whether re-submitting the same selection could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Timeout | ErrorCategory::Network | ErrorCategory::Server
        )
    }
}

impl From<ServiceError> for PredictionError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Timeout => PredictionError::Timeout,
            ServiceError::Network(_) | ServiceError::Cancelled => PredictionError::Network,
            ServiceError::InvalidInput(_) | ServiceError::Conflict(_) => {
                PredictionError::InvalidInput
            }
            ServiceError::Unauthorized | ServiceError::Server { .. } => PredictionError::Server,
            ServiceError::Malformed(detail) => PredictionError::MalformedResponse(detail),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_errors_map_to_categories() {
        assert_eq!(
            PredictionError::from(ServiceError::Timeout).category(),
            ErrorCategory::Timeout
        );
        assert_eq!(
            PredictionError::from(ServiceError::Network("refused".into())).category(),
            ErrorCategory::Network
        );
        assert_eq!(
            PredictionError::from(ServiceError::InvalidInput("bad id".into())).category(),
            ErrorCategory::InvalidInput
        );
        assert_eq!(
            PredictionError::from(ServiceError::Server {
                status: 503,
                message: "down".into()
            })
            .category(),
            ErrorCategory::Server
        );
    }

    #[test]
    fn retry_is_offered_only_for_transient_failures() {
        assert!(PredictionError::Timeout.is_retryable());
        assert!(PredictionError::Server.is_retryable());
        assert!(!PredictionError::InvalidInput.is_retryable());
        assert!(!PredictionError::MalformedResponse("price".into()).is_retryable());
    }

    #[test]
    fn user_messages_do_not_leak_remote_detail() {
        let err = PredictionError::from(ServiceError::Server {
            status: 500,
            message: "stack trace at model.py:42".into(),
        });
        assert!(!err.to_string().contains("model.py"));
    }
}
