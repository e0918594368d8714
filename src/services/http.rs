//! Response handling shared by the reqwest-based service clients.

use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::error::ServiceError;

/// Treat the last path segment of a base URL as a directory, so relative
/// endpoints resolve beneath it instead of replacing it.
pub fn as_base(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

/// Map a non-success status to a [`ServiceError`], keeping the body only for logs.
pub async fn error_for_status(response: Response) -> ServiceError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    tracing::debug!("Service responded {}: {}", status, body);

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ServiceError::Unauthorized,
        StatusCode::CONFLICT => ServiceError::Conflict(body),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY | StatusCode::NOT_FOUND => {
            ServiceError::InvalidInput(body)
        }
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => ServiceError::Timeout,
        _ => ServiceError::Server {
            status: status.as_u16(),
            message: body,
        },
    }
}

/// Decode a successful JSON response, or map the failure status
pub async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ServiceError> {
    if !response.status().is_success() {
        return Err(error_for_status(response).await);
    }
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| ServiceError::Malformed(e.to_string()))
}

/// Expect an empty success response
pub async fn read_empty(response: Response) -> Result<(), ServiceError> {
    if response.status().is_success() {
        Ok(())
    } else {
        Err(error_for_status(response).await)
    }
}

/// Run a request future unless `cancel` fires first
pub async fn cancellable<T>(
    cancel: &CancellationToken,
    request: impl Future<Output = Result<T, ServiceError>>,
) -> Result<T, ServiceError> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(ServiceError::Cancelled),
        result = request => result,
    }
}
