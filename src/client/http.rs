//! HTTP client for the backend API, implementing the auth, prediction, and
//! catalog collaborator traits.

use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::auth::models::{Credentials, Registration, SessionInfo, TokenResponse};
use crate::catalog::{AiModel, CatalogProvider, Cryptocurrency};
use crate::client::credentials::CredentialStore;
use crate::error::ServiceError;
use crate::services::http::{as_base, cancellable, read_empty, read_json};
use crate::services::{AuthService, PredictionQuote, PredictionRequest, PredictionService};

pub struct ApiClient {
    client: Client,
    base_url: Url,
    credentials: Arc<dyn CredentialStore>,
}

impl ApiClient {
    /// `timeout` bounds each HTTP exchange; the prediction engine applies its own bound on top.
    /// Endpoints resolve under `base_url`, so a path prefix such as `/predictor` is kept.
    pub fn new(
        base_url: Url,
        credentials: Arc<dyn CredentialStore>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {}", e))?;

        Ok(Self {
            client,
            base_url: as_base(base_url),
            credentials,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ServiceError> {
        self.base_url
            .join(path)
            .map_err(|e| ServiceError::InvalidInput(format!("bad endpoint {}: {}", path, e)))
    }

    fn stored_token(&self) -> Result<String, ServiceError> {
        match self.credentials.load() {
            Ok(Some(token)) => Ok(token),
            Ok(None) => Err(ServiceError::Unauthorized),
            Err(e) => {
                tracing::warn!("Failed to read stored credential: {:#}", e);
                Err(ServiceError::Unauthorized)
            }
        }
    }
}

#[async_trait]
impl AuthService for ApiClient {
    async fn login(&self, credentials: &Credentials) -> Result<TokenResponse, ServiceError> {
        let response = self
            .client
            .post(self.endpoint("api/auth/login")?)
            .json(credentials)
            .send()
            .await?;
        read_json(response).await
    }

    async fn register(&self, registration: &Registration) -> Result<TokenResponse, ServiceError> {
        let response = self
            .client
            .post(self.endpoint("api/auth/register")?)
            .json(registration)
            .send()
            .await?;
        read_json(response).await
    }

    async fn current_session(&self, token: &str) -> Result<SessionInfo, ServiceError> {
        let response = self
            .client
            .get(self.endpoint("api/auth/me")?)
            .bearer_auth(token)
            .send()
            .await?;
        read_json(response).await
    }

    async fn invalidate(&self, token: &str) -> Result<(), ServiceError> {
        let response = self
            .client
            .post(self.endpoint("api/auth/logout")?)
            .bearer_auth(token)
            .send()
            .await?;
        read_empty(response).await
    }
}

#[async_trait]
impl PredictionService for ApiClient {
    async fn predict(
        &self,
        request: &PredictionRequest,
        cancel: CancellationToken,
    ) -> Result<PredictionQuote, ServiceError> {
        let token = self.stored_token()?;
        let url = self.endpoint("api/v1/predictions")?;

        cancellable(&cancel, async move {
            let response = self
                .client
                .post(url)
                .bearer_auth(&token)
                .json(request)
                .send()
                .await?;
            read_json(response).await
        })
        .await
    }
}

#[async_trait]
impl CatalogProvider for ApiClient {
    async fn cryptocurrencies(&self) -> Result<Vec<Cryptocurrency>, ServiceError> {
        let response = self
            .client
            .get(self.endpoint("api/v1/catalog/cryptocurrencies")?)
            .send()
            .await?;
        read_json(response).await
    }

    async fn models(&self) -> Result<Vec<AiModel>, ServiceError> {
        let response = self
            .client
            .get(self.endpoint("api/v1/catalog/models")?)
            .send()
            .await?;
        read_json(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::credentials::MemoryCredentialStore;

    fn client(base: &str) -> ApiClient {
        ApiClient::new(
            Url::parse(base).unwrap(),
            Arc::new(MemoryCredentialStore::new()),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn endpoints_resolve_against_base() {
        let api = client("https://predictor.example.com/");
        assert_eq!(
            api.endpoint("api/v1/predictions").unwrap().as_str(),
            "https://predictor.example.com/api/v1/predictions"
        );
    }

    #[test]
    fn endpoints_keep_the_base_path_prefix() {
        for base in [
            "https://host.example.com/predictor/",
            "https://host.example.com/predictor",
        ] {
            let api = client(base);
            assert_eq!(
                api.endpoint("api/v1/predictions").unwrap().as_str(),
                "https://host.example.com/predictor/api/v1/predictions"
            );
            assert_eq!(
                api.endpoint("api/auth/login").unwrap().as_str(),
                "https://host.example.com/predictor/api/auth/login"
            );
        }
    }

    #[test]
    fn bare_host_base_gets_root_endpoints() {
        let api = client("http://127.0.0.1:3000");
        assert_eq!(
            api.endpoint("api/v1/catalog/models").unwrap().as_str(),
            "http://127.0.0.1:3000/api/v1/catalog/models"
        );
    }

    #[tokio::test]
    async fn predict_without_session_is_unauthorized_before_any_io() {
        let api = client("http://127.0.0.1:9/");
        let request = PredictionRequest {
            cryptocurrency_id: "bitcoin".into(),
            model_id: "lstm".into(),
        };
        let result = api.predict(&request, CancellationToken::new()).await;
        assert_eq!(result, Err(ServiceError::Unauthorized));
    }
}
