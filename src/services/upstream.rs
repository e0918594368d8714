use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};
use url::Url;

use crate::error::ServiceError;
use crate::services::http::{as_base, cancellable, read_json};
use crate::services::{PredictionQuote, PredictionRequest, PredictionService};

/// Client for the model-serving endpoint (`POST {base}/predict`).
pub struct UpstreamPredictionService {
    client: Client,
    endpoint: Url,
}

impl UpstreamPredictionService {
    pub fn new(base_url: &Url, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {}", e))?;
        let endpoint = as_base(base_url.clone())
            .join("predict")
            .map_err(|e| anyhow::anyhow!("Invalid prediction service URL {}: {}", base_url, e))?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl PredictionService for UpstreamPredictionService {
    async fn predict(
        &self,
        request: &PredictionRequest,
        cancel: CancellationToken,
    ) -> Result<PredictionQuote, ServiceError> {
        debug!(
            "Requesting prediction for {} with model {}",
            request.cryptocurrency_id, request.model_id
        );

        let result = cancellable(&cancel, async {
            let response = self
                .client
                .post(self.endpoint.clone())
                .json(request)
                .send()
                .await?;
            read_json::<PredictionQuote>(response).await
        })
        .await;

        if let Err(e) = &result {
            error!("Upstream prediction failed: {}", e);
        }
        result
    }
}
