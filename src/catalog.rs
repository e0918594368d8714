//! Catalogs
//!
//! Read-only enumerations of the cryptocurrencies and prediction models a user
//! may select. The backend serves the default catalog; the client loads it
//! through a [`CatalogProvider`] and validates selections against it.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::{ServiceError, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cryptocurrency {
    pub id: String,
    pub name: String,
    pub symbol: String,
    #[serde(default)]
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiModel {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Source of catalog entries. Lists are small and ordered.
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    async fn cryptocurrencies(&self) -> Result<Vec<Cryptocurrency>, ServiceError>;
    async fn models(&self) -> Result<Vec<AiModel>, ServiceError>;
}

/// A loaded snapshot of both catalogs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    pub cryptocurrencies: Vec<Cryptocurrency>,
    pub models: Vec<AiModel>,
}

impl Catalog {
    /// Load both lists concurrently from a provider.
    pub async fn load(provider: &dyn CatalogProvider) -> Result<Self, ServiceError> {
        let (cryptocurrencies, models) =
            futures::future::try_join(provider.cryptocurrencies(), provider.models()).await?;
        tracing::debug!(
            "Loaded catalog with {} cryptocurrencies and {} models",
            cryptocurrencies.len(),
            models.len()
        );
        Ok(Self {
            cryptocurrencies,
            models,
        })
    }

    pub fn cryptocurrency(&self, id: &str) -> Option<&Cryptocurrency> {
        self.cryptocurrencies.iter().find(|c| c.id == id)
    }

    pub fn model(&self, id: &str) -> Option<&AiModel> {
        self.models.iter().find(|m| m.id == id)
    }

    /// Check that both ids name catalog entries.
    pub fn validate(&self, cryptocurrency_id: &str, model_id: &str) -> Result<(), ValidationError> {
        if self.cryptocurrency(cryptocurrency_id).is_none() {
            return Err(ValidationError::UnknownCryptocurrency(
                cryptocurrency_id.to_string(),
            ));
        }
        if self.model(model_id).is_none() {
            return Err(ValidationError::UnknownModel(model_id.to_string()));
        }
        Ok(())
    }
}

static DEFAULT_CATALOG: Lazy<Catalog> = Lazy::new(|| {
    let crypto = |id: &str, name: &str, symbol: &str| Cryptocurrency {
        id: id.to_string(),
        name: name.to_string(),
        symbol: symbol.to_string(),
        image: String::new(),
    };
    let model = |id: &str, name: &str, description: &str| AiModel {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
    };

    Catalog {
        cryptocurrencies: vec![
            crypto("bitcoin", "Bitcoin", "BTC"),
            crypto("ethereum", "Ethereum", "ETH"),
            crypto("ripple", "Ripple", "XRP"),
            crypto("cardano", "Cardano", "ADA"),
            crypto("solana", "Solana", "SOL"),
        ],
        models: vec![
            model(
                "lstm",
                "LSTM Neural Network",
                "Long Short-Term Memory neural network for time series forecasting",
            ),
            model(
                "arima",
                "ARIMA",
                "AutoRegressive Integrated Moving Average for statistical analysis",
            ),
            model(
                "gru",
                "GRU",
                "Gated Recurrent Unit neural network for sequential data",
            ),
            model(
                "transformer",
                "Transformer",
                "Attention-based model for sequence modeling",
            ),
        ],
    }
});

/// The catalog served by the backend.
pub fn default_catalog() -> &'static Catalog {
    &DEFAULT_CATALOG
}

/// Provider backed by an in-process catalog.
#[derive(Debug, Clone)]
pub struct StaticCatalog {
    catalog: Catalog,
}

impl StaticCatalog {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }
}

impl Default for StaticCatalog {
    fn default() -> Self {
        Self::new(default_catalog().clone())
    }
}

#[async_trait]
impl CatalogProvider for StaticCatalog {
    async fn cryptocurrencies(&self) -> Result<Vec<Cryptocurrency>, ServiceError> {
        Ok(self.catalog.cryptocurrencies.clone())
    }

    async fn models(&self) -> Result<Vec<AiModel>, ServiceError> {
        Ok(self.catalog.models.clone())
    }
}
