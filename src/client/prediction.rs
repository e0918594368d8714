//! Prediction Request Engine
//!
//! Drives one user-initiated prediction request at a time:
//! `Idle → Submitting → Succeeded | Failed`, re-entering `Submitting` on a new
//! submit. Each submit gets a new generation number; a response is applied
//! only while its generation is still current, so `reset()`, `cancel()`, and
//! engine teardown silently discard late answers.
//!
//! The engine owns the request timeout. Prices and confidences are opaque: it
//! only range-checks what the service returns.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::catalog::Catalog;
use crate::error::{PredictionError, ValidationError};
use crate::services::{PredictionQuote, PredictionRequest, PredictionService};

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionField {
    Cryptocurrency,
    Model,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub cryptocurrency_id: String,
    pub model_id: String,
}

impl Selection {
    pub fn is_complete(&self) -> bool {
        !self.cryptocurrency_id.trim().is_empty() && !self.model_id.trim().is_empty()
    }

    fn request(&self) -> PredictionRequest {
        PredictionRequest {
            cryptocurrency_id: self.cryptocurrency_id.trim().to_string(),
            model_id: self.model_id.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PredictionStatus {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

/// A validated prediction ready for display
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    pub cryptocurrency: String,
    pub model: String,
    pub predicted_price: f64,
    pub confidence: u8,
    pub timestamp: DateTime<Utc>,
}

impl Prediction {
    fn from_quote(request: &PredictionRequest, quote: PredictionQuote) -> Self {
        Self {
            cryptocurrency: request.cryptocurrency_id.clone(),
            model: request.model_id.clone(),
            predicted_price: quote.predicted_price,
            confidence: quote.confidence,
            timestamp: quote.timestamp,
        }
    }
}

/// Snapshot published to subscribers.
///
/// `result` is the last successful prediction. It stays visible while a
/// follow-up request is `Submitting` and is replaced only once that request
/// settles; it is `None` when `Idle` or `Failed`. `error` is present iff `Failed`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PredictionState {
    pub selection: Selection,
    pub status: PredictionStatus,
    pub result: Option<Prediction>,
    pub error: Option<PredictionError>,
    /// Generation of the most recent submit; bumped again on reset/cancel
    pub generation: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A request was issued under this generation
    Started { generation: u64 },
    /// Incomplete selection or a request already in flight; nothing changed
    Ignored,
    /// Selection names something outside the catalog; nothing changed
    Rejected(ValidationError),
}

pub struct PredictionEngine {
    service: Arc<dyn PredictionService>,
    catalog: Catalog,
    timeout: Duration,
    state: Arc<watch::Sender<PredictionState>>,
    in_flight: Mutex<Option<CancellationToken>>,
}

impl PredictionEngine {
    pub fn new(service: Arc<dyn PredictionService>, catalog: Catalog, timeout: Duration) -> Self {
        let (state, _) = watch::channel(PredictionState::default());
        Self {
            service,
            catalog,
            timeout,
            state: Arc::new(state),
            in_flight: Mutex::new(None),
        }
    }

    pub fn state(&self) -> PredictionState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<PredictionState> {
        self.state.subscribe()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Update one selection field. Never affects a request already in flight.
    pub fn set_selection(&self, field: SelectionField, value: impl Into<String>) {
        let value = value.into();
        self.state.send_if_modified(|state| {
            let slot = match field {
                SelectionField::Cryptocurrency => &mut state.selection.cryptocurrency_id,
                SelectionField::Model => &mut state.selection.model_id,
            };
            if *slot == value {
                return false;
            }
            *slot = value;
            true
        });
    }

    /// Issue a prediction request for the current selection.
    ///
    /// Must be called from within a Tokio runtime; the request runs on a
    /// spawned task and settles the published state when it resolves.
    pub fn submit(&self) -> SubmitOutcome {
        let mut outcome = SubmitOutcome::Ignored;
        let mut issued = None;

        self.state.send_if_modified(|state| {
            if state.status == PredictionStatus::Submitting || !state.selection.is_complete() {
                return false;
            }
            let request = state.selection.request();
            if let Err(e) = self
                .catalog
                .validate(&request.cryptocurrency_id, &request.model_id)
            {
                outcome = SubmitOutcome::Rejected(e);
                return false;
            }

            state.generation += 1;
            state.status = PredictionStatus::Submitting;
            state.error = None;
            outcome = SubmitOutcome::Started {
                generation: state.generation,
            };
            issued = Some((state.generation, request));
            true
        });

        let Some((generation, request)) = issued else {
            debug!("Submit ignored: {:?}", outcome);
            return outcome;
        };

        let cancel = CancellationToken::new();
        if let Some(previous) = self.in_flight.lock().replace(cancel.clone()) {
            previous.cancel();
        }

        info!(
            "Submitting prediction #{} for {} with model {}",
            generation, request.cryptocurrency_id, request.model_id
        );
        tokio::spawn(run_request(
            Arc::clone(&self.service),
            Arc::clone(&self.state),
            request,
            generation,
            cancel,
            self.timeout,
        ));
        outcome
    }

    /// Back to `Idle`, dropping result and error. Any in-flight answer is discarded.
    pub fn reset(&self) {
        self.abandon_in_flight();
        self.state.send_modify(|state| {
            state.generation += 1;
            state.status = PredictionStatus::Idle;
            state.result = None;
            state.error = None;
        });
    }

    /// Abandon the in-flight request without disturbing what is displayed.
    /// A visible previous result stays `Succeeded`; otherwise the engine is `Idle`.
    pub fn cancel(&self) {
        self.abandon_in_flight();
        self.state.send_if_modified(|state| {
            if state.status != PredictionStatus::Submitting {
                return false;
            }
            state.generation += 1;
            state.status = if state.result.is_some() {
                PredictionStatus::Succeeded
            } else {
                PredictionStatus::Idle
            };
            true
        });
    }

    /// Wait until no request is in flight and return that state
    pub async fn settled(&self) -> PredictionState {
        let mut rx = self.state.subscribe();
        let settled = rx
            .wait_for(|state| state.status != PredictionStatus::Submitting)
            .await
            .map(|state| state.clone());
        settled.unwrap_or_else(|_| self.state())
    }

    fn abandon_in_flight(&self) {
        if let Some(token) = self.in_flight.lock().take() {
            token.cancel();
        }
    }
}

impl Drop for PredictionEngine {
    fn drop(&mut self) {
        self.abandon_in_flight();
    }
}

async fn run_request(
    service: Arc<dyn PredictionService>,
    state: Arc<watch::Sender<PredictionState>>,
    request: PredictionRequest,
    generation: u64,
    cancel: CancellationToken,
    timeout: Duration,
) {
    let outcome = tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            debug!("Prediction #{} abandoned", generation);
            return;
        }
        answer = tokio::time::timeout(timeout, service.predict(&request, cancel.clone())) => {
            match answer {
                Err(_) => Err(PredictionError::Timeout),
                Ok(Err(e)) => Err(PredictionError::from(e)),
                Ok(Ok(quote)) => match quote.validate() {
                    Ok(()) => Ok(Prediction::from_quote(&request, quote)),
                    Err(detail) => Err(PredictionError::MalformedResponse(detail)),
                },
            }
        }
    };

    let applied = state.send_if_modified(|state| {
        if state.generation != generation || state.status != PredictionStatus::Submitting {
            return false;
        }
        match outcome {
            Ok(prediction) => {
                info!(
                    "Prediction #{} succeeded: {} via {} at {:.2} ({}% confidence)",
                    generation,
                    prediction.cryptocurrency,
                    prediction.model,
                    prediction.predicted_price,
                    prediction.confidence
                );
                state.status = PredictionStatus::Succeeded;
                state.result = Some(prediction);
                state.error = None;
            }
            Err(e) => {
                warn!("Prediction #{} failed: {:?}", generation, e);
                state.status = PredictionStatus::Failed;
                state.result = None;
                state.error = Some(e);
            }
        }
        true
    });

    if !applied {
        debug!("Discarded stale answer for prediction #{}", generation);
    }
}
