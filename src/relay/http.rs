//! Relay to the remote classification endpoint.
//!
//! Owns everything the gesture core must never do: the HTTP POST, the
//! retry-on-cold-start policy, and normalization of the two response shapes
//! the upstream model is known to produce. The `Classifier` trait is the
//! seam the remote session drives, so tests can substitute a stub.

use std::thread;
use std::time::Duration;

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::gesture::scorer::Prediction;

/// Maximum retries after a 503 before giving up.
pub const MAX_RETRIES: u32 = 5;

/// Linear backoff step: sleep this × attempt number between retries.
pub const BACKOFF_STEP: Duration = Duration::from_secs(3);

/// Suggested delay before the caller tries again after a cold start.
pub const SUGGESTED_RETRY_SECS: u64 = 15;

/// Default confidence when the upstream omits one alongside a letter.
const DEFAULT_CONFIDENCE: f32 = 0.9;

// ── Errors ─────────────────────────────────────────────────

/// Remote classification failure, after any retrying has happened.
#[derive(Error, Debug)]
pub enum RelayError {
    #[error("model endpoint still warming up after {attempts} attempts; retry in {retry_after_secs} s")]
    ColdStart { attempts: u32, retry_after_secs: u64 },

    #[error("model endpoint returned HTTP {status}")]
    Http { status: u16 },

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("malformed model response: {0}")]
    MalformedResponse(String),
}

// ── Classifier seam ────────────────────────────────────────

/// Anything that can turn an encoded frame into a prediction.
pub trait Classifier {
    fn classify(&mut self, image_data: &str) -> Result<Prediction, RelayError>;
}

// ── HTTP relay ─────────────────────────────────────────────

/// The real relay: POSTs the encoded frame to the configured endpoint.
pub struct HttpRelay {
    agent: ureq::Agent,
    endpoint: String,
    max_retries: u32,
    backoff_step: Duration,
}

impl HttpRelay {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            agent: ureq::AgentBuilder::new()
                .timeout(Duration::from_secs(30))
                .build(),
            endpoint: endpoint.into(),
            max_retries: MAX_RETRIES,
            backoff_step: BACKOFF_STEP,
        }
    }
}

impl Classifier for HttpRelay {
    fn classify(&mut self, image_data: &str) -> Result<Prediction, RelayError> {
        let body = serde_json::json!({ "image": image_data });

        let mut attempt = 0u32;
        loop {
            attempt += 1;
            match self
                .agent
                .post(&self.endpoint)
                .set("Content-Type", "application/json")
                .send_json(&body)
            {
                Ok(response) => {
                    let value: Value = response
                        .into_json()
                        .map_err(|e| RelayError::MalformedResponse(e.to_string()))?;
                    debug!(attempt, "model response received");
                    return normalize_prediction(&value)
                        .ok_or_else(|| RelayError::MalformedResponse(value.to_string()));
                }
                Err(ureq::Error::Status(503, _)) if attempt <= self.max_retries => {
                    // Cold start: the endpoint is loading the model.
                    let backoff = self.backoff_step * attempt;
                    warn!(attempt, "model endpoint warming up (503); retrying in {backoff:?}");
                    thread::sleep(backoff);
                }
                Err(ureq::Error::Status(503, _)) => {
                    return Err(RelayError::ColdStart {
                        attempts: attempt,
                        retry_after_secs: SUGGESTED_RETRY_SECS,
                    });
                }
                Err(ureq::Error::Status(status, _)) => {
                    return Err(RelayError::Http { status });
                }
                Err(e) => return Err(RelayError::Transport(e.to_string())),
            }
        }
    }
}

// ── Response normalization ─────────────────────────────────

/// Accept either of the shapes the upstream is known to produce:
/// `{"letter": "A", "confidence": 0.97}` (confidence optional) or a raw
/// `[{"label": "A", "score": 0.97}, …]` array. Anything else is malformed.
pub fn normalize_prediction(value: &Value) -> Option<Prediction> {
    if let Some(letter) = value.get("letter").and_then(Value::as_str) {
        let letter = letter.chars().next()?.to_ascii_uppercase();
        let confidence = value
            .get("confidence")
            .and_then(Value::as_f64)
            .map(|c| c as f32)
            .unwrap_or(DEFAULT_CONFIDENCE);
        return Some(Prediction { letter, confidence });
    }

    if let Some(first) = value.as_array().and_then(|a| a.first()) {
        let label = first.get("label").and_then(Value::as_str)?;
        let letter = label.chars().next()?.to_ascii_uppercase();
        let confidence = first
            .get("score")
            .and_then(Value::as_f64)
            .map(|s| s as f32)
            .unwrap_or(0.0);
        return Some(Prediction { letter, confidence });
    }

    None
}

// ── Tests ──────────────────────────────────────────────────
