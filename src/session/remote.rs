//! Remote recognition session — the image-classification path.
//!
//! Fires on a fixed timer while a hand is present, keeps exactly one
//! request in flight, and backs off when the remote model is cold. Runs
//! independently of the local geometric path and is not required to agree
//! with it. Completions are matched by request sequence number; stale or
//! post-stop completions are discarded.

use tracing::{debug, warn};

use crate::gesture::scorer::Prediction;
use crate::relay::http::RelayError;

/// Default firing interval (one capture per second).
pub const DEFAULT_INTERVAL_MS: f64 = 1000.0;

/// How long to skip remote attempts after a cold-start failure.
pub const COOLDOWN_MS: f64 = 15_000.0;

/// Timer/guard state machine for the remote classification path.
pub struct RemoteSession {
    running: bool,
    interval_ms: f64,
    elapsed_ms: f64,
    cooldown_remaining_ms: f64,
    next_seq: u64,
    in_flight: Option<u64>,
    prediction: Option<Prediction>,
    error: Option<String>,
    stale_discarded: u64,
}

impl RemoteSession {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            running: false,
            interval_ms,
            elapsed_ms: 0.0,
            cooldown_remaining_ms: 0.0,
            next_seq: 1,
            in_flight: None,
            prediction: None,
            error: None,
            stale_discarded: 0,
        }
    }

    pub fn start(&mut self) {
        self.running = true;
        self.elapsed_ms = 0.0;
    }

    /// Stop the timer and clear published state. In-flight requests may
    /// still complete; their results are discarded.
    pub fn stop(&mut self) {
        self.running = false;
        self.in_flight = None;
        self.prediction = None;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn prediction(&self) -> Option<&Prediction> {
        self.prediction.as_ref()
    }

    /// Current user-visible transient error, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn in_cooldown(&self) -> bool {
        self.cooldown_remaining_ms > 0.0
    }

    pub fn stale_discarded(&self) -> u64 {
        self.stale_discarded
    }

    /// Advance the timer by `dt_ms`. Returns the sequence number of a
    /// request to issue now, or None when nothing should fire (timer not
    /// elapsed, no hand, a request already in flight, or cooling down).
    pub fn tick(&mut self, dt_ms: f64, hand_present: bool) -> Option<u64> {
        if !self.running {
            return None;
        }
        self.cooldown_remaining_ms = (self.cooldown_remaining_ms - dt_ms).max(0.0);

        self.elapsed_ms += dt_ms;
        if self.elapsed_ms < self.interval_ms {
            return None;
        }
        // The timer fired; consume it whether or not a request goes out.
        self.elapsed_ms = 0.0;

        if !hand_present || self.in_flight.is_some() || self.in_cooldown() {
            return None;
        }

        let seq = self.next_seq;
        self.next_seq += 1;
        self.in_flight = Some(seq);
        debug!(seq, "remote classification request issued");
        Some(seq)
    }

    /// Deliver a successful classification for request `seq`.
    pub fn on_success(&mut self, seq: u64, prediction: Prediction) {
        if !self.accept(seq) {
            return;
        }
        self.prediction = Some(prediction);
        self.error = None;
    }

    /// Deliver a failed classification for request `seq`.
    pub fn on_failure(&mut self, seq: u64, error: &RelayError) {
        if !self.accept(seq) {
            return;
        }
        match error {
            RelayError::ColdStart { .. } => {
                self.cooldown_remaining_ms = COOLDOWN_MS;
                self.error = Some("Model is waking up. Retrying in a few seconds…".to_string());
                warn!("remote model cold start: cooling down for {COOLDOWN_MS} ms");
            }
            _ => {
                self.error = Some("Prediction failed. Please try again.".to_string());
                warn!("remote classification failed: {error}");
            }
        }
    }

    /// Whether a completion for `seq` should be applied. Completions after
    /// stop, or for anything but the single outstanding request, are stale.
    fn accept(&mut self, seq: u64) -> bool {
        if !self.running {
            debug!(seq, "discarding completion after stop");
            return false;
        }
        if self.in_flight != Some(seq) {
            self.stale_discarded += 1;
            debug!(seq, "discarding stale completion");
            return false;
        }
        self.in_flight = None;
        true
    }
}

// ── Tests ──────────────────────────────────────────────────
