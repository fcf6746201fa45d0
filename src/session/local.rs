//! Local recognition session — the geometric path.
//!
//! Consumes detection frames from the shared landmark source, scores each
//! pose against the letter dictionary, and republishes the latest
//! prediction for the UI layer. Per-frame state only; no history buffer.

use tracing::debug;

use crate::gesture::scorer::{GestureScorer, Prediction};
use crate::hand::landmark::HandPose;
use crate::hand::source::{DetectionFrame, FrameListener};

/// Session state for the local geometric recognition path.
pub struct RecognitionSession {
    scorer: GestureScorer,
    /// Minimum raw score for a candidate to surface.
    min_score: f32,
    running: bool,
    hand_detected: bool,
    prediction: Option<Prediction>,
    landmarks: Option<HandPose>,
    frames_seen: u64,
    frames_skipped: u64,
}

impl RecognitionSession {
    pub fn new(scorer: GestureScorer, min_score: f32) -> Self {
        Self {
            scorer,
            min_score,
            running: false,
            hand_detected: false,
            prediction: None,
            landmarks: None,
            frames_seen: 0,
            frames_skipped: 0,
        }
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    /// Stop the session and clear everything it publishes. A detection
    /// frame that completes after this is ignored.
    pub fn stop(&mut self) {
        self.running = false;
        self.hand_detected = false;
        self.prediction = None;
        self.landmarks = None;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Whether the most recent processed frame contained a hand.
    pub fn hand_detected(&self) -> bool {
        self.hand_detected
    }

    /// The current prediction, if any candidate cleared the threshold.
    pub fn prediction(&self) -> Option<&Prediction> {
        self.prediction.as_ref()
    }

    /// Landmarks of the most recent detected hand, for overlay rendering.
    pub fn landmarks(&self) -> Option<&HandPose> {
        self.landmarks.as_ref()
    }

    pub fn frames_skipped(&self) -> u64 {
        self.frames_skipped
    }
}

impl FrameListener for RecognitionSession {
    fn on_frame(&mut self, frame: &DetectionFrame) {
        if !self.running {
            // Late completion after stop() — must not resurrect the session.
            return;
        }
        self.frames_seen += 1;

        let detection = match &frame.hand {
            Some(detection) => detection,
            None => {
                // No hand is an empty result, not an error.
                self.hand_detected = false;
                self.prediction = None;
                self.landmarks = None;
                return;
            }
        };

        match self.scorer.estimate(&detection.pose, self.min_score) {
            Ok(matches) => {
                self.hand_detected = true;
                self.landmarks = Some(detection.pose.clone());
                self.prediction = matches.first().map(Prediction::from_match);
            }
            Err(e) => {
                // Malformed pose: skip the frame, publish nothing.
                self.frames_skipped += 1;
                self.prediction = None;
                self.landmarks = None;
                debug!(frame = self.frames_seen, "skipping frame: {e}");
            }
        }
    }
}

// ── Tests ──────────────────────────────────────────────────
