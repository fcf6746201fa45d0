//! Shared landmark source — one detector instance, many consumers.
//!
//! The detector model is expensive to initialize, so recognition sessions
//! never own a private instance: they register as listeners on one shared
//! source and must unregister on stop. One detection request is outstanding
//! at a time; a tick that arrives while the previous one is in flight is
//! dropped, not queued, to bound worst-case latency.

use std::cell::RefCell;
use std::rc::Weak;

use thiserror::Error;
use tracing::debug;

use super::landmark::HandPose;

// ── Detection output ───────────────────────────────────────

/// Which hand the detector saw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handedness {
    Left,
    Right,
}

impl Handedness {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Left" | "left" => Some(Self::Left),
            "Right" | "right" => Some(Self::Right),
            _ => None,
        }
    }
}

/// One detected hand: its landmarks plus detector metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub pose: HandPose,
    /// Detector confidence in the detection itself (not the gesture).
    pub score: f32,
    pub handedness: Handedness,
}

/// The detector's output for one analyzed frame. At most one hand.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionFrame {
    pub hand: Option<Detection>,
}

impl DetectionFrame {
    pub fn empty() -> Self {
        Self { hand: None }
    }
}

// ── Detector seam ──────────────────────────────────────────

/// Detector backend failure.
#[derive(Error, Debug)]
pub enum DetectorError {
    #[error("hand detector failed: {0}")]
    Backend(String),
}

/// Anything that can analyze camera frames into hand detections.
///
/// The real model is an external collaborator; offline replay implements
/// this over recorded frames.
pub trait HandDetector {
    /// Analyze the next available frame. `Ok(None)` means the frame stream
    /// has ended.
    fn detect_next(&mut self) -> Result<Option<DetectionFrame>, DetectorError>;
}

/// Consumer of detection frames.
pub trait FrameListener {
    fn on_frame(&mut self, frame: &DetectionFrame);
}

// ── Shared source ──────────────────────────────────────────

/// The shared landmark source: one detector, a registry of listeners, and
/// the single-request-in-flight guard.
pub struct SharedLandmarkSource {
    detector: Box<dyn HandDetector>,
    listeners: Vec<(u64, Weak<RefCell<dyn FrameListener>>)>,
    next_listener_id: u64,
    in_flight: bool,
    dropped_ticks: u64,
    frames_dispatched: u64,
}

impl SharedLandmarkSource {
    pub fn new(detector: Box<dyn HandDetector>) -> Self {
        Self {
            detector,
            listeners: Vec::new(),
            next_listener_id: 1,
            in_flight: false,
            dropped_ticks: 0,
            frames_dispatched: 0,
        }
    }

    /// Register a listener; returns its id for later unregistration.
    /// Dropped listeners are also pruned automatically at dispatch.
    pub fn register(&mut self, listener: Weak<RefCell<dyn FrameListener>>) -> u64 {
        let id = self.next_listener_id;
        self.next_listener_id += 1;
        self.listeners.push((id, listener));
        debug!(listener = id, total = self.listeners.len(), "listener registered");
        id
    }

    /// Remove a listener. Returns true if it was registered.
    pub fn unregister(&mut self, id: u64) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() < before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Ticks dropped by the re-entrancy guard.
    pub fn dropped_ticks(&self) -> u64 {
        self.dropped_ticks
    }

    pub fn frames_dispatched(&self) -> u64 {
        self.frames_dispatched
    }

    /// Begin one detection tick. Returns false — the tick is dropped, not
    /// queued — while a prior request is still outstanding.
    pub fn request_frame(&mut self) -> bool {
        if self.in_flight {
            self.dropped_ticks += 1;
            debug!(dropped = self.dropped_ticks, "tick dropped: detection in flight");
            return false;
        }
        self.in_flight = true;
        true
    }

    /// Run the detector for the outstanding request and broadcast its
    /// result to every live listener. `Ok(None)` means the stream ended.
    pub fn detect_and_dispatch(&mut self) -> Result<Option<DetectionFrame>, DetectorError> {
        let result = self.detector.detect_next();
        self.in_flight = false;

        let frame = match result {
            Ok(Some(frame)) => frame,
            Ok(None) => return Ok(None),
            Err(e) => return Err(e),
        };

        self.frames_dispatched += 1;
        self.listeners.retain(|(id, weak)| match weak.upgrade() {
            Some(listener) => {
                listener.borrow_mut().on_frame(&frame);
                true
            }
            None => {
                debug!(listener = id, "pruning dropped listener");
                false
            }
        });

        Ok(Some(frame))
    }
}

// ── Tests ──────────────────────────────────────────────────
