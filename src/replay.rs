//! Offline replay of recorded detection frames.
//!
//! Reads the detector collaborator's wire shape from a JSON Lines file
//! (one analyzed frame per line) and drives the full local pipeline —
//! shared source, recognition session, word accumulation — exactly as the
//! host UI's frame callback would.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::rc::Rc;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::gesture::alphabet::alphabet;
use crate::gesture::scorer::GestureScorer;
use crate::hand::landmark::{HandPose, Landmark};
use crate::hand::source::{
    Detection, DetectionFrame, DetectorError, FrameListener, HandDetector, Handedness,
    SharedLandmarkSource,
};
use crate::session::local::RecognitionSession;
use crate::session::word::WordBuilder;

// ── Wire format ────────────────────────────────────────────

#[derive(Deserialize, Debug)]
struct LandmarkJson {
    x: f32,
    y: f32,
    z: f32,
}

#[derive(Deserialize, Debug)]
struct HandJson {
    handedness: String,
    score: f32,
    landmarks: Vec<LandmarkJson>,
}

#[derive(Deserialize, Debug)]
struct FrameJson {
    #[serde(default)]
    hands: Vec<HandJson>,
}

/// Load recorded detection frames from a JSON Lines file.
///
/// Unparseable lines are skipped with a warning; a frame whose landmark
/// count is wrong is kept as-is (the estimator rejects it per frame).
pub fn load_frames(path: &Path) -> Result<Vec<DetectionFrame>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let reader = BufReader::new(file);

    let mut frames = Vec::new();
    for (number, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("reading {}", path.display()))?;
        if line.trim().is_empty() {
            continue;
        }
        let parsed: FrameJson = match serde_json::from_str(&line) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(line = number + 1, "skipping unparseable frame: {e}");
                continue;
            }
        };
        frames.push(to_detection_frame(parsed));
    }
    Ok(frames)
}

fn to_detection_frame(frame: FrameJson) -> DetectionFrame {
    // At most one hand is tracked; mirror the detector and take the first.
    let hand = frame.hands.into_iter().next().map(|hand| Detection {
        pose: HandPose::new(
            hand.landmarks
                .iter()
                .map(|lm| Landmark::new(lm.x, lm.y, lm.z))
                .collect(),
        ),
        score: hand.score,
        handedness: Handedness::parse(&hand.handedness).unwrap_or(Handedness::Right),
    });
    DetectionFrame { hand }
}

// ── Replay detector ────────────────────────────────────────

/// Detector backend that replays recorded frames.
pub struct ReplayDetector {
    frames: VecDeque<DetectionFrame>,
}

impl ReplayDetector {
    pub fn new(frames: Vec<DetectionFrame>) -> Self {
        Self {
            frames: frames.into(),
        }
    }
}

impl HandDetector for ReplayDetector {
    fn detect_next(&mut self) -> Result<Option<DetectionFrame>, DetectorError> {
        Ok(self.frames.pop_front())
    }
}

// ── Driver ─────────────────────────────────────────────────

/// What a replay run produced.
#[derive(Debug)]
pub struct ReplaySummary {
    pub frames: u64,
    pub word: String,
}

/// Replay a recorded stream through the local recognition pipeline.
pub fn run(path: &Path, min_score: f32, hold_ms: f64, frame_interval_ms: f64) -> Result<ReplaySummary> {
    let frames = load_frames(path)?;
    info!(frames = frames.len(), "replaying recorded detection frames");

    let scorer = GestureScorer::new(alphabet()?);
    let session = Rc::new(RefCell::new(RecognitionSession::new(scorer, min_score)));
    session.borrow_mut().start();

    let mut source = SharedLandmarkSource::new(Box::new(ReplayDetector::new(frames)));
    let listener: Rc<RefCell<dyn FrameListener>> = session.clone();
    let listener_id = source.register(Rc::downgrade(&listener));

    let mut words = WordBuilder::new(hold_ms);
    let mut processed = 0u64;

    loop {
        if !source.request_frame() {
            break;
        }
        if source.detect_and_dispatch()?.is_none() {
            break;
        }
        processed += 1;

        let letter = {
            let session = session.borrow();
            match session.prediction() {
                Some(prediction) => {
                    debug!(
                        frame = processed,
                        letter = %prediction.letter,
                        confidence = prediction.confidence,
                        "prediction",
                    );
                    Some(prediction.letter)
                }
                None => {
                    debug!(frame = processed, hand = session.hand_detected(), "no prediction");
                    None
                }
            }
        };

        if let Some(committed) = words.observe(letter, frame_interval_ms) {
            info!(letter = %committed, word = words.word(), "letter committed");
        }
    }

    session.borrow_mut().stop();
    source.unregister(listener_id);

    Ok(ReplaySummary {
        frames: processed,
        word: words.word().to_string(),
    })
}

// ── Tests ──────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("fingerspell-{}-{name}", std::process::id()));
        let mut file = File::create(&path).expect("temp file");
        file.write_all(contents.as_bytes()).expect("write");
        path
    }

    /// One recorded frame with every landmark at the same point — enough
    /// for wire-format tests, not a meaningful pose.
    fn flat_frame_json() -> String {
        let lm = r#"{"x":0.5,"y":0.5,"z":0.0}"#;
        let landmarks = vec![lm; 21].join(",");
        format!(r#"{{"hands":[{{"handedness":"Right","score":0.97,"landmarks":[{landmarks}]}}]}}"#)
    }

    #[test]
    fn test_load_frames_parses_hands_and_empties() {
        let contents = format!("{}\n{{\"hands\":[]}}\n\n", flat_frame_json());
        let path = write_temp("load.jsonl", &contents);

        let frames = load_frames(&path).expect("load");
        assert_eq!(frames.len(), 2);
        let detection = frames[0].hand.as_ref().expect("a hand");
        assert!(detection.pose.is_complete());
        assert_eq!(detection.handedness, Handedness::Right);
        assert!((detection.score - 0.97).abs() < 1e-6);
        assert!(frames[1].hand.is_none());

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_frames_skips_garbage_lines() {
        let contents = format!("not json\n{}\n", flat_frame_json());
        let path = write_temp("garbage.jsonl", &contents);

        let frames = load_frames(&path).expect("load");
        assert_eq!(frames.len(), 1);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_replay_detector_ends_stream() {
        let mut detector = ReplayDetector::new(vec![DetectionFrame::empty()]);
        assert!(detector.detect_next().unwrap().is_some());
        assert!(detector.detect_next().unwrap().is_none());
    }

    #[test]
    fn test_run_processes_empty_frames_without_predictions() {
        let contents = "{\"hands\":[]}\n".repeat(5);
        let path = write_temp("run.jsonl", &contents);

        let summary = run(&path, 7.5, 800.0, 33.0).expect("run");
        assert_eq!(summary.frames, 5);
        assert_eq!(summary.word, "");

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_run_tolerates_malformed_landmark_counts() {
        // 3 landmarks instead of 21: skipped per frame, never a panic.
        let lm = r#"{"x":0.5,"y":0.5,"z":0.0}"#;
        let line = format!(
            r#"{{"hands":[{{"handedness":"Left","score":0.9,"landmarks":[{lm},{lm},{lm}]}}]}}"#
        );
        let path = write_temp("short.jsonl", &format!("{line}\n"));

        let summary = run(&path, 7.5, 800.0, 33.0).expect("run");
        assert_eq!(summary.frames, 1);
        assert_eq!(summary.word, "");

        std::fs::remove_file(path).ok();
    }
}
