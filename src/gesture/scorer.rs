//! Pose-against-dictionary scoring and candidate ranking.
//!
//! Every letter is scored over ten slots — five finger-curl and five
//! finger-direction — each worth at most 1.0, so the theoretical maximum is
//! a constant 10.0 for every letter and raw scores are comparable without
//! per-letter normalization. A constrained slot is worth the best of its
//! OR'd alternatives; an unconstrained slot is worth a fixed neutral 1.0.
//! Pure function of (pose, dictionary, threshold): no I/O, no hidden state.

use std::cmp::Ordering;

use crate::hand::estimator::{estimate_pose, CurlState, Direction, EstimateError, PoseEstimate};
use crate::hand::landmark::{HandPose, FINGERS};

use super::description::{GestureDescription, GestureDictionary};

// ── Scoring constants ──────────────────────────────────────

/// Theoretical maximum raw score; also the confidence normalization divisor.
pub const MAX_SCORE: f32 = 10.0;

/// Default minimum raw score for a candidate to survive.
pub const DEFAULT_MIN_SCORE: f32 = 7.5;

/// Worth of a slot the description leaves unconstrained.
const NEUTRAL_SLOT: f32 = 1.0;

/// Curl agreement for a neighboring state (no↔half, half↔full).
const CURL_ADJACENT_AGREEMENT: f32 = 0.5;

/// Curl agreement for the opposite state (no↔full).
const CURL_OPPOSITE_AGREEMENT: f32 = 0.1;

/// Direction agreement factor for a 45°-adjacent compass direction.
const DIRECTION_ADJACENT_FACTOR: f32 = 0.5;

// ── Results ────────────────────────────────────────────────

/// One ranked candidate from a single frame.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureMatch {
    pub letter: char,
    /// Raw score in [0, 10].
    pub score: f32,
}

/// The display-facing prediction: top candidate with normalized confidence.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    /// Single uppercase letter.
    pub letter: char,
    /// Normalized confidence in [0, 1].
    pub confidence: f32,
}

impl Prediction {
    /// Normalize a raw match into a prediction (score / 10).
    pub fn from_match(m: &GestureMatch) -> Self {
        Self {
            letter: m.letter,
            confidence: m.score / MAX_SCORE,
        }
    }
}

// ── Scorer ─────────────────────────────────────────────────

/// Scores hand poses against an immutable letter dictionary.
pub struct GestureScorer {
    dictionary: GestureDictionary,
}

impl GestureScorer {
    pub fn new(dictionary: GestureDictionary) -> Self {
        Self { dictionary }
    }

    pub fn dictionary(&self) -> &GestureDictionary {
        &self.dictionary
    }

    /// Score a pose against every letter and rank the survivors.
    ///
    /// Candidates below `min_score` are discarded. Survivors sort by score
    /// descending; ties break to the description with more constraints (a
    /// fully specified letter beats a subset match), then to dictionary
    /// declaration order.
    pub fn estimate(
        &self,
        pose: &HandPose,
        min_score: f32,
    ) -> Result<Vec<GestureMatch>, EstimateError> {
        let estimate = estimate_pose(pose)?;

        let descriptions = self.dictionary.descriptions();
        let mut ranked: Vec<(usize, f32)> = Vec::with_capacity(descriptions.len());
        for (index, description) in descriptions.iter().enumerate() {
            let score = score_description(description, &estimate);
            if score >= min_score {
                ranked.push((index, score));
            }
        }

        ranked.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| {
                    descriptions[b.0]
                        .constraint_count()
                        .cmp(&descriptions[a.0].constraint_count())
                })
                .then_with(|| a.0.cmp(&b.0))
        });

        Ok(ranked
            .into_iter()
            .map(|(index, score)| GestureMatch {
                letter: descriptions[index].letter(),
                score,
            })
            .collect())
    }
}

/// Sum the ten slot contributions for one description.
fn score_description(description: &GestureDescription, estimate: &PoseEstimate) -> f32 {
    let mut score = 0.0;
    for finger in FINGERS {
        let observed = estimate.finger(finger);

        let curls = description.curls(finger);
        if curls.is_empty() {
            score += NEUTRAL_SLOT;
        } else {
            score += curls
                .iter()
                .map(|c| 1.0 - c.weight * (1.0 - curl_agreement(c.state, observed.curl)))
                .fold(f32::MIN, f32::max);
        }

        let directions = description.directions(finger);
        if directions.is_empty() {
            score += NEUTRAL_SLOT;
        } else {
            score += directions
                .iter()
                .map(|d| {
                    let agreement = direction_agreement(
                        d.direction,
                        observed.direction,
                        observed.direction_confidence,
                    );
                    1.0 - d.weight * (1.0 - agreement)
                })
                .fold(f32::MIN, f32::max);
        }
    }
    score
}

/// Agreement between an expected and observed curl state. Neighboring
/// states cost less than opposite ones.
fn curl_agreement(expected: CurlState, observed: CurlState) -> f32 {
    match expected.rank().abs_diff(observed.rank()) {
        0 => 1.0,
        1 => CURL_ADJACENT_AGREEMENT,
        _ => CURL_OPPOSITE_AGREEMENT,
    }
}

/// Agreement between an expected and observed direction, weighted by the
/// estimator's confidence in the observation.
fn direction_agreement(expected: Direction, observed: Direction, confidence: f32) -> f32 {
    match expected.compass_distance(observed) {
        0 => confidence,
        1 => DIRECTION_ADJACENT_FACTOR * confidence,
        _ => 0.0,
    }
}

// ── Tests ──────────────────────────────────────────────────
