//! Per-finger curl and pointing-direction estimation.
//!
//! Converts one hand pose into, for every finger, a discretized curl state
//! and a compass pointing direction, each with a continuous confidence.
//! Pure geometry; no detector or dictionary knowledge.

use thiserror::Error;

use super::landmark::{Finger, HandPose, Landmark, FINGERS, LANDMARK_COUNT};

// ── Curl breakpoints ───────────────────────────────────────

/// Total bend below this is no curl (degrees).
const NO_CURL_MAX_DEG: f32 = 60.0;

/// Total bend below this (and above the no-curl limit) is half curl.
const HALF_CURL_MAX_DEG: f32 = 130.0;

/// Bend at which full curl saturates to confidence 1.0.
const FULL_CURL_SAT_DEG: f32 = 200.0;

/// Canonical half-curl angle (center of the half-curl band).
const HALF_CURL_CENTER_DEG: f32 = 95.0;

// ── Curl state ─────────────────────────────────────────────

/// Discretized bend amount of a finger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CurlState {
    NoCurl,
    HalfCurl,
    FullCurl,
}

impl CurlState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoCurl => "no-curl",
            Self::HalfCurl => "half-curl",
            Self::FullCurl => "full-curl",
        }
    }

    /// Ordinal rank (0-2) for adjacency comparisons.
    pub fn rank(&self) -> u8 {
        *self as u8
    }
}

// ── Direction ──────────────────────────────────────────────

/// Compass pointing direction of a finger in the image plane.
/// Image y grows downward, so vertical-up is (0, -1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    VerticalUp,
    DiagonalUpRight,
    HorizontalRight,
    DiagonalDownRight,
    VerticalDown,
    DiagonalDownLeft,
    HorizontalLeft,
    DiagonalUpLeft,
}

/// All compass directions, clockwise from vertical-up.
pub const DIRECTIONS: [Direction; 8] = [
    Direction::VerticalUp,
    Direction::DiagonalUpRight,
    Direction::HorizontalRight,
    Direction::DiagonalDownRight,
    Direction::VerticalDown,
    Direction::DiagonalDownLeft,
    Direction::HorizontalLeft,
    Direction::DiagonalUpLeft,
];

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VerticalUp => "vertical-up",
            Self::DiagonalUpRight => "diagonal-up-right",
            Self::HorizontalRight => "horizontal-right",
            Self::DiagonalDownRight => "diagonal-down-right",
            Self::VerticalDown => "vertical-down",
            Self::DiagonalDownLeft => "diagonal-down-left",
            Self::HorizontalLeft => "horizontal-left",
            Self::DiagonalUpLeft => "diagonal-up-left",
        }
    }

    /// Position on the 8-step compass ring, clockwise from vertical-up.
    pub fn compass_index(&self) -> u8 {
        *self as u8
    }

    /// Unit reference vector in image-plane coordinates.
    pub fn unit(&self) -> (f32, f32) {
        const D: f32 = std::f32::consts::FRAC_1_SQRT_2;
        match self {
            Self::VerticalUp => (0.0, -1.0),
            Self::DiagonalUpRight => (D, -D),
            Self::HorizontalRight => (1.0, 0.0),
            Self::DiagonalDownRight => (D, D),
            Self::VerticalDown => (0.0, 1.0),
            Self::DiagonalDownLeft => (-D, D),
            Self::HorizontalLeft => (-1.0, 0.0),
            Self::DiagonalUpLeft => (-D, -D),
        }
    }

    /// Steps between two directions on the compass ring (0-4).
    pub fn compass_distance(&self, other: Direction) -> u8 {
        let diff = (self.compass_index() as i8 - other.compass_index() as i8).unsigned_abs();
        diff.min(8 - diff)
    }
}

// ── Estimates ──────────────────────────────────────────────

/// Curl and direction estimate for a single finger.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FingerEstimate {
    pub curl: CurlState,
    /// Confidence in the curl state (0.5 at a breakpoint, 1.0 at the
    /// canonical angle).
    pub curl_confidence: f32,
    pub direction: Direction,
    /// Cosine similarity to the winning reference direction, clamped to
    /// [0, 1]. Zero for a degenerate (zero-length) finger vector.
    pub direction_confidence: f32,
}

/// Per-finger estimates for one hand pose.
#[derive(Debug, Clone, PartialEq)]
pub struct PoseEstimate {
    fingers: [FingerEstimate; 5],
}

impl PoseEstimate {
    pub fn finger(&self, finger: Finger) -> &FingerEstimate {
        &self.fingers[finger.index()]
    }
}

/// Estimation failure for one frame.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EstimateError {
    #[error("malformed hand pose: expected {expected} landmarks, got {got}")]
    MalformedPose { expected: usize, got: usize },
}

// ── Estimation ─────────────────────────────────────────────

/// Estimate curl and direction for every finger of a pose.
///
/// Fails (without panicking) when the pose does not carry the full 21-point
/// topology; the caller skips the frame.
pub fn estimate_pose(pose: &HandPose) -> Result<PoseEstimate, EstimateError> {
    if !pose.is_complete() {
        return Err(EstimateError::MalformedPose {
            expected: LANDMARK_COUNT,
            got: pose.len(),
        });
    }

    let mut fingers = [FingerEstimate {
        curl: CurlState::NoCurl,
        curl_confidence: 0.0,
        direction: Direction::VerticalUp,
        direction_confidence: 0.0,
    }; 5];

    for finger in FINGERS {
        let chain = finger.curl_chain();
        let root = pose.point(chain[0]);
        let proximal = pose.point(chain[1]);
        let intermediate = pose.point(chain[2]);
        let tip = pose.point(chain[3]);

        // Two internal bend angles along the chain.
        let bend = angle_between(sub(proximal, root), sub(intermediate, proximal))
            + angle_between(sub(intermediate, proximal), sub(tip, intermediate));
        let (curl, curl_confidence) = curl_from_bend(bend);

        let base = pose.point(finger.base());
        let (direction, direction_confidence) = direction_from_segment(base, pose.point(finger.tip()));

        fingers[finger.index()] = FingerEstimate {
            curl,
            curl_confidence,
            direction,
            direction_confidence,
        };
    }

    Ok(PoseEstimate { fingers })
}

/// Map total bend (degrees) to a curl state and confidence.
///
/// Confidence is 1.0 at the canonical angle for the state and decays
/// linearly to 0.5 at the breakpoint to a neighboring state.
fn curl_from_bend(total_deg: f32) -> (CurlState, f32) {
    if total_deg < NO_CURL_MAX_DEG {
        let confidence = 1.0 - (total_deg / NO_CURL_MAX_DEG) * 0.5;
        (CurlState::NoCurl, confidence)
    } else if total_deg < HALF_CURL_MAX_DEG {
        let half_span = (HALF_CURL_MAX_DEG - NO_CURL_MAX_DEG) / 2.0;
        let confidence = 1.0 - ((total_deg - HALF_CURL_CENTER_DEG).abs() / half_span) * 0.5;
        (CurlState::HalfCurl, confidence)
    } else if total_deg >= FULL_CURL_SAT_DEG {
        (CurlState::FullCurl, 1.0)
    } else {
        let span = FULL_CURL_SAT_DEG - HALF_CURL_MAX_DEG;
        let confidence = 1.0 - ((FULL_CURL_SAT_DEG - total_deg) / span) * 0.5;
        (CurlState::FullCurl, confidence)
    }
}

/// Classify the base→tip segment against the 8 reference directions.
fn direction_from_segment(base: Landmark, tip: Landmark) -> (Direction, f32) {
    let dx = tip.x - base.x;
    let dy = tip.y - base.y;
    let len = (dx * dx + dy * dy).sqrt();
    if len <= f32::EPSILON {
        return (Direction::VerticalUp, 0.0);
    }
    let (nx, ny) = (dx / len, dy / len);

    let mut best = Direction::VerticalUp;
    let mut best_cos = f32::MIN;
    for dir in DIRECTIONS {
        let (rx, ry) = dir.unit();
        let cos = nx * rx + ny * ry;
        if cos > best_cos {
            best_cos = cos;
            best = dir;
        }
    }
    (best, best_cos.clamp(0.0, 1.0))
}

// ── Vector helpers ─────────────────────────────────────────

fn sub(a: Landmark, b: Landmark) -> [f32; 3] {
    [a.x - b.x, a.y - b.y, a.z - b.z]
}

fn norm(v: [f32; 3]) -> f32 {
    (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
}

/// Angle between two 3D vectors in degrees. Zero for degenerate input.
fn angle_between(u: [f32; 3], v: [f32; 3]) -> f32 {
    let nu = norm(u);
    let nv = norm(v);
    if nu <= f32::EPSILON || nv <= f32::EPSILON {
        return 0.0;
    }
    let cos = ((u[0] * v[0] + u[1] * v[1] + u[2] * v[2]) / (nu * nv)).clamp(-1.0, 1.0);
    cos.acos().to_degrees()
}

// ── Synthetic pose construction (test support) ─────────────

/// Rotate a 2D unit vector by `deg` degrees.
#[cfg(test)]
fn rotate(v: (f32, f32), deg: f32) -> (f32, f32) {
    let (sin, cos) = deg.to_radians().sin_cos();
    (v.0 * cos - v.1 * sin, v.0 * sin + v.1 * cos)
}

/// Build one finger's joints along `direction` with the bend angles that
/// produce `curl`: straight for no-curl, one 100° bend for half, two for full.
#[cfg(test)]
fn synth_finger(wrist: Landmark, finger: Finger, curl: CurlState, direction: Direction) -> [Landmark; 4] {
    let d = direction.unit();
    let (bend1, bend2) = match curl {
        CurlState::NoCurl => (0.0, 0.0),
        CurlState::HalfCurl => (0.0, 100.0),
        CurlState::FullCurl => (100.0, 100.0),
    };
    let seg1 = rotate(d, bend1);
    let seg2 = rotate(d, bend1 + bend2);

    // Root: the wrist itself for fingers, an offset CMC for the thumb.
    let root = match finger {
        Finger::Thumb => Landmark::new(wrist.x + d.0 * 0.06, wrist.y + d.1 * 0.06, 0.0),
        _ => wrist,
    };
    let proximal = Landmark::new(root.x + d.0 * 0.20, root.y + d.1 * 0.20, 0.0);
    let intermediate = Landmark::new(proximal.x + seg1.0 * 0.08, proximal.y + seg1.1 * 0.08, 0.0);
    let tip = Landmark::new(intermediate.x + seg2.0 * 0.07, intermediate.y + seg2.1 * 0.07, 0.0);
    [root, proximal, intermediate, tip]
}

/// Build a complete 21-point pose from per-finger (curl, direction) specs,
/// thumb through pinky. Geometry is schematic: each finger satisfies its
/// own curl/direction exactly; palm layout is not anatomically constrained.
#[cfg(test)]
pub(crate) fn synth_pose(specs: [(CurlState, Direction); 5]) -> HandPose {
    let wrist = Landmark::new(0.5, 0.85, 0.0);
    let mut points = vec![wrist; LANDMARK_COUNT];

    for finger in FINGERS {
        let (curl, direction) = specs[finger.index()];
        let joints = synth_finger(wrist, finger, curl, direction);
        let chain = finger.curl_chain();
        match finger {
            Finger::Thumb => {
                // CMC, MCP, IP, TIP map directly onto the chain.
                for (i, id) in chain.iter().enumerate() {
                    points[id.index()] = joints[i];
                }
            }
            _ => {
                // Chain skips the DIP; fill it halfway between PIP and TIP.
                points[chain[1].index()] = joints[1];
                points[chain[2].index()] = joints[2];
                points[chain[3].index()] = joints[3];
                let dip_index = chain[2].index() + 1;
                points[dip_index] = Landmark::new(
                    (joints[2].x + joints[3].x) / 2.0,
                    (joints[2].y + joints[3].y) / 2.0,
                    0.0,
                );
            }
        }
    }

    HandPose::new(points)
}

// ── Tests ──────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_curl_breakpoints() {
        assert_eq!(curl_from_bend(0.0).0, CurlState::NoCurl);
        assert_eq!(curl_from_bend(59.9).0, CurlState::NoCurl);
        assert_eq!(curl_from_bend(60.0).0, CurlState::HalfCurl);
        assert_eq!(curl_from_bend(129.9).0, CurlState::HalfCurl);
        assert_eq!(curl_from_bend(130.0).0, CurlState::FullCurl);
        assert_eq!(curl_from_bend(250.0).0, CurlState::FullCurl);
    }

    #[test]
    fn test_curl_monotonic_no_skips() {
        // Sweeping the bend from straight to fully bent must pass through
        // the states in order without skipping back.
        let mut prev_rank = 0u8;
        let mut deg = 0.0f32;
        while deg <= 240.0 {
            let (state, confidence) = curl_from_bend(deg);
            assert!(state.rank() >= prev_rank, "rank regressed at {deg}°");
            assert!(state.rank() - prev_rank <= 1, "state skipped at {deg}°");
            assert!((0.5..=1.0).contains(&confidence), "confidence out of band at {deg}°");
            prev_rank = state.rank();
            deg += 1.0;
        }
        assert_eq!(prev_rank, CurlState::FullCurl.rank());
    }

    #[test]
    fn test_curl_confidence_peaks_at_canonical_angles() {
        assert!(curl_from_bend(0.0).1 > curl_from_bend(55.0).1);
        assert!(curl_from_bend(95.0).1 > curl_from_bend(65.0).1);
        assert!(curl_from_bend(95.0).1 > curl_from_bend(125.0).1);
        assert!(curl_from_bend(210.0).1 > curl_from_bend(135.0).1);
        assert!((curl_from_bend(95.0).1 - 1.0).abs() < 1e-6);
        assert!((curl_from_bend(210.0).1 - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_direction_cardinal_and_diagonal() {
        let base = Landmark::new(0.5, 0.5, 0.0);
        for dir in DIRECTIONS {
            let (dx, dy) = dir.unit();
            let tip = Landmark::new(0.5 + dx * 0.2, 0.5 + dy * 0.2, 0.0);
            let (estimated, confidence) = direction_from_segment(base, tip);
            assert_eq!(estimated, dir, "expected {:?}", dir);
            assert!(confidence > 0.99, "confidence {} for {:?}", confidence, dir);
        }
    }

    #[test]
    fn test_direction_degenerate_segment() {
        let p = Landmark::new(0.5, 0.5, 0.0);
        let (_, confidence) = direction_from_segment(p, p);
        assert_eq!(confidence, 0.0);
    }

    #[test]
    fn test_compass_distance() {
        assert_eq!(Direction::VerticalUp.compass_distance(Direction::VerticalUp), 0);
        assert_eq!(Direction::VerticalUp.compass_distance(Direction::DiagonalUpLeft), 1);
        assert_eq!(Direction::VerticalUp.compass_distance(Direction::DiagonalUpRight), 1);
        assert_eq!(Direction::VerticalUp.compass_distance(Direction::VerticalDown), 4);
        assert_eq!(Direction::HorizontalLeft.compass_distance(Direction::HorizontalRight), 4);
    }

    #[test]
    fn test_malformed_pose_is_an_error_not_a_panic() {
        let short = HandPose::new(vec![Landmark::default(); 5]);
        let err = estimate_pose(&short).unwrap_err();
        assert_eq!(err, EstimateError::MalformedPose { expected: 21, got: 5 });
    }

    #[test]
    fn test_synthetic_pose_round_trips_through_estimator() {
        let pose = synth_pose([
            (CurlState::NoCurl, Direction::HorizontalRight),
            (CurlState::NoCurl, Direction::VerticalUp),
            (CurlState::HalfCurl, Direction::VerticalUp),
            (CurlState::FullCurl, Direction::VerticalUp),
            (CurlState::FullCurl, Direction::VerticalUp),
        ]);
        let estimate = estimate_pose(&pose).expect("complete pose");

        assert_eq!(estimate.finger(Finger::Thumb).curl, CurlState::NoCurl);
        assert_eq!(estimate.finger(Finger::Thumb).direction, Direction::HorizontalRight);
        assert_eq!(estimate.finger(Finger::Index).curl, CurlState::NoCurl);
        assert_eq!(estimate.finger(Finger::Index).direction, Direction::VerticalUp);
        assert_eq!(estimate.finger(Finger::Middle).curl, CurlState::HalfCurl);
        assert_eq!(estimate.finger(Finger::Ring).curl, CurlState::FullCurl);
        assert_eq!(estimate.finger(Finger::Pinky).curl, CurlState::FullCurl);

        assert!(estimate.finger(Finger::Index).direction_confidence > 0.99);
        assert!(estimate.finger(Finger::Index).curl_confidence > 0.9);
    }
}
