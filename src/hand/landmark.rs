//! Hand landmark data structures and topology.
//!
//! Models the 21 keypoints per hand produced by the landmark detector
//! (wrist plus four joints on each of five fingers), with normalized
//! image-plane coordinates and a scale-free depth value.

// ── Landmark indices ───────────────────────────────────────

/// The 21 hand landmarks, in detector output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LandmarkId {
    Wrist,
    ThumbCmc,
    ThumbMcp,
    ThumbIp,
    ThumbTip,
    IndexMcp,
    IndexPip,
    IndexDip,
    IndexTip,
    MiddleMcp,
    MiddlePip,
    MiddleDip,
    MiddleTip,
    RingMcp,
    RingPip,
    RingDip,
    RingTip,
    PinkyMcp,
    PinkyPip,
    PinkyDip,
    PinkyTip,
}

/// Total number of landmarks per hand.
pub const LANDMARK_COUNT: usize = 21;

impl LandmarkId {
    /// Convert landmark enum to array index (0-20).
    pub fn index(&self) -> usize {
        *self as usize
    }
}

// ── Fingers ────────────────────────────────────────────────

/// One of the five fingers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

/// All fingers, thumb through pinky.
pub const FINGERS: [Finger; 5] = [
    Finger::Thumb,
    Finger::Index,
    Finger::Middle,
    Finger::Ring,
    Finger::Pinky,
];

impl Finger {
    /// Array index (0-4), thumb through pinky.
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Thumb => "thumb",
            Self::Index => "index",
            Self::Middle => "middle",
            Self::Ring => "ring",
            Self::Pinky => "pinky",
        }
    }

    /// The four-point chain used for curl geometry: root, proximal,
    /// intermediate, tip. The thumb treats its CMC as a pseudo-wrist;
    /// the other fingers are rooted at the wrist and skip the DIP.
    pub fn curl_chain(&self) -> [LandmarkId; 4] {
        use LandmarkId::*;
        match self {
            Self::Thumb => [ThumbCmc, ThumbMcp, ThumbIp, ThumbTip],
            Self::Index => [Wrist, IndexMcp, IndexPip, IndexTip],
            Self::Middle => [Wrist, MiddleMcp, MiddlePip, MiddleTip],
            Self::Ring => [Wrist, RingMcp, RingPip, RingTip],
            Self::Pinky => [Wrist, PinkyMcp, PinkyPip, PinkyTip],
        }
    }

    /// Base joint for pointing-direction estimation.
    pub fn base(&self) -> LandmarkId {
        use LandmarkId::*;
        match self {
            Self::Thumb => ThumbCmc,
            Self::Index => IndexMcp,
            Self::Middle => MiddleMcp,
            Self::Ring => RingMcp,
            Self::Pinky => PinkyMcp,
        }
    }

    /// Fingertip joint.
    pub fn tip(&self) -> LandmarkId {
        use LandmarkId::*;
        match self {
            Self::Thumb => ThumbTip,
            Self::Index => IndexTip,
            Self::Middle => MiddleTip,
            Self::Ring => RingTip,
            Self::Pinky => PinkyTip,
        }
    }
}

// ── Landmark ───────────────────────────────────────────────

/// A single hand landmark.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Landmark {
    /// X coordinate, normalized to image width (0.0-1.0).
    pub x: f32,
    /// Y coordinate, normalized to image height (0.0-1.0). Grows downward.
    pub y: f32,
    /// Depth relative to the wrist, scale-free.
    pub z: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

// ── Hand pose ──────────────────────────────────────────────

/// One frame's hand landmark set.
///
/// Carries whatever the detector delivered; the estimator validates the
/// point count so a malformed frame is skipped rather than panicking.
#[derive(Debug, Clone, PartialEq)]
pub struct HandPose {
    landmarks: Vec<Landmark>,
}

impl HandPose {
    pub fn new(landmarks: Vec<Landmark>) -> Self {
        Self { landmarks }
    }

    /// Number of landmarks present (21 for a well-formed pose).
    pub fn len(&self) -> usize {
        self.landmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }

    /// Whether the pose carries the full 21-point topology.
    pub fn is_complete(&self) -> bool {
        self.landmarks.len() == LANDMARK_COUNT
    }

    /// Landmark by id. Only valid on a complete pose.
    pub fn point(&self, id: LandmarkId) -> Landmark {
        self.landmarks[id.index()]
    }

    pub fn landmarks(&self) -> &[Landmark] {
        &self.landmarks
    }

    /// Axis-aligned bounding box over all landmarks, as
    /// (min_x, min_y, max_x, max_y) in normalized coordinates.
    /// Returns None for an empty pose.
    pub fn bounding_box(&self) -> Option<(f32, f32, f32, f32)> {
        if self.landmarks.is_empty() {
            return None;
        }
        let mut min_x = f32::MAX;
        let mut min_y = f32::MAX;
        let mut max_x = f32::MIN;
        let mut max_y = f32::MIN;
        for lm in &self.landmarks {
            min_x = min_x.min(lm.x);
            min_y = min_y.min(lm.y);
            max_x = max_x.max(lm.x);
            max_y = max_y.max(lm.y);
        }
        Some((min_x, min_y, max_x, max_y))
    }
}

// ── Tests ──────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landmark_indices() {
        assert_eq!(LandmarkId::Wrist.index(), 0);
        assert_eq!(LandmarkId::ThumbCmc.index(), 1);
        assert_eq!(LandmarkId::ThumbTip.index(), 4);
        assert_eq!(LandmarkId::IndexMcp.index(), 5);
        assert_eq!(LandmarkId::PinkyTip.index(), 20);
        assert_eq!(LANDMARK_COUNT, 21);
    }

    #[test]
    fn test_finger_topology_contiguous() {
        // Each non-thumb finger's chain is wrist, MCP, PIP, TIP with the
        // MCP/PIP/TIP drawn from its own contiguous 4-joint block.
        for finger in FINGERS.iter().skip(1) {
            let chain = finger.curl_chain();
            assert_eq!(chain[0], LandmarkId::Wrist);
            let base = chain[1].index();
            assert_eq!(chain[2].index(), base + 1);
            assert_eq!(chain[3].index(), base + 3);
            assert_eq!(finger.base(), chain[1]);
            assert_eq!(finger.tip(), chain[3]);
        }
    }

    #[test]
    fn test_thumb_pseudo_wrist() {
        let chain = Finger::Thumb.curl_chain();
        assert_eq!(chain[0], LandmarkId::ThumbCmc);
        assert_eq!(chain[3], LandmarkId::ThumbTip);
    }

    #[test]
    fn test_pose_completeness() {
        let pose = HandPose::new(vec![Landmark::default(); LANDMARK_COUNT]);
        assert!(pose.is_complete());

        let short = HandPose::new(vec![Landmark::default(); 5]);
        assert!(!short.is_complete());
        assert_eq!(short.len(), 5);
    }

    #[test]
    fn test_bounding_box() {
        let mut points = vec![Landmark::new(0.5, 0.5, 0.0); LANDMARK_COUNT];
        points[0] = Landmark::new(0.2, 0.3, 0.0);
        points[20] = Landmark::new(0.8, 0.9, 0.0);
        let pose = HandPose::new(points);

        let (min_x, min_y, max_x, max_y) = pose.bounding_box().unwrap();
        assert!((min_x - 0.2).abs() < 1e-6);
        assert!((min_y - 0.3).abs() < 1e-6);
        assert!((max_x - 0.8).abs() < 1e-6);
        assert!((max_y - 0.9).abs() < 1e-6);

        assert!(HandPose::new(Vec::new()).bounding_box().is_none());
    }
}
