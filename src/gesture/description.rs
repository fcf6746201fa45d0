//! Gesture descriptions and the letter dictionary.
//!
//! A description is the static geometric definition of one letter: for a
//! subset of fingers, one or more acceptable curl states, and for a subset
//! of fingers, one or more acceptable pointing directions, each with a
//! weight. Alternatives on the same finger are OR'd at match time (the
//! best-scoring one counts). The dictionary validates every description at
//! construction so a misconfigured letter fails loudly at startup instead
//! of silently mis-scoring frames.

use thiserror::Error;

use crate::hand::estimator::{CurlState, Direction};
use crate::hand::landmark::Finger;

// ── Constraints ────────────────────────────────────────────

/// One acceptable curl state for a finger, with its weight.
///
/// The weight (0, 1] scales how much an unmet constraint costs; a met
/// constraint is always worth the full slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurlConstraint {
    pub state: CurlState,
    pub weight: f32,
}

/// One acceptable pointing direction for a finger, with its weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionConstraint {
    pub direction: Direction,
    pub weight: f32,
}

// ── Gesture description ────────────────────────────────────

/// Static per-letter constraint set.
#[derive(Debug, Clone)]
pub struct GestureDescription {
    letter: char,
    curls: [Vec<CurlConstraint>; 5],
    directions: [Vec<DirectionConstraint>; 5],
}

impl GestureDescription {
    pub fn new(letter: char) -> Self {
        Self {
            letter,
            curls: Default::default(),
            directions: Default::default(),
        }
    }

    pub fn letter(&self) -> char {
        self.letter
    }

    /// Record an acceptable curl state for a finger. Repeated calls for the
    /// same finger add OR'd alternatives.
    pub fn add_curl(&mut self, finger: Finger, state: CurlState, weight: f32) -> &mut Self {
        self.curls[finger.index()].push(CurlConstraint { state, weight });
        self
    }

    /// Record an acceptable pointing direction for a finger. Repeated calls
    /// for the same finger add OR'd alternatives.
    pub fn add_direction(&mut self, finger: Finger, direction: Direction, weight: f32) -> &mut Self {
        self.directions[finger.index()].push(DirectionConstraint { direction, weight });
        self
    }

    /// Curl alternatives for a finger; empty means "don't care".
    pub fn curls(&self, finger: Finger) -> &[CurlConstraint] {
        &self.curls[finger.index()]
    }

    /// Direction alternatives for a finger; empty means "don't care".
    pub fn directions(&self, finger: Finger) -> &[DirectionConstraint] {
        &self.directions[finger.index()]
    }

    /// Total number of constraints across all fingers (tie-break key).
    pub fn constraint_count(&self) -> usize {
        self.curls.iter().map(Vec::len).sum::<usize>()
            + self.directions.iter().map(Vec::len).sum::<usize>()
    }

    fn validate(&self) -> Result<(), DictionaryError> {
        if self.letter.is_whitespace() || self.letter == '\0' {
            return Err(DictionaryError::EmptyLabel);
        }
        let all_weights = self
            .curls
            .iter()
            .flatten()
            .map(|c| c.weight)
            .chain(self.directions.iter().flatten().map(|d| d.weight));
        for weight in all_weights {
            if !weight.is_finite() || weight <= 0.0 || weight > 1.0 {
                return Err(DictionaryError::InvalidWeight {
                    letter: self.letter,
                    weight,
                });
            }
        }
        Ok(())
    }
}

// ── Dictionary ─────────────────────────────────────────────

/// Construction-time dictionary failure. Fatal at startup by design.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DictionaryError {
    #[error("gesture description has an empty letter label")]
    EmptyLabel,

    #[error("duplicate gesture description for letter '{0}'")]
    DuplicateLetter(char),

    #[error("invalid constraint weight {weight} for letter '{letter}' (must be in (0, 1])")]
    InvalidWeight { letter: char, weight: f32 },
}

/// The immutable set of letter descriptions, in declaration order.
#[derive(Debug, Clone)]
pub struct GestureDictionary {
    descriptions: Vec<GestureDescription>,
}

impl GestureDictionary {
    /// Build a dictionary, validating labels and weights.
    pub fn from_descriptions(
        descriptions: Vec<GestureDescription>,
    ) -> Result<Self, DictionaryError> {
        let mut seen = Vec::with_capacity(descriptions.len());
        for description in &descriptions {
            description.validate()?;
            if seen.contains(&description.letter) {
                return Err(DictionaryError::DuplicateLetter(description.letter));
            }
            seen.push(description.letter);
        }
        Ok(Self { descriptions })
    }

    pub fn descriptions(&self) -> &[GestureDescription] {
        &self.descriptions
    }

    pub fn len(&self) -> usize {
        self.descriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptions.is_empty()
    }
}

// ── Tests ──────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn fist(letter: char) -> GestureDescription {
        let mut g = GestureDescription::new(letter);
        g.add_curl(Finger::Index, CurlState::FullCurl, 1.0);
        g
    }

    #[test]
    fn test_alternatives_accumulate_per_finger() {
        let mut g = GestureDescription::new('G');
        g.add_direction(Finger::Index, Direction::HorizontalLeft, 0.7)
            .add_direction(Finger::Index, Direction::HorizontalRight, 0.7);
        assert_eq!(g.directions(Finger::Index).len(), 2);
        assert!(g.directions(Finger::Middle).is_empty());
        assert_eq!(g.constraint_count(), 2);
    }

    #[test]
    fn test_duplicate_letter_rejected() {
        let err = GestureDictionary::from_descriptions(vec![fist('A'), fist('A')]).unwrap_err();
        assert_eq!(err, DictionaryError::DuplicateLetter('A'));
    }

    #[test]
    fn test_empty_label_rejected() {
        let err = GestureDictionary::from_descriptions(vec![fist(' ')]).unwrap_err();
        assert_eq!(err, DictionaryError::EmptyLabel);
    }

    #[test]
    fn test_out_of_range_weight_rejected() {
        let mut g = GestureDescription::new('X');
        g.add_curl(Finger::Thumb, CurlState::NoCurl, 0.0);
        assert!(matches!(
            GestureDictionary::from_descriptions(vec![g]).unwrap_err(),
            DictionaryError::InvalidWeight { letter: 'X', .. }
        ));

        let mut g = GestureDescription::new('X');
        g.add_curl(Finger::Thumb, CurlState::NoCurl, 1.5);
        assert!(matches!(
            GestureDictionary::from_descriptions(vec![g]).unwrap_err(),
            DictionaryError::InvalidWeight { letter: 'X', .. }
        ));
    }

    #[test]
    fn test_declaration_order_preserved() {
        let dict = GestureDictionary::from_descriptions(vec![fist('A'), fist('B'), fist('C')])
            .expect("valid dictionary");
        let letters: Vec<char> = dict.descriptions().iter().map(|d| d.letter()).collect();
        assert_eq!(letters, vec!['A', 'B', 'C']);
    }
}
