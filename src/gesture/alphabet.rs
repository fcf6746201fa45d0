//! The ASL alphabet dictionary — 17 static letters.
//!
//! J and Z require motion and are permanently excluded; a single-frame
//! geometric matcher cannot represent them. E and S differ only in how far
//! the thumb is clamped over the fist (half vs. full curl) — that is the
//! one pair the matcher separates on thumb curl alone.

use crate::hand::estimator::CurlState::{FullCurl, HalfCurl, NoCurl};
use crate::hand::estimator::Direction::{HorizontalLeft, HorizontalRight, VerticalUp};
use crate::hand::landmark::Finger::{Index, Middle, Pinky, Ring, Thumb};

use super::description::{DictionaryError, GestureDescription, GestureDictionary};

/// Build the full ASL alphabet dictionary.
pub fn alphabet() -> Result<GestureDictionary, DictionaryError> {
    let mut letters = Vec::new();

    // A — fist with the thumb alongside
    let mut a = GestureDescription::new('A');
    a.add_curl(Thumb, NoCurl, 1.0)
        .add_curl(Index, FullCurl, 1.0)
        .add_curl(Middle, FullCurl, 1.0)
        .add_curl(Ring, FullCurl, 1.0)
        .add_curl(Pinky, FullCurl, 1.0);
    letters.push(a);

    // B — flat hand, fingers up, thumb across the palm
    let mut b = GestureDescription::new('B');
    b.add_curl(Thumb, HalfCurl, 1.0)
        .add_curl(Index, NoCurl, 1.0)
        .add_curl(Middle, NoCurl, 1.0)
        .add_curl(Ring, NoCurl, 1.0)
        .add_curl(Pinky, NoCurl, 1.0)
        .add_direction(Index, VerticalUp, 0.7);
    letters.push(b);

    // C — curved hand, like holding a cup
    let mut c = GestureDescription::new('C');
    c.add_curl(Thumb, NoCurl, 0.8)
        .add_curl(Index, HalfCurl, 1.0)
        .add_curl(Middle, HalfCurl, 1.0)
        .add_curl(Ring, HalfCurl, 1.0)
        .add_curl(Pinky, HalfCurl, 1.0);
    letters.push(c);

    // D — index up, remaining fingers touch the thumb
    let mut d = GestureDescription::new('D');
    d.add_curl(Index, NoCurl, 1.0)
        .add_curl(Middle, FullCurl, 1.0)
        .add_curl(Ring, FullCurl, 1.0)
        .add_curl(Pinky, FullCurl, 1.0)
        .add_direction(Index, VerticalUp, 0.7);
    letters.push(d);

    // E — all fingers curled onto the palm, thumb folded across
    let mut e = GestureDescription::new('E');
    e.add_curl(Thumb, HalfCurl, 1.0)
        .add_curl(Index, FullCurl, 1.0)
        .add_curl(Middle, FullCurl, 1.0)
        .add_curl(Ring, FullCurl, 1.0)
        .add_curl(Pinky, FullCurl, 1.0);
    letters.push(e);

    // F — OK sign, three fingers up
    let mut f = GestureDescription::new('F');
    f.add_curl(Thumb, HalfCurl, 0.8)
        .add_curl(Index, FullCurl, 1.0)
        .add_curl(Middle, NoCurl, 1.0)
        .add_curl(Ring, NoCurl, 1.0)
        .add_curl(Pinky, NoCurl, 1.0);
    letters.push(f);

    // G — index and thumb pointing sideways
    let mut g = GestureDescription::new('G');
    g.add_curl(Thumb, NoCurl, 1.0)
        .add_curl(Index, NoCurl, 1.0)
        .add_curl(Middle, FullCurl, 1.0)
        .add_curl(Ring, FullCurl, 1.0)
        .add_curl(Pinky, FullCurl, 1.0)
        .add_direction(Index, HorizontalLeft, 0.7)
        .add_direction(Index, HorizontalRight, 0.7);
    letters.push(g);

    // I — pinky up, others curled
    let mut i = GestureDescription::new('I');
    i.add_curl(Thumb, HalfCurl, 0.8)
        .add_curl(Index, FullCurl, 1.0)
        .add_curl(Middle, FullCurl, 1.0)
        .add_curl(Ring, FullCurl, 1.0)
        .add_curl(Pinky, NoCurl, 1.0)
        .add_direction(Pinky, VerticalUp, 0.7);
    letters.push(i);

    // K — index and middle up in a V, thumb between them
    let mut k = GestureDescription::new('K');
    k.add_curl(Thumb, NoCurl, 0.8)
        .add_curl(Index, NoCurl, 1.0)
        .add_curl(Middle, NoCurl, 1.0)
        .add_curl(Ring, FullCurl, 1.0)
        .add_curl(Pinky, FullCurl, 1.0);
    letters.push(k);

    // L — thumb and index form an L
    let mut l = GestureDescription::new('L');
    l.add_curl(Thumb, NoCurl, 1.0)
        .add_curl(Index, NoCurl, 1.0)
        .add_curl(Middle, FullCurl, 1.0)
        .add_curl(Ring, FullCurl, 1.0)
        .add_curl(Pinky, FullCurl, 1.0)
        .add_direction(Thumb, HorizontalLeft, 0.5)
        .add_direction(Thumb, HorizontalRight, 0.5)
        .add_direction(Index, VerticalUp, 0.7);
    letters.push(l);

    // O — all fingers curved to meet the thumb
    let mut o = GestureDescription::new('O');
    o.add_curl(Thumb, HalfCurl, 0.8)
        .add_curl(Index, HalfCurl, 1.0)
        .add_curl(Middle, HalfCurl, 1.0)
        .add_curl(Ring, HalfCurl, 1.0)
        .add_curl(Pinky, HalfCurl, 1.0);
    letters.push(o);

    // R — index and middle crossed
    let mut r = GestureDescription::new('R');
    r.add_curl(Index, NoCurl, 1.0)
        .add_curl(Middle, NoCurl, 1.0)
        .add_curl(Ring, FullCurl, 1.0)
        .add_curl(Pinky, FullCurl, 1.0);
    letters.push(r);

    // S — fist with the thumb clamped over the fingers
    let mut s = GestureDescription::new('S');
    s.add_curl(Thumb, FullCurl, 1.0)
        .add_curl(Index, FullCurl, 1.0)
        .add_curl(Middle, FullCurl, 1.0)
        .add_curl(Ring, FullCurl, 1.0)
        .add_curl(Pinky, FullCurl, 1.0);
    letters.push(s);

    // U — index and middle up together
    let mut u = GestureDescription::new('U');
    u.add_curl(Thumb, HalfCurl, 0.8)
        .add_curl(Index, NoCurl, 1.0)
        .add_curl(Middle, NoCurl, 1.0)
        .add_curl(Ring, FullCurl, 1.0)
        .add_curl(Pinky, FullCurl, 1.0)
        .add_direction(Index, VerticalUp, 0.7)
        .add_direction(Middle, VerticalUp, 0.7);
    letters.push(u);

    // V — peace sign, index and middle spread
    let mut v = GestureDescription::new('V');
    v.add_curl(Thumb, HalfCurl, 0.8)
        .add_curl(Index, NoCurl, 1.0)
        .add_curl(Middle, NoCurl, 1.0)
        .add_curl(Ring, FullCurl, 1.0)
        .add_curl(Pinky, FullCurl, 1.0);
    letters.push(v);

    // W — index, middle, ring up
    let mut w = GestureDescription::new('W');
    w.add_curl(Thumb, HalfCurl, 0.8)
        .add_curl(Index, NoCurl, 1.0)
        .add_curl(Middle, NoCurl, 1.0)
        .add_curl(Ring, NoCurl, 1.0)
        .add_curl(Pinky, FullCurl, 1.0);
    letters.push(w);

    // Y — thumb and pinky out (hang loose)
    let mut y = GestureDescription::new('Y');
    y.add_curl(Thumb, NoCurl, 1.0)
        .add_curl(Index, FullCurl, 1.0)
        .add_curl(Middle, FullCurl, 1.0)
        .add_curl(Ring, FullCurl, 1.0)
        .add_curl(Pinky, NoCurl, 1.0);
    letters.push(y);

    GestureDictionary::from_descriptions(letters)
}

/// The letters the dictionary supports, in declaration order.
pub const SUPPORTED_LETTERS: [char; 17] = [
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'I', 'K', 'L', 'O', 'R', 'S', 'U', 'V', 'W', 'Y',
];

// ── Tests ──────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alphabet_builds() {
        let dict = alphabet().expect("alphabet must construct");
        assert_eq!(dict.len(), 17);
    }

    #[test]
    fn test_letter_set_and_order() {
        let dict = alphabet().unwrap();
        let letters: Vec<char> = dict.descriptions().iter().map(|d| d.letter()).collect();
        assert_eq!(letters, SUPPORTED_LETTERS);
    }

    #[test]
    fn test_motion_letters_excluded() {
        let dict = alphabet().unwrap();
        assert!(!dict.descriptions().iter().any(|d| d.letter() == 'J'));
        assert!(!dict.descriptions().iter().any(|d| d.letter() == 'Z'));
    }

    #[test]
    fn test_e_and_s_differ_on_thumb() {
        let dict = alphabet().unwrap();
        let thumb_of = |letter: char| {
            dict.descriptions()
                .iter()
                .find(|d| d.letter() == letter)
                .map(|d| d.curls(Thumb)[0].state)
                .unwrap()
        };
        assert_eq!(thumb_of('E'), HalfCurl);
        assert_eq!(thumb_of('S'), FullCurl);
    }
}
