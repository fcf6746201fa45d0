//! Gesture-matching core.
//!
//! Provides:
//! - `description`: per-letter constraint sets and dictionary validation
//! - `alphabet`: the 17 static ASL letter definitions
//! - `scorer`: pose-against-dictionary scoring and ranking

pub mod alphabet;
pub mod description;
pub mod scorer;
