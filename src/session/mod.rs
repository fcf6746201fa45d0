//! Session and boundary logic.
//!
//! Provides:
//! - `local`: the geometric recognition session
//! - `remote`: the timer-driven remote classification session
//! - `word`: hold-to-commit word accumulation

pub mod local;
pub mod remote;
pub mod word;
