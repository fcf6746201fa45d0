//! # fingerspell
//!
//! Static ASL alphabet recognition from hand landmarks.
//!
//! Two recognition paths run independently and are not required to agree:
//!
//! * **Local geometric path** — per frame, the 21-point hand pose is reduced
//!   to five (curl state, pointing direction) finger estimates, scored
//!   against a static per-letter constraint dictionary, and the best
//!   candidate above threshold becomes the prediction.
//! * **Remote classification path** — on a fixed timer while a hand is
//!   present, the frame is cropped to the hand, JPEG/base64-encoded, and
//!   relayed to a configured model endpoint with retry-on-cold-start.
//!
//! ## Pipeline
//!
//! | Stage | Module |
//! |---|---|
//! | 21-point topology, pose container | `hand::landmark` |
//! | Per-finger curl + direction estimates | `hand::estimator` |
//! | Shared detector, listener registry, re-entrancy guard | `hand::source` |
//! | Letter constraint dictionary | `gesture::description`, `gesture::alphabet` |
//! | Scoring and ranking | `gesture::scorer` |
//! | Session state (local, remote, word accumulation) | `session` |
//! | Capture + HTTP relay | `relay` |
//! | Offline landmark replay | `replay` |
//!
//! Motion letters (J, Z) are out of scope: a single-frame geometric matcher
//! cannot represent them.

pub mod gesture;
pub mod hand;
pub mod relay;
pub mod replay;
pub mod session;
