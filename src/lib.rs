//! blockfall - a terminal falling-block puzzle.
//!
//! `core` is the deterministic game engine; `input`, `term` and `audio` are
//! the presentation collaborators that feed it commands and observe its
//! snapshots; `types` holds the shared constants and piece identities.

pub mod audio;
pub mod core;
pub mod input;
pub mod term;
pub mod types;
