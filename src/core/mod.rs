//! Core module - pure game logic with no external dependencies
//!
//! Everything here is deterministic: time enters only as elapsed
//! milliseconds and randomness only through a seeded generator.

pub mod board;
pub mod piece;
pub mod progress;
pub mod rng;
pub mod session;
pub mod snapshot;
pub mod timer;

pub use board::{Board, RowList};
pub use piece::{try_rotate, Piece, Shape};
pub use progress::Progress;
pub use rng::PieceRng;
pub use session::{GameSession, Phase, SessionEvent};
pub use snapshot::GameSnapshot;
pub use timer::Ticker;
