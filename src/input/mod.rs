//! Keyboard commands and the debounce gate.

pub mod handler;

pub use handler::{map_key, Command, InputGate};
