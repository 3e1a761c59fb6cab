//! Key mapping and the directional debounce gate.
//!
//! Directional commands repeat fast under key auto-repeat, so a short
//! cooldown drops the excess. Gated presses are dropped outright, never
//! queued; lifecycle commands always pass.

use crossterm::event::KeyCode;

use crate::types::INPUT_COOLDOWN_MS;

/// A player command, one per core operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Left,
    Right,
    SoftDrop,
    Rotate,
    /// Space: starts a game when idle, otherwise toggles pause.
    PauseToggle,
    End,
    Quit,
}

impl Command {
    /// Commands subject to the repeat cooldown.
    pub fn is_directional(self) -> bool {
        matches!(
            self,
            Command::Left | Command::Right | Command::SoftDrop | Command::Rotate
        )
    }
}

/// Map a key press to a command.
pub fn map_key(code: KeyCode) -> Option<Command> {
    match code {
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(Command::Left),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(Command::Right),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Some(Command::SoftDrop),
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Some(Command::Rotate),
        KeyCode::Char(' ') => Some(Command::PauseToggle),
        KeyCode::Char('e') | KeyCode::Char('E') => Some(Command::End),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Command::Quit),
        _ => None,
    }
}

/// Cooldown gate for directional repeats.
///
/// Driven by elapsed milliseconds like the engine, so tests can step it
/// without a clock.
#[derive(Debug, Clone)]
pub struct InputGate {
    cooldown_ms: u32,
    remaining_ms: u32,
}

impl InputGate {
    pub fn new(cooldown_ms: u32) -> Self {
        Self {
            cooldown_ms,
            remaining_ms: 0,
        }
    }

    /// Let time pass; the gate reopens once the cooldown has elapsed.
    pub fn advance(&mut self, elapsed_ms: u32) {
        self.remaining_ms = self.remaining_ms.saturating_sub(elapsed_ms);
    }

    /// Admit or drop a command. A directional command inside the cooldown
    /// window is dropped; admitting one restarts the window.
    pub fn admit(&mut self, command: Command) -> Option<Command> {
        if command.is_directional() {
            if self.remaining_ms > 0 {
                return None;
            }
            self.remaining_ms = self.cooldown_ms;
        }
        Some(command)
    }
}

impl Default for InputGate {
    fn default() -> Self {
        Self::new(INPUT_COOLDOWN_MS)
    }
}
