//! Audio cues.
//!
//! The engine never touches audio directly: the runner forwards engine
//! events to a sink. A refused cue is reported to the caller, which logs
//! it and moves on; playback can never affect game state.

use std::io::{self, Write};

use anyhow::Result;

/// Sound effects the game can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCue {
    LineClear,
}

/// Fire-and-forget cue sink.
pub trait AudioSink {
    fn play(&mut self, cue: AudioCue) -> Result<()>;
}

/// Rings the terminal bell for every cue.
pub struct TerminalBell;

impl AudioSink for TerminalBell {
    fn play(&mut self, _cue: AudioCue) -> Result<()> {
        let mut out = io::stdout();
        out.write_all(b"\x07")?;
        out.flush()?;
        Ok(())
    }
}

/// Discards every cue (muted play, tests).
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _cue: AudioCue) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_sink_accepts_cues() {
        let mut sink = NullAudio;
        assert!(sink.play(AudioCue::LineClear).is_ok());
    }
}
