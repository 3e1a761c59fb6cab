//! Terminal blockfall runner.
//!
//! Drives the engine with wall-clock time at a fixed frame cadence, maps
//! key presses through the debounce gate, and forwards engine events to
//! the audio sink.

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};

use blockfall::audio::{AudioCue, AudioSink, TerminalBell};
use blockfall::core::{GameSession, Phase, SessionEvent};
use blockfall::input::{map_key, Command, InputGate};
use blockfall::term::{BoardView, Screen, Viewport};
use blockfall::types::FRAME_MS;

fn main() -> Result<()> {
    let mut screen = Screen::new();
    screen.enter()?;

    let result = run(&mut screen);

    // Always try to restore the terminal.
    let _ = screen.exit();
    result
}

fn run(screen: &mut Screen) -> Result<()> {
    let mut session = GameSession::new(clock_seed());
    let view = BoardView::default();
    let mut gate = InputGate::default();
    let mut audio = TerminalBell;

    let frame = Duration::from_millis(u64::from(FRAME_MS));
    let mut last_frame = Instant::now();

    loop {
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        let canvas = view.render(&session.snapshot(), Viewport::new(w, h));
        screen.present(&canvas)?;

        // Poll input with a timeout until the next frame boundary.
        let timeout = frame
            .checked_sub(last_frame.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if let Some(command) = map_key(key.code).and_then(|c| gate.admit(c)) {
                        if command == Command::Quit {
                            return Ok(());
                        }
                        apply_command(&mut session, command);
                    }
                }
                Event::FocusLost => session.focus_lost(),
                Event::Resize(..) => screen.invalidate(),
                _ => {}
            }
        }

        let elapsed = last_frame.elapsed();
        if elapsed >= frame {
            last_frame = Instant::now();
            let elapsed_ms = elapsed.as_millis().min(u128::from(u32::MAX)) as u32;
            gate.advance(elapsed_ms);
            session.advance(elapsed_ms);
        }

        drain_events(&mut session, &mut audio);
    }
}

fn apply_command(session: &mut GameSession, command: Command) {
    match command {
        Command::Left => {
            session.move_left();
        }
        Command::Right => {
            session.move_right();
        }
        Command::SoftDrop => {
            session.soft_drop();
        }
        Command::Rotate => {
            session.rotate();
        }
        Command::PauseToggle => match session.phase() {
            Phase::NotStarted | Phase::Over => {
                session.start();
            }
            Phase::Running => {
                session.pause();
            }
            Phase::Paused => {
                session.resume();
            }
        },
        Command::End => {
            session.end();
        }
        Command::Quit => {}
    }
}

fn drain_events(session: &mut GameSession, audio: &mut impl AudioSink) {
    while let Some(event) = session.take_event() {
        if let SessionEvent::LinesDetected { .. } = event {
            if let Err(err) = audio.play(AudioCue::LineClear) {
                log::warn!("line-clear cue failed: {err:#}");
            }
        }
    }
}

/// Seed the piece stream from the wall clock so every run differs.
fn clock_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
        .unwrap_or(1)
}
