//! Session module - the game lifecycle controller.
//!
//! `GameSession` owns the board, the active piece, the progression state
//! and the timer, and mutates them only through its methods. Time enters
//! through `advance(elapsed_ms)`; player input enters through the movement
//! and lifecycle methods between advances. Presentation layers observe via
//! `snapshot` and `take_event` and never mutate.
//!
//! Line clears run in two steps: detection suspends gravity and flashes
//! the rows for a fixed delay, then compaction and scoring run and the
//! gravity timer re-arms at the (possibly faster) interval. While the
//! flash is live, movement input is dropped; ending the game cancels the
//! pending compaction.

use crate::core::board::{Board, RowList};
use crate::core::piece::{self, Piece};
use crate::core::progress::Progress;
use crate::core::rng::PieceRng;
use crate::core::snapshot::{ActivePiece, GameSnapshot};
use crate::core::timer::Ticker;
use crate::types::LINE_CLEAR_EFFECT_MS;

/// Top-level lifecycle phase.
///
/// The clearing flash is a sub-state of `Running`, tracked separately and
/// reported by [`GameSession::is_clearing`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    Running,
    Paused,
    Over,
}

/// Observable engine happenings, consumed by the presentation layer
/// (audio cues, final score display). One event at most is pending; the
/// runner drains it every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// Full rows were just detected and the clear flash began.
    LinesDetected { count: u32 },
    /// The flash ended: rows were compacted and scored.
    LinesCleared {
        lines: u32,
        points: u32,
        leveled_up: bool,
    },
    /// The session ended, by blocked spawn or explicit request.
    GameOver { score: u32, level: u32 },
}

/// One game of blockfall.
#[derive(Debug, Clone)]
pub struct GameSession {
    board: Board,
    active: Option<Piece>,
    rng: PieceRng,
    progress: Progress,
    phase: Phase,
    /// Rows awaiting compaction while the clear flash runs.
    pending_clear: Option<RowList>,
    ticker: Ticker,
    last_event: Option<SessionEvent>,
}

impl GameSession {
    /// New idle session. Nothing moves until [`start`](Self::start).
    pub fn new(seed: u32) -> Self {
        Self {
            board: Board::new(),
            active: None,
            rng: PieceRng::new(seed),
            progress: Progress::new(),
            phase: Phase::NotStarted,
            pending_clear: None,
            ticker: Ticker::new(),
            last_event: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether the clear flash is suspending play.
    pub fn is_clearing(&self) -> bool {
        self.pending_clear.is_some()
    }

    pub fn score(&self) -> u32 {
        self.progress.score()
    }

    pub fn level(&self) -> u32 {
        self.progress.level()
    }

    pub fn lines(&self) -> u32 {
        self.progress.lines()
    }

    pub fn fall_interval_ms(&self) -> u32 {
        self.progress.fall_interval_ms()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn active(&self) -> Option<Piece> {
        self.active
    }

    /// Row the active piece would rest on if dropped straight down.
    pub fn ghost_row(&self) -> Option<i8> {
        self.active
            .map(|p| self.board.drop_row(p.x, p.y, &p.shape))
    }

    /// Take and clear the pending event.
    pub fn take_event(&mut self) -> Option<SessionEvent> {
        self.last_event.take()
    }

    /// Begin a game from `NotStarted` or `Over`.
    ///
    /// Resets the board and progression, spawns the first piece and arms
    /// gravity. If the spawn is blocked immediately the session goes
    /// straight to `Over`.
    pub fn start(&mut self) -> bool {
        if !matches!(self.phase, Phase::NotStarted | Phase::Over) {
            return false;
        }

        self.board.clear();
        self.progress = Progress::new();
        self.pending_clear = None;
        self.active = None;
        self.phase = Phase::Running;

        if !self.spawn_piece() {
            return false;
        }
        self.ticker.arm_repeat(self.progress.fall_interval_ms());
        true
    }

    /// Suspend play. Rejected while the clear flash runs.
    pub fn pause(&mut self) -> bool {
        if self.phase != Phase::Running || self.is_clearing() {
            return false;
        }
        self.phase = Phase::Paused;
        self.ticker.disarm();
        true
    }

    /// Resume from `Paused` at the current gravity interval.
    pub fn resume(&mut self) -> bool {
        if self.phase != Phase::Paused {
            return false;
        }
        self.phase = Phase::Running;
        self.ticker.arm_repeat(self.progress.fall_interval_ms());
        true
    }

    /// End the game from `Running` or `Paused`. Terminal until the next
    /// `start`. A pending clear is cancelled, its rows never compacted.
    pub fn end(&mut self) -> bool {
        if !matches!(self.phase, Phase::Running | Phase::Paused) {
            return false;
        }
        self.finish_game();
        true
    }

    /// Losing focus behaves as a pause when play is active.
    pub fn focus_lost(&mut self) {
        let _ = self.pause();
    }

    /// Feed elapsed wall time into the engine.
    ///
    /// Fires gravity ticks or completes the clear flash, depending on
    /// which timer is live. Does nothing unless `Running`.
    pub fn advance(&mut self, elapsed_ms: u32) {
        if self.phase != Phase::Running {
            return;
        }

        let fires = self.ticker.advance(elapsed_ms);
        for _ in 0..fires {
            if self.phase != Phase::Running {
                break;
            }
            if self.pending_clear.is_some() {
                self.finish_line_clear();
            } else {
                self.gravity_tick();
                // A lock that completed rows swapped the timer to the
                // one-shot flash; stale repeat fires must not drain it.
                if self.pending_clear.is_some() {
                    break;
                }
            }
        }
    }

    /// Move the active piece one column left.
    pub fn move_left(&mut self) -> bool {
        self.shift(-1)
    }

    /// Move the active piece one column right.
    pub fn move_right(&mut self) -> bool {
        self.shift(1)
    }

    fn shift(&mut self, dx: i8) -> bool {
        if !self.input_allowed() {
            return false;
        }
        let Some(piece) = self.active else {
            return false;
        };
        if self.board.fits(piece.x + dx, piece.y, &piece.shape) {
            self.active = Some(Piece {
                x: piece.x + dx,
                ..piece
            });
            return true;
        }
        false
    }

    /// Player-initiated single-row descent, worth one point on success.
    /// A piece that cannot descend locks immediately instead.
    pub fn soft_drop(&mut self) -> bool {
        if !self.input_allowed() {
            return false;
        }
        let Some(piece) = self.active else {
            return false;
        };
        if self.board.fits(piece.x, piece.y + 1, &piece.shape) {
            self.active = Some(Piece {
                y: piece.y + 1,
                ..piece
            });
            self.progress.award_soft_drop();
            return true;
        }
        self.lock_active();
        false
    }

    /// Quarter-turn the active piece with wall kicks. Returns whether
    /// anything changed; a rejected or exempt rotation leaves the piece
    /// untouched.
    pub fn rotate(&mut self) -> bool {
        if !self.input_allowed() {
            return false;
        }
        let Some(piece) = self.active else {
            return false;
        };
        let board = &self.board;
        match piece::try_rotate(&piece, |x, shape| board.fits(x, piece.y, shape)) {
            Some((shape, dx)) => {
                self.active = Some(Piece {
                    shape,
                    x: piece.x + dx,
                    ..piece
                });
                true
            }
            None => false,
        }
    }

    fn input_allowed(&self) -> bool {
        self.phase == Phase::Running && !self.is_clearing()
    }

    /// One gravity fire: spawn a replacement if none is active, otherwise
    /// descend or lock.
    fn gravity_tick(&mut self) {
        let Some(piece) = self.active else {
            self.spawn_piece();
            return;
        };
        if self.board.fits(piece.x, piece.y + 1, &piece.shape) {
            self.active = Some(Piece {
                y: piece.y + 1,
                ..piece
            });
        } else {
            self.lock_active();
        }
    }

    /// Draw and place a fresh piece. A blocked spawn is the one fatal
    /// condition: the session goes to `Over`.
    fn spawn_piece(&mut self) -> bool {
        let piece = Piece::spawn(self.rng.next_kind());
        if !self.board.fits(piece.x, piece.y, &piece.shape) {
            self.finish_game();
            return false;
        }
        self.active = Some(piece);
        true
    }

    /// Commit the active piece, then either start the clear flash or spawn
    /// the next piece right away.
    fn lock_active(&mut self) {
        let Some(piece) = self.active.take() else {
            return;
        };
        self.board.lock(piece.x, piece.y, &piece.shape, piece.kind);

        let rows = self.board.full_rows();
        if rows.is_empty() {
            self.spawn_piece();
            return;
        }

        self.last_event = Some(SessionEvent::LinesDetected {
            count: rows.len() as u32,
        });
        self.pending_clear = Some(rows);
        self.ticker.arm_oneshot(LINE_CLEAR_EFFECT_MS);
    }

    /// The flash delay elapsed: compact, score, re-arm gravity. The next
    /// gravity tick spawns the replacement piece.
    fn finish_line_clear(&mut self) {
        let Some(rows) = self.pending_clear.take() else {
            return;
        };
        self.board.remove_rows(&rows);
        let outcome = self.progress.apply_clear(rows.len());
        self.last_event = Some(SessionEvent::LinesCleared {
            lines: rows.len() as u32,
            points: outcome.points,
            leveled_up: outcome.leveled_up,
        });
        // Re-arming at the current interval makes a level-up take effect
        // immediately instead of after the old interval runs out.
        self.ticker.arm_repeat(self.progress.fall_interval_ms());
    }

    fn finish_game(&mut self) {
        self.phase = Phase::Over;
        self.active = None;
        self.pending_clear = None;
        self.ticker.disarm();
        self.last_event = Some(SessionEvent::GameOver {
            score: self.progress.score(),
            level: self.progress.level(),
        });
    }

    /// Fill a snapshot buffer in place.
    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        self.board.write_ids(&mut out.board);
        out.active = self.active.map(|p| ActivePiece {
            kind: p.kind,
            shape: p.shape,
            x: p.x,
            y: p.y,
        });
        out.ghost_row = self.ghost_row();
        out.clearing_rows = self.pending_clear.clone().unwrap_or_default();
        out.phase = self.phase;
        out.score = self.progress.score();
        out.level = self.progress.level();
        out.lines = self.progress.lines();
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut snap = GameSnapshot::default();
        self.snapshot_into(&mut snap);
        snap
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PieceKind, BOARD_COLS, BOARD_ROWS, LINE_CLEAR_EFFECT_MS};

    /// Fill row `y` completely with locked cells.
    fn fill_row(session: &mut GameSession, y: i8) {
        for x in 0..BOARD_COLS as i8 {
            session.board.set(x, y, Some(PieceKind::I));
        }
    }

    /// Park the active piece somewhere it cannot interfere with the rows
    /// under test, then force a lock by dropping it.
    fn drop_active(session: &mut GameSession) {
        while session.soft_drop() {}
    }

    #[test]
    fn test_new_session_is_idle() {
        let session = GameSession::new(12345);
        assert_eq!(session.phase(), Phase::NotStarted);
        assert!(!session.is_clearing());
        assert_eq!(session.score(), 0);
        assert_eq!(session.level(), 1);
        assert_eq!(session.lines(), 0);
        assert!(session.active().is_none());
    }

    #[test]
    fn test_start_spawns_and_arms_gravity() {
        let mut session = GameSession::new(12345);
        assert!(session.start());
        assert_eq!(session.phase(), Phase::Running);
        assert!(session.active().is_some());
        assert_eq!(session.fall_interval_ms(), 850);
    }

    #[test]
    fn test_start_rejected_while_running_or_paused() {
        let mut session = GameSession::new(12345);
        session.start();
        assert!(!session.start());
        session.pause();
        assert!(!session.start());
    }

    #[test]
    fn test_blocked_spawn_is_game_over() {
        let mut session = GameSession::new(12345);
        session.start();
        // Fill the two spawn rows and force the next tick to spawn.
        for y in 0..2 {
            fill_row(&mut session, y);
        }
        session.active = None;
        session.advance(session.fall_interval_ms());
        assert_eq!(session.phase(), Phase::Over);
        assert!(matches!(
            session.take_event(),
            Some(SessionEvent::GameOver { .. })
        ));
        // Terminal: further time and input do nothing.
        session.advance(10_000);
        assert!(!session.move_left());
        assert_eq!(session.phase(), Phase::Over);
    }

    #[test]
    fn test_gravity_descends_one_row_per_interval() {
        let mut session = GameSession::new(12345);
        session.start();
        let y0 = session.active().map(|p| p.y).unwrap_or_default();
        session.advance(session.fall_interval_ms());
        assert_eq!(session.active().map(|p| p.y), Some(y0 + 1));
    }

    #[test]
    fn test_soft_drop_scores_and_descends() {
        let mut session = GameSession::new(12345);
        session.start();
        let y0 = session.active().map(|p| p.y).unwrap_or_default();
        assert!(session.soft_drop());
        assert_eq!(session.active().map(|p| p.y), Some(y0 + 1));
        assert_eq!(session.score(), 1);
    }

    #[test]
    fn test_soft_drop_on_resting_piece_locks() {
        let mut session = GameSession::new(12345);
        session.start();
        let kind = session.active().map(|p| p.kind);
        drop_active(&mut session);
        // The resting piece locked; a fresh piece spawned (no rows were
        // complete, boards start empty).
        assert!(session.active().is_some());
        assert!(!session.is_clearing());
        let locked_cells = (0..BOARD_ROWS as i8)
            .flat_map(|y| (0..BOARD_COLS as i8).map(move |x| (x, y)))
            .filter(|&(x, y)| session.board().is_occupied(x, y))
            .count() as u32;
        assert_eq!(
            Some(locked_cells),
            kind.map(|k| crate::core::piece::shape_of(k).cell_count())
        );
    }

    #[test]
    fn test_lock_with_full_rows_starts_the_flash() {
        let mut session = GameSession::new(12345);
        session.start();
        // Detection scans the whole board on lock, so a pre-filled bottom
        // row flashes no matter which kind just locked above it.
        fill_row(&mut session, (BOARD_ROWS - 1) as i8);
        drop_active(&mut session);
        assert!(session.is_clearing());
        assert!(matches!(
            session.take_event(),
            Some(SessionEvent::LinesDetected { count: 1 })
        ));
        // Gravity and input are suspended during the flash.
        assert!(session.active().is_none());
        assert!(!session.move_left());
        assert!(!session.rotate());
        assert!(!session.soft_drop());
    }

    #[test]
    fn test_flash_completes_after_the_effect_delay() {
        let mut session = GameSession::new(12345);
        session.start();
        fill_row(&mut session, (BOARD_ROWS - 1) as i8);
        drop_active(&mut session);
        assert!(session.is_clearing());
        let score_before = session.score();

        session.advance(LINE_CLEAR_EFFECT_MS - 1);
        assert!(session.is_clearing());
        session.advance(1);
        assert!(!session.is_clearing());
        assert_eq!(session.lines(), 1);
        assert_eq!(session.score(), score_before + 40);
        assert!(matches!(
            session.take_event(),
            Some(SessionEvent::LinesCleared {
                lines: 1,
                points: 40,
                ..
            })
        ));
        // The replacement piece arrives on the next gravity tick.
        assert!(session.active().is_none());
        session.advance(session.fall_interval_ms());
        assert!(session.active().is_some());
    }

    #[test]
    fn test_four_line_clear_pays_quadruple_at_the_current_level() {
        let mut session = GameSession::new(12345);
        session.start();
        let level = session.level();
        for y in (BOARD_ROWS - 4)..BOARD_ROWS {
            fill_row(&mut session, y as i8);
        }
        drop_active(&mut session);
        assert!(session.is_clearing());
        let score_before = session.score();
        session.advance(LINE_CLEAR_EFFECT_MS);
        assert_eq!(session.score() - score_before, 1200 * level);
        assert_eq!(session.lines(), 4);
        // 4 lines with 3 per level: level rose and gravity sped up.
        assert_eq!(session.level(), 2);
        assert_eq!(session.fall_interval_ms(), 760);
    }

    #[test]
    fn test_two_line_clear_at_level_three() {
        let mut session = GameSession::new(12345);
        session.start();
        // Rig the progression to level 3 (6 lines cleared so far).
        session.progress.apply_clear(3);
        session.progress.apply_clear(3);
        assert_eq!(session.level(), 3);

        fill_row(&mut session, (BOARD_ROWS - 1) as i8);
        fill_row(&mut session, (BOARD_ROWS - 2) as i8);
        drop_active(&mut session);
        let score_before = session.score();
        session.advance(LINE_CLEAR_EFFECT_MS);
        assert_eq!(session.score() - score_before, 100 * 3);
    }

    #[test]
    fn test_end_during_flash_cancels_compaction() {
        let mut session = GameSession::new(12345);
        session.start();
        fill_row(&mut session, (BOARD_ROWS - 1) as i8);
        drop_active(&mut session);
        assert!(session.is_clearing());

        assert!(session.end());
        assert_eq!(session.phase(), Phase::Over);
        assert!(!session.is_clearing());
        // No compaction, no scoring: the full row is still there.
        assert_eq!(session.lines(), 0);
        assert!(!session.board().full_rows().is_empty());
        // And the cancelled one-shot never fires.
        session.advance(10 * LINE_CLEAR_EFFECT_MS);
        assert_eq!(session.lines(), 0);
    }

    #[test]
    fn test_pause_rejected_during_flash() {
        let mut session = GameSession::new(12345);
        session.start();
        fill_row(&mut session, (BOARD_ROWS - 1) as i8);
        drop_active(&mut session);
        assert!(session.is_clearing());
        assert!(!session.pause());
        assert_eq!(session.phase(), Phase::Running);
    }

    #[test]
    fn test_restart_after_game_over_resets_everything() {
        let mut session = GameSession::new(12345);
        session.start();
        fill_row(&mut session, (BOARD_ROWS - 1) as i8);
        drop_active(&mut session);
        session.advance(LINE_CLEAR_EFFECT_MS);
        session.end();
        assert_eq!(session.phase(), Phase::Over);

        assert!(session.start());
        assert_eq!(session.phase(), Phase::Running);
        assert_eq!(session.score(), 0);
        assert_eq!(session.lines(), 0);
        assert_eq!(session.level(), 1);
        assert!(session.board().full_rows().is_empty());
        assert!(session.active().is_some());
    }

    #[test]
    fn test_snapshot_reflects_the_flash() {
        let mut session = GameSession::new(12345);
        session.start();
        fill_row(&mut session, (BOARD_ROWS - 1) as i8);
        drop_active(&mut session);

        let snap = session.snapshot();
        assert_eq!(snap.clearing_rows.as_slice(), &[BOARD_ROWS - 1]);
        assert!(!snap.playable());
        assert_eq!(snap.phase, Phase::Running);
    }
}
