//! Shared types and tuning constants.
//! This module contains pure data with no dependencies on the engine or I/O.

/// Board dimensions in cells.
pub const BOARD_COLS: u8 = 10;
pub const BOARD_ROWS: u8 = 20;

/// A level-up every this many cleared lines.
pub const LINES_PER_LEVEL: u32 = 3;

/// Gravity interval curve (milliseconds).
pub const INITIAL_FALL_MS: u32 = 850;
pub const MIN_FALL_MS: u32 = 120;
pub const FALL_DECREMENT_MS: u32 = 90;

/// Duration of the line-clear flash; gravity and input are suspended for it.
pub const LINE_CLEAR_EFFECT_MS: u32 = 180;

/// Cooldown between accepted directional key presses.
pub const INPUT_COOLDOWN_MS: u32 = 50;

/// Frame cadence for the terminal runner.
pub const FRAME_MS: u32 = 16;

/// Points for clearing 0..=4 rows at once, multiplied by the current level.
pub const LINE_POINTS: [u32; 5] = [0, 40, 100, 300, 1200];

/// The eleven block kinds.
///
/// Beyond the seven tetrominoes there are four small pieces: a single cell,
/// a domino, an L-tromino and a straight tromino. Ids are stable and double
/// as the color index in rendered snapshots (`0` means empty).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I,
    J,
    L,
    T,
    S,
    Z,
    O,
    Mono,
    Domino,
    Corner,
    Tri,
}

impl PieceKind {
    pub const ALL: [PieceKind; 11] = [
        PieceKind::I,
        PieceKind::J,
        PieceKind::L,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::O,
        PieceKind::Mono,
        PieceKind::Domino,
        PieceKind::Corner,
        PieceKind::Tri,
    ];

    /// Stable id in `1..=11`, usable as a board cell value.
    pub fn id(self) -> u8 {
        match self {
            PieceKind::I => 1,
            PieceKind::J => 2,
            PieceKind::L => 3,
            PieceKind::T => 4,
            PieceKind::S => 5,
            PieceKind::Z => 6,
            PieceKind::O => 7,
            PieceKind::Mono => 8,
            PieceKind::Domino => 9,
            PieceKind::Corner => 10,
            PieceKind::Tri => 11,
        }
    }

    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(PieceKind::I),
            2 => Some(PieceKind::J),
            3 => Some(PieceKind::L),
            4 => Some(PieceKind::T),
            5 => Some(PieceKind::S),
            6 => Some(PieceKind::Z),
            7 => Some(PieceKind::O),
            8 => Some(PieceKind::Mono),
            9 => Some(PieceKind::Domino),
            10 => Some(PieceKind::Corner),
            11 => Some(PieceKind::Tri),
            _ => None,
        }
    }

    /// The square and the single cell never rotate.
    pub fn rotation_exempt(self) -> bool {
        matches!(self, PieceKind::O | PieceKind::Mono)
    }
}

/// Cell on the board (`None` = empty, `Some` = locked piece kind).
pub type Cell = Option<PieceKind>;
