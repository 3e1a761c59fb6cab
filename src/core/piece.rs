//! Piece module - shapes, spawning and rotation.
//!
//! Shapes are small 0/1 matrices (at most 4x4) stored as row-major
//! bitmasks. Rotation is the quarter-turn transpose-and-reverse transform;
//! wall kicks scan a short list of horizontal offsets toward the board
//! center. Rotation either commits completely or leaves the piece alone.

use crate::types::{PieceKind, BOARD_COLS};

/// A piece footprint: `rows` x `cols` cells, row-major bitmask in `bits`
/// (bit `r * cols + c` is cell (r, c)).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    rows: u8,
    cols: u8,
    bits: u16,
}

impl Shape {
    pub const fn new(rows: u8, cols: u8, bits: u16) -> Self {
        Self { rows, cols, bits }
    }

    pub fn rows(&self) -> u8 {
        self.rows
    }

    pub fn cols(&self) -> u8 {
        self.cols
    }

    pub fn cell(&self, row: u8, col: u8) -> bool {
        (self.bits >> (u16::from(row) * u16::from(self.cols) + u16::from(col))) & 1 == 1
    }

    fn mark(&mut self, row: u8, col: u8) {
        self.bits |= 1 << (u16::from(row) * u16::from(self.cols) + u16::from(col));
    }

    /// Occupied cells as (dx, dy) offsets from the piece origin.
    pub fn cells(self) -> impl Iterator<Item = (i8, i8)> {
        (0..self.rows).flat_map(move |r| {
            (0..self.cols)
                .filter(move |&c| self.cell(r, c))
                .map(move |c| (c as i8, r as i8))
        })
    }

    pub fn cell_count(&self) -> u32 {
        self.bits.count_ones()
    }

    /// Quarter turn: the new cell (col, rows - 1 - row) is the old (row, col).
    pub fn rotated(&self) -> Shape {
        let mut out = Shape::new(self.cols, self.rows, 0);
        for r in 0..self.rows {
            for c in 0..self.cols {
                if self.cell(r, c) {
                    out.mark(c, self.rows - 1 - r);
                }
            }
        }
        out
    }
}

/// Spawn-orientation footprint for a piece kind.
pub fn shape_of(kind: PieceKind) -> Shape {
    match kind {
        PieceKind::I => Shape::new(1, 4, 0b1111),
        PieceKind::J => Shape::new(2, 3, 0b111_001),
        PieceKind::L => Shape::new(2, 3, 0b111_100),
        PieceKind::T => Shape::new(2, 3, 0b111_010),
        PieceKind::S => Shape::new(2, 3, 0b011_110),
        PieceKind::Z => Shape::new(2, 3, 0b110_011),
        PieceKind::O => Shape::new(2, 2, 0b11_11),
        PieceKind::Mono => Shape::new(1, 1, 0b1),
        PieceKind::Domino => Shape::new(1, 2, 0b11),
        PieceKind::Corner => Shape::new(2, 2, 0b01_11),
        PieceKind::Tri => Shape::new(1, 3, 0b111),
    }
}

/// The active falling piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    pub kind: PieceKind,
    pub shape: Shape,
    pub x: i8,
    pub y: i8,
}

impl Piece {
    /// New piece horizontally centered on the top row.
    pub fn spawn(kind: PieceKind) -> Self {
        let shape = shape_of(kind);
        let x = (BOARD_COLS as i8) / 2 - (shape.cols() as i8) / 2;
        Self {
            kind,
            shape,
            x,
            y: 0,
        }
    }
}

/// Attempt a quarter turn with wall kicks.
///
/// `fits` judges a candidate (x, shape) placement at the piece's current
/// row. Candidates are the unkicked position, then one and two columns
/// toward the board center; the first that fits wins. Returns the committed
/// shape and horizontal offset, or `None` when every candidate collides or
/// the kind is rotation-exempt.
pub fn try_rotate(
    piece: &Piece,
    fits: impl Fn(i8, &Shape) -> bool,
) -> Option<(Shape, i8)> {
    if piece.kind.rotation_exempt() {
        return None;
    }

    let turned = piece.shape.rotated();
    let kick: i8 = if 2 * piece.x + (piece.shape.cols() as i8) < BOARD_COLS as i8 {
        1
    } else {
        -1
    };

    for dx in [0, kick, 2 * kick] {
        if fits(piece.x + dx, &turned) {
            return Some((turned, dx));
        }
    }
    None
}
