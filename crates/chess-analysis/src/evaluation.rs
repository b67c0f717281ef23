//! Chess position evaluation types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A centipawn evaluation as reported by the engine.
///
/// Positive values favour the side to move. Displayed in pawn units with an
/// explicit sign and two decimals (`+0.35`, `-1.20`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Raw engine score (100 = one pawn).
    pub centipawns: i32,
}

impl Evaluation {
    pub fn from_centipawns(centipawns: i32) -> Self {
        Self { centipawns }
    }

    /// The score in pawn units.
    pub fn pawns(&self) -> f64 {
        f64::from(self.centipawns) / 100.0
    }
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:+.2}", self.pawns())
    }
}

/// The side whose move the engine recommends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Side {
    #[default]
    White,
    Black,
}

impl Side {
    /// Read the side to move from the second field of a FEN string.
    ///
    /// Anything other than an explicit `b` yields [`Side::White`].
    pub fn from_fen(fen: &str) -> Self {
        match fen.split_whitespace().nth(1) {
            Some("b") => Side::Black,
            _ => Side::White,
        }
    }

    pub fn opponent(self) -> Self {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::White => write!(f, "White"),
            Side::Black => write!(f, "Black"),
        }
    }
}
