//! Human-readable rendering of engine moves.
//!
//! Engines speak in long algebraic tokens such as `e2e4` or `e7e8q`. This
//! module validates those tokens and renders them as `e2 to e4` or
//! `e7 to e8 (promote to Queen)`.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Text shown in place of a token that is not a move.
pub const INVALID_MOVE: &str = "invalid move";

/// Reasons a token is not a move.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// Fewer than four characters.
    #[error("move token is shorter than four characters")]
    TooShort,
    /// A file outside `a..h` or a rank outside `1..8`.
    #[error("'{0}' is not a board square")]
    InvalidSquare(String),
}

/// A square such as `e4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Square {
    file: char,
    rank: char,
}

impl Square {
    fn new(file: char, rank: char) -> Result<Self, FormatError> {
        if ('a'..='h').contains(&file) && ('1'..='8').contains(&rank) {
            Ok(Self { file, rank })
        } else {
            Err(FormatError::InvalidSquare(format!("{}{}", file, rank)))
        }
    }

    pub fn file(&self) -> char {
        self.file
    }

    pub fn rank(&self) -> char {
        self.rank
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file, self.rank)
    }
}

/// Piece chosen by a promoting pawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Promotion {
    Queen,
    Rook,
    Bishop,
    Knight,
    /// A letter no engine should send; kept as written.
    Other(char),
}

impl Promotion {
    fn from_char(c: char) -> Self {
        match c.to_ascii_lowercase() {
            'q' => Promotion::Queen,
            'r' => Promotion::Rook,
            'b' => Promotion::Bishop,
            'n' => Promotion::Knight,
            _ => Promotion::Other(c),
        }
    }
}

impl fmt::Display for Promotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Promotion::Queen => write!(f, "Queen"),
            Promotion::Rook => write!(f, "Rook"),
            Promotion::Bishop => write!(f, "Bishop"),
            Promotion::Knight => write!(f, "Knight"),
            Promotion::Other(c) => write!(f, "{}", c),
        }
    }
}

/// A validated engine move token.
///
/// Only the first five characters are significant; anything after the
/// promotion letter is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveToken {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<Promotion>,
}

impl FromStr for MoveToken {
    type Err = FormatError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let chars: Vec<char> = token.chars().take(5).collect();
        if chars.len() < 4 {
            return Err(FormatError::TooShort);
        }

        let from = Square::new(chars[0], chars[1])?;
        let to = Square::new(chars[2], chars[3])?;
        let promotion = chars.get(4).copied().map(Promotion::from_char);

        Ok(Self { from, to, promotion })
    }
}

impl MoveToken {
    pub fn parse(token: &str) -> Result<Self, FormatError> {
        token.parse()
    }
}

impl fmt::Display for MoveToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.from, self.to)?;
        if let Some(piece) = self.promotion {
            write!(f, " (promote to {})", piece)?;
        }
        Ok(())
    }
}

/// Render an engine move for display.
///
/// Returns [`INVALID_MOVE`] for anything that is not a move. Validation is
/// total: every rejection is a [`FormatError`], so there is no other failure
/// text. Use [`MoveToken::parse`] to see why a token was rejected.
pub fn format_move(token: &str) -> String {
    match MoveToken::parse(token) {
        Ok(mv) => mv.to_string(),
        Err(_) => INVALID_MOVE.to_string(),
    }
}
