//! Turning the engine's last scored line into a report.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uci::{EngineInfo, InfoTokens};

use crate::evaluation::{Evaluation, Side};
use crate::notation::format_move;
use crate::{NO_ANALYSIS, PARSE_ERROR_PREFIX};

/// Shown as the primary move when the principal variation is empty.
pub const NO_MOVE_FOUND: &str = "no move found";

/// Errors raised while reading a scored info line.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The line has no `score cp` pair, or nothing follows it.
    #[error("no centipawn score in '{0}'")]
    MissingScore(String),
    /// The token after `score cp` is not a 32-bit integer.
    #[error("invalid centipawn value '{0}'")]
    InvalidScore(String),
}

/// Structured form of an analysis report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Engine evaluation of the position.
    pub evaluation: Evaluation,
    /// Recommended move, formatted for display.
    pub primary_move: String,
    /// The reply the engine expects, formatted for display.
    pub secondary_move: Option<String>,
    /// Principal variation in engine notation.
    pub pv: Vec<String>,
    /// Search depth of the line, when the engine reported one.
    pub depth: Option<u32>,
    /// Side the recommendation is for.
    pub side: Side,
}

impl AnalysisResult {
    /// Read evaluation and principal variation from one engine line.
    ///
    /// The centipawn value is the token right after the `score cp` pair.
    /// The moves are every token after the first `pv` marker; only the
    /// first two are rendered.
    pub fn from_info_line(line: &str) -> Result<Self, ParseError> {
        let tokens = InfoTokens::new(line);

        let raw_score = tokens
            .centipawn_value()
            .flatten()
            .ok_or_else(|| ParseError::MissingScore(line.trim().to_string()))?;
        let centipawns: i32 = raw_score
            .parse()
            .map_err(|_| ParseError::InvalidScore(raw_score.to_string()))?;

        let pv: Vec<String> = tokens.pv().iter().map(|mv| mv.to_string()).collect();
        let primary_move = pv
            .first()
            .map(|mv| format_move(mv))
            .unwrap_or_else(|| NO_MOVE_FOUND.to_string());
        let secondary_move = pv.get(1).map(|mv| format_move(mv));

        let depth = EngineInfo::parse(line).and_then(|info| info.depth);

        Ok(Self {
            evaluation: Evaluation::from_centipawns(centipawns),
            primary_move,
            secondary_move,
            pv,
            depth,
            side: Side::White,
        })
    }

    /// Label the recommendation for `side`; the reply goes to the opponent.
    pub fn with_side(mut self, side: Side) -> Self {
        self.side = side;
        self
    }
}

impl fmt::Display for AnalysisResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Evaluation: {}", self.evaluation)?;
        write!(f, "Best move for {}: {}", self.side, self.primary_move)?;
        if let Some(reply) = &self.secondary_move {
            write!(f, "\nPredicted response for {}: {}", self.side.opponent(), reply)?;
        }
        Ok(())
    }
}

/// Render the report for the last scored line, labelled White/Black.
pub fn parse_analysis(line: Option<&str>) -> String {
    parse_analysis_for(line, Side::White)
}

/// Render the report for the last scored line with `side` to move.
///
/// Never fails: a missing line gives [`NO_ANALYSIS`], a malformed one an
/// `Error parsing analysis: ...` message.
pub fn parse_analysis_for(line: Option<&str>, side: Side) -> String {
    let Some(line) = line else {
        return NO_ANALYSIS.to_string();
    };

    match AnalysisResult::from_info_line(line) {
        Ok(result) => result.with_side(side).to_string(),
        Err(e) => format!("{}{}", PARSE_ERROR_PREFIX, e),
    }
}
