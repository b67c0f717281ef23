//! Position in, report out.
//!
//! This module provides the [`PositionAnalyzer`], the single entry point a
//! display layer needs: it runs the engine on a position and always hands
//! back text to show.

use thiserror::Error;
use tracing::info;

use crate::config::EngineConfig;
use crate::engine::{AnalysisEngine, EngineError};
use crate::evaluation::Side;
use crate::report::{AnalysisResult, ParseError};
use crate::session::CancelToken;
use crate::{ANALYSIS_ERROR_PREFIX, PARSE_ERROR_PREFIX};

/// Errors that can occur during a structured analysis.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Error from the analysis engine.
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),
    /// The engine's scored line could not be read.
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
}

impl AnalysisError {
    /// The text shown in place of a report when analysis fails.
    pub fn report(&self) -> String {
        match self {
            AnalysisError::Engine(e) => format!("{}{}", ANALYSIS_ERROR_PREFIX, e),
            AnalysisError::Parse(e) => format!("{}{}", PARSE_ERROR_PREFIX, e),
        }
    }
}

/// Analyzes single positions with a UCI engine.
#[derive(Debug, Clone)]
pub struct PositionAnalyzer {
    engine: AnalysisEngine,
}

impl PositionAnalyzer {
    /// Creates an analyzer for the engine described by `config`.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::NotFound` if the engine executable is missing.
    /// This is the only error the analyzer ever returns.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// use chess_analysis::{EngineConfig, PositionAnalyzer};
    ///
    /// let analyzer = PositionAnalyzer::new(EngineConfig::with_engine_path("/usr/bin/stockfish"))?;
    /// ```
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        let engine = AnalysisEngine::new(config)?;
        info!(engine = %engine.engine_path().display(), "analyzer ready");
        Ok(Self { engine })
    }

    pub fn engine(&self) -> &AnalysisEngine {
        &self.engine
    }

    /// Analyze a position and return the report to display.
    pub fn analyze(&self, position: &str) -> String {
        self.engine.analyze(position)
    }

    /// Like [`analyze`](Self::analyze), abandoning the search when `cancel` is raised.
    pub fn analyze_with_cancel(&self, position: &str, cancel: &CancelToken) -> String {
        self.engine.analyze_with_cancel(position, cancel)
    }

    /// Analyze a position and return the structured result.
    ///
    /// `Ok(None)` means the engine finished without a scored line.
    pub fn analyze_result(&self, position: &str) -> Result<Option<AnalysisResult>, AnalysisError> {
        self.analyze_result_with_cancel(position, &CancelToken::new())
    }

    pub fn analyze_result_with_cancel(
        &self,
        position: &str,
        cancel: &CancelToken,
    ) -> Result<Option<AnalysisResult>, AnalysisError> {
        let outcome = self.engine.search_with_cancel(position, cancel)?;
        match outcome.scoring_line() {
            Some(line) => {
                let result = AnalysisResult::from_info_line(line)?;
                Ok(Some(result.with_side(Side::from_fen(position))))
            }
            None => Ok(None),
        }
    }
}

/// One-shot analysis that never fails, not even on a missing engine.
pub fn analyze_position(config: EngineConfig, position: &str) -> String {
    match PositionAnalyzer::new(config) {
        Ok(analyzer) => analyzer.analyze(position),
        Err(e) => format!("{}{}", ANALYSIS_ERROR_PREFIX, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_engine_fails_construction() {
        let result = PositionAnalyzer::new(EngineConfig::with_engine_path("/nonexistent/stockfish"));
        assert!(matches!(result, Err(EngineError::NotFound(_))));
    }

    #[test]
    fn one_shot_reports_missing_engine() {
        let report = analyze_position(
            EngineConfig::with_engine_path("/nonexistent/stockfish"),
            "8/8/8/8/8/8/8/8 w - - 0 1",
        );
        assert_eq!(
            report,
            "Error analyzing position: Engine not found at path: /nonexistent/stockfish"
        );
    }

    #[test]
    fn analysis_error_display() {
        let err = AnalysisError::from(ParseError::InvalidScore("x".to_string()));
        assert_eq!(err.to_string(), "Parse error: invalid centipawn value 'x'");

        let err = AnalysisError::from(EngineError::Cancelled);
        assert_eq!(err.to_string(), "Engine error: Analysis cancelled");
    }

    #[test]
    fn analysis_error_report_matches_text_output() {
        let err = AnalysisError::from(ParseError::InvalidScore("x".to_string()));
        assert_eq!(err.report(), "Error parsing analysis: invalid centipawn value 'x'");

        let err = AnalysisError::from(EngineError::Timeout(8000));
        assert_eq!(
            err.report(),
            "Error analyzing position: Engine did not report a best move within 8000 ms"
        );
    }
}
