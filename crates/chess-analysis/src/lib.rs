//! Chess position analysis with Stockfish integration.
//!
//! This crate turns a position string into a human-readable recommendation
//! by running a UCI engine for a fixed think time and reading back its
//! principal variation.
//!
//! # Overview
//!
//! - [`format_move`] - Render `e7e8q` as `e7 to e8 (promote to Queen)`
//! - [`parse_analysis`] - Turn the last scored `info` line into a report
//! - [`AnalysisEngine`] - Drives one engine process per analysis request
//! - [`PositionAnalyzer`] - Position in, report out; never fails after setup
//!
//! # Example
//!
//! ```ignore
//! use chess_analysis::{EngineConfig, PositionAnalyzer};
//!
//! let analyzer = PositionAnalyzer::new(EngineConfig::default())?;
//! let report = analyzer.analyze("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
//! println!("{}", report);
//! ```

pub mod analyzer;
pub mod config;
pub mod engine;
pub mod evaluation;
pub mod notation;
pub mod report;
pub mod session;

pub use analyzer::{analyze_position, AnalysisError, PositionAnalyzer};
pub use config::EngineConfig;
pub use engine::{command_sequence, AnalysisEngine, EngineError, InfoCollector, LineOutcome, SearchOutcome};
pub use evaluation::{Evaluation, Side};
pub use notation::{format_move, FormatError, MoveToken, Promotion, Square};
pub use report::{parse_analysis, parse_analysis_for, AnalysisResult, ParseError};
pub use session::{CancelToken, EngineSession};

/// Report returned when the engine produced no scored line.
pub const NO_ANALYSIS: &str = "Could not analyze position";

/// Prefix of every report produced by a failed engine run.
pub const ANALYSIS_ERROR_PREFIX: &str = "Error analyzing position: ";

/// Prefix of every report produced by a malformed scored line.
pub const PARSE_ERROR_PREFIX: &str = "Error parsing analysis: ";
