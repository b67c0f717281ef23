//! Stockfish engine wrapper for position analysis.

use std::path::{Path, PathBuf};
use std::time::Instant;

use thiserror::Error;
use tracing::{debug, info, warn};
use uci::{EngineInfo, EngineMessage, GoOptions, GuiCommand, InfoTokens, UciError};

use crate::config::EngineConfig;
use crate::evaluation::Side;
use crate::report::parse_analysis_for;
use crate::session::{CancelToken, EngineSession};
use crate::ANALYSIS_ERROR_PREFIX;

/// Errors that can occur when working with chess engines.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Engine executable was not found at the specified path.
    #[error("Engine not found at path: {0}")]
    NotFound(String),
    /// Failed to spawn the engine process.
    #[error("Failed to spawn engine: {0}")]
    SpawnError(#[source] std::io::Error),
    /// The process started without the pipes we asked for.
    #[error("Engine initialization failed")]
    InitFailed,
    /// A command could not be written to the engine.
    #[error("Failed to send command: {0}")]
    Protocol(#[from] UciError),
    /// Reading engine output failed.
    #[error("Failed to read engine output: {0}")]
    Io(#[from] std::io::Error),
    /// No `bestmove` arrived before the search deadline.
    #[error("Engine did not report a best move within {0} ms")]
    Timeout(u64),
    /// The caller cancelled the analysis.
    #[error("Analysis cancelled")]
    Cancelled,
}

/// What the collector did with one line of engine output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOutcome {
    /// Blank line.
    Skipped,
    /// Not relevant to the analysis.
    Ignored,
    /// A scored line with a principal variation; replaces the previous one.
    Retained,
    /// The `bestmove` line. No further input is read.
    Finished,
}

/// Everything kept from one search.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchOutcome {
    /// Move from the `bestmove` line, when it carried one.
    pub best_move: Option<String>,
    /// Engine name from `id name`.
    pub engine_name: Option<String>,
    /// Whether the search ended with `bestmove` rather than end of output.
    pub completed: bool,
    last_scored_line: Option<String>,
}

impl SearchOutcome {
    /// The authoritative scored line: the last one seen before `bestmove`.
    ///
    /// A search cut short by the engine closing its output has none.
    pub fn scoring_line(&self) -> Option<&str> {
        if self.completed {
            self.last_scored_line.as_deref()
        } else {
            None
        }
    }
}

/// Line classifier for a running search.
///
/// Blank lines are skipped, `bestmove` ends the search, lines with both a
/// `score cp` pair and a `pv` marker are remembered (last one wins), and
/// everything else is ignored.
#[derive(Debug, Default)]
pub struct InfoCollector {
    outcome: SearchOutcome,
}

impl InfoCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feed(&mut self, line: &str) -> LineOutcome {
        if self.outcome.completed {
            return LineOutcome::Finished;
        }

        let tokens = InfoTokens::new(line);
        if tokens.is_empty() {
            return LineOutcome::Skipped;
        }

        match EngineMessage::parse(line) {
            EngineMessage::BestMove { mv, .. } => {
                self.outcome.best_move = mv;
                self.outcome.completed = true;
                LineOutcome::Finished
            }
            _ if tokens.is_scored_pv() => {
                self.outcome.last_scored_line = Some(line.trim().to_string());
                LineOutcome::Retained
            }
            EngineMessage::Id { name: Some(name), .. } => {
                self.outcome.engine_name = Some(name);
                LineOutcome::Ignored
            }
            _ => LineOutcome::Ignored,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.completed
    }

    pub fn finish(self) -> SearchOutcome {
        self.outcome
    }
}

/// The directives sent for one analysis request, in order.
pub fn command_sequence(position: &str, config: &EngineConfig) -> Vec<GuiCommand> {
    vec![
        GuiCommand::Uci,
        GuiCommand::IsReady,
        GuiCommand::set_option("UCI_AnalyseMode", config.analyse_mode),
        GuiCommand::set_option("MultiPV", config.multipv_lines),
        GuiCommand::position_fen(position),
        GuiCommand::Go(GoOptions::movetime(config.think_time_ms)),
    ]
}

/// Wrapper for UCI-compatible analysis engines like Stockfish.
///
/// Each analysis spawns a fresh engine process, which is shut down and
/// reaped before the call returns.
#[derive(Debug, Clone)]
pub struct AnalysisEngine {
    config: EngineConfig,
    engine_path: PathBuf,
}

impl AnalysisEngine {
    /// Create a new analysis engine.
    ///
    /// # Errors
    ///
    /// - `EngineError::NotFound` if the engine path doesn't exist. No
    ///   process is started in that case.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        let engine_path = config
            .resolve_engine_path()
            .ok_or_else(|| EngineError::NotFound(config.engine_path.display().to_string()))?;

        Ok(Self {
            config,
            engine_path,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The resolved executable.
    pub fn engine_path(&self) -> &Path {
        &self.engine_path
    }

    /// Run one timed search on `position`.
    pub fn search(&self, position: &str) -> Result<SearchOutcome, EngineError> {
        self.search_with_cancel(position, &CancelToken::new())
    }

    /// Run one timed search on `position`, stopping early if `cancel` is raised.
    pub fn search_with_cancel(
        &self,
        position: &str,
        cancel: &CancelToken,
    ) -> Result<SearchOutcome, EngineError> {
        let started = Instant::now();
        let mut session = EngineSession::spawn(
            &self.engine_path,
            &self.config.engine_args,
            self.config.quit_grace(),
        )?;

        for command in command_sequence(position, &self.config) {
            session.send(&command)?;
        }

        let budget = self.config.search_deadline();
        let deadline = Instant::now() + budget;
        let mut collector = InfoCollector::new();

        while let Some(line) = session.next_line(deadline, budget, cancel)? {
            match collector.feed(&line) {
                LineOutcome::Finished => break,
                LineOutcome::Retained => {
                    if let Some(info) = EngineInfo::parse(&line) {
                        debug!(depth = ?info.depth, score = ?info.score, "scored line");
                    }
                }
                LineOutcome::Skipped | LineOutcome::Ignored => {}
            }
        }

        if !collector.is_finished() {
            warn!("engine output ended before bestmove");
        }

        let outcome = collector.finish();
        info!(
            engine = outcome.engine_name.as_deref().unwrap_or("unknown"),
            best_move = outcome.best_move.as_deref().unwrap_or("-"),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "search finished"
        );
        Ok(outcome)
    }

    /// Analyze `position` and return the report text.
    ///
    /// Never fails: engine problems are reported as
    /// `Error analyzing position: ...`.
    pub fn analyze(&self, position: &str) -> String {
        self.analyze_with_cancel(position, &CancelToken::new())
    }

    pub fn analyze_with_cancel(&self, position: &str, cancel: &CancelToken) -> String {
        match self.search_with_cancel(position, cancel) {
            Ok(outcome) => parse_analysis_for(outcome.scoring_line(), Side::from_fen(position)),
            Err(e) => {
                warn!("analysis failed: {}", e);
                format!("{}{}", ANALYSIS_ERROR_PREFIX, e)
            }
        }
    }
}
