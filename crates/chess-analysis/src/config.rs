//! Engine settings for an analysis run.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Settings for the engine process and the search it runs.
///
/// Deserializes from the `[engine]` table of the configuration file; every
/// field is optional there.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EngineConfig {
    /// Engine executable. Bare names are looked up on `PATH`.
    #[serde(default = "default_engine_path")]
    pub engine_path: PathBuf,
    /// Arguments passed to the engine executable.
    ///
    /// A wrapper script used as the engine must `exec` the real engine.
    /// Shutdown only kills the direct child, so a process the wrapper forks
    /// would outlive the analysis.
    #[serde(default)]
    pub engine_args: Vec<String>,
    /// Think time sent as `go movetime`.
    #[serde(default = "default_think_time_ms")]
    pub think_time_ms: u64,
    /// Value of the `MultiPV` option.
    #[serde(default = "default_multipv_lines")]
    pub multipv_lines: u32,
    /// Value of the `UCI_AnalyseMode` option.
    #[serde(default = "default_analyse_mode")]
    pub analyse_mode: bool,
    /// Extra time on top of the think time before the search is abandoned.
    #[serde(default = "default_deadline_margin_ms")]
    pub deadline_margin_ms: u64,
    /// How long to wait for the engine to exit after `quit` before killing it.
    #[serde(default = "default_quit_grace_ms")]
    pub quit_grace_ms: u64,
}

fn default_engine_path() -> PathBuf {
    PathBuf::from("stockfish")
}

fn default_think_time_ms() -> u64 {
    3000
}

fn default_multipv_lines() -> u32 {
    1
}

fn default_analyse_mode() -> bool {
    true
}

fn default_deadline_margin_ms() -> u64 {
    5000
}

fn default_quit_grace_ms() -> u64 {
    100
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            engine_path: default_engine_path(),
            engine_args: Vec::new(),
            think_time_ms: default_think_time_ms(),
            multipv_lines: default_multipv_lines(),
            analyse_mode: default_analyse_mode(),
            deadline_margin_ms: default_deadline_margin_ms(),
            quit_grace_ms: default_quit_grace_ms(),
        }
    }
}

impl EngineConfig {
    /// Default settings for the engine at `path`.
    pub fn with_engine_path(path: impl Into<PathBuf>) -> Self {
        Self {
            engine_path: path.into(),
            ..Self::default()
        }
    }

    /// Time allowed from sending `go` to receiving `bestmove`.
    pub fn search_deadline(&self) -> Duration {
        Duration::from_millis(self.think_time_ms.saturating_add(self.deadline_margin_ms))
    }

    pub fn quit_grace(&self) -> Duration {
        Duration::from_millis(self.quit_grace_ms)
    }

    /// Locate the engine executable.
    ///
    /// An existing path is used as is. A bare file name that does not exist
    /// relative to the working directory is searched for on `PATH`.
    pub fn resolve_engine_path(&self) -> Option<PathBuf> {
        let path = &self.engine_path;
        if path.exists() {
            return Some(path.clone());
        }
        if path.components().count() != 1 {
            return None;
        }

        let search_path = std::env::var_os("PATH")?;
        std::env::split_paths(&search_path)
            .map(|dir| dir.join(path))
            .find(|candidate| candidate.is_file())
    }
}
