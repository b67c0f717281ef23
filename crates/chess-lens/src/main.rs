//! chess-lens - Analyze a recognized chessboard position.
//!
//! Takes the FEN produced by a board recognizer, runs a UCI engine on it,
//! and prints the evaluation with the suggested move and expected reply.

mod config;
mod position;

use anyhow::Context;
use chess_analysis::{
    AnalysisError, AnalysisResult, CancelToken, EngineConfig, PositionAnalyzer, NO_ANALYSIS,
};
use clap::{Args, Parser, Subcommand};
use config::LensConfig;
use position::PositionSource;
use serde::Serialize;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::Level;

/// chess-lens - engine analysis for recognized board positions.
#[derive(Parser)]
#[command(name = "chess-lens")]
#[command(about = "Analyze a chess position with a UCI engine")]
struct Cli {
    /// Path to config file (defaults to ./chess-lens.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(flatten)]
    engine: EngineOverrides,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct EngineOverrides {
    /// Engine executable (name on PATH or path)
    #[arg(long, global = true)]
    engine: Option<PathBuf>,

    /// Engine think time per position in milliseconds
    #[arg(long, global = true)]
    movetime: Option<u64>,
}

impl EngineOverrides {
    fn apply(&self, config: &mut EngineConfig) {
        if let Some(engine) = &self.engine {
            config.engine_path = engine.clone();
        }
        if let Some(movetime) = self.movetime {
            config.think_time_ms = movetime;
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze one position
    Analyze {
        /// Position in FEN notation (read from stdin when omitted)
        fen: Option<String>,

        /// Read the position from a file instead
        #[arg(long, conflicts_with = "fen")]
        fen_file: Option<PathBuf>,

        /// Print the structured result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Analyze positions read line by line from stdin until EOF or Ctrl-C
    Watch,
}

/// JSON shape printed by `analyze --json`.
#[derive(Serialize)]
struct JsonReport {
    position: String,
    engine: PathBuf,
    think_time_ms: u64,
    result: Option<AnalysisResult>,
    report: String,
}

impl JsonReport {
    fn new(analyzer: &PositionAnalyzer, position: String) -> Self {
        let engine = analyzer.engine();
        Self {
            position,
            engine: engine.engine_path().to_path_buf(),
            think_time_ms: engine.config().think_time_ms,
            result: None,
            report: NO_ANALYSIS.to_string(),
        }
    }

    fn with_outcome(mut self, outcome: Result<Option<AnalysisResult>, AnalysisError>) -> Self {
        match outcome {
            Ok(Some(result)) => {
                self.report = result.to_string();
                self.result = Some(result);
            }
            Ok(None) => {}
            Err(e) => self.report = e.report(),
        }
        self
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = match &cli.config {
        Some(path) => LensConfig::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => LensConfig::load()?,
    };
    cli.engine.apply(&mut config.engine);
    tracing::debug!(?config, "configuration loaded");

    let analyzer = PositionAnalyzer::new(config.engine)?;

    match cli.command {
        Commands::Analyze {
            fen,
            fen_file,
            json,
        } => {
            let position = PositionSource::from_args(fen, fen_file).read().await?;
            if json {
                let report = analyze_json(analyzer, position).await?;
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                let cancel = CancelToken::new();
                let task = {
                    let cancel = cancel.clone();
                    tokio::task::spawn_blocking(move || {
                        analyzer.analyze_with_cancel(&position, &cancel)
                    })
                };
                println!("{}", until_ctrl_c(task, &cancel).await?);
            }
        }
        Commands::Watch => watch(analyzer).await?,
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

/// Wait for a blocking analysis, raising `cancel` if Ctrl-C arrives first.
///
/// A cancelled analysis still finishes and reports, so the engine is shut
/// down before we return.
async fn until_ctrl_c<T>(mut task: JoinHandle<T>, cancel: &CancelToken) -> anyhow::Result<T> {
    tokio::select! {
        result = &mut task => Ok(result?),
        _ = signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
            cancel.cancel();
            Ok(task.await?)
        }
    }
}

async fn analyze_json(analyzer: PositionAnalyzer, position: String) -> anyhow::Result<JsonReport> {
    let report = JsonReport::new(&analyzer, position.clone());
    let cancel = CancelToken::new();
    let task = {
        let cancel = cancel.clone();
        tokio::task::spawn_blocking(move || analyzer.analyze_result_with_cancel(&position, &cancel))
    };

    Ok(report.with_outcome(until_ctrl_c(task, &cancel).await?))
}

async fn watch(analyzer: PositionAnalyzer) -> anyhow::Result<()> {
    let cancel = CancelToken::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    tracing::info!("Watching stdin for positions");

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = signal::ctrl_c() => {
                tracing::info!("Shutdown signal received");
                break;
            }
        };
        let Some(line) = line else {
            break;
        };

        let position = match position::normalize(&line) {
            Ok(position) => position,
            Err(_) => continue,
        };

        let task = {
            let analyzer = analyzer.clone();
            let cancel = cancel.clone();
            tokio::task::spawn_blocking(move || analyzer.analyze_with_cancel(&position, &cancel))
        };
        let report = until_ctrl_c(task, &cancel).await?;
        println!("{}\n", report);

        if cancel.is_cancelled() {
            break;
        }
    }

    tracing::info!("Stopped watching");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_analysis::EngineError;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn overrides_replace_config_values() {
        let cli = Cli::parse_from([
            "chess-lens",
            "--engine",
            "/opt/sf",
            "--movetime",
            "750",
            "analyze",
            "8/8/8/8/8/8/8/8 w - - 0 1",
        ]);
        let mut config = EngineConfig::default();
        cli.engine.apply(&mut config);

        assert_eq!(config.engine_path, PathBuf::from("/opt/sf"));
        assert_eq!(config.think_time_ms, 750);
    }

    #[test]
    fn no_overrides_keep_config() {
        let cli = Cli::parse_from(["chess-lens", "watch"]);
        let mut config = EngineConfig::default();
        cli.engine.apply(&mut config);

        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn analyze_accepts_fen_file_and_json() {
        let cli = Cli::parse_from([
            "chess-lens",
            "-vv",
            "analyze",
            "--fen-file",
            "board.fen",
            "--json",
        ]);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Analyze {
                fen,
                fen_file,
                json,
            } => {
                assert_eq!(fen, None);
                assert_eq!(fen_file, Some(PathBuf::from("board.fen")));
                assert!(json);
            }
            Commands::Watch => panic!("Expected analyze command"),
        }
    }

    #[test]
    fn fen_and_fen_file_conflict() {
        let result = Cli::try_parse_from([
            "chess-lens",
            "analyze",
            "8/8/8/8/8/8/8/8 w - - 0 1",
            "--fen-file",
            "board.fen",
        ]);
        assert!(result.is_err());
    }

    #[cfg(unix)]
    fn sh_analyzer() -> PositionAnalyzer {
        let config = EngineConfig {
            think_time_ms: 1200,
            ..EngineConfig::with_engine_path("/bin/sh")
        };
        PositionAnalyzer::new(config).unwrap()
    }

    #[test]
    #[cfg(unix)]
    fn json_report_records_engine_and_result() {
        let line = "info depth 18 score cp 35 pv e2e4 e7e5";
        let result = AnalysisResult::from_info_line(line).unwrap();

        let report = JsonReport::new(&sh_analyzer(), "startpos-fen".to_string())
            .with_outcome(Ok(Some(result.clone())));

        assert_eq!(report.engine, PathBuf::from("/bin/sh"));
        assert_eq!(report.think_time_ms, 1200);
        assert_eq!(report.result, Some(result.clone()));
        assert_eq!(report.report, result.to_string());

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["position"], "startpos-fen");
        assert_eq!(json["engine"], "/bin/sh");
        assert_eq!(json["result"]["depth"], 18);
    }

    #[test]
    #[cfg(unix)]
    fn json_report_carries_failure_text() {
        let report = JsonReport::new(&sh_analyzer(), "fen".to_string())
            .with_outcome(Err(AnalysisError::from(EngineError::Timeout(8000))));

        assert_eq!(report.result, None);
        assert_eq!(
            report.report,
            "Error analyzing position: Engine did not report a best move within 8000 ms"
        );

        let report = JsonReport::new(&sh_analyzer(), "fen".to_string()).with_outcome(Ok(None));
        assert_eq!(report.report, NO_ANALYSIS);
    }
}
