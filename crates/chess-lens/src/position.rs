//! Where the position to analyze comes from.
//!
//! The board recognizer writes a FEN string; it reaches us as an argument,
//! a file, or on stdin.

use std::path::PathBuf;
use thiserror::Error;
use tokio::io::AsyncReadExt;

#[derive(Error, Debug)]
pub enum PositionError {
    #[error("Failed to read position: {0}")]
    Read(#[from] std::io::Error),
    #[error("No position supplied")]
    Empty,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PositionSource {
    Argument(String),
    File(PathBuf),
    Stdin,
}

impl PositionSource {
    pub fn from_args(fen: Option<String>, fen_file: Option<PathBuf>) -> Self {
        match (fen, fen_file) {
            (Some(fen), _) => PositionSource::Argument(fen),
            (None, Some(path)) => PositionSource::File(path),
            (None, None) => PositionSource::Stdin,
        }
    }

    pub async fn read(self) -> Result<String, PositionError> {
        let raw = match self {
            PositionSource::Argument(fen) => fen,
            PositionSource::File(path) => tokio::fs::read_to_string(path).await?,
            PositionSource::Stdin => {
                let mut buf = String::new();
                tokio::io::stdin().read_to_string(&mut buf).await?;
                buf
            }
        };
        normalize(&raw)
    }
}

/// First non-blank line, trimmed.
pub fn normalize(raw: &str) -> Result<String, PositionError> {
    raw.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
        .ok_or(PositionError::Empty)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    #[test]
    fn normalize_trims_recognizer_output() {
        let raw = format!("\n  {}  \n", FEN);
        assert_eq!(normalize(&raw).unwrap(), FEN);
    }

    #[test]
    fn normalize_rejects_blank_input() {
        assert!(matches!(normalize(""), Err(PositionError::Empty)));
        assert!(matches!(normalize(" \n\t\n"), Err(PositionError::Empty)));
    }

    #[test]
    fn argument_wins_over_file() {
        let source = PositionSource::from_args(Some(FEN.to_string()), Some(PathBuf::from("x")));
        assert_eq!(source, PositionSource::Argument(FEN.to_string()));
        assert_eq!(PositionSource::from_args(None, None), PositionSource::Stdin);
    }

    #[tokio::test]
    async fn reads_first_line_of_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("position.fen");
        std::fs::write(&path, format!("{}\nignored\n", FEN)).unwrap();

        let position = PositionSource::File(path).read().await.unwrap();
        assert_eq!(position, FEN);
    }

    #[tokio::test]
    async fn missing_file_is_read_error() {
        let result = PositionSource::File(PathBuf::from("/nonexistent/position.fen"))
            .read()
            .await;
        assert!(matches!(result, Err(PositionError::Read(_))));
    }
}
