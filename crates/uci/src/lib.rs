//! UCI (Universal Chess Interface) protocol library for driving engines.
//!
//! This crate covers the GUI side of the protocol: rendering the commands a
//! GUI sends to an engine and classifying the lines the engine writes back.
//!
//! # Commands sent to the engine
//!
//! - `uci` - Initialize engine, get id and options
//! - `isready` / `readyok` - Synchronization
//! - `setoption name <id> value <x>` - Configure an engine option
//! - `position fen <fen>` - Set position
//! - `go movetime <ms>` / `go infinite` - Start search
//! - `stop` - Interrupt a search
//! - `quit` - Exit engine
//!
//! # Engine output
//!
//! - [`EngineMessage::parse`] - Classify one line of engine output
//! - [`InfoTokens`] - Token view of an `info` line for exact marker matching

mod command;
mod info;

pub use command::{GoOptions, GuiCommand};
pub use info::{EngineInfo, InfoTokens, Score};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum UciError {
    #[error("Invalid command: {0}")]
    InvalidCommand(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Messages sent from engine to GUI.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineMessage {
    /// Engine identification.
    Id { name: Option<String>, author: Option<String> },
    /// UCI initialization complete.
    UciOk,
    /// Engine is ready.
    ReadyOk,
    /// Search information.
    Info(EngineInfo),
    /// Best move found. The move is absent when the engine sent a bare `bestmove`.
    BestMove { mv: Option<String>, ponder: Option<String> },
    /// Anything else (option listings, banners, blank lines).
    Other(String),
}

impl EngineMessage {
    /// Classify a single line of engine output.
    ///
    /// Matching is done on the first whitespace token, so `bestmove` only
    /// counts when it starts the line.
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let mut parts = line.split_whitespace();

        match parts.next() {
            Some("uciok") => EngineMessage::UciOk,
            Some("readyok") => EngineMessage::ReadyOk,
            Some("bestmove") => {
                let mv = parts.next().map(str::to_string);
                let ponder = match parts.next() {
                    Some("ponder") => parts.next().map(str::to_string),
                    _ => None,
                };
                EngineMessage::BestMove { mv, ponder }
            }
            Some("id") => {
                let rest: Vec<&str> = parts.collect();
                match rest.split_first() {
                    Some((&"name", value)) if !value.is_empty() => EngineMessage::Id {
                        name: Some(value.join(" ")),
                        author: None,
                    },
                    Some((&"author", value)) if !value.is_empty() => EngineMessage::Id {
                        name: None,
                        author: Some(value.join(" ")),
                    },
                    _ => EngineMessage::Other(line.to_string()),
                }
            }
            Some("info") => match EngineInfo::parse(line) {
                Some(info) => EngineMessage::Info(info),
                None => EngineMessage::Other(line.to_string()),
            },
            _ => EngineMessage::Other(line.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_bestmove_with_ponder() {
        let msg = EngineMessage::parse("bestmove e2e4 ponder e7e5");
        assert_eq!(
            msg,
            EngineMessage::BestMove {
                mv: Some("e2e4".to_string()),
                ponder: Some("e7e5".to_string()),
            }
        );
    }

    #[test]
    fn parse_bare_bestmove() {
        let msg = EngineMessage::parse("bestmove");
        assert_eq!(msg, EngineMessage::BestMove { mv: None, ponder: None });
    }

    #[test]
    fn bestmove_must_lead_the_line() {
        let msg = EngineMessage::parse("info string bestmove e2e4");
        assert!(matches!(msg, EngineMessage::Info(_)));
    }

    #[test]
    fn parse_id_name_keeps_spaces() {
        let msg = EngineMessage::parse("id name Stockfish 16.1");
        assert_eq!(
            msg,
            EngineMessage::Id {
                name: Some("Stockfish 16.1".to_string()),
                author: None,
            }
        );
    }

    #[test]
    fn parse_handshake_replies() {
        assert_eq!(EngineMessage::parse("uciok"), EngineMessage::UciOk);
        assert_eq!(EngineMessage::parse("  readyok \n"), EngineMessage::ReadyOk);
    }

    #[test]
    fn parse_unrelated_line() {
        let msg = EngineMessage::parse("option name Hash type spin default 16 min 1 max 33554432");
        assert!(matches!(msg, EngineMessage::Other(_)));
    }

    #[test]
    fn parse_info_message() {
        match EngineMessage::parse("info depth 3 score cp 12 pv e2e4") {
            EngineMessage::Info(info) => {
                assert_eq!(info.depth, Some(3));
                assert_eq!(info.score, Some(Score::Cp(12)));
            }
            other => panic!("Expected Info, got {:?}", other),
        }
    }

    #[test]
    fn test_uci_error_display() {
        let invalid = UciError::InvalidCommand("position".to_string());
        assert_eq!(invalid.to_string(), "Invalid command: position");

        let io = UciError::from(std::io::Error::new(
            std::io::ErrorKind::BrokenPipe,
            "pipe closed",
        ));
        assert!(io.to_string().contains("pipe closed"));
    }
}
