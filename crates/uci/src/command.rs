//! UCI commands sent from GUI to engine.

use std::io::Write;

use crate::UciError;

/// Commands sent from GUI to engine.
#[derive(Debug, Clone, PartialEq)]
pub enum GuiCommand {
    /// Initialize UCI mode.
    Uci,
    /// Check if engine is ready.
    IsReady,
    /// Set an engine option.
    SetOption { name: String, value: String },
    /// Set up position from a FEN string.
    Position { fen: String },
    /// Start calculating.
    Go(GoOptions),
    /// Stop calculating.
    Stop,
    /// Quit the engine.
    Quit,
}

/// Limits for the `go` command. No limit means search until `stop`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GoOptions {
    /// Search for exactly this time in milliseconds.
    pub movetime: Option<u64>,
}

impl GoOptions {
    /// Fixed think time search.
    pub fn movetime(ms: u64) -> Self {
        Self { movetime: Some(ms) }
    }

    fn to_uci(&self) -> String {
        match self.movetime {
            Some(ms) => format!("go movetime {}", ms),
            None => "go infinite".to_string(),
        }
    }
}

impl GuiCommand {
    /// Convenience constructor for `setoption name <name> value <value>`.
    pub fn set_option(name: &str, value: impl ToString) -> Self {
        GuiCommand::SetOption {
            name: name.to_string(),
            value: value.to_string(),
        }
    }

    /// `position fen <fen>`, with the FEN passed through unchanged.
    pub fn position_fen(fen: &str) -> Self {
        GuiCommand::Position {
            fen: fen.to_string(),
        }
    }

    /// Format the command as a single protocol line (no trailing newline).
    pub fn to_uci(&self) -> String {
        match self {
            GuiCommand::Uci => "uci".to_string(),
            GuiCommand::IsReady => "isready".to_string(),
            GuiCommand::SetOption { name, value } => {
                format!("setoption name {} value {}", name, value)
            }
            GuiCommand::Position { fen } => format!("position fen {}", fen),
            GuiCommand::Go(opts) => opts.to_uci(),
            GuiCommand::Stop => "stop".to_string(),
            GuiCommand::Quit => "quit".to_string(),
        }
    }

    /// Write the command followed by a newline and flush.
    ///
    /// Engines read their input line by line, so a command whose payload
    /// contains a line break would be split into several directives. Such
    /// commands are rejected before anything is written.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), UciError> {
        let line = self.to_uci();
        if line.contains(|c: char| c == '\n' || c == '\r') {
            return Err(UciError::InvalidCommand(line.escape_debug().to_string()));
        }
        writeln!(writer, "{}", line)?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_handshake() {
        assert_eq!(GuiCommand::Uci.to_uci(), "uci");
        assert_eq!(GuiCommand::IsReady.to_uci(), "isready");
        assert_eq!(GuiCommand::Quit.to_uci(), "quit");
    }

    #[test]
    fn format_set_option() {
        let cmd = GuiCommand::set_option("UCI_AnalyseMode", true);
        assert_eq!(cmd.to_uci(), "setoption name UCI_AnalyseMode value true");

        let cmd = GuiCommand::set_option("MultiPV", 1);
        assert_eq!(cmd.to_uci(), "setoption name MultiPV value 1");
    }

    #[test]
    fn format_position_fen_is_verbatim() {
        let fen = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1";
        assert_eq!(
            GuiCommand::position_fen(fen).to_uci(),
            format!("position fen {}", fen)
        );
    }

    #[test]
    fn format_go_movetime() {
        assert_eq!(GuiCommand::Go(GoOptions::movetime(3000)).to_uci(), "go movetime 3000");
    }

    #[test]
    fn format_go_without_limit() {
        assert_eq!(GuiCommand::Go(GoOptions::default()).to_uci(), "go infinite");
    }

    #[test]
    fn write_to_appends_newline() {
        let mut out = Vec::new();
        GuiCommand::Uci.write_to(&mut out).unwrap();
        GuiCommand::IsReady.write_to(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "uci\nisready\n");
    }

    #[test]
    fn write_to_rejects_embedded_newline() {
        let mut out = Vec::new();
        let cmd = GuiCommand::position_fen("8/8/8/8/8/8/8/8 w - - 0 1\nquit");
        let result = cmd.write_to(&mut out);
        assert!(matches!(result, Err(UciError::InvalidCommand(_))));
        assert!(out.is_empty());
    }
}
