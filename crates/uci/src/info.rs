//! UCI info line types.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Score in centipawns or mate distance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Score {
    /// Centipawn score (100 = 1 pawn advantage).
    Cp(i32),
    /// Mate in N moves (positive = engine winning, negative = engine losing).
    Mate(i32),
}

/// Search information from engine.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EngineInfo {
    /// Search depth in plies.
    pub depth: Option<u32>,
    /// Selective search depth.
    pub seldepth: Option<u32>,
    /// Index of this line when the engine reports several (`multipv`).
    pub multipv: Option<u32>,
    /// Score evaluation.
    pub score: Option<Score>,
    /// Nodes searched.
    pub nodes: Option<u64>,
    /// Nodes per second.
    pub nps: Option<u64>,
    /// Time spent in milliseconds.
    pub time: Option<u64>,
    /// Principal variation (best line found).
    pub pv: Vec<String>,
    /// Current move being searched.
    pub currmove: Option<String>,
    /// Current move number.
    pub currmovenumber: Option<u32>,
    /// Hash table usage (per mille).
    pub hashfull: Option<u32>,
    /// Arbitrary string info.
    pub string: Option<String>,
}

impl EngineInfo {
    /// Parse UCI info line.
    ///
    /// Unknown keywords and unparsable values are skipped; use
    /// [`InfoTokens`] when a malformed value has to be reported.
    pub fn parse(line: &str) -> Option<Self> {
        let mut tokens = line.split_whitespace().peekable();
        if tokens.next() != Some("info") {
            return None;
        }

        let mut info = EngineInfo::default();
        while let Some(keyword) = tokens.next() {
            match keyword {
                "depth" => info.depth = parse_next(&mut tokens),
                "seldepth" => info.seldepth = parse_next(&mut tokens),
                "multipv" => info.multipv = parse_next(&mut tokens),
                "score" => match tokens.next() {
                    Some("cp") => {
                        if let Some(cp) = parse_next(&mut tokens) {
                            info.score = Some(Score::Cp(cp));
                        }
                    }
                    Some("mate") => {
                        if let Some(moves) = parse_next(&mut tokens) {
                            info.score = Some(Score::Mate(moves));
                        }
                    }
                    _ => {}
                },
                "nodes" => info.nodes = parse_next(&mut tokens),
                "nps" => info.nps = parse_next(&mut tokens),
                "time" => info.time = parse_next(&mut tokens),
                "pv" => {
                    while let Some(mv) = tokens.next_if(|t| !is_info_keyword(t)) {
                        info.pv.push(mv.to_string());
                    }
                }
                "currmove" => info.currmove = tokens.next().map(str::to_string),
                "currmovenumber" => info.currmovenumber = parse_next(&mut tokens),
                "hashfull" => info.hashfull = parse_next(&mut tokens),
                "string" => {
                    // Rest of line
                    info.string = Some(tokens.by_ref().collect::<Vec<_>>().join(" "));
                    break;
                }
                _ => {}
            }
        }

        Some(info)
    }
}

/// Consume one token and parse it, giving `None` for a missing or bad value.
fn parse_next<'a, T: FromStr>(tokens: &mut impl Iterator<Item = &'a str>) -> Option<T> {
    tokens.next().and_then(|t| t.parse().ok())
}

fn is_info_keyword(s: &str) -> bool {
    matches!(
        s,
        "depth" | "seldepth" | "multipv" | "score" | "nodes" | "nps" | "time"
        | "pv" | "currmove" | "currmovenumber" | "hashfull" | "string"
    )
}

/// Whitespace tokens of one engine line, matched by token identity.
///
/// Marker lookups never match inside other words: `multipv` is not a `pv`
/// marker and `score mate` is not a `score cp` marker.
#[derive(Debug, Clone)]
pub struct InfoTokens<'a> {
    tokens: Vec<&'a str>,
}

impl<'a> InfoTokens<'a> {
    pub fn new(line: &'a str) -> Self {
        Self {
            tokens: line.split_whitespace().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Index of the first `score cp` pair (pointing at `score`).
    fn centipawn_marker(&self) -> Option<usize> {
        self.tokens
            .windows(2)
            .position(|pair| pair[0] == "score" && pair[1] == "cp")
    }

    fn pv_marker(&self) -> Option<usize> {
        self.tokens.iter().position(|&t| t == "pv")
    }

    /// True when the line carries a `score cp` pair.
    pub fn has_centipawn_score(&self) -> bool {
        self.centipawn_marker().is_some()
    }

    /// True when the line carries a `pv` marker.
    pub fn has_pv(&self) -> bool {
        self.pv_marker().is_some()
    }

    /// True for lines worth keeping while a search runs: both a centipawn
    /// score and a principal variation marker are present.
    pub fn is_scored_pv(&self) -> bool {
        self.has_centipawn_score() && self.has_pv()
    }

    /// The raw value token following `score cp`.
    ///
    /// Returns `Some(None)` when the marker is present but the line ends
    /// right after it, and `None` when there is no marker at all.
    pub fn centipawn_value(&self) -> Option<Option<&'a str>> {
        self.centipawn_marker()
            .map(|idx| self.tokens.get(idx + 2).copied())
    }

    /// Every token after the first `pv` marker, in order.
    pub fn pv(&self) -> &[&'a str] {
        match self.pv_marker() {
            Some(idx) => &self.tokens[idx + 1..],
            None => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_info() {
        let line = "info depth 12 score cp 30 nodes 125000 nps 500000 pv e2e4 e7e5 g1f3";
        let info = EngineInfo::parse(line).unwrap();

        assert_eq!(info.depth, Some(12));
        assert_eq!(info.score, Some(Score::Cp(30)));
        assert_eq!(info.nodes, Some(125000));
        assert_eq!(info.nps, Some(500000));
        assert_eq!(info.pv, vec!["e2e4", "e7e5", "g1f3"]);
    }

    #[test]
    fn parse_mate_score() {
        let line = "info depth 20 score mate 3 pv e2e4";
        let info = EngineInfo::parse(line).unwrap();

        assert_eq!(info.score, Some(Score::Mate(3)));
    }

    #[test]
    fn parse_multipv_and_string() {
        let line = "info depth 5 multipv 1 score cp -4 pv d2d4 string NNUE evaluation enabled";
        let info = EngineInfo::parse(line).unwrap();

        assert_eq!(info.multipv, Some(1));
        assert_eq!(info.score, Some(Score::Cp(-4)));
        assert_eq!(info.pv, vec!["d2d4"]);
        assert_eq!(info.string.as_deref(), Some("NNUE evaluation enabled"));
    }

    #[test]
    fn parse_rejects_non_info() {
        assert!(EngineInfo::parse("bestmove e2e4").is_none());
        assert!(EngineInfo::parse("information").is_none());
    }

    #[test]
    fn tokens_detect_scored_pv() {
        let tokens = InfoTokens::new("info depth 20 score cp 35 pv e2e4 e7e5");
        assert!(tokens.is_scored_pv());
        assert_eq!(tokens.centipawn_value(), Some(Some("35")));
        assert_eq!(tokens.pv(), &["e2e4", "e7e5"]);
    }

    #[test]
    fn tokens_ignore_multipv_as_pv_marker() {
        let tokens = InfoTokens::new("info depth 1 multipv 1 score cp 10 nodes 20");
        assert!(tokens.has_centipawn_score());
        assert!(!tokens.has_pv());
        assert!(!tokens.is_scored_pv());
        assert!(tokens.pv().is_empty());
    }

    #[test]
    fn tokens_ignore_mate_scores() {
        let tokens = InfoTokens::new("info depth 30 score mate 2 pv h5f7");
        assert!(!tokens.has_centipawn_score());
        assert!(!tokens.is_scored_pv());
        assert_eq!(tokens.centipawn_value(), None);
    }

    #[test]
    fn tokens_report_missing_value() {
        let tokens = InfoTokens::new("info score cp");
        assert_eq!(tokens.centipawn_value(), Some(None));
    }

    #[test]
    fn tokens_pv_uses_first_marker() {
        let tokens = InfoTokens::new("info score cp 1 pv a2a3 pv b2b3");
        assert_eq!(tokens.pv(), &["a2a3", "pv", "b2b3"]);
    }

    #[test]
    fn tokens_of_blank_line() {
        let tokens = InfoTokens::new("   ");
        assert!(tokens.is_empty());
        assert!(!tokens.is_scored_pv());
    }
}
