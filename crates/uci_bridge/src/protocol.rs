//! UCI wire format
//!
//! Builds the command lines the GUI side sends and classifies the lines an
//! engine prints back. Only the subset needed to play a game is understood;
//! everything else is reported as [`EngineLine::Other`] and ignored upstream.
//!
//! ```text
//! > uci                         < id name GNU Chess 6.2.9
//! > setoption name K value V    < uciok
//! > isready                     < readyok
//! > ucinewgame
//! > position startpos moves e2e4
//! > go movetime 1000            < info depth 7 ...
//!                               < bestmove e7e5 ponder g1f3
//! ```

use crate::budget::SearchBudget;

/// Position handed to the engine: an optional start FEN plus the moves
/// played from it, in UCI notation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnginePosition {
    pub fen: Option<String>,
    pub moves: Vec<String>,
}

impl EnginePosition {
    pub fn from_moves(moves: impl IntoIterator<Item = String>) -> Self {
        Self {
            fen: None,
            moves: moves.into_iter().collect(),
        }
    }
}

/// Result of one search, as reported by `bestmove`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineReply {
    /// `None` when the engine reports no legal move (`(none)` or `0000`)
    pub best_move: Option<String>,
    /// Predicted answer to the best move; advisory only
    pub ponder: Option<String>,
}

/// One classified line of engine output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineLine {
    Id { name: String },
    UciOk,
    ReadyOk,
    BestMove(EngineReply),
    Info(String),
    Other(String),
}

pub fn set_option(name: &str, value: &str) -> String {
    format!("setoption name {name} value {value}")
}

pub fn position(position: &EnginePosition) -> String {
    let mut command = match &position.fen {
        Some(fen) => format!("position fen {fen}"),
        None => "position startpos".to_string(),
    };
    if !position.moves.is_empty() {
        command.push_str(" moves ");
        command.push_str(&position.moves.join(" "));
    }
    command
}

pub fn go_movetime(budget: SearchBudget) -> String {
    format!("go movetime {}", budget.millis())
}

/// Classify a line printed by the engine
pub fn parse_line(line: &str) -> EngineLine {
    let line = line.trim();
    let mut tokens = line.split_whitespace();

    match tokens.next() {
        Some("uciok") => EngineLine::UciOk,
        Some("readyok") => EngineLine::ReadyOk,
        Some("id") if tokens.next() == Some("name") => EngineLine::Id {
            name: tokens.collect::<Vec<_>>().join(" "),
        },
        Some("bestmove") => {
            let best_move = tokens.next().and_then(playable);
            let ponder = match tokens.next() {
                Some("ponder") => tokens.next().and_then(playable),
                _ => None,
            };
            EngineLine::BestMove(EngineReply { best_move, ponder })
        }
        Some("info") => EngineLine::Info(line.to_string()),
        _ => EngineLine::Other(line.to_string()),
    }
}

fn playable(token: &str) -> Option<String> {
    match token {
        "(none)" | "0000" | "none" => None,
        mv => Some(mv.to_string()),
    }
}
