//! Input handling
//!
//! Remote-control keys arrive as names (`up`, `5`, `red`, ...). [`RemoteKey`]
//! parses those names and maps each key onto the abstract [`InputEvent`] the
//! session understands. The keypad doubles as a direction pad:
//!
//! ```text
//!  1 2 3      ↖ ↑ ↗
//!  4 5 6  =>  ← ✓ →
//!  7 8 9      ↙ ↓ ↘
//! ```
//!
//! | Key           | Event             |
//! |---------------|-------------------|
//! | `ok`, `5`     | confirm           |
//! | `red`         | undo              |
//! | `green`       | hint              |
//! | `yellow`      | rotate board      |
//! | `blue`        | switch sides      |
//! | `nextBouquet` | more thinking time|
//! | `prevBouquet` | less thinking time|
//! | `cancel`      | cancel / close    |
//!
//! Keyboard users may also type a square name (`e2`), a promotion letter or
//! `new`; see [`parse_command`].

use crate::game::focus::Direction;
use crate::game::types::{PromotionPiece, Square};
use std::fmt;
use std::str::FromStr;

/// Everything the session reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Move(Direction),
    Confirm,
    Undo,
    Hint,
    Rotate,
    SwitchSides,
    IncreaseTime,
    DecreaseTime,
    ChoosePromotion(PromotionPiece),
    Cancel,
    NewGame,
    /// Focus and confirm a square in one step
    SelectAt(Square),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemoteKey {
    Up,
    Down,
    Left,
    Right,
    /// Keypad digit 1..=9
    Digit(u8),
    Ok,
    Red,
    Green,
    Yellow,
    Blue,
    NextBouquet,
    PrevBouquet,
    Cancel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownKey(pub String);

impl fmt::Display for UnknownKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown remote key '{}'", self.0)
    }
}

impl std::error::Error for UnknownKey {}

impl FromStr for RemoteKey {
    type Err = UnknownKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = match s {
            "up" => RemoteKey::Up,
            "down" => RemoteKey::Down,
            "left" => RemoteKey::Left,
            "right" => RemoteKey::Right,
            "ok" => RemoteKey::Ok,
            "red" => RemoteKey::Red,
            "green" => RemoteKey::Green,
            "yellow" => RemoteKey::Yellow,
            "blue" => RemoteKey::Blue,
            "nextBouquet" => RemoteKey::NextBouquet,
            "prevBouquet" => RemoteKey::PrevBouquet,
            "cancel" | "exit" => RemoteKey::Cancel,
            digit if digit.len() == 1 => match digit.as_bytes()[0] {
                b @ b'1'..=b'9' => RemoteKey::Digit(b - b'0'),
                _ => return Err(UnknownKey(s.to_string())),
            },
            _ => return Err(UnknownKey(s.to_string())),
        };
        Ok(key)
    }
}

impl RemoteKey {
    pub fn to_input(self) -> Option<InputEvent> {
        let event = match self {
            RemoteKey::Up | RemoteKey::Digit(2) => InputEvent::Move(Direction::North),
            RemoteKey::Down | RemoteKey::Digit(8) => InputEvent::Move(Direction::South),
            RemoteKey::Left | RemoteKey::Digit(4) => InputEvent::Move(Direction::West),
            RemoteKey::Right | RemoteKey::Digit(6) => InputEvent::Move(Direction::East),
            RemoteKey::Digit(1) => InputEvent::Move(Direction::NorthWest),
            RemoteKey::Digit(3) => InputEvent::Move(Direction::NorthEast),
            RemoteKey::Digit(7) => InputEvent::Move(Direction::SouthWest),
            RemoteKey::Digit(9) => InputEvent::Move(Direction::SouthEast),
            RemoteKey::Ok | RemoteKey::Digit(5) => InputEvent::Confirm,
            RemoteKey::Red => InputEvent::Undo,
            RemoteKey::Green => InputEvent::Hint,
            RemoteKey::Yellow => InputEvent::Rotate,
            RemoteKey::Blue => InputEvent::SwitchSides,
            RemoteKey::NextBouquet => InputEvent::IncreaseTime,
            RemoteKey::PrevBouquet => InputEvent::DecreaseTime,
            RemoteKey::Cancel => InputEvent::Cancel,
            RemoteKey::Digit(_) => return None,
        };
        Some(event)
    }
}

/// Parse one line of typed input
///
/// Accepts remote key names, square names (`e2`), promotion pieces
/// (`q`, `queen`, ...) and `new`. Returns `None` for anything else.
pub fn parse_command(line: &str) -> Option<InputEvent> {
    let line = line.trim();
    if let Ok(key) = line.parse::<RemoteKey>() {
        return key.to_input();
    }
    if let Ok(square) = Square::from_algebraic(line) {
        return Some(InputEvent::SelectAt(square));
    }

    let lower = line.to_ascii_lowercase();
    if lower == "new" {
        return Some(InputEvent::NewGame);
    }
    PromotionPiece::ALL
        .into_iter()
        .find(|piece| lower == piece.name().to_ascii_lowercase() || lower == piece.letter().to_string())
        .map(InputEvent::ChoosePromotion)
}
