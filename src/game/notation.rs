//! Coordinate and move notation
//!
//! Conversions between square indices, algebraic square names and UCI move
//! strings. Everything here is purely syntactic; legality is decided by the
//! rules engine.

use crate::game::error::{GameError, GameResult};
use crate::game::types::{PromotionPiece, Square};
use std::fmt;
use std::str::FromStr;

pub fn square_to_file(square: Square) -> u8 {
    square.index() % 8
}

pub fn square_to_rank(square: Square) -> u8 {
    square.index() / 8
}

pub fn square_to_algebraic(square: Square) -> String {
    square.to_algebraic()
}

pub fn square_from_algebraic(text: &str) -> GameResult<Square> {
    Square::from_algebraic(text)
}

/// Build a UCI move from raw square indices
///
/// # Errors
///
/// [`GameError::InvalidSquare`] if either index is outside 0..=63.
pub fn build_uci(origin: u8, destination: u8, promotion: Option<PromotionPiece>) -> GameResult<String> {
    let mv = Move::new(Square::new(origin)?, Square::new(destination)?, promotion);
    Ok(mv.uci())
}

/// A move as two squares plus an optional promotion piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub origin: Square,
    pub destination: Square,
    pub promotion: Option<PromotionPiece>,
}

impl Move {
    pub fn new(origin: Square, destination: Square, promotion: Option<PromotionPiece>) -> Self {
        Self {
            origin,
            destination,
            promotion,
        }
    }

    /// Same squares, promoting to `piece`
    pub fn with_promotion(self, piece: PromotionPiece) -> Self {
        Self {
            promotion: Some(piece),
            ..self
        }
    }

    /// Parse a 4 or 5 character UCI move such as `e2e4` or `e7e8q`
    pub fn parse(text: &str) -> GameResult<Self> {
        let invalid = || GameError::InvalidNotation {
            notation: text.to_string(),
        };

        if !text.is_ascii() || !(4..=5).contains(&text.len()) {
            return Err(invalid());
        }

        let origin = Square::from_algebraic(&text[0..2]).map_err(|_| invalid())?;
        let destination = Square::from_algebraic(&text[2..4]).map_err(|_| invalid())?;
        let promotion = match text[4..].chars().next() {
            None => None,
            Some(letter) if letter.is_ascii_lowercase() => {
                Some(PromotionPiece::from_letter(letter).ok_or_else(invalid)?)
            }
            Some(_) => return Err(invalid()),
        };

        Ok(Move::new(origin, destination, promotion))
    }

    pub fn uci(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.origin, self.destination)?;
        if let Some(piece) = self.promotion {
            write!(f, "{}", piece.letter())?;
        }
        Ok(())
    }
}

impl FromStr for Move {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Move::parse(s)
    }
}
