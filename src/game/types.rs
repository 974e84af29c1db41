//! Type definitions for chess game logic
//!
//! Newtypes for board coordinates and small enums for pieces. Squares are
//! numbered 0..=63 with `a1 = 0`, `h1 = 7`, `a8 = 56`; file = index % 8 and
//! rank = index / 8.

use crate::game::error::{GameError, GameResult};
use std::fmt;
use std::str::FromStr;

/// Board coordinate representing a file (column) on the chessboard
///
/// Values range from 0 (file 'a') to 7 (file 'h').
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct File(u8);

impl File {
    pub fn new(index: u8) -> Option<Self> {
        (index < 8).then_some(File(index))
    }

    /// Create a file from a character ('a'..='h')
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'a'..='h' => Some(File(c as u8 - b'a')),
            _ => None,
        }
    }

    /// Convert file to character ('a'..='h')
    pub fn to_char(self) -> char {
        (b'a' + self.0) as char
    }

    /// Get the file index (0-7)
    pub fn index(self) -> u8 {
        self.0
    }
}

/// Board coordinate representing a rank (row) on the chessboard
///
/// Values range from 0 (rank 1) to 7 (rank 8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Rank(u8);

impl Rank {
    pub fn new(index: u8) -> Option<Self> {
        (index < 8).then_some(Rank(index))
    }

    /// Create a rank from a number (1-8)
    pub fn from_number(n: u8) -> Option<Self> {
        if (1..=8).contains(&n) {
            Some(Rank(n - 1))
        } else {
            None
        }
    }

    /// Convert rank to number (1-8)
    pub fn to_number(self) -> u8 {
        self.0 + 1
    }

    /// Get the rank index (0-7)
    pub fn index(self) -> u8 {
        self.0
    }

    /// First or eighth rank, where pawns promote
    pub fn is_back_rank(self) -> bool {
        self.0 == 0 || self.0 == 7
    }
}

/// Board square, stored as its index 0..=63
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square(u8);

impl Square {
    pub const A1: Square = Square(0);
    /// White's starting focus
    pub const E2: Square = Square(12);
    /// Black's starting focus
    pub const E7: Square = Square(52);
    pub const E8: Square = Square(60);
    pub const H8: Square = Square(63);

    /// Create a square from its index
    ///
    /// # Errors
    ///
    /// [`GameError::InvalidSquare`] for indices outside 0..=63.
    pub fn new(index: u8) -> GameResult<Self> {
        if index < 64 {
            Ok(Square(index))
        } else {
            Err(GameError::InvalidSquare {
                square: u16::from(index),
            })
        }
    }

    pub fn from_coords(file: File, rank: Rank) -> Self {
        Square(rank.index() * 8 + file.index())
    }

    /// Create a square from algebraic notation (e.g., "e4")
    pub fn from_algebraic(s: &str) -> GameResult<Self> {
        let invalid = || GameError::InvalidNotation {
            notation: s.to_string(),
        };

        let mut chars = s.chars();
        let file = chars.next().and_then(File::from_char).ok_or_else(invalid)?;
        let rank = chars
            .next()
            .and_then(|c| c.to_digit(10))
            .and_then(|n| Rank::from_number(n as u8))
            .ok_or_else(invalid)?;
        if chars.next().is_some() {
            return Err(invalid());
        }

        Ok(Square::from_coords(file, rank))
    }

    /// Convert square to algebraic notation (e.g., "e4")
    pub fn to_algebraic(self) -> String {
        format!("{}{}", self.file().to_char(), self.rank().to_number())
    }

    pub fn index(self) -> u8 {
        self.0
    }

    pub fn file(self) -> File {
        File(self.0 % 8)
    }

    pub fn rank(self) -> Rank {
        Rank(self.0 / 8)
    }

    /// Square shifted by whole files and ranks, or `None` off the board
    pub fn offset(self, file_delta: i8, rank_delta: i8) -> Option<Square> {
        let file = self.file().index() as i8 + file_delta;
        let rank = self.rank().index() as i8 + rank_delta;
        let file = File::new(u8::try_from(file).ok()?)?;
        let rank = Rank::new(u8::try_from(rank).ok()?)?;
        Some(Square::from_coords(file, rank))
    }

    /// All 64 squares, a1 first
    pub fn all() -> impl Iterator<Item = Square> {
        (0..64).map(Square)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file().to_char(), self.rank().to_number())
    }
}

impl FromStr for Square {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Square::from_algebraic(s)
    }
}

impl TryFrom<u8> for Square {
    type Error = GameError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Square::new(index)
    }
}

impl From<Square> for u8 {
    fn from(square: Square) -> Self {
        square.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceColor {
    White,
    Black,
}

impl PieceColor {
    pub fn opposite(self) -> Self {
        match self {
            PieceColor::White => PieceColor::Black,
            PieceColor::Black => PieceColor::White,
        }
    }

    /// Square the focus jumps to when this side takes over
    pub fn start_focus(self) -> Square {
        match self {
            PieceColor::White => Square::E2,
            PieceColor::Black => Square::E7,
        }
    }
}

impl fmt::Display for PieceColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PieceColor::White => write!(f, "White"),
            PieceColor::Black => write!(f, "Black"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceType {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub color: PieceColor,
    pub piece_type: PieceType,
}

impl Piece {
    pub fn new(color: PieceColor, piece_type: PieceType) -> Self {
        Self { color, piece_type }
    }

    /// Unicode chess glyph
    pub fn symbol(self) -> char {
        match (self.color, self.piece_type) {
            (PieceColor::White, PieceType::King) => '♔',
            (PieceColor::White, PieceType::Queen) => '♕',
            (PieceColor::White, PieceType::Rook) => '♖',
            (PieceColor::White, PieceType::Bishop) => '♗',
            (PieceColor::White, PieceType::Knight) => '♘',
            (PieceColor::White, PieceType::Pawn) => '♙',
            (PieceColor::Black, PieceType::King) => '♚',
            (PieceColor::Black, PieceType::Queen) => '♛',
            (PieceColor::Black, PieceType::Rook) => '♜',
            (PieceColor::Black, PieceType::Bishop) => '♝',
            (PieceColor::Black, PieceType::Knight) => '♞',
            (PieceColor::Black, PieceType::Pawn) => '♟',
        }
    }
}

/// Pieces a pawn may promote to, in the order they are offered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromotionPiece {
    Queen,
    Rook,
    Knight,
    Bishop,
}

impl PromotionPiece {
    pub const ALL: [PromotionPiece; 4] = [
        PromotionPiece::Queen,
        PromotionPiece::Rook,
        PromotionPiece::Knight,
        PromotionPiece::Bishop,
    ];

    /// UCI suffix letter
    pub fn letter(self) -> char {
        match self {
            PromotionPiece::Queen => 'q',
            PromotionPiece::Rook => 'r',
            PromotionPiece::Knight => 'n',
            PromotionPiece::Bishop => 'b',
        }
    }

    pub fn from_letter(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'q' => Some(PromotionPiece::Queen),
            'r' => Some(PromotionPiece::Rook),
            'n' => Some(PromotionPiece::Knight),
            'b' => Some(PromotionPiece::Bishop),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PromotionPiece::Queen => "Queen",
            PromotionPiece::Rook => "Rook",
            PromotionPiece::Knight => "Knight",
            PromotionPiece::Bishop => "Bishop",
        }
    }

    pub fn piece_type(self) -> PieceType {
        match self {
            PromotionPiece::Queen => PieceType::Queen,
            PromotionPiece::Rook => PieceType::Rook,
            PromotionPiece::Knight => PieceType::Knight,
            PromotionPiece::Bishop => PieceType::Bishop,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_to_char() {
        assert_eq!(File(0).to_char(), 'a');
        assert_eq!(File(4).to_char(), 'e');
        assert_eq!(File(7).to_char(), 'h');
        assert_eq!(File::from_char('i'), None);
    }

    #[test]
    fn test_rank_from_number() {
        assert_eq!(Rank::from_number(1), Some(Rank(0)));
        assert_eq!(Rank::from_number(8), Some(Rank(7)));
        assert_eq!(Rank::from_number(0), None);
        assert_eq!(Rank::from_number(9), None);
    }

    #[test]
    fn test_square_index_layout() {
        //! file = index % 8, rank = index / 8
        let e2 = Square::new(12).unwrap();
        assert_eq!(e2, Square::E2);
        assert_eq!(e2.file().index(), 4);
        assert_eq!(e2.rank().index(), 1);
        assert_eq!(Square::new(52).unwrap().to_algebraic(), "e7");
        assert_eq!(Square::H8.to_algebraic(), "h8");
    }

    #[test]
    fn test_square_out_of_range() {
        assert!(matches!(
            Square::new(64),
            Err(GameError::InvalidSquare { square: 64 })
        ));
    }

    #[test]
    fn test_algebraic_round_trip_all_squares() {
        for square in Square::all() {
            let name = square.to_algebraic();
            assert_eq!(Square::from_algebraic(&name).unwrap(), square);
        }
    }

    #[test]
    fn test_algebraic_rejects_garbage() {
        for text in ["", "e", "e9", "i1", "e44", "E2"] {
            assert!(
                matches!(
                    Square::from_algebraic(text),
                    Err(GameError::InvalidNotation { .. })
                ),
                "accepted {text:?}"
            );
        }
    }

    #[test]
    fn test_offset_stays_on_board() {
        let h1 = Square::new(7).unwrap();
        assert_eq!(h1.offset(1, 0), None);
        assert_eq!(h1.offset(-1, 1).map(Square::to_algebraic).as_deref(), Some("g2"));
        assert_eq!(Square::A1.offset(0, -1), None);
        assert_eq!(Square::H8.offset(1, 1), None);
    }

    #[test]
    fn test_promotion_letters() {
        for piece in PromotionPiece::ALL {
            assert_eq!(PromotionPiece::from_letter(piece.letter()), Some(piece));
        }
        assert_eq!(PromotionPiece::from_letter('k'), None);
    }

    #[test]
    fn test_start_focus() {
        assert_eq!(PieceColor::White.start_focus(), Square::E2);
        assert_eq!(PieceColor::Black.start_focus(), Square::E7);
        assert_eq!(PieceColor::White.opposite(), PieceColor::Black);
    }
}
