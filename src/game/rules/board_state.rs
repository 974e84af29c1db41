//! [`RulesEngine`] backed by `shakmaty`
//!
//! Undo keeps a stack of earlier positions rather than reversing moves, and
//! repetition detection compares (board, side to move, castling rights,
//! en passant square) keys recorded after every move.

use crate::game::error::{GameError, GameResult};
use crate::game::notation::Move;
use crate::game::rules::{AppliedMove, GameOverReason, MoveKind, RulesEngine};
use crate::game::types::{Piece, PieceColor, PieceType, PromotionPiece, Square};
use shakmaty::fen::Fen;
use shakmaty::uci::UciMove;
use shakmaty::{Bitboard, Board, CastlingMode, Chess, Color, EnPassantMode, Position, Role};
use tracing::{debug, trace};

/// Halfmove clock value at which the fifty-move rule may be claimed
const FIFTY_MOVE_PLIES: u32 = 100;

/// Everything that makes two positions "the same" for repetition
#[derive(Debug, Clone, PartialEq, Eq)]
struct PositionKey {
    board: Board,
    turn: Color,
    castling: Bitboard,
    ep_square: Option<shakmaty::Square>,
}

impl PositionKey {
    fn of(position: &Chess) -> Self {
        Self {
            board: position.board().clone(),
            turn: position.turn(),
            castling: position.castles().castling_rights(),
            ep_square: position.ep_square(EnPassantMode::Legal),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ShakmatyRules {
    start: Chess,
    start_fen: Option<String>,
    position: Chess,
    undo_stack: Vec<Chess>,
    moves: Vec<String>,
    keys: Vec<PositionKey>,
}

impl Default for ShakmatyRules {
    fn default() -> Self {
        Self::with_start(Chess::default(), None)
    }
}

impl ShakmatyRules {
    /// Standard starting position
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a FEN position instead of the standard setup
    ///
    /// # Errors
    ///
    /// [`GameError::InvalidNotation`] if the FEN does not parse or describes
    /// an impossible position.
    pub fn from_fen(fen: &str) -> GameResult<Self> {
        let invalid = || GameError::InvalidNotation {
            notation: fen.to_string(),
        };

        let setup: Fen = fen.trim().parse().map_err(|_| invalid())?;
        let position: Chess = setup
            .into_position(CastlingMode::Standard)
            .map_err(|_| invalid())?;

        debug!("[RULES] Starting from FEN {}", fen.trim());
        Ok(Self::with_start(position, Some(fen.trim().to_string())))
    }

    fn with_start(start: Chess, start_fen: Option<String>) -> Self {
        let keys = vec![PositionKey::of(&start)];
        Self {
            position: start.clone(),
            start,
            start_fen,
            undo_stack: Vec::new(),
            moves: Vec::new(),
            keys,
        }
    }

    fn parse_legal(&self, uci: &str) -> GameResult<shakmaty::Move> {
        let parsed: UciMove = uci.parse().map_err(|_| GameError::InvalidNotation {
            notation: uci.to_string(),
        })?;
        parsed
            .to_move(&self.position)
            .map_err(|_| GameError::InvalidMove {
                uci: uci.to_string(),
                reason: "not legal in the current position".to_string(),
            })
    }

    fn is_threefold_repetition(&self) -> bool {
        match self.keys.last() {
            Some(current) => self.keys.iter().filter(|key| *key == current).count() >= 3,
            None => false,
        }
    }
}

fn to_shakmaty_square(square: Square) -> shakmaty::Square {
    shakmaty::Square::new(u32::from(square.index()))
}

fn piece_color(color: Color) -> PieceColor {
    match color {
        Color::White => PieceColor::White,
        Color::Black => PieceColor::Black,
    }
}

fn piece_type(role: Role) -> PieceType {
    match role {
        Role::Pawn => PieceType::Pawn,
        Role::Knight => PieceType::Knight,
        Role::Bishop => PieceType::Bishop,
        Role::Rook => PieceType::Rook,
        Role::Queen => PieceType::Queen,
        Role::King => PieceType::King,
    }
}

impl RulesEngine for ShakmatyRules {
    fn apply_move(&mut self, uci: &str) -> GameResult<AppliedMove> {
        let mv = self.parse_legal(uci)?;

        let kind = if mv.is_castle() {
            MoveKind::Castle
        } else if mv.is_en_passant() {
            MoveKind::EnPassant
        } else if mv.is_promotion() {
            MoveKind::Promotion
        } else if mv.is_capture() {
            MoveKind::Capture
        } else {
            MoveKind::Normal
        };
        let canonical = mv.to_uci(CastlingMode::Standard).to_string();
        let squares = Move::parse(&canonical)?;

        self.undo_stack.push(self.position.clone());
        self.position.play_unchecked(mv);
        self.moves.push(canonical.clone());
        self.keys.push(PositionKey::of(&self.position));
        trace!("[RULES] Played {} ({:?})", canonical, kind);

        Ok(AppliedMove {
            origin: squares.origin,
            destination: squares.destination,
            uci: canonical,
            kind,
        })
    }

    fn undo_last_move(&mut self) -> Option<String> {
        let previous = self.undo_stack.pop()?;
        self.position = previous;
        self.keys.pop();
        self.moves.pop()
    }

    fn is_check(&self) -> bool {
        self.position.is_check()
    }

    fn termination(&self, claim_draw: bool) -> Option<GameOverReason> {
        if self.position.is_checkmate() {
            return Some(GameOverReason::Checkmate {
                winner: piece_color(self.position.turn()).opposite(),
            });
        }
        if self.position.is_stalemate() {
            return Some(GameOverReason::Stalemate);
        }
        if self.position.is_insufficient_material() {
            return Some(GameOverReason::InsufficientMaterial);
        }
        if claim_draw {
            if self.position.halfmoves() >= FIFTY_MOVE_PLIES {
                return Some(GameOverReason::FiftyMoveRule);
            }
            if self.is_threefold_repetition() {
                return Some(GameOverReason::ThreefoldRepetition);
            }
        }
        None
    }

    fn piece_at(&self, square: Square) -> Option<Piece> {
        self.position
            .board()
            .piece_at(to_shakmaty_square(square))
            .map(|piece| Piece::new(piece_color(piece.color), piece_type(piece.role)))
    }

    fn side_to_move(&self) -> PieceColor {
        piece_color(self.position.turn())
    }

    fn requires_promotion(&self, origin: Square, destination: Square) -> bool {
        let Some(piece) = self.piece_at(origin) else {
            return false;
        };
        if piece.piece_type != PieceType::Pawn
            || piece.color != self.side_to_move()
            || !destination.rank().is_back_rank()
        {
            return false;
        }

        let with_queen = Move::new(origin, destination, Some(PromotionPiece::Queen));
        self.parse_legal(&with_queen.uci()).is_ok()
    }

    fn move_history(&self) -> &[String] {
        &self.moves
    }

    fn start_fen(&self) -> Option<&str> {
        self.start_fen.as_deref()
    }

    fn reset(&mut self) {
        *self = Self::with_start(self.start.clone(), self.start_fen.take());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(name: &str) -> Square {
        Square::from_algebraic(name).unwrap()
    }

    fn play_all(rules: &mut ShakmatyRules, moves: &[&str]) {
        for uci in moves {
            rules.apply_move(uci).unwrap();
        }
    }

    #[test]
    fn test_start_position() {
        let rules = ShakmatyRules::new();
        assert_eq!(rules.side_to_move(), PieceColor::White);
        assert_eq!(
            rules.piece_at(sq("e2")),
            Some(Piece::new(PieceColor::White, PieceType::Pawn))
        );
        assert_eq!(rules.piece_type_at(sq("d8")), Some(PieceType::Queen));
        assert_eq!(rules.piece_at(sq("e4")), None);
        assert!(!rules.is_check());
        assert_eq!(rules.result(true), "*");
        assert_eq!(rules.start_fen(), None);
    }

    #[test]
    fn test_apply_normal_and_capture() {
        let mut rules = ShakmatyRules::new();
        let applied = rules.apply_move("e2e4").unwrap();
        assert_eq!(applied.origin, sq("e2"));
        assert_eq!(applied.destination, sq("e4"));
        assert_eq!(applied.kind, MoveKind::Normal);

        play_all(&mut rules, &["d7d5"]);
        let capture = rules.apply_move("e4d5").unwrap();
        assert_eq!(capture.kind, MoveKind::Capture);
        assert_eq!(rules.move_history(), ["e2e4", "d7d5", "e4d5"]);
        assert_eq!(rules.side_to_move(), PieceColor::Black);
    }

    #[test]
    fn test_illegal_and_malformed_moves() {
        let mut rules = ShakmatyRules::new();
        assert!(matches!(
            rules.apply_move("e2e5"),
            Err(GameError::InvalidMove { .. })
        ));
        assert!(matches!(
            rules.apply_move("e7e5"),
            Err(GameError::InvalidMove { .. })
        ));
        assert!(matches!(
            rules.apply_move("hello"),
            Err(GameError::InvalidNotation { .. })
        ));
        assert!(rules.move_history().is_empty());
    }

    #[test]
    fn test_castling_is_reported() {
        let mut rules = ShakmatyRules::new();
        play_all(&mut rules, &["e2e4", "e7e5", "g1f3", "b8c6", "f1c4", "f8c5"]);

        let castle = rules.apply_move("e1g1").unwrap();
        assert_eq!(castle.kind, MoveKind::Castle);
        assert_eq!(castle.uci, "e1g1");
        assert!(castle.kind.touches_other_squares());
        assert_eq!(rules.piece_type_at(sq("f1")), Some(PieceType::Rook));
        assert_eq!(rules.piece_type_at(sq("g1")), Some(PieceType::King));
    }

    #[test]
    fn test_en_passant_is_reported() {
        let mut rules = ShakmatyRules::new();
        play_all(&mut rules, &["e2e4", "a7a6", "e4e5", "d7d5"]);

        let ep = rules.apply_move("e5d6").unwrap();
        assert_eq!(ep.kind, MoveKind::EnPassant);
        assert_eq!(rules.piece_at(sq("d5")), None);
    }

    #[test]
    fn test_promotion_needs_a_piece() {
        //! The bare move is illegal; the rules flag it as a promotion candidate
        let mut rules = ShakmatyRules::from_fen("8/4P3/8/8/8/8/k7/4K3 w - - 0 1").unwrap();
        assert!(rules.requires_promotion(sq("e7"), sq("e8")));
        assert!(!rules.requires_promotion(sq("e1"), sq("e2")));
        assert!(matches!(
            rules.apply_move("e7e8"),
            Err(GameError::InvalidMove { .. })
        ));

        let applied = rules.apply_move("e7e8n").unwrap();
        assert_eq!(applied.kind, MoveKind::Promotion);
        assert_eq!(applied.uci, "e7e8n");
        assert_eq!(rules.piece_type_at(sq("e8")), Some(PieceType::Knight));
    }

    #[test]
    fn test_capture_promotion_is_a_candidate() {
        let rules = ShakmatyRules::from_fen("3r4/4P3/8/8/8/8/k7/4K3 w - - 0 1").unwrap();
        assert!(rules.requires_promotion(sq("e7"), sq("d8")));
        assert!(rules.requires_promotion(sq("e7"), sq("e8")));
        assert!(!rules.requires_promotion(sq("e7"), sq("f8")));
    }

    #[test]
    fn test_no_promotion_from_start() {
        let rules = ShakmatyRules::new();
        assert!(!rules.requires_promotion(sq("e2"), sq("e4")));
        assert!(!rules.requires_promotion(sq("e7"), sq("e8")));
    }

    #[test]
    fn test_fools_mate() {
        let mut rules = ShakmatyRules::new();
        play_all(&mut rules, &["f2f3", "e7e5", "g2g4", "d8h4"]);
        assert!(rules.is_check());
        assert_eq!(
            rules.termination(false),
            Some(GameOverReason::Checkmate {
                winner: PieceColor::Black
            })
        );
        assert_eq!(rules.result(true), "0-1");
    }

    #[test]
    fn test_stalemate_and_bare_kings() {
        let stalemate = ShakmatyRules::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert_eq!(stalemate.termination(false), Some(GameOverReason::Stalemate));
        assert_eq!(stalemate.result(false), "1/2-1/2");

        let bare = ShakmatyRules::from_fen("8/8/8/4k3/8/8/8/4K3 w - - 0 1").unwrap();
        assert_eq!(
            bare.termination(false),
            Some(GameOverReason::InsufficientMaterial)
        );
    }

    #[test]
    fn test_fifty_move_rule_only_when_claimed() {
        let rules = ShakmatyRules::from_fen("8/8/8/4k3/8/8/2R5/4K3 w - - 100 80").unwrap();
        assert_eq!(rules.termination(false), None);
        assert_eq!(rules.termination(true), Some(GameOverReason::FiftyMoveRule));
    }

    #[test]
    fn test_threefold_repetition() {
        //! Knights out and back twice: the start position occurs a third time
        let mut rules = ShakmatyRules::new();
        let shuffle = ["g1f3", "g8f6", "f3g1", "f6g8"];
        play_all(&mut rules, &shuffle);
        assert_eq!(rules.termination(true), None);

        play_all(&mut rules, &shuffle);
        assert_eq!(rules.termination(false), None);
        assert_eq!(
            rules.termination(true),
            Some(GameOverReason::ThreefoldRepetition)
        );

        rules.undo_last_move();
        assert_eq!(rules.termination(true), None);
    }

    #[test]
    fn test_undo_and_reset() {
        let mut rules = ShakmatyRules::new();
        assert_eq!(rules.undo_last_move(), None);

        play_all(&mut rules, &["e2e4", "e7e5"]);
        assert_eq!(rules.undo_last_move().as_deref(), Some("e7e5"));
        assert_eq!(rules.side_to_move(), PieceColor::Black);
        assert_eq!(rules.move_history(), ["e2e4"]);

        rules.reset();
        assert!(rules.move_history().is_empty());
        assert_eq!(rules.piece_type_at(sq("e2")), Some(PieceType::Pawn));
        assert_eq!(rules.side_to_move(), PieceColor::White);
    }

    #[test]
    fn test_fen_start_survives_reset() {
        let fen = "8/4P3/8/8/8/8/k7/4K3 w - - 0 1";
        let mut rules = ShakmatyRules::from_fen(fen).unwrap();
        rules.apply_move("e1d1").unwrap();
        rules.reset();
        assert_eq!(rules.start_fen(), Some(fen));
        assert_eq!(rules.piece_type_at(sq("e1")), Some(PieceType::King));
    }

    #[test]
    fn test_bad_fen() {
        assert!(matches!(
            ShakmatyRules::from_fen("not a fen"),
            Err(GameError::InvalidNotation { .. })
        ));
    }
}
