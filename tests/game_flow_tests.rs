//! Game Flow Integration Tests
//!
//! Full sessions with the real shakmaty rules and a recording engine client:
//! - Turn cycle and engine replies
//! - Promotion, undo and side switching
//! - Check, checkmate and engine failures

use remote_chess::game::ai::{EngineClient, EngineEvent, EnginePosition, EngineReply, SearchBudget};
use remote_chess::game::error::{GameError, GameResult};
use remote_chess::game::focus::{Direction, Orientation};
use remote_chess::game::resources::HistoryLayout;
use remote_chess::game::rules::board_state::ShakmatyRules;
use remote_chess::game::rules::{GameOverReason, RulesEngine};
use remote_chess::game::session::{GameSession, GameState, Notice, RedrawScope, SessionUpdate};
use remote_chess::game::types::{PieceColor, PieceType, PromotionPiece, Square};
use remote_chess::input::InputEvent;

/// Engine double that records every request instead of searching
#[derive(Default)]
struct RecordingEngine {
    requests: Vec<EnginePosition>,
    budget: SearchBudget,
    refuse_requests: bool,
    new_games: usize,
    stops: usize,
}

impl EngineClient for RecordingEngine {
    fn request_best_move(&mut self, position: EnginePosition) -> GameResult<()> {
        if self.refuse_requests {
            return Err(GameError::EngineCommunicationFailure {
                message: "engine is gone".to_string(),
            });
        }
        self.requests.push(position);
        Ok(())
    }

    fn set_search_budget(&mut self, millis: u64) -> SearchBudget {
        self.budget = SearchBudget::clamped(millis);
        self.budget
    }

    fn search_budget(&self) -> SearchBudget {
        self.budget
    }

    fn new_game(&mut self) -> GameResult<()> {
        self.new_games += 1;
        Ok(())
    }

    fn engine_name(&self) -> Option<&str> {
        Some("Fake Engine")
    }

    fn stop(&mut self) {
        self.stops += 1;
    }
}

type Session = GameSession<ShakmatyRules, RecordingEngine>;

fn session_from(rules: ShakmatyRules) -> Session {
    GameSession::new(
        rules,
        RecordingEngine::default(),
        HistoryLayout::default(),
        Orientation::WhiteAtBottom,
    )
}

fn new_session() -> Session {
    session_from(ShakmatyRules::new())
}

fn sq(name: &str) -> Square {
    Square::from_algebraic(name).unwrap()
}

/// Select two squares directly; returns the update of the second selection
fn play(session: &mut Session, uci: &str) -> SessionUpdate {
    session.handle(InputEvent::SelectAt(sq(&uci[0..2])));
    session.handle(InputEvent::SelectAt(sq(&uci[2..4])))
}

fn reply(best: &str, ponder: Option<&str>) -> EngineEvent {
    EngineEvent::Reply(EngineReply {
        best_move: Some(best.to_string()),
        ponder: ponder.map(str::to_string),
    })
}

/// Human move followed by the engine's answer
fn exchange(session: &mut Session, human: &str, engine: &str) -> SessionUpdate {
    play(session, human);
    assert_eq!(session.state(), GameState::WaitingForEngine, "after {human}");
    session.on_engine_event(reply(engine, None))
}

// ============================================================================
// Turn Cycle Tests
// ============================================================================

#[test]
fn test_initial_session() {
    let session = new_session();

    assert_eq!(session.state(), GameState::AwaitingFirstSelection);
    assert_eq!(session.human_side(), PieceColor::White);
    assert_eq!(session.focus(), Square::E2);

    let labels = session.labels();
    assert_eq!(labels.white, "Player");
    assert_eq!(labels.black, "Fake Engine");
    assert_eq!(labels.switch_action, "Play black");

    let update = session.initial_update();
    assert_eq!(update.redraw, RedrawScope::Board);
    assert!(update.rotated);
    assert!(update.history.unwrap().lines.is_empty());
}

#[test]
fn test_player_move_and_engine_reply() {
    let mut session = new_session();

    let first = session.handle(InputEvent::SelectAt(sq("e2")));
    assert_eq!(first.state, GameState::AwaitingSecondSelection);
    assert_eq!(first.status, Some(Notice::Selection("e2".to_string())));
    assert_eq!(session.selected_square(), Some(sq("e2")));

    let second = session.handle(InputEvent::SelectAt(sq("e4")));
    assert_eq!(second.state, GameState::WaitingForEngine);
    assert_eq!(second.status, Some(Notice::Selection("e2e4".to_string())));
    assert_eq!(second.history.unwrap().lines, vec![" 1. e2e4".to_string()]);
    match &second.redraw {
        RedrawScope::Squares(squares) => {
            assert!(squares.contains(&sq("e2")));
            assert!(squares.contains(&sq("e4")));
        }
        other => panic!("expected square redraw, got {other:?}"),
    }

    let requests = &session.engine().requests;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].fen, None);
    assert_eq!(requests[0].moves, vec!["e2e4".to_string()]);

    let answer = session.on_engine_event(reply("e7e5", Some("g1f3")));
    assert_eq!(answer.state, GameState::AwaitingFirstSelection);
    assert_eq!(answer.status, Some(Notice::Move("e7e5".to_string())));
    assert_eq!(answer.history.unwrap().lines, vec![" 1. e2e4 e7e5".to_string()]);
    assert_eq!(session.history().moves(), session.rules().move_history());

    let hint = session.handle(InputEvent::Hint);
    assert_eq!(hint.hint, Some(Notice::Hint("g1f3".to_string())));
}

#[test]
fn test_keypad_navigation_plays_move() {
    //! Confirm on e2, two steps up, confirm on e4
    let mut session = new_session();

    session.handle(InputEvent::Confirm);
    let step = session.handle(InputEvent::Move(Direction::North));
    assert_eq!(step.redraw, RedrawScope::Squares(vec![sq("e2"), sq("e3")]));
    session.handle(InputEvent::Move(Direction::North));
    assert_eq!(session.focus(), sq("e4"));

    session.handle(InputEvent::Confirm);
    assert_eq!(session.state(), GameState::WaitingForEngine);
    assert_eq!(session.history().last(), Some("e2e4"));
}

#[test]
fn test_illegal_move_is_reported() {
    let mut session = new_session();

    let update = play(&mut session, "e2e5");
    assert_eq!(update.state, GameState::AwaitingFirstSelection);
    assert_eq!(update.status, Some(Notice::IllegalMove));
    assert!(session.history().is_empty());
    assert!(session.engine().requests.is_empty());
    assert_eq!(session.selected_square(), None);
}

#[test]
fn test_hint_without_ponder() {
    let mut session = new_session();
    let update = session.handle(InputEvent::Hint);
    assert_eq!(update.hint, Some(Notice::NoHint));
}

#[test]
fn test_engine_event_outside_request_is_ignored() {
    let mut session = new_session();
    let update = session.on_engine_event(reply("e7e5", None));
    assert_eq!(update.state, GameState::AwaitingFirstSelection);
    assert!(session.history().is_empty());
}

#[test]
fn test_castling_repaints_whole_board() {
    let rules = ShakmatyRules::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
    let mut session = session_from(rules);

    let update = play(&mut session, "e1g1");
    assert_eq!(update.redraw, RedrawScope::Board);
    assert_eq!(
        session.rules().piece_type_at(sq("f1")),
        Some(PieceType::Rook)
    );
    assert_eq!(
        session.engine().requests[0].fen.as_deref(),
        Some("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1")
    );
}

// ============================================================================
// Promotion Tests
// ============================================================================

const PROMOTION_FEN: &str = "8/4P3/8/8/8/8/k7/4K3 w - - 0 1";

#[test]
fn test_promotion_opens_menu() {
    let mut session = session_from(ShakmatyRules::from_fen(PROMOTION_FEN).unwrap());

    let update = play(&mut session, "e7e8");
    assert_eq!(update.state, GameState::AwaitingPromotionChoice);
    assert_eq!(update.hint, Some(Notice::ChoosePromotion));
    let prompt = update.promotion.unwrap();
    assert_eq!(prompt.options.len(), 4);
    assert_eq!(prompt.options[0], (PromotionPiece::Queen, "e7e8q".to_string()));
    assert_eq!(prompt.highlighted, 0);

    let update = session.handle(InputEvent::Confirm);
    assert_eq!(update.state, GameState::WaitingForEngine);
    assert!(update.promotion.is_none());
    assert_eq!(session.engine().requests[0].moves, vec!["e7e8q".to_string()]);
    assert_eq!(
        session.rules().piece_type_at(sq("e8")),
        Some(PieceType::Queen)
    );
}

#[test]
fn test_promotion_menu_cycles_with_direction_keys() {
    let mut session = session_from(ShakmatyRules::from_fen(PROMOTION_FEN).unwrap());
    play(&mut session, "e7e8");
    let focus_before = session.focus();
    assert_eq!(focus_before, Square::E8);

    let update = session.handle(InputEvent::Move(Direction::South));
    assert_eq!(update.promotion.unwrap().highlighted, 1);
    let update = session.handle(InputEvent::Move(Direction::North));
    let update_prompt = update.promotion.unwrap();
    assert_eq!(update_prompt.highlighted, 0);
    assert_eq!(session.focus(), focus_before, "focus must not move while the menu is open");

    session.handle(InputEvent::ChoosePromotion(PromotionPiece::Knight));
    assert_eq!(session.history().last(), Some("e7e8n"));
}

#[test]
fn test_cancel_closes_promotion_menu_only() {
    let mut session = session_from(ShakmatyRules::from_fen(PROMOTION_FEN).unwrap());
    play(&mut session, "e7e8");

    let update = session.handle(InputEvent::Cancel);
    assert_eq!(update.state, GameState::AwaitingFirstSelection);
    assert!(update.promotion.is_none());
    assert!(!update.closed);
    assert!(session.history().is_empty());
    assert_eq!(
        session.rules().piece_type_at(sq("e7")),
        Some(PieceType::Pawn)
    );
}

#[test]
fn test_undo_after_promotion_pops_two_half_moves() {
    let mut session = session_from(ShakmatyRules::from_fen(PROMOTION_FEN).unwrap());
    play(&mut session, "e7e8");
    session.handle(InputEvent::ChoosePromotion(PromotionPiece::Queen));
    session.on_engine_event(reply("a2b2", None));
    assert_eq!(session.history().len(), 2);

    let update = session.handle(InputEvent::Undo);
    assert_eq!(update.state, GameState::AwaitingFirstSelection);
    assert_eq!(update.redraw, RedrawScope::Board);
    assert!(session.history().is_empty());
    assert_eq!(
        session.rules().piece_type_at(sq("e7")),
        Some(PieceType::Pawn)
    );
}

// ============================================================================
// Undo Tests
// ============================================================================

#[test]
fn test_undo_on_players_turn() {
    let mut session = new_session();
    exchange(&mut session, "e2e4", "e7e5");

    session.handle(InputEvent::Undo);
    assert!(session.history().is_empty());
    assert!(session.rules().move_history().is_empty());
    assert_eq!(session.state(), GameState::AwaitingFirstSelection);

    let update = session.handle(InputEvent::Undo);
    assert_eq!(update.hint, Some(Notice::NothingToUndo));
}

#[test]
fn test_undo_while_engine_thinks() {
    //! History returns to its length before the player's move
    let mut session = new_session();
    exchange(&mut session, "e2e4", "e7e5");
    play(&mut session, "d2d4");
    assert_eq!(session.history().len(), 3);

    let update = session.handle(InputEvent::Undo);
    assert_eq!(update.state, GameState::PendingUndoAfterEngine);
    assert_eq!(update.hint, Some(Notice::UndoPending));

    let update = session.on_engine_event(reply("d7d5", Some("c2c4")));
    assert_eq!(update.state, GameState::AwaitingFirstSelection);
    assert_eq!(session.history().len(), 2);
    assert_eq!(session.rules().move_history(), ["e2e4", "e7e5"]);
    assert_eq!(session.ponder(), None);
}

#[test]
fn test_pending_undo_without_engine_move_pops_one() {
    let mut session = new_session();
    exchange(&mut session, "e2e4", "e7e5");
    play(&mut session, "g1f3");
    session.handle(InputEvent::Undo);

    session.on_engine_event(EngineEvent::Failure {
        message: "crashed".to_string(),
    });
    assert_eq!(session.state(), GameState::AwaitingFirstSelection);
    assert_eq!(session.history().len(), 2);
}

// ============================================================================
// Side Switch Tests
// ============================================================================

#[test]
fn test_two_side_switches_restore_colours() {
    let mut session = new_session();

    let update = session.handle(InputEvent::SwitchSides);
    assert_eq!(update.state, GameState::WaitingForEngine);
    assert_eq!(session.human_side(), PieceColor::Black);
    assert_eq!(session.focus(), Square::E7);
    let labels = update.labels.unwrap();
    assert_eq!(labels.white, "Fake Engine");
    assert_eq!(labels.black, "Player");
    assert_eq!(labels.switch_action, "Play white");
    assert!(session.engine().requests[0].moves.is_empty());

    session.on_engine_event(reply("e2e4", None));
    assert_eq!(session.state(), GameState::AwaitingFirstSelection);

    session.handle(InputEvent::SwitchSides);
    assert_eq!(session.human_side(), PieceColor::White);
    assert_eq!(session.focus(), Square::E2);
    assert_eq!(session.labels().white, "Player");
    assert_eq!(session.engine().requests[1].moves, vec!["e2e4".to_string()]);
}

#[test]
fn test_switch_refused_while_engine_thinks() {
    let mut session = new_session();
    play(&mut session, "e2e4");

    let update = session.handle(InputEvent::SwitchSides);
    assert_eq!(update.hint, Some(Notice::EngineBusy));
    assert_eq!(session.human_side(), PieceColor::White);
    assert_eq!(session.engine().requests.len(), 1);
}

// ============================================================================
// Check and Game Over Tests
// ============================================================================

#[test]
fn test_check_state_after_engine_check() {
    let mut session = new_session();
    exchange(&mut session, "f2f3", "e7e5");
    let update = exchange(&mut session, "e1f2", "d8h4");

    assert_eq!(update.state, GameState::Check);
    assert_eq!(update.status, Some(Notice::Check));

    let update = session.handle(InputEvent::SelectAt(sq("f2")));
    assert_eq!(update.state, GameState::AwaitingSecondSelection);
}

#[test]
fn test_engine_checkmate_ends_game() {
    let mut session = new_session();
    exchange(&mut session, "f2f3", "e7e5");
    let update = exchange(&mut session, "g2g4", "d8h4");

    let mate = GameState::GameOver(GameOverReason::Checkmate {
        winner: PieceColor::Black,
    });
    assert_eq!(update.state, mate);
    assert_eq!(update.status, Some(Notice::GameOver));
    match update.hint {
        Some(Notice::Result { result, .. }) => assert_eq!(result, "0-1"),
        other => panic!("expected result notice, got {other:?}"),
    }

    assert!(session.handle(InputEvent::Hint).hint.is_none());
    session.handle(InputEvent::Undo);
    assert_eq!(session.state(), mate);
    assert_eq!(session.history().len(), 4);
}

#[test]
fn test_player_checkmate_sends_no_request() {
    let mut session = new_session();
    exchange(&mut session, "e2e4", "e7e5");
    exchange(&mut session, "f1c4", "b8c6");
    exchange(&mut session, "d1h5", "g8f6");
    let update = play(&mut session, "h5f7");

    assert!(matches!(
        update.state,
        GameState::GameOver(GameOverReason::Checkmate {
            winner: PieceColor::White
        })
    ));
    assert_eq!(session.engine().requests.len(), 3);
}

// ============================================================================
// Engine Failure Tests
// ============================================================================

#[test]
fn test_engine_failure_retry_and_undo() {
    let mut session = new_session();
    play(&mut session, "e2e4");

    let update = session.on_engine_event(EngineEvent::Failure {
        message: "crashed".to_string(),
    });
    assert_eq!(update.state, GameState::EngineFailed);
    assert_eq!(update.status, Some(Notice::EngineFailed("crashed".to_string())));

    let update = session.handle(InputEvent::SwitchSides);
    assert_eq!(update.hint, Some(Notice::EngineBusy));

    let update = session.handle(InputEvent::Confirm);
    assert_eq!(update.state, GameState::WaitingForEngine);
    assert_eq!(session.engine().requests.len(), 2);

    session.on_engine_event(EngineEvent::Failure {
        message: "crashed again".to_string(),
    });
    let update = session.handle(InputEvent::Undo);
    assert_eq!(update.state, GameState::AwaitingFirstSelection);
    assert!(session.history().is_empty());
}

#[test]
fn test_refused_request_enters_failed_state() {
    let mut session = new_session();
    session.engine_mut().refuse_requests = true;

    let update = play(&mut session, "e2e4");
    assert_eq!(update.state, GameState::EngineFailed);
    assert_eq!(session.history().len(), 1);
}

#[test]
fn test_unplayable_engine_move() {
    let mut session = new_session();
    play(&mut session, "e2e4");

    let update = session.on_engine_event(reply("e2e4", None));
    assert_eq!(update.state, GameState::EngineFailed);
    assert_eq!(session.history().len(), 1);
}

// ============================================================================
// Settings Keys, New Game and Close
// ============================================================================

#[test]
fn test_thinking_time_steps_and_clamps() {
    let mut session = new_session();

    let update = session.handle(InputEvent::DecreaseTime);
    assert!(update.hint.is_none());

    let update = session.handle(InputEvent::IncreaseTime);
    assert_eq!(update.hint, Some(Notice::ThinkingTime { seconds: 2 }));
    assert_eq!(session.engine().budget.millis(), 2_000);

    for _ in 0..20 {
        session.handle(InputEvent::IncreaseTime);
    }
    assert_eq!(session.engine().budget.millis(), SearchBudget::MAX_MS);
    assert!(session.handle(InputEvent::IncreaseTime).hint.is_none());
}

#[test]
fn test_rotate_inverts_navigation() {
    let mut session = new_session();

    let update = session.handle(InputEvent::Rotate);
    assert!(update.rotated);
    assert_eq!(update.redraw, RedrawScope::Board);
    assert_eq!(session.orientation(), Orientation::BlackAtBottom);

    session.handle(InputEvent::Move(Direction::North));
    assert_eq!(session.focus(), sq("e1"));
}

#[test]
fn test_new_game_resets_board() {
    let mut session = new_session();
    exchange(&mut session, "e2e4", "e7e5");

    let update = session.handle(InputEvent::NewGame);
    assert_eq!(update.state, GameState::AwaitingFirstSelection);
    assert_eq!(update.redraw, RedrawScope::Board);
    assert!(session.history().is_empty());
    assert!(session.rules().move_history().is_empty());
    assert_eq!(session.engine().new_games, 1);

    play(&mut session, "d2d4");
    let update = session.handle(InputEvent::NewGame);
    assert_eq!(update.hint, Some(Notice::EngineBusy));
    assert_eq!(session.history().len(), 1);
}

#[test]
fn test_cancel_closes_session_once() {
    let mut session = new_session();

    let update = session.handle(InputEvent::Cancel);
    assert!(update.closed);
    assert_eq!(update.state, GameState::Closed);
    assert_eq!(session.engine().stops, 1);

    let update = session.handle(InputEvent::SelectAt(sq("e2")));
    assert!(update.is_empty());
    let update = session.close();
    assert!(!update.closed);
    assert_eq!(session.engine().stops, 1);
}
