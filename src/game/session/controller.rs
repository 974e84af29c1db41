//! Game session controller
//!
//! [`GameSession`] owns everything a running game needs: the rules engine,
//! the engine client, move history, focus, the half-entered move and the
//! human's side. Input events and engine events are fed in one at a time on
//! a single thread; each call returns a [`SessionUpdate`] telling the view
//! what changed.
//!
//! # Turn cycle
//!
//! ```text
//! AwaitingFirstSelection ──ok──► AwaitingSecondSelection ──ok──► (apply move)
//!        ▲                                                          │
//!        │                       ┌── promotion candidate ◄──────────┤
//!        │                       ▼                                  ▼
//!        │            AwaitingPromotionChoice ──piece──►  WaitingForEngine
//!        │                                                   │      │ undo
//!        └────────────── engine reply ◄──────────────────────┘      ▼
//!                                                  PendingUndoAfterEngine
//! ```
//!
//! At most one engine request is outstanding: only `WaitingForEngine` and
//! `PendingUndoAfterEngine` carry one, and everything that would issue a
//! second request is refused while in them.

use crate::game::ai::{EngineClient, EngineEvent, EnginePosition};
use crate::game::focus::{Direction, FocusNavigator, Orientation};
use crate::game::notation::Move;
use crate::game::resources::{HistoryLayout, MoveHistory, PendingPromotion, Selection};
use crate::game::rules::{AppliedMove, GameOverReason, RulesEngine};
use crate::game::session::state::GameState;
use crate::game::session::update::{Notice, PlayerLabels, SessionUpdate};
use crate::game::types::{PieceColor, PromotionPiece, Square};
use crate::input::InputEvent;
use crate::rendering::board::BoardSnapshot;
use tracing::{debug, error, info, warn};

/// Name plate used when the engine did not announce itself
const DEFAULT_ENGINE_LABEL: &str = "Engine";

pub struct GameSession<R: RulesEngine, E: EngineClient> {
    state: GameState,
    rules: R,
    engine: E,
    history: MoveHistory,
    focus: FocusNavigator,
    selection: Selection,
    promotion: Option<PendingPromotion>,
    human: PieceColor,
    /// Engine's predicted answer to its own last move
    ponder: Option<String>,
}

impl<R: RulesEngine, E: EngineClient> GameSession<R, E> {
    /// Start a session; the human plays the side to move in `rules`
    pub fn new(rules: R, engine: E, layout: HistoryLayout, orientation: Orientation) -> Self {
        let human = rules.side_to_move();
        let mut history = MoveHistory::new(layout);
        for uci in rules.move_history() {
            history.append(uci.clone());
        }
        let mut focus = FocusNavigator::new(orientation);
        focus.set_focus(human.start_focus());

        let state = Self::opening_state(&rules);
        info!("[SESSION] New session, player is {}, state {:?}", human, state);

        Self {
            state,
            rules,
            engine,
            history,
            focus,
            selection: Selection::default(),
            promotion: None,
            human,
            ponder: None,
        }
    }

    fn opening_state(rules: &R) -> GameState {
        match rules.termination(true) {
            Some(reason) => GameState::GameOver(reason),
            None if rules.is_check() => GameState::Check,
            None => GameState::AwaitingFirstSelection,
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn rules(&self) -> &R {
        &self.rules
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn history(&self) -> &MoveHistory {
        &self.history
    }

    pub fn focus(&self) -> Square {
        self.focus.focus()
    }

    pub fn orientation(&self) -> Orientation {
        self.focus.orientation()
    }

    pub fn human_side(&self) -> PieceColor {
        self.human
    }

    pub fn selected_square(&self) -> Option<Square> {
        self.selection.origin()
    }

    pub fn ponder(&self) -> Option<&str> {
        self.ponder.as_deref()
    }

    pub fn is_closed(&self) -> bool {
        self.state == GameState::Closed
    }

    pub fn labels(&self) -> PlayerLabels {
        PlayerLabels::new(
            self.human,
            self.engine.engine_name().unwrap_or(DEFAULT_ENGINE_LABEL),
        )
    }

    /// Board contents plus focus and selection, for painting
    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot::capture(
            &self.rules,
            self.focus.focus(),
            self.selection.origin(),
            self.focus.orientation(),
        )
    }

    /// Everything the view needs for its first paint
    pub fn initial_update(&self) -> SessionUpdate {
        let mut update = SessionUpdate::new(self.state);
        update.redraw.full();
        update.rotated = true;
        update.history = Some(self.history.view());
        update.labels = Some(self.labels());
        update.status = Some(Notice::Cleared);
        update.hint = Some(match self.state {
            GameState::GameOver(reason) => Self::result_notice(reason),
            _ => Notice::Cleared,
        });
        self.finish(update)
    }

    /// Dispatch one input event
    pub fn handle(&mut self, event: InputEvent) -> SessionUpdate {
        if self.is_closed() {
            return SessionUpdate::new(self.state);
        }

        match event {
            InputEvent::Move(direction) => self.move_focus(direction),
            InputEvent::Confirm => self.confirm(),
            InputEvent::SelectAt(square) => self.select_at(square),
            InputEvent::ChoosePromotion(piece) => self.choose_promotion(piece),
            InputEvent::Undo => self.undo(),
            InputEvent::Hint => self.show_hint(),
            InputEvent::Rotate => self.rotate(),
            InputEvent::SwitchSides => self.switch_sides(),
            InputEvent::IncreaseTime => self.adjust_time(true),
            InputEvent::DecreaseTime => self.adjust_time(false),
            InputEvent::NewGame => self.new_game(),
            InputEvent::Cancel => self.cancel(),
        }
    }

    pub fn move_focus(&mut self, direction: Direction) -> SessionUpdate {
        let mut update = SessionUpdate::new(self.state);

        if let Some(pending) = self.promotion.as_mut() {
            match direction {
                Direction::North | Direction::West => pending.cycle(-1),
                Direction::South | Direction::East => pending.cycle(1),
                _ => {}
            }
        } else if let Some(step) = self.focus.step(direction) {
            update.redraw.include(&[step.previous, step.current]);
        }

        self.finish(update)
    }

    /// OK key: select the focused square, take the highlighted promotion
    /// piece, or retry a failed engine request
    pub fn confirm(&mut self) -> SessionUpdate {
        let mut update = SessionUpdate::new(self.state);

        match self.state {
            state if state.accepts_selection() => {
                let square = self.focus.focus();
                self.select(square, &mut update);
            }
            GameState::AwaitingPromotionChoice => {
                if let Some(piece) = self.promotion.as_ref().map(PendingPromotion::highlighted) {
                    self.promote(piece, &mut update);
                }
            }
            GameState::EngineFailed => {
                info!("[SESSION] Retrying engine request");
                update.status = Some(Notice::Cleared);
                self.request_engine_move(&mut update);
            }
            state => debug!("[SESSION] Confirm ignored in {:?}", state),
        }

        self.finish(update)
    }

    /// Move focus to `square` and select it
    pub fn select_at(&mut self, square: Square) -> SessionUpdate {
        let mut update = SessionUpdate::new(self.state);

        if self.state.accepts_selection() {
            let step = self.focus.set_focus(square);
            update.redraw.include(&[step.previous, step.current]);
            self.select(square, &mut update);
        } else {
            debug!("[SESSION] Selection of {} ignored in {:?}", square, self.state);
        }

        self.finish(update)
    }

    pub fn choose_promotion(&mut self, piece: PromotionPiece) -> SessionUpdate {
        let mut update = SessionUpdate::new(self.state);
        if self.state == GameState::AwaitingPromotionChoice {
            self.promote(piece, &mut update);
        }
        self.finish(update)
    }

    /// Red key
    pub fn undo(&mut self) -> SessionUpdate {
        let mut update = SessionUpdate::new(self.state);

        match self.state {
            GameState::WaitingForEngine => {
                if self.history.is_empty() {
                    update.hint = Some(Notice::NothingToUndo);
                } else {
                    info!("[SESSION] Undo requested while engine is thinking");
                    self.transition(GameState::PendingUndoAfterEngine);
                    update.hint = Some(Notice::UndoPending);
                }
            }
            GameState::PendingUndoAfterEngine => {
                update.hint = Some(Notice::UndoPending);
            }
            GameState::EngineFailed => {
                if self.take_back(1, &mut update) == 0 {
                    update.hint = Some(Notice::NothingToUndo);
                } else {
                    let idle = self.idle_state();
                    self.transition(idle);
                }
            }
            state if state.is_human_turn() => {
                self.drop_pending_input(&mut update);
                if self.history.len() < 2 {
                    update.hint = Some(Notice::NothingToUndo);
                } else {
                    self.take_back(2, &mut update);
                }
                let idle = self.idle_state();
                self.transition(idle);
            }
            state => debug!("[SESSION] Undo ignored in {:?}", state),
        }

        self.finish(update)
    }

    /// Green key
    pub fn show_hint(&mut self) -> SessionUpdate {
        let mut update = SessionUpdate::new(self.state);
        if !self.state.is_game_over() {
            update.hint = Some(match &self.ponder {
                Some(uci) => Notice::Hint(uci.clone()),
                None => Notice::NoHint,
            });
        }
        self.finish(update)
    }

    /// Yellow key
    pub fn rotate(&mut self) -> SessionUpdate {
        let mut update = SessionUpdate::new(self.state);
        let orientation = self.focus.rotate();
        debug!("[SESSION] Board rotated: {:?}", orientation);
        update.redraw.full();
        update.rotated = true;
        self.finish(update)
    }

    /// Blue key: the engine takes over the side to move
    pub fn switch_sides(&mut self) -> SessionUpdate {
        let mut update = SessionUpdate::new(self.state);

        if self.state.is_waiting_for_engine() || self.state == GameState::EngineFailed {
            update.hint = Some(Notice::EngineBusy);
            return self.finish(update);
        }
        if !self.state.is_human_turn() {
            return self.finish(update);
        }

        self.drop_pending_input(&mut update);
        match self.engine.request_best_move(self.engine_position()) {
            Ok(()) => {
                self.human = self.human.opposite();
                info!("[SESSION] Sides switched, player is now {}", self.human);
                let step = self.focus.set_focus(self.human.start_focus());
                update.redraw.include(&[step.previous, step.current]);
                update.labels = Some(self.labels());
                update.status = Some(Notice::Cleared);
                update.hint = Some(Notice::Cleared);
                self.ponder = None;
                self.transition(GameState::WaitingForEngine);
            }
            Err(e) => {
                error!("[SESSION] Side switch failed: {}", e);
                update.status = Some(Notice::EngineFailed(e.to_string()));
                let idle = self.idle_state();
                self.transition(idle);
            }
        }

        self.finish(update)
    }

    /// Channel keys: one second more or less thinking time
    pub fn adjust_time(&mut self, increase: bool) -> SessionUpdate {
        let mut update = SessionUpdate::new(self.state);

        let current = self.engine.search_budget();
        let wanted = if increase {
            current.increased()
        } else {
            current.decreased()
        };
        if wanted != current {
            let applied = self.engine.set_search_budget(wanted.millis());
            info!("[SESSION] Thinking time now {}", applied);
            update.hint = Some(Notice::ThinkingTime {
                seconds: applied.seconds(),
            });
        }

        self.finish(update)
    }

    /// Reset to the start position without restarting the engine
    pub fn new_game(&mut self) -> SessionUpdate {
        let mut update = SessionUpdate::new(self.state);

        if self.state.is_waiting_for_engine() {
            update.hint = Some(Notice::EngineBusy);
            return self.finish(update);
        }

        self.rules.reset();
        self.history.clear();
        self.selection.clear();
        self.promotion = None;
        self.ponder = None;
        if let Err(e) = self.engine.new_game() {
            warn!("[SESSION] Engine did not accept a new game: {}", e);
        }

        self.human = self.rules.side_to_move();
        self.focus.set_focus(self.human.start_focus());
        info!("[SESSION] New game, player is {}", self.human);

        update.redraw.full();
        update.history = Some(self.history.view());
        update.labels = Some(self.labels());
        update.status = Some(Notice::Cleared);
        let next = Self::opening_state(&self.rules);
        update.hint = Some(match next {
            GameState::GameOver(reason) => Self::result_notice(reason),
            _ => Notice::Cleared,
        });
        self.transition(next);

        self.finish(update)
    }

    /// Cancel key: closes the promotion menu if open, otherwise the session
    pub fn cancel(&mut self) -> SessionUpdate {
        if self.state != GameState::AwaitingPromotionChoice {
            return self.close();
        }

        let mut update = SessionUpdate::new(self.state);
        self.drop_pending_input(&mut update);
        update.status = Some(Notice::Cleared);
        update.hint = Some(Notice::Cleared);
        let idle = self.idle_state();
        self.transition(idle);
        self.finish(update)
    }

    /// Stop the engine and end the session; repeated calls do nothing
    pub fn close(&mut self) -> SessionUpdate {
        let mut update = SessionUpdate::new(self.state);
        if self.is_closed() {
            return update;
        }

        info!("[SESSION] Closing session");
        self.engine.stop();
        self.selection.clear();
        self.promotion = None;
        self.transition(GameState::Closed);
        update.closed = true;
        self.finish(update)
    }

    /// Feed the result of the outstanding engine request
    pub fn on_engine_event(&mut self, event: EngineEvent) -> SessionUpdate {
        let mut update = SessionUpdate::new(self.state);

        match self.state {
            GameState::WaitingForEngine => self.apply_engine_event(event, &mut update),
            GameState::PendingUndoAfterEngine => self.finish_pending_undo(event, &mut update),
            state => warn!("[SESSION] Ignoring engine event in {:?}: {:?}", state, event),
        }

        self.finish(update)
    }

    fn select(&mut self, square: Square, update: &mut SessionUpdate) {
        match self.selection.push(square) {
            None => {
                debug!("[SESSION] Origin {}", square);
                update.status = Some(Notice::Selection(square.to_algebraic()));
                update.redraw.include(&[square]);
                self.transition(GameState::AwaitingSecondSelection);
            }
            Some((origin, destination)) => {
                let mv = Move::new(origin, destination, None);
                update.status = Some(Notice::Selection(mv.uci()));
                update.redraw.include(&[origin]);

                if self.rules.requires_promotion(origin, destination) {
                    debug!("[SESSION] {} needs a promotion piece", mv);
                    self.promotion = Some(PendingPromotion::new(mv));
                    update.hint = Some(Notice::ChoosePromotion);
                    self.transition(GameState::AwaitingPromotionChoice);
                } else {
                    self.play_human_move(mv, update);
                }
            }
        }
    }

    fn promote(&mut self, piece: PromotionPiece, update: &mut SessionUpdate) {
        let Some(pending) = self.promotion.take() else {
            return;
        };
        let mv = pending.complete(piece);
        update.status = Some(Notice::Selection(mv.uci()));
        update.hint = Some(Notice::Cleared);
        self.play_human_move(mv, update);
    }

    fn play_human_move(&mut self, mv: Move, update: &mut SessionUpdate) {
        let applied = match self.rules.apply_move(&mv.uci()) {
            Ok(applied) => applied,
            Err(e) => {
                warn!("[SESSION] Rejected player move {}: {}", mv, e);
                update.status = Some(Notice::IllegalMove);
                let idle = self.idle_state();
                self.transition(idle);
                return;
            }
        };

        info!("[SESSION] Player played {}", applied.uci);
        self.record_move(&applied, update);
        self.ponder = None;
        update.hint = Some(Notice::Cleared);

        if let Some(reason) = self.rules.termination(true) {
            self.end_game(reason, update);
            return;
        }
        if self.rules.is_check() {
            update.status = Some(Notice::Check);
        }
        self.request_engine_move(update);
    }

    fn apply_engine_event(&mut self, event: EngineEvent, update: &mut SessionUpdate) {
        let reply = match event {
            EngineEvent::Reply(reply) => reply,
            EngineEvent::Failure { message } => {
                self.fail_engine(message, update);
                return;
            }
        };

        let Some(uci) = reply.best_move else {
            match self.rules.termination(true) {
                Some(reason) => self.end_game(reason, update),
                None => self.fail_engine("engine reported no move".to_string(), update),
            }
            return;
        };

        match self.rules.apply_move(&uci) {
            Ok(applied) => {
                info!("[SESSION] Engine played {}", applied.uci);
                self.record_move(&applied, update);
                self.ponder = reply.ponder;
                update.status = Some(Notice::Move(applied.uci));

                if let Some(reason) = self.rules.termination(true) {
                    self.end_game(reason, update);
                } else {
                    if self.rules.is_check() {
                        update.status = Some(Notice::Check);
                    }
                    let idle = self.idle_state();
                    self.transition(idle);
                }
            }
            Err(e) => {
                self.ponder = None;
                self.fail_engine(format!("unplayable engine move {uci}: {e}"), update);
            }
        }
    }

    fn finish_pending_undo(&mut self, event: EngineEvent, update: &mut SessionUpdate) {
        let to_take_back = match event {
            EngineEvent::Reply(reply) => match reply.best_move {
                Some(uci) => match self.rules.apply_move(&uci) {
                    Ok(applied) => {
                        self.history.append(applied.uci);
                        2
                    }
                    Err(e) => {
                        warn!("[SESSION] Discarding unplayable engine move {}: {}", uci, e);
                        1
                    }
                },
                None => 1,
            },
            EngineEvent::Failure { message } => {
                warn!("[SESSION] Engine failed during pending undo: {}", message);
                1
            }
        };

        self.take_back(to_take_back, update);
        let idle = self.idle_state();
        self.transition(idle);
    }

    fn request_engine_move(&mut self, update: &mut SessionUpdate) {
        match self.engine.request_best_move(self.engine_position()) {
            Ok(()) => self.transition(GameState::WaitingForEngine),
            Err(e) => self.fail_engine(e.to_string(), update),
        }
    }

    fn fail_engine(&mut self, message: String, update: &mut SessionUpdate) {
        error!("[SESSION] Engine failure: {}", message);
        update.status = Some(Notice::EngineFailed(message));
        self.transition(GameState::EngineFailed);
    }

    fn end_game(&mut self, reason: GameOverReason, update: &mut SessionUpdate) {
        info!("[SESSION] Game over: {} ({})", reason.result(), reason);
        update.status = Some(Notice::GameOver);
        update.hint = Some(Self::result_notice(reason));
        self.transition(GameState::GameOver(reason));
    }

    fn result_notice(reason: GameOverReason) -> Notice {
        Notice::Result {
            result: reason.result().to_string(),
            reason: reason.to_string(),
        }
    }

    fn record_move(&mut self, applied: &AppliedMove, update: &mut SessionUpdate) {
        self.history.append(applied.uci.clone());
        if applied.kind.touches_other_squares() {
            update.redraw.full();
        } else {
            update.redraw.include(&[applied.origin, applied.destination]);
        }
        update.history = Some(self.history.view());
    }

    /// Pop up to `count` half-moves; returns how many were removed
    fn take_back(&mut self, count: usize, update: &mut SessionUpdate) -> usize {
        let mut removed = 0;
        while removed < count && self.rules.undo_last_move().is_some() {
            self.history.pop();
            removed += 1;
        }

        info!("[SESSION] Took back {} half-moves", removed);
        self.ponder = None;
        update.redraw.full();
        update.history = Some(self.history.view());
        update.status = Some(Notice::Cleared);
        update.hint = Some(Notice::Cleared);
        removed
    }

    /// Forget a half-entered move or an open promotion menu
    fn drop_pending_input(&mut self, update: &mut SessionUpdate) {
        if let Some(origin) = self.selection.clear() {
            update.redraw.include(&[origin]);
        }
        if let Some(pending) = self.promotion.take() {
            update.redraw.include(&[pending.base_move().origin]);
        }
    }

    fn idle_state(&self) -> GameState {
        if self.rules.is_check() {
            GameState::Check
        } else {
            GameState::AwaitingFirstSelection
        }
    }

    fn engine_position(&self) -> EnginePosition {
        EnginePosition {
            fen: self.rules.start_fen().map(str::to_string),
            moves: self.rules.move_history().to_vec(),
        }
    }

    fn transition(&mut self, next: GameState) {
        #[cfg(debug_assertions)]
        {
            if !self.state.can_transition_to(&next) {
                panic!(
                    "Invalid session state transition: {:?} -> {:?}",
                    self.state, next
                );
            }
        }

        if self.state != next {
            debug!("[SESSION] {:?} -> {:?}", self.state, next);
        }
        self.state = next;
    }

    fn finish(&self, mut update: SessionUpdate) -> SessionUpdate {
        update.state = self.state;
        update.promotion = self.promotion.as_ref().map(PendingPromotion::prompt);
        update
    }
}

impl<R: RulesEngine, E: EngineClient> Drop for GameSession<R, E> {
    fn drop(&mut self) {
        if !self.is_closed() {
            self.engine.stop();
        }
    }
}
