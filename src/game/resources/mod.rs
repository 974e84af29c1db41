//! Game resources - state the session owns besides the rules engine
//!
//! - [`history`] - move history log and its paginated view
//! - [`selection`] - the origin square of a move being entered
//! - [`promotion`] - a pawn move waiting for its promotion piece

pub mod history;
pub mod promotion;
pub mod selection;

pub use history::{HistoryLayout, HistoryView, MoveHistory, PageLines};
pub use promotion::{PendingPromotion, PromotionPrompt};
pub use selection::Selection;
