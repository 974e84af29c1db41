//! Remote-control chess against a UCI engine
//!
//! - [`core`] - settings and their persistence
//! - [`game`] - rules, focus navigation, history and the game session
//! - [`input`] - remote-control keys and typed commands
//! - [`rendering`] - board painting onto a pixel canvas

pub mod core;
pub mod game;
pub mod input;
pub mod rendering;
