//! Rendering module - board painting for a remote-control display
//!
//! The session never paints; it says which squares changed. This module turns
//! that into pixel-level calls on a [`Renderer`], the small drawing surface a
//! set-top box canvas or a terminal can both provide.
//!
//! # Architecture
//!
//! - `board` - [`BoardPainter`], [`BoardSnapshot`] and the board geometry
//! - `console` - [`ConsoleRenderer`], an ANSI text canvas for terminals
//!
//! # Drawing a square
//!
//! Each cell is three nested fills and a glyph: a black frame, an inner ring in
//! the focus colour (or the square colour when unfocused), the square colour,
//! then the piece centred on top.

pub mod board;
pub mod console;

pub use board::{BoardGeometry, BoardPainter, BoardSnapshot};
pub use console::ConsoleRenderer;

use std::io;

/// 0xAARRGGBB; alpha 0 is opaque
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(pub u32);

impl Color {
    pub const BLACK: Color = Color::rgb(0x00, 0x00, 0x00);
    pub const DARK: Color = Color::rgb(0xd9, 0xd9, 0xc5);
    pub const LIGHT: Color = Color::rgb(0xff, 0xff, 0xff);
    pub const FOCUS: Color = Color::rgb(0xcc, 0x22, 0x22);
    pub const SELECTED: Color = Color::rgb(0x22, 0x66, 0xcc);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color(((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    pub fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub fn blue(self) -> u8 {
        self.0 as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontFamily {
    Regular,
    /// Font with chess glyphs
    Chess,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Font {
    pub family: FontFamily,
    pub size: u16,
}

impl Font {
    pub const fn new(family: FontFamily, size: u16) -> Self {
        Self { family, size }
    }
}

/// Text placement inside its box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Alignment {
    Left,
    #[default]
    Center,
}

/// A pixel canvas
pub trait Renderer {
    fn fill_region(&mut self, x: i32, y: i32, width: i32, height: i32, color: Color);

    #[allow(clippy::too_many_arguments)]
    fn draw_text(
        &mut self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        foreground: Color,
        background: Color,
        font: Font,
        text: &str,
        alignment: Alignment,
    );

    /// Flush everything drawn since the last call
    fn present(&mut self) -> io::Result<()>;
}
