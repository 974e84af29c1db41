//! Board painter
//!
//! Geometry of the 840x840 canvas:
//!
//! ```text
//!  x: 0..30    rank strip          y: 0..800    board rows
//!  x: 40..840  board columns       y: 810..840  file strip
//! ```
//!
//! With white at the bottom a1 sits bottom-left; with black at the bottom the
//! board is turned half a circle, so h8 sits bottom-left.

use super::{Alignment, Color, Font, FontFamily, Renderer};
use crate::game::focus::Orientation;
use crate::game::rules::RulesEngine;
use crate::game::session::RedrawScope;
use crate::game::types::{Piece, Square};
use tracing::trace;

/// Pixel layout of the board and its coordinate strips
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardGeometry {
    pub cell: i32,
    /// Left edge of the a-file (h-file when rotated)
    pub board_x: i32,
    /// Width of the rank strip and height of the file strip
    pub strip: i32,
    pub file_strip_y: i32,
    pub frame_inset: i32,
    pub ring_inset: i32,
}

impl Default for BoardGeometry {
    fn default() -> Self {
        Self {
            cell: 100,
            board_x: 40,
            strip: 30,
            file_strip_y: 810,
            frame_inset: 1,
            ring_inset: 6,
        }
    }
}

impl BoardGeometry {
    /// Top-left pixel of `square`
    pub fn square_origin(&self, square: Square, orientation: Orientation) -> (i32, i32) {
        let file = i32::from(square.file().index());
        let rank = i32::from(square.rank().index());
        match orientation {
            Orientation::WhiteAtBottom => (file * self.cell + self.board_x, (7 - rank) * self.cell),
            Orientation::BlackAtBottom => ((7 - file) * self.cell + self.board_x, rank * self.cell),
        }
    }

    /// Square under a pixel, if it lies on the board
    pub fn square_at(&self, x: i32, y: i32, orientation: Orientation) -> Option<Square> {
        if x < self.board_x || y < 0 {
            return None;
        }
        let column = (x - self.board_x) / self.cell;
        let row = y / self.cell;
        if column > 7 || row > 7 {
            return None;
        }
        let (file, rank) = match orientation {
            Orientation::WhiteAtBottom => (column, 7 - row),
            Orientation::BlackAtBottom => (7 - column, row),
        };
        Square::new((rank * 8 + file) as u8).ok()
    }

    /// Full canvas edge length
    pub fn canvas_size(&self) -> i32 {
        self.board_x + 8 * self.cell
    }
}

/// What the painter needs to know about the position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardSnapshot {
    pub pieces: [Option<Piece>; 64],
    pub focus: Square,
    pub selected: Option<Square>,
    pub orientation: Orientation,
}

impl BoardSnapshot {
    pub fn capture<R: RulesEngine + ?Sized>(
        rules: &R,
        focus: Square,
        selected: Option<Square>,
        orientation: Orientation,
    ) -> Self {
        let mut pieces = [None; 64];
        for square in Square::all() {
            pieces[usize::from(square.index())] = rules.piece_at(square);
        }
        Self {
            pieces,
            focus,
            selected,
            orientation,
        }
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.pieces[usize::from(square.index())]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardPainter {
    geometry: BoardGeometry,
    coordinate_font: Font,
    piece_font: Font,
}

impl Default for BoardPainter {
    fn default() -> Self {
        Self::new(BoardGeometry::default())
    }
}

impl BoardPainter {
    pub fn new(geometry: BoardGeometry) -> Self {
        Self {
            geometry,
            coordinate_font: Font::new(FontFamily::Regular, 24),
            piece_font: Font::new(FontFamily::Chess, 60),
        }
    }

    pub fn geometry(&self) -> BoardGeometry {
        self.geometry
    }

    /// Light squares have odd file + rank
    pub fn square_color(square: Square) -> Color {
        if (square.file().index() + square.rank().index()) % 2 == 0 {
            Color::DARK
        } else {
            Color::LIGHT
        }
    }

    fn ring_color(snapshot: &BoardSnapshot, square: Square) -> Color {
        if square == snapshot.focus {
            Color::FOCUS
        } else if snapshot.selected == Some(square) {
            Color::SELECTED
        } else {
            Self::square_color(square)
        }
    }

    /// Repaint whatever `scope` names
    pub fn paint<D: Renderer + ?Sized>(
        &self,
        renderer: &mut D,
        snapshot: &BoardSnapshot,
        scope: &RedrawScope,
    ) {
        match scope {
            RedrawScope::Nothing => {}
            RedrawScope::Squares(squares) => {
                for square in squares {
                    self.paint_square(renderer, snapshot, *square);
                }
            }
            RedrawScope::Board => {
                trace!("[RENDER] Full board");
                for square in Square::all() {
                    self.paint_square(renderer, snapshot, square);
                }
            }
        }
    }

    pub fn paint_square<D: Renderer + ?Sized>(
        &self,
        renderer: &mut D,
        snapshot: &BoardSnapshot,
        square: Square,
    ) {
        let g = &self.geometry;
        let (x, y) = g.square_origin(square, snapshot.orientation);
        let background = Self::square_color(square);
        let frame = g.frame_inset;
        let ring = g.ring_inset;

        renderer.fill_region(x, y, g.cell, g.cell, Color::BLACK);
        renderer.fill_region(
            x + frame,
            y + frame,
            g.cell - 2 * frame,
            g.cell - 2 * frame,
            Self::ring_color(snapshot, square),
        );
        renderer.fill_region(x + ring, y + ring, g.cell - 2 * ring, g.cell - 2 * ring, background);

        let glyph = snapshot
            .piece_at(square)
            .map(|piece| piece.symbol().to_string())
            .unwrap_or_default();
        renderer.draw_text(
            x + ring,
            y + ring,
            g.cell - 2 * ring,
            g.cell - 4,
            Color::BLACK,
            background,
            self.piece_font,
            &glyph,
            Alignment::Center,
        );
    }

    /// Rank and file letters along the left and bottom edges
    pub fn paint_coordinates<D: Renderer + ?Sized>(&self, renderer: &mut D, orientation: Orientation) {
        let g = &self.geometry;
        renderer.fill_region(0, 0, g.strip, g.canvas_size(), Color::LIGHT);
        renderer.fill_region(0, g.file_strip_y, g.canvas_size(), g.strip, Color::LIGHT);

        for index in 0..8u8 {
            let (rank_label, file_label) = match orientation {
                Orientation::WhiteAtBottom => (b'8' - index, b'a' + index),
                Orientation::BlackAtBottom => (b'1' + index, b'h' - index),
            };
            let offset = i32::from(index) * g.cell;
            renderer.draw_text(
                0,
                offset,
                g.strip,
                g.cell,
                Color::BLACK,
                Color::LIGHT,
                self.coordinate_font,
                &char::from(rank_label).to_string(),
                Alignment::Center,
            );
            renderer.draw_text(
                offset + g.board_x,
                g.file_strip_y,
                g.cell,
                g.strip,
                Color::BLACK,
                Color::LIGHT,
                self.coordinate_font,
                &char::from(file_label).to_string(),
                Alignment::Center,
            );
        }
    }
}
