//! ANSI text canvas
//!
//! Rasterizes the board painter's pixel calls onto a 9x9 character grid: one
//! grid cell per board square plus the rank column and file row. A fill that
//! covers a cell's top-left corner repaints the cell; an inner fill one frame
//! width inside it sets the ring that marks focus or selection.

use super::board::BoardGeometry;
use super::{Alignment, Color, Font, Renderer};
use std::io::{self, Write};

const GRID: usize = 9;
/// Column of rank labels and row of file labels
const STRIP: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
struct ConsoleCell {
    text: String,
    background: Color,
    ring: Option<Color>,
}

impl Default for ConsoleCell {
    fn default() -> Self {
        Self {
            text: String::new(),
            background: Color::LIGHT,
            ring: None,
        }
    }
}

pub struct ConsoleRenderer<W: Write> {
    out: W,
    geometry: BoardGeometry,
    cells: Vec<ConsoleCell>,
    ansi: bool,
}

impl<W: Write> ConsoleRenderer<W> {
    /// `ansi` switches 24-bit colour escapes on; without them focus shows
    /// as `[x]`
    pub fn new(out: W, geometry: BoardGeometry, ansi: bool) -> Self {
        Self {
            out,
            geometry,
            cells: vec![ConsoleCell::default(); GRID * GRID],
            ansi,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Pixel rectangle of grid cell (column, row); column 0 and row 8 are
    /// the coordinate strips
    fn cell_rect(&self, column: usize, row: usize) -> (i32, i32, i32, i32) {
        let g = &self.geometry;
        let (x, width) = if column == 0 {
            (0, g.strip)
        } else {
            (g.board_x + (column as i32 - 1) * g.cell, g.cell)
        };
        let (y, height) = if row == STRIP {
            (g.file_strip_y, g.strip)
        } else {
            (row as i32 * g.cell, g.cell)
        };
        (x, y, width, height)
    }

    fn cell_at(&self, x: i32, y: i32) -> Option<usize> {
        (0..GRID * GRID).find(|&index| {
            let (cx, cy, width, height) = self.cell_rect(index % GRID, index / GRID);
            x >= cx && x < cx + width && y >= cy && y < cy + height
        })
    }

    fn render_cell(&self, cell: &ConsoleCell, column: usize) -> String {
        let glyph = if cell.text.is_empty() { " " } else { cell.text.as_str() };
        let ring = cell.ring.filter(|ring| *ring != cell.background);

        if column == 0 {
            return if self.ansi {
                format!("{}{} {}", Self::paint(cell.background), glyph, RESET)
            } else {
                format!("{} ", glyph)
            };
        }

        match (self.ansi, ring) {
            (false, Some(_)) => format!("[{}]", glyph),
            (false, None) => format!(" {} ", glyph),
            (true, Some(ring)) => format!(
                "{} {}{}{} {}",
                Self::paint(ring),
                Self::paint(cell.background),
                glyph,
                Self::paint(ring),
                RESET
            ),
            (true, None) => format!("{} {} {}", Self::paint(cell.background), glyph, RESET),
        }
    }

    fn paint(background: Color) -> String {
        format!(
            "\x1b[48;2;{};{};{}m\x1b[38;2;0;0;0m",
            background.red(),
            background.green(),
            background.blue()
        )
    }
}

const RESET: &str = "\x1b[0m";

impl<W: Write> Renderer for ConsoleRenderer<W> {
    fn fill_region(&mut self, x: i32, y: i32, width: i32, height: i32, color: Color) {
        let frame = self.geometry.frame_inset;
        for index in 0..GRID * GRID {
            let (cx, cy, cw, ch) = self.cell_rect(index % GRID, index / GRID);
            let covers_corner = cx >= x && cx < x + width && cy >= y && cy < y + height;
            let (mid_x, mid_y) = (cx + cw / 2, cy + ch / 2);
            let covers_middle =
                mid_x >= x && mid_x < x + width && mid_y >= y && mid_y < y + height;
            let cell = &mut self.cells[index];

            if covers_corner {
                cell.background = color;
                cell.ring = None;
            } else if covers_middle && x - cx == frame && y - cy == frame {
                cell.ring = Some(color);
            } else if covers_middle {
                cell.background = color;
            }
        }
    }

    fn draw_text(
        &mut self,
        x: i32,
        y: i32,
        _width: i32,
        _height: i32,
        _foreground: Color,
        background: Color,
        _font: Font,
        text: &str,
        _alignment: Alignment,
    ) {
        if let Some(index) = self.cell_at(x, y) {
            let cell = &mut self.cells[index];
            cell.text = text.to_string();
            cell.background = background;
        }
    }

    fn present(&mut self) -> io::Result<()> {
        let mut frame = String::new();
        for row in 0..GRID {
            for column in 0..GRID {
                let cell = &self.cells[row * GRID + column];
                frame.push_str(&self.render_cell(cell, column));
            }
            frame.push('\n');
        }
        self.out.write_all(frame.as_bytes())?;
        self.out.flush()
    }
}
