//! Move history log
//!
//! Append-only record of the half-moves played, in UCI notation, plus the
//! paginated view the side panel shows. The panel has a fixed number of
//! columns ("pages"); each page holds `page_size` half-moves laid out as
//! numbered white/black pairs:
//!
//! ```text
//!  1. e2e4 e7e5
//!  2. g1f3 b8c6
//!  3. f1b5
//! ```
//!
//! Only the page holding the latest move is re-rendered after a change.
//! Earlier pages are full and never change unless moves are taken back, and
//! the page after the current one is cleared so an undo that empties a page
//! leaves no stale text behind.

use tracing::debug;

/// Page geometry of the history panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryLayout {
    page_size: usize,
    visible_pages: usize,
}

impl Default for HistoryLayout {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PAGE_SIZE, Self::DEFAULT_VISIBLE_PAGES)
    }
}

impl HistoryLayout {
    pub const DEFAULT_PAGE_SIZE: usize = 40;
    pub const DEFAULT_VISIBLE_PAGES: usize = 4;

    /// Odd page sizes are rounded down so every page starts with a white move
    pub fn new(page_size: usize, visible_pages: usize) -> Self {
        Self {
            page_size: page_size.max(2) & !1,
            visible_pages: visible_pages.max(1),
        }
    }

    /// Half-moves per page
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn visible_pages(&self) -> usize {
        self.visible_pages
    }

    /// Page holding the zero-based half-move `index`, clamped to the last visible page
    pub fn page_for(&self, index: usize) -> usize {
        (index / self.page_size).min(self.visible_pages - 1)
    }
}

/// What the history panel has to show after a change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryView {
    /// Page to (re)write
    pub page: usize,
    pub lines: Vec<String>,
    /// Following page to blank, if it is within the visible range
    pub clear_page: Option<usize>,
}

/// Lines of one history page, produced lazily
///
/// A clone continues from the same position, so a fresh page iterator can be
/// cloned and consumed as often as needed.
#[derive(Debug, Clone)]
pub struct PageLines<'a> {
    moves: &'a [String],
    first_index: usize,
    position: usize,
}

impl Iterator for PageLines<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let white = self.moves.get(self.position)?;
        let number = (self.first_index + self.position) / 2 + 1;
        let line = match self.moves.get(self.position + 1) {
            Some(black) => format!("{:>2}. {} {}", number, white, black),
            None => format!("{:>2}. {}", number, white),
        };
        self.position += 2;
        Some(line)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.moves.len().saturating_sub(self.position).div_ceil(2);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for PageLines<'_> {}

/// Chronological list of half-moves in UCI notation
///
/// Index 0 = move 1 (White), index 1 = move 1 (Black), and so on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveHistory {
    moves: Vec<String>,
    layout: HistoryLayout,
}

impl MoveHistory {
    pub fn new(layout: HistoryLayout) -> Self {
        Self {
            moves: Vec::new(),
            layout,
        }
    }

    pub fn layout(&self) -> HistoryLayout {
        self.layout
    }

    pub fn append(&mut self, uci: impl Into<String>) {
        self.moves.push(uci.into());
    }

    /// Remove and return the latest half-move
    pub fn pop(&mut self) -> Option<String> {
        let popped = self.moves.pop();
        if let Some(uci) = &popped {
            debug!("[HISTORY] Took back {}", uci);
        }
        popped
    }

    pub fn clear(&mut self) {
        self.moves.clear();
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn moves(&self) -> &[String] {
        &self.moves
    }

    pub fn last(&self) -> Option<&str> {
        self.moves.last().map(String::as_str)
    }

    pub fn page_for(&self, index: usize) -> usize {
        self.layout.page_for(index)
    }

    /// Page of the latest move (page 0 while empty)
    pub fn current_page(&self) -> usize {
        self.moves
            .len()
            .checked_sub(1)
            .map_or(0, |latest| self.page_for(latest))
    }

    /// Display lines for `page`; empty for pages past the visible range.
    /// The last visible page scrolls to keep the newest moves on screen.
    pub fn render_page(&self, page: usize) -> PageLines<'_> {
        let size = self.layout.page_size;
        if page >= self.layout.visible_pages {
            return PageLines {
                moves: &[],
                first_index: page * size,
                position: 0,
            };
        }

        let mut start = (page * size).min(self.moves.len());
        let overflow = self.moves.len().saturating_sub(start + size);
        if page + 1 == self.layout.visible_pages && overflow > 0 {
            // Keep white's move first on each line
            start += overflow + overflow % 2;
        }
        let end = (start + size).min(self.moves.len());

        PageLines {
            moves: &self.moves[start..end],
            first_index: start,
            position: 0,
        }
    }

    pub fn view(&self) -> HistoryView {
        let page = self.current_page();
        let next = page + 1;
        HistoryView {
            page,
            lines: self.render_page(page).collect(),
            clear_page: (next < self.layout.visible_pages).then_some(next),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history_with(count: usize) -> MoveHistory {
        let mut history = MoveHistory::default();
        for i in 0..count {
            history.append(format!("m{i}"));
        }
        history
    }

    #[test]
    fn test_append_and_pop() {
        let mut history = MoveHistory::default();
        history.append("e2e4");
        history.append("e7e5");
        assert_eq!(history.len(), 2);
        assert_eq!(history.last(), Some("e7e5"));
        assert_eq!(history.pop().as_deref(), Some("e7e5"));
        assert_eq!(history.moves(), ["e2e4".to_string()]);
    }

    #[test]
    fn test_lines_pair_white_and_black() {
        let mut history = MoveHistory::default();
        for uci in ["e2e4", "e7e5", "g1f3"] {
            history.append(uci);
        }
        let lines: Vec<_> = history.render_page(0).collect();
        assert_eq!(lines, vec![" 1. e2e4 e7e5", " 2. g1f3"]);
    }

    #[test]
    fn test_forty_first_move_starts_page_one() {
        //! 41 half-moves with 40 per page: only the 41st lands on page 1
        let history = history_with(41);
        assert_eq!(history.page_for(39), 0);
        assert_eq!(history.page_for(40), 1);

        let view = history.view();
        assert_eq!(view.page, 1);
        assert_eq!(view.lines, vec!["21. m40"]);
        assert_eq!(view.clear_page, Some(2));

        assert_eq!(history.render_page(0).count(), 20);
    }

    #[test]
    fn test_page_is_clamped_to_visible_range() {
        let history = history_with(200);
        assert_eq!(history.page_for(199), 3);

        let view = history.view();
        assert_eq!(view.page, 3);
        assert_eq!(view.clear_page, None);
        assert_eq!(view.lines.len(), 20);
        assert_eq!(view.lines[0], "81. m160 m161");
        assert_eq!(view.lines[19], "100. m198 m199");
        assert_eq!(history.render_page(4).count(), 0);
    }

    #[test]
    fn test_last_page_follows_latest_move() {
        let mut history = history_with(160);
        assert_eq!(history.view().lines[0], "61. m120 m121");

        history.append("m160".to_string());
        let view = history.view();
        assert_eq!(view.page, 3);
        assert!(view.lines.len() <= 20);
        assert_eq!(view.lines.last().map(String::as_str), Some("81. m160"));
        assert_eq!(view.lines[0], "62. m122 m123");

        history.pop();
        assert_eq!(history.view().lines[0], "61. m120 m121");
    }

    #[test]
    fn test_undo_back_onto_previous_page_clears_next() {
        let mut history = history_with(41);
        history.pop();
        let view = history.view();
        assert_eq!(view.page, 0);
        assert_eq!(view.clear_page, Some(1));
    }

    #[test]
    fn test_empty_history_view() {
        let view = MoveHistory::default().view();
        assert_eq!(view.page, 0);
        assert!(view.lines.is_empty());
        assert_eq!(view.clear_page, Some(1));
    }

    #[test]
    fn test_page_lines_are_restartable() {
        let history = history_with(6);
        let lines = history.render_page(0);
        let first: Vec<_> = lines.clone().collect();
        let second: Vec<_> = lines.collect();
        assert_eq!(first, second);
        assert_eq!(history.render_page(0).len(), 3);
    }

    #[test]
    fn test_odd_page_size_rounds_down() {
        let layout = HistoryLayout::new(7, 2);
        assert_eq!(layout.page_size(), 6);
        assert_eq!(HistoryLayout::new(1, 0), HistoryLayout::new(2, 1));
    }
}
