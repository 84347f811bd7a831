// SPDX-License-Identifier: MIT
//
// FrameBuffer: the 2D cell grid every frame is painted into.
//
// Flat `Vec<Cell>`, row-major (`index = y * width + x`), so a row is one
// contiguous slice and the diff renderer can compare whole rows at once.
//
// The picker's frame is simple: fill the grid with the fade color, paint the
// menu bar over the top row, the notation string in the middle, and maybe a
// status message on the bottom row. Painting outside the grid is clipped
// silently.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::cell::{Cell, CellColor};

/// Text styling for a paint call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Style {
    pub fg: CellColor,
    pub bg: CellColor,
    pub inverse: bool,
}

impl Style {
    #[inline]
    #[must_use]
    pub const fn new(fg: CellColor, bg: CellColor) -> Self {
        Self {
            fg,
            bg,
            inverse: false,
        }
    }

    #[inline]
    #[must_use]
    pub const fn inverted(self) -> Self {
        Self {
            inverse: true,
            ..self
        }
    }
}

// ─── FrameBuffer ─────────────────────────────────────────────────────────────

/// A grid of terminal cells.
///
/// ```
/// use chroma_term::buffer::FrameBuffer;
/// use chroma_term::cell::Cell;
///
/// let mut buf = FrameBuffer::new(80, 24);
/// buf.set(5, 3, Cell::new('X'));
/// assert_eq!(buf.get(5, 3).map(|c| c.ch), Some('X'));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    /// A buffer of empty cells.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::EMPTY; usize::from(width) * usize::from(height)],
        }
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    #[inline]
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    #[inline]
    #[must_use]
    pub const fn in_bounds(&self, x: u16, y: u16) -> bool {
        x < self.width && y < self.height
    }

    #[inline]
    const fn index(&self, x: u16, y: u16) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// The cell at `(x, y)`, or `None` if out of bounds.
    #[must_use]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.in_bounds(x, y).then(|| &self.cells[self.index(x, y)])
    }

    /// One row as a slice, or `None` if `y` is out of bounds.
    #[must_use]
    pub fn row(&self, y: u16) -> Option<&[Cell]> {
        (y < self.height).then(|| {
            let start = self.index(0, y);
            &self.cells[start..start + usize::from(self.width)]
        })
    }

    /// The characters of row `y` as a string, continuation cells skipped.
    #[must_use]
    pub fn row_text(&self, y: u16) -> String {
        self.row(y)
            .unwrap_or_default()
            .iter()
            .filter(|c| !c.is_continuation())
            .map(|c| c.ch)
            .collect()
    }

    // ─── Whole-buffer operations ────────────────────────────────────────

    /// Reset every cell to empty.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::EMPTY);
    }

    /// Reset every cell to a space on `bg`.
    pub fn fill(&mut self, bg: CellColor) {
        self.cells.fill(Cell::EMPTY.with_bg(bg));
    }

    /// Resize, discarding all content.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.cells.clear();
        self.cells
            .resize(usize::from(width) * usize::from(height), Cell::EMPTY);
    }

    /// Copy `other` into this buffer, reusing the allocation.
    ///
    /// Falls back to a full clone when the sizes differ.
    pub fn copy_from(&mut self, other: &Self) {
        if self.width == other.width && self.height == other.height {
            self.cells.copy_from_slice(&other.cells);
        } else {
            self.clone_from(other);
        }
    }

    // ─── Painting ───────────────────────────────────────────────────────

    /// Write one cell. Returns `false` if `(x, y)` is out of bounds.
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }
        self.break_wide_char_at(x, y);
        let idx = self.index(x, y);
        self.cells[idx] = cell;
        true
    }

    /// Paint `text` left to right from `(x, y)`.
    ///
    /// Zero-width characters are skipped. A wide character that would not
    /// fit before the right edge becomes a space. Returns the number of
    /// columns painted.
    pub fn paint_text(&mut self, x: u16, y: u16, text: &str, style: Style) -> u16 {
        if y >= self.height {
            return 0;
        }

        let mut col = x;
        for ch in text.chars() {
            if col >= self.width {
                break;
            }
            let w = ch.width().unwrap_or(0);
            if w == 0 {
                continue;
            }

            let cell = Cell {
                ch,
                fg: style.fg,
                bg: style.bg,
                inverse: style.inverse,
            };

            if w == 2 {
                if col + 1 >= self.width {
                    self.set(col, y, Cell { ch: ' ', ..cell });
                    col += 1;
                    break;
                }
                self.set(col, y, cell);
                self.set(
                    col + 1,
                    y,
                    Cell::continuation(style.fg, style.bg, style.inverse),
                );
                col += 2;
            } else {
                self.set(col, y, cell);
                col += 1;
            }
        }

        col - x
    }

    /// Paint `text` horizontally centered on row `y`.
    ///
    /// Text wider than the buffer starts at column 0 and is clipped on the
    /// right. Returns the starting column.
    pub fn paint_centered(&mut self, y: u16, text: &str, style: Style) -> u16 {
        let width = string_width(text);
        let start = usize::from(self.width).saturating_sub(width) / 2;
        // start <= width / 2, which fits in u16.
        let start = u16::try_from(start).unwrap_or(0);
        self.paint_text(start, y, text, style);
        start
    }

    /// Break any wide character that overlaps `(x, y)` so no half of it is
    /// left dangling.
    fn break_wide_char_at(&mut self, x: u16, y: u16) {
        let idx = self.index(x, y);
        if self.cells[idx].is_continuation() && x > 0 {
            let prev = self.index(x - 1, y);
            self.cells[prev].ch = ' ';
        }
        if x + 1 < self.width {
            let next = self.index(x + 1, y);
            if self.cells[next].is_continuation() {
                self.cells[next].ch = ' ';
            }
        }
    }
}

impl std::fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FrameBuffer({}x{})", self.width, self.height)
    }
}

// ─── Text Width ──────────────────────────────────────────────────────────────

/// Display width of a string in terminal columns.
///
/// ```
/// use chroma_term::buffer::string_width;
///
/// assert_eq!(string_width("#ff0080"), 7);
/// assert_eq!(string_width("中文"), 4);
/// ```
#[must_use]
pub fn string_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const WHITE_ON_BLACK: Style = Style::new(CellColor::WHITE, CellColor::BLACK);

    // ── Basics ──────────────────────────────────────────────────────────

    #[test]
    fn new_is_empty() {
        let buf = FrameBuffer::new(4, 2);
        assert_eq!(buf.width(), 4);
        assert_eq!(buf.height(), 2);
        assert_eq!(buf.get(3, 1), Some(&Cell::EMPTY));
        assert_eq!(buf.get(4, 0), None);
        assert_eq!(buf.get(0, 2), None);
    }

    #[test]
    fn set_out_of_bounds_is_rejected() {
        let mut buf = FrameBuffer::new(2, 2);
        assert!(!buf.set(2, 0, Cell::new('x')));
        assert!(buf.set(1, 1, Cell::new('x')));
    }

    #[test]
    fn fill_sets_every_background() {
        let mut buf = FrameBuffer::new(3, 3);
        buf.fill(CellColor::Rgb(10, 20, 30));
        for y in 0..3 {
            for cell in buf.row(y).unwrap() {
                assert_eq!(cell.bg, CellColor::Rgb(10, 20, 30));
                assert_eq!(cell.ch, ' ');
            }
        }
    }

    #[test]
    fn resize_discards_content() {
        let mut buf = FrameBuffer::new(2, 2);
        buf.set(0, 0, Cell::new('x'));
        buf.resize(3, 1);
        assert_eq!(buf.row_text(0), "   ");
        assert_eq!(buf.row(1), None);
    }

    #[test]
    fn copy_from_matches_source() {
        let mut a = FrameBuffer::new(3, 1);
        a.paint_text(0, 0, "abc", WHITE_ON_BLACK);
        let mut b = FrameBuffer::new(3, 1);
        b.copy_from(&a);
        assert_eq!(a, b);

        let mut c = FrameBuffer::new(1, 1);
        c.copy_from(&a);
        assert_eq!(a, c);
    }

    // ── Text ────────────────────────────────────────────────────────────

    #[test]
    fn paint_text_writes_style() {
        let mut buf = FrameBuffer::new(10, 1);
        let n = buf.paint_text(2, 0, "hi", WHITE_ON_BLACK.inverted());
        assert_eq!(n, 2);
        assert_eq!(buf.row_text(0), "  hi      ");
        let c = buf.get(2, 0).unwrap();
        assert_eq!(c.fg, CellColor::WHITE);
        assert_eq!(c.bg, CellColor::BLACK);
        assert!(c.inverse);
    }

    #[test]
    fn paint_text_clips_right_edge() {
        let mut buf = FrameBuffer::new(4, 1);
        let n = buf.paint_text(2, 0, "hello", WHITE_ON_BLACK);
        assert_eq!(n, 2);
        assert_eq!(buf.row_text(0), "  he");
    }

    #[test]
    fn paint_text_below_buffer_paints_nothing() {
        let mut buf = FrameBuffer::new(4, 1);
        assert_eq!(buf.paint_text(0, 1, "x", WHITE_ON_BLACK), 0);
    }

    #[test]
    fn wide_chars_take_two_columns() {
        let mut buf = FrameBuffer::new(6, 1);
        let n = buf.paint_text(0, 0, "中a", WHITE_ON_BLACK);
        assert_eq!(n, 3);
        assert!(buf.get(1, 0).unwrap().is_continuation());
        assert_eq!(buf.row_text(0), "中a   ");
    }

    #[test]
    fn wide_char_at_edge_becomes_space() {
        let mut buf = FrameBuffer::new(3, 1);
        buf.paint_text(2, 0, "中", WHITE_ON_BLACK);
        assert_eq!(buf.get(2, 0).unwrap().ch, ' ');
    }

    #[test]
    fn overwriting_half_a_wide_char_breaks_it() {
        let mut buf = FrameBuffer::new(4, 1);
        buf.paint_text(0, 0, "中", WHITE_ON_BLACK);
        buf.set(1, 0, Cell::new('x'));
        assert_eq!(buf.row_text(0), " x  ");
    }

    // ── Centering ───────────────────────────────────────────────────────

    #[test]
    fn centered_text() {
        let mut buf = FrameBuffer::new(11, 1);
        let start = buf.paint_centered(0, "#000000", WHITE_ON_BLACK);
        assert_eq!(start, 2);
        assert_eq!(buf.row_text(0), "  #000000  ");
    }

    #[test]
    fn centered_text_wider_than_buffer_starts_at_zero() {
        let mut buf = FrameBuffer::new(3, 1);
        assert_eq!(buf.paint_centered(0, "#ff0080", WHITE_ON_BLACK), 0);
        assert_eq!(buf.row_text(0), "#ff");
    }

    #[test]
    fn string_width_counts_columns() {
        assert_eq!(string_width(""), 0);
        assert_eq!(string_width("255, 000, 128"), 13);
        assert_eq!(string_width("a中b"), 4);
    }
}
