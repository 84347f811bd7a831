// SPDX-License-Identifier: MIT
//
// Output buffering and stateful cell rendering.
//
//   OutputBuffer  collects a whole frame of bytes so it reaches the terminal
//                 in one write.
//
//   CellWriter    remembers the cursor position, colors, and inverse flag it
//                 last emitted and skips escapes that would not change
//                 anything. A row of identical background cells becomes one
//                 SGR sequence followed by plain spaces.
//
// The picker repaints the whole background every tick while a fade is in
// progress, so the second point matters more here than anywhere else.

use std::io::{self, Write};

use crate::ansi;
use crate::cell::{Cell, CellColor};

// ─── OutputBuffer ────────────────────────────────────────────────────────────

const DEFAULT_CAPACITY: usize = 16_384;

/// Bytes accumulated for a single write.
pub struct OutputBuffer {
    buf: Vec<u8>,
}

impl OutputBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(DEFAULT_CAPACITY),
        }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Append one character as UTF-8.
    pub fn write_char(&mut self, ch: char) {
        let mut enc = [0u8; 4];
        self.buf
            .extend_from_slice(ch.encode_utf8(&mut enc).as_bytes());
    }

    #[inline]
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Write everything to `w` and clear the buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `w` fails. The buffer is left intact.
    pub fn flush_to(&mut self, w: &mut impl Write) -> io::Result<()> {
        if !self.buf.is_empty() {
            w.write_all(&self.buf)?;
            w.flush()?;
            self.buf.clear();
        }
        Ok(())
    }

    /// Write everything to stdout and clear the buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to stdout fails.
    pub fn flush_stdout(&mut self) -> io::Result<()> {
        self.flush_to(&mut io::stdout().lock())
    }
}

impl Write for OutputBuffer {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        // Real flushing goes through flush_to / flush_stdout.
        Ok(())
    }
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new()
    }
}

// ─── CellWriter ──────────────────────────────────────────────────────────────

/// Emits cells with the minimum of escapes.
///
/// - The cursor move is skipped when the cell is directly right of the last
///   one written; the terminal advanced there already.
/// - Colors and inverse are skipped when unchanged.
/// - A continuation cell right after its wide character writes nothing.
#[allow(clippy::struct_field_names)]
pub struct CellWriter {
    last_x: i32,
    last_y: i32,
    last_fg: Option<CellColor>,
    last_bg: Option<CellColor>,
    last_inverse: bool,
}

impl CellWriter {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            last_x: -1,
            last_y: -1,
            last_fg: None,
            last_bg: None,
            last_inverse: false,
        }
    }

    /// Forget all tracked state. Call after an SGR reset or screen clear.
    #[allow(clippy::missing_const_for_fn)]
    pub fn reset_state(&mut self) {
        *self = Self::new();
    }

    /// Emit one cell.
    pub fn render_cell(&mut self, out: &mut OutputBuffer, x: u16, y: u16, cell: &Cell) {
        let xi = i32::from(x);
        let yi = i32::from(y);

        if cell.is_continuation() && yi == self.last_y && xi == self.last_x + 1 {
            // The wide character just written already covered this column.
            self.last_x = xi;
            return;
        }

        if yi != self.last_y || xi != self.last_x + 1 {
            ansi::cursor_to(out, x, y).ok();
        }

        self.apply_style(out, cell);
        out.write_char(if cell.is_continuation() { ' ' } else { cell.ch });

        self.last_x = xi;
        self.last_y = yi;
    }

    fn apply_style(&mut self, out: &mut OutputBuffer, cell: &Cell) {
        if cell.inverse != self.last_inverse {
            ansi::inverse(out, cell.inverse).ok();
            self.last_inverse = cell.inverse;
        }
        if self.last_fg != Some(cell.fg) {
            ansi::fg(out, cell.fg).ok();
            self.last_fg = Some(cell.fg);
        }
        if self.last_bg != Some(cell.bg) {
            ansi::bg(out, cell.bg).ok();
            self.last_bg = Some(cell.bg);
        }
    }
}

impl Default for CellWriter {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn render(cells: &[(u16, u16, Cell)]) -> String {
        let mut out = OutputBuffer::new();
        let mut writer = CellWriter::new();
        for (x, y, cell) in cells {
            writer.render_cell(&mut out, *x, *y, cell);
        }
        String::from_utf8(out.as_bytes().to_vec()).unwrap()
    }

    // ── OutputBuffer ────────────────────────────────────────────────────

    #[test]
    fn buffer_starts_empty() {
        let buf = OutputBuffer::new();
        assert!(buf.is_empty());
        assert_eq!(buf.len(), 0);
    }

    #[test]
    fn buffer_write_trait_and_chars() {
        let mut buf = OutputBuffer::new();
        write!(buf, "n={}", 7).unwrap();
        buf.write_char('中');
        assert_eq!(buf.as_bytes(), "n=7中".as_bytes());
    }

    #[test]
    fn flush_to_drains() {
        let mut buf = OutputBuffer::new();
        buf.write_char('x');
        let mut sink = Vec::new();
        buf.flush_to(&mut sink).unwrap();
        assert_eq!(sink, b"x");
        assert!(buf.is_empty());
    }

    // ── CellWriter ──────────────────────────────────────────────────────

    #[test]
    fn first_cell_emits_position_and_colors() {
        let cell = Cell::new('a').with_fg(CellColor::WHITE).with_bg(CellColor::BLACK);
        assert_eq!(
            render(&[(0, 0, cell)]),
            "\x1b[1;1H\x1b[38;2;255;255;255m\x1b[48;2;0;0;0ma"
        );
    }

    #[test]
    fn sequential_same_style_cells_emit_only_chars() {
        let cell = Cell::new(' ').with_bg(CellColor::Rgb(9, 9, 9));
        let s = render(&[(0, 0, cell), (1, 0, cell), (2, 0, cell)]);
        assert_eq!(s, "\x1b[1;1H\x1b[39m\x1b[48;2;9;9;9m   ");
    }

    #[test]
    fn gap_or_new_row_moves_cursor() {
        let cell = Cell::new('x');
        let s = render(&[(0, 0, cell), (5, 0, cell), (0, 1, cell)]);
        assert!(s.contains("\x1b[1;6H"));
        assert!(s.contains("\x1b[2;1H"));
    }

    #[test]
    fn inverse_toggles() {
        let plain = Cell::new('a');
        let inv = plain.with_inverse(true);
        let s = render(&[(0, 0, inv), (1, 0, plain)]);
        // First cell: inverse on, then both default colors. Second: only
        // the inverse toggle changes.
        assert_eq!(s, "\x1b[1;1H\x1b[7m\x1b[39m\x1b[49ma\x1b[27ma");
    }

    #[test]
    fn continuation_after_wide_char_is_silent() {
        let wide = Cell::new('中');
        let cont = Cell::continuation(CellColor::Default, CellColor::Default, false);
        let s = render(&[(0, 0, wide), (1, 0, cont)]);
        assert!(s.ends_with('中'));
    }

    #[test]
    fn orphan_continuation_writes_space() {
        let cont = Cell::continuation(CellColor::Default, CellColor::Default, false);
        let s = render(&[(3, 0, cont)]);
        assert!(s.ends_with(' '));
    }
}
