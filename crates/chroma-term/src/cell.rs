// SPDX-License-Identifier: MIT
//
// Cell: one character position on screen.
//
// A cell is a character, a foreground and a background color, and an
// inverse flag (used to highlight the active menu entries). That is all the
// picker ever draws, so that is all a cell carries.
//
// Wide characters (CJK, some emoji) occupy two columns. The first cell
// holds the character; the second is a continuation cell (`ch == '\0'`)
// that the renderer skips but still colors.

/// A fully resolved terminal color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CellColor {
    /// The terminal's own default (SGR 39 / 49).
    #[default]
    Default,
    /// 24-bit truecolor.
    Rgb(u8, u8, u8),
}

impl CellColor {
    /// Plain white text, the color the picker draws its label in.
    pub const WHITE: Self = Self::Rgb(255, 255, 255);

    /// Pure black.
    pub const BLACK: Self = Self::Rgb(0, 0, 0);
}

impl From<(u8, u8, u8)> for CellColor {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::Rgb(r, g, b)
    }
}

/// Character stored in the second column of a wide character.
pub const CONTINUATION: char = '\0';

/// A single terminal cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// The character, or [`CONTINUATION`].
    pub ch: char,
    /// Text color.
    pub fg: CellColor,
    /// Background color.
    pub bg: CellColor,
    /// Swap foreground and background (SGR 7).
    pub inverse: bool,
}

impl Cell {
    /// A space on default colors.
    pub const EMPTY: Self = Self {
        ch: ' ',
        fg: CellColor::Default,
        bg: CellColor::Default,
        inverse: false,
    };

    /// A character on default colors.
    #[inline]
    #[must_use]
    pub const fn new(ch: char) -> Self {
        Self { ch, ..Self::EMPTY }
    }

    /// The second half of a wide character.
    #[inline]
    #[must_use]
    pub const fn continuation(fg: CellColor, bg: CellColor, inverse: bool) -> Self {
        Self {
            ch: CONTINUATION,
            fg,
            bg,
            inverse,
        }
    }

    #[inline]
    #[must_use]
    pub const fn with_fg(self, fg: CellColor) -> Self {
        Self { fg, ..self }
    }

    #[inline]
    #[must_use]
    pub const fn with_bg(self, bg: CellColor) -> Self {
        Self { bg, ..self }
    }

    #[inline]
    #[must_use]
    pub const fn with_inverse(self, inverse: bool) -> Self {
        Self { inverse, ..self }
    }

    /// Whether this cell is the second column of a wide character.
    #[inline]
    #[must_use]
    pub const fn is_continuation(&self) -> bool {
        self.ch == CONTINUATION
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::EMPTY
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_is_space_on_defaults() {
        let c = Cell::default();
        assert_eq!(c.ch, ' ');
        assert_eq!(c.fg, CellColor::Default);
        assert_eq!(c.bg, CellColor::Default);
        assert!(!c.inverse);
    }

    #[test]
    fn builders_touch_one_field() {
        let c = Cell::new('x')
            .with_fg(CellColor::WHITE)
            .with_bg(CellColor::Rgb(1, 2, 3))
            .with_inverse(true);
        assert_eq!(c.ch, 'x');
        assert_eq!(c.fg, CellColor::WHITE);
        assert_eq!(c.bg, CellColor::Rgb(1, 2, 3));
        assert!(c.inverse);
    }

    #[test]
    fn continuation_detection() {
        assert!(Cell::continuation(CellColor::Default, CellColor::BLACK, false).is_continuation());
        assert!(!Cell::new('a').is_continuation());
    }

    #[test]
    fn tuple_conversion() {
        assert_eq!(CellColor::from((9, 8, 7)), CellColor::Rgb(9, 8, 7));
    }
}
