// SPDX-License-Identifier: MIT
//
// Menu bar: the top terminal row.
//
//   Axes: X Y Both │ Display: HEX RGB HSB/HSV HSL │ Copy: HEX RGB HSB/HSV HSL
//
// One group per mode, one entry per choice. The active entry of each group
// is drawn inverse. Clicking an entry selects it through the shared state,
// the same way a key binding would.

use chroma_core::{AxisMode, Notation, SharedState};
use chroma_term::buffer::{FrameBuffer, Style, string_width};
use chroma_term::cell::CellColor;

/// Row the bar is painted on.
pub const MENU_ROW: u16 = 0;

const BAR_STYLE: Style = Style::new(CellColor::Rgb(220, 220, 220), CellColor::Rgb(48, 48, 48));
const HEADING_STYLE: Style = Style::new(CellColor::Rgb(150, 150, 150), CellColor::Rgb(48, 48, 48));
const SEPARATOR: &str = "│";

// ─── MenuItem ────────────────────────────────────────────────────────────────

/// One selectable menu entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    Axis(AxisMode),
    Display(Notation),
    Copy(Notation),
}

impl MenuItem {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Axis(mode) => mode.label(),
            Self::Display(n) | Self::Copy(n) => n.label(),
        }
    }

    /// Whether this entry is the current choice of its group.
    #[must_use]
    pub fn is_active(self, shared: &SharedState) -> bool {
        match self {
            Self::Axis(mode) => shared.axis_mode() == mode,
            Self::Display(n) => shared.display_notation() == n,
            Self::Copy(n) => shared.copy_notation() == n,
        }
    }

    /// Make this entry the current choice of its group.
    pub fn select(self, shared: &SharedState) {
        match self {
            Self::Axis(mode) => shared.set_axis_mode(mode),
            Self::Display(n) => shared.set_display_notation(n),
            Self::Copy(n) => shared.set_copy_notation(n),
        }
    }
}

// ─── Layout ──────────────────────────────────────────────────────────────────

/// A menu entry placed on the bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuEntry {
    pub item: MenuItem,
    /// First column, including the one-space padding.
    pub start: u16,
    pub width: u16,
}

impl MenuEntry {
    #[must_use]
    pub const fn contains(&self, x: u16) -> bool {
        x >= self.start && x < self.start + self.width
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Label {
    text: &'static str,
    start: u16,
}

/// The laid-out bar. Fixed content, computed once.
#[derive(Debug, Clone)]
pub struct MenuBar {
    entries: Vec<MenuEntry>,
    headings: Vec<Label>,
    separators: Vec<u16>,
}

impl MenuBar {
    #[must_use]
    pub fn new() -> Self {
        let groups: [(&'static str, Vec<MenuItem>); 3] = [
            ("Axes:", AxisMode::ALL.into_iter().map(MenuItem::Axis).collect()),
            ("Display:", Notation::ALL.into_iter().map(MenuItem::Display).collect()),
            ("Copy:", Notation::ALL.into_iter().map(MenuItem::Copy).collect()),
        ];

        let mut entries = Vec::new();
        let mut headings = Vec::new();
        let mut separators = Vec::new();
        let mut col: u16 = 1;

        for (i, (heading, items)) in groups.into_iter().enumerate() {
            if i > 0 {
                col += 1;
                separators.push(col);
                col += 2;
            }
            headings.push(Label { text: heading, start: col });
            col += text_width(heading);

            for item in items {
                let width = text_width(item.label()) + 2;
                entries.push(MenuEntry { item, start: col, width });
                col += width;
            }
        }

        Self {
            entries,
            headings,
            separators,
        }
    }

    #[cfg(test)]
    pub fn entries(&self) -> &[MenuEntry] {
        &self.entries
    }

    /// The entry under `(x, y)`, if any.
    #[must_use]
    pub fn hit(&self, x: u16, y: u16) -> Option<MenuItem> {
        if y != MENU_ROW {
            return None;
        }
        self.entries.iter().find(|e| e.contains(x)).map(|e| e.item)
    }

    /// Paint the bar across the top row, clipped to the buffer width.
    pub fn paint(&self, buf: &mut FrameBuffer, shared: &SharedState) {
        let blank = " ".repeat(usize::from(buf.width()));
        buf.paint_text(0, MENU_ROW, &blank, BAR_STYLE);

        for heading in &self.headings {
            buf.paint_text(heading.start, MENU_ROW, heading.text, HEADING_STYLE);
        }
        for &col in &self.separators {
            buf.paint_text(col, MENU_ROW, SEPARATOR, HEADING_STYLE);
        }
        for entry in &self.entries {
            let style = if entry.item.is_active(shared) {
                BAR_STYLE.inverted()
            } else {
                BAR_STYLE
            };
            let text = format!(" {} ", entry.item.label());
            buf.paint_text(entry.start, MENU_ROW, &text, style);
        }
    }
}

impl Default for MenuBar {
    fn default() -> Self {
        Self::new()
    }
}

fn text_width(s: &str) -> u16 {
    u16::try_from(string_width(s)).unwrap_or(u16::MAX)
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn bar_text() -> String {
        let bar = MenuBar::new();
        let mut buf = FrameBuffer::new(100, 3);
        bar.paint(&mut buf, &SharedState::default());
        buf.row_text(MENU_ROW)
    }

    // ── Layout ──────────────────────────────────────────────────────────

    #[test]
    fn bar_reads_like_the_menus() {
        assert_eq!(
            bar_text().trim_end(),
            " Axes: X  Y  Both  │ Display: HEX  RGB  HSB/HSV  HSL  │ Copy: HEX  RGB  HSB/HSV  HSL"
        );
    }

    #[test]
    fn eleven_entries_without_overlap() {
        let bar = MenuBar::new();
        let entries = bar.entries();
        assert_eq!(entries.len(), 11);
        for pair in entries.windows(2) {
            assert!(pair[0].start + pair[0].width <= pair[1].start);
        }
    }

    // ── Hit testing ─────────────────────────────────────────────────────

    #[test]
    fn hit_finds_entries_on_top_row() {
        let bar = MenuBar::new();
        for entry in bar.entries() {
            assert_eq!(bar.hit(entry.start, MENU_ROW), Some(entry.item));
            assert_eq!(bar.hit(entry.start + entry.width - 1, MENU_ROW), Some(entry.item));
        }
    }

    #[test]
    fn hit_misses_headings_and_other_rows() {
        let bar = MenuBar::new();
        // "Axes:" heading.
        assert_eq!(bar.hit(2, MENU_ROW), None);
        let first = bar.entries()[0];
        assert_eq!(bar.hit(first.start, MENU_ROW + 1), None);
        assert_eq!(bar.hit(500, MENU_ROW), None);
    }

    // ── Selection ───────────────────────────────────────────────────────

    #[test]
    fn select_updates_shared_state() {
        let shared = SharedState::default();
        MenuItem::Axis(AxisMode::Both).select(&shared);
        MenuItem::Display(Notation::Hsl).select(&shared);
        MenuItem::Copy(Notation::Rgb).select(&shared);
        assert_eq!(shared.axis_mode(), AxisMode::Both);
        assert_eq!(shared.display_notation(), Notation::Hsl);
        assert_eq!(shared.copy_notation(), Notation::Rgb);
        assert!(MenuItem::Copy(Notation::Rgb).is_active(&shared));
        assert!(!MenuItem::Copy(Notation::Hex).is_active(&shared));
    }

    // ── Painting ────────────────────────────────────────────────────────

    #[test]
    fn active_entries_are_inverse() {
        let shared = SharedState::default();
        shared.set_display_notation(Notation::Rgb);
        let bar = MenuBar::new();
        let mut buf = FrameBuffer::new(100, 1);
        bar.paint(&mut buf, &shared);

        for entry in bar.entries() {
            let cell = buf.get(entry.start, MENU_ROW).unwrap();
            assert_eq!(cell.inverse, entry.item.is_active(&shared), "{:?}", entry.item);
        }
    }

    #[test]
    fn narrow_terminal_clips() {
        let bar = MenuBar::new();
        let mut buf = FrameBuffer::new(10, 1);
        bar.paint(&mut buf, &SharedState::default());
        assert_eq!(buf.row_text(MENU_ROW), " Axes: X  ");
    }
}
