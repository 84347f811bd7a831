// SPDX-License-Identifier: MIT
//
// ANSI escape sequence generation.
//
// Pure functions that write escape sequences to any `impl Write`. No state,
// no decisions about when to emit; that is the `CellWriter`'s job. This
// module only knows the byte-level encoding of each command.
//
// Cursor positions are 0-indexed in our API and converted to the 1-indexed
// form the terminal expects.

use std::io::{self, Write};

use crate::cell::CellColor;

// ─── Cursor ──────────────────────────────────────────────────────────────────

/// Move the cursor to `(x, y)` (CUP).
#[inline]
pub fn cursor_to(w: &mut impl Write, x: u16, y: u16) -> io::Result<()> {
    write!(w, "\x1b[{};{}H", u32::from(y) + 1, u32::from(x) + 1)
}

/// Hide the cursor (DECTCEM reset).
#[inline]
pub fn cursor_hide(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25l")
}

/// Show the cursor (DECTCEM set).
#[inline]
pub fn cursor_show(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25h")
}

// ─── Screen ──────────────────────────────────────────────────────────────────

/// Clear the entire screen (ED 2).
#[inline]
pub fn clear_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[2J")
}

/// Reset all SGR attributes (SGR 0).
///
/// The stateful renderer must forget its tracked colors after this.
#[inline]
pub fn reset(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[0m")
}

// ─── Colors ──────────────────────────────────────────────────────────────────

/// Set the foreground color.
pub fn fg(w: &mut impl Write, color: CellColor) -> io::Result<()> {
    match color {
        CellColor::Default => w.write_all(b"\x1b[39m"),
        CellColor::Rgb(r, g, b) => write!(w, "\x1b[38;2;{r};{g};{b}m"),
    }
}

/// Set the background color.
pub fn bg(w: &mut impl Write, color: CellColor) -> io::Result<()> {
    match color {
        CellColor::Default => w.write_all(b"\x1b[49m"),
        CellColor::Rgb(r, g, b) => write!(w, "\x1b[48;2;{r};{g};{b}m"),
    }
}

/// Turn inverse video on (SGR 7) or off (SGR 27).
#[inline]
pub fn inverse(w: &mut impl Write, on: bool) -> io::Result<()> {
    w.write_all(if on { b"\x1b[7m" } else { b"\x1b[27m" })
}

// ─── Synchronized Output ─────────────────────────────────────────────────────

/// Begin synchronized output (DEC 2026).
///
/// The terminal holds everything until [`end_sync`], so a frame never shows
/// half-painted.
#[inline]
pub fn begin_sync(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?2026h")
}

/// End synchronized output.
#[inline]
pub fn end_sync(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?2026l")
}

// ─── Alternate Screen ───────────────────────────────────────────────────────

/// Enter the alternate screen buffer (DEC 1049).
#[inline]
pub fn enter_alt_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?1049h")
}

/// Leave the alternate screen and restore the original content.
#[inline]
pub fn exit_alt_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?1049l")
}

// ─── Mouse Protocol ─────────────────────────────────────────────────────────

/// Enable all-motion SGR mouse tracking: button press and release
/// (DEC 1000), drag (1002), plain motion (1003), SGR encoding (1006).
pub fn enable_mouse(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?1000h\x1b[?1002h\x1b[?1003h\x1b[?1006h")
}

/// Disable all mouse tracking.
pub fn disable_mouse(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?1006l\x1b[?1003l\x1b[?1002l\x1b[?1000l")
}

// ─── Focus Reporting ────────────────────────────────────────────────────────

/// Enable focus reporting (DEC 1004): `ESC [ I` on gain, `ESC [ O` on loss.
#[inline]
pub fn enable_focus_reporting(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?1004h")
}

/// Disable focus reporting.
#[inline]
pub fn disable_focus_reporting(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?1004l")
}

// ─── Window Title ───────────────────────────────────────────────────────────

/// Set the terminal window title (OSC 2).
///
/// Control characters are dropped so the title cannot terminate the
/// sequence early.
pub fn set_title(w: &mut impl Write, title: &str) -> io::Result<()> {
    w.write_all(b"\x1b]2;")?;
    for ch in title.chars().filter(|c| !c.is_control()) {
        write!(w, "{ch}")?;
    }
    w.write_all(b"\x07")
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Run an ANSI function and return its output as a string.
    fn emit<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    // ── Cursor / screen ─────────────────────────────────────────────────

    #[test]
    fn cursor_to_is_one_based() {
        assert_eq!(emit(|w| cursor_to(w, 0, 0)), "\x1b[1;1H");
        assert_eq!(emit(|w| cursor_to(w, 10, 20)), "\x1b[21;11H");
    }

    #[test]
    fn cursor_to_max_does_not_overflow() {
        assert_eq!(emit(|w| cursor_to(w, u16::MAX, u16::MAX)), "\x1b[65536;65536H");
    }

    #[test]
    fn cursor_visibility() {
        assert_eq!(emit(|w| cursor_hide(w)), "\x1b[?25l");
        assert_eq!(emit(|w| cursor_show(w)), "\x1b[?25h");
    }

    #[test]
    fn clear_and_reset() {
        assert_eq!(emit(|w| clear_screen(w)), "\x1b[2J");
        assert_eq!(emit(|w| reset(w)), "\x1b[0m");
    }

    // ── Colors ──────────────────────────────────────────────────────────

    #[test]
    fn truecolor_fg_and_bg() {
        assert_eq!(emit(|w| fg(w, CellColor::Rgb(255, 0, 128))), "\x1b[38;2;255;0;128m");
        assert_eq!(emit(|w| bg(w, CellColor::Rgb(1, 2, 3))), "\x1b[48;2;1;2;3m");
    }

    #[test]
    fn default_colors() {
        assert_eq!(emit(|w| fg(w, CellColor::Default)), "\x1b[39m");
        assert_eq!(emit(|w| bg(w, CellColor::Default)), "\x1b[49m");
    }

    #[test]
    fn inverse_on_off() {
        assert_eq!(emit(|w| inverse(w, true)), "\x1b[7m");
        assert_eq!(emit(|w| inverse(w, false)), "\x1b[27m");
    }

    // ── Modes ───────────────────────────────────────────────────────────

    #[test]
    fn sync_and_alt_screen() {
        assert_eq!(emit(|w| begin_sync(w)), "\x1b[?2026h");
        assert_eq!(emit(|w| end_sync(w)), "\x1b[?2026l");
        assert_eq!(emit(|w| enter_alt_screen(w)), "\x1b[?1049h");
        assert_eq!(emit(|w| exit_alt_screen(w)), "\x1b[?1049l");
    }

    #[test]
    fn mouse_enables_all_motion_tracking() {
        assert_eq!(
            emit(|w| enable_mouse(w)),
            "\x1b[?1000h\x1b[?1002h\x1b[?1003h\x1b[?1006h"
        );
    }

    #[test]
    fn disable_mouse_clears_everything() {
        let s = emit(|w| disable_mouse(w));
        for code in ["1000", "1002", "1003", "1006"] {
            assert!(s.contains(&format!("\x1b[?{code}l")), "missing {code}");
        }
    }

    #[test]
    fn focus_reporting() {
        assert_eq!(emit(|w| enable_focus_reporting(w)), "\x1b[?1004h");
        assert_eq!(emit(|w| disable_focus_reporting(w)), "\x1b[?1004l");
    }

    #[test]
    fn title_strips_control_chars() {
        assert_eq!(emit(|w| set_title(w, "Color\x07 chooser")), "\x1b]2;Color chooser\x07");
    }
}
