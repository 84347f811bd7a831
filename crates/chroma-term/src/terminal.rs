// SPDX-License-Identifier: MIT
//
// Terminal session: raw input, the alternate screen, and all-motion mouse
// tracking, undone on leave, on drop, and on panic.
//
// Safety: termios (tcgetattr, cfmakeraw, tcsetattr), ioctl (TIOCGWINSZ),
// isatty, and the raw fd write in the panic hook are plain POSIX calls with
// no safe wrapper in std. Each unsafe block is kept to the single call.
#![allow(unsafe_code)]
//
// Leaving writes one fixed byte sequence, `LEAVE_SEQUENCE`. The panic hook
// writes the same bytes straight to fd 1 (the stdout lock may be held by
// the panicking frame), puts back the saved termios, and then runs the
// previous hook so the panic message lands on a usable screen.

use std::io::{self, Write};
use std::sync::{Mutex, Once, PoisonError};

use tracing::{debug, warn};

use crate::ansi;

// ─── Size ────────────────────────────────────────────────────────────────────

/// Terminal dimensions in cells. Never zero once queried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub cols: u16,
    pub rows: u16,
}

impl Size {
    /// Used when the terminal cannot be queried.
    pub const FALLBACK: Self = Self { cols: 80, rows: 24 };

    #[inline]
    #[must_use]
    pub const fn new(cols: u16, rows: u16) -> Self {
        Self { cols, rows }
    }

    #[inline]
    #[must_use]
    pub const fn area(self) -> u32 {
        (self.cols as u32) * (self.rows as u32)
    }
}

/// The window size from `TIOCGWINSZ` on stdout.
///
/// `None` when stdout is not a terminal or reports a zero dimension.
#[cfg(unix)]
#[must_use]
pub fn get_size() -> Option<Size> {
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    if unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &raw mut ws) } != 0 {
        return None;
    }
    match (ws.ws_col, ws.ws_row) {
        (0, _) | (_, 0) => None,
        (cols, rows) => Some(Size::new(cols, rows)),
    }
}

#[cfg(not(unix))]
#[must_use]
pub const fn get_size() -> Option<Size> {
    None
}

/// Whether stdin is a terminal.
#[cfg(unix)]
#[must_use]
pub fn is_tty() -> bool {
    unsafe { libc::isatty(libc::STDIN_FILENO) == 1 }
}

#[cfg(not(unix))]
#[must_use]
pub const fn is_tty() -> bool {
    false
}

// ─── Raw Mode ────────────────────────────────────────────────────────────────

/// Termios as it was before raw mode, for the panic hook.
#[cfg(unix)]
static SAVED_TERMIOS: Mutex<Option<libc::termios>> = Mutex::new(None);

#[cfg(unix)]
fn set_stdin_termios(termios: &libc::termios) -> io::Result<()> {
    match unsafe { libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, termios) } {
        0 => Ok(()),
        _ => Err(io::Error::last_os_error()),
    }
}

/// Stdin in raw mode. [`restore`](Self::restore) puts the saved settings
/// back.
#[cfg(unix)]
struct RawMode {
    saved: libc::termios,
}

#[cfg(unix)]
impl RawMode {
    /// Switch stdin to raw mode; `None` if stdin is not a terminal.
    fn enable() -> io::Result<Option<Self>> {
        if !is_tty() {
            return Ok(None);
        }

        let mut saved: libc::termios = unsafe { std::mem::zeroed() };
        if unsafe { libc::tcgetattr(libc::STDIN_FILENO, &raw mut saved) } != 0 {
            return Err(io::Error::last_os_error());
        }

        let mut termios = saved;
        unsafe { libc::cfmakeraw(&raw mut termios) };
        termios.c_cc[libc::VMIN] = 1;
        termios.c_cc[libc::VTIME] = 0;
        set_stdin_termios(&termios)?;

        *SAVED_TERMIOS.lock().unwrap_or_else(PoisonError::into_inner) = Some(saved);
        Ok(Some(Self { saved }))
    }

    fn restore(&self) -> io::Result<()> {
        set_stdin_termios(&self.saved)?;
        *SAVED_TERMIOS.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

#[cfg(not(unix))]
struct RawMode;

#[cfg(not(unix))]
impl RawMode {
    #[allow(clippy::unnecessary_wraps)]
    fn enable() -> io::Result<Option<Self>> {
        Ok(None)
    }

    #[allow(clippy::unnecessary_wraps, clippy::unused_self)]
    fn restore(&self) -> io::Result<()> {
        Ok(())
    }
}

// ─── Leave Sequence ──────────────────────────────────────────────────────────

/// Undoes everything [`Terminal::enter`] turns on: synchronized output,
/// focus reporting, every mouse mode, SGR attributes, the hidden cursor,
/// and finally the alternate screen, so the shell comes back clean.
#[rustfmt::skip]
const LEAVE_SEQUENCE: &[u8] = b"\
    \x1b[?2026l\
    \x1b[?1004l\
    \x1b[?1006l\x1b[?1003l\x1b[?1002l\x1b[?1000l\
    \x1b[0m\
    \x1b[?25h\
    \x1b[?1049l";

static PANIC_HOOK: Once = Once::new();

fn install_panic_hook() {
    PANIC_HOOK.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            restore_after_panic();
            previous(info);
        }));
    });
}

fn restore_after_panic() {
    #[cfg(unix)]
    {
        unsafe {
            libc::write(
                libc::STDOUT_FILENO,
                LEAVE_SEQUENCE.as_ptr().cast::<libc::c_void>(),
                LEAVE_SEQUENCE.len(),
            );
        }
        if let Some(saved) = *SAVED_TERMIOS.lock().unwrap_or_else(PoisonError::into_inner) {
            let _ = set_stdin_termios(&saved);
        }
    }

    #[cfg(not(unix))]
    {
        let mut out = io::stdout();
        let _ = out.write_all(LEAVE_SEQUENCE);
        let _ = out.flush();
    }
}

// ─── Terminal ────────────────────────────────────────────────────────────────

/// The terminal session. Leaves on drop.
///
/// ```no_run
/// use chroma_term::terminal::Terminal;
///
/// let mut term = Terminal::new();
/// term.enter(Some("Color chooser"))?;
/// // ... paint frames, read the mouse ...
/// term.leave()?;
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct Terminal {
    raw: Option<RawMode>,
    size: Size,
    active: bool,
}

impl Terminal {
    /// A handle with the current size (or 80×24). Does not touch the
    /// terminal until [`enter`](Self::enter).
    #[must_use]
    pub fn new() -> Self {
        Self {
            raw: None,
            size: get_size().unwrap_or(Size::FALLBACK),
            active: false,
        }
    }

    /// The size as of the last query.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    /// Query the size again. A failed query keeps the previous size.
    pub fn refresh_size(&mut self) -> Size {
        self.size = get_size().unwrap_or(self.size);
        self.size
    }

    #[inline]
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Start the session: raw input, alternate screen, hidden cursor,
    /// all-motion SGR mouse tracking, focus reporting, and the window title
    /// when one is given. Does nothing if already active.
    ///
    /// # Errors
    ///
    /// Returns an error if termios or terminal output fails.
    pub fn enter(&mut self, title: Option<&str>) -> io::Result<()> {
        if self.active {
            return Ok(());
        }

        install_panic_hook();
        self.raw = RawMode::enable()?;

        let mut out = io::stdout().lock();
        ansi::enter_alt_screen(&mut out)?;
        ansi::cursor_hide(&mut out)?;
        ansi::clear_screen(&mut out)?;
        ansi::enable_mouse(&mut out)?;
        ansi::enable_focus_reporting(&mut out)?;
        if let Some(title) = title {
            ansi::set_title(&mut out, title)?;
        }
        out.flush()?;

        self.active = true;
        debug!(
            cols = self.size.cols,
            rows = self.size.rows,
            raw = self.raw.is_some(),
            "terminal session started"
        );
        Ok(())
    }

    /// End the session. Does nothing if not active.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal output or the termios restore fails.
    pub fn leave(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;

        let mut out = io::stdout().lock();
        out.write_all(LEAVE_SEQUENCE)?;
        out.flush()?;
        drop(out);

        if let Some(raw) = self.raw.take() {
            raw.restore()?;
        }
        debug!("terminal session ended");
        Ok(())
    }
}

impl Default for Terminal {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        if let Err(err) = self.leave() {
            warn!(error = %err, "failed to restore terminal");
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
