// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Event loop: the single context that owns the application state.
//
// Stdin bytes arrive from the reader thread over a channel. The loop waits
// on that channel with `recv_timeout`, where the timeout is whatever is left
// until the next tick is due. That gives:
//
//   - Input handled as soon as it arrives, no polling latency.
//   - No CPU spent while idle: the thread is blocked in the channel.
//   - A steady tick. After each tick the next one is scheduled one
//     `tick_interval` later, so a burst of mouse motion never adds extra
//     ticks and never delays a due one by more than one dispatch pass.
//
// Terminal resize arrives as SIGWINCH. The handler only sets an atomic flag,
// which the loop checks every iteration.
//
// A lone ESC is ambiguous (Escape key, or the first byte of a sequence that
// got split across reads). The parser holds it, and the loop flushes it as a
// real Escape once nothing else has arrived for `ESC_TIMEOUT`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::buffer::FrameBuffer;
use crate::diff::DiffRenderer;
use crate::error::{Result, TermError};
use crate::input::{Event, Parser};
use crate::reader::StdinReader;
use crate::terminal::{self, Size, Terminal};

/// How long a lone ESC may wait for the rest of a sequence.
const ESC_TIMEOUT: Duration = Duration::from_millis(25);

// ─── SIGWINCH ────────────────────────────────────────────────────────────────

static SIGWINCH_RECEIVED: AtomicBool = AtomicBool::new(false);

#[cfg(unix)]
fn install_sigwinch_handler() {
    unsafe {
        let mut sa: libc::sigaction = std::mem::zeroed();
        sa.sa_sigaction = sigwinch_handler as *const () as usize;
        sa.sa_flags = libc::SA_RESTART;
        libc::sigemptyset(&raw mut sa.sa_mask);
        libc::sigaction(libc::SIGWINCH, &raw const sa, std::ptr::null_mut());
    }
}

#[cfg(unix)]
extern "C" fn sigwinch_handler(_sig: libc::c_int) {
    SIGWINCH_RECEIVED.store(true, Ordering::Relaxed);
}

#[cfg(not(unix))]
fn install_sigwinch_handler() {}

// ─── App Trait ───────────────────────────────────────────────────────────────

/// What the loop should do after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Continue,
    Quit,
}

/// An application driven by the [`EventLoop`].
///
/// Call order within one loop iteration:
///
/// 1. [`on_event`](App::on_event) for each parsed input event
/// 2. [`on_resize`](App::on_resize) if the terminal size changed
/// 3. [`on_tick`](App::on_tick) if the tick is due
/// 4. [`paint`](App::paint) if anything above reported a change
///
/// `on_resize` is also called once with the initial size before the first
/// frame.
pub trait App {
    /// Handle one input event. Return [`Action::Quit`] to stop the loop.
    fn on_event(&mut self, _event: &Event) -> Action {
        Action::Continue
    }

    /// The terminal now has `size`. Never called with a zero dimension.
    fn on_resize(&mut self, _size: Size) {}

    /// One fixed-cadence tick. Return `true` if a repaint is needed.
    fn on_tick(&mut self) -> bool {
        false
    }

    /// Paint the whole frame. The buffer has been cleared.
    fn paint(&mut self, buf: &mut FrameBuffer);
}

// ─── LoopConfig ──────────────────────────────────────────────────────────────

/// Event loop settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopConfig {
    /// Time from the end of one tick to the start of the next.
    pub tick_interval: Duration,
    /// Window title to set on entry.
    pub title: Option<&'static str>,
}

impl LoopConfig {
    /// 10 ms between ticks.
    pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(10);
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            tick_interval: Self::DEFAULT_TICK_INTERVAL,
            title: None,
        }
    }
}

// ─── TickClock ───────────────────────────────────────────────────────────────

/// Deadline scheduler for the tick.
///
/// ```
/// use std::time::{Duration, Instant};
/// use chroma_term::event_loop::TickClock;
///
/// let start = Instant::now();
/// let mut clock = TickClock::new(Duration::from_millis(10), start);
/// assert!(!clock.is_due(start));
/// assert_eq!(clock.timeout(start), Duration::from_millis(10));
///
/// let later = start + Duration::from_millis(12);
/// assert!(clock.is_due(later));
/// clock.reschedule(later);
/// assert_eq!(clock.timeout(later), Duration::from_millis(10));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TickClock {
    interval: Duration,
    next: Instant,
}

impl TickClock {
    /// First tick due one `interval` after `now`.
    #[must_use]
    pub fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            next: now + interval,
        }
    }

    #[inline]
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Time left until the tick is due; zero once it is.
    #[must_use]
    pub fn timeout(&self, now: Instant) -> Duration {
        self.next.saturating_duration_since(now)
    }

    #[must_use]
    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.next
    }

    /// Schedule the next tick one interval after `now` (the end of the tick
    /// just run).
    pub fn reschedule(&mut self, now: Instant) {
        self.next = now + self.interval;
    }
}

// ─── EventLoop ───────────────────────────────────────────────────────────────

/// Owns the terminal, parser, and renderer. [`run`](Self::run) returns when
/// the app quits or stdin closes.
///
/// ```no_run
/// use chroma_term::buffer::FrameBuffer;
/// use chroma_term::event_loop::{Action, App, EventLoop, LoopConfig};
/// use chroma_term::input::{Event, KeyCode};
///
/// struct Quitter;
///
/// impl App for Quitter {
///     fn on_event(&mut self, event: &Event) -> Action {
///         match event {
///             Event::Key(k) if k.code == KeyCode::Char('q') => Action::Quit,
///             _ => Action::Continue,
///         }
///     }
///
///     fn paint(&mut self, _buf: &mut FrameBuffer) {}
/// }
///
/// EventLoop::new(LoopConfig::default()).run(&mut Quitter)?;
/// # Ok::<(), chroma_term::TermError>(())
/// ```
pub struct EventLoop {
    terminal: Terminal,
    parser: Parser,
    renderer: DiffRenderer,
    config: LoopConfig,
}

impl EventLoop {
    #[must_use]
    pub fn new(config: LoopConfig) -> Self {
        Self {
            terminal: Terminal::new(),
            parser: Parser::new(),
            renderer: DiffRenderer::new(),
            config,
        }
    }

    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.terminal.size()
    }

    #[inline]
    #[must_use]
    pub const fn config(&self) -> &LoopConfig {
        &self.config
    }

    /// Run until the app returns [`Action::Quit`] or stdin closes.
    ///
    /// The terminal is restored before returning, on success or error.
    ///
    /// # Errors
    ///
    /// [`TermError::NotATerminal`] if stdin is not a TTY, a spawn error for
    /// the reader thread, or an I/O error from the terminal.
    pub fn run(&mut self, app: &mut impl App) -> Result<()> {
        if !terminal::is_tty() {
            return Err(TermError::NotATerminal);
        }

        self.terminal.enter(self.config.title)?;
        install_sigwinch_handler();
        info!(
            tick_ms = self.config.tick_interval.as_millis(),
            cols = self.terminal.size().cols,
            rows = self.terminal.size().rows,
            "event loop started"
        );

        let result = StdinReader::spawn().and_then(|(mut reader, rx)| {
            let result = self.run_inner(app, &rx);
            reader.stop();
            result
        });

        self.terminal.leave()?;
        info!("event loop stopped");
        result
    }

    fn run_inner(&mut self, app: &mut impl App, rx: &Receiver<Vec<u8>>) -> Result<()> {
        let size = self.terminal.size();
        let mut frame = FrameBuffer::new(size.cols, size.rows);
        app.on_resize(size);

        let mut clock = TickClock::new(self.config.tick_interval, Instant::now());
        let mut pending_since: Option<Instant> = None;
        let mut dirty = true;

        loop {
            // ── Input ───────────────────────────────────────────────
            let now = Instant::now();
            let mut timeout = clock.timeout(now);
            if let Some(since) = pending_since {
                timeout = timeout.min((since + ESC_TIMEOUT).saturating_duration_since(now));
            }

            let events = match rx.recv_timeout(timeout) {
                Ok(bytes) => self.parser.advance(&bytes),
                Err(RecvTimeoutError::Timeout) => {
                    if pending_since.is_some_and(|since| since.elapsed() >= ESC_TIMEOUT) {
                        self.parser.flush()
                    } else {
                        Vec::new()
                    }
                }
                Err(RecvTimeoutError::Disconnected) => {
                    debug!("stdin closed");
                    return Ok(());
                }
            };

            pending_since = if self.parser.has_pending() {
                pending_since.or_else(|| Some(Instant::now()))
            } else {
                None
            };

            for event in &events {
                if app.on_event(event) == Action::Quit {
                    return Ok(());
                }
            }
            dirty |= !events.is_empty();

            // ── Resize ──────────────────────────────────────────────
            if SIGWINCH_RECEIVED.swap(false, Ordering::Relaxed) {
                let new_size = self.terminal.refresh_size();
                debug!(cols = new_size.cols, rows = new_size.rows, "terminal resized");
                frame.resize(new_size.cols, new_size.rows);
                self.renderer.force_redraw();
                app.on_resize(new_size);
                dirty = true;
            }

            // ── Tick ────────────────────────────────────────────────
            if clock.is_due(Instant::now()) {
                dirty |= app.on_tick();
                clock.reschedule(Instant::now());
            }

            // ── Render ──────────────────────────────────────────────
            if dirty {
                frame.clear();
                app.paint(&mut frame);
                self.renderer.render(&frame);
                self.renderer.flush()?;
                dirty = false;
            }
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── LoopConfig ──────────────────────────────────────────────────────

    #[test]
    fn default_tick_is_ten_ms() {
        let config = LoopConfig::default();
        assert_eq!(config.tick_interval, Duration::from_millis(10));
        assert_eq!(config.title, None);
    }

    #[test]
    fn event_loop_keeps_config() {
        let config = LoopConfig {
            tick_interval: Duration::from_millis(16),
            title: Some("t"),
        };
        let event_loop = EventLoop::new(config);
        assert_eq!(*event_loop.config(), config);
        assert!(event_loop.size().cols > 0);
    }

    // ── TickClock ───────────────────────────────────────────────────────

    #[test]
    fn clock_counts_down() {
        let start = Instant::now();
        let clock = TickClock::new(Duration::from_millis(10), start);
        assert_eq!(
            clock.timeout(start + Duration::from_millis(4)),
            Duration::from_millis(6)
        );
        assert!(!clock.is_due(start + Duration::from_millis(9)));
        assert!(clock.is_due(start + Duration::from_millis(10)));
    }

    #[test]
    fn overdue_clock_times_out_immediately() {
        let start = Instant::now();
        let clock = TickClock::new(Duration::from_millis(10), start);
        assert_eq!(clock.timeout(start + Duration::from_secs(1)), Duration::ZERO);
    }

    #[test]
    fn input_burst_does_not_add_ticks() {
        // Simulate a stream of input wakeups every millisecond for 100 ms;
        // with a 10 ms interval the tick may run at most 10 times.
        let start = Instant::now();
        let mut clock = TickClock::new(Duration::from_millis(10), start);
        let mut ticks = 0;
        for ms in 0..=100 {
            let now = start + Duration::from_millis(ms);
            if clock.is_due(now) {
                ticks += 1;
                clock.reschedule(now);
            }
        }
        assert_eq!(ticks, 10);
    }

    #[test]
    fn reschedule_counts_from_end_of_tick() {
        let start = Instant::now();
        let mut clock = TickClock::new(Duration::from_millis(10), start);
        // A slow tick that finished 3 ms late.
        let end = start + Duration::from_millis(13);
        clock.reschedule(end);
        assert!(!clock.is_due(start + Duration::from_millis(20)));
        assert!(clock.is_due(start + Duration::from_millis(23)));
    }

    // ── SIGWINCH flag ───────────────────────────────────────────────────

    #[test]
    fn sigwinch_flag_swap() {
        SIGWINCH_RECEIVED.store(true, Ordering::Relaxed);
        assert!(SIGWINCH_RECEIVED.swap(false, Ordering::Relaxed));
        assert!(!SIGWINCH_RECEIVED.load(Ordering::Relaxed));
    }

    // ── App defaults ────────────────────────────────────────────────────

    struct MinimalApp;

    impl App for MinimalApp {
        fn paint(&mut self, _buf: &mut FrameBuffer) {}
    }

    #[test]
    fn app_defaults() {
        let mut app = MinimalApp;
        assert_eq!(app.on_event(&Event::FocusGained), Action::Continue);
        assert!(!app.on_tick());
        app.on_resize(Size::new(100, 50));
    }

    #[test]
    fn run_without_tty_fails_cleanly() {
        if terminal::is_tty() {
            return;
        }
        let mut event_loop = EventLoop::new(LoopConfig::default());
        let err = event_loop.run(&mut MinimalApp).unwrap_err();
        assert!(matches!(err, TermError::NotATerminal));
    }
}
