// SPDX-License-Identifier: MIT
//
// PickerApp: the picker driven by the terminal event loop.
//
// Input flows one way into the core. Pointer motion goes into the shared
// state as a pending sample; menu clicks and key bindings switch modes on
// the same shared state. Everything else happens on the tick: the picker
// consumes the sample, moves its target, and advances the fade.
//
// Screen layout:
//
//   ┌──────────────────────────────────────────┐
//   │ Axes: X Y Both │ Display: ... │ Copy: .. │  ← menu bar
//   │                                          │
//   │                 #ff0080                  │  ← centered, white
//   │                                          │
//   │ copied #ff0080                           │  ← status, 1.5 s
//   └──────────────────────────────────────────┘
//
// Every cell's background is the fade color.

use std::time::{Duration, Instant};

use chroma_core::{AxisMode, ClipboardSink, Color, Notation, Picker, WindowSize};
use chroma_term::buffer::{FrameBuffer, Style};
use chroma_term::cell::CellColor;
use chroma_term::event_loop::{Action, App};
use chroma_term::input::{Event, KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use chroma_term::terminal::Size;
use tracing::debug;

use crate::clipboard::CopyStatus;
use crate::menu::{MenuBar, MenuItem};

/// How long a status message stays on screen.
pub const STATUS_DURATION: Duration = Duration::from_millis(1500);

// ─── Commands ────────────────────────────────────────────────────────────────

/// What a key press asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Select(MenuItem),
    CopyColor,
    Quit,
}

/// Key bindings.
///
/// | Keys                       | Command               |
/// |----------------------------|-----------------------|
/// | `x` `y` `b`                | axis mode             |
/// | `1` `2` `3` `4`            | display notation      |
/// | `!` `@` `#` `$`, `F1`–`F4` | copy notation         |
/// | `Enter`, `c`               | copy the color        |
/// | `q`, `Esc`, `Ctrl-C`       | quit                  |
#[must_use]
pub fn key_command(key: &KeyEvent) -> Option<Command> {
    if key.is_ctrl('c') {
        return Some(Command::Quit);
    }

    let notation = |i: usize| Notation::ALL[i];
    let command = match key.code {
        KeyCode::Char('x') => Command::Select(MenuItem::Axis(AxisMode::X)),
        KeyCode::Char('y') => Command::Select(MenuItem::Axis(AxisMode::Y)),
        KeyCode::Char('b') => Command::Select(MenuItem::Axis(AxisMode::Both)),

        KeyCode::Char('1') => Command::Select(MenuItem::Display(notation(0))),
        KeyCode::Char('2') => Command::Select(MenuItem::Display(notation(1))),
        KeyCode::Char('3') => Command::Select(MenuItem::Display(notation(2))),
        KeyCode::Char('4') => Command::Select(MenuItem::Display(notation(3))),

        KeyCode::Char('!') => Command::Select(MenuItem::Copy(notation(0))),
        KeyCode::Char('@') => Command::Select(MenuItem::Copy(notation(1))),
        KeyCode::Char('#') => Command::Select(MenuItem::Copy(notation(2))),
        KeyCode::Char('$') => Command::Select(MenuItem::Copy(notation(3))),
        KeyCode::F(n @ 1..=4) => Command::Select(MenuItem::Copy(notation(usize::from(n - 1)))),

        KeyCode::Enter | KeyCode::Char('c') => Command::CopyColor,
        KeyCode::Escape | KeyCode::Char('q') => Command::Quit,
        _ => return None,
    };
    Some(command)
}

// ─── Status Line ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
struct Status {
    text: String,
    shown_at: Instant,
}

impl Status {
    fn is_visible(&self, now: Instant) -> bool {
        now.duration_since(self.shown_at) < STATUS_DURATION
    }
}

// ─── PickerApp ───────────────────────────────────────────────────────────────

pub struct PickerApp<C> {
    picker: Picker,
    menu: MenuBar,
    clipboard: C,
    size: Size,
    status: Option<Status>,
}

impl<C: ClipboardSink + CopyStatus> PickerApp<C> {
    #[must_use]
    pub fn new(picker: Picker, clipboard: C) -> Self {
        Self {
            picker,
            menu: MenuBar::new(),
            clipboard,
            size: Size::FALLBACK,
            status: None,
        }
    }

    #[must_use]
    pub const fn picker(&self) -> &Picker {
        &self.picker
    }

    #[cfg(test)]
    pub const fn clipboard(&self) -> &C {
        &self.clipboard
    }

    /// The status message visible at `now`, if any.
    #[must_use]
    pub fn status_text(&self, now: Instant) -> Option<&str> {
        self.status
            .as_ref()
            .filter(|s| s.is_visible(now))
            .map(|s| s.text.as_str())
    }

    fn window_size(&self) -> WindowSize {
        WindowSize::new(
            u32::from(self.size.cols.max(1)),
            u32::from(self.size.rows.max(1)),
        )
    }

    fn set_status(&mut self, text: String) {
        self.status = Some(Status {
            text,
            shown_at: Instant::now(),
        });
    }

    fn copy_color(&mut self) {
        let text = self.picker.primary_click(&mut self.clipboard);
        let message = match self.clipboard.take_error() {
            None => format!("copied {text}"),
            Some(err) => err.to_string(),
        };
        self.set_status(message);
    }

    fn run(&mut self, command: Command) -> Action {
        match command {
            Command::Select(item) => item.select(self.picker.shared()),
            Command::CopyColor => self.copy_color(),
            Command::Quit => return Action::Quit,
        }
        Action::Continue
    }

    fn on_mouse(&mut self, mouse: &MouseEvent) {
        if mouse.is_motion() {
            self.picker
                .shared()
                .report_pointer_moved(u32::from(mouse.x), u32::from(mouse.y));
            return;
        }

        if mouse.kind == MouseEventKind::Press(MouseButton::Left) {
            match self.menu.hit(mouse.x, mouse.y) {
                Some(item) => item.select(self.picker.shared()),
                None => self.copy_color(),
            }
        }
    }
}

impl<C: ClipboardSink + CopyStatus> App for PickerApp<C> {
    fn on_event(&mut self, event: &Event) -> Action {
        match event {
            Event::Key(key) => key_command(key).map_or(Action::Continue, |c| self.run(c)),
            Event::Mouse(mouse) => {
                self.on_mouse(mouse);
                Action::Continue
            }
            Event::FocusGained | Event::FocusLost => Action::Continue,
        }
    }

    fn on_resize(&mut self, size: Size) {
        debug!(cols = size.cols, rows = size.rows, "window size");
        self.size = size;
    }

    fn on_tick(&mut self) -> bool {
        let before = self.picker.background_color();
        let outcome = self.picker.tick(self.window_size());

        let status_expired = self
            .status
            .as_ref()
            .is_some_and(|s| !s.is_visible(Instant::now()));
        if status_expired {
            self.status = None;
        }

        outcome.target_changed || status_expired || self.picker.background_color() != before
    }

    fn paint(&mut self, buf: &mut FrameBuffer) {
        let bg = cell_color(self.picker.background_color());
        let text_style = Style::new(CellColor::WHITE, bg);

        buf.fill(bg);
        buf.paint_centered(buf.height() / 2, &self.picker.display_string(), text_style);
        self.menu.paint(buf, self.picker.shared());

        if buf.height() > 2 {
            if let Some(text) = self.status_text(Instant::now()) {
                buf.paint_text(1, buf.height() - 1, text, text_style);
            }
        }
    }
}

const fn cell_color(color: Color) -> CellColor {
    CellColor::Rgb(color.r, color.g, color.b)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
