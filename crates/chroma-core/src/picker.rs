// SPDX-License-Identifier: MIT
//
// Picker: the per-tick state machine.
//
// Owned by the loop context. Each tick it does exactly two things, in order:
//
//   1. If a pointer sample is pending, take it and recompute the target
//      from the current axis mode.
//   2. Advance the fade one step toward the target.
//
// Between ticks the shell reads `display_string()` and `background_color()`
// to paint, and calls `primary_click()` when the user clicks.
//
// Target and fade live here unsynchronized. Only the loop ever touches them;
// other contexts talk to the picker through `SharedState`.

use std::sync::Arc;

use tracing::{debug, info};

use crate::color::Color;
use crate::fade::Fade;
use crate::mapper::WindowSize;
use crate::shared::SharedState;

// ─── ClipboardSink ───────────────────────────────────────────────────────────

/// Where copied text goes.
///
/// The core does not care whether the copy succeeded. A sink that can fail
/// reports the failure itself (log, status line) and returns normally.
pub trait ClipboardSink {
    fn copy_to_clipboard(&mut self, text: &str);
}

impl ClipboardSink for Vec<String> {
    fn copy_to_clipboard(&mut self, text: &str) {
        self.push(text.to_string());
    }
}

// ─── TickOutcome ─────────────────────────────────────────────────────────────

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickOutcome {
    /// A pending pointer sample was consumed and the target recomputed.
    /// The new target may equal the old one.
    pub target_changed: bool,
}

// ─── Picker ──────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct Picker {
    shared: Arc<SharedState>,
    target: Color,
    fade: Fade,
}

impl Picker {
    /// A picker whose target and fade both start on black.
    #[must_use]
    pub fn new(shared: Arc<SharedState>) -> Self {
        Self::with_start_color(shared, Color::BLACK)
    }

    /// A picker whose target and fade both start on `color`.
    #[must_use]
    pub fn with_start_color(shared: Arc<SharedState>, color: Color) -> Self {
        Self {
            shared,
            target: color,
            fade: Fade::new(color),
        }
    }

    /// The shared input state this picker consumes.
    #[must_use]
    pub const fn shared(&self) -> &Arc<SharedState> {
        &self.shared
    }

    /// Run one tick against the current window size.
    ///
    /// `window` must have a non-zero width and height.
    pub fn tick(&mut self, window: WindowSize) -> TickOutcome {
        let mut outcome = TickOutcome::default();

        if let Some(pointer) = self.shared.take_pointer_sample() {
            let axis = self.shared.axis_mode();
            let target = axis.color_at(pointer, window);
            if target != self.target {
                debug!(
                    x = pointer.x,
                    y = pointer.y,
                    %axis,
                    target = %target,
                    "target changed"
                );
            }
            self.target = target;
            outcome.target_changed = true;
        }

        self.fade.step(self.target);
        outcome
    }

    /// The color the pointer last selected.
    #[inline]
    #[must_use]
    pub const fn target(&self) -> Color {
        self.target
    }

    /// The target in the current display notation.
    #[must_use]
    pub fn display_string(&self) -> String {
        self.shared.display_notation().format(self.target)
    }

    /// The current fade color, quantized for painting.
    #[must_use]
    pub fn background_color(&self) -> Color {
        self.fade.color()
    }

    /// The unquantized fade state.
    #[must_use]
    pub const fn fade(&self) -> &Fade {
        &self.fade
    }

    /// The target in the current copy notation: what a click would copy.
    #[must_use]
    pub fn copy_text(&self) -> String {
        self.shared.copy_notation().format(self.target)
    }

    /// Copy the target, in the copy notation, to `sink`.
    ///
    /// Returns the copied text. Picker state is unchanged.
    pub fn primary_click(&self, sink: &mut impl ClipboardSink) -> String {
        let text = self.copy_text();
        info!(text = %text, notation = %self.shared.copy_notation(), "copying color");
        sink.copy_to_clipboard(&text);
        text
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
