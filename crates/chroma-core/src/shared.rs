// SPDX-License-Identifier: MIT
//
// Shared input state: the only data crossing from the event-dispatch
// context into the tick loop.
//
// Two kinds of field live here:
//
//   Pointer sample   (x, y, pending) as one `Mutex<Option<Pointer>>`.
//                    `Some` means "moved since the last tick". A write
//                    replaces the whole value and the loop's read-and-clear
//                    is a `take()` under the same lock, so the loop can
//                    never observe a half-written sample.
//
//   Mode selections  axis / display / copy, each an independent `AtomicU8`.
//                    No cross-field consistency is needed between them.
//
// Everything the loop alone advances (target color, fade state) lives in
// `Picker`, outside this struct, with no synchronization at all.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::mapper::{AxisMode, Pointer};
use crate::notation::Notation;

/// Input state written from any thread and consumed by the tick loop.
///
/// Share it as `Arc<SharedState>`:
///
/// ```
/// use std::sync::Arc;
/// use std::thread;
///
/// use chroma_core::mapper::Pointer;
/// use chroma_core::shared::SharedState;
///
/// let shared = Arc::new(SharedState::default());
/// let writer = Arc::clone(&shared);
/// thread::spawn(move || writer.report_pointer_moved(3, 4))
///     .join()
///     .unwrap();
///
/// assert_eq!(shared.take_pointer_sample(), Some(Pointer::new(3, 4)));
/// assert_eq!(shared.take_pointer_sample(), None);
/// ```
#[derive(Debug)]
pub struct SharedState {
    pointer: Mutex<Option<Pointer>>,
    axis: AtomicU8,
    display: AtomicU8,
    copy: AtomicU8,
}

impl SharedState {
    /// Create the shared state with the given initial selections and no
    /// pending pointer sample.
    #[must_use]
    pub const fn new(axis: AxisMode, display: Notation, copy: Notation) -> Self {
        Self {
            pointer: Mutex::new(None),
            axis: AtomicU8::new(axis.to_u8()),
            display: AtomicU8::new(display.to_u8()),
            copy: AtomicU8::new(copy.to_u8()),
        }
    }

    // ─── Pointer Sample ──────────────────────────────────────────────────

    /// Record a pointer movement, overwriting any sample not yet consumed.
    pub fn report_pointer_moved(&self, x: u32, y: u32) {
        *self.lock_pointer() = Some(Pointer::new(x, y));
    }

    /// Take the pending pointer sample, clearing the pending flag.
    ///
    /// Returns `None` if the pointer has not moved since the last call.
    #[must_use]
    pub fn take_pointer_sample(&self) -> Option<Pointer> {
        self.lock_pointer().take()
    }

    /// Whether a pointer sample is waiting to be consumed.
    #[must_use]
    pub fn has_pending_sample(&self) -> bool {
        self.lock_pointer().is_some()
    }

    /// A panicking writer cannot leave a torn `Option<Pointer>` behind, so
    /// a poisoned lock is still safe to use.
    fn lock_pointer(&self) -> MutexGuard<'_, Option<Pointer>> {
        self.pointer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ─── Mode Selections ─────────────────────────────────────────────────

    /// The current axis mode.
    #[must_use]
    pub fn axis_mode(&self) -> AxisMode {
        AxisMode::from_u8(self.axis.load(Ordering::Relaxed))
    }

    /// Select which pointer coordinate(s) drive the color.
    pub fn set_axis_mode(&self, mode: AxisMode) {
        let old = AxisMode::from_u8(self.axis.swap(mode.to_u8(), Ordering::Relaxed));
        if old != mode {
            debug!(from = %old, to = %mode, "axis mode changed");
        }
    }

    /// The notation used for the on-screen string.
    #[must_use]
    pub fn display_notation(&self) -> Notation {
        Notation::from_u8(self.display.load(Ordering::Relaxed))
    }

    /// Select the notation used for the on-screen string.
    pub fn set_display_notation(&self, notation: Notation) {
        let old = Notation::from_u8(self.display.swap(notation.to_u8(), Ordering::Relaxed));
        if old != notation {
            debug!(from = %old, to = %notation, "display notation changed");
        }
    }

    /// The notation used for clipboard copies.
    #[must_use]
    pub fn copy_notation(&self) -> Notation {
        Notation::from_u8(self.copy.load(Ordering::Relaxed))
    }

    /// Select the notation used for clipboard copies.
    pub fn set_copy_notation(&self, notation: Notation) {
        let old = Notation::from_u8(self.copy.swap(notation.to_u8(), Ordering::Relaxed));
        if old != notation {
            debug!(from = %old, to = %notation, "copy notation changed");
        }
    }
}

impl Default for SharedState {
    /// Axis `X`, display and copy both `HEX`.
    fn default() -> Self {
        Self::new(AxisMode::X, Notation::Hex, Notation::Hex)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    // ── Pointer sample ──────────────────────────────────────────────────

    #[test]
    fn no_sample_initially() {
        let s = SharedState::default();
        assert!(!s.has_pending_sample());
        assert_eq!(s.take_pointer_sample(), None);
    }

    #[test]
    fn take_clears_pending() {
        let s = SharedState::default();
        s.report_pointer_moved(10, 20);
        assert!(s.has_pending_sample());
        assert_eq!(s.take_pointer_sample(), Some(Pointer::new(10, 20)));
        assert!(!s.has_pending_sample());
        assert_eq!(s.take_pointer_sample(), None);
    }

    #[test]
    fn later_sample_overwrites_earlier() {
        let s = SharedState::default();
        s.report_pointer_moved(1, 1);
        s.report_pointer_moved(2, 3);
        assert_eq!(s.take_pointer_sample(), Some(Pointer::new(2, 3)));
    }

    #[test]
    fn samples_are_never_torn_across_threads() {
        // Writers only ever report points with x == y; any sample the reader
        // sees must keep that pairing.
        let s = Arc::new(SharedState::default());
        let writers: Vec<_> = (0..4)
            .map(|t| {
                let s = Arc::clone(&s);
                thread::spawn(move || {
                    for i in 0..2_000u32 {
                        let v = t * 10_000 + i;
                        s.report_pointer_moved(v, v);
                    }
                })
            })
            .collect();

        let mut seen = 0;
        while seen < 200 {
            if let Some(p) = s.take_pointer_sample() {
                assert_eq!(p.x, p.y);
                seen += 1;
            }
            if writers.iter().all(thread::JoinHandle::is_finished) {
                break;
            }
        }
        for w in writers {
            w.join().unwrap();
        }
    }

    #[test]
    fn survives_poisoned_lock() {
        let s = Arc::new(SharedState::default());
        let poisoner = Arc::clone(&s);
        let _ = thread::spawn(move || {
            let _guard = poisoner.pointer.lock().unwrap();
            panic!("poison the pointer lock");
        })
        .join();

        s.report_pointer_moved(5, 6);
        assert_eq!(s.take_pointer_sample(), Some(Pointer::new(5, 6)));
    }

    // ── Modes ───────────────────────────────────────────────────────────

    #[test]
    fn default_modes() {
        let s = SharedState::default();
        assert_eq!(s.axis_mode(), AxisMode::X);
        assert_eq!(s.display_notation(), Notation::Hex);
        assert_eq!(s.copy_notation(), Notation::Hex);
    }

    #[test]
    fn modes_are_independent() {
        let s = SharedState::default();
        s.set_axis_mode(AxisMode::Both);
        s.set_display_notation(Notation::Hsl);
        assert_eq!(s.axis_mode(), AxisMode::Both);
        assert_eq!(s.display_notation(), Notation::Hsl);
        assert_eq!(s.copy_notation(), Notation::Hex);

        s.set_copy_notation(Notation::Rgb);
        assert_eq!(s.display_notation(), Notation::Hsl);
        assert_eq!(s.copy_notation(), Notation::Rgb);
    }

    #[test]
    fn mode_change_does_not_touch_pointer() {
        let s = SharedState::default();
        s.report_pointer_moved(7, 8);
        s.set_axis_mode(AxisMode::Y);
        assert_eq!(s.take_pointer_sample(), Some(Pointer::new(7, 8)));
    }

    #[test]
    fn shared_state_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SharedState>();
    }
}
