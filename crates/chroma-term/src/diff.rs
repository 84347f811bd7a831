// SPDX-License-Identifier: MIT
//
// Differential renderer.
//
// Compares the current FrameBuffer against the previous one and emits
// escapes only for cells that changed. Unchanged rows are skipped with one
// slice comparison. Each frame is wrapped in synchronized output (DEC 2026)
// and written with a single syscall.
//
// While the background is still fading every cell changes each tick; once
// the fade settles to the target's 8-bit value the frame stops changing and
// rendering costs next to nothing.

use std::io::{self, Write};

use crate::ansi;
use crate::buffer::FrameBuffer;
use crate::output::{CellWriter, OutputBuffer};

/// What one render pass did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderStats {
    /// Cells that differed from the previous frame.
    pub cells_rendered: usize,
    /// Cells that matched and were skipped.
    pub cells_skipped: usize,
    /// Bytes of output produced.
    pub bytes_written: usize,
}

/// Renders frames as diffs against the previous one.
///
/// ```
/// use chroma_term::buffer::FrameBuffer;
/// use chroma_term::diff::DiffRenderer;
///
/// let mut renderer = DiffRenderer::new();
/// let frame = FrameBuffer::new(80, 24);
///
/// let first = renderer.render(&frame);
/// assert_eq!(first.cells_rendered, 80 * 24);
///
/// let second = renderer.render(&frame);
/// assert_eq!(second.cells_rendered, 0);
/// ```
pub struct DiffRenderer {
    output: OutputBuffer,
    writer: CellWriter,
    previous: Option<FrameBuffer>,
}

impl DiffRenderer {
    /// A renderer with no previous frame; the first render draws everything.
    #[must_use]
    pub fn new() -> Self {
        Self {
            output: OutputBuffer::new(),
            writer: CellWriter::new(),
            previous: None,
        }
    }

    /// Diff `current` against the previous frame into the output buffer.
    ///
    /// Nothing reaches the terminal until [`flush`](Self::flush).
    pub fn render(&mut self, current: &FrameBuffer) -> RenderStats {
        self.output.clear();
        self.writer.reset_state();

        let width = current.width();
        let height = current.height();
        let mut stats = RenderStats::default();

        if width == 0 || height == 0 {
            self.store_frame(current);
            return stats;
        }

        let previous = self
            .previous
            .as_ref()
            .filter(|p| p.width() == width && p.height() == height);

        // A frame with nothing changed emits nothing at all.
        if previous.is_some_and(|p| p == current) {
            stats.cells_skipped = usize::from(width) * usize::from(height);
            return stats;
        }

        ansi::begin_sync(&mut self.output).ok();
        if previous.is_none() {
            ansi::clear_screen(&mut self.output).ok();
        }

        for y in 0..height {
            let Some(row) = current.row(y) else { break };
            let prev_row = previous.and_then(|p| p.row(y));

            if prev_row == Some(row) {
                stats.cells_skipped += row.len();
                continue;
            }

            for (x, cell) in (0..width).zip(row) {
                if prev_row.is_some_and(|p| p[usize::from(x)] == *cell) {
                    stats.cells_skipped += 1;
                } else {
                    self.writer.render_cell(&mut self.output, x, y, cell);
                    stats.cells_rendered += 1;
                }
            }
        }

        // Leave the terminal's own state clean between frames.
        ansi::reset(&mut self.output).ok();
        ansi::end_sync(&mut self.output).ok();

        stats.bytes_written = self.output.len();
        self.store_frame(current);
        stats
    }

    /// The bytes produced by the last render.
    #[must_use]
    pub fn output_bytes(&self) -> &[u8] {
        self.output.as_bytes()
    }

    /// Write the last render to stdout.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to stdout fails.
    pub fn flush(&mut self) -> io::Result<()> {
        self.output.flush_stdout()
    }

    /// Write the last render to `w`.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `w` fails.
    pub fn flush_to(&mut self, w: &mut impl Write) -> io::Result<()> {
        self.output.flush_to(w)
    }

    /// Drop the previous frame so the next render redraws everything.
    pub fn force_redraw(&mut self) {
        self.previous = None;
    }

    fn store_frame(&mut self, current: &FrameBuffer) {
        match &mut self.previous {
            Some(prev) => prev.copy_from(current),
            None => self.previous = Some(current.clone()),
        }
    }
}

impl Default for DiffRenderer {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
