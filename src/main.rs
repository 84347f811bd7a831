// SPDX-License-Identifier: MIT
//
// chroma: a terminal color picker.
//
// Move the mouse over the terminal and the screen fades toward the color
// under the pointer. Click to copy that color in the chosen notation.
//
// This is the binary that wires the crates together:
//
//   chroma-core → color model, pointer-to-color mapping, fade, Picker
//   chroma-term → raw terminal, mouse input, frame diffing, tick loop
//
// PickerApp implements chroma-term's App trait around a Picker:
//
//   stdin → parser → on_event → SharedState (pointer sample, modes)
//   tick  → Picker::tick → paint → framebuffer → diff renderer → terminal

mod app;
mod cli;
mod clipboard;
mod logging;
mod menu;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use chroma_core::{Picker, SharedState};
use chroma_term::event_loop::{EventLoop, LoopConfig};

use crate::app::PickerApp;
use crate::cli::Cli;
use crate::clipboard::SystemClipboard;

const WINDOW_TITLE: &str = "Color chooser";

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_path = cli.log_path();
    let _guard = logging::init(&log_path, cli.log_level)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        axis = %cli.axis,
        display = %cli.display,
        copy = %cli.copy,
        tick_ms = cli.tick_ms,
        log = %log_path.display(),
        "chroma starting"
    );

    let shared = Arc::new(SharedState::new(cli.axis, cli.display, cli.copy));
    let picker = Picker::with_start_color(shared, cli.start_color());
    let mut app = PickerApp::new(picker, SystemClipboard::new());

    let config = LoopConfig {
        tick_interval: cli.tick_interval(),
        title: Some(WINDOW_TITLE),
    };
    EventLoop::new(config)
        .run(&mut app)
        .context("terminal session failed")?;

    info!(last = %app.picker().target(), "chroma stopped");
    Ok(())
}
