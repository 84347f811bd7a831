// SPDX-License-Identifier: MIT
//
// chroma-term: the terminal backend behind chroma.
//
// Raw termios, the alternate screen, and all-motion SGR mouse tracking on
// the way in; a cell grid diffed against the previous frame on the way
// out. The event loop ties the two together around a fixed-cadence tick,
// which is what drives the picker's fade.
//
// No TUI framework underneath. Every byte written to the terminal comes
// from `ansi.rs`.

pub mod ansi;
pub mod buffer;
pub mod cell;
pub mod diff;
pub mod error;
pub mod event_loop;
pub mod input;
pub mod output;
pub mod reader;
pub mod terminal;

pub use error::{Result, TermError};
