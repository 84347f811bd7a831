// SPDX-License-Identifier: MIT
//
// chroma-core: color model and pointer-to-color fade engine for chroma.
//
// Everything here is platform-neutral. The shell feeds pointer samples and
// mode selections into a `SharedState`, calls `Picker::tick` on a fixed
// cadence with the current window size, and paints `display_string()` over
// `background_color()`. No terminal, clipboard, or windowing code lives in
// this crate.

pub mod color;
pub mod error;
pub mod fade;
pub mod mapper;
pub mod notation;
pub mod picker;
pub mod shared;

pub use color::{position_to_color, Color};
pub use error::ParseModeError;
pub use fade::Fade;
pub use mapper::{AxisMode, Pointer, WindowSize};
pub use notation::Notation;
pub use picker::{ClipboardSink, Picker, TickOutcome};
pub use shared::SharedState;
