// SPDX-License-Identifier: MIT
//
// Pointer-to-fraction mapping.
//
// The pointer position inside the window becomes a single scalar, which
// `color::position_to_color` then spreads over the 24-bit color range. The
// axis mode picks which coordinate(s) feed the scalar:
//
//   X     x / width
//   Y     y / height
//   Both  x / (width × height) + y / height
//
// `Both` is the legacy "simplified" formula. It reads the window as a
// row-major scan where y selects the row and x the offset inside it, but the
// row term is not scaled down by the row count, so the result reaches 1.0 on
// the last row and exceeds it from there on. It is kept exactly as is; the
// color mapping masks anything past the 24-bit range.

use std::fmt;
use std::str::FromStr;

use crate::color::{position_to_color, Color};
use crate::error::ParseModeError;

// ─── Geometry ────────────────────────────────────────────────────────────────

/// Pointer coordinates relative to the window origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pointer {
    pub x: u32,
    pub y: u32,
}

impl Pointer {
    #[inline]
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// Window dimensions. The shell guarantees both are non-zero once shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSize {
    pub width: u32,
    pub height: u32,
}

impl WindowSize {
    #[inline]
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

// ─── AxisMode ────────────────────────────────────────────────────────────────

/// Which pointer coordinate(s) select the color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AxisMode {
    /// Horizontal position only.
    #[default]
    X,
    /// Vertical position only.
    Y,
    /// Both coordinates, via the legacy combined formula.
    Both,
}

impl AxisMode {
    /// Every axis mode, in menu order.
    pub const ALL: [Self; 3] = [Self::X, Self::Y, Self::Both];

    /// The scalar fraction for `pointer` inside `window`.
    ///
    /// Not clamped: in [`Both`](Self::Both) mode the value grows past 1.0
    /// on the lower rows of the window.
    ///
    /// ```
    /// use chroma_core::mapper::{AxisMode, Pointer, WindowSize};
    ///
    /// let window = WindowSize::new(200, 100);
    /// assert_eq!(AxisMode::X.fraction(Pointer::new(100, 0), window), 0.5);
    /// assert_eq!(AxisMode::Y.fraction(Pointer::new(0, 25), window), 0.25);
    /// ```
    #[must_use]
    pub fn fraction(self, pointer: Pointer, window: WindowSize) -> f64 {
        let x = f64::from(pointer.x);
        let y = f64::from(pointer.y);
        let width = f64::from(window.width);
        let height = f64::from(window.height);

        match self {
            Self::X => x / width,
            Self::Y => y / height,
            Self::Both => x / (width * height) + y / height,
        }
    }

    /// The target color for `pointer` inside `window`.
    #[must_use]
    pub fn color_at(self, pointer: Pointer, window: WindowSize) -> Color {
        position_to_color(self.fraction(pointer, window))
    }

    /// Short label used in menus.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::X => "X",
            Self::Y => "Y",
            Self::Both => "Both",
        }
    }

    /// Compact encoding for atomic storage.
    #[inline]
    #[must_use]
    pub const fn to_u8(self) -> u8 {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Both => 2,
        }
    }

    /// Inverse of [`to_u8`](Self::to_u8). Unknown values fall back to `X`.
    #[inline]
    #[must_use]
    pub const fn from_u8(v: u8) -> Self {
        match v {
            1 => Self::Y,
            2 => Self::Both,
            _ => Self::X,
        }
    }
}

impl fmt::Display for AxisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AxisMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "x" => Ok(Self::X),
            "y" => Ok(Self::Y),
            "both" | "xy" => Ok(Self::Both),
            _ => Err(ParseModeError {
                kind: "axis mode",
                value: s.to_string(),
                expected: "x, y, both",
            }),
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
