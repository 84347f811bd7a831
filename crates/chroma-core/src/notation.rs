// SPDX-License-Identifier: MIT
//
// Notation: which textual form a color is shown or copied in.
//
// The display notation and the copy notation are two independent values of
// this one type. Both are plain table lookups onto the formatters in
// `color.rs`; switching notation never touches the color itself.

use std::fmt;
use std::str::FromStr;

use crate::color::Color;
use crate::error::ParseModeError;

/// One of the four supported color notations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Notation {
    /// `#rrggbb`
    #[default]
    Hex,
    /// `RRR, GGG, BBB`
    Rgb,
    /// `HHH, SSS, VVV` (hue, saturation, value; also known as HSB)
    Hsv,
    /// `HHH, SSS, LLL` (hue, saturation, lightness)
    Hsl,
}

impl Notation {
    /// Every notation, in menu order.
    pub const ALL: [Self; 4] = [Self::Hex, Self::Rgb, Self::Hsv, Self::Hsl];

    /// Format `color` in this notation.
    ///
    /// ```
    /// use chroma_core::color::Color;
    /// use chroma_core::notation::Notation;
    ///
    /// let c = Color::rgb(255, 0, 128);
    /// assert_eq!(Notation::Hex.format(c), "#ff0080");
    /// assert_eq!(Notation::Rgb.format(c), "255, 000, 128");
    /// ```
    #[must_use]
    pub fn format(self, color: Color) -> String {
        match self {
            Self::Hex => color.to_hex(),
            Self::Rgb => color.to_rgb_string(),
            Self::Hsv => color.to_hsv_string(),
            Self::Hsl => color.to_hsl_string(),
        }
    }

    /// Short label used in menus.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Hex => "HEX",
            Self::Rgb => "RGB",
            Self::Hsv => "HSB/HSV",
            Self::Hsl => "HSL",
        }
    }

    /// Compact encoding for atomic storage.
    #[inline]
    #[must_use]
    pub const fn to_u8(self) -> u8 {
        match self {
            Self::Hex => 0,
            Self::Rgb => 1,
            Self::Hsv => 2,
            Self::Hsl => 3,
        }
    }

    /// Inverse of [`to_u8`](Self::to_u8). Unknown values fall back to `Hex`.
    #[inline]
    #[must_use]
    pub const fn from_u8(v: u8) -> Self {
        match v {
            1 => Self::Rgb,
            2 => Self::Hsv,
            3 => Self::Hsl,
            _ => Self::Hex,
        }
    }
}

impl fmt::Display for Notation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Notation {
    type Err = ParseModeError;

    /// Case-insensitive; `hsb` and `hsb/hsv` are accepted for [`Notation::Hsv`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hex" => Ok(Self::Hex),
            "rgb" => Ok(Self::Rgb),
            "hsv" | "hsb" | "hsb/hsv" => Ok(Self::Hsv),
            "hsl" => Ok(Self::Hsl),
            _ => Err(ParseModeError {
                kind: "notation",
                value: s.to_string(),
                expected: "hex, rgb, hsv, hsl",
            }),
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
