// SPDX-License-Identifier: MIT
//
// chroma color model: 24-bit sRGB and its four textual notations.
//
// Single-character variable names (r, g, b, h, s, v, l) are the standard
// mathematical convention in color science.
#![allow(clippy::many_single_char_names)]
//
// A Color is three 8-bit channels, always opaque. Everything the picker
// shows or copies is derived from one of these, so every formatter here is
// a pure function of the channels:
//
//   Color ─┬─ to_hex()         "#rrggbb"
//          ├─ to_rgb_string()  "RRR, GGG, BBB"
//          ├─ to_hsv_string()  "HHH, SSS, VVV"
//          └─ to_hsl_string()  "HHH, SSS, LLL"
//
// Branch selection (which channel is the maximum, whether the color is
// achromatic) is done on the integer channels, so the float math never has
// to compare floats for equality.

use std::fmt;

/// Mask selecting the low 24 bits of a packed `0xRRGGBB` value.
pub const COLOR_MASK: u32 = 0x00FF_FFFF;

// ─── Color ───────────────────────────────────────────────────────────────────

/// An opaque 24-bit sRGB color.
///
/// # Examples
///
/// ```
/// use chroma_core::color::Color;
///
/// let pink = Color::rgb(255, 0, 128);
/// assert_eq!(pink.to_hex(), "#ff0080");
/// assert_eq!(pink.to_rgb_string(), "255, 000, 128");
/// assert_eq!(Color::from_hex("#ff0080"), Some(pink));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    /// Red channel, 0–255.
    pub r: u8,
    /// Green channel, 0–255.
    pub g: u8,
    /// Blue channel, 0–255.
    pub b: u8,
}

impl Color {
    /// Pure black, the color the picker starts on.
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    /// Pure white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    // ─── Constructors ────────────────────────────────────────────────────

    /// Create a color from 8-bit channels.
    #[inline]
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Unpack a `0xRRGGBB` integer. Bits above the low 24 are ignored.
    #[inline]
    #[must_use]
    pub const fn from_packed(packed: u32) -> Self {
        let [_, r, g, b] = (packed & COLOR_MASK).to_be_bytes();
        Self { r, g, b }
    }

    /// Parse `#rrggbb` or `#rgb` (the `#` is optional, digits are
    /// case-insensitive).
    ///
    /// Returns `None` for anything else.
    #[must_use]
    pub fn from_hex(s: &str) -> Option<Self> {
        let s = s.strip_prefix('#').unwrap_or(s);
        let bytes = s.as_bytes();

        match bytes.len() {
            3 => {
                let r = parse_hex_digit(bytes[0])?;
                let g = parse_hex_digit(bytes[1])?;
                let b = parse_hex_digit(bytes[2])?;
                Some(Self::rgb(r << 4 | r, g << 4 | g, b << 4 | b))
            }
            6 => Some(Self::rgb(
                parse_hex_byte(&bytes[0..2])?,
                parse_hex_byte(&bytes[2..4])?,
                parse_hex_byte(&bytes[4..6])?,
            )),
            _ => None,
        }
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    /// The color packed as `0xRRGGBB`.
    #[inline]
    #[must_use]
    pub const fn packed(self) -> u32 {
        u32::from_be_bytes([0, self.r, self.g, self.b])
    }

    /// Channels scaled to `0.0..=1.0`.
    #[inline]
    #[must_use]
    pub fn to_unit(self) -> (f64, f64, f64) {
        (
            f64::from(self.r) / 255.0,
            f64::from(self.g) / 255.0,
            f64::from(self.b) / 255.0,
        )
    }

    /// Whether all three channels are equal (a gray, including black and white).
    #[inline]
    #[must_use]
    pub const fn is_gray(self) -> bool {
        self.r == self.g && self.g == self.b
    }

    // ─── HSV / HSL ───────────────────────────────────────────────────────

    /// Convert to HSV: `(hue°, saturation%, value%)`, each rounded to the
    /// nearest integer. Hue is in `0..360`.
    ///
    /// Grays report hue 0 and saturation 0.
    #[must_use]
    pub fn to_hsv(self) -> (u16, u8, u8) {
        let (max8, min8) = self.max_min();
        let (r, g, b) = self.to_unit();
        let max = f64::from(max8) / 255.0;
        let min = f64::from(min8) / 255.0;
        let delta = max - min;

        let h = self.hue(r, g, b, delta);
        let s = if max8 == 0 { 0.0 } else { delta / max };

        (round_degrees(h), round_percent(s), round_percent(max))
    }

    /// Convert to HSL: `(hue°, saturation%, lightness%)`, each rounded to
    /// the nearest integer. Hue is in `0..=360`: unlike HSV, a hue just
    /// under 360 rounds up to 360 rather than folding onto 0.
    ///
    /// This is the textbook HSL derivation: lightness is the mean of the
    /// extreme channels, and saturation divides the chroma by
    /// `max + min` or `2 - max - min` depending on which half of the
    /// lightness range the color sits in.
    #[must_use]
    pub fn to_hsl(self) -> (u16, u8, u8) {
        let (max8, min8) = self.max_min();
        let (r, g, b) = self.to_unit();
        let max = f64::from(max8) / 255.0;
        let min = f64::from(min8) / 255.0;
        let delta = max - min;

        let h = self.hue(r, g, b, delta);
        let l = (max + min) / 2.0;
        let s = if max8 == min8 {
            0.0
        } else if l <= 0.5 {
            delta / (max + min)
        } else {
            delta / (2.0 - max - min)
        };

        (round_hue(h), round_percent(s), round_percent(l))
    }

    // ─── Notations ───────────────────────────────────────────────────────

    /// `#rrggbb`, lowercase, zero-padded.
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{:06x}", self.packed() & COLOR_MASK)
    }

    /// `RRR, GGG, BBB` with each channel as a zero-padded 3-digit decimal.
    #[must_use]
    pub fn to_rgb_string(self) -> String {
        format!("{:03}, {:03}, {:03}", self.r, self.g, self.b)
    }

    /// `HHH, SSS, VVV`, see [`to_hsv`](Self::to_hsv).
    #[must_use]
    pub fn to_hsv_string(self) -> String {
        let (h, s, v) = self.to_hsv();
        format!("{h:03}, {s:03}, {v:03}")
    }

    /// `HHH, SSS, LLL`, see [`to_hsl`](Self::to_hsl).
    #[must_use]
    pub fn to_hsl_string(self) -> String {
        let (h, s, l) = self.to_hsl();
        format!("{h:03}, {s:03}, {l:03}")
    }

    // ─── Internals ───────────────────────────────────────────────────────

    const fn max_min(self) -> (u8, u8) {
        let max = if self.r > self.g { self.r } else { self.g };
        let max = if self.b > max { self.b } else { max };
        let min = if self.r < self.g { self.r } else { self.g };
        let min = if self.b < min { self.b } else { min };
        (max, min)
    }

    /// Hue in degrees, shared by HSV and HSL. Ties between channels resolve
    /// red first, then green, then blue.
    fn hue(self, r: f64, g: f64, b: f64, delta: f64) -> f64 {
        let (max8, min8) = self.max_min();
        if max8 == min8 {
            0.0
        } else if max8 == self.r {
            ((60.0 * (g - b) / delta) + 360.0) % 360.0
        } else if max8 == self.g {
            60.0 * (b - r) / delta + 120.0
        } else {
            60.0 * (r - g) / delta + 240.0
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl From<(u8, u8, u8)> for Color {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::rgb(r, g, b)
    }
}

// ─── Position Mapping ────────────────────────────────────────────────────────

/// Map a scalar fraction onto the 24-bit color range.
///
/// The fraction is treated as a normalized index into `0x000000..=0xFFFFFF`:
/// `round(fraction × 0xFFFFFF)`, masked to its low 24 bits, unpacked with red
/// as the most significant byte. Fractions outside `0.0..=1.0` are not
/// clamped; values above 1.0 wrap through the mask and negative values (or
/// NaN) land on black.
///
/// ```
/// use chroma_core::color::{position_to_color, Color};
///
/// assert_eq!(position_to_color(0.0), Color::BLACK);
/// assert_eq!(position_to_color(1.0), Color::WHITE);
/// assert_eq!(position_to_color(0.5), Color::rgb(0x80, 0x00, 0x00));
/// ```
#[must_use]
pub fn position_to_color(fraction: f64) -> Color {
    let scaled = (fraction * f64::from(COLOR_MASK)).round();
    // `as` saturates: NaN and negatives become 0, huge values u64::MAX.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let index = scaled as u64;
    #[allow(clippy::cast_possible_truncation)] // Masked to 24 bits first.
    let packed = (index & u64::from(COLOR_MASK)) as u32;
    Color::from_packed(packed)
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

#[inline]
const fn parse_hex_digit(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

#[inline]
fn parse_hex_byte(bytes: &[u8]) -> Option<u8> {
    let hi = parse_hex_digit(bytes[0])?;
    let lo = parse_hex_digit(bytes[1])?;
    Some(hi << 4 | lo)
}

/// Round a hue to whole degrees. Hue is computed in `0.0..360.0`, so the
/// result is in `0..=360`.
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn round_hue(h: f64) -> u16 {
    h.round().clamp(0.0, 360.0) as u16
}

/// Like [`round_hue`], folding 360 back onto 0.
#[inline]
fn round_degrees(h: f64) -> u16 {
    round_hue(h) % 360
}

/// Scale a `0.0..=1.0` ratio to a whole percentage.
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn round_percent(v: f64) -> u8 {
    (v * 100.0).round().clamp(0.0, 100.0) as u8
}

// ─── Tests ───────────────────────────────────────────────────────────────────
