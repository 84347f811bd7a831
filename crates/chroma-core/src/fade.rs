// SPDX-License-Identifier: MIT
//
// Fade: exponential smoothing of the background toward the target color.
//
// Every tick each channel moves 1/50 of the remaining distance:
//
//   c' = (c × 49 + target) / 50
//
// The state is kept as unit floats rather than 8-bit channels. Quantizing
// after every step would stall the fade a few units short of the target
// (once the per-tick step drops under half a channel level, rounding throws
// it away). With floats the displayed color keeps converging for the
// lifetime of the process and only the renderer rounds.

use crate::color::Color;

/// Weight of the current color in one smoothing step.
pub const FADE_WEIGHT: f64 = 49.0;

/// Divisor of one smoothing step (`FADE_WEIGHT + 1`).
pub const FADE_DIVISOR: f64 = 50.0;

/// The continuously smoothed background color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fade {
    r: f64,
    g: f64,
    b: f64,
}

impl Fade {
    /// Start the fade on `color`.
    #[must_use]
    pub fn new(color: Color) -> Self {
        let (r, g, b) = color.to_unit();
        Self { r, g, b }
    }

    /// Advance one tick toward `target`.
    pub fn step(&mut self, target: Color) {
        let (tr, tg, tb) = target.to_unit();
        self.r = smooth(self.r, tr);
        self.g = smooth(self.g, tg);
        self.b = smooth(self.b, tb);
    }

    /// The unquantized channels, each in `0.0..=1.0`.
    #[inline]
    #[must_use]
    pub const fn channels(&self) -> (f64, f64, f64) {
        (self.r, self.g, self.b)
    }

    /// The current color, rounded to the nearest 8-bit channel values.
    #[must_use]
    pub fn color(&self) -> Color {
        Color::rgb(to_u8(self.r), to_u8(self.g), to_u8(self.b))
    }

    /// Euclidean distance to `target` in unit RGB space.
    #[must_use]
    pub fn distance_to(&self, target: Color) -> f64 {
        let (tr, tg, tb) = target.to_unit();
        let dr = self.r - tr;
        let dg = self.g - tg;
        let db = self.b - tb;
        db.mul_add(db, dr.mul_add(dr, dg * dg)).sqrt()
    }
}

impl Default for Fade {
    /// Black, the color the window opens with.
    fn default() -> Self {
        Self::new(Color::BLACK)
    }
}

#[inline]
fn smooth(current: f64, target: f64) -> f64 {
    current.mul_add(FADE_WEIGHT, target) / FADE_DIVISOR
}

/// Convert a float (0.0–1.0) to a u8 (0–255) with correct rounding.
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_u8(v: f64) -> u8 {
    // Safe: clamp guarantees 0.0 <= value <= 255.0 before truncation.
    v.mul_add(255.0, 0.5).clamp(0.0, 255.0) as u8
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const TARGET: Color = Color::rgb(100, 100, 100);

    #[test]
    fn starts_black() {
        assert_eq!(Fade::default().color(), Color::BLACK);
        assert_eq!(Fade::default().channels(), (0.0, 0.0, 0.0));
    }

    #[test]
    fn first_step_moves_two_percent() {
        let mut fade = Fade::default();
        fade.step(Color::WHITE);
        let (r, g, b) = fade.channels();
        for c in [r, g, b] {
            assert!((c - 0.02).abs() < 1e-12, "got {c}");
        }
    }

    #[test]
    fn channels_strictly_increase_toward_brighter_target() {
        let mut fade = Fade::default();
        let mut last = fade.channels();
        for tick in 0..1000 {
            fade.step(TARGET);
            let now = fade.channels();
            assert!(now.0 > last.0 && now.1 > last.1 && now.2 > last.2, "tick {tick}");
            last = now;
        }
    }

    #[test]
    fn distance_strictly_decreases_and_never_reaches_zero() {
        let mut fade = Fade::default();
        let mut last = fade.distance_to(TARGET);
        for tick in 0..1000 {
            fade.step(TARGET);
            let now = fade.distance_to(TARGET);
            assert!(now < last, "tick {tick}");
            assert!(now > 0.0, "tick {tick}");
            last = now;
        }
    }

    #[test]
    fn distance_follows_geometric_decay() {
        let mut fade = Fade::default();
        let start = fade.distance_to(TARGET);
        for _ in 0..50 {
            fade.step(TARGET);
        }
        let expected = start * (FADE_WEIGHT / FADE_DIVISOR).powi(50);
        assert!((fade.distance_to(TARGET) - expected).abs() < 1e-9);
    }

    #[test]
    fn tenfold_closer_after_enough_ticks() {
        let mut fade = Fade::default();
        fade.step(TARGET);
        let after_one = fade.distance_to(TARGET);
        // 0.98^119 ≈ 0.09: a hundred and twenty ticks in, the gap is
        // under a tenth of what it was after the first.
        for _ in 1..120 {
            fade.step(TARGET);
        }
        assert!(fade.distance_to(TARGET) < after_one / 10.0);
    }

    #[test]
    fn darker_target_fades_down() {
        let mut fade = Fade::new(Color::WHITE);
        fade.step(Color::BLACK);
        let (r, _, _) = fade.channels();
        assert!((r - 0.98).abs() < 1e-12);
    }

    #[test]
    fn quantized_color_rounds() {
        let mut fade = Fade::default();
        fade.step(Color::WHITE);
        // 0.02 × 255 = 5.1 → 5.
        assert_eq!(fade.color(), Color::rgb(5, 5, 5));
    }

    #[test]
    fn steady_target_is_fixed_point() {
        let mut fade = Fade::new(TARGET);
        fade.step(TARGET);
        assert_eq!(fade.color(), TARGET);
    }
}
