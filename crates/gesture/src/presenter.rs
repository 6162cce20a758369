//! AnimationPresenter - drag offset to visual feedback.
//!
//! Every function here is a pure mapping from `(offset, viewport_width)` to a
//! number or colour. The presenter holds only styling constants: it has no
//! access to the queue or to decisions, so a rendering bug cannot change what
//! was decided.

use serde::{Deserialize, Serialize};

/// Hard bound on card tilt, whatever `max_rotation_degrees` is set to.
pub const ROTATION_LIMIT_DEGREES: f32 = 10.0;

/// 8-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Linear interpolation, `t` clamped to `0.0..=1.0`.
    pub fn lerp(self, other: Rgb, t: f32) -> Rgb {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let channel = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Rgb {
            r: channel(self.r, other.r),
            g: channel(self.g, other.g),
            b: channel(self.b, other.b),
        }
    }
}

/// Tint endpoints: reject on the left, accept on the right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub reject: Rgb,
    pub neutral: Rgb,
    pub accept: Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            reject: Rgb::new(0xE5, 0x39, 0x35),
            neutral: Rgb::new(0xFF, 0xFF, 0xFF),
            accept: Rgb::new(0x43, 0xA0, 0x47),
        }
    }
}

/// Everything the screen needs to draw the top card for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CardVisual {
    pub offset: f32,
    pub rotation_degrees: f32,
    pub opacity: f32,
    pub tint: Rgb,
    pub accept_badge_opacity: f32,
    pub reject_badge_opacity: f32,
}

/// Maps a drag offset to rotation, fade, tint and badge visibility.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnimationPresenter {
    pub palette: Palette,
    /// Rotation at a full viewport-width offset (degrees); the result is
    /// still clamped to `±ROTATION_LIMIT_DEGREES`
    pub max_rotation_degrees: f32,
    /// Opacity at a full viewport-width offset
    pub min_opacity: f32,
    /// Proportion of the viewport at which a badge is fully visible
    pub badge_full_at: f32,
}

impl Default for AnimationPresenter {
    fn default() -> Self {
        Self {
            palette: Palette::default(),
            max_rotation_degrees: ROTATION_LIMIT_DEGREES,
            min_opacity: 0.5,
            badge_full_at: 0.25,
        }
    }
}

impl AnimationPresenter {
    pub fn new(palette: Palette) -> Self {
        Self {
            palette,
            ..Self::default()
        }
    }

    /// Signed offset as a share of the viewport, clamped to `-1.0..=1.0`.
    pub fn proportion(offset: f32, viewport_width: f32) -> f32 {
        if !(viewport_width > 0.0) || !offset.is_finite() {
            return 0.0;
        }
        (offset / viewport_width).clamp(-1.0, 1.0)
    }

    /// Card tilt, bounded by `±max_rotation_degrees` and never beyond
    /// `±ROTATION_LIMIT_DEGREES`.
    pub fn rotation(&self, offset: f32, viewport_width: f32) -> f32 {
        let degrees = Self::proportion(offset, viewport_width) * self.max_rotation_degrees;
        if degrees.is_nan() {
            return 0.0;
        }
        degrees.clamp(-ROTATION_LIMIT_DEGREES, ROTATION_LIMIT_DEGREES)
    }

    /// Card fades as it moves away from neutral.
    pub fn opacity(&self, offset: f32, viewport_width: f32) -> f32 {
        let p = Self::proportion(offset, viewport_width).abs();
        1.0 - (1.0 - self.min_opacity) * p
    }

    /// Background tint: reject colour ← neutral → accept colour.
    pub fn tint(&self, offset: f32, viewport_width: f32) -> Rgb {
        let p = Self::proportion(offset, viewport_width);
        if p >= 0.0 {
            self.palette.neutral.lerp(self.palette.accept, p)
        } else {
            self.palette.neutral.lerp(self.palette.reject, -p)
        }
    }

    /// `(accept, reject)` badge opacities; each grows only in its own direction.
    pub fn badge_opacities(&self, offset: f32, viewport_width: f32) -> (f32, f32) {
        let p = Self::proportion(offset, viewport_width);
        let full = self.badge_full_at.max(f32::EPSILON);
        let accept = (p / full).clamp(0.0, 1.0);
        let reject = (-p / full).clamp(0.0, 1.0);
        (accept, reject)
    }

    pub fn visual(&self, offset: f32, viewport_width: f32) -> CardVisual {
        let (accept_badge_opacity, reject_badge_opacity) = self.badge_opacities(offset, viewport_width);
        CardVisual {
            offset,
            rotation_degrees: self.rotation(offset, viewport_width),
            opacity: self.opacity(offset, viewport_width),
            tint: self.tint(offset, viewport_width),
            accept_badge_opacity,
            reject_badge_opacity,
        }
    }
}
