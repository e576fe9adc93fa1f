//! Floating point RGBA colors

use std::ops::{Add, AddAssign, Div, Mul};

/// A color with channels in `[0, 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const TRANSPARENT: Color = Color::new(0.0, 0.0, 0.0, 0.0);
    /// Color written for Void pixels.
    pub const TRANSPARENT_WHITE: Color = Color::new(1.0, 1.0, 1.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn from_rgba8(rgba: [u8; 4]) -> Self {
        Self::new(
            rgba[0] as f32 / 255.0,
            rgba[1] as f32 / 255.0,
            rgba[2] as f32 / 255.0,
            rgba[3] as f32 / 255.0,
        )
    }

    pub fn to_rgba8(self) -> [u8; 4] {
        let quantize = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [quantize(self.r), quantize(self.g), quantize(self.b), quantize(self.a)]
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Reduce the HSV value by `percent`. Hue, saturation and alpha are kept.
    pub fn darker(self, percent: f32) -> Self {
        let k = 1.0 - percent.clamp(0.0, 1.0);
        Self::new(self.r * k, self.g * k, self.b * k, self.a)
    }

    /// Raise the HSV value by `percent`. Once value saturates at 1 the excess
    /// is taken from the saturation, so colors wash out toward white.
    pub fn lighter(self, percent: f32) -> Self {
        let (h, mut s, mut v) = rgb_to_hsv(self.r, self.g, self.b);
        v += v * percent.clamp(0.0, 1.0);

        if v > 1.0 {
            s = (s - (v - 1.0)).max(0.0);
            v = 1.0;
        }

        let (r, g, b) = hsv_to_rgb(h, s, v);
        Self::new(r, g, b, self.a)
    }
}

impl Add for Color {
    type Output = Color;

    fn add(self, o: Color) -> Color {
        Color::new(self.r + o.r, self.g + o.g, self.b + o.b, self.a + o.a)
    }
}

impl AddAssign for Color {
    fn add_assign(&mut self, o: Color) {
        *self = *self + o;
    }
}

impl Mul<f32> for Color {
    type Output = Color;

    fn mul(self, k: f32) -> Color {
        Color::new(self.r * k, self.g * k, self.b * k, self.a * k)
    }
}

impl Div<f32> for Color {
    type Output = Color;

    fn div(self, k: f32) -> Color {
        Color::new(self.r / k, self.g / k, self.b / k, self.a / k)
    }
}

pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

fn rgb_to_hsv(r: f32, g: f32, b: f32) -> (f32, f32, f32) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let h = if delta <= f32::EPSILON {
        0.0
    } else if max == r {
        60.0 * ((g - b) / delta).rem_euclid(6.0)
    } else if max == g {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    };

    let s = if max <= f32::EPSILON { 0.0 } else { delta / max };

    (h, s, max)
}

fn hsv_to_rgb(h: f32, s: f32, v: f32) -> (f32, f32, f32) {
    let c = v * s;
    let hp = h / 60.0;
    let x = c * (1.0 - (hp.rem_euclid(2.0) - 1.0).abs());
    let m = v - c;

    let (r, g, b) = match hp as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    (r + m, g + m, b + m)
}
