//! Biome definitions and the rules describing how two biomes meet

use std::fmt;

use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::color::Color;

/// Stable identifier of a biome: the 64-bit FNV-1a hash of its name.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BiomeId(pub u64);

impl BiomeId {
    /// Marks a pixel no region has claimed yet.
    pub const INVALID: BiomeId = BiomeId(0);

    pub const fn from_name(name: &str) -> Self {
        let bytes = name.as_bytes();
        let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
        let mut i = 0;

        while i < bytes.len() {
            hash ^= bytes[i] as u64;
            hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
            i += 1;
        }

        BiomeId(hash)
    }
}

impl fmt::Display for BiomeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// The absence of biome. Overlay tiles pair a real biome with Void, and Void
/// pixels are rendered fully transparent.
pub const VOID: BiomeId = BiomeId::from_name("Void");

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PigmentStyle {
    /// The base color everywhere
    Plain,
    /// With probability `ratio`, shift the value by a normal draw of standard
    /// deviation `deviation` (clamped to +/-0.5)
    Randomize { ratio: f64, deviation: f32 },
    /// Diagonal stripes of the base color over a transparent background
    Striped,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pigment {
    pub color: Color,
    pub style: PigmentStyle,
}

impl Pigment {
    pub fn plain(color: Color) -> Self {
        Self { color, style: PigmentStyle::Plain }
    }

    /// Color of the pixel at `(x, y)`. Only `Randomize` consumes randomness:
    /// one Bernoulli draw per pixel, plus one normal draw when it succeeds.
    pub fn color_at(&self, rng: &mut impl Rng, x: i32, y: i32) -> Color {
        match self.style {
            PigmentStyle::Plain => self.color,
            PigmentStyle::Randomize { ratio, deviation } => {
                if !rng.gen_bool(ratio.clamp(0.0, 1.0)) {
                    return self.color;
                }

                let change = match Normal::new(0.0f32, deviation) {
                    Ok(normal) => normal.sample(rng).clamp(-0.5, 0.5),
                    Err(_) => 0.0,
                };

                if change > 0.0 {
                    self.color.darker(change)
                } else {
                    self.color.lighter(-change)
                }
            }
            PigmentStyle::Striped => {
                if (x / 2 + y / 2) % 8 == 3 {
                    self.color
                } else {
                    self.color.with_alpha(0.0)
                }
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Biome {
    pub id: BiomeId,
    pub name: String,
    pub pigment: Pigment,
    /// Terrain type index in the exported tileset
    pub index: usize,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BorderEffect {
    #[default]
    None,
    Fade,
    Outline,
    Sharpen,
    Blur,
}

/// A blending effect applied where `b1` meets `b2`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Border {
    pub effect: BorderEffect,
    pub b1: BiomeId,
    pub b2: BiomeId,
}

/// How two biomes meet along a tile boundary. Directional: the frontier from
/// `b1` to `b2` is the inverse of the frontier from `b2` to `b1`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Frontier {
    /// Shift of the boundary anchors away from the tile center, in pixels
    pub offset: i32,
    pub border: Border,
    pub fence: bool,
}

impl Frontier {
    pub fn inverse(&self) -> Frontier {
        Frontier {
            offset: -self.offset,
            border: Border {
                effect: self.border.effect,
                b1: self.border.b2,
                b2: self.border.b1,
            },
            fence: self.fence,
        }
    }

    pub fn has_border(&self) -> bool {
        self.border.effect != BorderEffect::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_biome_id_is_stable() {
        assert_eq!(BiomeId::from_name("Grass"), BiomeId::from_name("Grass"));
        assert_ne!(BiomeId::from_name("Grass"), BiomeId::from_name("Water"));
        // FNV-1a of the empty string is the offset basis.
        assert_eq!(BiomeId::from_name("").0, 0xcbf2_9ce4_8422_2325);
        assert_ne!(VOID, BiomeId::INVALID);
    }

    #[test]
    fn test_frontier_inverse_law() {
        let frontier = Frontier {
            offset: 3,
            border: Border {
                effect: BorderEffect::Blur,
                b1: BiomeId::from_name("Grass"),
                b2: BiomeId::from_name("Water"),
            },
            fence: true,
        };

        let inverse = frontier.inverse();
        assert_eq!(inverse.offset, -3);
        assert_eq!(inverse.border.b1, frontier.border.b2);
        assert_eq!(inverse.border.b2, frontier.border.b1);
        assert_eq!(inverse.border.effect, BorderEffect::Blur);
        assert!(inverse.fence);
        assert_eq!(inverse.inverse(), frontier);
    }

    #[test]
    fn test_default_frontier_has_no_effect() {
        let frontier = Frontier::default();
        assert_eq!(frontier.offset, 0);
        assert!(!frontier.fence);
        assert!(!frontier.has_border());
    }

    #[test]
    fn test_striped_pattern() {
        let pigment = Pigment {
            color: Color::new(0.2, 0.4, 0.6, 1.0),
            style: PigmentStyle::Striped,
        };
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        assert_eq!(pigment.color_at(&mut rng, 6, 0).a, 1.0);
        assert_eq!(pigment.color_at(&mut rng, 0, 6).a, 1.0);
        assert_eq!(pigment.color_at(&mut rng, 0, 0).a, 0.0);
        assert_eq!(pigment.color_at(&mut rng, 0, 0).r, 0.2);
    }

    #[test]
    fn test_randomize_stays_close_to_base() {
        let base = Color::new(0.5, 0.5, 0.5, 1.0);
        let pigment = Pigment {
            color: base,
            style: PigmentStyle::Randomize { ratio: 1.0, deviation: 0.1 },
        };
        let mut rng = ChaCha8Rng::seed_from_u64(11);

        let mut changed = 0;
        for i in 0..100 {
            let c = pigment.color_at(&mut rng, i, 0);
            assert_eq!(c.a, 1.0);
            assert!(c.r >= 0.25 && c.r <= 0.75);
            if c != base {
                changed += 1;
            }
        }
        assert!(changed > 50);
    }

    #[test]
    fn test_randomize_with_zero_ratio_is_plain() {
        let base = Color::new(0.1, 0.2, 0.3, 1.0);
        let pigment = Pigment {
            color: base,
            style: PigmentStyle::Randomize { ratio: 0.0, deviation: 0.3 },
        };
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        assert!((0..50).all(|i| pigment.color_at(&mut rng, i, i) == base));
    }
}
