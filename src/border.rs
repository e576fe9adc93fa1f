//! Border blending between two biomes of a tile
//!
//! Every effect is driven by the same quantity: the Manhattan distance from a
//! pixel to the nearest pixel of the biome on the other side of the border.

use std::collections::VecDeque;

use crate::biomes::{BiomeId, Border, BorderEffect, VOID};
use crate::color::{lerp, Color};
use crate::grid::Grid;

/// Fade reaches full transparency next to the boundary and stops here.
pub const FADE_DISTANCE: usize = 11;
pub const OUTLINE_DISTANCE: usize = 6;
pub const OUTLINE_DARKENING: f32 = 0.2;
pub const SHARPEN_DISTANCE: usize = 6;
pub const BLUR_DISTANCE: usize = 5;

/// 5x5 binomial kernel, indexed by `[|dy|][|dx|]`.
const BLUR_WEIGHTS: [[f32; 3]; 3] = [
    [36.0, 24.0, 6.0],
    [24.0, 16.0, 4.0],
    [6.0, 4.0, 1.0],
];

/// Manhattan distance from every pixel to the nearest pixel labeled `target`,
/// or `None` everywhere when the tile has no such pixel.
///
/// A breadth-first search over the 4-connected grid from all target pixels at
/// once; with no obstacles its step count is exactly the Manhattan distance.
pub fn distance_to_biome(pixels: &Grid<BiomeId>, target: BiomeId) -> Grid<Option<usize>> {
    let mut distances = Grid::new_with(pixels.width, pixels.height, None);
    let mut queue = VecDeque::new();

    for (x, y, id) in pixels.iter() {
        if *id == target {
            distances.set(x, y, Some(0));
            queue.push_back((x, y));
        }
    }

    while let Some((x, y)) = queue.pop_front() {
        let next = distances.get(x, y).map(|d| d + 1);

        for (nx, ny) in pixels.neighbors(x, y) {
            if distances.get(nx, ny).is_none() {
                distances.set(nx, ny, next);
                queue.push_back((nx, ny));
            }
        }
    }

    distances
}

/// Weighted average of `colors` around `(x, y)` and the divisor it used.
///
/// Neighbors outside the grid are skipped and their weight is left out of the
/// divisor, so the result is always a true average.
pub fn blur_at(colors: &Grid<Color>, x: usize, y: usize) -> (Color, f32) {
    let mut total = *colors.get(x, y) * BLUR_WEIGHTS[0][0];
    let mut divisor = BLUR_WEIGHTS[0][0];

    for (nx, ny) in colors.neighbors_within(x, y, 2) {
        let weight = BLUR_WEIGHTS[ny.abs_diff(y)][nx.abs_diff(x)];
        total += *colors.get(nx, ny) * weight;
        divisor += weight;
    }

    (total / divisor, divisor)
}

impl BorderEffect {
    /// Color of the pixel at `(x, y)` of `colors` lying `distance` pixels away
    /// from the other biome, or `None` when the effect leaves it untouched.
    pub fn apply(self, colors: &Grid<Color>, x: usize, y: usize, distance: usize) -> Option<Color> {
        let color = *colors.get(x, y);

        match self {
            BorderEffect::None => None,
            BorderEffect::Fade => {
                if distance >= FADE_DISTANCE {
                    return None;
                }

                let t = ((FADE_DISTANCE - distance) as f32 / 10.0).clamp(0.0, 1.0);
                Some(color.with_alpha(lerp(color.a, 0.0, t)))
            }
            BorderEffect::Outline => {
                if distance > OUTLINE_DISTANCE {
                    return None;
                }

                Some(color.darker(OUTLINE_DARKENING))
            }
            BorderEffect::Sharpen => {
                if distance >= SHARPEN_DISTANCE {
                    return None;
                }

                let closeness = (SHARPEN_DISTANCE - distance) as f32;
                let darker = color.darker(closeness * 0.05);
                Some(darker.with_alpha(lerp(color.a, 1.0, (closeness / 5.0).min(1.0))))
            }
            BorderEffect::Blur => {
                if distance >= BLUR_DISTANCE {
                    return None;
                }

                Some(blur_at(colors, x, y).0)
            }
        }
    }
}

/// Apply every border of a tile and return the new color grid.
///
/// `colors` holds the tile's colors with `spacing` cells of margin; it is only
/// read, so one border never sees the output of another.
pub fn blend_borders(pixels: &Grid<BiomeId>, colors: &Grid<Color>, borders: &[Border], spacing: usize) -> Grid<Color> {
    let mut blended = colors.clone();

    for border in borders {
        if border.effect == BorderEffect::None {
            continue;
        }

        let to_b1 = distance_to_biome(pixels, border.b1);
        let to_b2 = distance_to_biome(pixels, border.b2);

        for (x, y, id) in pixels.iter() {
            if *id == VOID {
                continue;
            }

            let distance = if *id == border.b1 {
                *to_b2.get(x, y)
            } else if *id == border.b2 {
                *to_b1.get(x, y)
            } else {
                continue;
            };

            let Some(distance) = distance else {
                continue;
            };

            if let Some(color) = border.effect.apply(colors, x + spacing, y + spacing, distance) {
                blended.set(x + spacing, y + spacing, color);
            }
        }
    }

    blended
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{manhattan_distance, Point};

    const A: BiomeId = BiomeId(1);
    const B: BiomeId = BiomeId(2);

    /// A 24x1 strip: column 0 is B, the rest is A.
    fn strip() -> Grid<BiomeId> {
        let mut pixels = Grid::new_with(24, 1, A);
        pixels.set(0, 0, B);
        pixels
    }

    #[test]
    fn test_distance_field_is_manhattan() {
        let mut pixels = Grid::new_with(7, 7, A);
        pixels.set(2, 3, B);

        let distances = distance_to_biome(&pixels, B);

        let target = Point::new(2, 3);
        for (x, y, d) in distances.iter() {
            let expected = manhattan_distance(Point::new(x as i32, y as i32), target) as usize;
            assert_eq!(*d, Some(expected));
        }
        assert!(distance_to_biome(&pixels, BiomeId(9)).iter().all(|(_, _, d)| d.is_none()));
    }

    #[test]
    fn test_fade_is_monotonic() {
        let pixels = strip();
        let colors = Grid::new_with(26, 3, Color::new(0.5, 0.5, 0.5, 1.0));
        let border = Border { effect: BorderEffect::Fade, b1: A, b2: B };

        let blended = blend_borders(&pixels, &colors, &[border], 1);

        let alphas: Vec<f32> = (1..24).map(|x| blended.get(x + 1, 1).a).collect();
        assert_eq!(alphas[0], 0.0);
        for pair in alphas.windows(2) {
            assert!(pair[0] <= pair[1]);
        }
        for (i, alpha) in alphas.iter().enumerate() {
            let distance = i + 1;
            if distance >= FADE_DISTANCE {
                assert_eq!(*alpha, 1.0);
            } else {
                assert!(*alpha < 1.0);
            }
        }
    }

    #[test]
    fn test_border_applies_to_both_sides() {
        let pixels = strip();
        let colors = Grid::new_with(26, 3, Color::new(0.5, 0.5, 0.5, 1.0));
        let border = Border { effect: BorderEffect::Outline, b1: B, b2: A };

        let blended = blend_borders(&pixels, &colors, &[border], 1);

        assert!((blended.get(1, 1).r - 0.4).abs() < 1e-6);
        assert!((blended.get(7, 1).r - 0.4).abs() < 1e-6);
        assert_eq!(blended.get(8, 1).r, 0.5);
    }

    #[test]
    fn test_sharpen_raises_alpha() {
        let colors = Grid::new_with(3, 3, Color::new(0.5, 0.5, 0.5, 0.5));

        let near = BorderEffect::Sharpen.apply(&colors, 1, 1, 1).unwrap();
        assert_eq!(near.a, 1.0);
        assert!((near.r - 0.375).abs() < 1e-6);
        assert!(BorderEffect::Sharpen.apply(&colors, 1, 1, SHARPEN_DISTANCE).is_none());
    }

    #[test]
    fn test_blur_weights_sum_to_divisor() {
        let colors = Grid::new_with(9, 9, Color::new(0.0, 0.0, 0.0, 0.0));

        assert_eq!(blur_at(&colors, 4, 4).1, 256.0);
        assert_eq!(blur_at(&colors, 0, 0).1, 36.0 + 24.0 + 24.0 + 16.0 + 6.0 + 6.0 + 4.0 + 4.0 + 1.0);
        assert_eq!(blur_at(&colors, 1, 4).1, 256.0 - (6.0 + 4.0 + 1.0 + 4.0 + 1.0));
    }

    #[test]
    fn test_blur_preserves_uniform_color() {
        let color = Color::new(0.25, 0.5, 0.75, 1.0);
        let colors = Grid::new_with(6, 6, color);

        for (x, y) in colors.positions() {
            let (blurred, _) = blur_at(&colors, x, y);
            assert!((blurred.r - color.r).abs() < 1e-5, "({x}, {y})");
            assert!((blurred.g - color.g).abs() < 1e-5);
            assert!((blurred.b - color.b).abs() < 1e-5);
            assert!((blurred.a - color.a).abs() < 1e-5);
        }
    }

    #[test]
    fn test_blur_mixes_neighbors() {
        let mut colors = Grid::new_with(5, 5, Color::new(0.0, 0.0, 0.0, 1.0));
        colors.set(3, 2, Color::new(1.0, 0.0, 0.0, 1.0));

        let (blurred, _) = blur_at(&colors, 2, 2);

        assert!((blurred.r - 24.0 / 256.0).abs() < 1e-6);
    }

    #[test]
    fn test_void_pixels_are_skipped() {
        let mut pixels = Grid::new_with(4, 1, A);
        pixels.set(0, 0, VOID);
        let colors = Grid::new_with(6, 3, Color::TRANSPARENT_WHITE);
        let border = Border { effect: BorderEffect::Sharpen, b1: A, b2: VOID };

        let blended = blend_borders(&pixels, &colors, &[border], 1);

        assert_eq!(*blended.get(1, 1), Color::TRANSPARENT_WHITE);
        assert_eq!(blended.get(2, 1).a, 1.0);
    }
}
