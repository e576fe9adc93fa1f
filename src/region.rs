//! Region labeling on a tile's pixel grid

use std::collections::VecDeque;

use crate::biomes::BiomeId;
use crate::grid::Grid;

/// Label `seed` with `biome` and flood every 4-connected unlabeled pixel
/// reachable from it. Already labeled pixels, including boundary lines, stop
/// the flood. Each pixel enters the queue at most once.
pub fn fill_region(pixels: &mut Grid<BiomeId>, seed: (usize, usize), biome: BiomeId) {
    pixels.set(seed.0, seed.1, biome);

    let mut queue = VecDeque::new();
    queue.push_back(seed);

    while let Some((x, y)) = queue.pop_front() {
        debug_assert_eq!(*pixels.get(x, y), biome);

        for (nx, ny) in pixels.neighbors(x, y) {
            if *pixels.get(nx, ny) == BiomeId::INVALID {
                pixels.set(nx, ny, biome);
                queue.push_back((nx, ny));
            }
        }
    }
}

/// Give every pocket no seed reached the label of a region it touches.
///
/// Jittered boundary lines are clamped to the tile, so a line can run along
/// an edge and close off a pocket on the wrong side of it. Labels spread
/// breadth-first from all labeled pixels at once; returns the number of
/// pixels that were relabeled.
pub fn absorb_unreached(pixels: &mut Grid<BiomeId>) -> usize {
    let mut queue: VecDeque<(usize, usize)> = pixels
        .iter()
        .filter(|(_, _, id)| **id != BiomeId::INVALID)
        .map(|(x, y, _)| (x, y))
        .collect();

    let mut absorbed = 0;

    while let Some((x, y)) = queue.pop_front() {
        let biome = *pixels.get(x, y);

        for (nx, ny) in pixels.neighbors(x, y) {
            if *pixels.get(nx, ny) == BiomeId::INVALID {
                pixels.set(nx, ny, biome);
                queue.push_back((nx, ny));
                absorbed += 1;
            }
        }
    }

    absorbed
}

/// First unlabeled pixel in row-major order.
pub fn find_unlabeled(pixels: &Grid<BiomeId>) -> Option<(usize, usize)> {
    pixels
        .iter()
        .find(|(_, _, id)| **id == BiomeId::INVALID)
        .map(|(x, y, _)| (x, y))
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: BiomeId = BiomeId(1);
    const B: BiomeId = BiomeId(2);

    #[test]
    fn test_fill_stops_at_barrier() {
        let mut pixels = Grid::new_with(6, 6, BiomeId::INVALID);
        for y in 0..6 {
            pixels.set(3, y, B);
        }

        fill_region(&mut pixels, (0, 0), A);

        for (x, y, id) in pixels.iter() {
            if x < 3 {
                assert_eq!(*id, A);
            } else if x == 3 {
                assert_eq!(*id, B);
            } else {
                assert_eq!(*id, BiomeId::INVALID, "({x}, {y}) leaked");
            }
        }

        fill_region(&mut pixels, (5, 5), B);
        assert_eq!(find_unlabeled(&pixels), None);
    }

    #[test]
    fn test_diagonal_line_blocks_four_connected_fill() {
        let mut pixels = Grid::new_with(5, 5, BiomeId::INVALID);
        for i in 0..5 {
            pixels.set(i, 4 - i, B);
        }

        fill_region(&mut pixels, (0, 0), A);

        assert_eq!(*pixels.get(4, 4), BiomeId::INVALID);
        assert_eq!(*pixels.get(1, 1), A);
    }

    #[test]
    fn test_absorb_unreached_pocket() {
        let mut pixels = Grid::new_with(4, 4, BiomeId::INVALID);
        // A wall of B cuts off the right column, only the left part is seeded.
        for y in 0..4 {
            pixels.set(2, y, B);
        }
        fill_region(&mut pixels, (0, 0), A);
        assert_eq!(find_unlabeled(&pixels), Some((3, 0)));

        let absorbed = absorb_unreached(&mut pixels);

        assert_eq!(absorbed, 4);
        assert_eq!(find_unlabeled(&pixels), None);
        assert!((0..4).all(|y| *pixels.get(3, y) == B));
    }
}
