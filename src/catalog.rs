//! Shape catalog of Wang tiles
//!
//! Each generator draws one or two jittered boundary lines between fixed
//! perimeter anchors, floods the regions they delimit from the tile corners,
//! and tags corners, fences and borders.
//!
//! Anchors sit on the center lines `half = size / 2` (or `half - 1` for the
//! pixel just before it), shifted by the frontier offset. A line is labeled
//! with the biome on the side whose flood would otherwise cross it.

use rand::Rng;

use crate::biomes::{BiomeId, Frontier};
use crate::boundary::make_line;
use crate::geometry::Point;
use crate::region::{absorb_unreached, fill_region};
use crate::settings::TileSettings;
use crate::tile::{
    Direction, Tile, TERRAIN_BOTTOM_LEFT, TERRAIN_BOTTOM_RIGHT, TERRAIN_TOP_LEFT, TERRAIN_TOP_RIGHT,
};

/// Orientation of the boundary of a split tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    /// Boundary from the left edge to the right edge: `b1` on top
    Horizontal,
    /// Boundary from the top edge to the bottom edge: `b1` on the left
    Vertical,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    pub fn opposite(self) -> Corner {
        match self {
            Corner::TopLeft => Corner::BottomRight,
            Corner::TopRight => Corner::BottomLeft,
            Corner::BottomLeft => Corner::TopRight,
            Corner::BottomRight => Corner::TopLeft,
        }
    }

    /// Index into `Tile::terrain`.
    pub fn terrain_index(self) -> usize {
        match self {
            Corner::TopLeft => TERRAIN_TOP_LEFT,
            Corner::TopRight => TERRAIN_TOP_RIGHT,
            Corner::BottomLeft => TERRAIN_BOTTOM_LEFT,
            Corner::BottomRight => TERRAIN_BOTTOM_RIGHT,
        }
    }

    fn position(self, size: usize) -> (usize, usize) {
        let last = size - 1;

        match self {
            Corner::TopLeft => (0, 0),
            Corner::TopRight => (last, 0),
            Corner::BottomLeft => (0, last),
            Corner::BottomRight => (last, last),
        }
    }
}

fn top(_settings: &TileSettings, i: i32) -> Point {
    Point::new(i, 0)
}

fn bottom(settings: &TileSettings, i: i32) -> Point {
    Point::new(i, settings.size as i32 - 1)
}

fn left(_settings: &TileSettings, i: i32) -> Point {
    Point::new(0, i)
}

fn right(settings: &TileSettings, i: i32) -> Point {
    Point::new(settings.size as i32 - 1, i)
}

fn draw_line(tile: &mut Tile, anchors: &[Point], biome: BiomeId, rng: &mut impl Rng) {
    for point in make_line(tile.size, anchors, rng) {
        tile.paint(point.x, point.y, biome);
    }
}

fn fill_from(tile: &mut Tile, corner: Corner, biome: BiomeId) {
    fill_region(&mut tile.pixels, corner.position(tile.size), biome);
}

/// Close the labeling once every seed has been flooded.
fn finish(tile: &mut Tile) {
    let absorbed = absorb_unreached(&mut tile.pixels);

    if absorbed > 0 {
        log::debug!("Absorbed {} unreached pixels", absorbed);
    }
}

/// A tile of a single biome.
pub fn generate_full(settings: &TileSettings, biome: BiomeId) -> Tile {
    let mut tile = Tile::filled(settings, biome);
    tile.terrain = [biome; 4];
    tile
}

/// `b1` on the top (horizontal) or left (vertical) half, `b2` on the other.
pub fn generate_split(
    settings: &TileSettings,
    b1: BiomeId,
    b2: BiomeId,
    axis: Axis,
    rng: &mut impl Rng,
    frontier: &Frontier,
) -> Tile {
    let mut tile = Tile::new(settings);
    let half = settings.half();
    let at = half + frontier.offset;

    let (start, stop) = match axis {
        Axis::Horizontal => (left(settings, at), right(settings, at)),
        Axis::Vertical => (top(settings, at), bottom(settings, at)),
    };

    draw_line(&mut tile, &[start, stop], b2, rng);

    fill_from(&mut tile, Corner::TopLeft, b1);
    fill_from(&mut tile, Corner::BottomRight, b2);
    finish(&mut tile);

    match axis {
        Axis::Horizontal => {
            tile.terrain[TERRAIN_TOP_LEFT] = b1;
            tile.terrain[TERRAIN_TOP_RIGHT] = b1;
            tile.terrain[TERRAIN_BOTTOM_LEFT] = b2;
            tile.terrain[TERRAIN_BOTTOM_RIGHT] = b2;
        }
        Axis::Vertical => {
            tile.terrain[TERRAIN_TOP_LEFT] = b1;
            tile.terrain[TERRAIN_BOTTOM_LEFT] = b1;
            tile.terrain[TERRAIN_TOP_RIGHT] = b2;
            tile.terrain[TERRAIN_BOTTOM_RIGHT] = b2;
        }
    }

    if frontier.fence {
        match axis {
            Axis::Horizontal => tile.push_fence(Direction::Left, Direction::Right),
            Axis::Vertical => tile.push_fence(Direction::Up, Direction::Down),
        }
    }

    tile.push_border(frontier);
    tile
}

/// `b1` in `corner`, `b2` everywhere else.
pub fn generate_corner(
    settings: &TileSettings,
    b1: BiomeId,
    b2: BiomeId,
    corner: Corner,
    rng: &mut impl Rng,
    frontier: &Frontier,
) -> Tile {
    let mut tile = Tile::new(settings);
    let half = settings.half();
    let offset = frontier.offset;

    let (start, stop) = match corner {
        Corner::TopLeft => (top(settings, half - 1 + offset), left(settings, half - 1 + offset)),
        Corner::TopRight => (top(settings, half - offset), right(settings, half - 1 + offset)),
        Corner::BottomLeft => (bottom(settings, half - 1 + offset), left(settings, half - offset)),
        Corner::BottomRight => (bottom(settings, half - offset), right(settings, half - offset)),
    };

    draw_line(&mut tile, &[start, stop], b1, rng);

    fill_from(&mut tile, corner, b1);
    fill_from(&mut tile, corner.opposite(), b2);
    finish(&mut tile);

    tile.terrain = [b2; 4];
    tile.terrain[corner.terrain_index()] = b1;

    if frontier.fence {
        match corner {
            Corner::TopLeft => tile.push_fence(Direction::Up, Direction::Left),
            Corner::TopRight => tile.push_fence(Direction::Up, Direction::Right),
            Corner::BottomLeft => tile.push_fence(Direction::Left, Direction::Down),
            Corner::BottomRight => tile.push_fence(Direction::Right, Direction::Down),
        }
    }

    tile.push_border(frontier);
    tile
}

/// `b1` in the top-left and bottom-right corners, `b2` in the two others.
pub fn generate_cross(settings: &TileSettings, b1: BiomeId, b2: BiomeId, rng: &mut impl Rng, frontier: &Frontier) -> Tile {
    let mut tile = Tile::new(settings);
    let half = settings.half();
    let offset = frontier.offset;

    let top_right = [
        top(settings, half + offset),
        Point::new(half, half - 1),
        right(settings, half - 1 - offset),
    ];
    draw_line(&mut tile, &top_right, b2, rng);

    let bottom_left = [
        bottom(settings, half - 1 - offset),
        Point::new(half - 1, half),
        left(settings, half + offset),
    ];
    draw_line(&mut tile, &bottom_left, b2, rng);

    fill_from(&mut tile, Corner::TopLeft, b1);
    fill_from(&mut tile, Corner::BottomRight, b1);
    fill_from(&mut tile, Corner::TopRight, b2);
    fill_from(&mut tile, Corner::BottomLeft, b2);
    finish(&mut tile);

    tile.terrain[TERRAIN_TOP_LEFT] = b1;
    tile.terrain[TERRAIN_BOTTOM_RIGHT] = b1;
    tile.terrain[TERRAIN_TOP_RIGHT] = b2;
    tile.terrain[TERRAIN_BOTTOM_LEFT] = b2;

    if frontier.fence {
        tile.push_fence(Direction::Up, Direction::Right);
        tile.push_fence(Direction::Down, Direction::Left);
    }

    tile.push_border(frontier);
    tile
}

/// The "211" shape: `b1` over the whole top, `b2` bottom-left, `b3`
/// bottom-right.
pub fn generate_triple_l(
    settings: &TileSettings,
    (b1, b2, b3): (BiomeId, BiomeId, BiomeId),
    rng: &mut impl Rng,
    frontier12: &Frontier,
    frontier23: &Frontier,
    frontier31: &Frontier,
) -> Tile {
    let mut tile = Tile::new(settings);
    let half = settings.half();

    let bottom_left = [
        left(settings, half + frontier12.offset),
        bottom(settings, half - 1 + frontier23.offset),
    ];
    draw_line(&mut tile, &bottom_left, b2, rng);

    let bottom_right = [
        right(settings, half - frontier31.offset),
        bottom(settings, half + frontier23.offset),
    ];
    draw_line(&mut tile, &bottom_right, b3, rng);

    fill_from(&mut tile, Corner::TopLeft, b1);
    fill_from(&mut tile, Corner::BottomLeft, b2);
    fill_from(&mut tile, Corner::BottomRight, b3);
    finish(&mut tile);

    tile.terrain[TERRAIN_TOP_LEFT] = b1;
    tile.terrain[TERRAIN_TOP_RIGHT] = b1;
    tile.terrain[TERRAIN_BOTTOM_LEFT] = b2;
    tile.terrain[TERRAIN_BOTTOM_RIGHT] = b3;

    if frontier12.fence {
        tile.push_fence(Direction::Left, Direction::Down);
    }

    if frontier31.fence {
        tile.push_fence(Direction::Right, Direction::Down);
    }

    tile.push_border(frontier12);
    tile.push_border(frontier31);
    tile
}

/// The "211-cross" shape: `b1` on the top-left to bottom-right diagonal,
/// `b2` top-right, `b3` bottom-left.
pub fn generate_triple_cross(
    settings: &TileSettings,
    (b1, b2, b3): (BiomeId, BiomeId, BiomeId),
    rng: &mut impl Rng,
    frontier12: &Frontier,
    frontier31: &Frontier,
) -> Tile {
    let mut tile = Tile::new(settings);
    let half = settings.half();

    let top_right = [
        right(settings, half - 1 - frontier12.offset),
        top(settings, half + frontier12.offset),
    ];
    draw_line(&mut tile, &top_right, b2, rng);

    let bottom_left = [
        left(settings, half - frontier31.offset),
        bottom(settings, half - 1 + frontier31.offset),
    ];
    draw_line(&mut tile, &bottom_left, b3, rng);

    fill_from(&mut tile, Corner::TopLeft, b1);
    fill_from(&mut tile, Corner::BottomRight, b1);
    fill_from(&mut tile, Corner::TopRight, b2);
    fill_from(&mut tile, Corner::BottomLeft, b3);
    finish(&mut tile);

    tile.terrain[TERRAIN_TOP_LEFT] = b1;
    tile.terrain[TERRAIN_BOTTOM_RIGHT] = b1;
    tile.terrain[TERRAIN_TOP_RIGHT] = b2;
    tile.terrain[TERRAIN_BOTTOM_LEFT] = b3;

    if frontier12.fence {
        tile.push_fence(Direction::Right, Direction::Up);
    }

    if frontier31.fence {
        tile.push_fence(Direction::Left, Direction::Down);
    }

    tile.push_border(frontier12);
    tile.push_border(frontier31);
    tile
}
