//! Wang tilesets assembled from the shape catalog
//!
//! A two-corner set covers every assignment of two biomes to the four tile
//! corners (16 tiles). A three-corner set covers the tiles where three biomes
//! meet, one of them on two corners (36 tiles).

use std::collections::BTreeMap;

use rand::Rng;

use crate::biomes::{Biome, BiomeId, Frontier};
use crate::catalog::{
    generate_corner, generate_cross, generate_full, generate_split, generate_triple_cross, generate_triple_l, Axis,
    Corner,
};
use crate::database::Database;
use crate::error::{Error, Result};
use crate::grid::Grid;
use crate::tile::Tile;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TilesetKind {
    TwoCorners,
    ThreeCorners,
    Plain,
}

impl TilesetKind {
    /// Grid dimensions `(columns, rows)` of a tileset of this kind.
    pub fn dimensions(self) -> (usize, usize) {
        match self {
            TilesetKind::TwoCorners | TilesetKind::Plain => (4, 4),
            TilesetKind::ThreeCorners => (9, 4),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Tileset {
    pub kind: TilesetKind,
    tiles: Grid<Option<Tile>>,
}

impl Tileset {
    pub fn new(kind: TilesetKind) -> Self {
        let (columns, rows) = kind.dimensions();

        Self {
            kind,
            tiles: Grid::new(columns, rows),
        }
    }

    pub fn columns(&self) -> usize {
        self.tiles.width
    }

    pub fn rows(&self) -> usize {
        self.tiles.height
    }

    pub fn place(&mut self, col: usize, row: usize, tile: Tile) {
        self.tiles.set(col, row, Some(tile));
    }

    pub fn tile(&self, col: usize, row: usize) -> Option<&Tile> {
        self.tiles.get(col, row).as_ref()
    }

    /// Placed tiles in row-major order with their `(col, row)` cell.
    pub fn tiles(&self) -> impl Iterator<Item = (usize, usize, &Tile)> {
        self.tiles
            .iter()
            .filter_map(|(col, row, tile)| tile.as_ref().map(|tile| (col, row, tile)))
    }

    pub fn tiles_mut(&mut self) -> impl Iterator<Item = (usize, usize, &mut Tile)> {
        self.tiles
            .iter_mut()
            .filter_map(|(col, row, tile)| tile.as_mut().map(|tile| (col, row, tile)))
    }

    /// Colorize every tile, failing on the first empty cell or unlabeled pixel.
    pub fn colorize(&mut self, biomes: &BTreeMap<BiomeId, Biome>, rng: &mut impl Rng) -> Result<()> {
        for (col, row, tile) in self.tiles.iter_mut() {
            match tile {
                Some(tile) => tile.colorize(biomes, rng)?,
                None => return Err(Error::MissingTile { col, row }),
            }
        }

        Ok(())
    }
}

/// The 16 tiles of the two-corner Wang set for `b1` and `b2`.
///
/// Cells are laid out so that horizontally and vertically adjacent tiles agree
/// on the corners they share.
pub fn generate_two_corners_wang_tileset(b1: BiomeId, b2: BiomeId, rng: &mut impl Rng, db: &Database) -> Tileset {
    let settings = &db.settings.tile;
    let f = db.frontier(b1, b2);
    let inv = f.inverse();

    let mut tileset = Tileset::new(TilesetKind::TwoCorners);

    tileset.place(0, 0, generate_corner(settings, b2, b1, Corner::BottomLeft, rng, &inv));
    tileset.place(0, 1, generate_cross(settings, b2, b1, rng, &inv));
    tileset.place(0, 2, generate_corner(settings, b2, b1, Corner::TopRight, rng, &inv));
    tileset.place(0, 3, generate_full(settings, b1));

    tileset.place(1, 0, generate_split(settings, b1, b2, Axis::Vertical, rng, &f));
    tileset.place(1, 1, generate_corner(settings, b1, b2, Corner::TopLeft, rng, &f));
    tileset.place(1, 2, generate_split(settings, b2, b1, Axis::Horizontal, rng, &inv));
    tileset.place(1, 3, generate_corner(settings, b2, b1, Corner::BottomRight, rng, &inv));

    tileset.place(2, 0, generate_corner(settings, b1, b2, Corner::TopRight, rng, &f));
    tileset.place(2, 1, generate_full(settings, b2));
    tileset.place(2, 2, generate_corner(settings, b1, b2, Corner::BottomLeft, rng, &f));
    tileset.place(2, 3, generate_cross(settings, b1, b2, rng, &f));

    tileset.place(3, 0, generate_split(settings, b1, b2, Axis::Horizontal, rng, &f));
    tileset.place(3, 1, generate_corner(settings, b1, b2, Corner::BottomRight, rng, &f));
    tileset.place(3, 2, generate_split(settings, b2, b1, Axis::Vertical, rng, &inv));
    tileset.place(3, 3, generate_corner(settings, b2, b1, Corner::TopLeft, rng, &inv));

    tileset
}

#[derive(Clone, Copy)]
enum TripleShape {
    L,
    Cross,
}

/// Role assignment of each column of the three-corner set.
const TRIPLE_COLUMNS: [(TripleShape, [usize; 3]); 9] = [
    (TripleShape::L, [0, 1, 2]),
    (TripleShape::L, [1, 2, 0]),
    (TripleShape::L, [2, 0, 1]),
    (TripleShape::L, [0, 2, 1]),
    (TripleShape::L, [2, 1, 0]),
    (TripleShape::L, [1, 0, 2]),
    (TripleShape::Cross, [0, 1, 2]),
    (TripleShape::Cross, [1, 2, 0]),
    (TripleShape::Cross, [2, 0, 1]),
];

/// The 36 tiles of the three-corner Wang set for `b1`, `b2` and `b3`.
///
/// Each column assigns the roles of a shape to the three biomes; row `q` holds
/// that tile turned `q` times.
pub fn generate_three_corners_wang_tileset(
    b1: BiomeId,
    b2: BiomeId,
    b3: BiomeId,
    rng: &mut impl Rng,
    db: &Database,
) -> Tileset {
    let settings = &db.settings.tile;
    let biomes = [b1, b2, b3];

    let mut tileset = Tileset::new(TilesetKind::ThreeCorners);

    for (col, (shape, roles)) in TRIPLE_COLUMNS.iter().enumerate() {
        let (r1, r2, r3) = (biomes[roles[0]], biomes[roles[1]], biomes[roles[2]]);

        // Rules are looked up in role order; swapped pairs come back inverted.
        let f12: Frontier = db.frontier(r1, r2);
        let f23: Frontier = db.frontier(r2, r3);
        let f31: Frontier = db.frontier(r3, r1);

        for quarters in 0..4 {
            let mut tile = match shape {
                TripleShape::L => generate_triple_l(settings, (r1, r2, r3), rng, &f12, &f23, &f31),
                TripleShape::Cross => generate_triple_cross(settings, (r1, r2, r3), rng, &f12, &f31),
            };

            tile.rotate(quarters);
            tileset.place(col, quarters as usize, tile);
        }
    }

    tileset
}

/// A 4x4 tileset of plain `b0` tiles.
pub fn generate_plain_tileset(b0: BiomeId, db: &Database) -> Tileset {
    let settings = &db.settings.tile;
    let mut tileset = Tileset::new(TilesetKind::Plain);

    for row in 0..tileset.rows() {
        for col in 0..tileset.columns() {
            tileset.place(col, row, generate_full(settings, b0));
        }
    }

    tileset
}
