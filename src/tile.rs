//! A single Wang tile: biome labels, colors and editor metadata

use std::collections::BTreeMap;

use rand::Rng;

use crate::biomes::{Biome, BiomeId, Border, Frontier, VOID};
use crate::border::blend_borders;
use crate::color::Color;
use crate::error::{Error, Result};
use crate::grid::Grid;
use crate::region::find_unlabeled;
use crate::settings::TileSettings;

pub const TERRAIN_TOP_LEFT: usize = 0;
pub const TERRAIN_TOP_RIGHT: usize = 1;
pub const TERRAIN_BOTTOM_LEFT: usize = 2;
pub const TERRAIN_BOTTOM_RIGHT: usize = 3;

/// No shape of the catalog needs more than two fences or borders.
pub const MAX_FENCES: usize = 2;
pub const MAX_BORDERS: usize = 2;

/// Tile edge
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    /// Edge this one lands on after a quarter turn of the tile.
    pub fn rotated(self) -> Direction {
        match self {
            Direction::Up => Direction::Left,
            Direction::Left => Direction::Down,
            Direction::Down => Direction::Right,
            Direction::Right => Direction::Up,
        }
    }

    /// One-letter code used in tileset properties.
    pub fn code(self) -> char {
        match self {
            Direction::Up => 'U',
            Direction::Right => 'R',
            Direction::Down => 'D',
            Direction::Left => 'L',
        }
    }
}

/// A barrier crossing the tile from edge `d1` to edge `d2`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fence {
    pub d1: Direction,
    pub d2: Direction,
}

impl Fence {
    pub fn new(d1: Direction, d2: Direction) -> Self {
        Self { d1, d2 }
    }

    pub fn rotated(self) -> Fence {
        Fence::new(self.d1.rotated(), self.d2.rotated())
    }

    /// Same pair of edges, regardless of order.
    pub fn spans(&self, other: &Fence) -> bool {
        (self.d1 == other.d1 && self.d2 == other.d2) || (self.d1 == other.d2 && self.d2 == other.d1)
    }
}

#[derive(Clone, Debug)]
pub struct Tile {
    pub size: usize,
    pub spacing: usize,
    /// Biome of each pixel, `BiomeId::INVALID` until a region claims it
    pub pixels: Grid<BiomeId>,
    /// Rendered colors, `spacing` cells larger than `pixels` on every side
    pub colors: Grid<Color>,
    /// Corner terrains, indexed by the `TERRAIN_*` constants
    pub terrain: [BiomeId; 4],
    /// Position in the exported tileset, set during export
    pub id: Option<u32>,
    fences: Vec<Fence>,
    borders: Vec<Border>,
}

impl Tile {
    /// An unlabeled tile.
    pub fn new(settings: &TileSettings) -> Self {
        Self::filled(settings, BiomeId::INVALID)
    }

    pub fn filled(settings: &TileSettings, biome: BiomeId) -> Self {
        let extended = settings.extended_size();

        Self {
            size: settings.size,
            spacing: settings.spacing,
            pixels: Grid::new_with(settings.size, settings.size, biome),
            colors: Grid::new_with(extended, extended, Color::TRANSPARENT),
            terrain: [BiomeId::INVALID; 4],
            id: None,
            fences: Vec::with_capacity(MAX_FENCES),
            borders: Vec::with_capacity(MAX_BORDERS),
        }
    }

    pub fn fences(&self) -> &[Fence] {
        &self.fences
    }

    pub fn borders(&self) -> &[Border] {
        &self.borders
    }

    pub fn push_fence(&mut self, d1: Direction, d2: Direction) {
        assert!(self.fences.len() < MAX_FENCES, "tile already has {MAX_FENCES} fences");
        self.fences.push(Fence::new(d1, d2));
    }

    /// Record the border of `frontier` unless its effect is `None`.
    pub fn push_border(&mut self, frontier: &Frontier) {
        if !frontier.has_border() {
            return;
        }

        assert!(self.borders.len() < MAX_BORDERS, "tile already has {MAX_BORDERS} borders");
        self.borders.push(frontier.border);
    }

    /// Label a pixel given in signed tile coordinates, ignoring positions
    /// outside the tile.
    pub fn paint(&mut self, x: i32, y: i32, biome: BiomeId) {
        if self.pixels.contains(x as i64, y as i64) {
            self.pixels.set(x as usize, y as usize, biome);
        }
    }

    /// Turn the tile by `quarters` quarter turns.
    ///
    /// Each turn moves the pixel at `(size-1-y, x)` to `(x, y)`, so the top
    /// right corner becomes the top left one. Corner terrains and fence edges
    /// follow the same turn. Colors and borders are left alone: rotate before
    /// colorizing.
    pub fn rotate(&mut self, quarters: u32) {
        let n = self.size;

        for _ in 0..quarters % 4 {
            for i in 0..n / 2 {
                let ip = n - 1 - i;

                for j in 0..(n + 1) / 2 {
                    let jp = n - 1 - j;

                    let tmp = *self.pixels.get(i, j);
                    self.pixels.set(i, j, *self.pixels.get(jp, i));
                    self.pixels.set(jp, i, *self.pixels.get(ip, jp));
                    self.pixels.set(ip, jp, *self.pixels.get(j, ip));
                    self.pixels.set(j, ip, tmp);
                }
            }

            let tmp = self.terrain[TERRAIN_TOP_LEFT];
            self.terrain[TERRAIN_TOP_LEFT] = self.terrain[TERRAIN_TOP_RIGHT];
            self.terrain[TERRAIN_TOP_RIGHT] = self.terrain[TERRAIN_BOTTOM_RIGHT];
            self.terrain[TERRAIN_BOTTOM_RIGHT] = self.terrain[TERRAIN_BOTTOM_LEFT];
            self.terrain[TERRAIN_BOTTOM_LEFT] = tmp;

            for fence in self.fences.iter_mut() {
                *fence = fence.rotated();
            }
        }
    }

    /// Render the pixel labels into colors, then blend the declared borders.
    ///
    /// Fails if a pixel was left unlabeled, which means a shape generator
    /// produced an incomplete topology.
    pub fn colorize(&mut self, biomes: &BTreeMap<BiomeId, Biome>, rng: &mut impl Rng) -> Result<()> {
        self.check_pixels()?;
        self.generate_colors(biomes, rng);
        self.fill_colors_margin();

        if !self.borders.is_empty() {
            self.colors = blend_borders(&self.pixels, &self.colors, &self.borders, self.spacing);
            self.fill_colors_margin();
        }

        Ok(())
    }

    fn check_pixels(&self) -> Result<()> {
        match find_unlabeled(&self.pixels) {
            Some((x, y)) => Err(Error::UnlabeledPixel { x, y }),
            None => Ok(()),
        }
    }

    fn generate_colors(&mut self, biomes: &BTreeMap<BiomeId, Biome>, rng: &mut impl Rng) {
        let mut warned = false;

        for (x, y) in self.pixels.positions() {
            let id = *self.pixels.get(x, y);

            let color = if id == VOID {
                Color::TRANSPARENT_WHITE
            } else if let Some(biome) = biomes.get(&id) {
                biome.pigment.color_at(rng, x as i32, y as i32)
            } else {
                if !warned {
                    log::warn!("Unknown biome id {} at position {},{}", id, x, y);
                    warned = true;
                }
                Color::TRANSPARENT_WHITE
            };

            self.colors.set(x + self.spacing, y + self.spacing, color);
        }
    }

    /// Copy the nearest interior color into every margin cell.
    fn fill_colors_margin(&mut self) {
        if self.spacing == 0 {
            return;
        }

        let first = self.spacing;
        let last = self.spacing + self.size - 1;
        let extended = self.colors.width;

        for y in 0..extended {
            for x in 0..extended {
                if (first..=last).contains(&x) && (first..=last).contains(&y) {
                    continue;
                }

                let color = *self.colors.get(x.clamp(first, last), y.clamp(first, last));
                self.colors.set(x, y, color);
            }
        }
    }
}
