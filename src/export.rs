//! Export of colorized tilesets to a PNG atlas and a Tiled `.tsx` descriptor

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use image::{Rgba, RgbaImage};

use crate::color::Color;
use crate::database::Database;
use crate::error::{Error, Result};
use crate::grid::Grid;
use crate::settings::Settings;
use crate::tile::Fence;
use crate::tileset::Tileset;

/// Where the next group of tilesets starts in the atlas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ImageContext {
    pub starting_pixel_row: usize,
}

/// Blit a group of tilesets of one kind into `image` and assign tile ids.
///
/// Tilesets flow left to right and wrap at the image width. The group starts
/// at `ctx.starting_pixel_row`, which is then moved below it. A tile's id is
/// its row-major index among all tile slots of the image.
pub fn export_tilesets_to_image(
    tilesets: &mut [Tileset],
    settings: &Settings,
    image: &mut Grid<Color>,
    ctx: &mut ImageContext,
) -> Result<()> {
    let Some(first) = tilesets.first() else {
        return Ok(());
    };

    let kind = first.kind;
    let (columns, rows) = kind.dimensions();
    let ext = settings.tile.extended_size();

    let tilesets_per_row = image.width / (ext * columns);
    let tiles_per_row = image.width / ext;

    if tilesets_per_row == 0 {
        return Err(Error::Layout(format!(
            "a {}x{} tileset does not fit in an image {} pixels wide",
            columns, rows, image.width
        )));
    }

    let number_of_rows = (tilesets.len() - 1) / tilesets_per_row + 1;
    let bottom = ctx.starting_pixel_row + number_of_rows * rows * ext;

    if bottom > image.height {
        return Err(Error::Layout(format!(
            "tilesets need {} pixel rows but the image has {}",
            bottom, image.height
        )));
    }

    let id_offset = (ctx.starting_pixel_row / ext) * tiles_per_row;

    for (index, tileset) in tilesets.iter_mut().enumerate() {
        if tileset.kind != kind {
            return Err(Error::Layout(format!(
                "tileset {} is {:?}, expected {:?} like the rest of its group",
                index, tileset.kind, kind
            )));
        }

        let tileset_col = index % tilesets_per_row;
        let tileset_row = index / tilesets_per_row;
        let id_tileset = tileset_row * rows * tiles_per_row + tileset_col * columns;

        for (col, row, tile) in tileset.tiles_mut() {
            let x0 = (tileset_col * columns + col) * ext;
            let y0 = ctx.starting_pixel_row + (tileset_row * rows + row) * ext;

            for (x, y, color) in tile.colors.iter() {
                image.set(x0 + x, y0 + y, *color);
            }

            tile.id = Some((id_offset + id_tileset + row * tiles_per_row + col) as u32);
        }
    }

    log::debug!("Placed {} {:?} tilesets, next row band at pixel {}", tilesets.len(), kind, bottom);
    ctx.starting_pixel_row = bottom;
    Ok(())
}

pub fn save_image(image: &Grid<Color>, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let mut img = RgbaImage::new(image.width as u32, image.height as u32);

    for (x, y, color) in image.iter() {
        img.put_pixel(x as u32, y as u32, Rgba(color.to_rgba8()));
    }

    img.save(path)?;
    log::info!("Saved atlas to {}", path.display());
    Ok(())
}

/// Editor metadata of one exported tile.
#[derive(Clone, Debug, PartialEq)]
pub struct Terrain {
    /// Terrain index of each corner, `None` for Void or unknown biomes
    pub indices: [Option<usize>; 4],
    pub fences: Vec<Fence>,
}

/// Terrains keyed by tile id
pub type Terrains = BTreeMap<u32, Terrain>;

/// Collect the terrain metadata of exported tiles.
///
/// Tiles without an id (not yet exported) are skipped.
pub fn export_tilesets_to_terrains(tilesets: &[Tileset], db: &Database, terrains: &mut Terrains) {
    for tileset in tilesets {
        for (_, _, tile) in tileset.tiles() {
            let Some(id) = tile.id else {
                log::warn!("Tile has no id, was it exported to the image?");
                continue;
            };

            let terrain = Terrain {
                indices: tile.terrain.map(|biome| db.index_of(biome)),
                fences: tile.fences().to_vec(),
            };

            if terrains.insert(id, terrain).is_some() {
                log::warn!("Duplicate index: {}", id);
            }
        }
    }
}

/// Id of the first tile whose four corners are all `index`.
fn find_terrain_tile(terrains: &Terrains, index: usize) -> Option<u32> {
    terrains
        .iter()
        .find(|(_, terrain)| terrain.indices == [Some(index); 4])
        .map(|(id, _)| *id)
}

fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());

    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }

    escaped
}

/// Write the Tiled tileset descriptor for an atlas stored at `image_source`.
pub fn write_terrains(terrains: &Terrains, db: &Database, image_source: &str, out: &mut impl Write) -> Result<()> {
    let settings = &db.settings;
    let ext = settings.tile.extended_size();
    let columns = settings.image_width() / ext;
    let tile_count = columns * (settings.image_height() / ext);

    writeln!(out, "<?xml version=\"1.0\" encoding=\"UTF-8\"?>")?;
    writeln!(
        out,
        "<tileset name=\"{}\" tilewidth=\"{}\" tileheight=\"{}\" tilecount=\"{}\" columns=\"{}\" spacing=\"{}\" margin=\"{}\">",
        escape(&settings.name),
        settings.tile.size,
        settings.tile.size,
        tile_count,
        columns,
        settings.tile.spacing * 2,
        settings.tile.spacing
    )?;
    writeln!(
        out,
        "<image source=\"{}\" width=\"{}\" height=\"{}\"/>",
        escape(image_source),
        settings.image_width(),
        settings.image_height()
    )?;

    writeln!(out, "<terraintypes>")?;

    for biome in db.biomes_by_index() {
        let tile = find_terrain_tile(terrains, biome.index).map_or(-1, i64::from);
        writeln!(out, "\t<terrain name=\"{}\" tile=\"{}\"/>", escape(&biome.name), tile)?;
    }

    writeln!(out, "</terraintypes>")?;

    for (id, terrain) in terrains {
        let indices: Vec<String> = terrain
            .indices
            .iter()
            .map(|index| index.map(|i| i.to_string()).unwrap_or_default())
            .collect();

        write!(out, "<tile id=\"{}\" terrain=\"{}\"", id, indices.join(","))?;

        if terrain.fences.is_empty() {
            writeln!(out, "/>")?;
            continue;
        }

        writeln!(out, ">")?;
        writeln!(out, "\t<properties>")?;
        writeln!(
            out,
            "\t\t<property name=\"fence_count\" type=\"int\" value=\"{}\" />",
            terrain.fences.len()
        )?;

        for (i, fence) in terrain.fences.iter().enumerate() {
            writeln!(
                out,
                "\t\t<property name=\"fence{}\" value=\"{}{}\"/>",
                i,
                fence.d1.code(),
                fence.d2.code()
            )?;
        }

        writeln!(out, "\t</properties>")?;
        writeln!(out, "</tile>")?;
    }

    writeln!(out, "</tileset>")?;
    Ok(())
}

/// Write the `.tsx` descriptor to `path`.
pub fn save_terrains(terrains: &Terrains, db: &Database, image_source: &str, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let mut out = BufWriter::new(File::create(path)?);
    write_terrains(terrains, db, image_source, &mut out)?;
    out.flush()?;

    log::info!("Saved tileset to {}", path.display());
    Ok(())
}
