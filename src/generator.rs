//! Whole-database generation pipeline
//!
//! Tilesets are generated stage by stage (duos, trios, overlays, then the
//! optional plain sets) and only then colorized in the same order, so a given
//! seed always draws the same random numbers for the same configuration.

use std::path::Path;

use rand::Rng;

use crate::biomes::VOID;
use crate::color::Color;
use crate::database::Database;
use crate::error::Result;
use crate::export::{
    export_tilesets_to_image, export_tilesets_to_terrains, save_image, save_terrains, ImageContext, Terrains,
};
use crate::grid::Grid;
use crate::tileset::{
    generate_plain_tileset, generate_three_corners_wang_tileset, generate_two_corners_wang_tileset, Tileset,
};

#[derive(Clone, Debug, Default)]
pub struct GeneratedTilesets {
    pub wang2: Vec<Tileset>,
    pub wang3: Vec<Tileset>,
    pub overlays: Vec<Tileset>,
    pub plain: Vec<Tileset>,
}

impl GeneratedTilesets {
    fn stages_mut(&mut self) -> [&mut Vec<Tileset>; 4] {
        [&mut self.wang2, &mut self.wang3, &mut self.overlays, &mut self.plain]
    }

    fn stages(&self) -> [&Vec<Tileset>; 4] {
        [&self.wang2, &self.wang3, &self.overlays, &self.plain]
    }

    pub fn len(&self) -> usize {
        self.stages().iter().map(|stage| stage.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Progress label of each stage, `"(n/m)"`. Plain sets are a fourth stage
/// only when requested.
fn stage_labels(include_plain: bool) -> Vec<String> {
    let count = if include_plain { 4 } else { 3 };
    (1..=count).map(|stage| format!("({}/{})", stage, count)).collect()
}

/// Generate and colorize every tileset the database describes.
pub fn generate_tilesets(db: &Database, rng: &mut impl Rng, include_plain: bool) -> Result<GeneratedTilesets> {
    let labels = stage_labels(include_plain);
    let mut generated = GeneratedTilesets::default();

    log::info!("Computing tiles {}...", labels[0]);
    for duo in &db.duos {
        generated.wang2.push(generate_two_corners_wang_tileset(duo.b1, duo.b2, rng, db));
    }

    log::info!("Computing tiles {}...", labels[1]);
    for trio in &db.trios {
        generated
            .wang3
            .push(generate_three_corners_wang_tileset(trio.b1, trio.b2, trio.b3, rng, db));
    }

    log::info!("Computing tiles {}...", labels[2]);
    for overlay in &db.overlays {
        generated
            .overlays
            .push(generate_two_corners_wang_tileset(overlay.b0, VOID, rng, db));
    }

    if include_plain {
        log::info!("Computing tiles {}...", labels[3]);
        for biome in db.biomes_by_index() {
            generated.plain.push(generate_plain_tileset(biome.id, db));
        }
    }

    for (label, tilesets) in labels.iter().zip(generated.stages_mut()) {
        log::info!("Computing colors {}...", label);

        for tileset in tilesets.iter_mut() {
            tileset.colorize(&db.biomes, rng)?;
        }
    }

    log::debug!("Generated {} tilesets", generated.len());
    Ok(generated)
}

/// Lay every stage out in one atlas and collect the terrain metadata.
pub fn export_tilesets(generated: &mut GeneratedTilesets, db: &Database) -> Result<(Grid<Color>, Terrains)> {
    let mut image = Grid::new_with(db.settings.image_width(), db.settings.image_height(), Color::TRANSPARENT);
    let mut ctx = ImageContext::default();

    for tilesets in generated.stages_mut() {
        export_tilesets_to_image(tilesets, &db.settings, &mut image, &mut ctx)?;
    }

    let mut terrains = Terrains::new();

    for tilesets in generated.stages() {
        export_tilesets_to_terrains(tilesets, db, &mut terrains);
    }

    Ok((image, terrains))
}

/// Generate everything and write the atlas and its `.tsx` descriptor.
///
/// The descriptor references the atlas by file name, so both are expected to
/// live side by side.
pub fn run_pipeline(
    db: &Database,
    rng: &mut impl Rng,
    include_plain: bool,
    image_path: &Path,
    tileset_path: &Path,
) -> Result<()> {
    let mut generated = generate_tilesets(db, rng, include_plain)?;

    log::info!("Computing biome image...");
    let (image, terrains) = export_tilesets(&mut generated, db)?;

    log::info!("Generating biome image...");
    save_image(&image, image_path)?;

    let source = image_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| image_path.display().to_string());

    log::info!("Generating biome tileset...");
    save_terrains(&terrains, db, &source, tileset_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_database;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_generate_counts() {
        let db = sample_database();
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let generated = generate_tilesets(&db, &mut rng, false).unwrap();

        assert_eq!(generated.wang2.len(), 3);
        assert_eq!(generated.wang3.len(), 1);
        assert_eq!(generated.overlays.len(), 1);
        assert!(generated.plain.is_empty());
        assert_eq!(generated.len(), 5);

        let with_plain = generate_tilesets(&db, &mut rng, true).unwrap();
        assert_eq!(with_plain.plain.len(), 3);
    }

    #[test]
    fn test_stage_labels_share_one_count() {
        assert_eq!(stage_labels(false), vec!["(1/3)", "(2/3)", "(3/3)"]);
        assert_eq!(stage_labels(true), vec!["(1/4)", "(2/4)", "(3/4)", "(4/4)"]);
    }

    #[test]
    fn test_same_seed_same_atlas() {
        let db = sample_database();

        let render = |seed: u64| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut generated = generate_tilesets(&db, &mut rng, false).unwrap();
            export_tilesets(&mut generated, &db).unwrap()
        };

        let (image_a, terrains_a) = render(17);
        let (image_b, terrains_b) = render(17);

        assert_eq!(image_a, image_b);
        assert_eq!(terrains_a, terrains_b);
    }

    #[test]
    fn test_stages_get_their_own_rows() {
        let db = sample_database();
        let mut rng = ChaCha8Rng::seed_from_u64(2);

        let mut generated = generate_tilesets(&db, &mut rng, false).unwrap();
        let (_, terrains) = export_tilesets(&mut generated, &db).unwrap();

        // 3 duo sets fit on one band of 4 tile rows; the trio set starts below.
        assert_eq!(generated.wang3[0].tile(0, 0).unwrap().id, Some(4 * 16));
        assert_eq!(generated.overlays[0].tile(0, 0).unwrap().id, Some(8 * 16));
        assert_eq!(terrains.len(), 3 * 16 + 36 + 16);
    }

    #[test]
    fn test_run_pipeline_writes_files() {
        let db = sample_database();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let dir = tempfile::tempdir().unwrap();
        let image_path = dir.path().join("biomes.png");
        let tileset_path = dir.path().join("biomes.tsx");

        run_pipeline(&db, &mut rng, true, &image_path, &tileset_path).unwrap();

        let atlas = image::open(&image_path).unwrap();
        assert_eq!((atlas.width(), atlas.height()), (288, 288));

        let tsx = std::fs::read_to_string(&tileset_path).unwrap();
        assert!(tsx.contains("<image source=\"biomes.png\""));
        assert!(tsx.contains("<terrain name=\"Sand\""));
    }
}
