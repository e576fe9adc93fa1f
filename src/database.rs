//! Biome database loaded from a JSON configuration file
//!
//! The file lists the biomes (keyed by their terrain index), the pairs of
//! biomes that share a frontier ("duos"), the triples that meet in a single
//! tile ("trios") and the biomes drawn over transparency ("overlays").

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::biomes::{Biome, BiomeId, Border, BorderEffect, Frontier, Pigment, PigmentStyle, VOID};
use crate::color::Color;
use crate::error::{Error, Result};
use crate::settings::Settings;

#[derive(Clone, Debug, PartialEq)]
pub struct BiomeDuo {
    pub b1: BiomeId,
    pub b2: BiomeId,
    pub frontier: Frontier,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BiomeTrio {
    pub b1: BiomeId,
    pub b2: BiomeId,
    pub b3: BiomeId,
}

/// A biome blended over Void.
#[derive(Clone, Debug, PartialEq)]
pub struct BiomeOverlay {
    pub b0: BiomeId,
    pub frontier: Frontier,
}

#[derive(Clone, Debug)]
pub struct Database {
    pub settings: Settings,
    pub biomes: BTreeMap<BiomeId, Biome>,
    pub duos: Vec<BiomeDuo>,
    pub trios: Vec<BiomeTrio>,
    pub overlays: Vec<BiomeOverlay>,
}

// -----------------------------------------------------------------------------
// File format
// -----------------------------------------------------------------------------

#[derive(Deserialize)]
struct RawDatabase {
    settings: Settings,
    biomes: BTreeMap<String, RawBiome>,
    #[serde(default)]
    duos: Vec<RawDuo>,
    #[serde(default)]
    trios: Vec<[String; 3]>,
    #[serde(default)]
    overlays: Vec<RawOverlay>,
}

#[derive(Deserialize)]
struct RawBiome {
    id: String,
    color: [u8; 4],
    pigment: RawPigment,
}

#[derive(Deserialize)]
struct RawPigment {
    style: String,
    ratio: Option<f64>,
    deviation: Option<f32>,
}

#[derive(Deserialize)]
struct RawBorder {
    effect: String,
}

#[derive(Deserialize)]
struct RawFrontier {
    #[serde(default)]
    offset: i32,
    border: Option<RawBorder>,
    #[serde(default)]
    fence: bool,
}

#[derive(Deserialize)]
struct RawDuo {
    biomes: [String; 2],
    #[serde(flatten)]
    frontier: RawFrontier,
}

#[derive(Deserialize)]
struct RawOverlay {
    biome: String,
    #[serde(flatten)]
    frontier: RawFrontier,
}

fn parse_border_effect(effect: &str) -> BorderEffect {
    match effect {
        "none" => BorderEffect::None,
        "fade" => BorderEffect::Fade,
        "outline" => BorderEffect::Outline,
        "sharpen" => BorderEffect::Sharpen,
        "blur" => BorderEffect::Blur,
        _ => {
            log::warn!("Unknown border effect attribute: {}", effect);
            BorderEffect::None
        }
    }
}

fn parse_pigment_style(name: &str, raw: &RawPigment) -> Result<PigmentStyle> {
    match raw.style.as_str() {
        "plain" => Ok(PigmentStyle::Plain),
        "randomize" => match (raw.ratio, raw.deviation) {
            (Some(_), Some(deviation)) if !(deviation.is_finite() && deviation >= 0.0) => {
                Err(Error::Config(format!(
                    "biome '{}': randomize 'deviation' must be a non-negative number, got {}",
                    name, deviation
                )))
            }
            (Some(ratio), Some(deviation)) => Ok(PigmentStyle::Randomize { ratio, deviation }),
            _ => Err(Error::Config(format!(
                "biome '{}': randomize pigment needs 'ratio' and 'deviation'",
                name
            ))),
        },
        "striped" => Ok(PigmentStyle::Striped),
        other => {
            log::warn!("Unknown pigment style attribute: {}", other);
            Ok(PigmentStyle::Plain)
        }
    }
}

/// Id of a biome named in a rule. Unknown names are kept so generation can
/// go on; their pixels end up transparent.
fn resolve(biomes: &BTreeMap<BiomeId, Biome>, name: &str) -> BiomeId {
    let id = BiomeId::from_name(name);

    if !biomes.contains_key(&id) {
        log::warn!("Unknown id: {}", name);
    }

    id
}

fn parse_frontier(raw: &RawFrontier, b1: BiomeId, b2: BiomeId) -> Frontier {
    let effect = raw
        .border
        .as_ref()
        .map(|border| parse_border_effect(&border.effect))
        .unwrap_or_default();

    Frontier {
        offset: raw.offset,
        border: Border { effect, b1, b2 },
        fence: raw.fence,
    }
}

// -----------------------------------------------------------------------------
// Database
// -----------------------------------------------------------------------------

impl Database {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        log::info!("Loading biome database from {}", path.display());

        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let raw: RawDatabase = serde_json::from_str(content)?;
        raw.settings.validate()?;

        let mut biomes = BTreeMap::new();

        for (key, value) in &raw.biomes {
            let index: usize = key
                .parse()
                .map_err(|_| Error::Config(format!("biome key '{}' is not an index", key)))?;

            let id = BiomeId::from_name(&value.id);

            if id == VOID {
                return Err(Error::Config("'Void' is reserved and cannot be a biome".to_string()));
            }

            let biome = Biome {
                id,
                name: value.id.clone(),
                pigment: Pigment {
                    color: Color::from_rgba8(value.color),
                    style: parse_pigment_style(&value.id, &value.pigment)?,
                },
                index,
            };

            if biomes.insert(id, biome).is_some() {
                return Err(Error::Config(format!("biome '{}' is defined twice", value.id)));
            }
        }

        let mut indices: Vec<usize> = biomes.values().map(|biome| biome.index).collect();
        indices.sort_unstable();

        if indices.iter().enumerate().any(|(expected, index)| expected != *index) {
            return Err(Error::Config(format!(
                "biome indices must be contiguous from 0, got {:?}",
                indices
            )));
        }

        let check = |name: &str| resolve(&biomes, name);

        let duos: Vec<BiomeDuo> = raw
            .duos
            .iter()
            .map(|duo| {
                let b1 = check(duo.biomes[0].as_str());
                let b2 = check(duo.biomes[1].as_str());

                BiomeDuo {
                    b1,
                    b2,
                    frontier: parse_frontier(&duo.frontier, b1, b2),
                }
            })
            .collect();

        let trios: Vec<BiomeTrio> = raw
            .trios
            .iter()
            .map(|[b1, b2, b3]| BiomeTrio {
                b1: check(b1.as_str()),
                b2: check(b2.as_str()),
                b3: check(b3.as_str()),
            })
            .collect();

        let overlays: Vec<BiomeOverlay> = raw
            .overlays
            .iter()
            .map(|overlay| {
                let b0 = check(overlay.biome.as_str());

                BiomeOverlay {
                    b0,
                    frontier: parse_frontier(&overlay.frontier, b0, VOID),
                }
            })
            .collect();

        log::info!(
            "Loaded {} biomes, {} duos, {} trios, {} overlays",
            biomes.len(),
            duos.len(),
            trios.len(),
            overlays.len()
        );

        Ok(Self {
            settings: raw.settings,
            biomes,
            duos,
            trios,
            overlays,
        })
    }

    /// Frontier from `b1` to `b2`.
    ///
    /// Rules are declared once per pair; asking for the reverse order returns
    /// the inverse frontier. Pairs with Void are answered by the overlays.
    /// Unknown pairs get a frontier with no offset, fence or effect.
    pub fn frontier(&self, b1: BiomeId, b2: BiomeId) -> Frontier {
        if b1 == VOID || b2 == VOID {
            for overlay in &self.overlays {
                if overlay.b0 == b1 {
                    return overlay.frontier;
                }

                if overlay.b0 == b2 {
                    return overlay.frontier.inverse();
                }
            }
        } else {
            for duo in &self.duos {
                if duo.b1 == b1 && duo.b2 == b2 {
                    return duo.frontier;
                }

                if duo.b1 == b2 && duo.b2 == b1 {
                    return duo.frontier.inverse();
                }
            }
        }

        Frontier::default()
    }

    /// Terrain index of a biome; `None` for Void and unknown ids.
    pub fn index_of(&self, biome: BiomeId) -> Option<usize> {
        if biome == VOID {
            return None;
        }

        match self.biomes.get(&biome) {
            Some(found) => Some(found.index),
            None => {
                log::warn!("Unknown biome id: {}", biome);
                None
            }
        }
    }

    pub fn biomes(&self) -> &BTreeMap<BiomeId, Biome> {
        &self.biomes
    }

    pub fn biome(&self, biome: BiomeId) -> Option<&Biome> {
        self.biomes.get(&biome)
    }

    /// Biomes sorted by terrain index.
    pub fn biomes_by_index(&self) -> Vec<&Biome> {
        let mut sorted: Vec<&Biome> = self.biomes.values().collect();
        sorted.sort_by_key(|biome| biome.index);
        sorted
    }
}
