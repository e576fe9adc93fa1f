//! Error types for the tile generator

use thiserror::Error;

/// Main error type for loading, generation and export
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Pixel ({x}, {y}) has no biome after region filling")]
    UnlabeledPixel { x: usize, y: usize },

    #[error("Tileset cell ({col}, {row}) was never generated")]
    MissingTile { col: usize, row: usize },

    #[error("Layout error: {0}")]
    Layout(String),
}

pub type Result<T> = std::result::Result<T, Error>;
