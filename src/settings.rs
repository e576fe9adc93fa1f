//! Output settings read from the configuration file

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Tile geometry
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileSettings {
    /// Side of a tile in pixels
    pub size: usize,
    /// Margin replicated around each tile in the output image
    pub spacing: usize,
}

impl TileSettings {
    /// Side of a tile including its margins.
    pub fn extended_size(&self) -> usize {
        self.size + 2 * self.spacing
    }

    /// Anchor coordinate of the tile center line.
    pub fn half(&self) -> i32 {
        (self.size / 2) as i32
    }
}

impl Default for TileSettings {
    fn default() -> Self {
        Self { size: 32, spacing: 1 }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Name written into the exported tileset
    pub name: String,
    pub tile: TileSettings,
    /// Output image `[width, height]` in pixels
    pub image: [usize; 2],
}

impl Settings {
    pub fn image_width(&self) -> usize {
        self.image[0]
    }

    pub fn image_height(&self) -> usize {
        self.image[1]
    }

    /// Reject settings the shape catalog cannot honor.
    ///
    /// Boundary anchors are placed at `size / 2` and `size / 2 - 1`, which only
    /// splits a tile symmetrically when the size is even.
    pub fn validate(&self) -> Result<()> {
        if self.tile.size < 4 {
            return Err(Error::Config(format!("tile size must be at least 4, got {}", self.tile.size)));
        }

        if self.tile.size % 2 != 0 {
            return Err(Error::Config(format!("tile size must be even, got {}", self.tile.size)));
        }

        if self.image_width() == 0 || self.image_height() == 0 {
            return Err(Error::Config(format!(
                "image size must be positive, got {}x{}",
                self.image_width(),
                self.image_height()
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(size: usize, image: [usize; 2]) -> Settings {
        Settings {
            name: "test".to_string(),
            tile: TileSettings { size, spacing: 1 },
            image,
        }
    }

    #[test]
    fn test_extended_size() {
        let tile = TileSettings { size: 32, spacing: 1 };
        assert_eq!(tile.extended_size(), 34);
        assert_eq!(tile.half(), 16);
    }

    #[test]
    fn test_validate() {
        assert!(settings(32, [1024, 1024]).validate().is_ok());
        assert!(matches!(settings(31, [1024, 1024]).validate(), Err(Error::Config(_))));
        assert!(matches!(settings(2, [1024, 1024]).validate(), Err(Error::Config(_))));
        assert!(matches!(settings(32, [0, 1024]).validate(), Err(Error::Config(_))));
    }
}
