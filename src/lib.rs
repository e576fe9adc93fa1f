//! Wang tile generation library
//!
//! Re-exports modules for use by the `tilegen` binary and tools.

pub mod biomes;
pub mod border;
pub mod boundary;
pub mod catalog;
pub mod color;
pub mod database;
pub mod error;
pub mod export;
pub mod generator;
pub mod geometry;
pub mod grid;
pub mod region;
pub mod settings;
pub mod tile;
pub mod tileset;

pub use error::{Error, Result};
