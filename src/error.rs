//! Error types shared by every pipeline stage

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TartanError {
    #[error("Pattern configuration not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Invalid JSON configuration: {0}")]
    MalformedInput(String),

    #[error("{0}")]
    InvalidConfig(String),

    #[error("{0}")]
    InvalidOutputPath(String),

    #[error("Tile grid too large: {0}")]
    TileGrid(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Rasterization failed: {0}")]
    Raster(String),

    #[error("PNG output requested but this build has no rasterizer (enable the `png` feature)")]
    RasterUnavailable,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TartanError>;
