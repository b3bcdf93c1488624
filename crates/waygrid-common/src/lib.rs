//! Common utilities and data structures used by the waygrid builder and query crates

mod geometry;
mod hash;
mod vector;

pub use geometry::*;
pub use hash::*;
pub use vector::*;

/// Represents a 3D position
pub type Vec3 = glam::Vec3;

/// Error types for the library
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid input geometry: {0}")]
    InvalidGeometry(String),

    #[error("grid generation failed: {0}")]
    GridGeneration(String),

    #[error("grid file is corrupt: {0}")]
    CorruptGridFile(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("background task failed: {0}")]
    Background(String),
}

/// Result type for waygrid operations
pub type Result<T> = std::result::Result<T, Error>;
