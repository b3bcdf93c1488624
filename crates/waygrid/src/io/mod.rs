//! Grid persistence: content-hash-validated save and load
//!
//! Grids are written as a small binary bundle (settings, flattened node
//! tuples, content hash string), optionally LZ4 compressed. On load the
//! embedded hash is compared against the hash of the caller's current
//! geometry; a mismatch is a cache miss, not an error, and signals that the
//! grid must be rebuilt.

mod compressor;
mod grid_file;
mod reader;
mod writer;

pub use compressor::{Compressor, Lz4Compressor};
pub use grid_file::{GridFile, NodeRecord};
pub use reader::GridFileReader;
pub use writer::GridFileWriter;

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use waygrid_common::{Error, Result};

use crate::context::{BuildContext, TimerCategory};
use crate::grid::Grid;

/// Magic number for grid files ('WGRD' in little-endian)
pub const GRID_FILE_MAGIC: u32 = 0x4452_4757;

/// Current grid file version
pub const GRID_FILE_VERSION: u32 = 1;

/// Flag bit: node payload is LZ4 compressed
pub const GRID_FLAG_COMPRESSION_LZ4: u32 = 0x1;

/// Saves a grid to `path` uncompressed
pub fn save(path: impl AsRef<Path>, grid: &Grid) -> Result<()> {
    save_with(path, grid, false, &mut BuildContext::new())
}

/// Saves a grid to `path` with an LZ4-compressed node payload
pub fn save_compressed(path: impl AsRef<Path>, grid: &Grid) -> Result<()> {
    save_with(path, grid, true, &mut BuildContext::new())
}

/// Saves a grid, logging failures into `ctx` before propagating them
pub fn save_with(
    path: impl AsRef<Path>,
    grid: &Grid,
    compress: bool,
    ctx: &mut BuildContext,
) -> Result<()> {
    let path = path.as_ref();
    ctx.start_timer(TimerCategory::Persistence);
    let result = (|| -> Result<()> {
        let file = File::create(path)?;
        let mut out = BufWriter::new(file);
        let grid_file = GridFile::from_grid(grid);
        let writer = if compress {
            GridFileWriter::with_compressor(Box::new(Lz4Compressor))
        } else {
            GridFileWriter::new()
        };
        writer.write(&mut out, &grid_file)
    })();

    ctx.stop_timer(TimerCategory::Persistence);

    if let Err(ref e) = result {
        ctx.error(format!("failed to save grid to {}: {e}", path.display()));
    }
    result
}

/// Loads a grid from `path`.
///
/// `Ok(None)` means the file's content hash does not match `expected_hash`
/// and the caller must rebuild from current geometry. I/O failures and
/// corrupt streams are errors, never silently mapped to `None`.
pub fn load(path: impl AsRef<Path>, expected_hash: Option<&str>) -> Result<Option<Grid>> {
    load_with(path, expected_hash, &mut BuildContext::new())
}

/// Loads a grid, logging failures into `ctx` before propagating them
pub fn load_with(
    path: impl AsRef<Path>,
    expected_hash: Option<&str>,
    ctx: &mut BuildContext,
) -> Result<Option<Grid>> {
    let path = path.as_ref();
    ctx.start_timer(TimerCategory::Persistence);
    let grid_file = (|| -> Result<GridFile> {
        let file = File::open(path)?;
        let mut input = BufReader::new(file);
        GridFileReader::new().read(&mut input)
    })();
    ctx.stop_timer(TimerCategory::Persistence);

    let grid_file = match grid_file {
        Ok(f) => f,
        Err(e) => {
            ctx.error(format!("failed to load grid from {}: {e}", path.display()));
            return Err(e);
        }
    };

    if let Some(expected) = expected_hash {
        if grid_file.content_hash != expected {
            ctx.warning(format!(
                "grid file {} has stale content hash ({} != {}), rebuild required",
                path.display(),
                grid_file.content_hash,
                expected
            ));
            return Ok(None);
        }
    }

    grid_file.into_grid().map(Some)
}

/// Async variant of [`save`], offloaded to a blocking task
pub async fn save_async(path: PathBuf, grid: Arc<Grid>) -> Result<()> {
    tokio::task::spawn_blocking(move || save(&path, &grid))
        .await
        .map_err(|e| Error::Background(e.to_string()))?
}

/// Async variant of [`load`], offloaded to a blocking task
pub async fn load_async(path: PathBuf, expected_hash: Option<String>) -> Result<Option<Grid>> {
    tokio::task::spawn_blocking(move || load(&path, expected_hash.as_deref()))
        .await
        .map_err(|e| Error::Background(e.to_string()))?
}
