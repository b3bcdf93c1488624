//! Binary writer for grid files

use byteorder::{LittleEndian, WriteBytesExt};
use std::io::Write;

use waygrid_common::Result;

use super::grid_file::{GridFile, NodeRecord};
use super::{Compressor, GRID_FILE_MAGIC, GRID_FILE_VERSION, GRID_FLAG_COMPRESSION_LZ4};

/// Writes grid files, optionally compressing the node payload
pub struct GridFileWriter {
    compressor: Option<Box<dyn Compressor>>,
}

impl Default for GridFileWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl GridFileWriter {
    /// Creates a writer producing uncompressed files
    pub fn new() -> Self {
        Self { compressor: None }
    }

    /// Creates a writer that compresses the node payload
    pub fn with_compressor(compressor: Box<dyn Compressor>) -> Self {
        Self {
            compressor: Some(compressor),
        }
    }

    /// Writes a grid file to `writer`
    pub fn write<W: Write>(&self, writer: &mut W, file: &GridFile) -> Result<()> {
        writer.write_u32::<LittleEndian>(GRID_FILE_MAGIC)?;
        writer.write_u32::<LittleEndian>(GRID_FILE_VERSION)?;

        let flags = if self.compressor.is_some() {
            GRID_FLAG_COMPRESSION_LZ4
        } else {
            0
        };
        writer.write_u32::<LittleEndian>(flags)?;

        writer.write_f32::<LittleEndian>(file.settings.cell_size)?;
        writer.write_f32::<LittleEndian>(file.settings.max_inclination)?;

        let hash = file.content_hash.as_bytes();
        writer.write_u32::<LittleEndian>(hash.len() as u32)?;
        writer.write_all(hash)?;

        let payload = encode_nodes(&file.nodes)?;
        let payload = match &self.compressor {
            Some(compressor) => compressor.compress(&payload)?,
            None => payload,
        };
        writer.write_u32::<LittleEndian>(payload.len() as u32)?;
        writer.write_all(&payload)?;

        Ok(())
    }
}

/// Flat node payload: count followed by state/cost/corner/center tuples
fn encode_nodes(nodes: &[NodeRecord]) -> Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(4 + nodes.len() * 66);
    buf.write_u32::<LittleEndian>(nodes.len() as u32)?;

    for node in nodes {
        buf.write_u8(node.state)?;
        buf.write_f32::<LittleEndian>(node.cost)?;
        for corner in [
            &node.north_east,
            &node.north_west,
            &node.south_west,
            &node.south_east,
            &node.center,
        ] {
            for &component in corner {
                buf.write_f32::<LittleEndian>(component)?;
            }
        }
    }

    Ok(buf)
}
