//! Binary reader for grid files

use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{Cursor, Read};

use waygrid_common::{Error, Result};

use super::grid_file::{GridFile, NodeRecord};
use super::{
    Compressor, Lz4Compressor, GRID_FILE_MAGIC, GRID_FILE_VERSION, GRID_FLAG_COMPRESSION_LZ4,
};

use crate::settings::GridSettings;

/// Upper bound on the embedded hash string, to reject garbage length fields
/// before allocating
const MAX_HASH_LEN: u32 = 1024;

/// Serialized size of one node record: state byte, cost, 4 corners plus
/// center as 3 f32 each
const NODE_RECORD_SIZE: u64 = 1 + 4 + 5 * 3 * 4;

/// Reads grid files written by [`GridFileWriter`](super::GridFileWriter)
#[derive(Default)]
pub struct GridFileReader;

impl GridFileReader {
    /// Creates a new reader
    pub fn new() -> Self {
        Self
    }

    /// Reads a grid file from `reader`
    pub fn read<R: Read>(&self, reader: &mut R) -> Result<GridFile> {
        let magic = reader.read_u32::<LittleEndian>()?;
        if magic != GRID_FILE_MAGIC {
            return Err(Error::CorruptGridFile(format!(
                "bad magic number 0x{magic:08x}"
            )));
        }

        let version = reader.read_u32::<LittleEndian>()?;
        if version != GRID_FILE_VERSION {
            return Err(Error::CorruptGridFile(format!(
                "unsupported version {version}"
            )));
        }

        let flags = reader.read_u32::<LittleEndian>()?;

        let settings = GridSettings {
            cell_size: reader.read_f32::<LittleEndian>()?,
            max_inclination: reader.read_f32::<LittleEndian>()?,
        };

        let hash_len = reader.read_u32::<LittleEndian>()?;
        if hash_len > MAX_HASH_LEN {
            return Err(Error::CorruptGridFile(format!(
                "implausible hash length {hash_len}"
            )));
        }
        let mut hash_bytes = vec![0u8; hash_len as usize];
        reader.read_exact(&mut hash_bytes)?;
        let content_hash = String::from_utf8(hash_bytes)
            .map_err(|_| Error::CorruptGridFile("hash string is not UTF-8".to_string()))?;

        // A corrupt length field must fail on the short read, not by sizing
        // an allocation to whatever the file claims.
        let payload_len = u64::from(reader.read_u32::<LittleEndian>()?);
        let mut payload = Vec::new();
        reader.take(payload_len).read_to_end(&mut payload)?;
        if payload.len() as u64 != payload_len {
            return Err(Error::CorruptGridFile(format!(
                "payload truncated: expected {payload_len} bytes, got {}",
                payload.len()
            )));
        }

        if flags & GRID_FLAG_COMPRESSION_LZ4 != 0 {
            payload = Lz4Compressor
                .decompress(&payload)
                .map_err(|e| Error::CorruptGridFile(format!("payload decompression: {e}")))?;
        }

        let nodes = decode_nodes(&payload)?;

        Ok(GridFile {
            settings,
            nodes,
            content_hash,
        })
    }
}

fn decode_nodes(payload: &[u8]) -> Result<Vec<NodeRecord>> {
    let mut cursor = Cursor::new(payload);
    let count = cursor.read_u32::<LittleEndian>()?;
    if (payload.len() as u64) < 4 + u64::from(count) * NODE_RECORD_SIZE {
        return Err(Error::CorruptGridFile(format!(
            "implausible node count {count} for a {}-byte payload",
            payload.len()
        )));
    }

    let mut nodes = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let state = cursor.read_u8()?;
        let cost = cursor.read_f32::<LittleEndian>()?;

        let mut points = [[0f32; 3]; 5];
        for point in &mut points {
            for component in point.iter_mut() {
                *component = cursor.read_f32::<LittleEndian>()?;
            }
        }

        nodes.push(NodeRecord {
            state,
            cost,
            north_east: points[0],
            north_west: points[1],
            south_west: points[2],
            south_east: points[3],
            center: points[4],
        });
    }

    Ok(nodes)
}
