// Block-file ingestion: record walk over a byte source, plus the
// blkNNNNN.dat enumerator layered on top of it.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::chain::ChainIndex;
use crate::core::{Block, ByteReader, DecodeError};

/// Smallest prefix another record could occupy: magic + size field + header.
/// A file with fewer bytes left past the cursor holds no further records.
const RECORD_MIN_BYTES: usize = 4 + 4 + 80;

/// Errors that abort an ingest run.
///
/// The on-disk format has no resynchronization point, so any failure is
/// fatal for the whole run; the error carries enough context to point at
/// the offending file and record.
#[derive(Debug)]
pub enum IngestError {
    /// Failed to read a block file from disk
    Io { file: PathBuf, source: io::Error },
    /// A block record failed to decode
    Decode {
        source_name: String,
        offset: usize,
        kind: DecodeError,
    },
}

impl std::fmt::Display for IngestError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            IngestError::Io { file, source } => {
                write!(f, "Failed to read {}: {}", file.display(), source)
            }
            IngestError::Decode { source_name, offset, kind } => {
                write!(f, "{}: record at offset {}: {}", source_name, offset, kind)
            }
        }
    }
}

impl std::error::Error for IngestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IngestError::Io { source, .. } => Some(source),
            IngestError::Decode { kind, .. } => Some(kind),
        }
    }
}

/// Decode every block record in `data` and insert it into the index.
///
/// `source_name` labels the byte source in errors (a file name for on-disk
/// ingestion, any tag for in-memory sources). Records are walked back to
/// back; processing stops once fewer than 88 bytes remain past the cursor.
/// Returns the number of blocks ingested.
pub fn ingest_block_bytes(
    index: &mut ChainIndex,
    source_name: &str,
    data: &[u8],
) -> Result<usize, IngestError> {
    let mut reader = ByteReader::new(data);
    let mut count = 0;

    loop {
        let offset = reader.position();
        let block = Block::decode_record(&mut reader).map_err(|kind| IngestError::Decode {
            source_name: source_name.to_string(),
            offset,
            kind,
        })?;

        index.insert(block);
        count += 1;

        if reader.position() + RECORD_MIN_BYTES >= data.len() {
            break;
        }
    }

    Ok(count)
}

/// Load one block file into the index, returning the number of blocks read
pub fn load_block_file(index: &mut ChainIndex, path: &Path) -> Result<usize, IngestError> {
    let data = fs::read(path).map_err(|source| IngestError::Io {
        file: path.to_path_buf(),
        source,
    })?;

    let name = match path.file_name() {
        Some(name) => name.to_string_lossy().into_owned(),
        None => path.display().to_string(),
    };

    let count = ingest_block_bytes(index, &name, &data)?;
    log::info!("Parsed {}: {} blocks", name, count);

    Ok(count)
}

// blkNNNNN.dat, five-digit zero-padded ordinal
fn block_file_path(dir: &Path, ordinal: u32) -> PathBuf {
    dir.join(format!("blk{:05}.dat", ordinal))
}

/// Load every `blkNNNNN.dat` file in `dir`, in ascending ordinal order
/// starting at `blk00000.dat`, stopping at the first missing ordinal.
pub fn load_blocks_dir(dir: &Path) -> Result<ChainIndex, IngestError> {
    let mut index = ChainIndex::new();
    let mut ordinal = 0u32;

    loop {
        let path = block_file_path(dir, ordinal);
        if !path.is_file() {
            break;
        }

        load_block_file(&mut index, &path)?;
        ordinal += 1;
    }

    log::info!("Loaded {} blocks from {} files", index.block_count(), ordinal);
    Ok(index)
}
