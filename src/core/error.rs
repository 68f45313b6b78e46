// Decode error types

use crate::core::Hash256;

/// Errors raised while decoding block records.
///
/// All of these are fatal for an ingest run: the on-disk format offers no
/// resynchronization point, so a failed record aborts the whole load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// A read ran past the end of the input buffer
    TruncatedInput { offset: usize, needed: usize },
    /// Record did not start with the mainnet magic number
    BadMagic { found: u32 },
    /// Parsed header + transactions disagree with the declared block size
    SizeMismatch { declared: u32, parsed: u64 },
    /// Merkle root over the ordered txids does not match the header field
    MerkleMismatch { computed: Hash256, expected: Hash256 },
    /// First byte of a CompactSize matched no known marker (defensive; the
    /// four-case marker switch covers every byte value)
    UnknownCompactSizeMarker { marker: u8 },
}

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            DecodeError::TruncatedInput { offset, needed } => {
                write!(f, "Truncated input: needed {} bytes at offset {}", needed, offset)
            }
            DecodeError::BadMagic { found } => {
                write!(f, "Bad magic number: 0x{:08x}", found)
            }
            DecodeError::SizeMismatch { declared, parsed } => {
                write!(f, "Block size mismatch: declared {} bytes, parsed {}", declared, parsed)
            }
            DecodeError::MerkleMismatch { computed, expected } => {
                write!(f, "Merkle root mismatch: computed {}, header says {}", computed, expected)
            }
            DecodeError::UnknownCompactSizeMarker { marker } => {
                write!(f, "Unknown CompactSize marker: 0x{:02x}", marker)
            }
        }
    }
}

impl std::error::Error for DecodeError {}
