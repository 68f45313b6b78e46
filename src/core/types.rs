// Basic types for the block graph

use std::fmt;

/// 256-bit hash (32 bytes), kept in internal byte order as it appears on disk.
/// Used for block header hashes, transaction IDs, and Merkle roots.
///
/// The conventional user-facing form reverses the 32 bytes; conversion
/// happens only at the boundary via `to_hex`/`from_hex`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Hash256(pub [u8; 32]);

impl Hash256 {
    /// Create a new Hash256 from a byte array (internal order)
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Create a Hash256 from a slice
    pub fn from_slice(slice: &[u8]) -> Result<Self, String> {
        if slice.len() != 32 {
            return Err(format!("Invalid hash length: expected 32, got {}", slice.len()));
        }
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(slice);
        Ok(Self(bytes))
    }

    /// Get the hash as a byte slice (internal order)
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// The all-zero sentinel hash (parent of the genesis block)
    pub fn zero() -> Self {
        Self([0u8; 32])
    }

    /// Check against the all-zero sentinel
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// Convert to display hex (reversed byte order, lowercase)
    pub fn to_hex(&self) -> String {
        let mut reversed = self.0;
        reversed.reverse();
        hex::encode(reversed)
    }

    /// Parse from display hex. The input must be exactly 64 hex characters;
    /// the decoded bytes are reversed back into internal order.
    pub fn from_hex(hex_str: &str) -> Result<Self, String> {
        if hex_str.len() != 64 {
            return Err(format!("Invalid hash length: expected 64 hex chars, got {}", hex_str.len()));
        }
        let bytes = hex::decode(hex_str)
            .map_err(|e| format!("Invalid hex string: {}", e))?;
        let mut hash = [0u8; 32];
        hash.copy_from_slice(&bytes);
        hash.reverse();
        Ok(Self(hash))
    }
}

impl fmt::Display for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}
