// Block data structures and the record decoder

use crate::core::{ByteReader, DecodeError, Hash256, Transaction, hash256};

/// Mainnet magic number, first field of every on-disk block record
pub const MAINNET_MAGIC: u32 = 0xD9B4_BEF9;

/// Block header - 80 bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockHeader {
    /// Block version
    pub version: u32,
    /// Hash of the previous block's header (internal order)
    pub prev_block_hash: Hash256,
    /// Merkle root of all transactions in the block (internal order)
    pub merkle_root: Hash256,
    /// Block timestamp (Unix epoch)
    pub timestamp: u32,
    /// Difficulty target (compact format)
    pub bits: u32,
    /// Nonce for proof-of-work
    pub nonce: u32,
}

impl BlockHeader {
    /// Decode the 80-byte header
    pub fn decode(r: &mut ByteReader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            version: r.read_u32_le()?,
            prev_block_hash: r.read_hash32()?,
            merkle_root: r.read_hash32()?,
            timestamp: r.read_u32_le()?,
            bits: r.read_u32_le()?,
            nonce: r.read_u32_le()?,
        })
    }

    /// Serialize the block header (always 80 bytes)
    pub fn serialize(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(80);
        buf.extend_from_slice(&self.version.to_le_bytes());
        buf.extend_from_slice(self.prev_block_hash.as_bytes());
        buf.extend_from_slice(self.merkle_root.as_bytes());
        buf.extend_from_slice(&self.timestamp.to_le_bytes());
        buf.extend_from_slice(&self.bits.to_le_bytes());
        buf.extend_from_slice(&self.nonce.to_le_bytes());
        buf
    }

    /// Calculate the hash of this block header (the block's identity)
    pub fn hash(&self) -> Hash256 {
        hash256(&self.serialize())
    }
}

/// Compute the Merkle root over an ordered list of txids (internal order).
///
/// Pairs are concatenated raw and double-SHA256 hashed; an odd level
/// duplicates its last element.
pub fn merkle_root(txids: &[Hash256]) -> Hash256 {
    if txids.is_empty() {
        return Hash256::zero();
    }

    let mut level: Vec<Hash256> = txids.to_vec();
    while level.len() > 1 {
        let mut next_level = Vec::with_capacity(level.len() / 2 + 1);

        for chunk in level.chunks(2) {
            let left = chunk[0];
            let right = if chunk.len() == 2 { chunk[1] } else { chunk[0] };

            let mut combined = Vec::with_capacity(64);
            combined.extend_from_slice(left.as_bytes());
            combined.extend_from_slice(right.as_bytes());
            next_level.push(hash256(&combined));
        }

        level = next_level;
    }

    level[0]
}

/// A fully-decoded block.
///
/// `height` and `main_chain` start unset and are assigned exactly once by
/// the chain resolver; everything else is immutable after decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Block header
    pub header: BlockHeader,
    /// Transactions in this block
    pub transactions: Vec<Transaction>,
    header_hash: Hash256,
    height: u32,
    main_chain: bool,
}

impl Block {
    /// Decode one on-disk block record: magic, declared size, header,
    /// transaction list.
    ///
    /// The declared size is checked against the bytes actually parsed and
    /// the Merkle root is recomputed over the decoded txids; either mismatch
    /// indicates corruption and fails the decode.
    pub fn decode_record(r: &mut ByteReader<'_>) -> Result<Self, DecodeError> {
        let magic = r.read_u32_le()?;
        if magic != MAINNET_MAGIC {
            return Err(DecodeError::BadMagic { found: magic });
        }

        let block_size = r.read_u32_le()?;
        let header_start = r.position();

        let header = BlockHeader::decode(r)?;

        let (tx_count, _) = r.read_compact_size()?;
        let mut transactions = Vec::with_capacity(tx_count as usize);
        for _ in 0..tx_count {
            transactions.push(Transaction::decode(r)?);
        }

        let parsed = (r.position() - header_start) as u64;
        if parsed != block_size as u64 {
            return Err(DecodeError::SizeMismatch { declared: block_size, parsed });
        }

        let txids: Vec<Hash256> = transactions.iter().map(|tx| tx.txid).collect();
        let computed = merkle_root(&txids);
        if computed != header.merkle_root {
            return Err(DecodeError::MerkleMismatch {
                computed,
                expected: header.merkle_root,
            });
        }

        let header_hash = header.hash();

        Ok(Self {
            header,
            transactions,
            header_hash,
            height: 0,
            main_chain: false,
        })
    }

    /// The double SHA256 of the 80-byte header (internal order)
    pub fn header_hash(&self) -> Hash256 {
        self.header_hash
    }

    /// Hash of the previous block's header
    pub fn prev_block_hash(&self) -> Hash256 {
        self.header.prev_block_hash
    }

    /// Check if this block's parent is the all-zero sentinel
    pub fn is_genesis(&self) -> bool {
        self.header.prev_block_hash.is_zero()
    }

    /// Chain height assigned by the resolver (genesis is 0)
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Whether the resolver placed this block on the longest chain
    pub fn is_main_chain(&self) -> bool {
        self.main_chain
    }

    pub(crate) fn set_height(&mut self, height: u32) {
        self.height = height;
    }

    pub(crate) fn set_main_chain(&mut self) {
        self.main_chain = true;
    }
}
