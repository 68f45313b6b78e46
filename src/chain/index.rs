// In-memory block graph keyed by parent header hash

use std::collections::HashMap;

use crate::core::{Block, Hash256, Transaction};

/// Append-only store for decoded blocks.
///
/// Blocks are grouped under the hash of their parent header: the decoder
/// reads the parent hash straight off the disk bytes, and keying by it keeps
/// fork siblings together in one bucket, in insertion order. Two secondary
/// maps resolve a block's own hash and a txid back to the parent bucket.
#[derive(Debug, Default)]
pub struct ChainIndex {
    /// prev header hash -> blocks referencing it as parent
    children: HashMap<Hash256, Vec<Block>>,
    /// block header hash -> prev header hash
    parents: HashMap<Hash256, Hash256>,
    /// txid -> prev header hash of the containing block (last writer wins)
    tx_parents: HashMap<Hash256, Hash256>,
    block_count: usize,
}

impl ChainIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a decoded block to the graph
    pub fn insert(&mut self, block: Block) {
        let prev_hash = block.prev_block_hash();

        self.parents.insert(block.header_hash(), prev_hash);

        for tx in &block.transactions {
            self.tx_parents.insert(tx.txid, prev_hash);
        }

        self.children.entry(prev_hash).or_default().push(block);
        self.block_count += 1;
    }

    /// Blocks whose parent header hash is `prev_hash`, in insertion order
    pub fn children_of(&self, prev_hash: &Hash256) -> &[Block] {
        self.children.get(prev_hash).map(Vec::as_slice).unwrap_or(&[])
    }

    pub(crate) fn children_of_mut(&mut self, prev_hash: &Hash256) -> Option<&mut Vec<Block>> {
        self.children.get_mut(prev_hash)
    }

    /// Parent header hash of the block with the given header hash
    pub fn parent_of(&self, header_hash: &Hash256) -> Option<Hash256> {
        self.parents.get(header_hash).copied()
    }

    /// Look up a block by its own header hash.
    ///
    /// Resolved as parent lookup plus a linear scan of the fork bucket; the
    /// bucket size is bounded by fork width, typically one or two blocks.
    pub fn find_block(&self, header_hash: &Hash256) -> Option<&Block> {
        let prev_hash = self.parent_of(header_hash)?;
        self.children_of(&prev_hash)
            .iter()
            .find(|block| block.header_hash() == *header_hash)
    }

    /// Look up a transaction and its containing block by txid
    pub fn find_tx(&self, txid: &Hash256) -> Option<(&Block, &Transaction)> {
        let prev_hash = self.tx_parents.get(txid)?;
        for block in self.children_of(prev_hash) {
            for tx in &block.transactions {
                if tx.txid == *txid {
                    return Some((block, tx));
                }
            }
        }
        None
    }

    /// Total number of blocks ingested, forks included
    pub fn block_count(&self) -> usize {
        self.block_count
    }

    pub fn is_empty(&self) -> bool {
        self.block_count == 0
    }
}
