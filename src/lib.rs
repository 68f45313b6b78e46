// Bitcoin block-file decoder and chain query library
//
// Decodes the blkNNNNN.dat files written by a full node into an in-memory
// block graph, resolves the longest chain from the genesis sentinel, and
// serves read-only queries over the result.

pub mod core;
pub mod chain;
pub mod ingest;
pub mod cli;

// Re-exports for convenience
pub use crate::core::{
    Block, BlockHeader, ByteReader, DecodeError, Hash256, Transaction, TxInput, TxOutput,
};
pub use crate::chain::{ChainIndex, ChainStore, MainChain, QueryError};
pub use crate::ingest::{IngestError, load_blocks_dir};
pub use crate::cli::{Cli, CliHandler};
