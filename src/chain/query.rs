// Query accessors over a resolved chain store.
//
// Inputs and outputs use display-order hex at this boundary; everything
// below it works on fixed-size hashes in internal byte order.

use serde::Serialize;

use crate::chain::ChainStore;
use crate::core::{Block, Hash256, Transaction};

const SATOSHI_PER_BTC: f64 = 100_000_000.0;

/// Errors for by-hash lookups. Unlike decode errors these are recoverable
/// and local to one query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryError {
    /// No indexed block or transaction carries the given hash
    NotFound,
    /// Input is not a 64-character hex string
    MalformedHash,
}

impl std::fmt::Display for QueryError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            QueryError::NotFound => write!(f, "Hash not found"),
            QueryError::MalformedHash => write!(f, "Malformed hash: expected 64 hex characters"),
        }
    }
}

impl std::error::Error for QueryError {}

/// Block header fields, hashes in display hex
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeaderInfo {
    pub version: u32,
    pub prev_block: String,
    pub merkle_root: String,
    pub time: u32,
    pub bits: u32,
    pub nonce: u32,
}

/// One transaction of a block: txid plus the summed output value in BTC
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockTx {
    pub txid: String,
    pub value: f64,
}

/// Summary of a single transaction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TxInfo {
    pub block_hash: String,
    pub version: u32,
    pub input_count: usize,
    pub output_count: usize,
    pub value: f64,
    pub lock_time: u32,
}

/// One input of a transaction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TxInputInfo {
    pub prev_txid: String,
    pub script_sig: String,
    pub sequence: u32,
}

/// One output of a transaction; the amount stays in satoshis
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TxOutputInfo {
    pub value: u64,
    pub script_pubkey: String,
}

fn parse_hash(input: &str) -> Result<Hash256, QueryError> {
    Hash256::from_hex(input).map_err(|_| QueryError::MalformedHash)
}

/// Presentation-only conversion; amounts are u64 satoshis everywhere else
fn total_btc(tx: &Transaction) -> f64 {
    tx.total_output_value() as f64 / SATOSHI_PER_BTC
}

impl ChainStore {
    fn block_by_hex(&self, hash: &str) -> Result<&Block, QueryError> {
        let hash = parse_hash(hash)?;
        self.index.find_block(&hash).ok_or(QueryError::NotFound)
    }

    fn tx_by_hex(&self, txid: &str) -> Result<(&Block, &Transaction), QueryError> {
        let txid = parse_hash(txid)?;
        self.index.find_tx(&txid).ok_or(QueryError::NotFound)
    }

    /// Header fields of the block with the given display-hex hash
    pub fn header_fields(&self, hash: &str) -> Result<HeaderInfo, QueryError> {
        let block = self.block_by_hex(hash)?;
        Ok(HeaderInfo {
            version: block.header.version,
            prev_block: block.header.prev_block_hash.to_hex(),
            merkle_root: block.header.merkle_root.to_hex(),
            time: block.header.timestamp,
            bits: block.header.bits,
            nonce: block.header.nonce,
        })
    }

    /// Height of the block with the given display-hex hash
    pub fn block_height(&self, hash: &str) -> Result<u32, QueryError> {
        Ok(self.block_by_hex(hash)?.height())
    }

    /// Whether the block with the given display-hex hash is on the main chain
    pub fn is_main_chain(&self, hash: &str) -> Result<bool, QueryError> {
        Ok(self.block_by_hex(hash)?.is_main_chain())
    }

    /// Display-hex hash of the main-chain tip, if any block resolved
    pub fn latest_tip(&self) -> Option<String> {
        self.main.map(|main| main.tip.to_hex())
    }

    /// Height of the main-chain tip, if any block resolved
    pub fn latest_height(&self) -> Option<u32> {
        self.main.map(|main| main.height)
    }

    /// Per-transaction summaries for the block with the given hash
    pub fn block_transactions(&self, hash: &str) -> Result<Vec<BlockTx>, QueryError> {
        let block = self.block_by_hex(hash)?;
        Ok(block
            .transactions
            .iter()
            .map(|tx| BlockTx {
                txid: tx.txid.to_hex(),
                value: total_btc(tx),
            })
            .collect())
    }

    /// Summary of the transaction with the given display-hex txid
    pub fn transaction_info(&self, txid: &str) -> Result<TxInfo, QueryError> {
        let (block, tx) = self.tx_by_hex(txid)?;
        Ok(TxInfo {
            block_hash: block.header_hash().to_hex(),
            version: tx.version,
            input_count: tx.inputs.len(),
            output_count: tx.outputs.len(),
            value: total_btc(tx),
            lock_time: tx.lock_time,
        })
    }

    /// Inputs of the transaction with the given display-hex txid
    pub fn transaction_inputs(&self, txid: &str) -> Result<Vec<TxInputInfo>, QueryError> {
        let (_, tx) = self.tx_by_hex(txid)?;
        Ok(tx
            .inputs
            .iter()
            .map(|input| TxInputInfo {
                prev_txid: input.prev_tx_hash.to_hex(),
                script_sig: hex::encode(&input.script_sig),
                sequence: input.sequence,
            })
            .collect())
    }

    /// Outputs of the transaction with the given display-hex txid
    pub fn transaction_outputs(&self, txid: &str) -> Result<Vec<TxOutputInfo>, QueryError> {
        let (_, tx) = self.tx_by_hex(txid)?;
        Ok(tx
            .outputs
            .iter()
            .map(|output| TxOutputInfo {
                value: output.value,
                script_pubkey: hex::encode(&output.script_pubkey),
            })
            .collect())
    }
}
