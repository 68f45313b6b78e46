// CLI commands

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde::Serialize;

use crate::chain::ChainStore;
use crate::ingest::{self, IngestError};

#[derive(Parser)]
#[command(name = "chainquery")]
#[command(about = "Query the block files of a Bitcoin full node", long_about = None)]
pub struct Cli {
    /// Directory containing blkNNNNN.dat files
    #[arg(short, long)]
    pub blocks_dir: PathBuf,

    /// Print results as JSON
    #[arg(long, default_value = "false")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Chain summary: block count, main-chain height and tip
    Info,

    /// Block queries
    #[command(subcommand)]
    Block(BlockCommands),

    /// Transaction queries
    #[command(subcommand)]
    Tx(TxCommands),
}

#[derive(Subcommand)]
pub enum BlockCommands {
    /// Get the header fields of a block
    Header {
        /// Block hash (display hex)
        hash: String,
    },

    /// Get the height of a block
    Height {
        /// Block hash (display hex)
        hash: String,
    },

    /// Check whether a block is on the main chain
    MainChain {
        /// Block hash (display hex)
        hash: String,
    },

    /// List the transactions of a block
    Txs {
        /// Block hash (display hex)
        hash: String,
    },

    /// Get the main-chain tip
    Latest,
}

#[derive(Subcommand)]
pub enum TxCommands {
    /// Summary of a transaction
    Info {
        /// Transaction ID (display hex)
        txid: String,
    },

    /// Inputs of a transaction
    Inputs {
        /// Transaction ID (display hex)
        txid: String,
    },

    /// Outputs of a transaction
    Outputs {
        /// Transaction ID (display hex)
        txid: String,
    },
}

#[derive(Serialize)]
struct ChainInfo {
    block_count: usize,
    height: Option<u32>,
    tip: Option<String>,
}

/// CLI handler: loads the block files once, then serves one query
pub struct CliHandler {
    store: ChainStore,
    json: bool,
}

impl CliHandler {
    /// Ingest `blocks_dir` and resolve the main chain
    pub fn new(blocks_dir: &Path, json: bool) -> Result<Self, IngestError> {
        let index = ingest::load_blocks_dir(blocks_dir)?;
        let store = ChainStore::build(index);
        Ok(Self { store, json })
    }

    /// Handle one CLI command
    pub fn handle(&self, command: Commands) -> Result<(), Box<dyn std::error::Error>> {
        match command {
            Commands::Info => self.info(),
            Commands::Block(cmd) => self.handle_block(cmd),
            Commands::Tx(cmd) => self.handle_tx(cmd),
        }
    }

    fn info(&self) -> Result<(), Box<dyn std::error::Error>> {
        let info = ChainInfo {
            block_count: self.store.block_count(),
            height: self.store.latest_height(),
            tip: self.store.latest_tip(),
        };

        if self.json {
            println!("{}", serde_json::to_string_pretty(&info)?);
            return Ok(());
        }

        println!("Chain info:");
        println!("  Blocks: {}", info.block_count);
        match (info.height, info.tip) {
            (Some(height), Some(tip)) => {
                println!("  Height: {}", height);
                println!("  Tip:    {}", tip);
            }
            _ => println!("  No main chain resolved"),
        }

        Ok(())
    }

    fn handle_block(&self, cmd: BlockCommands) -> Result<(), Box<dyn std::error::Error>> {
        match cmd {
            BlockCommands::Header { hash } => {
                let header = self.store.header_fields(&hash)?;

                if self.json {
                    println!("{}", serde_json::to_string_pretty(&header)?);
                    return Ok(());
                }

                println!("Block {}:", hash);
                println!("  Version:     {}", header.version);
                println!("  Previous:    {}", header.prev_block);
                println!("  Merkle root: {}", header.merkle_root);
                println!("  Time:        {}", header.time);
                println!("  Bits:        0x{:08x}", header.bits);
                println!("  Nonce:       {}", header.nonce);
                Ok(())
            }
            BlockCommands::Height { hash } => {
                let height = self.store.block_height(&hash)?;

                if self.json {
                    println!("{}", serde_json::json!({ "height": height }));
                    return Ok(());
                }

                println!("Height: {}", height);
                Ok(())
            }
            BlockCommands::MainChain { hash } => {
                let main_chain = self.store.is_main_chain(&hash)?;

                if self.json {
                    println!("{}", serde_json::json!({ "main_chain": main_chain }));
                    return Ok(());
                }

                println!("Main chain: {}", main_chain);
                Ok(())
            }
            BlockCommands::Txs { hash } => {
                let txs = self.store.block_transactions(&hash)?;

                if self.json {
                    println!("{}", serde_json::to_string_pretty(&txs)?);
                    return Ok(());
                }

                println!("Transactions ({}):", txs.len());
                for tx in txs {
                    println!("  {}  {} BTC", tx.txid, tx.value);
                }
                Ok(())
            }
            BlockCommands::Latest => {
                let info = ChainInfo {
                    block_count: self.store.block_count(),
                    height: self.store.latest_height(),
                    tip: self.store.latest_tip(),
                };

                if self.json {
                    println!(
                        "{}",
                        serde_json::json!({ "hash": info.tip, "height": info.height })
                    );
                    return Ok(());
                }

                match (info.tip, info.height) {
                    (Some(tip), Some(height)) => {
                        println!("Latest block: {}", tip);
                        println!("Height: {}", height);
                    }
                    _ => println!("No main chain resolved"),
                }
                Ok(())
            }
        }
    }

    fn handle_tx(&self, cmd: TxCommands) -> Result<(), Box<dyn std::error::Error>> {
        match cmd {
            TxCommands::Info { txid } => {
                let info = self.store.transaction_info(&txid)?;

                if self.json {
                    println!("{}", serde_json::to_string_pretty(&info)?);
                    return Ok(());
                }

                println!("Transaction {}:", txid);
                println!("  Block:    {}", info.block_hash);
                println!("  Version:  {}", info.version);
                println!("  Inputs:   {}", info.input_count);
                println!("  Outputs:  {}", info.output_count);
                println!("  Value:    {} BTC", info.value);
                println!("  Locktime: {}", info.lock_time);
                Ok(())
            }
            TxCommands::Inputs { txid } => {
                let inputs = self.store.transaction_inputs(&txid)?;

                if self.json {
                    println!("{}", serde_json::to_string_pretty(&inputs)?);
                    return Ok(());
                }

                println!("Inputs ({}):", inputs.len());
                for input in inputs {
                    println!("  Previous: {}", input.prev_txid);
                    println!("  Sequence: {}", input.sequence);
                    println!("  Script:   {}", input.script_sig);
                }
                Ok(())
            }
            TxCommands::Outputs { txid } => {
                let outputs = self.store.transaction_outputs(&txid)?;

                if self.json {
                    println!("{}", serde_json::to_string_pretty(&outputs)?);
                    return Ok(());
                }

                println!("Outputs ({}):", outputs.len());
                for output in outputs {
                    println!("  Value:  {} satoshis", output.value);
                    println!("  Script: {}", output.script_pubkey);
                }
                Ok(())
            }
        }
    }
}
