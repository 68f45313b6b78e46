// Chain graph, longest-chain resolution, and the read-only query surface

mod index;
mod resolver;
mod query;

pub use index::ChainIndex;
pub use resolver::{MainChain, resolve};
pub use query::{BlockTx, HeaderInfo, QueryError, TxInfo, TxInputInfo, TxOutputInfo};

/// Resolved, read-only view over an ingested block graph.
///
/// Building the store runs the resolver exactly once; afterwards every
/// method takes `&self`, so any number of request handlers can share a
/// reference without synchronization.
#[derive(Debug)]
pub struct ChainStore {
    index: ChainIndex,
    main: Option<MainChain>,
}

impl ChainStore {
    /// Resolve the longest chain over `index` and freeze the result
    pub fn build(mut index: ChainIndex) -> Self {
        let main = resolver::resolve(&mut index);

        match &main {
            Some(main) => {
                log::info!(
                    "Resolved main chain: height {}, tip {}",
                    main.height,
                    main.tip.to_hex()
                );
            }
            None => log::warn!("No blocks reachable from the genesis sentinel"),
        }

        Self { index, main }
    }

    /// Total number of blocks ingested, forks included
    pub fn block_count(&self) -> usize {
        self.index.block_count()
    }

    /// The underlying block graph
    pub fn index(&self) -> &ChainIndex {
        &self.index
    }
}
