// Longest-chain resolution over the block graph

use std::collections::{HashMap, VecDeque};

use crate::chain::ChainIndex;
use crate::core::Hash256;

/// Result of resolving the longest chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MainChain {
    /// Header hash of the deepest block (internal order)
    pub tip: Hash256,
    /// Height of the tip (genesis is 0)
    pub height: u32,
}

/// Walk the parent->children relation breadth-first from the all-zero
/// sentinel, assigning each reachable block its height, then mark every
/// block on the path from the deepest tip back to genesis as main chain.
///
/// Ties between equally-deep tips go to the block discovered first, which
/// follows insertion order through the fork buckets. Blocks ingested twice
/// keep the height of their first discovery; blocks not reachable from the
/// sentinel are left untouched. Returns `None` for an empty graph.
pub fn resolve(index: &mut ChainIndex) -> Option<MainChain> {
    let sentinel = Hash256::zero();

    let mut queue = VecDeque::from([sentinel]);
    let mut distances: HashMap<Hash256, u32> = HashMap::from([(sentinel, 0)]);
    let mut best: Option<(u32, Hash256)> = None;

    while let Some(curr_hash) = queue.pop_front() {
        let curr_distance = distances[&curr_hash];

        let Some(blocks) = index.children_of_mut(&curr_hash) else {
            continue;
        };

        for block in blocks {
            let next_hash = block.header_hash();
            if distances.contains_key(&next_hash) {
                continue;
            }

            let distance = curr_distance + 1;
            distances.insert(next_hash, distance);
            block.set_height(distance - 1);
            queue.push_back(next_hash);

            // strictly greater: the first tip discovered at a depth wins
            if best.is_none_or(|(best_distance, _)| distance > best_distance) {
                best = Some((distance, next_hash));
            }
        }
    }

    let (best_distance, tip) = best?;

    // Flag the main chain from the tip back to the genesis block
    let mut curr_hash = tip;
    loop {
        let Some(prev_hash) = index.parent_of(&curr_hash) else {
            break;
        };

        if let Some(blocks) = index.children_of_mut(&prev_hash) {
            if let Some(block) = blocks.iter_mut().find(|b| b.header_hash() == curr_hash) {
                block.set_main_chain();
            }
        }

        if prev_hash == sentinel {
            break;
        }
        curr_hash = prev_hash;
    }

    Some(MainChain { tip, height: best_distance - 1 })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{decode, genesis_record, make_block};

    fn index_of(records: &[Vec<u8>]) -> ChainIndex {
        let mut index = ChainIndex::new();
        for record in records {
            index.insert(decode(record));
        }
        index
    }

    #[test]
    fn test_empty_index_resolves_to_none() {
        let mut index = ChainIndex::new();
        assert_eq!(resolve(&mut index), None);
    }

    #[test]
    fn test_genesis_only() {
        let genesis = genesis_record();
        let genesis_hash = decode(&genesis).header_hash();
        let mut index = index_of(&[genesis]);

        let main = resolve(&mut index).unwrap();
        assert_eq!(main.tip, genesis_hash);
        assert_eq!(main.height, 0);

        let block = index.find_block(&genesis_hash).unwrap();
        assert_eq!(block.height(), 0);
        assert!(block.is_main_chain());
    }

    #[test]
    fn test_linear_chain_heights() {
        let a = genesis_record();
        let hash_a = decode(&a).header_hash();
        let b = make_block(hash_a, 1);
        let hash_b = decode(&b).header_hash();
        let c = make_block(hash_b, 2);
        let hash_c = decode(&c).header_hash();

        let mut index = index_of(&[a, b, c]);
        let main = resolve(&mut index).unwrap();

        assert_eq!(main.tip, hash_c);
        assert_eq!(main.height, 2);

        for (hash, height) in [(hash_a, 0), (hash_b, 1), (hash_c, 2)] {
            let block = index.find_block(&hash).unwrap();
            assert_eq!(block.height(), height);
            assert!(block.is_main_chain());
        }
    }

    #[test]
    fn test_fork_resolution() {
        // A -> B, A -> B', B -> C: the branch through B is longer
        let a = genesis_record();
        let hash_a = decode(&a).header_hash();
        let b = make_block(hash_a, 1);
        let hash_b = decode(&b).header_hash();
        let b_prime = make_block(hash_a, 2);
        let hash_b_prime = decode(&b_prime).header_hash();
        let c = make_block(hash_b, 3);
        let hash_c = decode(&c).header_hash();

        let mut index = index_of(&[a, b, b_prime, c]);
        let main = resolve(&mut index).unwrap();

        assert_eq!(main.tip, hash_c);
        assert_eq!(main.height, 2);

        assert!(index.find_block(&hash_a).unwrap().is_main_chain());
        assert!(index.find_block(&hash_b).unwrap().is_main_chain());
        assert!(index.find_block(&hash_c).unwrap().is_main_chain());

        // The orphan keeps its own-branch height, off the main chain
        let orphan = index.find_block(&hash_b_prime).unwrap();
        assert!(!orphan.is_main_chain());
        assert_eq!(orphan.height(), 1);
    }

    #[test]
    fn test_equal_depth_fork_first_inserted_wins() {
        let a = genesis_record();
        let hash_a = decode(&a).header_hash();
        let b = make_block(hash_a, 1);
        let hash_b = decode(&b).header_hash();
        let b_prime = make_block(hash_a, 2);
        let hash_b_prime = decode(&b_prime).header_hash();

        let mut index = index_of(&[a, b, b_prime]);
        let main = resolve(&mut index).unwrap();

        assert_eq!(main.tip, hash_b);
        assert_eq!(main.height, 1);
        assert!(index.find_block(&hash_b).unwrap().is_main_chain());
        assert!(!index.find_block(&hash_b_prime).unwrap().is_main_chain());
    }

    #[test]
    fn test_duplicate_block_keeps_first_height() {
        let a = genesis_record();
        let hash_a = decode(&a).header_hash();
        let b = make_block(hash_a, 1);

        // Same block ingested twice (e.g. from two files): the second copy
        // is never assigned a distance
        let mut index = index_of(&[a, b.clone(), b]);
        let main = resolve(&mut index).unwrap();

        assert_eq!(main.height, 1);
        let bucket = index.children_of(&hash_a);
        assert_eq!(bucket.len(), 2);
        assert_eq!(bucket[0].height(), 1);
        assert!(bucket[0].is_main_chain());
        assert_eq!(bucket[1].height(), 0);
        assert!(!bucket[1].is_main_chain());
    }

    #[test]
    fn test_disconnected_block_is_unreachable() {
        let a = genesis_record();
        // Parent hash that no indexed block carries
        let stray = make_block(crate::core::Hash256::new([0xee; 32]), 7);
        let stray_hash = decode(&stray).header_hash();

        let mut index = index_of(&[a, stray]);
        let main = resolve(&mut index).unwrap();

        assert_eq!(main.height, 0);
        let block = index.find_block(&stray_hash).unwrap();
        assert!(!block.is_main_chain());
        assert_eq!(block.height(), 0);
    }
}
