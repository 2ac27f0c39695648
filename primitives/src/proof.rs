use std::collections::HashSet;

use nipopow_hash::Hash32;

use crate::block::{Block, BlockUtils};
use crate::header::BlockHeader;

/// A NIPoPoW chain proof: a sparse `prefix` of superblocks backing the bulk
/// of the claimed work, plus a dense `suffix` of the final headers.
#[derive(Clone, Debug)]
pub struct ChainProof {
    pub prefix: Vec<Block>,
    pub suffix: Vec<BlockHeader>,
}

impl ChainProof {
    pub fn prefix_head(&self) -> &Block {
        self.prefix.last().expect("a chain proof always carries a non-empty prefix")
    }

    /// The proof's head: the last header of the suffix, or the prefix head
    /// if the suffix is empty.
    pub fn head_height(&self) -> u32 {
        self.suffix
            .last()
            .map(|h| h.height)
            .unwrap_or_else(|| self.prefix_head().height())
    }

    /// Structural self-consistency check of the prefix: heights strictly
    /// increase, each block's own interlink hash matches its stored
    /// interlink, and each block's own proof-of-work checks out.
    ///
    /// Stands in for the distilled spec's `proof.verify()` external call —
    /// a full implementation would additionally walk the interlink pointers
    /// between non-adjacent prefix entries, which this crate's scope
    /// (§4.0) does not attempt to reproduce at protocol fidelity.
    pub fn verify(&self) -> bool {
        if self.prefix.is_empty() {
            return false;
        }
        let mut prev_height: Option<u32> = None;
        for block in &self.prefix {
            if !block.header.verify_proof_of_work() {
                return false;
            }
            if block.interlink.hash() != block.header.interlink_hash {
                return false;
            }
            if let Some(h) = prev_height {
                if block.height() <= h {
                    return false;
                }
            }
            prev_height = Some(block.height());
        }
        true
    }
}

/// Highest-block-in-common lookup over two prefix chains.
pub struct BlockChain;

impl BlockChain {
    /// The highest block present (by hash) in both `a` and `b`. Both
    /// sequences are assumed ordered by ascending height, as a proof's
    /// prefix is.
    pub fn lowest_common_ancestor(a: &[Block], b: &[Block]) -> Option<Block> {
        let b_hashes: HashSet<Hash32> = b.iter().map(|blk| blk.hash()).collect();
        a.iter().rev().find(|blk| b_hashes.contains(&blk.hash())).cloned()
    }
}

/// Aggregate helpers over a dense header suffix.
pub struct HeaderChain;

impl HeaderChain {
    pub fn total_difficulty(suffix: &[BlockHeader]) -> u64 {
        suffix
            .iter()
            .map(|h| BlockUtils::target_to_difficulty(h.target))
            .fold(0u64, |acc, d| acc.saturating_add(d))
    }
}
