use log::trace;
use nipopow_primitives::{Block, BlockUtils};

/// Computes the superblock-level score of a proof prefix relative to a
/// lowest-common-ancestor height.
pub struct ProofScorer;

impl ProofScorer {
    /// Rewards chains with many high-level superblocks above `lca_height`,
    /// gated by `m` so a single lucky block can't be scored at an
    /// implausibly high level.
    pub fn score(chain: &[Block], lca_height: u32, m: u32) -> u64 {
        let mut counts: Vec<u64> = Vec::new();
        let mut max_depth: usize = 0;

        for block in chain {
            if block.height() < lca_height {
                continue;
            }
            let target = BlockUtils::hash_to_target(block.hash());
            let depth = BlockUtils::get_target_depth(target) as usize;
            if depth >= counts.len() {
                counts.resize(depth + 1, 0);
            }
            counts[depth] += 1;
            max_depth = max_depth.max(depth);
        }

        if counts.is_empty() {
            return 0;
        }

        let mut sum: u64 = 0;
        let mut chosen_depth: i64 = -1;
        for depth in (0..=max_depth).rev() {
            sum += counts[depth];
            if sum >= m as u64 {
                chosen_depth = depth as i64;
                break;
            }
        }

        let depth = chosen_depth.max(0) as u32;
        trace!("proof score: depth {} with {} superblocks at or above it (m={})", depth, sum, m);
        2u64.saturating_pow(depth) * sum
    }
}
