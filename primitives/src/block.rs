use log::trace;
use nipopow_hash::Hash32;

use crate::header::BlockHeader;
use crate::interlink::Interlink;
use crate::policy;
use crate::target::{Target, TargetCompact};

/// A header paired with its interlink. `Block::hash()` is defined to equal
/// `header.hash()`, as in the distilled spec's data model.
#[derive(Clone, PartialEq, Debug)]
pub struct Block {
    pub header: BlockHeader,
    pub interlink: Interlink,
}

impl Block {
    pub fn new(header: BlockHeader, interlink: Interlink) -> Self {
        Block { header, interlink }
    }

    pub fn hash(&self) -> Hash32 {
        self.header.hash()
    }

    pub fn prev_hash(&self) -> Hash32 {
        self.header.prev_hash
    }

    pub fn height(&self) -> u32 {
        self.header.height
    }

    /// Claimed difficulty: `Target::MAX / header.target`, saturating.
    pub fn difficulty(&self) -> u64 {
        BlockUtils::target_to_difficulty(self.header.target)
    }

    /// A light client never carries a body; `to_light` is a no-op here and
    /// exists only so call sites mirroring a full node's `Block::to_light()`
    /// read the same way.
    pub fn to_light(self) -> Block {
        self
    }

    /// Computes the interlink this block's immediate successor (mined
    /// against `next_target`) must carry. A block's depth is how many
    /// levels *harder than the successor's own target* its hash is, so a
    /// retarget boundary changes which predecessor blocks qualify as
    /// superblocks at a given level.
    pub fn get_next_interlink(&self, next_target: Target) -> Interlink {
        let own_hash = self.hash();
        let own_target = BlockUtils::hash_to_target(own_hash);
        let own_depth = BlockUtils::get_target_depth_relative(own_target, next_target);

        let mut hashes = self.interlink.hashes.clone();
        if hashes.is_empty() {
            hashes.push(own_hash);
        }
        for level in 0..hashes.len() {
            if level as u8 <= own_depth {
                hashes[level] = own_hash;
            }
        }
        if own_depth as usize >= hashes.len() {
            hashes.resize(own_depth as usize + 1, own_hash);
        }
        trace!("next interlink for block at height {}: depth {}, {} levels", self.height(), own_depth, hashes.len());
        Interlink { hashes }
    }

    pub fn genesis() -> Block {
        let header = BlockHeader {
            prev_hash: Hash32::default(),
            interlink_hash: Interlink::empty().hash(),
            height: 0,
            timestamp: 0,
            target: policy::genesis_target(),
            n_bits: TargetCompact::from(policy::genesis_target()),
            nonce: 0,
        };
        Block::new(header, Interlink::empty())
    }
}

/// Free functions over hashes/targets that the distilled spec attributes to
/// an external `BlockUtils` collaborator.
pub struct BlockUtils;

impl BlockUtils {
    /// Reinterprets a hash's leading bytes as a target-scaled value: the
    /// "claimed work" read off the hash itself, independent of the header's
    /// declared target.
    pub fn hash_to_target(hash: Hash32) -> Target {
        Target(hash.leading_u128() << 0)
    }

    /// `leading_zero_bits(target) / 16`, a toy depth function that
    /// preserves "exponentially rarer at higher depth" without requiring
    /// full 256-bit precision. Used where depth is measured against a
    /// hash's own absolute target (proof scoring), not against a moving
    /// retarget boundary.
    pub fn get_target_depth(target: Target) -> u8 {
        (target.leading_zero_bits() / 16) as u8
    }

    /// Depth of `hash_target` relative to `base_target`: how many levels
    /// harder than `base_target` the hash is, in the same 16-bit units as
    /// [`get_target_depth`]. A block at the chain's current difficulty has
    /// depth 0 against its own successor's target; depth only grows with
    /// how far below that target the hash actually falls.
    pub fn get_target_depth_relative(hash_target: Target, base_target: Target) -> u8 {
        let hash_bits = hash_target.leading_zero_bits();
        let base_bits = base_target.leading_zero_bits();
        (hash_bits.saturating_sub(base_bits) / 16) as u8
    }

    pub fn real_difficulty(hash: Hash32) -> u64 {
        Self::target_to_difficulty(Self::hash_to_target(hash))
    }

    pub fn target_to_difficulty(target: Target) -> u64 {
        if target.0 == 0 {
            return u64::MAX;
        }
        (u128::MAX / target.0).min(u64::MAX as u128) as u64
    }

    pub fn is_valid_target(target: Target) -> bool {
        target.0 > 0 && target <= Target::MAX
    }

    pub fn target_to_compact(target: Target) -> TargetCompact {
        TargetCompact::from(target)
    }
}
