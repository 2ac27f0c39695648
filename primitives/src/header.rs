use nipopow_hash::{Hash32, Hashable, SerializeContent};

use crate::target::{Target, TargetCompact};

/// A block header: the sparse, self-hashing piece of a [`crate::block::Block`]
/// that a light client validates without downloading the body.
///
/// Mirrors `nimiq-primitives::block::BlockHeader`, minus the
/// transaction/account fields that fall outside this crate's scope.
#[derive(Clone, PartialEq, Debug)]
pub struct BlockHeader {
    pub prev_hash: Hash32,
    pub interlink_hash: Hash32,
    pub height: u32,
    pub timestamp: u32,
    pub target: Target,
    pub n_bits: TargetCompact,
    pub nonce: u32,
}

impl SerializeContent for BlockHeader {
    fn serialize_content(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(self.prev_hash.as_bytes());
        out.extend_from_slice(self.interlink_hash.as_bytes());
        out.extend_from_slice(&self.height.to_be_bytes());
        out.extend_from_slice(&self.timestamp.to_be_bytes());
        out.extend_from_slice(&self.n_bits.0.to_be_bytes());
        out.extend_from_slice(&self.nonce.to_be_bytes());
    }
}

impl BlockHeader {
    pub fn hash(&self) -> Hash32 {
        Hashable::hash(self)
    }

    /// Checks that this header's self-hash satisfies its own declared
    /// target. Stands in for an Argon2d-style proof-of-work check, which
    /// this crate's scope excludes.
    pub fn verify_proof_of_work(&self) -> bool {
        self.target.is_met_by(self.hash().leading_u128())
    }

    /// Height = prev height + 1, timestamp monotonic, and prev_hash actually
    /// names `prev_header`.
    pub fn is_immediate_successor_of(&self, prev_header: &BlockHeader) -> bool {
        if self.height != prev_header.height + 1 {
            return false;
        }
        if self.timestamp < prev_header.timestamp {
            return false;
        }
        self.prev_hash == prev_header.hash()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(height: u32, timestamp: u32, prev_hash: Hash32) -> BlockHeader {
        BlockHeader {
            prev_hash,
            interlink_hash: Hash32::default(),
            height,
            timestamp,
            target: Target::MAX,
            n_bits: TargetCompact::from(Target::MAX),
            nonce: 0,
        }
    }

    #[test]
    fn successor_requires_height_plus_one() {
        let genesis = header(0, 0, Hash32::default());
        let child = header(2, 1, genesis.hash());
        assert!(!child.is_immediate_successor_of(&genesis));
    }

    #[test]
    fn successor_requires_monotonic_timestamp() {
        let genesis = header(0, 10, Hash32::default());
        let child = header(1, 5, genesis.hash());
        assert!(!child.is_immediate_successor_of(&genesis));
    }

    #[test]
    fn valid_successor_passes() {
        let genesis = header(0, 0, Hash32::default());
        let child = header(1, 1, genesis.hash());
        assert!(child.is_immediate_successor_of(&genesis));
    }

    #[test]
    fn max_target_is_always_met() {
        let h = header(0, 0, Hash32::default());
        assert!(h.verify_proof_of_work());
    }
}
