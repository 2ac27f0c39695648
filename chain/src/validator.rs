use log::debug;
use nipopow_primitives::{Block, BlockHeader, Target, TargetCompact};

use crate::chain_data::ChainData;
use crate::error::ValidateError;

/// Validates a single incoming header against its stored predecessor.
/// Predecessor existence/extendability is checked by the caller
/// (`ChainEngine`), which reports it as `PushResult::Orphan` - a distinct
/// failure mode from the `ValidateError`s this type reports.
pub struct HeaderValidator;

impl HeaderValidator {
    /// `next_target` is `None` when there is not yet enough of a window to
    /// retarget; the difficulty check is then skipped and logged.
    pub fn validate(
        header: &BlockHeader,
        prev: &ChainData,
        next_target: Option<Target>,
    ) -> Result<Block, ValidateError> {
        if !header.verify_proof_of_work() {
            return Err(ValidateError::InvalidPow);
        }

        if !header.is_immediate_successor_of(&prev.head.header) {
            return Err(ValidateError::InvalidSuccessor);
        }

        match next_target {
            Some(target) => {
                if header.n_bits != TargetCompact::from(target) {
                    return Err(ValidateError::DifficultyMismatch);
                }
            }
            None => {
                debug!("skipping difficulty check at height {} - insufficient retarget window", header.height);
            }
        }

        let interlink = prev.head.get_next_interlink(header.target);
        if interlink.hash() != header.interlink_hash {
            return Err(ValidateError::InvalidInterlink);
        }

        Ok(Block::new(header.clone(), interlink))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nipopow_primitives::policy;

    fn genesis_data() -> ChainData {
        let genesis = Block::genesis();
        ChainData::extendable(genesis.clone(), genesis.difficulty(), 1, true)
    }

    fn valid_child(prev: &ChainData) -> BlockHeader {
        let interlink = prev.head.get_next_interlink(policy::genesis_target());
        BlockHeader {
            prev_hash: prev.head.hash(),
            interlink_hash: interlink.hash(),
            height: prev.head.height() + 1,
            timestamp: prev.head.header.timestamp + 1,
            target: policy::genesis_target(),
            n_bits: TargetCompact::from(policy::genesis_target()),
            nonce: 0,
        }
    }

    #[test]
    fn valid_child_passes() {
        let prev = genesis_data();
        let header = valid_child(&prev);
        let result = HeaderValidator::validate(&header, &prev, Some(policy::genesis_target()));
        assert!(result.is_ok());
    }

    #[test]
    fn header_not_meeting_its_own_target_is_invalid_pow() {
        let prev = genesis_data();
        let mut header = valid_child(&prev);
        // A target of 0 is met only by a hash of exactly zero, which blake2b
        // will not produce here - the PoW check must reject before any of
        // the later (successor/difficulty/interlink) checks run.
        header.target = Target(0);
        let result = HeaderValidator::validate(&header, &prev, Some(policy::genesis_target()));
        assert_eq!(result, Err(ValidateError::InvalidPow));
    }

    #[test]
    fn wrong_height_is_invalid_successor() {
        let prev = genesis_data();
        let mut header = valid_child(&prev);
        header.height += 1;
        let result = HeaderValidator::validate(&header, &prev, Some(policy::genesis_target()));
        assert_eq!(result, Err(ValidateError::InvalidSuccessor));
    }

    #[test]
    fn difficulty_mismatch_is_rejected() {
        let prev = genesis_data();
        let header = valid_child(&prev);
        let wrong_target = Target(policy::genesis_target().0 / 2);
        let result = HeaderValidator::validate(&header, &prev, Some(wrong_target));
        assert_eq!(result, Err(ValidateError::DifficultyMismatch));
    }

    #[test]
    fn missing_retarget_window_skips_difficulty_check() {
        let prev = genesis_data();
        let header = valid_child(&prev);
        let result = HeaderValidator::validate(&header, &prev, None);
        assert!(result.is_ok());
    }

    #[test]
    fn tampered_interlink_hash_is_rejected() {
        let prev = genesis_data();
        let mut header = valid_child(&prev);
        header.interlink_hash = nipopow_hash::Hash32::default();
        let result = HeaderValidator::validate(&header, &prev, Some(policy::genesis_target()));
        assert_eq!(result, Err(ValidateError::InvalidInterlink));
    }
}
