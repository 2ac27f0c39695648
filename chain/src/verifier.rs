use nipopow_primitives::{Block, BlockChain, ChainProof};

use crate::error::VerifyError;
use crate::scorer::ProofScorer;

/// Validates a [`ChainProof`] and compares competing proofs.
pub struct ProofVerifier {
    /// Dense-suffix length both proof consumers and producers agree on.
    pub k: u32,
    /// Minimum superblock count for the scoring rule.
    pub m: u32,
}

impl ProofVerifier {
    pub fn new(k: u32, m: u32) -> Self {
        ProofVerifier { k, m }
    }

    /// Verifies `proof` and returns the suffix reconstructed as full
    /// `Block`s (header + recomputed interlink), ready for appending.
    pub fn verify(&self, proof: &ChainProof) -> Result<Vec<Block>, VerifyError> {
        if !proof.verify() {
            return Err(VerifyError::MalformedProof);
        }

        let head_height = proof.head_height();
        let prefix_head_height = proof.prefix_head().height();
        let gap = head_height.saturating_sub(prefix_head_height);
        if proof.suffix.len() as u32 != self.k && proof.suffix.len() as u32 != gap {
            return Err(VerifyError::SuffixLengthMismatch);
        }

        let mut suffix_blocks = Vec::with_capacity(proof.suffix.len());
        let mut head = proof.prefix_head().clone();
        for (i, header) in proof.suffix.iter().enumerate() {
            let interlink = head.get_next_interlink(header.target);
            if interlink.hash() != header.interlink_hash {
                return Err(VerifyError::SuffixInterlinkMismatch(i));
            }
            let block = Block::new(header.clone(), interlink);
            head = block.clone();
            suffix_blocks.push(block);
        }

        Ok(suffix_blocks)
    }

    /// `true` iff `p1` is at least as good as `p2`: higher score above their
    /// lowest common ancestor, or (on a score tie) at least as much suffix
    /// work. Ties count as "better" for `p1` (reflexive: `is_better_proof(p,
    /// p, m) == true`).
    pub fn is_better_proof(&self, p1: &ChainProof, p2: &ChainProof) -> bool {
        use nipopow_primitives::HeaderChain;

        let lca_height = BlockChain::lowest_common_ancestor(&p1.prefix, &p2.prefix)
            .map(|b| b.height())
            .unwrap_or(0);

        let score1 = ProofScorer::score(&p1.prefix, lca_height, self.m);
        let score2 = ProofScorer::score(&p2.prefix, lca_height, self.m);

        if score1 != score2 {
            return score1 > score2;
        }

        HeaderChain::total_difficulty(&p1.suffix) >= HeaderChain::total_difficulty(&p2.suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn genesis_proof() -> ChainProof {
        ChainProof { prefix: vec![Block::genesis()], suffix: vec![] }
    }

    #[test]
    fn genesis_only_proof_verifies_with_empty_suffix() {
        let verifier = ProofVerifier::new(0, 1);
        let proof = genesis_proof();
        assert!(verifier.verify(&proof).is_ok());
    }

    #[test]
    fn wrong_suffix_length_is_rejected() {
        let verifier = ProofVerifier::new(5, 1);
        let proof = genesis_proof();
        assert_eq!(verifier.verify(&proof), Err(VerifyError::SuffixLengthMismatch));
    }

    #[test]
    fn is_better_proof_is_reflexive() {
        let verifier = ProofVerifier::new(0, 1);
        let proof = genesis_proof();
        assert!(verifier.is_better_proof(&proof, &proof));
    }

    #[test]
    fn tampered_suffix_interlink_is_rejected() {
        let verifier = ProofVerifier::new(1, 1);
        let mut header = Block::genesis().header.clone();
        header.height = 2;
        header.prev_hash = Block::genesis().hash();
        header.interlink_hash = nipopow_hash::Hash32::default(); // deliberately wrong
        let proof = ChainProof { prefix: vec![Block::genesis()], suffix: vec![header] };
        assert!(matches!(verifier.verify(&proof), Err(VerifyError::SuffixInterlinkMismatch(0))));
    }
}
