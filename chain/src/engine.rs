use log::{debug, error, warn};
use nipopow_hash::Hash32;
use nipopow_primitives::{policy, Block, ChainProof, Target, TargetCompact};
use nipopow_utils::Notifier;

use crate::chain_data::ChainData;
use crate::error::{EngineError, ValidateError};
use crate::store::ChainStore;
use crate::validator::HeaderValidator;
use crate::verifier::ProofVerifier;

/// Wire-stable result of a single `push_header`/`push_proof` operation.
/// `code()` exposes the legacy integer contract.
#[derive(Clone, Debug, PartialEq)]
pub enum PushResult {
    Orphan,
    Invalid(ValidateError),
    Known,
    Extended,
    Rebranched,
    Forked,
}

impl PushResult {
    pub const fn code(&self) -> i8 {
        match self {
            PushResult::Orphan => -2,
            PushResult::Invalid(_) => -1,
            PushResult::Known => 0,
            PushResult::Extended => 1,
            PushResult::Rebranched => 2,
            PushResult::Forked => 3,
        }
    }
}

/// Payload of the `head-changed` event.
#[derive(Clone, Debug)]
pub struct HeadChanged {
    pub head: Block,
}

/// Orchestrates proof adoption, header append, fork tracking and
/// rebranching. Owns the head pointer.
///
/// This type is not `Sync`-safe to mutate from two places at once - that
/// discipline is enforced by `nipopow-consensus::Serializer`, not by this
/// type itself.
pub struct ChainEngine {
    store: ChainStore,
    head_hash: Hash32,
    main_chain: ChainData,
    proof: ChainProof,
    verifier: ProofVerifier,
    pub notifier: Notifier<HeadChanged>,
}

impl ChainEngine {
    pub fn new(k: u32, m: u32) -> Self {
        let genesis = Block::genesis();
        let genesis_hash = genesis.hash();
        let main_chain = ChainData::extendable(
            genesis.clone(),
            genesis.difficulty(),
            nipopow_primitives::BlockUtils::real_difficulty(genesis_hash),
            true,
        );

        let mut store = ChainStore::new();
        store.put(genesis_hash, main_chain.clone());

        ChainEngine {
            store,
            head_hash: genesis_hash,
            main_chain,
            proof: ChainProof { prefix: vec![genesis.to_light()], suffix: vec![] },
            verifier: ProofVerifier::new(k, m),
            notifier: Notifier::new(),
        }
    }

    pub fn head(&self) -> &Block {
        &self.main_chain.head
    }

    pub fn head_hash(&self) -> Hash32 {
        self.head_hash
    }

    pub fn height(&self) -> u32 {
        self.main_chain.head.height()
    }

    pub fn total_difficulty(&self) -> u64 {
        self.main_chain.contribution.total_difficulty().unwrap_or(0)
    }

    pub fn get(&self, hash: &Hash32) -> Option<ChainData> {
        self.store.get(hash)
    }

    pub fn chain_proof(&self) -> &ChainProof {
        &self.proof
    }

    /// Verifies `proof` and, if it beats the currently adopted proof,
    /// adopts it. Returns `false` only when verification itself failed - a
    /// verified-but-worse proof still returns `true`.
    pub fn push_proof(&mut self, proof: ChainProof) -> Result<bool, EngineError> {
        let suffix_blocks = match self.verifier.verify(&proof) {
            Ok(blocks) => blocks,
            Err(e) => {
                warn!("rejecting proof - verification failed ({})", e);
                return Ok(false);
            }
        };

        if self.verifier.is_better_proof(&proof, &self.proof) {
            self.accept_proof(proof, suffix_blocks)?;
        }

        Ok(true)
    }

    fn accept_proof(&mut self, proof: ChainProof, suffix_blocks: Vec<Block>) -> Result<(), EngineError> {
        let prefix_head = proof.prefix_head().clone();
        let prefix_head_hash = prefix_head.hash();

        let already_grafted = self
            .store
            .get(&prefix_head_hash)
            .map(|d| d.contribution.is_extendable())
            .unwrap_or(false);

        if !already_grafted {
            debug!("resetting store to adopt new proof prefix (head height #{})", prefix_head.height());
            self.store.truncate();

            let head_data = ChainData::extendable(
                prefix_head.clone(),
                prefix_head.difficulty(),
                nipopow_primitives::BlockUtils::real_difficulty(prefix_head_hash),
                true,
            );
            self.store.put(prefix_head_hash, head_data.clone());
            self.head_hash = prefix_head_hash;
            self.main_chain = head_data;

            for block in proof.prefix.iter().rev().skip(1) {
                let hash = block.hash();
                self.store.put(hash, ChainData::retrieval_only(block.clone(), true));
            }
        }

        self.proof = proof;

        for block in suffix_blocks {
            let hash = block.hash();
            if self.store.get(&hash).is_some() {
                continue;
            }
            let prev_data = self
                .store
                .get(&block.prev_hash())
                .ok_or_else(|| EngineError::MissingPredecessor(block.prev_hash().to_string()))?;

            match self.push_block_internal(block, hash, &prev_data)? {
                PushResult::Extended | PushResult::Rebranched | PushResult::Forked => {}
                other => {
                    error!("suffix block failed to append after its proof passed verification: {:?}", other);
                    return Err(EngineError::Inconsistent);
                }
            }
        }

        Ok(())
    }

    /// Looks up the predecessor, checks orphan/known, validates, and
    /// appends.
    pub fn push_header(&mut self, header: nipopow_primitives::BlockHeader) -> Result<PushResult, EngineError> {
        let hash = header.hash();

        let prev_data = match self.store.get(&header.prev_hash) {
            Some(data) if data.contribution.is_extendable() => data,
            _ => {
                warn!("rejecting header at height {} - unknown or non-extendable predecessor", header.height);
                return Ok(PushResult::Orphan);
            }
        };

        if self.store.get(&hash).is_some() {
            return Ok(PushResult::Known);
        }

        let next_target = self.get_next_target(&header.prev_hash);
        let block = match HeaderValidator::validate(&header, &prev_data, next_target) {
            Ok(block) => block,
            Err(e) => {
                warn!("rejecting header at height {} - {}", header.height, e);
                return Ok(PushResult::Invalid(e));
            }
        };

        self.push_block_internal(block, hash, &prev_data)
    }

    fn push_block_internal(
        &mut self,
        block: Block,
        hash: Hash32,
        prev_data: &ChainData,
    ) -> Result<PushResult, EngineError> {
        let prev_total_difficulty = prev_data.contribution.total_difficulty().unwrap_or(0);
        let prev_total_work = prev_data.contribution.total_work().unwrap_or(0);

        let total_difficulty = prev_total_difficulty + block.difficulty();
        let total_work = prev_total_work + nipopow_primitives::BlockUtils::real_difficulty(hash);

        let mut chain_data = ChainData::extendable(block.clone(), total_difficulty, total_work, false);

        if block.prev_hash() == self.head_hash {
            chain_data.on_main_chain = true;
            self.store.put(hash, chain_data.clone());
            self.head_hash = hash;
            self.main_chain = chain_data.clone();
            self.notifier.notify(&HeadChanged { head: chain_data.head });
            return Ok(PushResult::Extended);
        }

        if total_difficulty > self.main_chain.contribution.total_difficulty().unwrap_or(0) {
            debug!("rebranching to fork {:?}, height #{}, total_difficulty {}", hash, block.height(), total_difficulty);
            self.rebranch(hash, chain_data)?;
            self.notifier.notify(&HeadChanged { head: self.main_chain.head.clone() });
            return Ok(PushResult::Rebranched);
        }

        debug!("creating/extending fork with block {:?}, height #{}, total_difficulty {}", hash, block.height(), total_difficulty);
        self.store.put(hash, chain_data);
        Ok(PushResult::Forked)
    }

    fn rebranch(&mut self, new_hash: Hash32, new_data: ChainData) -> Result<(), EngineError> {
        let mut fork_chain: Vec<(Hash32, ChainData)> = Vec::new();
        let mut current = (new_hash, new_data);

        while !current.1.on_main_chain {
            let prev_hash = current.1.head.prev_hash();
            let prev_data = self
                .store
                .get(&prev_hash)
                .ok_or_else(|| EngineError::MissingPredecessor(prev_hash.to_string()))?;
            fork_chain.push(current);
            current = (prev_hash, prev_data);
        }

        debug!("found common ancestor {:?} at height #{}, {} blocks up", current.0, current.1.head.height(), fork_chain.len());

        let mut walker = (self.head_hash, self.main_chain.clone());
        while walker.0 != current.0 {
            let mut data = walker.1.clone();
            data.on_main_chain = false;
            self.store.put(walker.0, data);

            let prev_hash = walker.1.head.prev_hash();
            let prev_data = self
                .store
                .get(&prev_hash)
                .ok_or_else(|| EngineError::MissingPredecessor(prev_hash.to_string()))?;
            walker = (prev_hash, prev_data);
        }

        for (hash, mut data) in fork_chain.into_iter().rev() {
            data.on_main_chain = true;
            self.store.put(hash, data.clone());
            self.main_chain = data;
            self.head_hash = hash;
        }

        Ok(())
    }

    /// Simplified retarget over `policy::DIFFICULTY_BLOCK_WINDOW` blocks
    /// ending at `prev_hash`. Returns `None` when there is not yet a full
    /// window to retarget against.
    fn get_next_target(&self, prev_hash: &Hash32) -> Option<Target> {
        let head_data = self.store.get(prev_hash)?;
        let head = &head_data.head;
        if head.height() < policy::DIFFICULTY_BLOCK_WINDOW {
            return None;
        }

        let head_total_difficulty = head_data.contribution.total_difficulty()?;

        let mut cursor_hash = head.prev_hash();
        let mut cursor_data = self.store.get(&cursor_hash)?;
        for _ in 1..policy::DIFFICULTY_BLOCK_WINDOW {
            cursor_hash = cursor_data.head.prev_hash();
            cursor_data = self.store.get(&cursor_hash)?;
        }
        let tail = &cursor_data.head;
        let tail_total_difficulty = cursor_data.contribution.total_difficulty()?;

        let delta_difficulty = head_total_difficulty.saturating_sub(tail_total_difficulty).max(1);
        let actual_time = head.header.timestamp.saturating_sub(tail.header.timestamp).max(1) as f64;
        let expected_time = (policy::DIFFICULTY_BLOCK_WINDOW as f64) * (policy::BLOCK_TIME as f64);

        let mut adjustment = actual_time / expected_time;
        adjustment = adjustment.max(1.0 / policy::DIFFICULTY_MAX_ADJUSTMENT_FACTOR);
        adjustment = adjustment.min(policy::DIFFICULTY_MAX_ADJUSTMENT_FACTOR);

        let average_difficulty = (delta_difficulty as f64) / (policy::DIFFICULTY_BLOCK_WINDOW as f64);
        let average_target = (u128::MAX as f64) / average_difficulty.max(1.0);
        let next_target_value = (average_target * adjustment).clamp(1.0, u128::MAX as f64) as u128;

        // Reduce to nBits precision.
        let compact = TargetCompact::from(Target(next_target_value));
        Some(Target::from(compact))
    }
}
