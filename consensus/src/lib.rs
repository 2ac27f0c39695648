//! Public async facade over the nipopow chain engine.
//!
//! Wraps [`nipopow_chain::ChainEngine`] in a [`Serializer`] so concurrent
//! callers can submit proofs and headers without racing each other, while
//! read-only accessors stay lock-cheap and bypass the queue.

mod serializer;

use std::sync::Arc;

use nipopow_chain::{ChainData, ChainEngine, EngineError, HeadChanged, PushResult};
use nipopow_hash::Hash32;
use nipopow_primitives::{policy, Block, BlockHeader, ChainProof};
use parking_lot::RwLock;

pub use nipopow_chain::{ValidateError, VerifyError};
pub use serializer::Serializer;

/// Top-level handle a host process holds onto: one per chain, cheaply
/// cloneable via `Arc` internally, safe to share across tasks.
pub struct ConsensusHandle {
    engine: Arc<RwLock<ChainEngine>>,
    serializer: Serializer,
}

impl ConsensusHandle {
    /// Builds a handle with the protocol defaults (`K` = 120, `M` = 240,
    /// after `NIPOPOW_K`/`NIPOPOW_M` in similar light-client designs).
    pub fn new() -> Self {
        Self::with_params(policy::K, policy::M)
    }

    pub fn with_params(k: u32, m: u32) -> Self {
        let engine = Arc::new(RwLock::new(ChainEngine::new(k, m)));
        let serializer = Serializer::spawn(engine.clone());
        ConsensusHandle { engine, serializer }
    }

    pub async fn push_proof(&self, proof: ChainProof) -> Result<bool, EngineError> {
        self.serializer.push_proof(proof).await
    }

    pub async fn push_header(&self, header: BlockHeader) -> Result<PushResult, EngineError> {
        self.serializer.push_header(header).await
    }

    pub fn head(&self) -> Block {
        self.engine.read().head().clone()
    }

    pub fn head_hash(&self) -> Hash32 {
        self.engine.read().head_hash()
    }

    pub fn height(&self) -> u32 {
        self.engine.read().height()
    }

    pub fn get(&self, hash: &Hash32) -> Option<ChainData> {
        self.engine.read().get(hash)
    }

    /// Registers a `head-changed` listener. The listener must not
    /// synchronously call back into `push_proof`/`push_header` - it runs
    /// from inside the serializer's single consumer task and would
    /// deadlock against itself.
    pub fn subscribe<F>(&self, listener: F) -> u64
    where
        F: FnMut(&HeadChanged) + Send + 'static,
    {
        self.engine.write().notifier.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: u64) {
        self.engine.write().notifier.unsubscribe(id);
    }
}

impl Default for ConsensusHandle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nipopow_primitives::{Block as _, TargetCompact};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc as StdArc;

    fn child_of(prev: &nipopow_primitives::Block, nonce: u32) -> BlockHeader {
        let interlink = prev.get_next_interlink(policy::genesis_target());
        BlockHeader {
            prev_hash: prev.hash(),
            interlink_hash: interlink.hash(),
            height: prev.height() + 1,
            timestamp: prev.header.timestamp + 1,
            target: policy::genesis_target(),
            n_bits: TargetCompact::from(policy::genesis_target()),
            nonce,
        }
    }

    #[tokio::test]
    async fn cold_start_matches_genesis() {
        let handle = ConsensusHandle::new();
        assert_eq!(handle.height(), 0);
        assert_eq!(handle.head_hash(), handle.head().hash());
    }

    #[tokio::test]
    async fn push_header_extends_and_fires_head_changed_once() {
        let handle = ConsensusHandle::new();
        let genesis = handle.head();
        let header = child_of(&genesis, 0);

        let fired = StdArc::new(AtomicUsize::new(0));
        let fired_clone = fired.clone();
        handle.subscribe(move |_event| {
            fired_clone.fetch_add(1, Ordering::SeqCst);
        });

        let result = handle.push_header(header).await.unwrap();
        assert_eq!(result, PushResult::Extended);
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert_eq!(handle.height(), 2);
    }

    #[tokio::test]
    async fn concurrent_pushes_are_serialized() {
        let handle = StdArc::new(ConsensusHandle::new());
        let genesis = handle.head();

        let a = child_of(&genesis, 1);
        let b = child_of(&genesis, 2);

        let handle_a = handle.clone();
        let handle_b = handle.clone();
        let (result_a, result_b) =
            tokio::join!(handle_a.push_header(a), handle_b.push_header(b));

        // Exactly one of the two concurrently-submitted children extends the
        // chain; the other is a same-height fork. Both must be accepted
        // (neither orphaned or invalid), since the serializer processes
        // them one at a time rather than racing on shared state.
        let codes: Vec<i8> = vec![result_a.unwrap().code(), result_b.unwrap().code()]
            .into_iter()
            .collect();
        assert!(codes.contains(&PushResult::Extended.code()));
        assert!(codes.iter().all(|c| *c >= 0));
    }
}
