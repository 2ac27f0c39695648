use std::sync::Arc;

use nipopow_chain::{ChainEngine, EngineError, PushResult};
use nipopow_primitives::{BlockHeader, ChainProof};
use parking_lot::RwLock;
use tokio::sync::{mpsc, oneshot};

/// A single mutating job accepted by the [`Serializer`]'s queue.
enum Job {
    PushProof(ChainProof, oneshot::Sender<Result<bool, EngineError>>),
    PushHeader(BlockHeader, oneshot::Sender<Result<PushResult, EngineError>>),
}

/// Single-writer dispatch queue: a background task owns the only path into
/// the engine's mutating operations, running jobs strictly one at a time in
/// submission order and completing each caller via a paired oneshot channel.
///
/// Read-only accessors bypass this queue entirely and read the shared
/// `RwLock<ChainEngine>` directly (see `ConsensusHandle::head`, etc.) - they
/// observe the state as of the last committed write or the initial state,
/// never a torn intermediate.
pub struct Serializer {
    sender: mpsc::UnboundedSender<Job>,
}

impl Serializer {
    pub fn spawn(engine: Arc<RwLock<ChainEngine>>) -> Self {
        let (sender, mut receiver) = mpsc::unbounded_channel::<Job>();

        tokio::spawn(async move {
            while let Some(job) = receiver.recv().await {
                match job {
                    Job::PushProof(proof, reply) => {
                        let result = engine.write().push_proof(proof);
                        let _ = reply.send(result);
                    }
                    Job::PushHeader(header, reply) => {
                        let result = engine.write().push_header(header);
                        let _ = reply.send(result);
                    }
                }
            }
        });

        Serializer { sender }
    }

    pub async fn push_proof(&self, proof: ChainProof) -> Result<bool, EngineError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(Job::PushProof(proof, reply_tx))
            .expect("serializer task outlives its handle");
        reply_rx.await.expect("serializer task never drops a pending reply")
    }

    pub async fn push_header(&self, header: BlockHeader) -> Result<PushResult, EngineError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(Job::PushHeader(header, reply_tx))
            .expect("serializer task outlives its handle");
        reply_rx.await.expect("serializer task never drops a pending reply")
    }
}
