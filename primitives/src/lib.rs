//! Block, header, interlink, target and chain-proof primitives.
//!
//! These are the "external collaborators" the distilled specification
//! references only through their interfaces; this crate supplies minimal,
//! internally-consistent implementations so the consensus core in
//! `nipopow-chain` compiles and its property tests are runnable standalone.

pub mod block;
pub mod header;
pub mod interlink;
pub mod policy;
pub mod proof;
pub mod target;

pub use block::{Block, BlockUtils};
pub use header::BlockHeader;
pub use interlink::Interlink;
pub use proof::{BlockChain, ChainProof, HeaderChain};
pub use target::{Target, TargetCompact};
