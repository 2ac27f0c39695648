use thiserror::Error;

/// Recoverable validation failures for a single incoming header.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidateError {
    #[error("header proof-of-work is invalid")]
    InvalidPow,
    #[error("header is not an immediate successor of its stated predecessor")]
    InvalidSuccessor,
    #[error("header difficulty does not match the expected retarget")]
    DifficultyMismatch,
    #[error("header interlink hash does not match the recomputed interlink")]
    InvalidInterlink,
}

/// A verified proof failed some other internal check before being accepted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerifyError {
    #[error("proof failed its own structural/interlink-PoW verification")]
    MalformedProof,
    #[error("suffix length does not match the dense-suffix parameter or the prefix/head gap")]
    SuffixLengthMismatch,
    #[error("suffix header at index {0} has a mismatched interlink hash")]
    SuffixInterlinkMismatch(usize),
}

/// Fatal, store-corruption-class failures. These are never expected to
/// occur if `ProofVerifier`/`HeaderValidator` did their job; surfacing them
/// as an `Err` (rather than unwinding) lets the serializer log and move on
/// to the next queued operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("store is missing a predecessor that must exist: {0}")]
    MissingPredecessor(String),
    #[error("a proof-derived block failed to append after its proof passed verification")]
    Inconsistent,
}
