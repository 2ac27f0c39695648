use nipopow_primitives::Block;

/// What a stored block contributes to fork-choice accounting.
///
/// A sum type instead of a `totalDifficulty == -1` sentinel: a
/// retrieval-only leaf can never be mistaken for an extendable chain tip by
/// an arithmetic slip.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Contribution {
    Extendable { total_difficulty: u64, total_work: u64 },
    RetrievalOnly,
}

impl Contribution {
    pub fn is_extendable(&self) -> bool {
        matches!(self, Contribution::Extendable { .. })
    }

    pub fn total_difficulty(&self) -> Option<u64> {
        match self {
            Contribution::Extendable { total_difficulty, .. } => Some(*total_difficulty),
            Contribution::RetrievalOnly => None,
        }
    }

    pub fn total_work(&self) -> Option<u64> {
        match self {
            Contribution::Extendable { total_work, .. } => Some(*total_work),
            Contribution::RetrievalOnly => None,
        }
    }
}

/// Per-stored-block metadata.
#[derive(Clone, Debug, PartialEq)]
pub struct ChainData {
    pub head: Block,
    pub contribution: Contribution,
    pub on_main_chain: bool,
}

impl ChainData {
    pub fn extendable(head: Block, total_difficulty: u64, total_work: u64, on_main_chain: bool) -> Self {
        ChainData {
            head,
            contribution: Contribution::Extendable { total_difficulty, total_work },
            on_main_chain,
        }
    }

    pub fn retrieval_only(head: Block, on_main_chain: bool) -> Self {
        ChainData { head, contribution: Contribution::RetrievalOnly, on_main_chain }
    }
}
