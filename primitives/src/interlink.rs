use nipopow_hash::{Hash32, Hashable, SerializeContent};

/// Ordered sequence of hashes of previous superblocks of increasing levels.
///
/// `hashes[level]` is the hash of the most recent block that was itself a
/// superblock at `level` (a block of depth `d` qualifies as a superblock at
/// every level `0..=d`).
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Interlink {
    pub hashes: Vec<Hash32>,
}

impl Interlink {
    pub fn empty() -> Self {
        Interlink { hashes: Vec::new() }
    }
}

impl SerializeContent for Interlink {
    fn serialize_content(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&(self.hashes.len() as u32).to_be_bytes());
        for h in &self.hashes {
            out.extend_from_slice(h.as_bytes());
        }
    }
}

impl Interlink {
    pub fn hash(&self) -> Hash32 {
        Hashable::hash(self)
    }
}
