use std::fmt;

/// Opaque identifier of a block, as reported by an explorer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockHash(String);

impl BlockHash {
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for BlockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for BlockHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for BlockHash {
    fn from(hash: &str) -> Self {
        Self::new(hash)
    }
}

impl From<String> for BlockHash {
    fn from(hash: String) -> Self {
        Self(hash)
    }
}

/// Header fields a timestamp verifier needs from a block.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlockInfo {
    pub merkle_root: String,
    /// Block time in unix seconds.
    pub time: u64,
}

impl BlockInfo {
    pub fn new(merkle_root: impl Into<String>, time: u64) -> Self {
        Self {
            merkle_root: merkle_root.into(),
            time,
        }
    }
}

/// The parameter of one logical lookup, carried by consensus errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockQuery {
    HashAtHeight(u64),
    InfoForHash(BlockHash),
}

impl fmt::Display for BlockQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockQuery::HashAtHeight(height) => write!(f, "block hash at height {}", height),
            BlockQuery::InfoForHash(hash) => write!(f, "block info for hash {}", hash),
        }
    }
}
