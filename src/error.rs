use std::time::Duration;

use thiserror::Error;

use crate::types::BlockQuery;

/// Why a single request to one explorer did not produce a response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportFailure {
    #[error("network error: {0}")]
    Network(String),

    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

#[derive(Debug, Error)]
pub enum MultiExplorerError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("transport error from {url}: {failure}")]
    Transport {
        url: String,
        failure: TransportFailure,
    },

    #[error("malformed response from {url}: {reason}")]
    MalformedResponse { url: String, reason: String },

    #[error("no consensus on {query}: no provider returned a usable answer")]
    NoConsensus { query: BlockQuery },

    #[error("conflict on {query}: providers returned {distinct} different answers")]
    Conflict { query: BlockQuery, distinct: usize },

    #[error("merkle root mismatch at height {height}: expected {expected}, found {found}")]
    MerkleRootMismatch {
        height: u64,
        expected: String,
        found: String,
    },
}

impl MultiExplorerError {
    /// Failures scoped to one provider's attempt, which the aggregator absorbs.
    pub fn is_provider_failure(&self) -> bool {
        matches!(
            self,
            MultiExplorerError::Transport { .. } | MultiExplorerError::MalformedResponse { .. }
        )
    }

    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            MultiExplorerError::Transport {
                failure: TransportFailure::Timeout(_),
                ..
            }
        )
    }

    pub(crate) fn malformed(url: &str, reason: impl Into<String>) -> Self {
        MultiExplorerError::MalformedResponse {
            url: url.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MultiExplorerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_provider_failures() {
        let timeout = MultiExplorerError::Transport {
            url: "https://a.example/api".into(),
            failure: TransportFailure::Timeout(Duration::from_secs(10)),
        };
        let refused = MultiExplorerError::Transport {
            url: "https://a.example/api".into(),
            failure: TransportFailure::Network("connection refused or unreachable".into()),
        };
        let malformed = MultiExplorerError::malformed("https://a.example/api", "empty body");

        assert!(timeout.is_timeout() && timeout.is_provider_failure());
        assert!(!refused.is_timeout() && refused.is_provider_failure());
        assert!(!malformed.is_timeout() && malformed.is_provider_failure());

        let conflict = MultiExplorerError::Conflict {
            query: BlockQuery::HashAtHeight(0),
            distinct: 2,
        };
        assert!(!conflict.is_provider_failure());
        assert!(!MultiExplorerError::Config("bad".into()).is_provider_failure());
    }
}
