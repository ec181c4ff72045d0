//! Multi-explorer with all-or-nothing agreement.
//!
//! This module provides the `MultiExplorer` type, which sends every block
//! query to all configured explorers at once and only returns an answer
//! that every responding explorer agrees on.

use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, info};

use crate::config::MultiExplorerConfig;
use crate::consensus::{reach_consensus, Outcome};
use crate::error::{MultiExplorerError, Result};
use crate::explorer::{build_client, BlockExplorer, Explorer, ExplorerFut};
use crate::types::{BlockHash, BlockInfo, BlockQuery};

/// Cross-checked block lookups over several untrusted explorers.
///
/// Each query is fanned out to every explorer concurrently and the call
/// returns once all of them have answered, failed or timed out. Explorers
/// that fail are ignored; if the remaining ones disagree the call fails
/// with [`MultiExplorerError::Conflict`] instead of picking a winner.
///
/// Dropping a pending call drops every in-flight request with it.
/// Cloning is cheap and clones share the same explorers.
///
/// # Example
///
/// ```rust,no_run
/// use multi_explorer::{MultiExplorer, MultiExplorerConfig, ProviderSpec};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = MultiExplorerConfig::new().with_providers(vec![
///     ProviderSpec::insight("https://insight.bitpay.com/api"),
///     ProviderSpec::esplora("https://blockstream.info/api"),
/// ]);
///
/// let explorer = MultiExplorer::new(config)?;
///
/// let hash = explorer.block_hash(0).await?;
/// let info = explorer.block_info(&hash).await?;
/// println!("{} merkle root {} at {}", hash, info.merkle_root, info.time);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct MultiExplorer {
    explorers: Arc<[Box<dyn BlockExplorer>]>,
    min_providers: usize,
}

impl MultiExplorer {
    /// Builds HTTP explorers for the configured (or registry default)
    /// providers. Every provider is validated before anything is queried.
    pub fn new(config: MultiExplorerConfig) -> Result<Self> {
        let providers = config.effective_providers()?;
        let client = build_client()?;

        let explorers = providers
            .iter()
            .map(|spec| {
                Explorer::with_client(client.clone(), spec)
                    .map(|explorer| Box::new(explorer) as Box<dyn BlockExplorer>)
            })
            .collect::<Result<Vec<_>>>()?;

        info!(
            "Configured {} explorers for network {}",
            explorers.len(),
            config.network
        );

        Self::from_explorers(explorers, config.min_providers)
    }

    /// Wraps arbitrary [`BlockExplorer`] implementations.
    pub fn from_explorers(
        explorers: Vec<Box<dyn BlockExplorer>>,
        min_providers: usize,
    ) -> Result<Self> {
        if min_providers == 0 {
            return Err(MultiExplorerError::Config(
                "min_providers must be at least 1".into(),
            ));
        }

        if explorers.len() < min_providers {
            return Err(MultiExplorerError::Config(format!(
                "at least {} providers are required, got {}",
                min_providers,
                explorers.len()
            )));
        }

        Ok(Self {
            explorers: explorers.into(),
            min_providers,
        })
    }

    /// Hash of the block at `height`, agreed on by every responding explorer.
    pub async fn block_hash(&self, height: u64) -> Result<BlockHash> {
        let query = BlockQuery::HashAtHeight(height);
        let outcomes = self
            .fan_out(&query, |explorer| explorer.block_hash(height))
            .await;
        reach_consensus(&query, outcomes)
    }

    /// Merkle root and time of the block `hash`, agreed on by every
    /// responding explorer.
    pub async fn block_info(&self, hash: &BlockHash) -> Result<BlockInfo> {
        let query = BlockQuery::InfoForHash(hash.clone());
        let outcomes = self
            .fan_out(&query, |explorer| explorer.block_info(hash))
            .await;
        reach_consensus(&query, outcomes)
    }

    /// Resolves the hash at `height`, then that block's info.
    pub async fn block_at_height(&self, height: u64) -> Result<(BlockHash, BlockInfo)> {
        let hash = self.block_hash(height).await?;
        let info = self.block_info(&hash).await?;
        Ok((hash, info))
    }

    /// Checks that the block at `height` commits to `merkle_root` and
    /// returns its time.
    ///
    /// Hex case is ignored when comparing roots.
    pub async fn verify_merkle_root(&self, height: u64, merkle_root: &str) -> Result<u64> {
        let (_, info) = self.block_at_height(height).await?;

        if !info.merkle_root.eq_ignore_ascii_case(merkle_root) {
            return Err(MultiExplorerError::MerkleRootMismatch {
                height,
                expected: merkle_root.to_string(),
                found: info.merkle_root,
            });
        }

        debug!("Merkle root verified at height {} (time {})", height, info.time);
        Ok(info.time)
    }

    pub fn urls(&self) -> Vec<&str> {
        self.explorers.iter().map(|explorer| explorer.url()).collect()
    }

    pub fn provider_count(&self) -> usize {
        self.explorers.len()
    }

    pub fn min_providers(&self) -> usize {
        self.min_providers
    }

    /// Runs `attempt` against every explorer and settles each attempt into an
    /// [`Outcome`]; one failing explorer never cuts the others short.
    async fn fan_out<'a, T>(
        &'a self,
        query: &BlockQuery,
        attempt: impl Fn(&'a dyn BlockExplorer) -> ExplorerFut<'a, T>,
    ) -> Vec<Outcome<T>> {
        debug!("Querying {} explorers for {}", self.explorers.len(), query);

        let attempts = self.explorers.iter().map(|explorer| {
            let explorer: &'a dyn BlockExplorer = &**explorer;
            let pending = attempt(explorer);
            async move {
                Outcome {
                    url: explorer.url().to_string(),
                    result: pending.await,
                }
            }
        });

        join_all(attempts).await
    }
}

impl std::fmt::Debug for MultiExplorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MultiExplorer")
            .field("urls", &self.urls())
            .field("min_providers", &self.min_providers)
            .finish()
    }
}
