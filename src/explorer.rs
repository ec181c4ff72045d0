//! A single block explorer behind the two canonical block queries.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use reqwest::header::ACCEPT;
use reqwest::Client;
use tracing::debug;

use crate::config::ProviderSpec;
use crate::error::{MultiExplorerError, Result, TransportFailure};
use crate::normalizer::ExplorerKind;
use crate::types::{BlockHash, BlockInfo};

pub const USER_AGENT: &str = concat!("multi-explorer/", env!("CARGO_PKG_VERSION"));

pub type ExplorerFut<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

/// Anything that can answer block queries for one network.
///
/// [`MultiExplorer`](crate::MultiExplorer) only talks to its sources through
/// this trait. Implementations must not keep per-call state: every call is
/// independent and may run concurrently with others.
pub trait BlockExplorer: Send + Sync {
    /// Label used in logs and errors.
    fn url(&self) -> &str;

    fn block_hash(&self, height: u64) -> ExplorerFut<'_, BlockHash>;

    fn block_info<'a>(&'a self, hash: &'a BlockHash) -> ExplorerFut<'a, BlockInfo>;
}

/// HTTP explorer speaking one of the [`ExplorerKind`] APIs.
#[derive(Debug, Clone)]
pub struct Explorer {
    client: Client,
    url: String,
    kind: ExplorerKind,
    index_endpoint: String,
    block_endpoint: String,
    timeout: Duration,
}

impl Explorer {
    pub fn new(spec: &ProviderSpec) -> Result<Self> {
        Self::with_client(build_client()?, spec)
    }

    /// Builds an explorer sharing an existing HTTP client.
    pub fn with_client(client: Client, spec: &ProviderSpec) -> Result<Self> {
        spec.validate()?;

        let base = spec.url.trim_end_matches('/');
        Ok(Self {
            client,
            url: spec.url.clone(),
            kind: spec.kind,
            index_endpoint: format!("{}/{}", base, spec.kind.index_path()),
            block_endpoint: format!("{}/{}", base, spec.kind.block_path()),
            timeout: spec.timeout_or_default(),
        })
    }

    pub fn kind(&self) -> ExplorerKind {
        self.kind
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn block_hash_url(&self, height: u64) -> String {
        format!("{}/{}", self.index_endpoint, height)
    }

    pub fn block_info_url(&self, hash: &BlockHash) -> String {
        format!("{}/{}", self.block_endpoint, hash)
    }

    pub async fn fetch_block_hash(&self, height: u64) -> Result<BlockHash> {
        let body = self.get(&self.block_hash_url(height)).await?;
        self.kind.normalize_hash(&self.url, &body)
    }

    pub async fn fetch_block_info(&self, hash: &BlockHash) -> Result<BlockInfo> {
        let body = self.get(&self.block_info_url(hash)).await?;
        self.kind.normalize_info(&self.url, &body)
    }

    async fn get(&self, endpoint: &str) -> Result<String> {
        debug!("Sending request to provider {}", endpoint);

        let request = async {
            let response = self
                .client
                .get(endpoint)
                .header(ACCEPT, "application/json")
                .send()
                .await
                .map_err(|e| self.network_error(&e))?;

            let status = response.status();
            if !status.is_success() {
                return Err(MultiExplorerError::malformed(
                    &self.url,
                    format!("HTTP status {}", status),
                ));
            }

            response.text().await.map_err(|e| self.network_error(&e))
        };

        tokio::time::timeout(self.timeout, request)
            .await
            .map_err(|_| MultiExplorerError::Transport {
                url: self.url.clone(),
                failure: TransportFailure::Timeout(self.timeout),
            })?
    }

    fn network_error(&self, error: &reqwest::Error) -> MultiExplorerError {
        let failure = if error.is_timeout() {
            TransportFailure::Timeout(self.timeout)
        } else {
            TransportFailure::Network(describe_network_error(error))
        };
        MultiExplorerError::Transport {
            url: self.url.clone(),
            failure,
        }
    }
}

impl BlockExplorer for Explorer {
    fn url(&self) -> &str {
        &self.url
    }

    fn block_hash(&self, height: u64) -> ExplorerFut<'_, BlockHash> {
        Box::pin(self.fetch_block_hash(height))
    }

    fn block_info<'a>(&'a self, hash: &'a BlockHash) -> ExplorerFut<'a, BlockInfo> {
        Box::pin(self.fetch_block_info(hash))
    }
}

pub(crate) fn build_client() -> Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| MultiExplorerError::Config(format!("failed to build HTTP client: {}", e)))
}

// Keeps error messages free of full request URLs and query strings.
fn describe_network_error(error: &reqwest::Error) -> String {
    if error.is_connect() {
        "connection refused or unreachable".to_string()
    } else if error.is_body() {
        "response body error".to_string()
    } else if error.is_decode() {
        "response decode error".to_string()
    } else if error.is_redirect() {
        "too many redirects".to_string()
    } else if error.is_request() {
        "request failed".to_string()
    } else {
        "network error".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_endpoints_per_kind() {
        let insight = Explorer::new(&ProviderSpec::insight("https://insight.bitpay.com/api/")).unwrap();
        assert_eq!(
            insight.block_hash_url(0),
            "https://insight.bitpay.com/api/block-index/0"
        );
        assert_eq!(
            insight.block_info_url(&BlockHash::new("00ff")),
            "https://insight.bitpay.com/api/block/00ff"
        );

        let esplora = Explorer::new(
            &ProviderSpec::esplora("https://blockstream.info/api").with_timeout(Duration::from_secs(3)),
        )
        .unwrap();
        assert_eq!(
            esplora.block_hash_url(170),
            "https://blockstream.info/api/block-height/170"
        );
        assert_eq!(
            esplora.block_info_url(&BlockHash::new("abcd")),
            "https://blockstream.info/api/block/abcd"
        );
        assert_eq!(esplora.timeout(), Duration::from_secs(3));
        assert_eq!(esplora.kind(), ExplorerKind::Esplora);
        assert_eq!(esplora.url(), "https://blockstream.info/api");
    }

    #[test]
    fn rejects_invalid_spec() {
        assert!(matches!(
            Explorer::new(&ProviderSpec::insight("")),
            Err(MultiExplorerError::Config(_))
        ));
    }
}
