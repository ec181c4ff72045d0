use std::time::Duration;

use url::Url;

use crate::error::{MultiExplorerError, Result};
use crate::normalizer::ExplorerKind;
use crate::registry::{ProviderRegistry, BITCOIN};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_MIN_PROVIDERS: usize = 2;

/// One explorer endpoint: base URL, response format and per-request timeout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSpec {
    pub url: String,
    pub kind: ExplorerKind,
    /// Falls back to the configuration timeout when unset.
    pub timeout: Option<Duration>,
}

impl ProviderSpec {
    pub fn new(url: impl Into<String>, kind: ExplorerKind) -> Self {
        Self {
            url: url.into(),
            kind,
            timeout: None,
        }
    }

    pub fn insight(url: impl Into<String>) -> Self {
        Self::new(url, ExplorerKind::Insight)
    }

    pub fn esplora(url: impl Into<String>) -> Self {
        Self::new(url, ExplorerKind::Esplora)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn timeout_or_default(&self) -> Duration {
        self.timeout.unwrap_or(DEFAULT_TIMEOUT)
    }

    /// Checks URL and timeout, returning the parsed base URL.
    pub fn validate(&self) -> Result<Url> {
        if self.url.trim().is_empty() {
            return Err(MultiExplorerError::Config("provider URL is empty".into()));
        }

        let url = Url::parse(&self.url).map_err(|e| {
            MultiExplorerError::Config(format!("invalid provider URL {:?}: {}", self.url, e))
        })?;

        if !matches!(url.scheme(), "http" | "https") || url.host().is_none() {
            return Err(MultiExplorerError::Config(format!(
                "provider URL {:?} must be an absolute http(s) URL",
                self.url
            )));
        }

        if self.timeout.is_some_and(|timeout| timeout.is_zero()) {
            return Err(MultiExplorerError::Config(format!(
                "timeout for {} must be greater than zero",
                self.url
            )));
        }

        Ok(url)
    }
}

#[derive(Debug, Clone)]
pub struct MultiExplorerConfig {
    pub network: String,
    pub providers: Vec<ProviderSpec>,
    pub timeout: Duration,
    pub min_providers: usize,
    pub registry: ProviderRegistry,
}

impl Default for MultiExplorerConfig {
    fn default() -> Self {
        Self {
            network: BITCOIN.to_string(),
            providers: Vec::new(),
            timeout: DEFAULT_TIMEOUT,
            min_providers: DEFAULT_MIN_PROVIDERS,
            registry: ProviderRegistry::default(),
        }
    }
}

impl MultiExplorerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_network(mut self, network: impl Into<String>) -> Self {
        self.network = network.into();
        self
    }

    pub fn with_providers(mut self, providers: Vec<ProviderSpec>) -> Self {
        self.providers = providers;
        self
    }

    pub fn with_provider(mut self, provider: ProviderSpec) -> Self {
        self.providers.push(provider);
        self
    }

    /// Timeout for every provider that does not set its own.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_min_providers(mut self, min_providers: usize) -> Self {
        self.min_providers = min_providers;
        self
    }

    pub fn with_registry(mut self, registry: ProviderRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_providers == 0 {
            return Err(MultiExplorerError::Config(
                "min_providers must be at least 1".into(),
            ));
        }

        if self.timeout.is_zero() {
            return Err(MultiExplorerError::Config(
                "timeout must be greater than zero".into(),
            ));
        }

        Ok(())
    }

    /// The provider list an aggregator built from this config will query.
    ///
    /// Explicit providers are always validated. They win when there are at
    /// least `min_providers` of them; otherwise the registry table for
    /// `network` is used, every entry as an Insight explorer. Providers
    /// without their own timeout get the configured one.
    pub fn effective_providers(&self) -> Result<Vec<ProviderSpec>> {
        self.validate()?;

        for provider in &self.providers {
            provider.validate()?;
        }

        let providers: Vec<ProviderSpec> = if self.providers.len() >= self.min_providers {
            self.providers
                .iter()
                .map(|provider| ProviderSpec {
                    timeout: Some(provider.timeout.unwrap_or(self.timeout)),
                    ..provider.clone()
                })
                .collect()
        } else {
            let urls = self.registry.lookup(&self.network).ok_or_else(|| {
                MultiExplorerError::Config(format!(
                    "no default providers for network {:?}",
                    self.network
                ))
            })?;
            urls.iter()
                .map(|url| ProviderSpec::insight(url.as_str()).with_timeout(self.timeout))
                .collect()
        };

        if providers.len() < self.min_providers {
            return Err(MultiExplorerError::Config(format!(
                "at least {} providers are required, got {}",
                self.min_providers,
                providers.len()
            )));
        }

        for provider in &providers {
            provider.validate()?;
        }

        Ok(providers)
    }
}
