use std::collections::BTreeMap;

pub const BITCOIN: &str = "bitcoin";
pub const BITCOIN_TESTNET: &str = "bitcoin-testnet";
pub const LITECOIN: &str = "litecoin";

const BITCOIN_INSIGHT_URLS: &[&str] = &[
    "https://www.localbitcoinschain.com/api",
    "https://search.bitaccess.co/insight-api",
    "https://insight.bitpay.com/api",
    "https://btc-bitcore1.trezor.io/api",
    "https://btc-bitcore4.trezor.io/api",
    "https://blockexplorer.com/api",
];

const BITCOIN_TESTNET_INSIGHT_URLS: &[&str] = &[
    "https://testnet.blockexplorer.com/api",
    "https://test-insight.bitpay.com/api",
];

const LITECOIN_INSIGHT_URLS: &[&str] = &[
    "https://ltc-bitcore1.trezor.io/api",
    "https://insight.litecore.io/api",
];

/// Default explorer base URLs per network.
///
/// Used when a configuration does not list enough providers itself. All
/// entries speak the Insight API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderRegistry {
    networks: BTreeMap<String, Vec<String>>,
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::empty()
            .with_network(BITCOIN, to_owned(BITCOIN_INSIGHT_URLS))
            .with_network(BITCOIN_TESTNET, to_owned(BITCOIN_TESTNET_INSIGHT_URLS))
            .with_network(LITECOIN, to_owned(LITECOIN_INSIGHT_URLS))
    }
}

impl ProviderRegistry {
    pub fn empty() -> Self {
        Self {
            networks: BTreeMap::new(),
        }
    }

    /// Inserts or replaces the URL list for `network`.
    pub fn with_network(mut self, network: impl Into<String>, urls: Vec<String>) -> Self {
        self.networks.insert(network.into(), urls);
        self
    }

    pub fn lookup(&self, network: &str) -> Option<&[String]> {
        self.networks.get(network).map(Vec::as_slice)
    }

    pub fn networks(&self) -> impl Iterator<Item = &str> {
        self.networks.keys().map(String::as_str)
    }
}

fn to_owned(urls: &[&str]) -> Vec<String> {
    urls.iter().map(|u| u.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tables() {
        let registry = ProviderRegistry::default();

        assert_eq!(
            registry.networks().collect::<Vec<_>>(),
            vec![BITCOIN, BITCOIN_TESTNET, LITECOIN]
        );
        for network in [BITCOIN, BITCOIN_TESTNET, LITECOIN] {
            let urls = registry.lookup(network).unwrap();
            assert!(urls.len() >= 2, "{} has {} urls", network, urls.len());
        }
        assert!(registry.lookup("dogecoin").is_none());
    }

    #[test]
    fn tables_are_replaceable() {
        let registry = ProviderRegistry::default()
            .with_network(BITCOIN, vec!["http://127.0.0.1:3001".to_string()])
            .with_network("regtest", vec![]);

        assert_eq!(
            registry.lookup(BITCOIN).unwrap(),
            &["http://127.0.0.1:3001".to_string()]
        );
        assert_eq!(registry.lookup("regtest").unwrap().len(), 0);
        assert!(ProviderRegistry::empty().lookup(BITCOIN).is_none());
    }
}
