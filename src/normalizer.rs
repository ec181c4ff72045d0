//! Per-family translation of explorer response bodies into canonical values.
//!
//! Every field name that differs between explorer APIs lives in this module.

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::{MultiExplorerError, Result};
use crate::types::{BlockHash, BlockInfo};

/// Response format spoken by an explorer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ExplorerKind {
    /// Insight / Bitcore API: `/block-index/{height}` and `/block/{hash}`.
    #[default]
    Insight,
    /// Esplora API: `/block-height/{height}` and `/block/{hash}`.
    Esplora,
}

#[derive(Deserialize)]
struct InsightBlockIndex {
    #[serde(rename = "blockHash")]
    block_hash: Option<String>,
}

#[derive(Deserialize)]
struct InsightBlock {
    merkleroot: Option<String>,
    time: Option<u64>,
}

#[derive(Deserialize)]
struct EsploraBlock {
    merkle_root: Option<String>,
    timestamp: Option<u64>,
}

impl ExplorerKind {
    pub fn name(&self) -> &'static str {
        match self {
            ExplorerKind::Insight => "insight",
            ExplorerKind::Esplora => "esplora",
        }
    }

    /// Path segment of the height-to-hash endpoint.
    pub fn index_path(&self) -> &'static str {
        match self {
            ExplorerKind::Insight => "block-index",
            ExplorerKind::Esplora => "block-height",
        }
    }

    /// Path segment of the block detail endpoint.
    pub fn block_path(&self) -> &'static str {
        "block"
    }

    /// Extracts the block hash from a height lookup response.
    ///
    /// `url` is only used to label the error.
    pub fn normalize_hash(&self, url: &str, body: &str) -> Result<BlockHash> {
        let hash = match self {
            ExplorerKind::Insight => parse_json::<InsightBlockIndex>(url, body)?.block_hash,
            ExplorerKind::Esplora => Some(parse_bare_hash(url, body)?),
        };

        match hash {
            Some(hash) if hash.is_empty() => {
                Err(MultiExplorerError::malformed(url, "missing block hash"))
            }
            Some(hash) if !hash.chars().all(|c| c.is_ascii_hexdigit()) => {
                Err(MultiExplorerError::malformed(url, "block hash is not hex"))
            }
            Some(hash) => Ok(BlockHash::new(hash)),
            None => Err(MultiExplorerError::malformed(url, "missing block hash")),
        }
    }

    /// Extracts merkle root and block time from a block detail response.
    pub fn normalize_info(&self, url: &str, body: &str) -> Result<BlockInfo> {
        let (merkle_root, time) = match self {
            ExplorerKind::Insight => {
                let block = parse_json::<InsightBlock>(url, body)?;
                (block.merkleroot, block.time)
            }
            ExplorerKind::Esplora => {
                let block = parse_json::<EsploraBlock>(url, body)?;
                (block.merkle_root, block.timestamp)
            }
        };

        let merkle_root = merkle_root
            .filter(|root| !root.is_empty())
            .ok_or_else(|| MultiExplorerError::malformed(url, "missing merkle root"))?;
        let time = time
            .filter(|&time| time != 0)
            .ok_or_else(|| MultiExplorerError::malformed(url, "missing block time"))?;

        Ok(BlockInfo { merkle_root, time })
    }
}

impl fmt::Display for ExplorerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ExplorerKind {
    type Err = MultiExplorerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "insight" => Ok(ExplorerKind::Insight),
            "esplora" => Ok(ExplorerKind::Esplora),
            other => Err(MultiExplorerError::Config(format!(
                "unknown explorer kind: {:?}",
                other
            ))),
        }
    }
}

fn parse_json<T: DeserializeOwned>(url: &str, body: &str) -> Result<T> {
    if body.trim().is_empty() {
        return Err(MultiExplorerError::malformed(url, "empty body"));
    }
    serde_json::from_str(body).map_err(|e| MultiExplorerError::malformed(url, e.to_string()))
}

// Esplora answers height lookups with the hash as plain text.
fn parse_bare_hash(url: &str, body: &str) -> Result<String> {
    let body = body.trim();
    let hash = if body.starts_with('"') {
        serde_json::from_str::<String>(body)
            .map_err(|e| MultiExplorerError::malformed(url, e.to_string()))?
    } else {
        body.to_string()
    };

    if hash.is_empty() {
        return Err(MultiExplorerError::malformed(url, "empty body"));
    }
    Ok(hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://explorer.test/api";
    const GENESIS: &str = "000000000019d6689c085ae165831e934ff763ae46a2a6c172b3f1b60a8ce26f";
    const GENESIS_ROOT: &str = "4a5e1e4baab89f3a32518a88c31bc87f618f76673e2cc77ab2127b7afdeda33b";

    #[test]
    fn insight_hash_from_envelope() {
        let body = format!(r#"{{"blockHash":"{}"}}"#, GENESIS);
        let hash = ExplorerKind::Insight.normalize_hash(URL, &body).unwrap();
        assert_eq!(hash.as_str(), GENESIS);
    }

    #[test]
    fn esplora_hash_from_bare_body() {
        let hash = ExplorerKind::Esplora
            .normalize_hash(URL, &format!("{}\n", GENESIS))
            .unwrap();
        assert_eq!(hash.as_str(), GENESIS);

        let quoted = ExplorerKind::Esplora
            .normalize_hash(URL, &format!("\"{}\"", GENESIS))
            .unwrap();
        assert_eq!(quoted, hash);
    }

    #[test]
    fn hash_rejects_empty_or_missing() {
        for body in ["", "   ", "{}", r#"{"blockHash":""}"#, r#"{"blockHash":null}"#, "null"] {
            let err = ExplorerKind::Insight.normalize_hash(URL, body).unwrap_err();
            assert!(
                matches!(err, MultiExplorerError::MalformedResponse { .. }),
                "body {:?} gave {:?}",
                body,
                err
            );
        }

        for body in [r#"{"blockHash":"<html>"}"#, r#"{"blockHash":"00ff zz"}"#] {
            let err = ExplorerKind::Insight.normalize_hash(URL, body).unwrap_err();
            assert!(matches!(err, MultiExplorerError::MalformedResponse { .. }));
        }

        for body in ["", "Block not found", r#""""#] {
            let err = ExplorerKind::Esplora.normalize_hash(URL, body).unwrap_err();
            assert!(matches!(err, MultiExplorerError::MalformedResponse { .. }));
        }
    }

    #[test]
    fn both_families_normalize_to_the_same_info() {
        let insight = format!(r#"{{"merkleroot":"{}","time":1231006505,"height":0}}"#, GENESIS_ROOT);
        let esplora = format!(
            r#"{{"id":"{}","timestamp":1231006505,"merkle_root":"{}"}}"#,
            GENESIS, GENESIS_ROOT
        );

        let a = ExplorerKind::Insight.normalize_info(URL, &insight).unwrap();
        let b = ExplorerKind::Esplora.normalize_info(URL, &esplora).unwrap();

        assert_eq!(a, b);
        assert_eq!(a, BlockInfo::new(GENESIS_ROOT, 1_231_006_505));
    }

    #[test]
    fn info_requires_both_fields() {
        let cases = [
            "",
            r#"{"time":1231006505}"#,
            r#"{"merkleroot":"","time":1231006505}"#,
            r#"{"merkleroot":"abcd"}"#,
            r#"{"merkleroot":"abcd","time":0}"#,
            r#"{"merkleroot":"abcd","time":"soon"}"#,
        ];
        for body in cases {
            let err = ExplorerKind::Insight.normalize_info(URL, body).unwrap_err();
            assert!(
                matches!(err, MultiExplorerError::MalformedResponse { .. }),
                "body {:?} gave {:?}",
                body,
                err
            );
        }

        // Insight field names mean nothing to an Esplora normalizer.
        let insight_shaped = r#"{"merkleroot":"abcd","time":1231006505}"#;
        assert!(ExplorerKind::Esplora.normalize_info(URL, insight_shaped).is_err());
    }

    #[test]
    fn kind_from_name() {
        assert_eq!("insight".parse::<ExplorerKind>().unwrap(), ExplorerKind::Insight);
        assert_eq!(" Esplora ".parse::<ExplorerKind>().unwrap(), ExplorerKind::Esplora);
        assert!(matches!(
            "blockcypher".parse::<ExplorerKind>(),
            Err(MultiExplorerError::Config(_))
        ));
    }
}
