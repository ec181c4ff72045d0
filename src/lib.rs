//! # multi-explorer
//!
//! Cross-checked block metadata lookups for timestamp verification.
//!
//! A single block explorer can be stale, compromised or simply wrong. This
//! crate asks several independent explorers the same question and only
//! accepts the answer if every explorer that responded agrees.
//!
//! ## Features
//!
//! - **Multiple Explorers**: Query Insight and Esplora style APIs side by side
//! - **Full Fan-out**: Every query goes to all explorers concurrently and waits for all of them
//! - **Soft Failures**: Explorers that time out or return garbage are ignored, not fatal
//! - **Strict Agreement**: Two different answers are a hard error, never a majority vote
//! - **Default Registries**: Public explorer lists for bitcoin, bitcoin-testnet and litecoin
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use multi_explorer::{MultiExplorer, MultiExplorerConfig, ProviderSpec};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = MultiExplorerConfig::new()
//!         .with_providers(vec![
//!             ProviderSpec::insight("https://insight.bitpay.com/api"),
//!             ProviderSpec::insight("https://btc-bitcore1.trezor.io/api"),
//!             ProviderSpec::esplora("https://blockstream.info/api"),
//!         ])
//!         .with_timeout(Duration::from_secs(10));
//!
//!     let explorer = MultiExplorer::new(config)?;
//!
//!     let hash = explorer.block_hash(0).await?;
//!     let info = explorer.block_info(&hash).await?;
//!     println!("genesis {} has merkle root {}", hash, info.merkle_root);
//!
//!     Ok(())
//! }
//! ```

pub mod config;
mod consensus;
pub mod error;
pub mod explorer;
pub mod normalizer;
pub mod provider;
pub mod registry;
pub mod types;

// Re-export main types at crate root
pub use config::{MultiExplorerConfig, ProviderSpec};
pub use error::{MultiExplorerError, Result, TransportFailure};
pub use explorer::{BlockExplorer, Explorer, ExplorerFut};
pub use normalizer::ExplorerKind;
pub use provider::MultiExplorer;
pub use registry::ProviderRegistry;
pub use types::{BlockHash, BlockInfo, BlockQuery};
