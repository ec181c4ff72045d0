use multi_explorer::{MultiExplorer, MultiExplorerConfig, MultiExplorerError, ProviderSpec};
use std::time::Duration;

const GENESIS_MERKLE_ROOT: &str =
    "4a5e1e4baab89f3a32518a88c31bc87f618f76673e2cc77ab2127b7afdeda33b";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let config = MultiExplorerConfig::new()
        .with_providers(vec![
            ProviderSpec::insight("https://insight.bitpay.com/api"),
            ProviderSpec::insight("https://btc-bitcore1.trezor.io/api"),
            ProviderSpec::esplora("https://blockstream.info/api")
                .with_timeout(Duration::from_secs(5)),
        ])
        .with_timeout(Duration::from_secs(10));

    let explorer = MultiExplorer::new(config)?;

    println!("Querying {} explorers:", explorer.provider_count());
    println!("{:-<60}", "");
    for url in explorer.urls() {
        println!("  {}", url);
    }
    println!("{:-<60}", "");

    let (hash, info) = explorer.block_at_height(0).await?;
    println!("Genesis hash: {}", hash);
    println!("Merkle root:  {}", info.merkle_root);
    println!("Time:         {}", info.time);

    match explorer.verify_merkle_root(0, GENESIS_MERKLE_ROOT).await {
        Ok(time) => println!("\nGenesis merkle root verified (block time {})", time),
        Err(MultiExplorerError::Conflict { query, distinct }) => {
            println!("\nExplorers disagree on {} ({} answers)", query, distinct)
        }
        Err(e) => println!("\nVerification failed: {}", e),
    }

    Ok(())
}
