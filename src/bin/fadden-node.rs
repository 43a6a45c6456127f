#![forbid(unsafe_code)]
//! Local driver: pools signed transactions and appends a run of blocks to a fresh ledger.

use clap::Parser;
use fadden::block::Block;
use fadden::blockchain::Blockchain;
use fadden::config::{load_config, DEFAULT_CONFIG_PATH};
use fadden::crypto::KeyPair;
use fadden::hasher::TxHasher;
use fadden::mempool::TxPool;
use fadden::transaction::Transaction;
use fadden::types::{random_bytes, unix_nanos};
use tracing::{info, warn};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: String,
    /// Number of blocks to produce (overrides node.blocks)
    #[arg(long)]
    blocks: Option<u32>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    let level: tracing::Level = config.node.log_level.parse()?;
    tracing_subscriber::fmt().with_max_level(level).init();

    let validator_key = KeyPair::generate();
    let client_key = KeyPair::generate();
    info!(validator = %validator_key.address(), "starting local ledger");

    let chain = Blockchain::new(Block::genesis(config.chain.version))?;
    let pool = TxPool::with_capacity(config.mempool.max_transactions);
    let blocks = cli.blocks.unwrap_or(config.node.blocks);

    for _ in 0..blocks {
        for _ in 0..config.node.txs_per_block {
            let mut tx = Transaction::new(random_bytes(32));
            tx.sign(&client_key)?;
            tx.set_first_seen(unix_nanos());
            tx.verify()?;
            if let Err(e) = pool.add(tx) {
                warn!(error = %e, "transaction dropped");
            }
        }

        let included: Vec<Transaction> = pool
            .transactions()
            .into_iter()
            .take(config.node.txs_per_block)
            .collect();

        let tip = chain
            .tip()
            .ok_or("ledger has no genesis header")?;
        let mut block = Block::from_prev_header(&tip, included)?;
        block.sign(&validator_key)?;
        chain.add_block(&block)?;

        for tx in block.transactions() {
            pool.remove(&tx.hash(&TxHasher));
        }

        info!(
            height = block.height(),
            transactions = block.transactions().len(),
            pooled = pool.len(),
            "block appended"
        );
    }

    let tip_hash = chain.tip_hash().map(|h| h.to_string()).unwrap_or_default();
    println!("height: {}", chain.height());
    println!("tip:    {}", tip_hash);
    Ok(())
}
