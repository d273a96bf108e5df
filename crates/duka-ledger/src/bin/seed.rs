//! # Seed Binary
//!
//! Opens (or creates) a ledger database and runs the one-time starter
//! catalog seeding. Safe to run repeatedly: the first-launch flag makes
//! reruns no-ops.
//!
//! ## Usage
//! ```text
//! seed [--db path/to/duka.db]
//! ```
//! Defaults to `duka.db` in the working directory.

use std::sync::Arc;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use duka_ledger::seed::seed_if_first_launch;
use duka_ledger::{Ledger, SqliteStore, StoreConfig};

fn db_path_from_args() -> String {
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--db" {
            if let Some(path) = args.next() {
                return path;
            }
        }
    }
    "duka.db".to_string()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .init();

    let path = db_path_from_args();
    info!(db = %path, "Opening ledger store");

    let store = SqliteStore::open(StoreConfig::new(&path)).await?;
    let ledger = Ledger::new(Arc::new(store));

    let report = seed_if_first_launch(&ledger).await?;
    if report.seeded {
        info!(
            products = report.products,
            networks = report.networks,
            "Starter catalog seeded"
        );
    } else {
        info!("Store already initialized, nothing to do");
    }

    Ok(())
}
