//! # First-Launch Seeding
//!
//! Populates a brand-new store with a starter catalog so the first
//! session isn't an empty screen: common duka staples plus the mobile
//! money networks a Ugandan agent typically carries.
//!
//! Seeding is guarded by the `first_launch_done` flag and therefore
//! runs at most once per store; reinstalls over an existing store keep
//! the user's data untouched.

use serde_json::Value;
use std::sync::Arc;
use tracing::info;

use crate::error::LedgerResult;
use crate::ledger::Ledger;
use crate::store::keys;
use duka_core::types::{CommissionRates, FloatUpsert, InventoryUpsert};

/// A starter inventory item: name, stock, cost and selling price per
/// unit, display unit.
struct SeedProduct {
    name: &'static str,
    stock: i64,
    cost_price: i64,
    selling_price: i64,
    unit: &'static str,
}

/// A starter float entry: network name, opening balance, rates.
struct SeedNetwork {
    name: &'static str,
    balance: i64,
    deposit_rate: f64,
    withdrawal_rate: f64,
}

const SEED_PRODUCTS: &[SeedProduct] = &[
    SeedProduct {
        name: "Sugar",
        stock: 50,
        cost_price: 3_800,
        selling_price: 4_500,
        unit: "kg",
    },
    SeedProduct {
        name: "Rice",
        stock: 40,
        cost_price: 3_200,
        selling_price: 4_000,
        unit: "kg",
    },
    SeedProduct {
        name: "Maize Flour",
        stock: 60,
        cost_price: 2_500,
        selling_price: 3_200,
        unit: "kg",
    },
    SeedProduct {
        name: "Cooking Oil",
        stock: 24,
        cost_price: 7_500,
        selling_price: 9_000,
        unit: "litre",
    },
    SeedProduct {
        name: "Salt",
        stock: 30,
        cost_price: 1_000,
        selling_price: 1_500,
        unit: "kg",
    },
    SeedProduct {
        name: "Soap",
        stock: 48,
        cost_price: 2_800,
        selling_price: 3_500,
        unit: "bar",
    },
    SeedProduct {
        name: "Bread",
        stock: 20,
        cost_price: 3_500,
        selling_price: 4_500,
        unit: "loaf",
    },
];

const SEED_NETWORKS: &[SeedNetwork] = &[
    SeedNetwork {
        name: "MTN",
        balance: 500_000,
        deposit_rate: 0.01,
        withdrawal_rate: 0.015,
    },
    SeedNetwork {
        name: "Airtel",
        balance: 300_000,
        deposit_rate: 0.01,
        withdrawal_rate: 0.012,
    },
];

/// What the seeder actually did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub seeded: bool,
    pub products: usize,
    pub networks: usize,
}

/// Seeds the starter catalog once per store.
///
/// Returns `seeded: false` without touching anything when the
/// first-launch flag is already set.
pub async fn seed_if_first_launch(ledger: &Ledger) -> LedgerResult<SeedReport> {
    if first_launch_done(ledger.store()).await {
        return Ok(SeedReport {
            seeded: false,
            products: 0,
            networks: 0,
        });
    }

    info!(
        products = SEED_PRODUCTS.len(),
        networks = SEED_NETWORKS.len(),
        "Fresh store detected, seeding starter catalog"
    );

    for product in SEED_PRODUCTS {
        let patch = InventoryUpsert {
            item_name: product.name.to_string(),
            current_stock: Some(product.stock),
            cost_price: Some(product.cost_price),
            selling_price: Some(product.selling_price),
            unit: Some(product.unit.to_string()),
            ..InventoryUpsert::default()
        };
        ledger.inventory().upsert(&patch).await?;
    }

    for network in SEED_NETWORKS {
        let patch = FloatUpsert {
            network: network.name.to_string(),
            balance: Some(network.balance),
            commission_rates: Some(CommissionRates {
                deposit: network.deposit_rate,
                withdrawal: network.withdrawal_rate,
            }),
            ..FloatUpsert::default()
        };
        ledger.float().upsert(&patch).await?;
    }

    ledger
        .store()
        .put(keys::FIRST_LAUNCH_DONE, Value::Bool(true))
        .await?;

    Ok(SeedReport {
        seeded: true,
        products: SEED_PRODUCTS.len(),
        networks: SEED_NETWORKS.len(),
    })
}

/// Whether the store has already been through first-launch seeding.
/// Read errors count as done: better to skip seeding than to risk
/// overwriting real data behind an unreadable flag.
async fn first_launch_done(store: &Arc<dyn crate::store::KeyValueStore>) -> bool {
    match store.get(keys::FIRST_LAUNCH_DONE).await {
        Ok(Some(Value::Bool(done))) => done,
        Ok(Some(_)) => true,
        Ok(None) => false,
        Err(_) => true,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
