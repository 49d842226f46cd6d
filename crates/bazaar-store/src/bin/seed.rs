//! # Seed Data Generator
//!
//! Writes a development `installed_modules` collection into a store file.
//!
//! ## Usage
//! ```bash
//! # Enable the first three built-in modules (default)
//! cargo run -p bazaar-store --bin seed
//!
//! # Install more of them
//! cargo run -p bazaar-store --bin seed -- --count 6
//!
//! # Add a state record with no manifest behind it
//! cargo run -p bazaar-store --bin seed -- --orphan legacy-loyalty
//!
//! # Specify database path
//! cargo run -p bazaar-store --bin seed -- --db ./data/bazaar.db
//! ```
//!
//! Seeded modules alternate between `enabled` and `disabled`, starting with
//! `enabled`, so both listings have something in them.

use bazaar_core::catalog::BUILTIN_MODULE_IDS;
use bazaar_core::{ModuleState, ModuleStatus, INSTALLED_MODULES_KEY};
use bazaar_store::{KeyValueStore, Store, StoreConfig};
use chrono::Utc;
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    let mut count: usize = 3;
    let mut db_path = String::from("./bazaar_dev.db");
    let mut orphans: Vec<String> = Vec::new();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(3);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--orphan" | "-o" => {
                if i + 1 < args.len() {
                    orphans.push(args[i + 1].clone());
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Bazaar Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>     Built-in modules to install (default: 3)");
                println!("  -o, --orphan <ID>   Add a state record with no manifest (repeatable)");
                println!("  -d, --db <PATH>     Database file path (default: ./bazaar_dev.db)");
                println!("  -h, --help          Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    let count = count.min(BUILTIN_MODULE_IDS.len());

    println!("🌱 Bazaar Seed Data Generator");
    println!("=============================");
    println!("Database: {}", db_path);
    println!("Modules:  {}", count);
    println!();

    let store = Store::new(StoreConfig::new(&db_path)).await?;
    let now = Utc::now();

    let mut states: Vec<ModuleState> = BUILTIN_MODULE_IDS
        .iter()
        .take(count)
        .enumerate()
        .map(|(index, id)| {
            let status = if index % 2 == 0 {
                ModuleStatus::Enabled
            } else {
                ModuleStatus::Disabled
            };
            ModuleState::installed(*id, now).with_status(status, now)
        })
        .collect();

    for orphan in orphans {
        states.push(ModuleState::installed(orphan, now).with_status(ModuleStatus::Enabled, now));
    }

    for state in &states {
        println!("  {:<20} {}", state.id, state.status);
    }

    let payload = serde_json::to_string(&states)?;
    store.set(INSTALLED_MODULES_KEY, &payload).await?;
    store.close().await;

    println!();
    println!("✅ Wrote {} state records", states.len());

    Ok(())
}
