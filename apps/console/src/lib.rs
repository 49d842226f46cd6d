//! # Bazaar Console Library
//!
//! Command-line front end for the Bazaar module engine.
//!
//! ## Module Structure
//! ```text
//! bazaar_console/
//! ├── lib.rs          ◄─── You are here (run + setup)
//! ├── main.rs         ◄─── Entry point (calls run())
//! ├── cli.rs          ◄─── clap definitions
//! ├── error.rs        ◄─── ApiError type
//! ├── commands/       ◄─── Command implementations
//! │   ├── mod.rs
//! │   ├── modules.rs  ◄─── list, install, enable, open, ...
//! │   └── config.rs   ◄─── get_config
//! └── state/          ◄─── Shared state
//!     ├── mod.rs
//!     ├── config.rs   ◄─── ConfigState
//!     └── modules.rs  ◄─── ModulesState (store + engine + loader)
//! ```
//!
//! ## Run Sequence
//! 1. Parse arguments
//! 2. Initialize tracing (stderr, `RUST_LOG` aware)
//! 3. Resolve configuration (file → env → flags)
//! 4. Open the store and boot the module engine
//! 5. Dispatch the command
//! 6. Print the response as text or JSON

pub mod cli;
pub mod commands;
pub mod error;
pub mod state;

use clap::Parser;
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};
use commands::Response;
use error::ApiError;
use state::{ConfigState, ModulesState};

/// Parses arguments, runs one command and reports the outcome.
pub async fn run() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    info!(version = env!("CARGO_PKG_VERSION"), "Bazaar console starting");

    match execute(&cli).await {
        Ok(response) => {
            print_response(&response, cli.json);
            ExitCode::SUCCESS
        }
        Err(err) => {
            print_error(&err, cli.json);
            ExitCode::FAILURE
        }
    }
}

/// Runs the parsed command end to end.
pub async fn execute(cli: &Cli) -> Result<Response, ApiError> {
    let config = ConfigState::load(cli.config.clone())?.with_overrides(
        cli.db.clone(),
        cli.manifests.clone(),
        cli.ephemeral,
    )?;

    if cli.command == Command::Config {
        return Ok(Response::Config(commands::config::get_config(&config)));
    }

    let modules = ModulesState::open(&config).await?;
    if let Some(report) = modules.report() {
        debug!(
            session_id = %report.session_id,
            manifests = report.manifests,
            states = report.states,
            "Engine booted"
        );
    }

    let result = commands::dispatch(&cli.command, &modules).await;
    modules.close().await;
    result
}

/// Initializes the tracing subscriber.
///
/// Logs go to stderr so stdout stays clean for command output.
///
/// ## Log Levels
/// - `RUST_LOG` overrides everything
/// - Default: `info` for most crates, `debug` for bazaar crates
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,bazaar=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_response(response: &Response, json: bool) {
    if json {
        match serde_json::to_string_pretty(response) {
            Ok(out) => println!("{}", out),
            Err(e) => eprintln!("error: could not encode response: {}", e),
        }
    } else {
        print!("{}", response);
    }
}

fn print_error(err: &ApiError, json: bool) {
    if json {
        match serde_json::to_string_pretty(err) {
            Ok(out) => println!("{}", out),
            Err(_) => eprintln!("error: {}", err.message),
        }
    } else {
        eprintln!("error: {}", err.message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[tokio::test]
    async fn test_execute_config_skips_the_engine() {
        let cli = parse(&[
            "bazaar",
            "config",
            "--ephemeral",
            "--config",
            "/nonexistent/bazaar.toml",
        ]);

        match execute(&cli).await.unwrap() {
            Response::Config(config) => {
                assert!(config.engine.store.ephemeral);
                assert_eq!(
                    config.config_file,
                    Some(std::path::PathBuf::from("/nonexistent/bazaar.toml"))
                );
            }
            other => panic!("unexpected response: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_execute_ephemeral_run() {
        let cli = parse(&[
            "bazaar",
            "list",
            "--ephemeral",
            "--config",
            "/nonexistent/bazaar.toml",
        ]);

        match execute(&cli).await.unwrap() {
            Response::Available(list) => assert!(list.iter().any(|m| m.id == "inventory")),
            other => panic!("unexpected response: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_execute_state_carries_across_runs_on_disk() {
        let dir = std::env::temp_dir().join(format!("bazaar-lib-{}", std::process::id()));
        let db = dir.join("bazaar.db");
        let db = db.to_str().unwrap();

        fn command_line(db: &str, command: &[&str]) -> Cli {
            let mut args = vec!["bazaar", "--config", "/nonexistent/bazaar.toml", "--db", db];
            args.extend_from_slice(command);
            parse(&args)
        }

        execute(&command_line(db, &["install", "theme-switcher"])).await.unwrap();
        execute(&command_line(db, &["enable", "theme-switcher"])).await.unwrap();

        match execute(&command_line(db, &["installed"])).await.unwrap() {
            Response::Installed(list) => {
                assert_eq!(list.len(), 1);
                assert_eq!(list[0].id, "theme-switcher");
            }
            other => panic!("unexpected response: {:?}", other),
        }

        let err = execute(&command_line(db, &["install", "theme-switcher"])).await.unwrap_err();
        assert_eq!(err.code, error::ErrorCode::AlreadyInstalled);

        std::fs::remove_dir_all(&dir).ok();
    }
}
