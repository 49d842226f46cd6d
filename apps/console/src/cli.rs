//! CLI argument definitions for the Bazaar console.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "bazaar",
    version,
    about = "Bazaar module console - install, enable and open business-tool modules",
    long_about = "Manage the business-tool modules of a Bazaar register.\n\n\
                  Module state is kept in a local SQLite store and survives restarts.\n\
                  Extra modules can be registered from a TOML manifest file."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Config file (default: <config dir>/bazaar.toml).
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// SQLite file to use instead of the configured one.
    #[arg(long = "db", value_name = "PATH", global = true)]
    pub db: Option<PathBuf>,

    /// TOML file with extra `[[module]]` manifests.
    #[arg(long, value_name = "PATH", global = true)]
    pub manifests: Option<PathBuf>,

    /// Keep module state in memory; nothing is written to disk.
    #[arg(long, global = true)]
    pub ephemeral: bool,

    /// Print responses as JSON.
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// List modules that can be installed.
    List,

    /// List active (enabled) modules.
    Installed,

    /// Show one module's manifest and state.
    Show(ModuleArg),

    /// Install a module.
    Install(ModuleArg),

    /// Switch an installed module on.
    Enable(ModuleArg),

    /// Switch an installed module off.
    Disable(ModuleArg),

    /// Remove a module's state. Does nothing if it is not installed.
    Uninstall(ModuleArg),

    /// Render a module.
    Open(ModuleArg),

    /// List state records whose module is no longer registered.
    Orphans,

    /// Delete every orphaned state record.
    PurgeOrphans,

    /// Print the effective configuration.
    Config,
}

#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct ModuleArg {
    /// Module id, e.g. `tax-calculator`.
    #[arg(value_name = "MODULE_ID")]
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_subcommands() {
        let cli = Cli::try_parse_from(["bazaar", "install", "inventory"]).unwrap();
        assert_eq!(
            cli.command,
            Command::Install(ModuleArg {
                id: "inventory".into()
            })
        );
        assert!(!cli.json);

        let cli = Cli::try_parse_from(["bazaar", "purge-orphans", "--json", "--ephemeral"]).unwrap();
        assert_eq!(cli.command, Command::PurgeOrphans);
        assert!(cli.json);
        assert!(cli.ephemeral);

        let cli = Cli::try_parse_from(["bazaar", "--db", "/tmp/x.db", "list"]).unwrap();
        assert_eq!(cli.db, Some(PathBuf::from("/tmp/x.db")));
    }

    #[test]
    fn test_module_id_required() {
        assert!(Cli::try_parse_from(["bazaar", "enable"]).is_err());
    }
}
