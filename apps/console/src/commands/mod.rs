//! # Commands Module
//!
//! Every console subcommand, plus the response type they share.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (dispatch + Response)
//! ├── modules.rs  ◄─── List, install, enable, open, orphans
//! └── config.rs   ◄─── Configuration retrieval
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Flow                                         │
//! │                                                                         │
//! │  $ bazaar enable inventory                                              │
//! │         │                                                               │
//! │         │ (clap)                                                        │
//! │         ▼                                                               │
//! │  Command::Enable(ModuleArg { id: "inventory" })                         │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  dispatch(&command, &modules)                                           │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  modules::enable_module(&modules, "inventory")                          │
//! │      -> Result<ModuleStateDto, ApiError>                                │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Response::State(dto)  ──► text (default) or JSON (--json)              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod modules;

use bazaar_modules::ModuleView;
use serde::Serialize;
use std::fmt;

use crate::cli::Command;
use crate::error::ApiError;
use crate::state::{ConfigState, ModulesState};

use self::modules::{
    InstalledModuleDto, ModuleDetailDto, ModuleDto, ModuleStateDto, OpenDto, UninstallDto,
};

/// What a command produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Response {
    Available(Vec<ModuleDto>),
    Installed(Vec<InstalledModuleDto>),
    Module(ModuleDetailDto),
    State(ModuleStateDto),
    Uninstalled(UninstallDto),
    Opened(OpenDto),
    Orphans(Vec<ModuleStateDto>),
    Purged(Vec<String>),
    Config(ConfigState),
}

/// Runs a module command against the booted engine.
///
/// `Command::Config` needs no engine; use [`config::get_config`] for it.
pub async fn dispatch(command: &Command, modules: &ModulesState) -> Result<Response, ApiError> {
    let response = match command {
        Command::List => Response::Available(modules::list_available(modules).await),
        Command::Installed => Response::Installed(modules::list_installed(modules).await),
        Command::Show(arg) => Response::Module(modules::show_module(modules, &arg.id).await?),
        Command::Install(arg) => Response::State(modules::install_module(modules, &arg.id).await?),
        Command::Enable(arg) => Response::State(modules::enable_module(modules, &arg.id).await?),
        Command::Disable(arg) => Response::State(modules::disable_module(modules, &arg.id).await?),
        Command::Uninstall(arg) => {
            Response::Uninstalled(modules::uninstall_module(modules, &arg.id).await?)
        }
        Command::Open(arg) => Response::Opened(modules::open_module(modules, &arg.id).await),
        Command::Orphans => Response::Orphans(modules::list_orphans(modules).await),
        Command::PurgeOrphans => Response::Purged(modules::purge_orphans(modules).await?),
        Command::Config => {
            return Err(ApiError::internal(
                "config does not run against the module engine",
            ))
        }
    };
    Ok(response)
}

// =============================================================================
// Text Output
// =============================================================================

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Response::Available(list) if list.is_empty() => {
                writeln!(f, "Every module is already installed.")
            }
            Response::Available(list) => {
                for m in list {
                    writeln!(
                        f,
                        "{:<20} {:<22} {:<12} {}",
                        m.id,
                        m.name,
                        m.category.to_string(),
                        m.description
                    )?;
                }
                Ok(())
            }
            Response::Installed(list) if list.is_empty() => writeln!(f, "No modules enabled."),
            Response::Installed(list) => {
                for m in list {
                    writeln!(f, "{:<20} {:<22} {}", m.id, m.name, m.category)?;
                }
                Ok(())
            }
            Response::Module(detail) => {
                let m = &detail.module;
                writeln!(f, "{} ({})", m.name, m.id)?;
                writeln!(f, "  {}", m.description)?;
                writeln!(f, "  category:  {}", m.category)?;
                writeln!(f, "  component: {}", detail.component)?;
                if !m.enabled {
                    writeln!(f, "  switched off for this register")?;
                }
                match &detail.state {
                    Some(state) => writeln!(
                        f,
                        "  status:    {} (installed {})",
                        state.status,
                        state.installed_at.format("%Y-%m-%d %H:%M")
                    ),
                    None => writeln!(f, "  status:    not installed"),
                }
            }
            Response::State(state) => writeln!(f, "{}: {}", state.id, state.status),
            Response::Uninstalled(result) if result.removed => {
                writeln!(f, "Uninstalled {}.", result.id)
            }
            Response::Uninstalled(result) => writeln!(f, "{} was not installed.", result.id),
            Response::Opened(opened) => {
                write_view(f, &opened.view)?;
                if let Some(hint) = &opened.hint {
                    writeln!(f)?;
                    writeln!(f, "{}", hint)?;
                }
                Ok(())
            }
            Response::Orphans(list) if list.is_empty() => {
                writeln!(f, "No orphaned state records.")
            }
            Response::Orphans(list) => {
                for s in list {
                    writeln!(f, "{:<20} {}", s.id, s.status)?;
                }
                Ok(())
            }
            Response::Purged(ids) if ids.is_empty() => writeln!(f, "Nothing to purge."),
            Response::Purged(ids) => writeln!(
                f,
                "Purged {} orphaned record(s): {}",
                ids.len(),
                ids.join(", ")
            ),
            Response::Config(config) => {
                match &config.config_file {
                    Some(path) => writeln!(f, "config file: {}", path.display())?,
                    None => writeln!(f, "config file: (none)")?,
                }
                match config.database_path() {
                    Some(path) => writeln!(f, "database:    {}", path.display())?,
                    None => writeln!(f, "database:    (in memory)")?,
                }
                writeln!(f, "store key:   {}", config.engine.store_key())?;
                match config.engine.manifests_path() {
                    Some(path) => writeln!(f, "manifests:   {}", path.display()),
                    None => writeln!(f, "manifests:   (built-ins only)"),
                }
            }
        }
    }
}

fn write_view(f: &mut fmt::Formatter<'_>, view: &ModuleView) -> fmt::Result {
    match view {
        ModuleView::Rendered { view, .. } => {
            writeln!(f, "{}", view.title)?;
            writeln!(f, "{}", "=".repeat(view.title.chars().count()))?;
            for line in &view.body {
                writeln!(f, "{}", line)?;
            }
            Ok(())
        }
        ModuleView::NotFound { module_id } => writeln!(f, "Module not found: {}", module_id),
        ModuleView::AccessDenied { module_id } => {
            writeln!(f, "You do not have access to {}.", module_id)
        }
        ModuleView::Error { module_id, message } => {
            writeln!(f, "{} could not be opened: {}", module_id, message)
        }
    }
}
