//! # Config Commands
//!
//! Console command for inspecting the effective configuration.

use tracing::debug;

use crate::state::ConfigState;

/// Gets the effective configuration.
///
/// ## When Used
/// - Checking which database file a register is using
/// - Checking whether a runtime manifest file is picked up
pub fn get_config(config: &ConfigState) -> ConfigState {
    debug!("get_config command");
    config.clone()
}
