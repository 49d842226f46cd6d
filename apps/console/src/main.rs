//! # Bazaar Console Entry Point
//!
//! ## Usage
//! ```text
//! bazaar list                      modules that can be installed
//! bazaar install inventory         add a module
//! bazaar enable inventory          put it on the toolbar
//! bazaar installed                 what is on the toolbar
//! bazaar open inventory            render it
//! bazaar --json show inventory     manifest + state as JSON
//! ```
//!
//! The actual setup is in lib.rs for testability.

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    bazaar_console::run().await
}
