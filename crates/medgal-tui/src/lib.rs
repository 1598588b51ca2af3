//! Full-screen TUI for the Medical Gallery portal.

pub mod common;
pub mod effects;
pub mod events;
pub mod features;
pub mod overlays;
pub mod render;
pub mod routes;
pub mod runtime;
pub mod state;
pub mod terminal;
pub mod update;

use std::io::{IsTerminal, stderr};

use anyhow::Result;
use medgal_core::api::ApiClient;
use medgal_core::config::{self, Config};
use medgal_core::session::SessionStore;
pub use runtime::TuiRuntime;

/// Runs the interactive portal.
///
/// # Errors
/// Fails when no terminal is attached or terminal setup fails.
pub async fn run_portal(config: Config) -> Result<()> {
    if !stderr().is_terminal() {
        anyhow::bail!(
            "The portal requires a terminal.\n\
             Use `medgal login` / `medgal whoami` for non-interactive use."
        );
    }

    let api = ApiClient::new(&config.api_base_url)?;
    let session = SessionStore::new(config::paths::session_path());

    let mut runtime = TuiRuntime::new(config, api, session)?;
    runtime.run()?;

    Ok(())
}
