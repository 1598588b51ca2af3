//! Config management commands.

use anyhow::Result;
use medgal_core::config::{Config, paths};

pub fn config_path() -> Result<()> {
    println!("{}", paths::config_path().display());
    Ok(())
}

pub fn config_init() -> Result<()> {
    let path = Config::init()?;
    println!("Created config at {}", path.display());
    Ok(())
}
