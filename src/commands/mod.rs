// Command handlers module
pub mod check;
pub mod config;
pub mod gather;

use anyhow::Result;
use clap::ArgMatches;
use std::path::PathBuf;

use crate::core::config::DetectorConfig;

// Re-exports for cleaner imports
pub use check::execute as check;
pub use gather::execute as gather;

/// Resolve the effective configuration from `--config` and `--executable`
pub fn resolve_config(matches: &ArgMatches) -> Result<DetectorConfig> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => DetectorConfig::load_from(path)?,
        None => DetectorConfig::load()?,
    };

    if let Some(executable) = matches.get_one::<String>("executable") {
        config.executable = executable.clone();
    }

    Ok(config)
}
