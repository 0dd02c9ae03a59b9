use anyhow::{Context, Result};
use clap::ArgMatches;
use colored::Colorize;
use std::path::PathBuf;

use crate::core::config::DetectorConfig;

pub fn execute(matches: &ArgMatches, config: &DetectorConfig) -> Result<()> {
    match matches.subcommand() {
        Some(("show", _)) => show(config),
        Some(("path", _)) => {
            println!("{}", config_path(matches)?.display());
            Ok(())
        }
        Some(("init", sub_matches)) => init(matches, sub_matches.get_flag("force")),
        _ => {
            println!("Use 'gcu-probe config --help' for more information.");
            Ok(())
        }
    }
}

fn config_path(matches: &ArgMatches) -> Result<PathBuf> {
    match matches.get_one::<PathBuf>("config") {
        Some(path) => Ok(path.clone()),
        None => DetectorConfig::get_config_path(),
    }
}

fn show(config: &DetectorConfig) -> Result<()> {
    let json = serde_json::to_string_pretty(config).context("Failed to serialize config")?;
    println!("{}", json);

    // Surface grammar mistakes here rather than on the next gather
    config.build_grammar()?;
    Ok(())
}

fn init(matches: &ArgMatches, force: bool) -> Result<()> {
    let path = config_path(matches)?;

    if path.exists() && !force {
        println!(
            "{} {} already exists (use --force to overwrite)",
            "!".yellow().bold(),
            path.display()
        );
        return Ok(());
    }

    DetectorConfig::default().save_to(&path)?;
    println!("{} Wrote default config to {}", "✓".green().bold(), path.display());
    Ok(())
}
