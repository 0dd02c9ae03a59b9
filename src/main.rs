use anyhow::Result;
use clap::{Arg, ArgAction, Command};
use std::path::PathBuf;
use std::process;

use gcu_probe::commands;

fn cli() -> Command {
    Command::new("gcu-probe")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Report Enflame GCU devices using the efsmi diagnostic tool")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("executable")
                .short('e')
                .long("executable")
                .value_name("PATH")
                .help("efsmi binary to run (overrides the config file)")
                .global(true),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Config file to use instead of the default location")
                .value_parser(clap::value_parser!(PathBuf))
                .global(true),
        )
        .subcommand(Command::new("check").about("Check whether efsmi is available"))
        .subcommand(
            Command::new("gather")
                .about("Query every category and print one record per device")
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Print records as JSON")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("config")
                .about("Inspect or create the configuration file")
                .subcommand_required(true)
                .arg_required_else_help(true)
                .subcommand(Command::new("show").about("Print the effective configuration"))
                .subcommand(Command::new("path").about("Print the config file location"))
                .subcommand(
                    Command::new("init")
                        .about("Write a default config file")
                        .arg(
                            Arg::new("force")
                                .long("force")
                                .help("Overwrite an existing file")
                                .action(ArgAction::SetTrue),
                        ),
                ),
        )
}

fn main() -> Result<()> {
    gcu_probe::init_logging();

    let matches = cli().get_matches();
    let config = commands::resolve_config(&matches)?;

    match matches.subcommand() {
        Some(("check", _)) => {
            if !commands::check(&config)? {
                process::exit(1);
            }
        }
        Some(("gather", sub_matches)) => commands::gather(sub_matches, &config)?,
        Some(("config", sub_matches)) => commands::config::execute(sub_matches, &config)?,
        _ => {
            println!("Use 'gcu-probe --help' for more information.");
        }
    }

    Ok(())
}
