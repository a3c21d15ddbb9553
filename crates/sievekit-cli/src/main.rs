mod cli;
mod commands;
mod config;
mod observability;
mod output;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Commands};
use output::print_error;

fn main() {
    if let Err(e) = run() {
        print_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    observability::init_tracing(&cli.log_level);
    let format = cli.format.unwrap_or_else(|| cli.command.default_format());

    match &cli.command {
        Commands::Encode(args) => {
            let config = config::resolve(cli.config.as_deref())?;
            commands::encode::encode(&config, args)?;
        }
        Commands::Decode(args) => {
            let config = config::resolve(cli.config.as_deref())?;
            commands::decode::decode(&config, args, format)?;
        }
        Commands::Merge(args) => {
            commands::merge::merge(args, format)?;
        }
        Commands::Operators => {
            let config = config::resolve(cli.config.as_deref())?;
            commands::operators::operators(&config, format)?;
        }
    }

    Ok(())
}
