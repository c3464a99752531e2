//! Binary entry point.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use ga_cli::cli::{Cli, Commands};
use ga_cli::commands::{awards, catalog};
use ga_cli::config::Config;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Some(Commands::Awards {
            date,
            library,
            tier,
            json,
            pick,
        }) => {
            let config = Config::load_from(cli.config.as_deref())
                .context("failed to load configuration")?;
            let options = awards::AwardsOptions {
                date,
                library,
                tier: tier.map(Into::into),
                json,
                pick,
            };
            awards::run(&mut std::io::stdout(), &options, &config)?;
        }
        Some(Commands::Catalog { tier }) => {
            catalog::run(&mut std::io::stdout(), tier.map(Into::into))?;
        }
        None => {
            Cli::command().print_help()?;
            println!();
        }
    }
    Ok(())
}
