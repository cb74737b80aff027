mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use voucherbox::Engine;
use voucherbox::config::Config;
use voucherbox::observability;

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();

    let config = match cli.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };
    observability::init_tracing(&config.telemetry);

    if let Commands::Config = cli.command {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    let engine = Engine::start(&config)?;
    let outcome = commands::run(&engine, cli.command);
    engine.close()?;

    outcome
}
