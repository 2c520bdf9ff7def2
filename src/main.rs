use anyhow::Result;
use clap::Parser;

use playstat::{cli, config, pipeline};

fn main() -> Result<()> {
    let args = cli::Args::parse();

    let cfg = config::Config::load(args.config.as_deref())?;
    config::init_tracing(&cfg.logging, args.log_level.as_deref())?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "playstat starting");

    match args.command {
        cli::Command::Analyze(cmd) => pipeline::run_analyze(cmd, &cfg),
        cli::Command::Decode(cmd) => pipeline::run_decode(cmd, &cfg),
        cli::Command::Key(cmd) => pipeline::run_key(cmd, &cfg),
        cli::Command::PrintDefaultConfig => {
            let s = cfg.to_toml_pretty()?;
            print!("{s}");
            Ok(())
        }
    }
}
