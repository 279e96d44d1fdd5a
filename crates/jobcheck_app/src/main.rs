mod cli;
mod config;
mod platform;

use clap::Parser;
use log::LevelFilter;

use cli::Cli;
use config::AppConfig;
use platform::logging::{self, LogDestination};
use platform::RunMode;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    if cli.verbose {
        logging::initialize(LogDestination::Both, LevelFilter::Debug);
    } else {
        logging::initialize(LogDestination::File, LevelFilter::Info);
    }

    let mut config = AppConfig::load(&cli.config)?;
    config.apply_env();
    if let Some(action_url) = cli.action_url.clone() {
        config.action_url = action_url;
    }

    let fields = cli.form_fields();
    let mode = match cli.once {
        Some(text) => RunMode::Once(text),
        None => RunMode::Interactive,
    };
    platform::run_app(config, mode, fields)
}
