//! Vibemix CLI
//!
//! Command-line front end for the layered mixer.

use clap::Parser;
use env_logger::Env;
use log::{debug, info};

use vibemix::cli::{commands, Cli, Commands};
use vibemix::{MixerConfig, Result};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    info!("Vibemix v{}", env!("CARGO_PKG_VERSION"));

    let config = MixerConfig::load_or_default(cli.config.as_deref())?;
    config.validate()?;
    debug!("Using config: {:?}", config);

    match cli.command {
        Some(cmd) => handle_command(cmd, &config),
        None => {
            println!("Vibemix v{}", env!("CARGO_PKG_VERSION"));
            println!("Use --help for available commands");
            Ok(())
        }
    }
}

fn handle_command(cmd: Commands, config: &MixerConfig) -> Result<()> {
    match cmd {
        Commands::Gain {
            input,
            output,
            volume,
        } => commands::gain(&input, &output, volume),
        Commands::Mix {
            inputs,
            dir,
            volumes,
            output_dir,
        } => commands::mix(config, &inputs, dir.as_deref(), &volumes, &output_dir),
        Commands::Generate {
            vibe,
            category,
            items,
            duration,
            fail_on,
            output_dir,
        } => commands::generate(
            config,
            &vibe,
            category,
            &items,
            duration,
            fail_on.as_deref(),
            &output_dir,
        ),
        Commands::Catalog { category } => commands::catalog(category),
        Commands::Palette => commands::palette(),
    }
}
