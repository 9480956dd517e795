//! tabprep CLI - tabular data preparation.

mod cli;
mod commands;
mod logging;
mod server;

use clap::Parser;
use cli::{Cli, Commands};
use logging::{LogConfig, init_logging};
use tabprep::TabprepConfig;

fn main() {
    let cli = Cli::parse();

    // long-running server logs get timestamps
    let log_config = LogConfig::from_verbosity(cli.verbose)
        .with_format(cli.log_format)
        .with_timestamps(matches!(cli.command, Commands::Serve { .. }));
    if let Err(e) = init_logging(&log_config) {
        eprintln!("Warning: logging disabled: {}", e);
    }

    let result = load_config(&cli).and_then(|config| match cli.command {
        Commands::Serve { port, host } => commands::serve::run(config, host, port),

        Commands::Inspect { file, json } => commands::inspect::run(&config, file, json),

        Commands::Run {
            file,
            steps,
            output,
        } => commands::run::run(&config, file, steps, output),

        Commands::Split {
            file,
            target,
            test_size,
            out_dir,
        } => commands::split::run(&config, file, &target, test_size, out_dir),
    });

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn load_config(cli: &Cli) -> Result<TabprepConfig, Box<dyn std::error::Error>> {
    match &cli.config {
        Some(path) => Ok(TabprepConfig::load(path)?),
        None => Ok(TabprepConfig::default()),
    }
}
