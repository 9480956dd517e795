//! Serve command - run the session API.

use colored::Colorize;
use tabprep::TabprepConfig;

use crate::server::{app, state::AppState};

pub fn run(
    mut config: TabprepConfig,
    host: Option<String>,
    port: Option<u16>,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    let url = format!("http://{}:{}/api", config.server.host, config.server.port);
    println!();
    println!(
        "{} {}",
        "Starting tabprep server at".cyan().bold(),
        url.white().bold()
    );
    println!();
    println!("  Upload: POST {}/sessions?filename=<name>.csv", url);
    println!("  Split seed: {}", config.split.seed);
    println!();
    println!("Press {} to stop the server", "Ctrl+C".yellow().bold());
    println!();

    let state = AppState::new(config);
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(app::run_server(state))?;

    println!("{}", "Server stopped.".yellow());
    Ok(())
}
