//! CLI command implementations.

pub mod inspect;
pub mod run;
pub mod serve;
pub mod split;

use std::path::Path;

use colored::Colorize;
use tabprep::{Session, TabprepConfig, Upload};

/// Read a CSV file and open a session on it.
fn load_session(config: &TabprepConfig, file: &Path) -> Result<Session, Box<dyn std::error::Error>> {
    let upload = Upload::from_path(file)?;
    Ok(Session::from_upload(&upload, config)?)
}

/// Like `load_session`, announcing the upload.
fn open_session(config: &TabprepConfig, file: &Path) -> Result<Session, Box<dyn std::error::Error>> {
    let session = load_session(config, file)?;
    println!("{} {}", "✓".green(), session.source().status_message());
    Ok(session)
}
