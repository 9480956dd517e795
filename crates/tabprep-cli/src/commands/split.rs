//! Split command - write train and test files.

use std::fs;
use std::path::PathBuf;

use colored::Colorize;
use tabprep::{ExportKind, TabprepConfig, TabprepError};

use super::open_session;

pub fn run(
    config: &TabprepConfig,
    file: PathBuf,
    target: &str,
    test_size: Option<f64>,
    out_dir: PathBuf,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = open_session(config, &file)?;

    let Some(split) = session.split(target, test_size)? else {
        println!("{} No target selected; nothing written.", "Note:".yellow());
        return Ok(());
    };
    println!("{} {}", "✓".green(), split.status_message());
    if !split.classes.is_empty() {
        let classes: Vec<String> = split.classes.iter().map(|c| c.to_string()).collect();
        println!("  Classes: {}", classes.join(", ").dimmed());
    }

    fs::create_dir_all(&out_dir).map_err(|e| TabprepError::Io {
        path: out_dir.clone(),
        source: e,
    })?;
    for kind in [ExportKind::Train, ExportKind::Test] {
        let export = session.export(kind)?;
        let path = out_dir.join(&export.file_name);
        fs::write(&path, &export.bytes).map_err(|e| TabprepError::Io {
            path: path.clone(),
            source: e,
        })?;
        println!("  Wrote {}", path.display());
    }

    Ok(())
}
