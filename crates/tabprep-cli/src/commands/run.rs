//! Run command - apply a list of operations and export the result.

use std::fs;
use std::path::PathBuf;

use colored::Colorize;
use tabprep::{Operation, Outcome, TabprepConfig, TabprepError};

use super::open_session;

pub fn run(
    config: &TabprepConfig,
    file: PathBuf,
    steps: PathBuf,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let text = fs::read_to_string(&steps).map_err(|e| TabprepError::Io {
        path: steps.clone(),
        source: e,
    })?;
    let operations: Vec<Operation> = serde_json::from_str(&text)?;

    let mut session = open_session(config, &file)?;
    println!();

    let mut rejected = 0;
    for (i, operation) in operations.iter().enumerate() {
        let report = session.apply(operation);
        let marker = match report.outcome {
            Outcome::Applied => "applied".green(),
            Outcome::Unchanged => "skipped".yellow(),
            Outcome::Rejected => {
                rejected += 1;
                "rejected".red()
            }
        };
        println!(
            "  {:>2}. {:<40} {}",
            i + 1,
            operation.description(),
            marker
        );
        if !report.message.is_empty() {
            println!("      {}", report.message.dimmed());
        }
    }

    let export = session.export(session.latest_export_kind())?;
    let path = output.unwrap_or_else(|| {
        file.parent()
            .map(|dir| dir.join(&export.file_name))
            .unwrap_or_else(|| PathBuf::from(&export.file_name))
    });
    fs::write(&path, &export.bytes).map_err(|e| TabprepError::Io {
        path: path.clone(),
        source: e,
    })?;

    let view = session.view();
    println!();
    if let Some(status) = session.status_message() {
        println!("{}", status.yellow());
    }
    println!(
        "{} Wrote {} ({} rows, {} columns)",
        "✓".green(),
        path.display(),
        view.row_count,
        view.column_count
    );
    if rejected > 0 {
        println!(
            "{} {} of {} steps were rejected",
            "Note:".yellow(),
            rejected,
            operations.len()
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_run_writes_contextual_file() {
        let dir = TempDir::new().unwrap();
        let data = dir.path().join("people.csv");
        fs::write(&data, "age,score\n30,1.5\n,2.5\n40,3.5\n").unwrap();
        let steps = dir.path().join("steps.json");
        fs::write(
            &steps,
            r#"[{"op": "drop_nulls", "column": "age"}, {"op": "normalize"}]"#,
        )
        .unwrap();

        run(&TabprepConfig::default(), data, steps, None).unwrap();

        let written = fs::read_to_string(dir.path().join("normalized_data.csv")).unwrap();
        assert_eq!(written.lines().count(), 3);
        assert!(written.starts_with("age,score\n"));
    }

    #[test]
    fn test_run_rejects_malformed_steps() {
        let dir = TempDir::new().unwrap();
        let data = dir.path().join("people.csv");
        fs::write(&data, "age\n1\n").unwrap();
        let steps = dir.path().join("steps.json");
        fs::write(&steps, r#"[{"op": "shuffle"}]"#).unwrap();

        assert!(run(&TabprepConfig::default(), data, steps, None).is_err());
    }
}
