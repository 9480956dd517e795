//! Inspect command - show shape, types and missing values.

use std::path::PathBuf;

use colored::Colorize;
use tabprep::{TabprepConfig, Value};

use super::{load_session, open_session};

pub fn run(
    config: &TabprepConfig,
    file: PathBuf,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        let session = load_session(config, &file)?;
        let output = serde_json::json!({
            "source": session.source(),
            "view": session.view().as_ref(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let session = open_session(config, &file)?;
    let view = session.view();

    println!();
    println!("{}", "Overview".cyan().bold());
    println!("  Rows:           {}", view.row_count);
    println!("  Columns:        {}", view.column_count);
    println!("  Missing values: {}", view.total_missing);
    println!("  Memory:         {:.1} KB", view.memory_bytes as f64 / 1024.0);

    println!();
    println!("{}", "Columns".cyan().bold());
    let width = view
        .columns
        .iter()
        .map(|c| c.name.len())
        .max()
        .unwrap_or(0)
        .max(6);
    println!(
        "  {:<width$}  {:<11}  {:>8}  {:>8}  {:>7}",
        "Column", "Type", "Non-null", "Missing", "Unique",
        width = width
    );
    for column in &view.columns {
        let missing = if column.nulls > 0 {
            format!("{:.1}%", column.null_percentage).yellow()
        } else {
            "0.0%".normal()
        };
        println!(
            "  {:<width$}  {:<11}  {:>8}  {:>8}  {:>7}",
            column.name,
            column.dtype,
            column.non_null,
            missing,
            column.unique,
            width = width
        );
    }

    let preview = session.preview(None);
    println!();
    println!(
        "{} (first {} of {} rows)",
        "Preview".cyan().bold(),
        preview.rows.len(),
        preview.total_rows
    );
    println!("  {}", preview.columns.join(" | ").dimmed());
    for row in &preview.rows {
        let cells: Vec<String> = row
            .iter()
            .map(|v| match v {
                Value::Null => "-".to_string(),
                other => other.to_string(),
            })
            .collect();
        println!("  {}", cells.join(" | "));
    }

    Ok(())
}
