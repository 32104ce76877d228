//! The `relevance-judge validate` command.

use std::path::PathBuf;

use anyhow::Result;

pub fn execute(input: PathBuf) -> Result<()> {
    let rows = relevance_table::read_requests(&input)?;

    println!("Input table: {} ({} rows)", input.display(), rows.len());

    let mut warnings = 0;
    for (i, row) in rows.iter().enumerate() {
        for (column, value) in [("prompt", &row.prompt), ("response", &row.response)] {
            if value.trim().is_empty() {
                println!("  [row {}] WARNING: empty {column}", i + 1);
                warnings += 1;
            }
        }
    }
    if rows.is_empty() {
        println!("  WARNING: table has no rows");
        warnings += 1;
    }

    if warnings == 0 {
        println!("Input table valid.");
    } else {
        println!("\n{warnings} warning(s) found.");
    }

    Ok(())
}
