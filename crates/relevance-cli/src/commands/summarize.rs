//! The `relevance-judge summarize` command.

use std::path::PathBuf;

use anyhow::Result;

use relevance_core::statistics::ScoreDistribution;

use crate::summary::distribution_table;

pub fn execute(input: PathBuf) -> Result<()> {
    let records = relevance_table::read_records(&input)?;
    let dist = ScoreDistribution::from_records(&records);

    println!("{}", distribution_table(&dist));
    println!(
        "Relevant (above poor): {:.1}% of {} rows",
        dist.relevant_rate() * 100.0,
        dist.total()
    );

    Ok(())
}
