//! Score distribution table shared by `run` and `summarize`.

use comfy_table::{Cell, Table};

use relevance_core::statistics::ScoreDistribution;
use relevance_core::Score;

pub fn distribution_table(dist: &ScoreDistribution) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Score", "Count", "Share"]);

    for score in Score::ALL {
        table.add_row(vec![
            Cell::new(score),
            Cell::new(dist.count(score)),
            Cell::new(format!("{:.1}%", dist.fraction(score) * 100.0)),
        ]);
    }
    table.add_row(vec![
        Cell::new("total"),
        Cell::new(dist.total()),
        Cell::new(match dist.mean_ordinal() {
            Some(mean) => format!("mean {mean:.2}"),
            None => "-".to_string(),
        }),
    ]);
    table
}
