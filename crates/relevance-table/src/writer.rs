//! CSV writer for evaluation records.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use csv::WriterBuilder;
use tracing::info;

use relevance_core::EvaluationRecord;

use crate::error::TableError;

/// Output header, in column order.
pub const OUTPUT_COLUMNS: [&str; 4] = ["prompt", "response", "score", "reasoning"];

/// Write records to `path`, replacing any existing file.
///
/// The header is written even when `records` is empty.
pub fn write_records(path: &Path, records: &[EvaluationRecord]) -> Result<(), TableError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| TableError::Open {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let file = File::create(path).map_err(|source| TableError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    write_records_to(file, records, &path.display().to_string())?;
    info!(path = %path.display(), rows = records.len(), "wrote output table");
    Ok(())
}

/// Write records to any writer. `origin` names the destination in errors.
pub fn write_records_to<W: Write>(
    writer: W,
    records: &[EvaluationRecord],
    origin: &str,
) -> Result<(), TableError> {
    let write_error = |source: csv::Error| TableError::Write {
        origin: origin.to_string(),
        source,
    };

    let mut csv = WriterBuilder::new().has_headers(false).from_writer(writer);
    csv.write_record(OUTPUT_COLUMNS).map_err(write_error)?;
    for record in records {
        csv.serialize(record).map_err(write_error)?;
    }
    csv.flush().map_err(|e| write_error(e.into()))?;
    Ok(())
}

/// Sibling path for records from an incomplete run:
/// `out/evaluated.csv` becomes `out/evaluated.partial.csv`.
pub fn partial_path(output: &Path) -> PathBuf {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    let name = match output.extension() {
        Some(ext) => format!("{stem}.partial.{}", ext.to_string_lossy()),
        None => format!("{stem}.partial"),
    };
    output.with_file_name(name)
}
