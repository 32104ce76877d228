//! CSV readers for input rows and previously written output tables.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use tracing::debug;

use relevance_core::{EvaluationRecord, EvaluationRequest, Score};

use crate::error::TableError;

/// Read `prompt`/`response` rows from a CSV file.
///
/// Columns are located by header name; other columns are ignored.
pub fn read_requests(path: &Path) -> Result<Vec<EvaluationRequest>, TableError> {
    let file = open(path)?;
    read_requests_from(file, &path.display().to_string())
}

/// Read `prompt`/`response` rows from any reader. `origin` names the source
/// in error messages.
pub fn read_requests_from<R: Read>(
    reader: R,
    origin: &str,
) -> Result<Vec<EvaluationRequest>, TableError> {
    let mut csv = ReaderBuilder::new().from_reader(reader);
    let headers = headers(&mut csv, origin)?;
    let prompt = column(&headers, "prompt", origin)?;
    let response = column(&headers, "response", origin)?;

    let mut rows = Vec::new();
    for result in csv.records() {
        let record = result.map_err(|source| read_error(origin, source))?;
        rows.push(EvaluationRequest {
            prompt: field(&record, prompt),
            response: field(&record, response),
        });
    }

    debug!(origin, rows = rows.len(), "read input table");
    Ok(rows)
}

/// Read a full output table (`prompt`, `response`, `score`, `reasoning`).
pub fn read_records(path: &Path) -> Result<Vec<EvaluationRecord>, TableError> {
    let file = open(path)?;
    read_records_from(file, &path.display().to_string())
}

/// Read a full output table from any reader.
pub fn read_records_from<R: Read>(
    reader: R,
    origin: &str,
) -> Result<Vec<EvaluationRecord>, TableError> {
    let mut csv = ReaderBuilder::new().from_reader(reader);
    let headers = headers(&mut csv, origin)?;
    let prompt = column(&headers, "prompt", origin)?;
    let response = column(&headers, "response", origin)?;
    let score_col = column(&headers, "score", origin)?;
    let reasoning = column(&headers, "reasoning", origin)?;

    let mut records = Vec::new();
    for (i, result) in csv.records().enumerate() {
        let record = result.map_err(|source| read_error(origin, source))?;
        let label = field(&record, score_col);
        let score = label
            .parse::<Score>()
            .map_err(|e| TableError::InvalidScore {
                origin: origin.to_string(),
                row: i + 1,
                reason: format!("score {e}"),
            })?;
        records.push(EvaluationRecord {
            prompt: field(&record, prompt),
            response: field(&record, response),
            score,
            reasoning: field(&record, reasoning),
        });
    }
    Ok(records)
}

fn open(path: &Path) -> Result<File, TableError> {
    File::open(path).map_err(|source| TableError::Open {
        path: path.to_path_buf(),
        source,
    })
}

fn read_error(origin: &str, source: csv::Error) -> TableError {
    TableError::Read {
        origin: origin.to_string(),
        source,
    }
}

fn headers<R: Read>(csv: &mut csv::Reader<R>, origin: &str) -> Result<StringRecord, TableError> {
    csv.headers()
        .cloned()
        .map_err(|source| read_error(origin, source))
}

fn column(headers: &StringRecord, name: &'static str, origin: &str) -> Result<usize, TableError> {
    headers
        .iter()
        .position(|h| h.trim_start_matches('\u{feff}').trim() == name)
        .ok_or_else(|| TableError::MissingColumn {
            origin: origin.to_string(),
            column: name,
            found: headers.iter().collect::<Vec<_>>().join(", "),
        })
}

fn field(record: &StringRecord, index: usize) -> String {
    record.get(index).unwrap_or_default().to_string()
}
