//! relevance-table: CSV tables in and out.
//!
//! Reads the `prompt`/`response` input table and writes the
//! `prompt,response,score,reasoning` output table.

pub mod error;
pub mod reader;
pub mod writer;

pub use error::TableError;
pub use reader::{read_records, read_requests};
pub use writer::{partial_path, write_records, OUTPUT_COLUMNS};
