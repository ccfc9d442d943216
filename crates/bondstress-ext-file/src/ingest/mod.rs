//! CSV ingestion.
//!
//! Every input kind is handled in two phases:
//! - `parse_*` checks the header and each row and returns records without
//!   touching storage
//! - `load_*` checks the batch against what is already stored and writes it
//!
//! ```rust
//! use bondstress_ext_file::ingest::parse_curves;
//!
//! let csv = "adate,curve_name,year,rate\n2025-04-30,USD_SWAP,1,4.0\n2025-04-30,USD_SWAP,2,4.1\n";
//! let points = parse_curves(csv.as_bytes()).unwrap();
//! assert_eq!(points.len(), 2);
//! ```

mod curves;
mod positions;
mod scenarios;
mod securities;

pub use curves::{load_curves, parse_curves};
pub use positions::{load_positions, parse_positions};
pub use scenarios::{load_scenarios, parse_scenarios, ParsedScenario};
pub use securities::{load_securities, parse_securities};

use std::io::Read;
use std::str::FromStr;

use bondstress_core::Date;
use rust_decimal::Decimal;

use crate::error::{IngestError, IngestResult};

/// Opens a CSV reader and checks the header for `required` columns.
fn open_reader<R: Read>(input: R, required: &[&str]) -> IngestResult<csv::Reader<R>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader.headers()?;
    let missing: Vec<String> = required
        .iter()
        .filter(|column| !headers.iter().any(|h| h == **column))
        .map(|column| (*column).to_string())
        .collect();
    if !missing.is_empty() {
        return Err(IngestError::MissingColumns { columns: missing });
    }
    Ok(reader)
}

/// Line number of the `index`-th data row (the header is line 1).
fn line_of(index: usize) -> usize {
    index + 2
}

fn parse_date(line: usize, field: &str, value: &str) -> IngestResult<Date> {
    Date::parse(value).map_err(|e| IngestError::invalid_row(line, format!("{field}: {e}")))
}

fn parse_decimal(line: usize, field: &str, value: &str) -> IngestResult<Decimal> {
    Decimal::from_str(value)
        .or_else(|_| Decimal::from_scientific(value))
        .map_err(|_| IngestError::invalid_row(line, format!("{field}: '{value}' is not a number")))
}

fn require_finite(line: usize, field: &str, value: f64) -> IngestResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(IngestError::invalid_row(line, format!("{field} is not finite")))
    }
}
