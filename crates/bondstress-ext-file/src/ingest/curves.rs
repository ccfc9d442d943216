//! Rate curve snapshots: `adate,curve_name,year,rate`.

use std::collections::HashSet;
use std::io::Read;

use serde::Deserialize;
use tracing::info;

use bondstress_traits::{CurveName, CurvePoint, CurvePointStore};

use super::{line_of, open_reader, parse_date, require_finite};
use crate::error::{IngestError, IngestResult};

const COLUMNS: &[&str] = &["adate", "curve_name", "year", "rate"];

#[derive(Debug, Deserialize)]
struct CurveRecord {
    adate: String,
    curve_name: String,
    year: u32,
    rate: f64,
}

/// Parses curve points. Rejects a (curve, date, tenor) repeated in the file.
pub fn parse_curves<R: Read>(input: R) -> IngestResult<Vec<CurvePoint>> {
    let mut reader = open_reader(input, COLUMNS)?;
    let mut seen = HashSet::new();
    let mut points = Vec::new();

    for (index, result) in reader.deserialize::<CurveRecord>().enumerate() {
        let line = line_of(index);
        let record = result.map_err(|e| IngestError::invalid_row(line, e.to_string()))?;

        let point = CurvePoint {
            curve_name: CurveName::new(record.curve_name),
            as_of: parse_date(line, "adate", &record.adate)?,
            tenor: record.year,
            rate: require_finite(line, "rate", record.rate)?,
        };
        if !seen.insert((point.curve_name.clone(), point.as_of, point.tenor)) {
            return Err(IngestError::invalid_row(
                line,
                format!(
                    "duplicate point {}@{} year {}",
                    point.curve_name, point.as_of, point.tenor
                ),
            ));
        }
        points.push(point);
    }

    Ok(points)
}

/// Stores parsed curve points. Existing points are never overwritten: a
/// batch touching one fails as a whole.
pub async fn load_curves<S>(store: &S, points: Vec<CurvePoint>) -> IngestResult<usize>
where
    S: CurvePointStore + ?Sized,
{
    let inserted = store.insert_curve_points(points).await?;
    info!(points = inserted, "curve points loaded");
    Ok(inserted)
}
