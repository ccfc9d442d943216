//! Security master: `identifier_client,asset_name,fixed_coupon,frequency,maturity`.

use std::collections::HashMap;
use std::io::Read;

use serde::Deserialize;
use tracing::info;

use bondstress_core::Frequency;
use bondstress_traits::{Security, SecurityId, SecurityStore};

use super::{line_of, open_reader, parse_date, require_finite};
use crate::error::{IngestError, IngestResult};

const COLUMNS: &[&str] = &["identifier_client", "fixed_coupon", "frequency", "maturity"];

#[derive(Debug, Deserialize)]
struct SecurityRecord {
    identifier_client: String,
    #[serde(default)]
    asset_name: Option<String>,
    fixed_coupon: f64,
    frequency: u32,
    maturity: String,
}

/// Parses securities. `asset_name` is optional.
///
/// An identifier listed twice must carry identical terms.
pub fn parse_securities<R: Read>(input: R) -> IngestResult<Vec<Security>> {
    let mut reader = open_reader(input, COLUMNS)?;
    let mut by_id: HashMap<SecurityId, usize> = HashMap::new();
    let mut securities: Vec<Security> = Vec::new();

    for (index, result) in reader.deserialize::<SecurityRecord>().enumerate() {
        let line = line_of(index);
        let record = result.map_err(|e| IngestError::invalid_row(line, e.to_string()))?;

        let frequency = Frequency::try_from(record.frequency)
            .map_err(|e| IngestError::invalid_row(line, e.to_string()))?;
        let security = Security {
            identifier: SecurityId::new(record.identifier_client),
            asset_name: record.asset_name.filter(|name| !name.is_empty()),
            coupon_rate: require_finite(line, "fixed_coupon", record.fixed_coupon)?,
            frequency,
            maturity: parse_date(line, "maturity", &record.maturity)?,
        };

        match by_id.get(&security.identifier) {
            Some(&first) if securities[first] != security => {
                return Err(IngestError::invalid_row(
                    line,
                    format!("{} listed again with different terms", security.identifier),
                ));
            }
            Some(_) => {}
            None => {
                by_id.insert(security.identifier.clone(), securities.len());
                securities.push(security);
            }
        }
    }

    Ok(securities)
}

/// Stores parsed securities. Identical re-loads are ignored; changed terms
/// for an existing identifier are rejected.
pub async fn load_securities<S>(store: &S, securities: Vec<Security>) -> IngestResult<usize>
where
    S: SecurityStore + ?Sized,
{
    let submitted = securities.len();
    let inserted = store.insert_securities(securities).await?;
    info!(submitted, inserted, "securities loaded");
    Ok(inserted)
}
