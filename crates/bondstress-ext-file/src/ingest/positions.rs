//! Portfolio lots:
//! `portfolio_name,position_date,lot_id,identifier_client,quantity,book_price[,notional_amount,par_value,book_value]`.

use std::collections::{BTreeSet, HashSet};
use std::io::Read;

use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;

use bondstress_traits::{PortfolioName, Position, PositionStore, SecurityId, SecurityStore};

use super::{line_of, open_reader, parse_date, parse_decimal};
use crate::error::{IngestError, IngestResult};

const COLUMNS: &[&str] = &[
    "portfolio_name",
    "position_date",
    "lot_id",
    "identifier_client",
    "quantity",
    "book_price",
];

#[derive(Debug, Deserialize)]
struct PositionRecord {
    portfolio_name: String,
    position_date: String,
    lot_id: i64,
    identifier_client: String,
    quantity: String,
    book_price: String,
    #[serde(default)]
    notional_amount: Option<String>,
    #[serde(default)]
    par_value: Option<String>,
    #[serde(default)]
    book_value: Option<String>,
}

/// Parses lots. Missing amounts default to `notional = quantity × book
/// price / 100`, `par = quantity` and `book value = notional`.
pub fn parse_positions<R: Read>(input: R) -> IngestResult<Vec<Position>> {
    let mut reader = open_reader(input, COLUMNS)?;
    let mut seen = HashSet::new();
    let mut positions = Vec::new();

    for (index, result) in reader.deserialize::<PositionRecord>().enumerate() {
        let line = line_of(index);
        let record = result.map_err(|e| IngestError::invalid_row(line, e.to_string()))?;

        let quantity = parse_decimal(line, "quantity", &record.quantity)?;
        let book_price = parse_decimal(line, "book_price", &record.book_price)?;
        let optional = |field: &str, value: Option<String>| -> IngestResult<Option<Decimal>> {
            value
                .filter(|v| !v.is_empty())
                .map(|v| parse_decimal(line, field, &v))
                .transpose()
        };

        let notional_amount = optional("notional_amount", record.notional_amount)?
            .unwrap_or(quantity * book_price / Decimal::ONE_HUNDRED);
        let par_value = optional("par_value", record.par_value)?.unwrap_or(quantity);
        let book_value = optional("book_value", record.book_value)?.unwrap_or(notional_amount);

        let position = Position {
            portfolio: PortfolioName::new(record.portfolio_name),
            position_date: parse_date(line, "position_date", &record.position_date)?,
            lot_id: record.lot_id,
            security_id: SecurityId::new(record.identifier_client),
            quantity,
            book_price,
            notional_amount,
            par_value,
            book_value,
            discounted_value: None,
            risk_core: None,
        };

        if !seen.insert((
            position.portfolio.clone(),
            position.position_date,
            position.lot_id,
        )) {
            return Err(IngestError::invalid_row(
                line,
                format!(
                    "duplicate lot {} for {}@{}",
                    position.lot_id, position.portfolio, position.position_date
                ),
            ));
        }
        positions.push(position);
    }

    Ok(positions)
}

/// Stores parsed lots, replacing lots with the same key.
///
/// Every referenced security must already be stored.
pub async fn load_positions<S>(store: &S, positions: Vec<Position>) -> IngestResult<usize>
where
    S: PositionStore + SecurityStore + ?Sized,
{
    let referenced: BTreeSet<&SecurityId> = positions.iter().map(|p| &p.security_id).collect();
    for id in referenced {
        if let Err(e) = store.get_security(id).await {
            if e.is_missing_data() {
                return Err(IngestError::validation(
                    "position",
                    id,
                    "references an unknown security",
                ));
            }
            return Err(e.into());
        }
    }

    let written = store.upsert_positions(positions).await?;
    info!(lots = written, "positions loaded");
    Ok(written)
}
