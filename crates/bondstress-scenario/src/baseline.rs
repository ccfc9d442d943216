//! Baseline valuation of a portfolio snapshot against the live curve.

use std::collections::HashMap;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use bondstress_bonds::{BondError, FixedCouponBond, RiskCalculator};
use bondstress_core::Date;
use bondstress_traits::{
    CurveName, PortfolioName, Position, Repository, RiskCore, RiskCoreKey,
};

use crate::error::{ScenarioError, ScenarioResult};
use crate::orchestrator::{to_decimal, ScenarioOrchestrator};

/// Positions valued against an unshocked curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineValuation {
    /// Updated positions, ordered by lot.
    pub positions: Vec<Position>,
    /// One risk record per (security, book price).
    pub risk_cores: Vec<RiskCore>,
    /// Sum of discounted values.
    pub market_value: Decimal,
    /// Yields reported as the sentinel fallback.
    pub convergence_failures: usize,
}

impl<R> ScenarioOrchestrator<R>
where
    R: Repository + ?Sized,
{
    /// Values every lot of a snapshot at its book price against
    /// `curve_name` on the position date.
    ///
    /// Stores one [`RiskCore`] per security and book price and writes each lot's
    /// discounted value and risk reference back to the repository.
    pub async fn value_positions(
        &self,
        portfolio: &PortfolioName,
        position_date: Date,
        curve_name: &CurveName,
    ) -> ScenarioResult<BaselineValuation> {
        let mut positions = self.load_positions(portfolio, position_date).await?;
        let securities = self.load_securities(&positions).await?;
        let curve = self.curves.curve(curve_name, position_date).await?;
        let solver = self.config.yield_solver();

        let mut cores: HashMap<RiskCoreKey, RiskCore> = HashMap::new();
        let mut market_value = Decimal::ZERO;
        let mut convergence_failures = 0;

        for position in &mut positions {
            let core_key = RiskCoreKey {
                security_id: position.security_id.clone(),
                risk_date: position_date,
                curve_name: curve_name.clone(),
                book_price: position.book_price,
            };
            let bond = securities
                .get(&position.security_id)
                .map(FixedCouponBond::from)
                .ok_or_else(|| ScenarioError::missing("security", &position.security_id))?;
            let book_price = position.book_price.to_f64().ok_or_else(|| {
                BondError::invalid_price(format!("book price {}", position.book_price))
            })?;

            let metrics =
                RiskCalculator::calculate(&bond, book_price, position_date, &curve, &solver)?;
            if metrics.ytm_fallback {
                convergence_failures += 1;
                warn!(
                    lot_id = position.lot_id,
                    security = %position.security_id,
                    "baseline yield fell back to sentinel"
                );
            }

            let discounted_value =
                position.quantity * to_decimal(metrics.discounted_pv, "present value")?
                    / Decimal::ONE_HUNDRED;
            market_value += discounted_value;
            position.discounted_value = Some(discounted_value);
            position.risk_core = Some(core_key.clone());

            cores.entry(core_key.clone()).or_insert(RiskCore {
                key: core_key,
                metrics,
            });
        }

        let mut risk_cores: Vec<RiskCore> = cores.into_values().collect();
        risk_cores.sort_by(|a, b| {
            (&a.key.security_id, a.key.book_price).cmp(&(&b.key.security_id, b.key.book_price))
        });

        self.repository.persist_risk_cores(risk_cores.clone()).await?;
        self.repository.update_positions(positions.clone()).await?;

        info!(
            portfolio = %portfolio,
            position_date = %position_date,
            curve = %curve_name,
            positions = positions.len(),
            %market_value,
            "baseline valuation stored"
        );

        Ok(BaselineValuation {
            positions,
            risk_cores,
            market_value,
            convergence_failures,
        })
    }
}
