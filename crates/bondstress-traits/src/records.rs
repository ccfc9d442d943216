//! Stored record types.
//!
//! Rates, shocks, coupons and yields are in percent (4.0 = 4%). Prices are
//! per 100 par. Quantities and monetary amounts are [`Decimal`].

use bondstress_core::{Date, Frequency};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ids::{
    CurveName, PortfolioName, RiskCoreKey, RiskScenarioKey, ScenarioName, SecurityId,
};

// =============================================================================
// REFERENCE DATA
// =============================================================================

/// Fixed coupon bond terms. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Security {
    /// Client identifier.
    pub identifier: SecurityId,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_name: Option<String>,
    /// Annual coupon rate in percent.
    pub coupon_rate: f64,
    /// Coupon payments per year.
    pub frequency: Frequency,
    /// Final maturity.
    pub maturity: Date,
}

// =============================================================================
// MARKET DATA
// =============================================================================

/// One tenor of a rate curve snapshot.
///
/// Unique per (curve, as-of date, tenor); stored append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    /// Curve name.
    pub curve_name: CurveName,
    /// Snapshot date.
    pub as_of: Date,
    /// Tenor in whole years.
    pub tenor: u32,
    /// Rate in percent.
    pub rate: f64,
}

// =============================================================================
// STRESS SCENARIOS
// =============================================================================

/// A named family of stress scenarios. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StressScenarioDescription {
    /// Family name.
    pub name: ScenarioName,
    /// Free text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// One period of one simulation path in a scenario family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StressScenario {
    /// Owning family.
    pub scenario_name: ScenarioName,
    /// Zero-based period index.
    pub period_number: u32,
    /// Simulation path index.
    pub simulation_number: u32,
    /// Period length in years.
    pub period_length: f64,
}

/// Shock (percent) applied to one curve point within one scenario period.
///
/// Stored in incremental form: the change for this period only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurvePointShock {
    /// Curve of the shocked point.
    pub curve_name: CurveName,
    /// Snapshot date of the shocked point.
    pub as_of: Date,
    /// Tenor of the shocked point.
    pub tenor: u32,
    /// Shock size in percent.
    pub shock_size: f64,
}

/// A scenario period together with its curve point shocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioRow {
    /// The period definition.
    pub scenario: StressScenario,
    /// Shocks for this period, one per curve point.
    pub shocks: Vec<CurvePointShock>,
}

/// How shock sizes in an input file are expressed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShockConvention {
    /// Change for the period only.
    #[default]
    Incremental,
    /// Running total since the position date.
    Cumulative,
}

// =============================================================================
// POSITIONS AND RESULTS
// =============================================================================

/// A bond lot held in a portfolio on a position date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Portfolio name.
    pub portfolio: PortfolioName,
    /// Snapshot date.
    pub position_date: Date,
    /// Lot identifier, unique within (portfolio, date).
    pub lot_id: i64,
    /// Held security.
    pub security_id: SecurityId,
    /// Face amount held.
    pub quantity: Decimal,
    /// Book price per 100.
    pub book_price: Decimal,
    /// quantity × book price / 100.
    pub notional_amount: Decimal,
    /// Par amount.
    pub par_value: Decimal,
    /// Book value.
    pub book_value: Decimal,
    /// Curve-discounted value, once valued.
    #[serde(default)]
    pub discounted_value: Option<Decimal>,
    /// Baseline risk record, once valued.
    #[serde(default)]
    pub risk_core: Option<RiskCoreKey>,
}

/// Valuation metrics for one security at one date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskMetrics {
    /// Clean price per 100 used as the yield input.
    pub price: f64,
    /// Accrued interest per 100.
    pub accrued_interest: f64,
    /// Yield to maturity in percent.
    pub yield_to_maturity: f64,
    /// True when the yield is the sentinel fallback.
    pub ytm_fallback: bool,
    /// Present value per 100 against the discount curve.
    pub discounted_pv: f64,
    /// Option-adjusted spread; always zero.
    pub oas: f64,
}

/// Baseline metrics against the unshocked curve at a position date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskCore {
    /// Record key.
    pub key: RiskCoreKey,
    /// Metrics.
    pub metrics: RiskMetrics,
}

/// Metrics for one lot under one scenario period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskScenario {
    /// Record key within its run.
    pub key: RiskScenarioKey,
    /// Valued security.
    pub security_id: SecurityId,
    /// Metrics at the period end.
    pub metrics: RiskMetrics,
}

/// Projection of one lot at the end of one scenario period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioPosition {
    /// Portfolio name.
    pub portfolio: PortfolioName,
    /// Snapshot date the projection starts from.
    pub position_date: Date,
    /// Scenario period the projection belongs to.
    pub scenario: StressScenario,
    /// End of the scenario period.
    pub period_end_date: Date,
    /// Lot identifier.
    pub lot_id: i64,
    /// Held security.
    pub security_id: SecurityId,
    /// Face amount held.
    pub quantity: Decimal,
    /// Amortized book price per 100.
    pub book_price: Decimal,
    /// quantity × projected price / 100.
    pub notional_amount: Decimal,
    /// Par amount.
    pub par_value: Decimal,
    /// Book value (equal to notional).
    pub book_value: Decimal,
    /// PV × quantity / 100 against the shocked curve.
    pub discounted_value: Decimal,
    /// Matching risk record.
    pub risk_scenario: RiskScenarioKey,
}
