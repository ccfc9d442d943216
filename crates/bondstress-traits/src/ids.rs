//! Identifier types used across the engine.

use bondstress_core::Date;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Create a new identifier.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }
    };
}

string_id!(
    /// Client security identifier.
    SecurityId
);

string_id!(
    /// Rate curve name (e.g. "USD_SWAP").
    CurveName
);

string_id!(
    /// Portfolio name.
    PortfolioName
);

string_id!(
    /// Stress scenario family name (e.g. "USD_SWAP_SHIFT_04").
    ScenarioName
);

/// Key of one scenario run: the set of scenario positions generated for a
/// portfolio snapshot under a scenario family.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct ScenarioRunKey {
    /// Portfolio name.
    pub portfolio: PortfolioName,
    /// Date of the position snapshot.
    pub position_date: Date,
    /// Scenario family name.
    pub scenario_name: ScenarioName,
}

impl ScenarioRunKey {
    /// Create a new run key.
    pub fn new(
        portfolio: impl Into<PortfolioName>,
        position_date: Date,
        scenario_name: impl Into<ScenarioName>,
    ) -> Self {
        Self {
            portfolio: portfolio.into(),
            position_date,
            scenario_name: scenario_name.into(),
        }
    }
}

impl fmt::Display for ScenarioRunKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@{}/{}",
            self.portfolio, self.position_date, self.scenario_name
        )
    }
}

/// Key of a baseline risk record.
///
/// Price and yield depend on the lot's book price, so lots of one security
/// share a record only when they were bought at the same price.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct RiskCoreKey {
    /// Security valued.
    pub security_id: SecurityId,
    /// Valuation date.
    pub risk_date: Date,
    /// Curve discounted against.
    pub curve_name: CurveName,
    /// Book price the metrics were computed at.
    pub book_price: Decimal,
}

impl fmt::Display for RiskCoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@{}/{}/{}",
            self.security_id, self.risk_date, self.curve_name, self.book_price
        )
    }
}

/// Key of a scenario risk record within one run.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct RiskScenarioKey {
    /// Position lot.
    pub lot_id: i64,
    /// Scenario period.
    pub period_number: u32,
    /// Scenario simulation path.
    pub simulation_number: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_id_roundtrip() {
        let id = SecurityId::new("US912828XG55");
        assert_eq!(id.as_str(), "US912828XG55");
        assert_eq!(id.to_string(), "US912828XG55");
        assert_eq!(SecurityId::from("US912828XG55"), id);
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"US912828XG55\"");
    }

    #[test]
    fn test_run_key_display() {
        let key = ScenarioRunKey::new(
            "USIG01",
            Date::from_ymd(2025, 5, 20).unwrap(),
            "USD_SWAP_SHIFT_04",
        );
        assert_eq!(key.to_string(), "USIG01@2025-05-20/USD_SWAP_SHIFT_04");
    }

    #[test]
    fn test_risk_core_key_by_book_price() {
        use rust_decimal_macros::dec;

        let key = |price| RiskCoreKey {
            security_id: "BOND10Y".into(),
            risk_date: Date::from_ymd(2025, 4, 30).unwrap(),
            curve_name: "USD_SWAP".into(),
            book_price: price,
        };
        assert_eq!(key(dec!(99)), key(dec!(99.00)));
        assert_ne!(key(dec!(99)), key(dec!(90)));
        assert_eq!(key(dec!(99.5)).to_string(), "BOND10Y@2025-04-30/USD_SWAP/99.5");
    }
}
