use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::RealtyError;

/// All monetary values, denominated in AED unless stated otherwise.
pub type Money = Decimal;

/// Percentages stored as plain numbers (8 = 8%). Divide by 100 at point of use.
pub type Percent = Decimal;

/// Display currency. Amounts are always computed in AED and converted for display only.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    AED,
    USD,
    EUR,
    GBP,
    INR,
    RUB,
    CNY,
}

impl Currency {
    pub const ALL: [Currency; 7] = [
        Currency::AED,
        Currency::USD,
        Currency::EUR,
        Currency::GBP,
        Currency::INR,
        Currency::RUB,
        Currency::CNY,
    ];

    /// ISO 4217 code
    pub fn code(&self) -> &'static str {
        match self {
            Currency::AED => "AED",
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::INR => "INR",
            Currency::RUB => "RUB",
            Currency::CNY => "CNY",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = RealtyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_uppercase();
        Currency::ALL
            .into_iter()
            .find(|c| c.code() == code)
            .ok_or_else(|| RealtyError::Format(format!("unknown currency code '{}'", s.trim())))
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_parse_case_insensitive() {
        assert_eq!("usd".parse::<Currency>().unwrap(), Currency::USD);
        assert_eq!(" AED ".parse::<Currency>().unwrap(), Currency::AED);
    }

    #[test]
    fn test_currency_parse_unknown() {
        assert!(matches!(
            "XYZ".parse::<Currency>(),
            Err(RealtyError::Format(_))
        ));
    }

    #[test]
    fn test_currency_serde_uppercase() {
        let json = serde_json::to_string(&Currency::GBP).unwrap();
        assert_eq!(json, "\"GBP\"");
        assert_eq!(Currency::default(), Currency::AED);
    }
}
