//! Display formatting for AED amounts in the visitor's chosen currency.
//!
//! Conversion uses a static rate table (AED per unit is never fetched live).
//! Rounding to whole units happens here, once, after every metric has been
//! computed at full precision.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::error::RealtyError;
use crate::types::{Currency, Money, Percent};
use crate::RealtyResult;

/// Units of each currency per 1 AED.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateTable {
    pub rates: BTreeMap<Currency, Decimal>,
}

impl Default for RateTable {
    fn default() -> Self {
        let rates = BTreeMap::from([
            (Currency::AED, dec!(1)),
            (Currency::USD, dec!(0.2723)),
            (Currency::EUR, dec!(0.2510)),
            (Currency::GBP, dec!(0.2150)),
            (Currency::INR, dec!(22.68)),
            (Currency::RUB, dec!(24.90)),
            (Currency::CNY, dec!(1.97)),
        ]);
        Self { rates }
    }
}

impl RateTable {
    pub fn rate(&self, currency: Currency) -> RealtyResult<Decimal> {
        if currency == Currency::AED {
            return Ok(Decimal::ONE);
        }
        match self.rates.get(&currency) {
            Some(r) if *r > Decimal::ZERO => Ok(*r),
            Some(r) => Err(RealtyError::Format(format!(
                "rate for {currency} must be positive, got {r}"
            ))),
            None => Err(RealtyError::Format(format!("no rate for {currency}"))),
        }
    }

    /// Convert an AED amount at full precision.
    pub fn convert(&self, amount_aed: Money, currency: Currency) -> RealtyResult<Money> {
        let rate = self.rate(currency)?;
        amount_aed
            .checked_mul(rate)
            .ok_or_else(|| RealtyError::Format(format!("{amount_aed} AED overflows in {currency}")))
    }
}

/// Convert and round an AED amount to whole display units.
pub fn display_value(amount_aed: Money, currency: Currency, table: &RateTable) -> RealtyResult<Money> {
    let rounded = table
        .convert(amount_aed, currency)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    // avoid "-0"
    Ok(if rounded.is_zero() { Decimal::ZERO } else { rounded })
}

/// `"AED 12,451"`, `"-USD 374"`.
pub fn format_amount(amount_aed: Money, currency: Currency, table: &RateTable) -> RealtyResult<String> {
    let value = display_value(amount_aed, currency, table)?;
    let sign = if value < Decimal::ZERO { "-" } else { "" };
    let digits = value.abs().trunc().to_string();
    Ok(format!("{sign}{} {}", currency.code(), group_thousands(&digits)))
}

/// Inverse of [`format_amount`]: `"-USD 1,234"` -> `(USD, -1234)`.
pub fn parse_amount(display: &str) -> RealtyResult<(Currency, Money)> {
    let trimmed = display.trim();
    let (negative, rest) = match trimmed.strip_prefix('-') {
        Some(r) => (true, r),
        None => (false, trimmed),
    };
    let (code, number) = rest
        .split_once(' ')
        .ok_or_else(|| RealtyError::Format(format!("expected '<CODE> <amount>', got '{display}'")))?;
    let currency = Currency::from_str(code)?;

    let number = number.trim();
    if number.is_empty()
        || !number.chars().all(|c| c.is_ascii_digit() || c == ',' || c == '.')
        || !valid_grouping(number)
    {
        return Err(RealtyError::Format(format!("malformed amount '{number}'")));
    }
    let value = Decimal::from_str(&number.replace(',', ""))
        .map_err(|e| RealtyError::Format(format!("malformed amount '{number}': {e}")))?;

    Ok((currency, if negative { -value } else { value }))
}

/// `"6.3%"`; always shows exactly `dp` decimals.
pub fn format_percent(pct: Percent, dp: u32) -> String {
    let rounded = pct.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.*}%", dp as usize, rounded)
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Commas, if present, must separate groups of exactly three integer digits.
fn valid_grouping(number: &str) -> bool {
    let integer = number.split('.').next().unwrap_or_default();
    if !integer.contains(',') {
        return true;
    }
    let groups: Vec<&str> = integer.split(',').collect();
    let first_ok = matches!(groups[0].len(), 1..=3);
    first_ok && groups[1..].iter().all(|g| g.len() == 3)
}

#[cfg(feature = "investment")]
pub use display::{display_metrics, MetricsDisplay};

#[cfg(feature = "investment")]
mod display {
    use super::*;
    use crate::investment::InvestmentMetrics;

    /// Investment metrics rendered for a property card.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct MetricsDisplay {
        pub currency: Currency,
        pub monthly_payment: String,
        pub monthly_rent: String,
        pub monthly_carrying_cost: String,
        pub net_monthly_cash_flow: String,
        pub projected_value_in_5_years: String,
        pub capital_gain_5yr: String,
        pub capital_invested: String,
        pub total_return: String,
        pub cash_on_cash: String,
        pub gross_yield: String,
        pub net_yield: String,
    }

    /// Format a computed metrics bundle; undefined returns render as `"n/a"`.
    pub fn display_metrics(
        metrics: &InvestmentMetrics,
        currency: Currency,
        table: &RateTable,
    ) -> RealtyResult<MetricsDisplay> {
        let money = |v: Money| format_amount(v, currency, table);
        let pct = |v: Option<Decimal>, dp: u32| {
            v.map(|p| format_percent(p, dp))
                .unwrap_or_else(|| "n/a".to_string())
        };

        Ok(MetricsDisplay {
            currency,
            monthly_payment: money(metrics.monthly_payment)?,
            monthly_rent: money(metrics.monthly_rent)?,
            monthly_carrying_cost: money(metrics.monthly_carrying_cost)?,
            net_monthly_cash_flow: money(metrics.net_monthly_cash_flow)?,
            projected_value_in_5_years: money(metrics.projected_value_in_5_years)?,
            capital_gain_5yr: money(metrics.capital_gain_5yr)?,
            capital_invested: money(metrics.capital_invested)?,
            total_return: pct(metrics.total_return_pct, 0),
            cash_on_cash: pct(metrics.cash_on_cash_pct, 1),
            gross_yield: format_percent(metrics.gross_yield_pct, 1),
            net_yield: format_percent(metrics.net_yield_pct, 1),
        })
    }
}
