use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Percent};

pub const DEFAULT_DOWN_PAYMENT_PCT: Percent = dec!(20);
pub const DEFAULT_INTEREST_RATE_PCT: Percent = dec!(4.5);
pub const DEFAULT_LOAN_TERM_YEARS: u32 = 25;
pub const DEFAULT_VACANCY_PCT: Percent = dec!(5);

const HUNDRED: Decimal = dec!(100);

/// Financial attributes of a listed property, as supplied by the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyFinancials {
    /// Purchase price in AED
    pub price: Money,
    /// Expected gross annual rent (0 if unknown)
    #[serde(default, alias = "annualRent")]
    pub annual_rent: Money,
    /// Annual service charges
    #[serde(default, alias = "serviceCharges")]
    pub service_charges: Money,
    /// Property-specific appreciation used to seed a scenario (8 = 8%/yr)
    #[serde(default, alias = "defaultAppreciation")]
    pub default_appreciation: Percent,
}

/// Purchase financing mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FinancingMode {
    #[default]
    Mortgage,
    Cash,
}

/// User-adjustable assumptions. Treated as an immutable snapshot: adjusting a
/// slider produces a new value through the `with_*` methods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioParameters {
    #[serde(alias = "downPaymentPct")]
    pub down_payment_pct: Percent,
    #[serde(alias = "annualInterestRatePct")]
    pub annual_interest_rate_pct: Percent,
    #[serde(alias = "loanTermYears")]
    pub loan_term_years: u32,
    #[serde(alias = "appreciationPct")]
    pub appreciation_pct: Percent,
    #[serde(alias = "vacancyPct")]
    pub vacancy_pct: Percent,
    #[serde(default)]
    pub mode: FinancingMode,
}

impl ScenarioParameters {
    /// Defaults a property view opens with.
    pub fn seeded(financials: &PropertyFinancials) -> Self {
        Self {
            down_payment_pct: DEFAULT_DOWN_PAYMENT_PCT,
            annual_interest_rate_pct: DEFAULT_INTEREST_RATE_PCT,
            loan_term_years: DEFAULT_LOAN_TERM_YEARS,
            appreciation_pct: financials.default_appreciation,
            vacancy_pct: DEFAULT_VACANCY_PCT,
            mode: FinancingMode::Mortgage,
        }
    }

    pub fn with_down_payment_pct(&self, pct: Percent) -> Self {
        Self {
            down_payment_pct: pct,
            ..self.clone()
        }
    }

    pub fn with_interest_rate_pct(&self, pct: Percent) -> Self {
        Self {
            annual_interest_rate_pct: pct,
            ..self.clone()
        }
    }

    pub fn with_loan_term_years(&self, years: u32) -> Self {
        Self {
            loan_term_years: years,
            ..self.clone()
        }
    }

    pub fn with_appreciation_pct(&self, pct: Percent) -> Self {
        Self {
            appreciation_pct: pct,
            ..self.clone()
        }
    }

    pub fn with_vacancy_pct(&self, pct: Percent) -> Self {
        Self {
            vacancy_pct: pct,
            ..self.clone()
        }
    }

    pub fn with_mode(&self, mode: FinancingMode) -> Self {
        Self {
            mode,
            ..self.clone()
        }
    }

    /// Down payment clamped into [0, 100].
    pub fn clamped_down_payment_pct(&self) -> Percent {
        clamp_pct(self.down_payment_pct)
    }

    /// Vacancy clamped into [0, 100].
    pub fn clamped_vacancy_pct(&self) -> Percent {
        clamp_pct(self.vacancy_pct)
    }

    /// Cash purchases are always 100% equity.
    pub fn effective_down_payment_pct(&self) -> Percent {
        match self.mode {
            FinancingMode::Cash => HUNDRED,
            FinancingMode::Mortgage => self.clamped_down_payment_pct(),
        }
    }

    /// True when part of the price is financed.
    pub fn requires_loan(&self) -> bool {
        self.effective_down_payment_pct() < HUNDRED
    }
}

pub(crate) fn clamp_pct(pct: Percent) -> Percent {
    pct.max(Decimal::ZERO).min(HUNDRED)
}
