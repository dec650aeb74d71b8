use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::{compound_growth, monthly_payment};
use crate::error::{OrOverflow, RealtyError};
use crate::investment::scenario::{FinancingMode, PropertyFinancials, ScenarioParameters};
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::RealtyResult;

/// Flat property-management fee as a share of collected rent.
pub const MANAGEMENT_FEE_RATE: Decimal = dec!(0.05);

/// Projection horizon for capital growth and cumulative rent.
pub const PROJECTION_YEARS: u32 = 5;

const HUNDRED: Decimal = dec!(100);
const MONTHS: Decimal = dec!(12);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Derived investment metrics for one property under one scenario.
///
/// Currency fields keep full decimal precision; display rounding belongs to
/// the formatter. Only the four percentage fields are rounded here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentMetrics {
    /// Down payment after clamping and cash-mode override
    pub effective_down_payment_pct: Percent,
    /// Financed amount
    pub principal: Money,
    /// Amortized monthly mortgage payment (0 if fully cash)
    pub monthly_payment: Money,
    /// Annual rent after vacancy loss
    pub effective_annual_rent: Money,
    pub monthly_rent: Money,
    /// Annual management fee on collected rent
    pub management_fee: Money,
    /// Mortgage + service charges + management, per month
    pub monthly_carrying_cost: Money,
    pub net_monthly_cash_flow: Money,
    pub projected_value_in_5_years: Money,
    pub capital_gain_5yr: Money,
    pub cumulative_rent_5yr: Money,
    /// Equity put in at purchase
    pub capital_invested: Money,
    /// 5-year capital gain plus rent over capital invested, whole percent.
    /// `None` when nothing is invested (0% down on a mortgage).
    pub total_return_pct: Option<Decimal>,
    /// Annual net income over capital invested, 1 dp
    pub cash_on_cash_pct: Option<Decimal>,
    pub gross_yield_pct: Decimal,
    pub net_yield_pct: Decimal,
}

/// Input envelope for a full analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvestmentAnalysisInput {
    pub financials: PropertyFinancials,
    /// Scenario to evaluate; seeded defaults when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scenario: Option<ScenarioParameters>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compute every investment metric for `financials` under `scenario`.
///
/// Fails with `InvalidInput` when the price is not positive, when a loan is
/// needed but the term is zero, or when a figure leaves the decimal range.
/// Everything else, including negative appreciation and full vacancy, is a
/// valid scenario.
pub fn compute_metrics(
    financials: &PropertyFinancials,
    scenario: &ScenarioParameters,
) -> RealtyResult<InvestmentMetrics> {
    let price = financials.price;
    if price <= Decimal::ZERO {
        return Err(RealtyError::invalid(
            "price",
            format!("Property price must be positive, got {price}"),
        ));
    }

    let effective_down_payment_pct = scenario.effective_down_payment_pct();
    let principal = price
        .checked_mul(Decimal::ONE - effective_down_payment_pct / HUNDRED)
        .or_overflow("price")?;

    let monthly_payment = if effective_down_payment_pct >= HUNDRED {
        Decimal::ZERO
    } else {
        if scenario.loan_term_years == 0 {
            return Err(RealtyError::invalid(
                "loan_term_years",
                "Loan term must be at least 1 year when part of the price is financed",
            ));
        }
        monthly_payment(
            principal,
            scenario.annual_interest_rate_pct,
            scenario.loan_term_years,
        )?
    };

    let vacancy_pct = scenario.clamped_vacancy_pct();
    let effective_annual_rent = financials
        .annual_rent
        .checked_mul(Decimal::ONE - vacancy_pct / HUNDRED)
        .or_overflow("annual_rent")?;
    let monthly_rent = effective_annual_rent / MONTHS;
    let management_fee = effective_annual_rent
        .checked_mul(MANAGEMENT_FEE_RATE)
        .or_overflow("annual_rent")?;
    let monthly_carrying_cost = monthly_payment
        .checked_add(financials.service_charges / MONTHS)
        .and_then(|v| v.checked_add(management_fee / MONTHS))
        .or_overflow("service_charges")?;
    let net_monthly_cash_flow = monthly_rent
        .checked_sub(monthly_carrying_cost)
        .or_overflow("service_charges")?;

    let projected_value_in_5_years =
        compound_growth(price, scenario.appreciation_pct, PROJECTION_YEARS)?;
    let capital_gain_5yr = projected_value_in_5_years
        .checked_sub(price)
        .or_overflow("appreciation_pct")?;
    let cumulative_rent_5yr = effective_annual_rent
        .checked_mul(Decimal::from(PROJECTION_YEARS))
        .or_overflow("annual_rent")?;

    let capital_invested = price
        .checked_mul(effective_down_payment_pct)
        .or_overflow("price")?
        / HUNDRED;

    let total_return = capital_gain_5yr
        .checked_add(cumulative_rent_5yr)
        .or_overflow("appreciation_pct")?;
    let total_return_pct = ratio_pct(total_return, capital_invested, "down_payment_pct")?
        .map(|v| round_half_away(v, 0));
    let annual_net_income = effective_annual_rent
        .checked_sub(financials.service_charges)
        .and_then(|v| v.checked_sub(management_fee))
        .or_overflow("service_charges")?;
    let cash_on_cash_pct = ratio_pct(annual_net_income, capital_invested, "down_payment_pct")?
        .map(|v| round_half_away(v, 1));

    let gross_yield_pct = round_half_away(percent_of(financials.annual_rent, price, "price")?, 1);
    let net_income = financials
        .annual_rent
        .checked_sub(financials.service_charges)
        .or_overflow("service_charges")?;
    let net_yield_pct = round_half_away(percent_of(net_income, price, "price")?, 1);

    tracing::trace!(
        %price,
        mode = ?scenario.mode,
        %monthly_payment,
        %net_monthly_cash_flow,
        "computed investment metrics"
    );

    Ok(InvestmentMetrics {
        effective_down_payment_pct,
        principal,
        monthly_payment,
        effective_annual_rent,
        monthly_rent,
        management_fee,
        monthly_carrying_cost,
        net_monthly_cash_flow,
        projected_value_in_5_years,
        capital_gain_5yr,
        cumulative_rent_5yr,
        capital_invested,
        total_return_pct,
        cash_on_cash_pct,
        gross_yield_pct,
        net_yield_pct,
    })
}

/// Run `compute_metrics` and wrap it with assumptions, warnings and metadata.
pub fn analyze_investment(
    input: &InvestmentAnalysisInput,
) -> RealtyResult<ComputationOutput<InvestmentMetrics>> {
    let start = Instant::now();
    let scenario = input
        .scenario
        .clone()
        .unwrap_or_else(|| ScenarioParameters::seeded(&input.financials));

    tracing::debug!(
        price = %input.financials.price,
        mode = ?scenario.mode,
        down_payment_pct = %scenario.down_payment_pct,
        "analyzing investment scenario"
    );

    let metrics = compute_metrics(&input.financials, &scenario)?;
    let warnings = collect_warnings(&scenario, &metrics);

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Buy-to-Let Investment Metrics (amortized mortgage, 5-year projection)",
        &serde_json::json!({
            "financials": input.financials,
            "scenario": scenario,
            "management_fee_rate": MANAGEMENT_FEE_RATE,
            "projection_years": PROJECTION_YEARS,
        }),
        warnings,
        elapsed,
        metrics,
    ))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// `numerator / denominator * 100`; `field` names the input blamed on overflow.
fn percent_of(numerator: Money, denominator: Money, field: &str) -> RealtyResult<Decimal> {
    numerator
        .checked_div(denominator)
        .and_then(|v| v.checked_mul(HUNDRED))
        .or_overflow(field)
}

/// Like [`percent_of`], but undefined over a zero denominator.
fn ratio_pct(numerator: Money, denominator: Money, field: &str) -> RealtyResult<Option<Decimal>> {
    if denominator.is_zero() {
        return Ok(None);
    }
    percent_of(numerator, denominator, field).map(Some)
}

pub(crate) fn round_half_away(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

fn collect_warnings(scenario: &ScenarioParameters, metrics: &InvestmentMetrics) -> Vec<String> {
    let mut warnings = Vec::new();

    if scenario.mode == FinancingMode::Mortgage
        && scenario.clamped_down_payment_pct() != scenario.down_payment_pct
    {
        warnings.push(format!(
            "Down payment {}% clamped to {}%",
            scenario.down_payment_pct,
            scenario.clamped_down_payment_pct()
        ));
    }
    if scenario.clamped_vacancy_pct() != scenario.vacancy_pct {
        warnings.push(format!(
            "Vacancy {}% clamped to {}%",
            scenario.vacancy_pct,
            scenario.clamped_vacancy_pct()
        ));
    }
    if scenario.clamped_vacancy_pct() == HUNDRED {
        warnings.push("100% vacancy: no rental income assumed".into());
    }

    let ltv = HUNDRED - metrics.effective_down_payment_pct;
    if ltv > dec!(80) {
        warnings.push(format!(
            "Loan-to-value of {ltv}% exceeds 80%, above typical lender limits"
        ));
    }
    if metrics.capital_invested.is_zero() {
        warnings.push("No capital invested. Return percentages are undefined".into());
    }
    if metrics.net_monthly_cash_flow < Decimal::ZERO {
        warnings.push(format!(
            "Negative monthly cash flow of {:.0}: carrying costs exceed rent",
            metrics.net_monthly_cash_flow
        ));
    }
    if scenario.appreciation_pct < Decimal::ZERO {
        warnings.push(format!(
            "Appreciation of {}% models depreciation",
            scenario.appreciation_pct
        ));
    }
    if metrics.gross_yield_pct < dec!(5) {
        warnings.push(format!(
            "Gross yield {:.1}% is below 5%: weak rental income for the price",
            metrics.gross_yield_pct
        ));
    }

    warnings
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
