use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::RealtyError;
use crate::investment::metrics::{compute_metrics, InvestmentMetrics};
use crate::investment::scenario::{PropertyFinancials, ScenarioParameters};
use crate::types::{with_metadata, ComputationOutput};
use crate::RealtyResult;

const MAX_GRID_CELLS: usize = 10_000;

/// Scenario assumption that a sensitivity axis sweeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioField {
    DownPaymentPct,
    AnnualInterestRatePct,
    LoanTermYears,
    AppreciationPct,
    VacancyPct,
}

impl ScenarioField {
    pub fn name(&self) -> &'static str {
        match self {
            ScenarioField::DownPaymentPct => "down_payment_pct",
            ScenarioField::AnnualInterestRatePct => "annual_interest_rate_pct",
            ScenarioField::LoanTermYears => "loan_term_years",
            ScenarioField::AppreciationPct => "appreciation_pct",
            ScenarioField::VacancyPct => "vacancy_pct",
        }
    }

    /// Current value of this field in `scenario`.
    pub fn read(&self, scenario: &ScenarioParameters) -> Decimal {
        match self {
            ScenarioField::DownPaymentPct => scenario.down_payment_pct,
            ScenarioField::AnnualInterestRatePct => scenario.annual_interest_rate_pct,
            ScenarioField::LoanTermYears => Decimal::from(scenario.loan_term_years),
            ScenarioField::AppreciationPct => scenario.appreciation_pct,
            ScenarioField::VacancyPct => scenario.vacancy_pct,
        }
    }

    /// A new scenario with this field replaced by `value`.
    pub fn apply(
        &self,
        scenario: &ScenarioParameters,
        value: Decimal,
    ) -> RealtyResult<ScenarioParameters> {
        Ok(match self {
            ScenarioField::DownPaymentPct => scenario.with_down_payment_pct(value),
            ScenarioField::AnnualInterestRatePct => scenario.with_interest_rate_pct(value),
            ScenarioField::LoanTermYears => {
                let years = value
                    .fract()
                    .is_zero()
                    .then(|| value.to_u32())
                    .flatten()
                    .ok_or_else(|| {
                        RealtyError::invalid(
                            "loan_term_years",
                            format!("Loan term must be a whole number of years, got {value}"),
                        )
                    })?;
                scenario.with_loan_term_years(years)
            }
            ScenarioField::AppreciationPct => scenario.with_appreciation_pct(value),
            ScenarioField::VacancyPct => scenario.with_vacancy_pct(value),
        })
    }
}

/// Output metric recorded in each grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricField {
    MonthlyPayment,
    MonthlyCarryingCost,
    NetMonthlyCashFlow,
    ProjectedValueIn5Years,
    CapitalGain5yr,
    CapitalInvested,
    TotalReturnPct,
    CashOnCashPct,
}

impl MetricField {
    pub fn name(&self) -> &'static str {
        match self {
            MetricField::MonthlyPayment => "monthly_payment",
            MetricField::MonthlyCarryingCost => "monthly_carrying_cost",
            MetricField::NetMonthlyCashFlow => "net_monthly_cash_flow",
            MetricField::ProjectedValueIn5Years => "projected_value_in_5_years",
            MetricField::CapitalGain5yr => "capital_gain_5yr",
            MetricField::CapitalInvested => "capital_invested",
            MetricField::TotalReturnPct => "total_return_pct",
            MetricField::CashOnCashPct => "cash_on_cash_pct",
        }
    }

    pub fn extract(&self, metrics: &InvestmentMetrics) -> Option<Decimal> {
        match self {
            MetricField::MonthlyPayment => Some(metrics.monthly_payment),
            MetricField::MonthlyCarryingCost => Some(metrics.monthly_carrying_cost),
            MetricField::NetMonthlyCashFlow => Some(metrics.net_monthly_cash_flow),
            MetricField::ProjectedValueIn5Years => Some(metrics.projected_value_in_5_years),
            MetricField::CapitalGain5yr => Some(metrics.capital_gain_5yr),
            MetricField::CapitalInvested => Some(metrics.capital_invested),
            MetricField::TotalReturnPct => metrics.total_return_pct,
            MetricField::CashOnCashPct => metrics.cash_on_cash_pct,
        }
    }
}

/// One swept axis: `min..=max` in `step` increments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensitivityVariable {
    pub field: ScenarioField,
    pub min: Decimal,
    pub max: Decimal,
    pub step: Decimal,
}

/// Input for a 2-way scenario sensitivity grid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioSensitivityInput {
    pub financials: PropertyFinancials,
    /// Base case; seeded defaults when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_scenario: Option<ScenarioParameters>,
    pub variable_1: SensitivityVariable,
    pub variable_2: SensitivityVariable,
    pub output_metric: MetricField,
}

/// Output of a 2-way scenario sensitivity grid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioSensitivityOutput {
    pub variable_1_name: String,
    pub variable_2_name: String,
    pub variable_1_values: Vec<Decimal>,
    pub variable_2_values: Vec<Decimal>,
    pub output_metric: String,
    /// matrix[i][j] = metric when variable_1 = values_1[i] and variable_2 = values_2[j].
    /// `None` marks a cell whose scenario is invalid or whose metric is undefined.
    pub matrix: Vec<Vec<Option<Decimal>>>,
    /// Metric under the unmodified base scenario
    pub base_case_value: Option<Decimal>,
    /// Grid cell closest to the base scenario (row, col)
    pub base_case_position: (usize, usize),
}

/// Generate the sweep values for a variable from min to max with step.
fn generate_sweep_values(var: &SensitivityVariable) -> RealtyResult<Vec<Decimal>> {
    if var.step <= Decimal::ZERO {
        return Err(RealtyError::invalid(
            &format!("variable:{}", var.field.name()),
            "Step must be positive",
        ));
    }
    if var.min > var.max {
        return Err(RealtyError::invalid(
            &format!("variable:{}", var.field.name()),
            "Min must be <= max",
        ));
    }
    let too_long = || {
        RealtyError::invalid(
            &format!("variable:{}", var.field.name()),
            format!("Sweep exceeds {MAX_GRID_CELLS} values"),
        )
    };
    let steps = var
        .max
        .checked_sub(var.min)
        .and_then(|span| span.checked_div(var.step))
        .ok_or_else(too_long)?
        .floor();
    if steps >= Decimal::from(MAX_GRID_CELLS) {
        return Err(too_long());
    }

    let mut values = Vec::new();
    let mut current = var.min;
    while current <= var.max {
        values.push(current);
        match current.checked_add(var.step) {
            Some(next) => current = next,
            None => break,
        }
    }
    // Ensure max is included if step doesn't land exactly on it
    if let Some(&last) = values.last() {
        if last < var.max {
            values.push(var.max);
        }
    }

    Ok(values)
}

/// Find the closest index to a target value.
fn closest_index(values: &[Decimal], target: Decimal) -> usize {
    values
        .iter()
        .enumerate()
        .min_by_key(|(_, v)| v.checked_sub(target).map_or(Decimal::MAX, |d| d.abs()))
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Sweep two scenario assumptions and record one metric per combination.
///
/// Every cell is an independent `compute_metrics` call on a replaced scenario;
/// a failing cell becomes `None` with a warning rather than aborting the grid.
pub fn scenario_sensitivity(
    input: &ScenarioSensitivityInput,
) -> RealtyResult<ComputationOutput<ScenarioSensitivityOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.variable_1.field == input.variable_2.field {
        return Err(RealtyError::invalid(
            "variable_2",
            "Sensitivity variables must sweep different scenario fields",
        ));
    }

    let base = input
        .base_scenario
        .clone()
        .unwrap_or_else(|| ScenarioParameters::seeded(&input.financials));

    let v1_values = generate_sweep_values(&input.variable_1)?;
    let v2_values = generate_sweep_values(&input.variable_2)?;
    if v1_values.len() * v2_values.len() > MAX_GRID_CELLS {
        return Err(RealtyError::invalid(
            "variable_1",
            format!(
                "Grid of {}x{} exceeds {MAX_GRID_CELLS} cells",
                v1_values.len(),
                v2_values.len()
            ),
        ));
    }

    // The base case itself must be valid; otherwise the grid has no anchor.
    let base_metrics = compute_metrics(&input.financials, &base)?;
    let base_case_value = input.output_metric.extract(&base_metrics);

    let mut matrix = Vec::with_capacity(v1_values.len());
    for v1 in &v1_values {
        let mut row = Vec::with_capacity(v2_values.len());
        for v2 in &v2_values {
            let cell = input
                .variable_1
                .field
                .apply(&base, *v1)
                .and_then(|s| input.variable_2.field.apply(&s, *v2))
                .and_then(|s| compute_metrics(&input.financials, &s));
            match cell {
                Ok(m) => {
                    let value = input.output_metric.extract(&m);
                    if value.is_none() {
                        warnings.push(format!(
                            "{} undefined at ({v1}, {v2})",
                            input.output_metric.name()
                        ));
                    }
                    row.push(value);
                }
                Err(e) => {
                    warnings.push(format!("Evaluation failed at ({v1}, {v2}): {e}"));
                    row.push(None);
                }
            }
        }
        matrix.push(row);
    }

    let base_row = closest_index(&v1_values, input.variable_1.field.read(&base));
    let base_col = closest_index(&v2_values, input.variable_2.field.read(&base));

    tracing::debug!(
        rows = v1_values.len(),
        cols = v2_values.len(),
        metric = input.output_metric.name(),
        "evaluated scenario sensitivity grid"
    );

    let output = ScenarioSensitivityOutput {
        variable_1_name: input.variable_1.field.name().to_string(),
        variable_2_name: input.variable_2.field.name().to_string(),
        variable_1_values: v1_values,
        variable_2_values: v2_values,
        output_metric: input.output_metric.name().to_string(),
        matrix,
        base_case_value,
        base_case_position: (base_row, base_col),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "2-Way Scenario Sensitivity (Investment Metrics)",
        &serde_json::json!({
            "financials": input.financials,
            "base_scenario": base,
            "variable_1": input.variable_1,
            "variable_2": input.variable_2,
            "output_metric": input.output_metric.name(),
        }),
        warnings,
        elapsed,
        output,
    ))
}
