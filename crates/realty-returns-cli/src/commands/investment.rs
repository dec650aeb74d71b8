use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use realty_returns_core::amortization;
use realty_returns_core::catalog::csv_feed::DEFAULT_APPRECIATION_PCT;
use realty_returns_core::currency::{display_metrics, RateTable};
use realty_returns_core::investment::scenario::{
    DEFAULT_DOWN_PAYMENT_PCT, DEFAULT_INTEREST_RATE_PCT, DEFAULT_LOAN_TERM_YEARS,
    DEFAULT_VACANCY_PCT,
};
use realty_returns_core::investment::sensitivity::{self, ScenarioSensitivityInput};
use realty_returns_core::investment::{
    self as calc, FinancingMode, InvestmentAnalysisInput, PropertyFinancials, ScenarioParameters,
};
use realty_returns_core::Currency;

use crate::input;

/// Arguments for a single metrics run
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct MetricsArgs {
    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Purchase price in AED
    #[arg(long)]
    pub price: Option<Decimal>,

    /// Expected gross annual rent in AED
    #[arg(long, default_value = "0")]
    pub annual_rent: Decimal,

    /// Annual service charges in AED
    #[arg(long, default_value = "0")]
    pub service_charges: Decimal,

    /// Annual appreciation in percent (defaults to 8)
    #[arg(long)]
    pub appreciation: Option<Decimal>,

    /// Down payment in percent of price
    #[arg(long)]
    pub down_payment: Option<Decimal>,

    /// Annual mortgage interest rate in percent
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Loan term in years
    #[arg(long)]
    pub term: Option<u32>,

    /// Vacancy allowance in percent
    #[arg(long)]
    pub vacancy: Option<Decimal>,

    /// Buy outright with no mortgage
    #[arg(long)]
    pub cash: bool,

    /// Add a display block formatted in this currency (AED, USD, EUR, ...)
    #[arg(long)]
    pub currency: Option<Currency>,
}

/// Arguments for a yearly amortization schedule
#[derive(Args)]
pub struct ScheduleArgs {
    /// Loan principal in AED
    #[arg(long)]
    pub principal: Decimal,

    /// Annual interest rate in percent
    #[arg(long, default_value_t = DEFAULT_INTEREST_RATE_PCT)]
    pub rate: Decimal,

    /// Loan term in years
    #[arg(long, default_value_t = DEFAULT_LOAN_TERM_YEARS)]
    pub term: u32,
}

/// Arguments for a 2-way scenario sensitivity grid
#[derive(Args)]
pub struct SensitivityArgs {
    /// Path to JSON/YAML file with financials, variables and output metric
    #[arg(long)]
    pub input: Option<String>,
}

fn analysis_from_flags(args: &MetricsArgs) -> Result<InvestmentAnalysisInput, Box<dyn std::error::Error>> {
    let financials = PropertyFinancials {
        price: args.price.ok_or("--price is required (or provide --input)")?,
        annual_rent: args.annual_rent,
        service_charges: args.service_charges,
        default_appreciation: args.appreciation.unwrap_or(DEFAULT_APPRECIATION_PCT),
    };
    let seeded = ScenarioParameters::seeded(&financials);
    let scenario = ScenarioParameters {
        down_payment_pct: args.down_payment.unwrap_or(DEFAULT_DOWN_PAYMENT_PCT),
        annual_interest_rate_pct: args.rate.unwrap_or(DEFAULT_INTEREST_RATE_PCT),
        loan_term_years: args.term.unwrap_or(DEFAULT_LOAN_TERM_YEARS),
        vacancy_pct: args.vacancy.unwrap_or(DEFAULT_VACANCY_PCT),
        mode: if args.cash {
            FinancingMode::Cash
        } else {
            FinancingMode::Mortgage
        },
        ..seeded
    };
    Ok(InvestmentAnalysisInput {
        financials,
        scenario: Some(scenario),
    })
}

pub fn run_metrics(args: MetricsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let analysis: InvestmentAnalysisInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if args.price.is_none() {
        match input::stdin::read_stdin()? {
            Some(data) => serde_json::from_value(data)?,
            None => return Err("--price or --input <file> (or stdin) required".into()),
        }
    } else {
        analysis_from_flags(&args)?
    };

    let output = calc::analyze_investment(&analysis)?;
    let mut value = serde_json::to_value(&output)?;

    if let Some(currency) = args.currency {
        let display = display_metrics(&output.result, currency, &RateTable::default())?;
        if let Some(map) = value.as_object_mut() {
            map.insert("display".into(), serde_json::to_value(display)?);
        }
    }
    Ok(value)
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let schedule = amortization::amortization_schedule(args.principal, args.rate, args.term)?;
    Ok(serde_json::to_value(schedule)?)
}

pub fn run_sensitivity(args: SensitivityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let sens_input: ScenarioSensitivityInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input <file> or stdin required for sensitivity analysis".into());
    };
    let result = sensitivity::scenario_sensitivity(&sens_input)?;
    Ok(serde_json::to_value(result)?)
}
