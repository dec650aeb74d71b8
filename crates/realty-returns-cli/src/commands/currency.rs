use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use realty_returns_core::currency::{self, RateTable};
use realty_returns_core::Currency;

/// Arguments for formatting an AED amount
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct FormatArgs {
    /// Amount in AED
    #[arg(long)]
    pub amount: Decimal,

    /// Target currency code
    #[arg(long, default_value = "AED")]
    pub currency: Currency,
}

pub fn run_format(args: FormatArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let table = RateTable::default();
    let rate = table.rate(args.currency)?;
    let display = currency::format_amount(args.amount, args.currency, &table)?;
    Ok(json!({
        "amount_aed": args.amount,
        "currency": args.currency,
        "rate_per_aed": rate,
        "display": display,
    }))
}
