use clap::Args;
use serde::Serialize;
use serde_json::Value;

use realty_returns_core::catalog::{
    CsvCatalog, FallbackCatalog, PropertyCatalog, PropertyRecord, StaticCatalog,
};
use realty_returns_core::currency::{format_amount, format_percent, RateTable};
use realty_returns_core::investment::{compute_metrics, ScenarioParameters};
use realty_returns_core::{Currency, RealtyResult};

/// Arguments for listing the property catalog
#[derive(Args)]
pub struct CatalogArgs {
    /// CSV export of the published listing sheet; the built-in listing is
    /// served if it cannot be read
    #[arg(long)]
    pub csv: Option<String>,

    /// Currency for the formatted columns
    #[arg(long, default_value = "AED")]
    pub currency: Currency,
}

/// One catalog line with headline metrics under the seeded scenario.
#[derive(Debug, Serialize)]
struct CatalogRow {
    id: String,
    title: String,
    location: String,
    price: String,
    monthly_payment: String,
    net_monthly_cash_flow: String,
    gross_yield: String,
    total_return: String,
}

fn catalog_row(record: &PropertyRecord, currency: Currency, table: &RateTable) -> RealtyResult<CatalogRow> {
    let financials = record.financials();
    let metrics = compute_metrics(&financials, &ScenarioParameters::seeded(&financials))?;
    Ok(CatalogRow {
        id: record.id.clone(),
        title: record.title.clone(),
        location: record.location.clone(),
        price: format_amount(record.price, currency, table)?,
        monthly_payment: format_amount(metrics.monthly_payment, currency, table)?,
        net_monthly_cash_flow: format_amount(metrics.net_monthly_cash_flow, currency, table)?,
        gross_yield: format_percent(metrics.gross_yield_pct, 1),
        total_return: metrics
            .total_return_pct
            .map(|p| format_percent(p, 0))
            .unwrap_or_else(|| "n/a".into()),
    })
}

fn listing_rows(catalog: &dyn PropertyCatalog, currency: Currency) -> RealtyResult<Vec<CatalogRow>> {
    let table = RateTable::default();
    let records = catalog.fetch_all()?;
    let mut rows = Vec::with_capacity(records.len());
    for record in &records {
        match catalog_row(record, currency, &table) {
            Ok(row) => rows.push(row),
            Err(e) => tracing::warn!(id = %record.id, error = %e, "skipping uncomputable listing"),
        }
    }
    Ok(rows)
}

pub fn run_catalog(args: CatalogArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let catalog: Box<dyn PropertyCatalog> = match args.csv {
        Some(ref path) => Box::new(FallbackCatalog::new(
            CsvCatalog::from_path(path),
            StaticCatalog::dubai_listings(),
        )),
        None => Box::new(StaticCatalog::dubai_listings()),
    };
    let rows = listing_rows(catalog.as_ref(), args.currency)?;
    Ok(serde_json::to_value(rows)?)
}
