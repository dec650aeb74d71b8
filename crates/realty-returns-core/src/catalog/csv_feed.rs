use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use super::{PropertyCatalog, PropertyRecord};
use crate::error::RealtyError;
use crate::RealtyResult;

/// Appreciation assumed when the sheet leaves the column blank.
pub const DEFAULT_APPRECIATION_PCT: Decimal = dec!(8);

#[derive(Debug, Clone)]
enum CsvSource {
    Path(PathBuf),
    Text(String),
}

/// Catalog backed by a spreadsheet exported as CSV.
///
/// Headers are matched loosely (`Annual Rent`, `annual_rent` and `rent` all
/// map to the same column). Only `price` is mandatory; rows without a positive
/// price are skipped.
#[derive(Debug, Clone)]
pub struct CsvCatalog {
    source: CsvSource,
}

impl CsvCatalog {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            source: CsvSource::Path(path.into()),
        }
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            source: CsvSource::Text(text.into()),
        }
    }

    fn read_source(&self) -> RealtyResult<String> {
        match &self.source {
            CsvSource::Text(t) => Ok(t.clone()),
            CsvSource::Path(p) => fs::read_to_string(p).map_err(|e| {
                RealtyError::Catalog(format!("failed to read '{}': {e}", p.display()))
            }),
        }
    }
}

impl PropertyCatalog for CsvCatalog {
    fn fetch_all(&self) -> RealtyResult<Vec<PropertyRecord>> {
        let text = self.read_source()?;
        parse_catalog_csv(&text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Id,
    Title,
    Location,
    PropertyType,
    Bedrooms,
    Price,
    AnnualRent,
    ServiceCharges,
    Appreciation,
}

fn classify_header(header: &str) -> Option<Column> {
    let key: String = header
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase();
    let column = match key.as_str() {
        "id" | "propertyid" | "slug" => Column::Id,
        "title" | "name" | "propertyname" => Column::Title,
        "location" | "area" | "community" => Column::Location,
        "type" | "propertytype" => Column::PropertyType,
        "bedrooms" | "beds" | "br" => Column::Bedrooms,
        "price" | "priceaed" => Column::Price,
        "annualrent" | "rent" | "expectedrent" | "rentalincome" => Column::AnnualRent,
        "servicecharges" | "servicecharge" => Column::ServiceCharges,
        "appreciation" | "defaultappreciation" | "appreciationrate" => Column::Appreciation,
        _ => return None,
    };
    Some(column)
}

/// Parse `"AED 2,800,000"`, `"8%"` or `"175000"`; blank cells are `None`.
fn parse_numeric(cell: &str) -> Option<Result<Decimal, ()>> {
    let cleaned: String = cell
        .trim()
        .trim_start_matches("AED")
        .trim_start_matches("aed")
        .chars()
        .filter(|c| !matches!(c, ',' | '%' | ' '))
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    Some(Decimal::from_str(&cleaned).map_err(|_| ()))
}

fn parse_bedrooms(cell: &str) -> Option<u32> {
    let trimmed = cell.trim();
    if trimmed.eq_ignore_ascii_case("studio") {
        return Some(0);
    }
    trimmed
        .trim_end_matches(|c: char| c.is_ascii_alphabetic() || c.is_whitespace())
        .parse()
        .ok()
}

/// Parse the published-sheet CSV layout into property records.
pub fn parse_catalog_csv(text: &str) -> RealtyResult<Vec<PropertyRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let columns: Vec<Option<Column>> = reader
        .headers()
        .map_err(|e| RealtyError::Catalog(format!("unreadable header row: {e}")))?
        .iter()
        .map(classify_header)
        .collect();

    if !columns.contains(&Some(Column::Price)) {
        return Err(RealtyError::Catalog("no price column in catalog".into()));
    }

    let mut records = Vec::new();
    for (index, row) in reader.records().enumerate() {
        let row_number = index + 2;
        let row = match row {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(row = row_number, error = %e, "skipping unreadable catalog row");
                continue;
            }
        };

        let cell = |col: Column| {
            columns
                .iter()
                .position(|c| *c == Some(col))
                .and_then(|i| row.get(i))
                .unwrap_or("")
        };

        let price = match parse_numeric(cell(Column::Price)) {
            Some(Ok(p)) if p > Decimal::ZERO => p,
            _ => {
                tracing::warn!(
                    row = row_number,
                    price = cell(Column::Price),
                    "skipping catalog row without a positive price"
                );
                continue;
            }
        };

        let optional = |col: Column, name: &str, default: Decimal| -> Decimal {
            match parse_numeric(cell(col)) {
                None => default,
                Some(Ok(v)) => v,
                Some(Err(())) => {
                    tracing::warn!(
                        row = row_number,
                        column = name,
                        value = cell(col),
                        "unparseable catalog value, using default"
                    );
                    default
                }
            }
        };

        let id = match cell(Column::Id) {
            "" => format!("row-{row_number}"),
            id => id.to_string(),
        };
        let title = match cell(Column::Title) {
            "" => "Untitled property".to_string(),
            t => t.to_string(),
        };

        records.push(PropertyRecord {
            id,
            title,
            location: cell(Column::Location).to_string(),
            property_type: cell(Column::PropertyType).to_string(),
            bedrooms: parse_bedrooms(cell(Column::Bedrooms)),
            price,
            annual_rent: optional(Column::AnnualRent, "annual_rent", Decimal::ZERO)
                .max(Decimal::ZERO),
            service_charges: optional(Column::ServiceCharges, "service_charges", Decimal::ZERO)
                .max(Decimal::ZERO),
            default_appreciation: optional(
                Column::Appreciation,
                "appreciation",
                DEFAULT_APPRECIATION_PCT,
            ),
        });
    }

    if records.is_empty() {
        return Err(RealtyError::Catalog("catalog contains no valid properties".into()));
    }

    tracing::debug!(count = records.len(), "parsed property catalog");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SHEET: &str = "\
ID,Title,Location,Type,Bedrooms,Price (AED),Annual Rent,Service Charges,Appreciation
m1,Marina 2BR,Dubai Marina,Apartment,2,\"AED 2,800,000\",\"175,000\",25000,8%
j2,JVC Studio,JVC,Apartment,Studio,650000,,9000,
bad,No Price,Deira,Apartment,1,,60000,5000,5
neg,Negative,Deira,Apartment,1,-5,60000,5000,5
";

    #[test]
    fn test_parse_sheet_layout() {
        let records = parse_catalog_csv(SHEET).unwrap();
        assert_eq!(records.len(), 2);

        let marina = &records[0];
        assert_eq!(marina.id, "m1");
        assert_eq!(marina.price, dec!(2800000));
        assert_eq!(marina.annual_rent, dec!(175000));
        assert_eq!(marina.service_charges, dec!(25000));
        assert_eq!(marina.default_appreciation, dec!(8));
        assert_eq!(marina.bedrooms, Some(2));

        let studio = &records[1];
        assert_eq!(studio.bedrooms, Some(0));
        assert_eq!(studio.annual_rent, Decimal::ZERO);
        assert_eq!(studio.default_appreciation, DEFAULT_APPRECIATION_PCT);
    }

    #[test]
    fn test_missing_id_and_title_defaults() {
        let records = parse_catalog_csv("price\n1000000\n").unwrap();
        assert_eq!(records[0].id, "row-2");
        assert_eq!(records[0].title, "Untitled property");
    }

    #[test]
    fn test_unparseable_optional_uses_default() {
        let records = parse_catalog_csv("price,rent,appreciation\n900000,call us,tbc\n").unwrap();
        assert_eq!(records[0].annual_rent, Decimal::ZERO);
        assert_eq!(records[0].default_appreciation, DEFAULT_APPRECIATION_PCT);
    }

    #[test]
    fn test_no_price_column() {
        let err = parse_catalog_csv("title,rent\nFoo,100\n").unwrap_err();
        assert!(matches!(err, RealtyError::Catalog(_)));
    }

    #[test]
    fn test_no_valid_rows() {
        assert!(parse_catalog_csv("price\n0\n-1\n").is_err());
        assert!(parse_catalog_csv("price\n").is_err());
    }

    #[test]
    fn test_missing_file() {
        let catalog = CsvCatalog::from_path("/definitely/not/here.csv");
        assert!(matches!(catalog.fetch_all(), Err(RealtyError::Catalog(_))));
    }

    #[test]
    fn test_header_classification() {
        assert_eq!(classify_header("Service Charges"), Some(Column::ServiceCharges));
        assert_eq!(classify_header("annual_rent"), Some(Column::AnnualRent));
        assert_eq!(classify_header("Price (AED)"), Some(Column::Price));
        assert_eq!(classify_header("Agent"), None);
    }
}
