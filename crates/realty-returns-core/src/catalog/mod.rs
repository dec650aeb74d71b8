//! Read-only property catalog boundary.
//!
//! The live listing is a published spreadsheet exported as CSV; when it cannot
//! be read, a hard-coded listing is served instead. The fallback is a policy of
//! [`FallbackCatalog`], never of the calculator.

pub mod csv_feed;
pub mod static_listing;

use serde::{Deserialize, Serialize};

use crate::investment::PropertyFinancials;
use crate::types::{Money, Percent};
use crate::RealtyResult;

pub use csv_feed::CsvCatalog;
pub use static_listing::StaticCatalog;

/// A listed property as published by the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyRecord {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub property_type: String,
    /// `Some(0)` for studios
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bedrooms: Option<u32>,
    pub price: Money,
    pub annual_rent: Money,
    pub service_charges: Money,
    pub default_appreciation: Percent,
}

impl PropertyRecord {
    /// The numeric attributes the calculator consumes.
    pub fn financials(&self) -> PropertyFinancials {
        PropertyFinancials {
            price: self.price,
            annual_rent: self.annual_rent,
            service_charges: self.service_charges,
            default_appreciation: self.default_appreciation,
        }
    }
}

/// Source of property listings.
pub trait PropertyCatalog {
    fn fetch_all(&self) -> RealtyResult<Vec<PropertyRecord>>;
}

impl<T: PropertyCatalog + ?Sized> PropertyCatalog for Box<T> {
    fn fetch_all(&self) -> RealtyResult<Vec<PropertyRecord>> {
        (**self).fetch_all()
    }
}

/// Serves `fallback` whenever `primary` fails.
#[derive(Debug, Clone)]
pub struct FallbackCatalog<P, F> {
    primary: P,
    fallback: F,
}

impl<P, F> FallbackCatalog<P, F> {
    pub fn new(primary: P, fallback: F) -> Self {
        Self { primary, fallback }
    }
}

impl<P: PropertyCatalog, F: PropertyCatalog> PropertyCatalog for FallbackCatalog<P, F> {
    fn fetch_all(&self) -> RealtyResult<Vec<PropertyRecord>> {
        match self.primary.fetch_all() {
            Ok(records) => Ok(records),
            Err(e) => {
                tracing::warn!(error = %e, "primary property catalog failed, serving fallback listing");
                self.fallback.fetch_all()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RealtyError;

    struct Broken;

    impl PropertyCatalog for Broken {
        fn fetch_all(&self) -> RealtyResult<Vec<PropertyRecord>> {
            Err(RealtyError::Catalog("sheet unreachable".into()))
        }
    }

    #[test]
    fn test_fallback_on_primary_error() {
        let catalog = FallbackCatalog::new(Broken, StaticCatalog::dubai_listings());
        let records = catalog.fetch_all().unwrap();
        assert_eq!(records, StaticCatalog::dubai_listings().fetch_all().unwrap());
    }

    #[test]
    fn test_primary_wins_when_healthy() {
        let csv = "id,title,price\nx1,Studio JVC,650000\n";
        let catalog = FallbackCatalog::new(
            CsvCatalog::from_text(csv),
            StaticCatalog::dubai_listings(),
        );
        let records = catalog.fetch_all().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "x1");
    }

    #[test]
    fn test_both_failing_propagates_fallback_error() {
        let catalog = FallbackCatalog::new(Broken, Broken);
        assert!(matches!(catalog.fetch_all(), Err(RealtyError::Catalog(_))));
    }

    #[test]
    fn test_boxed_catalog() {
        let boxed: Box<dyn PropertyCatalog> = Box::new(StaticCatalog::dubai_listings());
        assert!(!boxed.fetch_all().unwrap().is_empty());
    }

    #[test]
    fn test_record_financials() {
        let record = &StaticCatalog::dubai_listings().fetch_all().unwrap()[0];
        let f = record.financials();
        assert_eq!(f.price, record.price);
        assert_eq!(f.default_appreciation, record.default_appreciation);
    }
}
