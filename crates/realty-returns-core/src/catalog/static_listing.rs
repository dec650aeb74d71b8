use rust_decimal_macros::dec;

use super::{PropertyCatalog, PropertyRecord};
use crate::RealtyResult;

/// Fixed, in-memory listing.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    records: Vec<PropertyRecord>,
}

impl StaticCatalog {
    pub fn new(records: Vec<PropertyRecord>) -> Self {
        Self { records }
    }

    /// Listing served when the published sheet is unavailable.
    pub fn dubai_listings() -> Self {
        Self::new(vec![
            PropertyRecord {
                id: "marina-2br-001".into(),
                title: "Two-bedroom apartment with marina view".into(),
                location: "Dubai Marina".into(),
                property_type: "Apartment".into(),
                bedrooms: Some(2),
                price: dec!(2800000),
                annual_rent: dec!(175000),
                service_charges: dec!(25000),
                default_appreciation: dec!(8),
            },
            PropertyRecord {
                id: "downtown-1br-002".into(),
                title: "One-bedroom residence near the Boulevard".into(),
                location: "Downtown Dubai".into(),
                property_type: "Apartment".into(),
                bedrooms: Some(1),
                price: dec!(1950000),
                annual_rent: dec!(130000),
                service_charges: dec!(21000),
                default_appreciation: dec!(7),
            },
            PropertyRecord {
                id: "jvc-studio-003".into(),
                title: "Furnished studio".into(),
                location: "Jumeirah Village Circle".into(),
                property_type: "Apartment".into(),
                bedrooms: Some(0),
                price: dec!(650000),
                annual_rent: dec!(55000),
                service_charges: dec!(9000),
                default_appreciation: dec!(6),
            },
            PropertyRecord {
                id: "palm-villa-004".into(),
                title: "Five-bedroom beachfront villa".into(),
                location: "Palm Jumeirah".into(),
                property_type: "Villa".into(),
                bedrooms: Some(5),
                price: dec!(32000000),
                annual_rent: dec!(1400000),
                service_charges: dec!(160000),
                default_appreciation: dec!(10),
            },
            PropertyRecord {
                id: "dubai-hills-townhouse-005".into(),
                title: "Three-bedroom townhouse, off-plan".into(),
                location: "Dubai Hills Estate".into(),
                property_type: "Townhouse".into(),
                bedrooms: Some(3),
                price: dec!(4200000),
                annual_rent: dec!(0),
                service_charges: dec!(22000),
                default_appreciation: dec!(9),
            },
        ])
    }
}

impl PropertyCatalog for StaticCatalog {
    fn fetch_all(&self) -> RealtyResult<Vec<PropertyRecord>> {
        Ok(self.records.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::investment::{compute_metrics, ScenarioParameters};

    #[test]
    fn test_listing_is_computable() {
        for record in StaticCatalog::dubai_listings().fetch_all().unwrap() {
            let f = record.financials();
            let m = compute_metrics(&f, &ScenarioParameters::seeded(&f));
            assert!(m.is_ok(), "{} failed: {:?}", record.id, m);
        }
    }

    #[test]
    fn test_ids_unique() {
        let records = StaticCatalog::dubai_listings().fetch_all().unwrap();
        let mut ids: Vec<_> = records.iter().map(|r| r.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), records.len());
    }

    #[test]
    fn test_empty_default() {
        assert!(StaticCatalog::default().fetch_all().unwrap().is_empty());
    }
}
