pub mod amortization;
pub mod error;
pub mod types;

#[cfg(feature = "investment")]
pub mod investment;

#[cfg(feature = "currency")]
pub mod currency;

#[cfg(feature = "catalog")]
pub mod catalog;

pub use error::RealtyError;
pub use types::*;

#[cfg(feature = "investment")]
pub use investment::{compute_metrics, InvestmentMetrics, PropertyFinancials, ScenarioParameters};

/// Standard result type for all realty-returns operations
pub type RealtyResult<T> = Result<T, RealtyError>;
