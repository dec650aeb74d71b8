pub mod metrics;
pub mod scenario;
pub mod sensitivity;

pub use metrics::{analyze_investment, compute_metrics, InvestmentAnalysisInput, InvestmentMetrics};
pub use scenario::{FinancingMode, PropertyFinancials, ScenarioParameters};
