pub mod model;

#[cfg(feature = "scenarios")]
pub mod scenarios;

pub use model::{gross_annual_rent, run_financial_model, FinancialResult};

#[cfg(feature = "scenarios")]
pub use scenarios::{run_scenarios, run_scenarios_with, ScenarioName, ScenarioResult, ScenarioResults};
