//! Solar Finance - project finance cash-flow engine for solar development projects
//!
//! This library provides:
//! - Assumption resolution (caller overrides, project defaults, hard-coded fallbacks)
//! - Yearly cash-flow projection (PPA/REC revenue, opex, land lease, annuity debt)
//! - Financial metrics (levered/unlevered NPV and IRR, minimum DSCR)
//! - Project record seeding and step-template bootstrap
//! - Batch scenario evaluation for sensitivity sweeps

pub mod assumptions;
pub mod project;
pub mod projection;
pub mod scenario;
pub mod steps;
pub mod store;

// Re-export commonly used types
pub use assumptions::{resolve, AssumptionSet, FinanceRequest};
pub use project::{ProjectBook, ProjectDefaults};
pub use projection::{FinanceEngine, FinanceOutputs, FinanceRunResult, YearlyCashFlow};
pub use scenario::ScenarioRunner;
