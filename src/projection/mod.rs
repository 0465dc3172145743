//! Projection engine: yearly cash flows and derived financial metrics

mod cashflows;
mod engine;
pub mod irr;
pub mod metrics;

pub use cashflows::{CashflowSeries, FinanceOutputs, FinanceRunResult, Projection, YearlyCashFlow};
pub use engine::FinanceEngine;
pub use irr::{calculate_irr, npv_at_rate, IRR_BISECTION_STEPS, IRR_RATE_CEIL, IRR_RATE_FLOOR};
