//! Scenario runner for batch sensitivity evaluation
//!
//! Binds one project's defaults once, then evaluates many request
//! variants without re-reading seed files.

use rayon::prelude::*;

use crate::assumptions::{resolve, FinanceRequest};
use crate::project::ProjectDefaults;
use crate::projection::{FinanceEngine, FinanceRunResult};

/// Pre-bound runner for evaluating assumption variants against a project
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::with_defaults(defaults);
///
/// for request in requests {
///     let result = runner.run(&request);
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    defaults: Option<ProjectDefaults>,
}

impl ScenarioRunner {
    /// Runner with no project defaults (hard-coded fallbacks only)
    pub fn new() -> Self {
        Self::default()
    }

    /// Runner bound to a project's defaults snapshot
    pub fn with_defaults(defaults: ProjectDefaults) -> Self {
        Self {
            defaults: Some(defaults),
        }
    }

    /// The bound defaults, if any
    pub fn defaults(&self) -> Option<&ProjectDefaults> {
        self.defaults.as_ref()
    }

    /// Resolve and run a single request
    pub fn run(&self, request: &FinanceRequest) -> FinanceRunResult {
        let assumptions = resolve(request, self.defaults.as_ref());
        FinanceEngine::new(assumptions).run()
    }

    /// Run many requests in parallel, preserving input order
    pub fn run_batch(&self, requests: &[FinanceRequest]) -> Vec<FinanceRunResult> {
        requests.par_iter().map(|r| self.run(r)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_preserves_order_and_varies_outputs() {
        let runner = ScenarioRunner::new();

        let requests: Vec<FinanceRequest> = [40.0, 55.0, 70.0]
            .iter()
            .map(|ppa| {
                serde_json::from_str(&format!(r#"{{"revenue": {{"ppa_price_mwh": {}}}}}"#, ppa))
                    .unwrap()
            })
            .collect();

        let results = runner.run_batch(&requests);
        assert_eq!(results.len(), 3);

        // Higher PPA price must not lower NPV
        assert!(results[1].outputs.npv_unlevered > results[0].outputs.npv_unlevered);
        assert!(results[2].outputs.npv_unlevered > results[1].outputs.npv_unlevered);
        assert_eq!(results[0].inputs.revenue.ppa_price_mwh, 40.0);
        assert_eq!(results[2].inputs.revenue.ppa_price_mwh, 70.0);
    }

    #[test]
    fn test_bound_defaults_flow_into_runs() {
        let defaults = ProjectDefaults {
            year1_mwh: Some(3000.0),
            ..Default::default()
        };
        let runner = ScenarioRunner::with_defaults(defaults);

        let result = runner.run(&FinanceRequest::default());
        assert_eq!(result.inputs.production.year1_mwh, 3000.0);
    }
}
