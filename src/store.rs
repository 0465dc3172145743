//! Finance run persistence seam
//!
//! Each model run is stored verbatim: resolved inputs, scalar outputs,
//! and the charting series, plus who ran it and when. Backends live
//! behind the `RunStore` trait; the in-memory implementation covers the
//! single-process surfaces and tests.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::projection::FinanceRunResult;

/// Errors surfaced by a run store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("run store lock poisoned")]
    Poisoned,
}

/// A stored finance run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinanceRun {
    /// Sequential run id
    pub id: u64,

    /// Project the run belongs to
    pub project_id: u32,

    /// Resolved assumptions, outputs, and charting series
    #[serde(flatten)]
    pub result: FinanceRunResult,

    /// Author supplied by the caller
    pub run_by: String,

    /// Creation timestamp (UTC)
    pub created_at: DateTime<Utc>,
}

/// Persistence collaborator for finance runs
pub trait RunStore: Send + Sync {
    /// Store a run, assigning its id and timestamp; returns the stored row
    fn save(
        &self,
        project_id: u32,
        result: FinanceRunResult,
        run_by: &str,
    ) -> Result<FinanceRun, StoreError>;

    /// All runs for a project, newest first
    fn runs_for_project(&self, project_id: u32) -> Result<Vec<FinanceRun>, StoreError>;
}

/// In-memory run store
#[derive(Debug, Default)]
pub struct MemoryRunStore {
    inner: Mutex<MemoryInner>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    next_id: u64,
    runs: Vec<FinanceRun>,
}

impl MemoryRunStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RunStore for MemoryRunStore {
    fn save(
        &self,
        project_id: u32,
        result: FinanceRunResult,
        run_by: &str,
    ) -> Result<FinanceRun, StoreError> {
        let mut inner = self.inner.lock().map_err(|_| StoreError::Poisoned)?;

        inner.next_id += 1;
        let run = FinanceRun {
            id: inner.next_id,
            project_id,
            result,
            run_by: run_by.to_string(),
            created_at: Utc::now(),
        };
        inner.runs.push(run.clone());

        Ok(run)
    }

    fn runs_for_project(&self, project_id: u32) -> Result<Vec<FinanceRun>, StoreError> {
        let inner = self.inner.lock().map_err(|_| StoreError::Poisoned)?;

        let mut runs: Vec<_> = inner
            .runs
            .iter()
            .filter(|r| r.project_id == project_id)
            .cloned()
            .collect();
        runs.reverse();

        Ok(runs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assumptions::AssumptionSet;
    use crate::projection::FinanceEngine;

    fn result() -> FinanceRunResult {
        FinanceEngine::new(AssumptionSet::default()).run()
    }

    #[test]
    fn test_save_assigns_sequential_ids() {
        let store = MemoryRunStore::new();

        let first = store.save(1, result(), "analyst").unwrap();
        let second = store.save(1, result(), "analyst").unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(first.run_by, "analyst");
    }

    #[test]
    fn test_runs_are_project_scoped_and_newest_first() {
        let store = MemoryRunStore::new();
        store.save(1, result(), "a").unwrap();
        store.save(2, result(), "b").unwrap();
        store.save(1, result(), "c").unwrap();

        let runs = store.runs_for_project(1).unwrap();
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].run_by, "c");
        assert_eq!(runs[1].run_by, "a");

        assert!(store.runs_for_project(99).unwrap().is_empty());
    }

    #[test]
    fn test_stored_run_serializes_flat() {
        let store = MemoryRunStore::new();
        let run = store.save(1, result(), "analyst").unwrap();

        let json = serde_json::to_value(&run).unwrap();
        assert!(json.get("inputs").is_some());
        assert!(json.get("outputs").is_some());
        assert!(json.get("cashflows").is_some());
        assert_eq!(json["project_id"], 1);
    }
}
