//! PPA price / leverage sensitivity sweep
//!
//! Evaluates the finance model over a grid of PPA prices and debt
//! fractions and prints the metric grid as JSON.
//! Accepts config via environment variables:
//!   PPA_MIN, PPA_MAX, PPA_STEP, DEBT_PCTS (comma-separated),
//!   DEBT_INTEREST_PCT, DEBT_TENOR_YEARS, PROJECT_ID, DATA_DIR

use std::env;
use std::path::Path;
use std::time::Instant;

use anyhow::{bail, Context};
use rayon::prelude::*;
use serde::Serialize;

use solar_finance::{FinanceRequest, ProjectBook, ScenarioRunner};

#[derive(Serialize)]
struct SweepCell {
    ppa_price_mwh: f64,
    debt_pct: f64,
    unlevered_irr: Option<f64>,
    levered_irr: Option<f64>,
    npv_levered: f64,
    min_dscr: Option<f64>,
}

#[derive(Serialize)]
struct SweepResponse {
    project_id: Option<u32>,
    cells: Vec<SweepCell>,
    execution_time_ms: u64,
}

fn env_f64(name: &str, default: f64) -> f64 {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_pcts(name: &str, default: &[f64]) -> Vec<f64> {
    env::var(name)
        .ok()
        .map(|v| v.split(',').filter_map(|s| s.trim().parse().ok()).collect())
        .unwrap_or_else(|| default.to_vec())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let start = Instant::now();

    let ppa_min = env_f64("PPA_MIN", 40.0);
    let ppa_max = env_f64("PPA_MAX", 70.0);
    let ppa_step = env_f64("PPA_STEP", 5.0);
    let debt_pcts = env_pcts("DEBT_PCTS", &[0.0, 30.0, 50.0, 70.0]);
    let interest_pct = env_f64("DEBT_INTEREST_PCT", 6.0);
    let tenor_years = env_f64("DEBT_TENOR_YEARS", 18.0);

    if ppa_step <= 0.0 || ppa_max < ppa_min {
        bail!("invalid PPA sweep bounds");
    }

    let project_id = env::var("PROJECT_ID").ok().and_then(|v| v.parse().ok());
    let runner = match project_id {
        Some(id) => {
            let data_dir = env::var("DATA_DIR")
                .unwrap_or_else(|_| solar_finance::project::loader::DEFAULT_DATA_PATH.to_string());
            let book = ProjectBook::load_from(Path::new(&data_dir))
                .with_context(|| format!("loading seed data from {}", data_dir))?;
            let Some(defaults) = book.defaults_for(id) else {
                bail!("project {} not found", id);
            };
            ScenarioRunner::with_defaults(defaults)
        }
        None => ScenarioRunner::new(),
    };

    // Build the (ppa, debt) grid
    let mut grid = Vec::new();
    let mut ppa = ppa_min;
    while ppa <= ppa_max + 1e-9 {
        for &debt_pct in &debt_pcts {
            grid.push((ppa, debt_pct));
        }
        ppa += ppa_step;
    }

    let cells: Vec<SweepCell> = grid
        .par_iter()
        .map(|&(ppa_price, debt_pct)| {
            let mut request = FinanceRequest::default();
            request.revenue.ppa_price_mwh = Some(ppa_price);
            request.debt.debt_pct = Some(debt_pct);
            request.debt.interest_pct = Some(interest_pct);
            request.debt.tenor_years = Some(tenor_years);

            let result = runner.run(&request);
            SweepCell {
                ppa_price_mwh: ppa_price,
                debt_pct,
                unlevered_irr: result.outputs.unlevered_irr,
                levered_irr: result.outputs.levered_irr,
                npv_levered: result.outputs.npv_levered,
                min_dscr: result.outputs.min_dscr,
            }
        })
        .collect();

    let response = SweepResponse {
        project_id,
        cells,
        execution_time_ms: start.elapsed().as_millis() as u64,
    };

    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(())
}
