//! Cashflow output structures for finance runs

use serde::{Deserialize, Serialize};

use crate::assumptions::AssumptionSet;

/// A single year of projection output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YearlyCashFlow {
    /// Projection year (1-indexed; year 1 is index 0 in the series)
    pub year: u32,

    /// Degraded energy yield for the year (MWh)
    pub yield_mwh: f64,

    /// PPA energy revenue
    pub energy_revenue: f64,

    /// REC revenue (0 once the REC contract term has lapsed)
    pub rec_revenue: f64,

    /// Operating expenses (non-positive)
    pub opex: f64,

    /// Land lease cost (non-positive)
    pub lease: f64,

    /// Operating cash available for debt service
    pub cash_before_debt: f64,

    /// Level annuity debt service (non-positive; 0 past the tenor)
    pub debt_service: f64,

    /// Terminal salvage lump (0 except possibly the final year)
    pub salvage: f64,

    /// Net cash before financing
    pub net_unlevered: f64,

    /// Net cash after financing
    pub net_levered: f64,
}

/// A named series for charting, one value per projection year
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashflowSeries {
    pub label: String,
    pub values: Vec<f64>,
}

/// Scalar metrics of a finance run
///
/// IRRs are percentages rounded to two decimals; monetary amounts are
/// rounded to cents. `None` marks an indeterminate metric (degenerate IRR
/// bracket, or no debt service for DSCR) — the run itself still succeeds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinanceOutputs {
    pub levered_irr: Option<f64>,
    pub unlevered_irr: Option<f64>,
    pub npv_levered: f64,
    pub npv_unlevered: f64,
    pub ppa_price: f64,
    pub itc_credit: f64,
    pub min_dscr: Option<f64>,
}

/// Complete result of one finance run
///
/// Constructed once per invocation and handed to the persistence
/// collaborator verbatim; never mutated afterward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinanceRunResult {
    /// Resolved assumptions, echoed back to the caller
    pub inputs: AssumptionSet,

    /// Scalar metrics
    pub outputs: FinanceOutputs,

    /// Named series for charting, each of length = horizon
    pub cashflows: Vec<CashflowSeries>,
}

/// Intermediate projection output: the yearly rows plus the upfront cost
/// basis the metrics are computed against
#[derive(Debug, Clone)]
pub struct Projection {
    /// One row per year, length = analysis horizon
    pub rows: Vec<YearlyCashFlow>,

    /// Effective upfront outlay: capex - ITC - closing costs + debt fee
    pub net_upfront: f64,

    /// ITC credit amount (itc_fraction * total capex)
    pub itc_credit: f64,

    /// Level annual debt service (positive magnitude; 0 without debt)
    pub annual_debt_service: f64,
}

impl Projection {
    /// Net unlevered cashflows, one per year
    pub fn unlevered(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.net_unlevered).collect()
    }

    /// Net levered cashflows, one per year
    pub fn levered(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.net_levered).collect()
    }

    /// Build the named series the UI charts from
    pub fn series(&self) -> Vec<CashflowSeries> {
        let pick = |label: &str, f: fn(&YearlyCashFlow) -> f64| CashflowSeries {
            label: label.to_string(),
            values: self.rows.iter().map(f).collect(),
        };

        vec![
            pick("Energy Revenue", |r| r.energy_revenue),
            pick("REC Revenue", |r| r.rec_revenue),
            pick("Opex", |r| r.opex),
            pick("Lease", |r| r.lease),
            pick("Debt Service", |r| r.debt_service),
            pick("Net Cash Unlevered", |r| r.net_unlevered),
            pick("Net Cash Levered", |r| r.net_levered),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_row(year: u32, net: f64) -> YearlyCashFlow {
        YearlyCashFlow {
            year,
            yield_mwh: 0.0,
            energy_revenue: net,
            rec_revenue: 0.0,
            opex: 0.0,
            lease: 0.0,
            cash_before_debt: net,
            debt_service: 0.0,
            salvage: 0.0,
            net_unlevered: net,
            net_levered: net,
        }
    }

    #[test]
    fn test_series_shape() {
        let projection = Projection {
            rows: vec![flat_row(1, 100.0), flat_row(2, 90.0)],
            net_upfront: 500.0,
            itc_credit: 0.0,
            annual_debt_service: 0.0,
        };

        let series = projection.series();
        assert_eq!(series.len(), 7);
        assert_eq!(series[0].label, "Energy Revenue");
        for s in &series {
            assert_eq!(s.values.len(), 2);
        }

        assert_eq!(projection.unlevered(), vec![100.0, 90.0]);
        assert_eq!(projection.levered(), vec![100.0, 90.0]);
    }
}
