//! Financial metrics aggregation: NPV, IRR, and debt-service coverage
//!
//! Consumes the full projection and the upfront cost basis; all internal
//! math runs at full precision, rounding happens only on the way out.

use super::cashflows::{FinanceOutputs, Projection, YearlyCashFlow};
use super::irr::calculate_irr;

/// Round a monetary amount to cents
pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Express a rate fraction as a percentage rounded to two decimals
fn as_pct(rate: f64) -> f64 {
    (rate * 10_000.0).round() / 100.0
}

/// NPV of yearly cashflows against an upfront outlay.
///
/// Discrete end-of-year discounting: `cashflows[i]` lands at the end of
/// year i+1 and is discounted by `(1+rate)^(i+1)`.
pub fn npv(cashflows: &[f64], discount_rate: f64, net_upfront: f64) -> f64 {
    let pv: f64 = cashflows
        .iter()
        .enumerate()
        .map(|(i, &cf)| cf / (1.0 + discount_rate).powi(i as i32 + 1))
        .sum();
    pv - net_upfront
}

/// Per-year DSCR: operating cash over the debt obligation.
///
/// Undefined (None) for years without debt service.
pub fn yearly_dscr(rows: &[YearlyCashFlow]) -> Vec<Option<f64>> {
    rows.iter()
        .map(|row| {
            if row.debt_service < 0.0 {
                Some(row.cash_before_debt / row.debt_service.abs())
            } else {
                None
            }
        })
        .collect()
}

/// Minimum over the defined yearly DSCR values; None if no year carries
/// debt service.
pub fn min_dscr(rows: &[YearlyCashFlow]) -> Option<f64> {
    yearly_dscr(rows)
        .into_iter()
        .flatten()
        .min_by(|a, b| a.total_cmp(b))
}

/// Compute all scalar metrics for a projection.
///
/// `ppa_price` is the resolved year-1 PPA price, echoed into the outputs
/// for the economics view.
pub fn aggregate(projection: &Projection, discount_rate: f64, ppa_price: f64) -> FinanceOutputs {
    let unlevered = projection.unlevered();
    let levered = projection.levered();

    let npv_unlevered = npv(&unlevered, discount_rate, projection.net_upfront);
    let npv_levered = npv(&levered, discount_rate, projection.net_upfront);

    let irr_series = |cfs: &[f64]| {
        let mut series = Vec::with_capacity(cfs.len() + 1);
        series.push(-projection.net_upfront);
        series.extend_from_slice(cfs);
        calculate_irr(&series)
    };

    FinanceOutputs {
        levered_irr: irr_series(&levered).map(as_pct),
        unlevered_irr: irr_series(&unlevered).map(as_pct),
        npv_levered: round_cents(npv_levered),
        npv_unlevered: round_cents(npv_unlevered),
        ppa_price,
        itc_credit: round_cents(projection.itc_credit),
        min_dscr: min_dscr(&projection.rows).map(|d| (d * 100.0).round() / 100.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn row(cash_before_debt: f64, debt_service: f64) -> YearlyCashFlow {
        YearlyCashFlow {
            year: 1,
            yield_mwh: 0.0,
            energy_revenue: cash_before_debt,
            rec_revenue: 0.0,
            opex: 0.0,
            lease: 0.0,
            cash_before_debt,
            debt_service,
            salvage: 0.0,
            net_unlevered: cash_before_debt,
            net_levered: cash_before_debt + debt_service,
        }
    }

    #[test]
    fn test_npv_end_of_year_discounting() {
        // Single cashflow of 108 one year out at 8% discounts to 100
        let npv = npv(&[108.0], 0.08, 0.0);
        assert_relative_eq!(npv, 100.0, max_relative = 1e-12);

        // Upfront outlay subtracts undiscounted
        let npv = super::npv(&[108.0], 0.08, 60.0);
        assert_relative_eq!(npv, 40.0, max_relative = 1e-12);
    }

    #[test]
    fn test_npv_decreasing_in_discount_rate() {
        let cashflows = vec![91_000.0; 25];
        let mut prev = f64::INFINITY;
        for rate in [0.02, 0.05, 0.08, 0.12, 0.20] {
            let value = npv(&cashflows, rate, 1_225_000.0);
            assert!(value < prev);
            prev = value;
        }
    }

    #[test]
    fn test_dscr_undefined_without_debt() {
        let rows = vec![row(100.0, 0.0), row(90.0, 0.0)];
        assert!(yearly_dscr(&rows).iter().all(|d| d.is_none()));
        assert!(min_dscr(&rows).is_none());
    }

    #[test]
    fn test_min_dscr_over_defined_years() {
        // Debt service ends after year 2; year 3 must not dilute the min
        let rows = vec![row(120.0, -100.0), row(110.0, -100.0), row(500.0, 0.0)];

        let series = yearly_dscr(&rows);
        assert_eq!(series[0], Some(1.2));
        assert_eq!(series[1], Some(1.1));
        assert_eq!(series[2], None);

        assert_relative_eq!(min_dscr(&rows).unwrap(), 1.1, max_relative = 1e-12);
    }

    #[test]
    fn test_aggregate_no_debt_levered_equals_unlevered() {
        let projection = Projection {
            rows: vec![row(100.0, 0.0), row(100.0, 0.0), row(100.0, 0.0)],
            net_upfront: 250.0,
            itc_credit: 0.0,
            annual_debt_service: 0.0,
        };

        let outputs = aggregate(&projection, 0.08, 55.0);
        assert_eq!(outputs.levered_irr, outputs.unlevered_irr);
        assert_eq!(outputs.npv_levered, outputs.npv_unlevered);
        assert!(outputs.min_dscr.is_none());
        assert!(outputs.unlevered_irr.is_some());
    }

    #[test]
    fn test_aggregate_degenerate_irr_is_none() {
        // Positive upfront basis but no positive cashflows: no sign change
        let projection = Projection {
            rows: vec![row(-10.0, 0.0), row(-10.0, 0.0)],
            net_upfront: 100.0,
            itc_credit: 0.0,
            annual_debt_service: 0.0,
        };

        let outputs = aggregate(&projection, 0.08, 55.0);
        assert!(outputs.levered_irr.is_none());
        assert!(outputs.unlevered_irr.is_none());
    }
}
