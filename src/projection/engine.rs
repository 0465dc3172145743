//! Core projection engine for yearly project cash flows
//!
//! Turns a resolved assumption set into the per-year cash-flow rows and
//! the upfront cost basis, then hands both to the metrics aggregator.

use crate::assumptions::AssumptionSet;

use super::cashflows::{FinanceRunResult, Projection, YearlyCashFlow};
use super::metrics::{self, round_cents};

/// Level annuity factor `((1+r)^n - 1) / (r * (1+r)^n)`.
///
/// Returns 0 for a non-positive rate or zero tenor; callers treat a zero
/// factor as "no debt service".
fn annuity_factor(rate: f64, tenor_years: u32) -> f64 {
    if rate <= 0.0 || tenor_years == 0 {
        return 0.0;
    }
    let growth = (1.0 + rate).powi(tenor_years as i32);
    (growth - 1.0) / (rate * growth)
}

/// Main finance engine: one instance per resolved assumption set
///
/// Pure and synchronous; safe to run concurrently from independent
/// requests since each engine owns its snapshot of the assumptions.
pub struct FinanceEngine {
    assumptions: AssumptionSet,
}

impl FinanceEngine {
    /// Create a new engine over a resolved assumption set
    pub fn new(assumptions: AssumptionSet) -> Self {
        Self { assumptions }
    }

    /// The resolved assumptions this engine projects from
    pub fn assumptions(&self) -> &AssumptionSet {
        &self.assumptions
    }

    /// Produce the yearly cash-flow rows and the upfront cost basis
    pub fn project(&self) -> Projection {
        let a = &self.assumptions;
        let horizon = a.analysis.term_years.max(1);

        let total_capex = a.system.total_capex;
        let loan_principal = total_capex * a.debt.debt_fraction;

        let factor = annuity_factor(a.debt.interest_rate, a.debt.tenor_years);
        let annual_debt_service = if factor > 0.0 {
            loan_principal / factor
        } else {
            0.0
        };

        let itc_credit = a.incentives.itc_fraction * total_capex;
        let fee_amount = loan_principal * a.debt.upfront_fee_fraction;
        // Fees increase the effective outlay since they are not financed
        let net_upfront = total_capex - itc_credit - a.debt.closing_costs + fee_amount;

        let salvage_lump = total_capex * a.analysis.salvage_fraction;

        let mut rows = Vec::with_capacity(horizon as usize);
        for i in 0..horizon {
            rows.push(self.project_year(i, horizon, annual_debt_service, salvage_lump));
        }

        Projection {
            rows,
            net_upfront,
            itc_credit,
            annual_debt_service,
        }
    }

    /// Compute a single year's row (`i` from 0; year 1 = i=0)
    fn project_year(
        &self,
        i: u32,
        horizon: u32,
        annual_debt_service: f64,
        salvage_lump: f64,
    ) -> YearlyCashFlow {
        let a = &self.assumptions;
        // All escalation compounds from year 0: multiplier (1+rate)^i
        let escalate = |rate: f64| (1.0 + rate).powi(i as i32);

        let yield_mwh = a.production.year1_mwh * (1.0 - a.production.degradation).powi(i as i32);

        let ppa_price = a.revenue.ppa_price_mwh * escalate(a.revenue.ppa_escalator);
        let rec_active = a.revenue.rec_term_years == 0 || i < a.revenue.rec_term_years;
        let rec_price = if rec_active {
            a.revenue.rec_price_mwh * escalate(a.revenue.ppa_escalator)
        } else {
            0.0
        };

        let energy_revenue = round_cents(yield_mwh * ppa_price);
        let rec_revenue = round_cents(yield_mwh * rec_price);

        let opex = -round_cents(
            a.opex.fixed_per_kw_yr * a.system.dc_kw * escalate(a.opex.escalator)
                + a.opex.fixed_annual * escalate(a.opex.escalator)
                + a.opex.variable_per_mwh * yield_mwh,
        );
        let lease = -round_cents(a.land_lease.annual * escalate(a.land_lease.escalator));

        let cash_before_debt = energy_revenue + rec_revenue + opex + lease;

        let debt_service = if i < a.debt.tenor_years && annual_debt_service > 0.0 {
            -round_cents(annual_debt_service)
        } else {
            0.0
        };

        // Terminal salvage lands in the last year's net figures as a lump
        // sum, post-debt; it is not part of the operating cash for DSCR
        let salvage = if salvage_lump > 0.0 && i + 1 == horizon {
            salvage_lump
        } else {
            0.0
        };

        YearlyCashFlow {
            year: i + 1,
            yield_mwh,
            energy_revenue,
            rec_revenue,
            opex,
            lease,
            cash_before_debt,
            debt_service,
            salvage,
            net_unlevered: cash_before_debt + salvage,
            net_levered: cash_before_debt + debt_service + salvage,
        }
    }

    /// Run the full projection and aggregate the scalar metrics
    pub fn run(&self) -> FinanceRunResult {
        let projection = self.project();
        let outputs = metrics::aggregate(
            &projection,
            self.assumptions.analysis.discount_rate,
            self.assumptions.revenue.ppa_price_mwh,
        );

        FinanceRunResult {
            inputs: self.assumptions.clone(),
            outputs,
            cashflows: projection.series(),
        }
    }
}
