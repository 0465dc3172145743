//! Assumption resolution: caller overrides, project defaults, constants
//!
//! For every scalar field the precedence is caller value, then the
//! project's stored value (for the fields a project records), then the
//! hard-coded default. Resolution never fails; malformed or missing
//! values always degrade to a default.

use log::debug;

use crate::project::ProjectDefaults;

use super::request::FinanceRequest;
use super::AssumptionSet;

/// First available value, clamped to the non-negative invariant
fn pick(caller: Option<f64>, project: Option<f64>, default: f64) -> f64 {
    caller.or(project).unwrap_or(default).max(0.0)
}

/// Percent-style field to fraction
fn fraction(pct: f64) -> f64 {
    pct / 100.0
}

/// Year counts arrive as numbers on the wire; round and clamp
fn whole_years(value: f64) -> u32 {
    value.max(0.0).round() as u32
}

/// Resolve a wire request against optional project defaults into a fully
/// populated assumption set.
pub fn resolve(request: &FinanceRequest, project: Option<&ProjectDefaults>) -> AssumptionSet {
    let mut set = AssumptionSet::default();

    set.system.dc_kw = pick(request.system.dc_kw, None, set.system.dc_kw);
    set.system.capex_per_w = pick(request.system.capex_per_w, None, set.system.capex_per_w);
    set.system.total_capex = request
        .system
        .total_capex
        .filter(|&capex| capex > 0.0)
        .unwrap_or(set.system.capex_per_w * set.system.dc_kw * 1000.0);

    set.production.year1_mwh = pick(
        request.production.year1_mwh,
        project.and_then(|p| p.year1_mwh),
        set.production.year1_mwh,
    );
    set.production.degradation = fraction(pick(
        request.production.degradation_pct,
        project.and_then(|p| p.degradation_pct),
        0.5,
    ));

    set.revenue.ppa_price_mwh = pick(request.revenue.ppa_price_mwh, None, set.revenue.ppa_price_mwh);
    set.revenue.ppa_escalator = fraction(pick(request.revenue.ppa_escalator_pct, None, 2.0));
    set.revenue.rec_price_mwh = pick(
        request.revenue.rec_price_mwh,
        project.and_then(|p| p.rec_price),
        set.revenue.rec_price_mwh,
    );
    set.revenue.rec_term_years = whole_years(pick(request.revenue.rec_term_years, None, 0.0));

    set.opex.fixed_per_kw_yr = pick(request.opex.fixed_per_kw_yr, None, set.opex.fixed_per_kw_yr);
    set.opex.fixed_annual = pick(request.opex.fixed_annual, None, set.opex.fixed_annual);
    set.opex.variable_per_mwh = pick(request.opex.variable_per_mwh, None, set.opex.variable_per_mwh);
    set.opex.escalator = fraction(pick(request.opex.escalator_pct, None, 2.0));

    set.land_lease.annual = pick(
        request.land_lease.annual,
        project.and_then(|p| p.lease_annual),
        set.land_lease.annual,
    );
    set.land_lease.escalator = fraction(pick(request.land_lease.escalator_pct, None, 0.0));

    set.debt.debt_fraction = fraction(pick(request.debt.debt_pct, None, 0.0));
    set.debt.interest_rate = fraction(pick(request.debt.interest_pct, None, 0.0));
    set.debt.tenor_years = whole_years(pick(request.debt.tenor_years, None, 0.0));
    set.debt.dscr_target = pick(request.debt.dscr_target, None, set.debt.dscr_target);
    set.debt.upfront_fee_fraction = fraction(pick(request.debt.upfront_fee_pct, None, 0.0));
    set.debt.closing_costs = pick(request.debt.closing_costs, None, 0.0);

    set.incentives.itc_fraction = fraction(pick(
        request.incentives.itc_pct,
        project.and_then(|p| p.itc_pct),
        30.0,
    ));

    set.analysis.term_years = request
        .analysis
        .term_years
        .map(whole_years)
        .or_else(|| project.and_then(|p| p.lease_term_years))
        .unwrap_or(set.analysis.term_years)
        .max(1);
    set.analysis.discount_rate = fraction(pick(request.analysis.discount_rate_pct, None, 8.0));
    set.analysis.salvage_fraction = fraction(pick(request.analysis.salvage_pct_capex, None, 0.0));

    debug!(
        "resolved assumptions: {} kW, {:.0} capex, {} yr horizon",
        set.system.dc_kw, set.system.total_capex, set.analysis.term_years
    );

    set
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project_defaults() -> ProjectDefaults {
        ProjectDefaults {
            rec_price: Some(8.0),
            itc_pct: Some(40.0),
            degradation_pct: Some(0.7),
            year1_mwh: Some(1900.0),
            lease_annual: Some(15_000.0),
            lease_term_years: Some(30),
        }
    }

    #[test]
    fn test_empty_request_yields_defaults() {
        let set = resolve(&FinanceRequest::default(), None);
        assert_eq!(set, AssumptionSet::default());
    }

    #[test]
    fn test_project_values_fill_absent_fields() {
        let set = resolve(&FinanceRequest::default(), Some(&project_defaults()));

        assert_eq!(set.revenue.rec_price_mwh, 8.0);
        assert_eq!(set.incentives.itc_fraction, 0.40);
        assert_eq!(set.production.degradation, 0.007);
        assert_eq!(set.production.year1_mwh, 1900.0);
        assert_eq!(set.land_lease.annual, 15_000.0);
        assert_eq!(set.analysis.term_years, 30);
    }

    #[test]
    fn test_caller_beats_project() {
        let request: FinanceRequest = serde_json::from_str(
            r#"{"production": {"year1_mwh": 2500, "degradation_pct": 0.4},
                "incentives": {"itc_pct": 10},
                "analysis": {"term_years": 20}}"#,
        )
        .unwrap();

        let set = resolve(&request, Some(&project_defaults()));
        assert_eq!(set.production.year1_mwh, 2500.0);
        assert_eq!(set.production.degradation, 0.004);
        assert_eq!(set.incentives.itc_fraction, 0.10);
        assert_eq!(set.analysis.term_years, 20);
    }

    #[test]
    fn test_total_capex_derivation() {
        // Explicit positive value wins
        let request: FinanceRequest =
            serde_json::from_str(r#"{"system": {"total_capex": 2000000}}"#).unwrap();
        assert_eq!(resolve(&request, None).system.total_capex, 2_000_000.0);

        // Zero falls through to capex_per_w * dc_kw * 1000
        let request: FinanceRequest = serde_json::from_str(
            r#"{"system": {"dc_kw": 500, "capex_per_w": 2.0, "total_capex": 0}}"#,
        )
        .unwrap();
        assert_eq!(resolve(&request, None).system.total_capex, 1_000_000.0);
    }

    #[test]
    fn test_malformed_values_degrade_to_defaults() {
        let request: FinanceRequest = serde_json::from_str(
            r#"{"revenue": {"ppa_price_mwh": "n/a"},
                "analysis": {"discount_rate_pct": {}}}"#,
        )
        .unwrap();

        let set = resolve(&request, None);
        assert_eq!(set.revenue.ppa_price_mwh, 55.0);
        assert_eq!(set.analysis.discount_rate, 0.08);
    }

    #[test]
    fn test_negative_values_clamped() {
        let request: FinanceRequest = serde_json::from_str(
            r#"{"land_lease": {"annual": -5000}, "debt": {"debt_pct": -30}}"#,
        )
        .unwrap();

        let set = resolve(&request, None);
        assert_eq!(set.land_lease.annual, 0.0);
        assert_eq!(set.debt.debt_fraction, 0.0);
    }

    #[test]
    fn test_horizon_floor_is_one_year() {
        let request: FinanceRequest =
            serde_json::from_str(r#"{"analysis": {"term_years": 0}}"#).unwrap();
        assert_eq!(resolve(&request, None).analysis.term_years, 1);
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let request: FinanceRequest = serde_json::from_str(
            r#"{"system": {"dc_kw": 1200},
                "debt": {"debt_pct": 45, "interest_pct": 5.5, "tenor_years": 15}}"#,
        )
        .unwrap();

        let defaults = project_defaults();
        let first = resolve(&request, Some(&defaults));
        let second = resolve(&request, Some(&defaults));
        assert_eq!(first, second);
    }
}
