//! Project record structures: the read-only snapshot the resolver
//! consults for fallback defaults

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A development project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectRecord {
    /// Unique project identifier
    pub id: u32,

    /// Display name
    pub project_name: String,

    /// Nameplate DC capacity (MW)
    pub size_dc_mw: Option<f64>,

    /// Two-letter state code
    pub state: Option<String>,

    /// County name
    pub county: Option<String>,
}

/// Per-project lease/economics metadata (single row per project)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectEconomics {
    pub project_id: u32,

    /// Lease commencement date
    pub lease_start: Option<NaiveDate>,

    /// Lease expiration date
    pub lease_end: Option<NaiveDate>,

    /// Explicit lease term (years); wins over the date-derived term
    pub term_years: Option<u32>,

    /// Annual base rent ($)
    pub base_rent: Option<f64>,

    /// Rent escalator (%/yr)
    pub escalator_pct: Option<f64>,
}

impl ProjectEconomics {
    /// Lease term in whole years: the explicit term when recorded, else
    /// `round((lease_end - lease_start).days / 365)` with a 1-year floor.
    pub fn lease_term_years(&self) -> Option<u32> {
        if let Some(term) = self.term_years {
            return Some(term.max(1));
        }

        let (start, end) = (self.lease_start?, self.lease_end?);
        let days = (end - start).num_days();
        let years = (days as f64 / 365.0).round().max(1.0);
        Some(years as u32)
    }
}

/// Per-project incentives/production/financial assumptions (single row
/// per project)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectIncentives {
    pub project_id: u32,

    /// ITC-eligible share of capex (%)
    pub itc_eligible_pct: Option<f64>,

    /// Contracted REC price ($/MWh)
    pub rec_price: Option<f64>,

    /// REC contract tenor (years)
    pub rec_tenor_years: Option<u32>,

    /// Contracted PPA price ($/MWh)
    pub ppa_price: Option<f64>,

    /// PPA escalator (%/yr)
    pub ppa_esc_pct: Option<f64>,

    /// Modeled year-1 yield (MWh)
    pub pvsyst_yield_mwh: Option<f64>,

    /// Modeled annual degradation (%/yr)
    pub pvsyst_deg_pct: Option<f64>,

    /// Capex ($/kW)
    pub capex_per_kw: Option<f64>,

    /// Opex ($/kW-yr)
    pub opex_per_kw_yr: Option<f64>,
}

/// The fallback values the assumption resolver may consult, extracted
/// from a project's stored economics/incentives rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectDefaults {
    /// REC price ($/MWh)
    pub rec_price: Option<f64>,

    /// ITC-eligible share of capex (%)
    pub itc_pct: Option<f64>,

    /// Annual degradation (%/yr)
    pub degradation_pct: Option<f64>,

    /// Year-1 yield (MWh)
    pub year1_mwh: Option<f64>,

    /// Annual lease payment ($)
    pub lease_annual: Option<f64>,

    /// Lease term (years)
    pub lease_term_years: Option<u32>,
}

impl ProjectDefaults {
    /// Assemble the snapshot from whichever records the project has
    pub fn from_records(
        economics: Option<&ProjectEconomics>,
        incentives: Option<&ProjectIncentives>,
    ) -> Self {
        Self {
            rec_price: incentives.and_then(|i| i.rec_price),
            itc_pct: incentives.and_then(|i| i.itc_eligible_pct),
            degradation_pct: incentives.and_then(|i| i.pvsyst_deg_pct),
            year1_mwh: incentives.and_then(|i| i.pvsyst_yield_mwh),
            lease_annual: economics.and_then(|e| e.base_rent),
            lease_term_years: economics.and_then(|e| e.lease_term_years()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn economics(
        start: Option<&str>,
        end: Option<&str>,
        term_years: Option<u32>,
    ) -> ProjectEconomics {
        let date = |s: &str| NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap();
        ProjectEconomics {
            project_id: 1,
            lease_start: start.map(date),
            lease_end: end.map(date),
            term_years,
            base_rent: Some(12_000.0),
            escalator_pct: Some(2.0),
        }
    }

    #[test]
    fn test_explicit_term_wins() {
        let econ = economics(Some("2024-01-01"), Some("2034-01-01"), Some(25));
        assert_eq!(econ.lease_term_years(), Some(25));
    }

    #[test]
    fn test_term_derived_from_dates() {
        let econ = economics(Some("2024-06-01"), Some("2049-06-01"), None);
        assert_eq!(econ.lease_term_years(), Some(25));
    }

    #[test]
    fn test_short_lease_floors_at_one_year() {
        let econ = economics(Some("2024-06-01"), Some("2024-08-01"), None);
        assert_eq!(econ.lease_term_years(), Some(1));
    }

    #[test]
    fn test_term_unknown_without_dates() {
        let econ = economics(Some("2024-06-01"), None, None);
        assert_eq!(econ.lease_term_years(), None);
    }

    #[test]
    fn test_defaults_from_partial_records() {
        let econ = economics(None, None, Some(30));
        let defaults = ProjectDefaults::from_records(Some(&econ), None);

        assert_eq!(defaults.lease_annual, Some(12_000.0));
        assert_eq!(defaults.lease_term_years, Some(30));
        assert_eq!(defaults.rec_price, None);
        assert_eq!(defaults.itc_pct, None);
    }
}
