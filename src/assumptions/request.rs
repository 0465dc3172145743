//! Wire request for a finance run
//!
//! Every scalar field is optional and leniently parsed: JSON numbers and
//! numeric strings are accepted, anything else (null, empty or
//! non-numeric text) counts as absent. A request body never fails
//! deserialization over a field value; bad values degrade to the field
//! default during resolution.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Accept a number or a numeric string; anything else is None
fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(parse_numeric(&value))
}

fn parse_numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SystemInputs {
    #[serde(deserialize_with = "lenient_f64")]
    pub dc_kw: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub capex_per_w: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub total_capex: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProductionInputs {
    #[serde(deserialize_with = "lenient_f64")]
    pub year1_mwh: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub degradation_pct: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RevenueInputs {
    #[serde(deserialize_with = "lenient_f64")]
    pub ppa_price_mwh: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub ppa_escalator_pct: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub rec_price_mwh: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub rec_term_years: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OpexInputs {
    #[serde(deserialize_with = "lenient_f64")]
    pub fixed_per_kw_yr: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub fixed_annual: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub variable_per_mwh: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub escalator_pct: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LeaseInputs {
    #[serde(deserialize_with = "lenient_f64")]
    pub annual: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub escalator_pct: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DebtInputs {
    #[serde(deserialize_with = "lenient_f64")]
    pub debt_pct: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub interest_pct: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub tenor_years: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub dscr_target: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub upfront_fee_pct: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub closing_costs: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct IncentiveInputs {
    #[serde(deserialize_with = "lenient_f64")]
    pub itc_pct: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AnalysisInputs {
    #[serde(deserialize_with = "lenient_f64")]
    pub term_years: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub discount_rate_pct: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub salvage_pct_capex: Option<f64>,
}

/// Caller-supplied assumption overrides, grouped as on the wire
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FinanceRequest {
    pub system: SystemInputs,
    pub production: ProductionInputs,
    pub revenue: RevenueInputs,
    pub opex: OpexInputs,
    pub land_lease: LeaseInputs,
    pub debt: DebtInputs,
    pub incentives: IncentiveInputs,
    pub analysis: AnalysisInputs,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_request_parses() {
        let request: FinanceRequest = serde_json::from_str("{}").unwrap();
        assert!(request.system.dc_kw.is_none());
        assert!(request.analysis.term_years.is_none());
    }

    #[test]
    fn test_numbers_and_numeric_strings() {
        let request: FinanceRequest = serde_json::from_str(
            r#"{"system": {"dc_kw": 1500, "capex_per_w": "1.60"},
                "revenue": {"ppa_price_mwh": " 48.5 "}}"#,
        )
        .unwrap();

        assert_eq!(request.system.dc_kw, Some(1500.0));
        assert_eq!(request.system.capex_per_w, Some(1.60));
        assert_eq!(request.revenue.ppa_price_mwh, Some(48.5));
    }

    #[test]
    fn test_malformed_values_are_absent() {
        let request: FinanceRequest = serde_json::from_str(
            r#"{"system": {"dc_kw": "lots", "capex_per_w": null},
                "debt": {"tenor_years": [10]},
                "production": {"year1_mwh": ""}}"#,
        )
        .unwrap();

        assert!(request.system.dc_kw.is_none());
        assert!(request.system.capex_per_w.is_none());
        assert!(request.debt.tenor_years.is_none());
        assert!(request.production.year1_mwh.is_none());
    }

    #[test]
    fn test_unknown_groups_ignored() {
        let request: FinanceRequest =
            serde_json::from_str(r#"{"tax_equity": {"flip_year": 6}}"#).unwrap();
        assert!(request.incentives.itc_pct.is_none());
    }
}
