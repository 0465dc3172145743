//! Techno-economic assumptions: wire request, defaults, and resolution

mod request;
mod resolver;

pub use request::{
    AnalysisInputs, DebtInputs, FinanceRequest, IncentiveInputs, LeaseInputs, OpexInputs,
    ProductionInputs, RevenueInputs, SystemInputs,
};
pub use resolver::resolve;

use serde::{Deserialize, Serialize};

/// System sizing and capital cost
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemAssumptions {
    /// Nameplate DC capacity (kW)
    pub dc_kw: f64,

    /// Capital cost per watt ($/W)
    pub capex_per_w: f64,

    /// Total capital cost ($); derived from `capex_per_w * dc_kw * 1000`
    /// when not supplied
    pub total_capex: f64,
}

impl Default for SystemAssumptions {
    fn default() -> Self {
        Self {
            dc_kw: 1000.0,      // 1 MW
            capex_per_w: 1.75,  // $/W
            total_capex: 1.75 * 1000.0 * 1000.0,
        }
    }
}

/// Energy production profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionAssumptions {
    /// Year-1 energy yield (MWh)
    pub year1_mwh: f64,

    /// Annual degradation (fraction/yr)
    pub degradation: f64,
}

impl Default for ProductionAssumptions {
    fn default() -> Self {
        Self {
            year1_mwh: 2200.0,
            degradation: 0.005, // 0.5%/yr
        }
    }
}

/// Contracted revenue streams
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueAssumptions {
    /// PPA price ($/MWh)
    pub ppa_price_mwh: f64,

    /// PPA price escalator (fraction/yr); also applied to the REC price
    pub ppa_escalator: f64,

    /// REC price ($/MWh)
    pub rec_price_mwh: f64,

    /// REC contract term (years; 0 = full horizon)
    pub rec_term_years: u32,
}

impl Default for RevenueAssumptions {
    fn default() -> Self {
        Self {
            ppa_price_mwh: 55.0,
            ppa_escalator: 0.02, // 2%/yr
            rec_price_mwh: 0.0,
            rec_term_years: 0,
        }
    }
}

/// Operating expenses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpexAssumptions {
    /// Fixed cost per kW per year ($/kW-yr)
    pub fixed_per_kw_yr: f64,

    /// Fixed annual cost ($)
    pub fixed_annual: f64,

    /// Variable cost per MWh produced ($/MWh)
    pub variable_per_mwh: f64,

    /// Opex escalator (fraction/yr); applies to the fixed components only
    pub escalator: f64,
}

impl Default for OpexAssumptions {
    fn default() -> Self {
        Self {
            fixed_per_kw_yr: 18.0,
            fixed_annual: 0.0,
            variable_per_mwh: 0.0,
            escalator: 0.02, // 2%/yr
        }
    }
}

/// Land lease payment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaseAssumptions {
    /// Annual payment ($)
    pub annual: f64,

    /// Lease escalator (fraction/yr)
    pub escalator: f64,
}

impl Default for LeaseAssumptions {
    fn default() -> Self {
        Self {
            annual: 12_000.0,
            escalator: 0.0,
        }
    }
}

/// Debt sizing and terms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebtAssumptions {
    /// Debt fraction of total capex (0 = all-equity)
    pub debt_fraction: f64,

    /// Annual interest rate (fraction)
    pub interest_rate: f64,

    /// Amortization tenor (years); may exceed the analysis horizon
    pub tenor_years: u32,

    /// Target coverage ratio; echoed with the run, not used in any formula
    pub dscr_target: f64,

    /// Upfront lender fee as a fraction of the loan principal
    pub upfront_fee_fraction: f64,

    /// Fixed closing costs ($)
    pub closing_costs: f64,
}

impl Default for DebtAssumptions {
    fn default() -> Self {
        Self {
            debt_fraction: 0.0,
            interest_rate: 0.0,
            tenor_years: 0,
            dscr_target: 1.30,
            upfront_fee_fraction: 0.0,
            closing_costs: 0.0,
        }
    }
}

/// Tax incentives
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncentiveAssumptions {
    /// Investment-tax-credit-eligible fraction of capex
    pub itc_fraction: f64,
}

impl Default for IncentiveAssumptions {
    fn default() -> Self {
        Self {
            itc_fraction: 0.30, // 30% ITC
        }
    }
}

/// Analysis window and discounting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisAssumptions {
    /// Horizon length (years, >= 1); defaults to the project lease term
    /// when derivable
    pub term_years: u32,

    /// Discount rate (fraction)
    pub discount_rate: f64,

    /// Terminal salvage value as a fraction of total capex
    pub salvage_fraction: f64,
}

impl Default for AnalysisAssumptions {
    fn default() -> Self {
        Self {
            term_years: 25,
            discount_rate: 0.08, // 8%
            salvage_fraction: 0.0,
        }
    }
}

/// Fully resolved assumption set, one per engine invocation
///
/// Every field is populated; percent-style request fields have been
/// normalized to fractions. The set is echoed back verbatim as the
/// `inputs` payload of the run result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssumptionSet {
    pub system: SystemAssumptions,
    pub production: ProductionAssumptions,
    pub revenue: RevenueAssumptions,
    pub opex: OpexAssumptions,
    pub land_lease: LeaseAssumptions,
    pub debt: DebtAssumptions,
    pub incentives: IncentiveAssumptions,
    pub analysis: AnalysisAssumptions,
}
