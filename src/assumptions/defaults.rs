//! Versioned default assumption tables keyed by plan year

use serde::{Deserialize, Serialize};

use super::ActuarialAssumptions;
use crate::error::AssumptionError;

/// Minimum actuarial value for creditable coverage
pub const CREDITABLE_AV_THRESHOLD: f64 = 0.72;

/// Plan year whose defaults are used when none is requested
pub const DEFAULT_PLAN_YEAR: u16 = 2025;

/// CMS reference parameters for a plan year
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CmsParameters {
    /// Standard Part D deductible
    pub standard_deductible: f64,

    /// Part D annual out-of-pocket threshold
    pub out_of_pocket_threshold: f64,

    /// Actuarial value a plan must meet to be creditable
    pub av_threshold: f64,
}

/// Default assumptions and CMS parameters for one plan year
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanYearDefaults {
    pub plan_year: u16,
    pub cms: CmsParameters,
    pub assumptions: ActuarialAssumptions,
}

impl PlanYearDefaults {
    /// Plan years with a published default table
    pub const SUPPORTED_YEARS: &'static [u16] = &[2025];

    /// 2025 plan year defaults
    pub fn year_2025() -> Self {
        Self {
            plan_year: 2025,
            cms: CmsParameters {
                standard_deductible: 610.0,
                out_of_pocket_threshold: 2100.0,
                av_threshold: CREDITABLE_AV_THRESHOLD,
            },
            assumptions: ActuarialAssumptions {
                utilization: [0.65, 0.25, 0.07, 0.03],
                fill_cost: [20.0, 100.0, 250.0, 5000.0],
                estimated_annual_fills: 42.0,
                rx_deductible_allocation: 0.2,
            },
        }
    }

    /// Defaults for a specific plan year
    pub fn for_year(plan_year: u16) -> Result<Self, AssumptionError> {
        match plan_year {
            2025 => Ok(Self::year_2025()),
            other => Err(AssumptionError::UnsupportedPlanYear(other)),
        }
    }

    /// Most recent table available
    pub fn latest() -> Self {
        Self::year_2025()
    }

    /// Defaults for a plan year, falling back to the latest table
    pub fn resolve(plan_year: u16) -> Self {
        Self::for_year(plan_year).unwrap_or_else(|err| {
            let latest = Self::latest();
            log::warn!("{}; using plan year {} defaults", err, latest.plan_year);
            latest
        })
    }
}

impl Default for PlanYearDefaults {
    fn default() -> Self {
        Self::year_2025()
    }
}
