//! Actuarial assumptions: utilization, fill costs, and plan-year defaults

mod defaults;
mod overrides;
pub mod loader;

pub use defaults::{
    CmsParameters, PlanYearDefaults, CREDITABLE_AV_THRESHOLD, DEFAULT_PLAN_YEAR,
};
pub use overrides::AssumptionOverrides;

use serde::{Deserialize, Serialize};

use crate::error::AssumptionError;
use crate::plan::TIER_COUNT;

/// Fully resolved model inputs for one evaluation
///
/// Independent of any plan. Per-tier arrays are indexed from tier 1.
/// On the wire the arrays are flattened to the same `t1Utilization` ...
/// `t4FillCost` fields that [`AssumptionOverrides`] reads.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "AssumptionsWire", into = "AssumptionsWire")]
pub struct ActuarialAssumptions {
    /// Fraction of annual fills attributable to each tier
    pub utilization: [f64; TIER_COUNT],

    /// Average cost of one fill at each tier
    pub fill_cost: [f64; TIER_COUNT],

    /// Total fills per member per year across all tiers
    pub estimated_annual_fills: f64,

    /// Share of a combined medical + Rx deductible attributed to Rx
    pub rx_deductible_allocation: f64,
}

impl ActuarialAssumptions {
    /// Expected fills per member per year at a tier (0-based index)
    pub fn fills(&self, idx: usize) -> f64 {
        self.utilization[idx] * self.estimated_annual_fills
    }

    /// Sum of tier utilizations, expected (not required) to be 1
    pub fn utilization_total(&self) -> f64 {
        self.utilization.iter().sum()
    }

    /// Check that every input is finite and non-negative
    pub fn validate(&self) -> Result<(), AssumptionError> {
        let tiers = self.utilization.iter().zip(self.fill_cost.iter());
        for (idx, (&util, &cost)) in tiers.enumerate() {
            let tier = idx + 1;
            check_non_negative(&format!("t{}Utilization", tier), util)?;
            check_non_negative(&format!("t{}FillCost", tier), cost)?;
        }
        check_non_negative("estimatedAnnualFills", self.estimated_annual_fills)?;
        check_non_negative("rxDeductibleAllocation", self.rx_deductible_allocation)?;
        if self.rx_deductible_allocation > 1.0 {
            return Err(AssumptionError::invalid(
                "rxDeductibleAllocation",
                self.rx_deductible_allocation,
                "must be a fraction in [0, 1]",
            ));
        }
        Ok(())
    }
}

impl Default for ActuarialAssumptions {
    fn default() -> Self {
        PlanYearDefaults::default().assumptions
    }
}

/// Flat serde form of [`ActuarialAssumptions`]
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AssumptionsWire {
    t1_utilization: f64,
    t2_utilization: f64,
    t3_utilization: f64,
    t4_utilization: f64,
    t1_fill_cost: f64,
    t2_fill_cost: f64,
    t3_fill_cost: f64,
    t4_fill_cost: f64,
    estimated_annual_fills: f64,
    rx_deductible_allocation: f64,
}

impl From<AssumptionsWire> for ActuarialAssumptions {
    fn from(wire: AssumptionsWire) -> Self {
        Self {
            utilization: [
                wire.t1_utilization,
                wire.t2_utilization,
                wire.t3_utilization,
                wire.t4_utilization,
            ],
            fill_cost: [
                wire.t1_fill_cost,
                wire.t2_fill_cost,
                wire.t3_fill_cost,
                wire.t4_fill_cost,
            ],
            estimated_annual_fills: wire.estimated_annual_fills,
            rx_deductible_allocation: wire.rx_deductible_allocation,
        }
    }
}

impl From<ActuarialAssumptions> for AssumptionsWire {
    fn from(assumptions: ActuarialAssumptions) -> Self {
        let [t1_utilization, t2_utilization, t3_utilization, t4_utilization] =
            assumptions.utilization;
        let [t1_fill_cost, t2_fill_cost, t3_fill_cost, t4_fill_cost] = assumptions.fill_cost;
        Self {
            t1_utilization,
            t2_utilization,
            t3_utilization,
            t4_utilization,
            t1_fill_cost,
            t2_fill_cost,
            t3_fill_cost,
            t4_fill_cost,
            estimated_annual_fills: assumptions.estimated_annual_fills,
            rx_deductible_allocation: assumptions.rx_deductible_allocation,
        }
    }
}

fn check_non_negative(field: &str, value: f64) -> Result<(), AssumptionError> {
    if !value.is_finite() || value < 0.0 {
        return Err(AssumptionError::invalid(field, value, "must be a non-negative number"));
    }
    Ok(())
}
