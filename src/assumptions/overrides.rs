//! Partial assumption sets supplied by callers

use serde::{Deserialize, Serialize};

use super::ActuarialAssumptions;
use crate::error::AssumptionError;

/// Caller-supplied assumption fields, each optional
///
/// Merged over a default table with a shallow override: any present value
/// (including zero) replaces the default, absent values keep it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssumptionOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub t1_utilization: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub t2_utilization: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub t3_utilization: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub t4_utilization: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub t1_fill_cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub t2_fill_cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub t3_fill_cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub t4_fill_cost: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_annual_fills: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rx_deductible_allocation: Option<f64>,
}

impl AssumptionOverrides {
    /// No overrides; every field falls back to the defaults
    pub fn none() -> Self {
        Self::default()
    }

    /// True when no field is set
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Set a field by its wire name (e.g. `t2FillCost`)
    pub fn set(&mut self, field: &str, value: f64) -> Result<(), AssumptionError> {
        let slot = match field {
            "t1Utilization" => &mut self.t1_utilization,
            "t2Utilization" => &mut self.t2_utilization,
            "t3Utilization" => &mut self.t3_utilization,
            "t4Utilization" => &mut self.t4_utilization,
            "t1FillCost" => &mut self.t1_fill_cost,
            "t2FillCost" => &mut self.t2_fill_cost,
            "t3FillCost" => &mut self.t3_fill_cost,
            "t4FillCost" => &mut self.t4_fill_cost,
            "estimatedAnnualFills" => &mut self.estimated_annual_fills,
            "rxDeductibleAllocation" => &mut self.rx_deductible_allocation,
            other => return Err(AssumptionError::UnknownField(other.to_string())),
        };
        *slot = Some(value);
        Ok(())
    }

    /// Merge these overrides over `defaults`
    pub fn apply_to(&self, defaults: &ActuarialAssumptions) -> ActuarialAssumptions {
        let [u1, u2, u3, u4] = defaults.utilization;
        let [c1, c2, c3, c4] = defaults.fill_cost;

        ActuarialAssumptions {
            utilization: [
                self.t1_utilization.unwrap_or(u1),
                self.t2_utilization.unwrap_or(u2),
                self.t3_utilization.unwrap_or(u3),
                self.t4_utilization.unwrap_or(u4),
            ],
            fill_cost: [
                self.t1_fill_cost.unwrap_or(c1),
                self.t2_fill_cost.unwrap_or(c2),
                self.t3_fill_cost.unwrap_or(c3),
                self.t4_fill_cost.unwrap_or(c4),
            ],
            estimated_annual_fills: self
                .estimated_annual_fills
                .unwrap_or(defaults.estimated_annual_fills),
            rx_deductible_allocation: self
                .rx_deductible_allocation
                .unwrap_or(defaults.rx_deductible_allocation),
        }
    }
}

impl From<&ActuarialAssumptions> for AssumptionOverrides {
    /// Pin every field, e.g. to replay a persisted evaluation
    fn from(assumptions: &ActuarialAssumptions) -> Self {
        let [u1, u2, u3, u4] = assumptions.utilization;
        let [c1, c2, c3, c4] = assumptions.fill_cost;
        Self {
            t1_utilization: Some(u1),
            t2_utilization: Some(u2),
            t3_utilization: Some(u3),
            t4_utilization: Some(u4),
            t1_fill_cost: Some(c1),
            t2_fill_cost: Some(c2),
            t3_fill_cost: Some(c3),
            t4_fill_cost: Some(c4),
            estimated_annual_fills: Some(assumptions.estimated_annual_fills),
            rx_deductible_allocation: Some(assumptions.rx_deductible_allocation),
        }
    }
}
