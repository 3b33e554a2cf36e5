//! Load plans from the flat CSV export used by the plan submission form

use super::{CostSharingType, PlanInput, PlanType, TierDesign};
use crate::error::PlanError;
use csv::Reader;
use std::path::Path;

/// Raw CSV row with one column per tier field
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "planId")]
    plan_id: String,
    #[serde(rename = "name", default)]
    name: String,
    #[serde(rename = "year")]
    year: u16,
    #[serde(rename = "type")]
    plan_type: String,
    #[serde(rename = "deductible")]
    deductible: f64,
    #[serde(rename = "moop")]
    moop: f64,
    #[serde(rename = "integratedDeductible")]
    integrated_deductible: bool,

    #[serde(rename = "t1CostSharingType")]
    t1_cost_sharing_type: String,
    #[serde(rename = "t1ShareValue")]
    t1_share_value: f64,
    #[serde(rename = "t1UsesDeductible")]
    t1_uses_deductible: bool,
    #[serde(rename = "t1CapValue")]
    t1_cap_value: Option<f64>,

    #[serde(rename = "t2CostSharingType")]
    t2_cost_sharing_type: String,
    #[serde(rename = "t2ShareValue")]
    t2_share_value: f64,
    #[serde(rename = "t2UsesDeductible")]
    t2_uses_deductible: bool,
    #[serde(rename = "t2CapValue")]
    t2_cap_value: Option<f64>,

    #[serde(rename = "t3CostSharingType")]
    t3_cost_sharing_type: String,
    #[serde(rename = "t3ShareValue")]
    t3_share_value: f64,
    #[serde(rename = "t3UsesDeductible")]
    t3_uses_deductible: bool,
    #[serde(rename = "t3CapValue")]
    t3_cap_value: Option<f64>,

    #[serde(rename = "t4CostSharingType")]
    t4_cost_sharing_type: String,
    #[serde(rename = "t4ShareValue")]
    t4_share_value: f64,
    #[serde(rename = "t4UsesDeductible")]
    t4_uses_deductible: bool,
    #[serde(rename = "t4CapValue")]
    t4_cap_value: Option<f64>,
}

fn parse_cost_sharing(field: &'static str, value: &str) -> Result<CostSharingType, PlanError> {
    match value {
        "COPAY" => Ok(CostSharingType::Copay),
        "COINSURANCE" => Ok(CostSharingType::Coinsurance),
        other => Err(PlanError::UnknownVariant {
            field,
            value: other.to_string(),
        }),
    }
}

fn tier(
    field: &'static str,
    cost_sharing_type: &str,
    share_value: f64,
    uses_deductible: bool,
    cap_value: Option<f64>,
) -> Result<TierDesign, PlanError> {
    Ok(TierDesign {
        cost_sharing_type: parse_cost_sharing(field, cost_sharing_type)?,
        share_value,
        uses_deductible,
        cap_value,
    })
}

impl CsvRow {
    fn to_plan(self) -> Result<(String, PlanInput), PlanError> {
        let plan_type = match self.plan_type.as_str() {
            "STANDARD" => PlanType::Standard,
            "HIGH_DEDUCTIBLE" => PlanType::HighDeductible,
            other => {
                return Err(PlanError::UnknownVariant {
                    field: "type",
                    value: other.to_string(),
                })
            }
        };

        let tiers = [
            tier(
                "t1CostSharingType",
                &self.t1_cost_sharing_type,
                self.t1_share_value,
                self.t1_uses_deductible,
                self.t1_cap_value,
            )?,
            tier(
                "t2CostSharingType",
                &self.t2_cost_sharing_type,
                self.t2_share_value,
                self.t2_uses_deductible,
                self.t2_cap_value,
            )?,
            tier(
                "t3CostSharingType",
                &self.t3_cost_sharing_type,
                self.t3_share_value,
                self.t3_uses_deductible,
                self.t3_cap_value,
            )?,
            tier(
                "t4CostSharingType",
                &self.t4_cost_sharing_type,
                self.t4_share_value,
                self.t4_uses_deductible,
                self.t4_cap_value,
            )?,
        ];

        let plan = PlanInput {
            name: self.name,
            year: self.year,
            plan_type,
            deductible: self.deductible,
            moop: self.moop,
            integrated_deductible: self.integrated_deductible,
            tiers,
        };
        plan.validate()?;

        Ok((self.plan_id, plan))
    }
}

/// Load all plans from a CSV file as `(plan_id, plan)` pairs
pub fn load_plans<P: AsRef<Path>>(path: P) -> Result<Vec<(String, PlanInput)>, PlanError> {
    let mut reader = Reader::from_path(path)?;
    let mut plans = Vec::new();

    for result in reader.deserialize() {
        let row: CsvRow = result?;
        plans.push(row.to_plan()?);
    }

    Ok(plans)
}

/// Load plans from any reader (e.g., string buffer, request body)
pub fn load_plans_from_reader<R: std::io::Read>(
    reader: R,
) -> Result<Vec<(String, PlanInput)>, PlanError> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut plans = Vec::new();

    for result in csv_reader.deserialize() {
        let row: CsvRow = result?;
        plans.push(row.to_plan()?);
    }

    Ok(plans)
}
