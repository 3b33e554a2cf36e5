//! Plan data structures matching the plan submission format

use serde::{Deserialize, Serialize};

use crate::assumptions::DEFAULT_PLAN_YEAR;
use crate::error::PlanError;

/// Number of drug tiers in a plan design
pub const TIER_COUNT: usize = 4;

const NON_NEGATIVE: &str = "must be a non-negative number";

fn default_plan_year() -> u16 {
    DEFAULT_PLAN_YEAR
}

/// How member cost is shared at a tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CostSharingType {
    /// Flat dollar amount per fill
    Copay,
    /// Fraction of the fill cost
    Coinsurance,
}

impl CostSharingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CostSharingType::Copay => "COPAY",
            CostSharingType::Coinsurance => "COINSURANCE",
        }
    }
}

/// Plan design category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlanType {
    #[default]
    Standard,
    HighDeductible,
}

impl PlanType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanType::Standard => "STANDARD",
            PlanType::HighDeductible => "HIGH_DEDUCTIBLE",
        }
    }
}

/// Cost-sharing design of a single drug tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierDesign {
    pub cost_sharing_type: CostSharingType,

    /// Dollar copay per fill, or coinsurance fraction in [0, 1]
    pub share_value: f64,

    /// Whether fills at this tier are first subject to the deductible
    pub uses_deductible: bool,

    /// Per-fill cap on coinsurance dollars (absent or <= 0 means uncapped)
    #[serde(default)]
    pub cap_value: Option<f64>,
}

impl TierDesign {
    pub fn copay(amount: f64, uses_deductible: bool) -> Self {
        Self {
            cost_sharing_type: CostSharingType::Copay,
            share_value: amount,
            uses_deductible,
            cap_value: None,
        }
    }

    pub fn coinsurance(rate: f64, uses_deductible: bool) -> Self {
        Self {
            cost_sharing_type: CostSharingType::Coinsurance,
            share_value: rate,
            uses_deductible,
            cap_value: None,
        }
    }

    /// Set a per-fill cap on coinsurance exposure
    pub fn with_cap(mut self, cap_value: f64) -> Self {
        self.cap_value = Some(cap_value);
        self
    }

    /// Cap on coinsurance dollars for `fills` fills, `None` when uncapped
    pub fn cap_limit(&self, fills: f64) -> Option<f64> {
        match self.cap_value {
            Some(cap) if cap > 0.0 => Some(fills * cap),
            _ => None,
        }
    }

    fn validate(&self, tier: usize) -> Result<(), PlanError> {
        let field = format!("t{}ShareValue", tier);
        if !self.share_value.is_finite() || self.share_value < 0.0 {
            return Err(PlanError::invalid(field, self.share_value, NON_NEGATIVE));
        }
        if self.cost_sharing_type == CostSharingType::Coinsurance && self.share_value > 1.0 {
            return Err(PlanError::invalid(
                field,
                self.share_value,
                "coinsurance must be a fraction in [0, 1]",
            ));
        }
        if let Some(cap) = self.cap_value {
            if !cap.is_finite() || cap < 0.0 {
                return Err(PlanError::invalid(format!("t{}CapValue", tier), cap, NON_NEGATIVE));
            }
        }
        Ok(())
    }
}

/// An employer prescription drug plan under test
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanInput {
    #[serde(default)]
    pub name: String,

    /// Plan year the design applies to
    #[serde(default = "default_plan_year")]
    pub year: u16,

    #[serde(rename = "type", default)]
    pub plan_type: PlanType,

    /// Annual deductible in dollars
    pub deductible: f64,

    /// Maximum out-of-pocket
    pub moop: f64,

    /// Whether the deductible is shared with medical benefits
    pub integrated_deductible: bool,

    /// Tiers 1 through 4, in order of increasing drug cost
    pub tiers: [TierDesign; TIER_COUNT],
}

impl PlanInput {
    /// Create a standard, non-integrated plan with the given tier designs
    pub fn new(deductible: f64, moop: f64, tiers: [TierDesign; TIER_COUNT]) -> Self {
        Self {
            name: String::new(),
            year: DEFAULT_PLAN_YEAR,
            plan_type: PlanType::Standard,
            deductible,
            moop,
            integrated_deductible: false,
            tiers,
        }
    }

    pub fn with_integrated_deductible(mut self, integrated: bool) -> Self {
        self.integrated_deductible = integrated;
        self
    }

    /// Tier design by 1-based tier number
    pub fn tier(&self, tier: usize) -> Option<&TierDesign> {
        tier.checked_sub(1).and_then(|idx| self.tiers.get(idx))
    }

    /// Tier designs paired with their 1-based tier numbers
    pub fn numbered_tiers(&self) -> impl Iterator<Item = (usize, &TierDesign)> {
        self.tiers.iter().enumerate().map(|(idx, tier)| (idx + 1, tier))
    }

    /// Check the caller contract for numeric fields
    pub fn validate(&self) -> Result<(), PlanError> {
        if !self.deductible.is_finite() || self.deductible < 0.0 {
            return Err(PlanError::invalid("deductible", self.deductible, NON_NEGATIVE));
        }
        if !self.moop.is_finite() || self.moop < 0.0 {
            return Err(PlanError::invalid("moop", self.moop, NON_NEGATIVE));
        }
        for (tier, design) in self.numbered_tiers() {
            design.validate(tier)?;
        }
        Ok(())
    }
}
