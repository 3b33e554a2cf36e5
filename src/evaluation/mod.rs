//! Creditable coverage evaluation: cost model and determination

mod cost;
mod engine;
mod result;

pub use cost::{
    effective_deductible, gross_cost, price_plan, tier_member_cost, CostBreakdown, TierCost,
};
pub use engine::{evaluate_plan, Evaluator, SIMPLIFIED_MAX_AVERAGE_SHARE};
pub use result::{CreditabilityStatus, DeterminationMethod, EvaluationResult};
