//! Creditable Coverage - Medicare Part D creditability engine for employer Rx plans
//!
//! This library provides:
//! - Four-tier plan designs with copay/coinsurance, deductible, and cap terms
//! - Plan-year default assumptions with caller overrides
//! - Actuarial value calculation with tier-ordered deductible draw-down
//! - Simplified and actuarial creditability determinations
//! - Evaluation history and batch evaluation

pub mod error;
pub mod plan;
pub mod assumptions;
pub mod evaluation;
pub mod history;
pub mod batch;

// Re-export commonly used types
pub use plan::{PlanInput, TierDesign, CostSharingType, PlanType};
pub use assumptions::{ActuarialAssumptions, AssumptionOverrides, PlanYearDefaults};
pub use evaluation::{
    evaluate_plan, Evaluator, EvaluationResult, DeterminationMethod, CreditabilityStatus,
};
pub use history::{EvaluationHistory, EvaluationRecord};
pub use batch::BatchRunner;
