//! Creditability evaluation engine

use crate::assumptions::{ActuarialAssumptions, AssumptionOverrides, PlanYearDefaults};
use crate::error::AssumptionError;
use crate::plan::{PlanInput, TIER_COUNT};
use super::cost::{price_plan, CostBreakdown};
use super::result::{CreditabilityStatus, DeterminationMethod, EvaluationResult};

/// Highest average tier share the simplified method accepts (inclusive)
pub const SIMPLIFIED_MAX_AVERAGE_SHARE: f64 = 40.0;

const ACTUARIAL_CREDITABLE: &str = concat!(
    "Plan is expected to pay a share of prescription drug costs that meets ",
    "the CMS actuarial value threshold for creditable coverage."
);
const ACTUARIAL_NON_CREDITABLE: &str = concat!(
    "Plan is expected to pay a share of prescription drug costs below ",
    "the CMS actuarial value threshold for creditable coverage."
);
const ACTUARIAL_NOT_COMPUTABLE: &str = concat!(
    "Actuarial value cannot be computed because the expected gross drug cost is zero; ",
    "the plan cannot be shown to be creditable."
);
const ACTUARIAL_NOT_FINITE: &str = concat!(
    "Actuarial value is not a finite number under these assumptions; ",
    "the plan cannot be shown to be creditable."
);
const SIMPLIFIED_CREDITABLE: &str =
    "Based on average tier share, the plan is likely actuarially equivalent or better.";
const SIMPLIFIED_NON_CREDITABLE: &str =
    "Average tier share exceeds the simplified creditability limit.";
const UNSUPPORTED_METHOD: &str = "Unsupported evaluation method";

/// Evaluates plan designs against one plan year's default assumptions
///
/// Holds no mutable state; a single evaluator can serve any number of
/// concurrent callers.
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    defaults: PlanYearDefaults,
}

impl Evaluator {
    /// Create an evaluator with an explicit default table
    pub fn new(defaults: PlanYearDefaults) -> Self {
        Self { defaults }
    }

    /// Create an evaluator with the published defaults for a plan year
    pub fn for_plan_year(plan_year: u16) -> Result<Self, AssumptionError> {
        Ok(Self::new(PlanYearDefaults::for_year(plan_year)?))
    }

    pub fn defaults(&self) -> &PlanYearDefaults {
        &self.defaults
    }

    /// Merge caller overrides over this evaluator's defaults
    pub fn resolve_assumptions(&self, overrides: &AssumptionOverrides) -> ActuarialAssumptions {
        overrides.apply_to(&self.defaults.assumptions)
    }

    /// Expected cost breakdown for a plan under merged assumptions
    pub fn price(&self, plan: &PlanInput, overrides: &AssumptionOverrides) -> CostBreakdown {
        price_plan(plan, &self.resolve_assumptions(overrides))
    }

    /// Determine creditability of a plan
    ///
    /// Never fails: an unsupported method yields `UNKNOWN`. A zero gross cost
    /// or an actuarial value that is not finite yields `NON_CREDITABLE`.
    pub fn evaluate(
        &self,
        plan: &PlanInput,
        method: &DeterminationMethod,
        overrides: &AssumptionOverrides,
    ) -> EvaluationResult {
        let assumptions = self.resolve_assumptions(overrides);
        log::debug!(
            "evaluating plan '{}' ({}) with assumptions {:?}",
            plan.name,
            method,
            assumptions
        );

        let total_utilization = assumptions.utilization_total();
        if (total_utilization - 1.0).abs() > 1e-9 {
            log::debug!("tier utilizations sum to {} rather than 1", total_utilization);
        }

        match method {
            DeterminationMethod::Actuarial => self.evaluate_actuarial(plan, assumptions),
            DeterminationMethod::Simplified => evaluate_simplified(plan, assumptions),
            DeterminationMethod::Unsupported(name) => {
                log::warn!("unsupported evaluation method: {}", name);
                EvaluationResult::new(
                    method.clone(),
                    CreditabilityStatus::Unknown,
                    0.0,
                    assumptions,
                    UNSUPPORTED_METHOD,
                )
            }
        }
    }

    fn evaluate_actuarial(
        &self,
        plan: &PlanInput,
        assumptions: ActuarialAssumptions,
    ) -> EvaluationResult {
        let breakdown = price_plan(plan, &assumptions);
        log::debug!(
            "gross cost {:.2}, member cost {:.2}, plan pays {:.2}",
            breakdown.gross_cost,
            breakdown.total_member_cost,
            breakdown.plan_pays
        );

        let Some(actuarial_value) = breakdown.actuarial_value() else {
            let gross_is_usable = breakdown.gross_cost.is_finite() && breakdown.gross_cost > 0.0;
            let reasoning = if gross_is_usable {
                ACTUARIAL_NOT_FINITE
            } else {
                ACTUARIAL_NOT_COMPUTABLE
            };
            log::warn!(
                "gross cost {}, plan pays {} for plan '{}'; actuarial value is undefined",
                breakdown.gross_cost,
                breakdown.plan_pays,
                plan.name
            );
            return EvaluationResult::new(
                DeterminationMethod::Actuarial,
                CreditabilityStatus::NonCreditable,
                0.0,
                assumptions,
                reasoning,
            );
        };

        let (status, reasoning) = if actuarial_value >= self.defaults.cms.av_threshold {
            (CreditabilityStatus::Creditable, ACTUARIAL_CREDITABLE)
        } else {
            (CreditabilityStatus::NonCreditable, ACTUARIAL_NON_CREDITABLE)
        };

        EvaluationResult::new(
            DeterminationMethod::Actuarial,
            status,
            actuarial_value,
            assumptions,
            reasoning,
        )
    }
}

fn evaluate_simplified(plan: &PlanInput, assumptions: ActuarialAssumptions) -> EvaluationResult {
    let average_share = plan.tiers.iter().map(|t| t.share_value).sum::<f64>() / TIER_COUNT as f64;

    let (status, reasoning) = if average_share <= SIMPLIFIED_MAX_AVERAGE_SHARE {
        (CreditabilityStatus::Creditable, SIMPLIFIED_CREDITABLE)
    } else {
        (CreditabilityStatus::NonCreditable, SIMPLIFIED_NON_CREDITABLE)
    };

    EvaluationResult::new(DeterminationMethod::Simplified, status, 0.0, assumptions, reasoning)
}

/// Evaluate a plan against the default plan-year table
pub fn evaluate_plan(
    plan: &PlanInput,
    method: &DeterminationMethod,
    overrides: &AssumptionOverrides,
) -> EvaluationResult {
    Evaluator::default().evaluate(plan, method, overrides)
}
