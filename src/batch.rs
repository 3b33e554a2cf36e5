//! Batch runner for evaluating many plans
//!
//! Each plan is priced against the default table for its own plan year
//! unless the runner is pinned to one table. Evaluations run in parallel and
//! come back in input order.

use std::io::Write;

use rayon::prelude::*;
use serde::Serialize;

use crate::assumptions::{AssumptionOverrides, PlanYearDefaults};
use crate::evaluation::{DeterminationMethod, EvaluationResult, Evaluator};
use crate::plan::PlanInput;

/// A plan's identifier paired with its evaluation
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub plan_id: String,
    pub result: EvaluationResult,
}

/// Flat CSV row for a batch outcome
#[derive(Debug, Serialize)]
struct ResultRow<'a> {
    #[serde(rename = "planId")]
    plan_id: &'a str,
    #[serde(rename = "method")]
    method: &'a str,
    #[serde(rename = "result")]
    result: &'static str,
    #[serde(rename = "actuarialPercentage")]
    actuarial_percentage: f64,
    #[serde(rename = "isCreditable")]
    is_creditable: bool,
    #[serde(rename = "reasoning")]
    reasoning: &'a str,
}

/// Pre-configured runner for batch evaluations
#[derive(Debug, Clone, Default)]
pub struct BatchRunner {
    pinned: Option<PlanYearDefaults>,
}

impl BatchRunner {
    /// Create runner that resolves defaults from each plan's year
    pub fn new() -> Self {
        Self::default()
    }

    /// Create runner that prices every plan against one default table
    pub fn with_defaults(defaults: PlanYearDefaults) -> Self {
        Self {
            pinned: Some(defaults),
        }
    }

    /// Evaluator used for a plan
    pub fn evaluator_for(&self, plan: &PlanInput) -> Evaluator {
        match self.pinned {
            Some(defaults) => Evaluator::new(defaults),
            None => Evaluator::new(PlanYearDefaults::resolve(plan.year)),
        }
    }

    /// Evaluate a single plan
    pub fn run(
        &self,
        plan: &PlanInput,
        method: &DeterminationMethod,
        overrides: &AssumptionOverrides,
    ) -> EvaluationResult {
        self.evaluator_for(plan).evaluate(plan, method, overrides)
    }

    /// Evaluate every plan with the same method and overrides
    pub fn run_batch(
        &self,
        plans: &[(String, PlanInput)],
        method: &DeterminationMethod,
        overrides: &AssumptionOverrides,
    ) -> Vec<BatchOutcome> {
        plans
            .par_iter()
            .map(|(plan_id, plan)| BatchOutcome {
                plan_id: plan_id.clone(),
                result: self.run(plan, method, overrides),
            })
            .collect()
    }
}

/// Write batch outcomes as CSV
pub fn write_results_csv<W: Write>(
    writer: W,
    outcomes: &[BatchOutcome],
) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    for outcome in outcomes {
        csv_writer.serialize(ResultRow {
            plan_id: &outcome.plan_id,
            method: outcome.result.method.as_str(),
            result: outcome.result.result.as_str(),
            actuarial_percentage: outcome.result.actuarial_percentage,
            is_creditable: outcome.result.is_creditable,
            reasoning: &outcome.result.reasoning,
        })?;
    }

    csv_writer.flush()?;
    Ok(())
}
