//! Creditable Coverage CLI
//!
//! Command-line interface for evaluating plan designs

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use creditable_coverage::{
    assumptions::loader::load_overrides,
    batch::write_results_csv,
    plan::load_plans,
    AssumptionOverrides, BatchRunner, DeterminationMethod, EvaluationHistory, Evaluator,
    PlanInput, PlanYearDefaults,
};

#[derive(Debug, Parser)]
#[command(name = "creditable", version, about = "Medicare Part D creditable coverage evaluation")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Evaluate a single plan from a JSON file
    Evaluate {
        /// Plan design JSON
        #[arg(long)]
        plan: PathBuf,

        /// Determination method (ACTUARIAL or SIMPLIFIED)
        #[arg(long, default_value = "ACTUARIAL")]
        method: String,

        /// Assumption overrides (.json or field,value .csv)
        #[arg(long)]
        assumptions: Option<PathBuf>,

        /// Append the result to this history file
        #[arg(long, requires = "plan_id")]
        history: Option<PathBuf>,

        /// Plan identifier used in the history file
        #[arg(long)]
        plan_id: Option<String>,
    },

    /// Evaluate every plan in a CSV file
    Batch {
        /// Plans CSV
        #[arg(long)]
        plans: PathBuf,

        /// Output CSV for results
        #[arg(long, default_value = "evaluation_results.csv")]
        output: PathBuf,

        #[arg(long, default_value = "ACTUARIAL")]
        method: String,

        #[arg(long)]
        assumptions: Option<PathBuf>,
    },

    /// Print the default assumptions for a plan year
    Defaults {
        #[arg(long)]
        year: Option<u16>,
    },
}

fn read_overrides(path: Option<&Path>) -> Result<AssumptionOverrides> {
    let Some(path) = path else {
        return Ok(AssumptionOverrides::none());
    };
    load_overrides(path)
        .with_context(|| format!("Failed to load assumptions from {}", path.display()))
}

/// Catch out-of-range values before they reach the engine
fn check_overrides(overrides: &AssumptionOverrides, defaults: &PlanYearDefaults) -> Result<()> {
    overrides
        .apply_to(&defaults.assumptions)
        .validate()
        .with_context(|| format!("Invalid assumptions for plan year {}", defaults.plan_year))
}

fn evaluate(
    plan_path: &Path,
    method: &str,
    assumptions: Option<&Path>,
    history: Option<&Path>,
    plan_id: Option<&str>,
) -> Result<()> {
    let contents = fs::read_to_string(plan_path)
        .with_context(|| format!("Unable to read plan file {}", plan_path.display()))?;
    let plan: PlanInput = serde_json::from_str(&contents)
        .with_context(|| format!("Invalid plan JSON in {}", plan_path.display()))?;
    plan.validate().context("Plan failed validation")?;

    let overrides = read_overrides(assumptions)?;
    let defaults = PlanYearDefaults::resolve(plan.year);
    check_overrides(&overrides, &defaults)?;
    let evaluator = Evaluator::new(defaults);
    let method = DeterminationMethod::from(method);
    let result = evaluator.evaluate(&plan, &method, &overrides);

    println!("{}", serde_json::to_string_pretty(&result)?);

    if let (Some(history_path), Some(plan_id)) = (history, plan_id) {
        let mut history = EvaluationHistory::load(history_path)
            .with_context(|| format!("Unable to read history {}", history_path.display()))?;
        history.record_now(plan_id, result);
        history
            .save(history_path)
            .with_context(|| format!("Unable to write history {}", history_path.display()))?;

        if let Some(latest) = history.latest(plan_id) {
            log::info!(
                "{} evaluations recorded for {}; latest {} at {}",
                history.for_plan(plan_id).count(),
                plan_id,
                latest.result.result,
                latest.evaluated_at.to_rfc3339()
            );
        }
    }

    Ok(())
}

fn batch(
    plans_path: &Path,
    output: &Path,
    method: &str,
    assumptions: Option<&Path>,
) -> Result<()> {
    let plans = load_plans(plans_path)
        .with_context(|| format!("Failed to load plans from {}", plans_path.display()))?;
    log::info!("Loaded {} plans from {}", plans.len(), plans_path.display());

    let overrides = read_overrides(assumptions)?;
    for (plan_id, plan) in &plans {
        check_overrides(&overrides, &PlanYearDefaults::resolve(plan.year))
            .with_context(|| format!("Cannot evaluate plan {}", plan_id))?;
    }
    // Each plan is priced against its own plan-year table
    let runner = BatchRunner::new();
    let outcomes = runner.run_batch(&plans, &DeterminationMethod::from(method), &overrides);

    let creditable = outcomes.iter().filter(|o| o.result.is_creditable).count();
    let file = File::create(output)
        .with_context(|| format!("Unable to create {}", output.display()))?;
    write_results_csv(file, &outcomes).context("Failed to write results")?;

    println!(
        "Evaluated {} plans: {} creditable, {} not creditable",
        outcomes.len(),
        creditable,
        outcomes.len() - creditable
    );
    println!("Results written to: {}", output.display());
    Ok(())
}

fn defaults(year: Option<u16>) -> Result<()> {
    let defaults = match year {
        Some(year) => PlanYearDefaults::for_year(year)?,
        None => PlanYearDefaults::latest(),
    };
    println!("{}", serde_json::to_string_pretty(&defaults)?);
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Evaluate { plan, method, assumptions, history, plan_id } => evaluate(
            &plan,
            &method,
            assumptions.as_deref(),
            history.as_deref(),
            plan_id.as_deref(),
        ),
        Command::Batch { plans, output, method, assumptions } => {
            batch(&plans, &output, &method, assumptions.as_deref())
        }
        Command::Defaults { year } => defaults(year),
    }
}
