//! AWS Lambda handler for freestanding plan evaluations
//!
//! Accepts a plan design, an optional method, and optional assumption
//! overrides as JSON and returns the evaluation result. Nothing is persisted.
//!
//! Supports Lambda Function URLs for direct HTTP access.

use aws_lambda_events::event::lambda_function_urls::LambdaFunctionUrlRequest;
use creditable_coverage::{
    AssumptionOverrides, DeterminationMethod, Evaluator, PlanInput, PlanYearDefaults,
};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde::Deserialize;
use serde_json::{json, Value};

/// Input for an evaluation
#[derive(Debug, Deserialize)]
pub struct EvaluationRequest {
    /// Plan design under test
    #[serde(default)]
    pub plan: Option<PlanInput>,

    /// Determination method (default: ACTUARIAL)
    #[serde(default)]
    pub method: Option<String>,

    /// Partial assumption set merged over the plan-year defaults
    #[serde(default)]
    pub assumptions: AssumptionOverrides,
}

fn cors_headers() -> Value {
    json!({
        "Content-Type": "application/json",
        "Access-Control-Allow-Origin": "*",
        "Access-Control-Allow-Methods": "POST, OPTIONS",
        "Access-Control-Allow-Headers": "Content-Type",
    })
}

fn response(status: u16, body: &Value) -> Value {
    json!({
        "statusCode": status,
        "headers": cors_headers(),
        "body": body.to_string(),
    })
}

fn error_response(status: u16, message: &str) -> Value {
    response(status, &json!({ "message": message }))
}

/// Build the HTTP response for a request method and body
fn respond(http_method: Option<&str>, body: Option<&str>) -> Value {
    // Handle CORS preflight
    if http_method == Some("OPTIONS") {
        return json!({ "statusCode": 200, "headers": cors_headers() });
    }

    let request: EvaluationRequest = match serde_json::from_str(body.unwrap_or("{}")) {
        Ok(r) => r,
        Err(e) => return error_response(400, &format!("Invalid JSON: {}", e)),
    };

    let Some(plan) = request.plan else {
        return error_response(400, "Missing plan input");
    };

    if let Err(e) = plan.validate() {
        return error_response(422, &e.to_string());
    }

    let method = request
        .method
        .as_deref()
        .map(DeterminationMethod::from)
        .unwrap_or_default();

    let defaults = PlanYearDefaults::resolve(plan.year);
    if let Err(e) = request.assumptions.apply_to(&defaults.assumptions).validate() {
        return error_response(422, &e.to_string());
    }

    let evaluator = Evaluator::new(defaults);
    let result = evaluator.evaluate(&plan, &method, &request.assumptions);
    log::info!("evaluated plan '{}' with {}: {}", plan.name, result.method, result.result);

    match serde_json::to_value(&result) {
        Ok(body) => response(200, &body),
        Err(e) => error_response(500, &format!("Failed to encode result: {}", e)),
    }
}

/// Lambda handler function
async fn handler(event: LambdaEvent<LambdaFunctionUrlRequest>) -> Result<Value, Error> {
    let request = event.payload;

    if request.is_base64_encoded {
        return Ok(error_response(400, "Binary request bodies are not supported"));
    }

    Ok(respond(
        request.request_context.http.method.as_deref(),
        request.body.as_deref(),
    ))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}
