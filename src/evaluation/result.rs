//! Evaluation output types

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::assumptions::ActuarialAssumptions;

/// Algorithm used to reach a determination
///
/// Parsing never fails: unrecognized names are kept as `Unsupported` so the
/// engine can answer them with an `UNKNOWN` result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DeterminationMethod {
    /// Average tier share heuristic
    Simplified,
    /// Expected plan-paid share of gross drug cost
    Actuarial,
    Unsupported(String),
}

impl DeterminationMethod {
    pub fn as_str(&self) -> &str {
        match self {
            DeterminationMethod::Simplified => "SIMPLIFIED",
            DeterminationMethod::Actuarial => "ACTUARIAL",
            DeterminationMethod::Unsupported(name) => name,
        }
    }
}

impl Default for DeterminationMethod {
    fn default() -> Self {
        DeterminationMethod::Actuarial
    }
}

impl From<&str> for DeterminationMethod {
    fn from(name: &str) -> Self {
        match name {
            "SIMPLIFIED" => DeterminationMethod::Simplified,
            "ACTUARIAL" => DeterminationMethod::Actuarial,
            other => DeterminationMethod::Unsupported(other.to_string()),
        }
    }
}

impl From<String> for DeterminationMethod {
    fn from(name: String) -> Self {
        DeterminationMethod::from(name.as_str())
    }
}

impl From<DeterminationMethod> for String {
    fn from(method: DeterminationMethod) -> Self {
        match method {
            DeterminationMethod::Unsupported(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for DeterminationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a creditability determination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CreditabilityStatus {
    Creditable,
    NonCreditable,
    Unknown,
}

impl CreditabilityStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CreditabilityStatus::Creditable => "CREDITABLE",
            CreditabilityStatus::NonCreditable => "NON_CREDITABLE",
            CreditabilityStatus::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for CreditabilityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one evaluation, persisted verbatim by callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResult {
    pub method: DeterminationMethod,
    pub result: CreditabilityStatus,

    /// Plan pays over gross cost (0 unless computed by the actuarial method)
    pub actuarial_percentage: f64,

    /// Merged assumptions the evaluation ran with
    pub actuarial_assumptions: ActuarialAssumptions,

    pub is_creditable: bool,
    pub reasoning: String,
}

impl EvaluationResult {
    pub(crate) fn new(
        method: DeterminationMethod,
        result: CreditabilityStatus,
        actuarial_percentage: f64,
        actuarial_assumptions: ActuarialAssumptions,
        reasoning: &str,
    ) -> Self {
        Self {
            method,
            is_creditable: result == CreditabilityStatus::Creditable,
            result,
            actuarial_percentage,
            actuarial_assumptions,
            reasoning: reasoning.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_round_trips_through_strings() {
        assert_eq!(DeterminationMethod::from("ACTUARIAL"), DeterminationMethod::Actuarial);
        assert_eq!(DeterminationMethod::from("SIMPLIFIED"), DeterminationMethod::Simplified);

        let bogus = DeterminationMethod::from("BOGUS");
        assert_eq!(bogus, DeterminationMethod::Unsupported("BOGUS".to_string()));
        assert_eq!(String::from(bogus), "BOGUS");
    }

    #[test]
    fn test_method_names_are_case_sensitive() {
        assert!(matches!(
            DeterminationMethod::from("actuarial"),
            DeterminationMethod::Unsupported(_)
        ));
    }

    #[test]
    fn test_result_serializes_camel_case() {
        let result = EvaluationResult::new(
            DeterminationMethod::Actuarial,
            CreditabilityStatus::NonCreditable,
            0.5,
            ActuarialAssumptions::default(),
            "below threshold",
        );

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["method"], "ACTUARIAL");
        assert_eq!(json["result"], "NON_CREDITABLE");
        assert_eq!(json["isCreditable"], false);
        assert_eq!(json["actuarialPercentage"], 0.5);
        assert_eq!(json["actuarialAssumptions"]["estimatedAnnualFills"], 42.0);

        let back: EvaluationResult = serde_json::from_value(json).unwrap();
        assert_eq!(back, result);
    }
}
