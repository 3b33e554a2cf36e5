//! Evaluation history per plan
//!
//! A plan accumulates one record per evaluation. Records are never edited;
//! the most recent one is the determination shown on reports.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::HistoryError;
use crate::evaluation::EvaluationResult;

/// One persisted evaluation of a plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationRecord {
    pub plan_id: String,
    pub evaluated_at: DateTime<Utc>,
    pub result: EvaluationResult,
}

/// Append-only store of evaluation records
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvaluationHistory {
    records: Vec<EvaluationRecord>,
}

impl EvaluationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a result evaluated at `evaluated_at`
    pub fn record(
        &mut self,
        plan_id: impl Into<String>,
        result: EvaluationResult,
        evaluated_at: DateTime<Utc>,
    ) -> &EvaluationRecord {
        self.records.push(EvaluationRecord {
            plan_id: plan_id.into(),
            evaluated_at,
            result,
        });
        &self.records[self.records.len() - 1]
    }

    /// Append a result stamped with the current time
    pub fn record_now(
        &mut self,
        plan_id: impl Into<String>,
        result: EvaluationResult,
    ) -> &EvaluationRecord {
        self.record(plan_id, result, Utc::now())
    }

    /// Most recent record for a plan
    ///
    /// Records sharing a timestamp resolve to the one appended last.
    pub fn latest(&self, plan_id: &str) -> Option<&EvaluationRecord> {
        self.records
            .iter()
            .filter(|r| r.plan_id == plan_id)
            .fold(None, |best: Option<&EvaluationRecord>, record| match best {
                Some(b) if b.evaluated_at > record.evaluated_at => Some(b),
                _ => Some(record),
            })
    }

    /// All records for a plan in the order they were appended
    pub fn for_plan<'a>(
        &'a self,
        plan_id: &'a str,
    ) -> impl Iterator<Item = &'a EvaluationRecord> + 'a {
        self.records.iter().filter(move |r| r.plan_id == plan_id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Load a history file, returning an empty history if it does not exist
    pub fn load(path: &Path) -> Result<Self, HistoryError> {
        if !path.exists() {
            return Ok(Self::new());
        }
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), HistoryError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
