//! Assumption override loading
//!
//! Overrides come either from a two-column `field,value` CSV or from the flat
//! JSON object the web layer submits.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::AssumptionOverrides;
use crate::error::AssumptionError;

/// Load overrides from a `field,value` CSV file
pub fn load_overrides_csv(path: &Path) -> Result<AssumptionOverrides, AssumptionError> {
    let file = File::open(path)?;
    load_overrides_csv_from_reader(file)
}

/// Load overrides from any reader producing `field,value` CSV
///
/// The first row must be a header. A file whose first row already holds an
/// override is rejected rather than having that override silently dropped.
pub fn load_overrides_csv_from_reader<R: Read>(
    reader: R,
) -> Result<AssumptionOverrides, AssumptionError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = reader.headers()?;
    match headers.get(1) {
        Some(value_header) if value_header.parse::<f64>().is_err() => {}
        _ => return Err(AssumptionError::MissingHeader),
    }

    let mut overrides = AssumptionOverrides::none();
    for result in reader.records() {
        let record = result?;
        let line = record.position().map(|pos| pos.line()).unwrap_or_default();
        let (Some(field), Some(raw)) = (record.get(0), record.get(1)) else {
            return Err(AssumptionError::MalformedRow { line });
        };
        if field.is_empty() || raw.is_empty() {
            return Err(AssumptionError::MalformedRow { line });
        }
        let value: f64 = raw.parse().map_err(|source| AssumptionError::Parse {
            field: field.to_string(),
            source,
        })?;
        overrides.set(field, value)?;
    }

    Ok(overrides)
}

/// Load overrides from a JSON file
pub fn load_overrides_json(path: &Path) -> Result<AssumptionOverrides, AssumptionError> {
    let mut contents = String::new();
    File::open(path)?.read_to_string(&mut contents)?;
    AssumptionOverrides::from_json_str(&contents)
}

/// Load overrides from a file, choosing the format by extension
pub fn load_overrides(path: &Path) -> Result<AssumptionOverrides, AssumptionError> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => load_overrides_json(path),
        _ => load_overrides_csv(path),
    }
}

impl AssumptionOverrides {
    /// Parse the flat camelCase JSON object
    pub fn from_json_str(json: &str) -> Result<Self, AssumptionError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load overrides from a `field,value` CSV file
    pub fn from_csv_path(path: &Path) -> Result<Self, AssumptionError> {
        load_overrides_csv(path)
    }
}
