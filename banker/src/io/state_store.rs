//! State file load/save helpers with schema + invariant validation.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use jsonschema::validator_for;
use serde_json::Value;
use tracing::debug;

use crate::core::state::{StateMatrices, SystemState};

/// Schema for state files, compiled into the binary.
pub const STATE_SCHEMA: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../schemas/state/v1.schema.json"
));

/// Load and validate a state file (schema + invariants).
///
/// `schema_path` overrides the embedded schema when given.
pub fn load_state(schema_path: Option<&Path>, state_path: &Path) -> Result<SystemState> {
    debug!(path = %state_path.display(), "loading state");
    let contents = fs::read_to_string(state_path)
        .with_context(|| format!("read state {}", state_path.display()))?;
    let schema = match schema_path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("read schema {}", path.display()))?,
        None => STATE_SCHEMA.to_string(),
    };
    parse_state(&contents, &schema).with_context(|| format!("load state {}", state_path.display()))
}

/// Parse a state document: JSON, then schema conformance, then invariants.
pub fn parse_state(contents: &str, schema: &str) -> Result<SystemState> {
    let value: Value = serde_json::from_str(contents).context("parse state json")?;
    let schema_value: Value = serde_json::from_str(schema).context("parse schema json")?;
    validate_schema(&schema_value, &value)?;
    let matrices: StateMatrices =
        serde_json::from_value(value).context("deserialize state matrices")?;
    let state = SystemState::from_matrices(matrices)
        .map_err(|errors| anyhow!("invariant violations:\n- {}", errors.join("\n- ")))?;
    debug!(
        processes = state.process_count(),
        resources = state.resource_count(),
        "state loaded"
    );
    Ok(state)
}

/// Write construction matrices as pretty JSON, atomically.
pub fn write_state_file(path: &Path, matrices: &StateMatrices) -> Result<()> {
    let mut buf = serde_json::to_string_pretty(matrices).context("serialize state json")?;
    buf.push('\n');
    super::write_atomic(path, &buf)
}

fn validate_schema(schema: &Value, instance: &Value) -> Result<()> {
    let compiled = validator_for(schema).map_err(|err| anyhow!("invalid schema: {}", err))?;
    if !compiled.is_valid(instance) {
        let messages = compiled
            .iter_errors(instance)
            .map(|err| err.to_string())
            .collect::<Vec<_>>();
        return Err(anyhow!(
            "state schema validation failed: {}",
            messages.join("; ")
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preset::{classic, classic_matrices};

    /// Writing the classic matrices and loading them back yields the classic
    /// state with derived `available` and `need`.
    #[test]
    fn write_then_load_classic() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("state.json");
        write_state_file(&path, &classic_matrices()).expect("write");

        let state = load_state(None, &path).expect("load");
        assert_eq!(state, classic());
    }

    #[test]
    fn negative_entries_fail_schema() {
        let raw = r#"{"total": [3], "max": [[-1]], "allocation": [[0]]}"#;
        let err = parse_state(raw, STATE_SCHEMA).expect_err("expected schema error");
        assert!(format!("{:#}", err).contains("schema validation failed"));
    }

    #[test]
    fn unknown_fields_fail_schema() {
        let raw = r#"{"total": [3], "max": [[1]], "allocation": [[0]], "available": [3]}"#;
        assert!(parse_state(raw, STATE_SCHEMA).is_err());
    }

    #[test]
    fn invariant_violations_are_listed() {
        let raw = r#"{"total": [3, 3], "max": [[4, 1]], "allocation": [[0, 2]]}"#;
        let err = parse_state(raw, STATE_SCHEMA).expect_err("expected invariant error");
        let message = format!("{:#}", err);
        assert!(message.contains("invariant violations"));
        assert!(message.contains("max 4 exceeds total 3"));
        assert!(message.contains("allocation 2 exceeds max 1"));
    }

    #[test]
    fn overflowing_allocation_total_is_rejected() {
        let raw = r#"{
            "total": [18446744073709551615],
            "max": [[18446744073709551615], [18446744073709551615]],
            "allocation": [[18446744073709551615], [1]]
        }"#;
        let err = parse_state(raw, STATE_SCHEMA).expect_err("expected invariant error");
        assert!(format!("{:#}", err).contains("R0: allocated sum overflows"));
    }

    #[test]
    fn missing_file_reports_path() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("nope.json");
        let err = load_state(None, &path).expect_err("expected error");
        assert!(format!("{:#}", err).contains("nope.json"));
    }
}
