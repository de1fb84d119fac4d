use serde::{Deserialize, Serialize};

use crate::fill::seed::SeedMode;

// ============================================================================
// Fill report: final state of a filled form
// ============================================================================

/// Final state of one form control.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ControlState {
    /// Lower-case tag name
    pub tag: String,

    /// Input type for `<input>`, otherwise the tag
    pub kind: String,

    /// `id`, falling back to `name`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    /// Typed text, selected option value, or checked state
    pub value: String,
}

/// Report for one fill run.
///
/// Consumed by the console and JSON reporters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FillReport {
    /// Name of the filled form (fixture name or selector)
    pub form_name: String,

    /// How the seed was consulted
    pub seed_mode: String,

    /// Whether the form was submitted after filling
    pub submitted: bool,

    /// Total fill duration in milliseconds (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u128>,

    /// Control states in document order
    pub controls: Vec<ControlState>,
}

impl FillReport {
    pub fn new(form_name: &str, seed_mode: SeedMode, controls: Vec<ControlState>) -> Self {
        Self {
            form_name: form_name.to_string(),
            seed_mode: format!("{:?}", seed_mode),
            submitted: false,
            duration_ms: None,
            controls,
        }
    }

    pub fn with_submitted(mut self, submitted: bool) -> Self {
        self.submitted = submitted;
        self
    }

    /// Set the total fill duration.
    pub fn with_duration(mut self, duration_ms: u128) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    /// Controls that ended with a value (hidden and submit inputs excluded).
    pub fn filled_count(&self) -> usize {
        self.controls
            .iter()
            .filter(|c| !matches!(c.kind.as_str(), "hidden" | "submit"))
            .filter(|c| !c.value.is_empty() && !c.value.starts_with("unchecked"))
            .count()
    }
}
