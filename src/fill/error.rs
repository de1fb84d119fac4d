use thiserror::Error;

use crate::browser::error::AutomationError;

/// Errors that abort a fill session.
///
/// A field missing from the seed is not an error; it only selects the
/// generated fallback.
#[derive(Debug, Error)]
pub enum FillError {
    /// Nothing to fill: empty element collection or a selector that matched
    /// nothing. Raised before any interaction with the page.
    #[error("no elements to fill{}", selector.as_ref().map(|s| format!(" (selector '{}' matched nothing)", s)).unwrap_or_default())]
    NoElements { selector: Option<String> },

    /// Failure from the automation layer, passed through unchanged.
    #[error(transparent)]
    Automation(#[from] AutomationError),

    /// A typed model could not be turned into a structured seed.
    #[error("seed model serialization failed: {0}")]
    Seed(#[from] serde_json::Error),
}
