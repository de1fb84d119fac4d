use thiserror::Error;

/// Failures raised by an automation backend.
///
/// The fill engine never catches or retries these; they abort the session
/// and surface unchanged to the caller.
#[derive(Debug, Error)]
pub enum AutomationError {
    /// Node.js subprocess failed to spawn (browser server script)
    #[error("Failed to spawn {script} (is Node.js installed?): {source}")]
    SubprocessSpawn {
        script: String,
        #[source]
        source: std::io::Error,
    },

    /// Reading from or writing to the session subprocess failed
    #[error("Session I/O error: {0}")]
    SessionIO(String),

    /// The browser server answered with an error or an unexpected payload
    #[error("Browser command '{command}' failed: {error}")]
    SessionProtocol { command: String, error: String },

    /// JSON parsing failed (from subprocess output)
    #[error("JSON parse error ({context}): {source}")]
    JsonParse {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// JSON serialization failed (command to the browser server)
    #[error("JSON serialize error ({context}): {source}")]
    JsonSerialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The element handle no longer refers to a live node
    #[error("Stale element: {0}")]
    StaleElement(String),

    /// The element exists but cannot receive the requested interaction
    #[error("Element not interactable: {0}")]
    NotInteractable(String),

    /// No element matched the request
    #[error("No such element: {0}")]
    NoSuchElement(String),

    /// Selector could not be parsed by the backend
    #[error("Invalid selector '{0}'")]
    InvalidSelector(String),
}
