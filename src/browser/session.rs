use std::io::{BufRead, BufReader, Write};
use std::process::{Child, Command, Stdio};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::browser::automation::{Automation, SelectOption};
use crate::browser::error::AutomationError;

/// Opaque handle to an element held by the browser server.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementHandle(pub String);

/// Request sent to the browser server over stdin (one JSON line).
#[derive(Debug, Serialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum BrowserRequest {
    Navigate { url: String },
    Find { selector: String },
    FindWithin { handle: ElementHandle, selector: String },
    TagName { handle: ElementHandle },
    Attribute { handle: ElementHandle, name: String },
    Clear { handle: ElementHandle },
    SendKeys { handle: ElementHandle, text: String },
    Click { handle: ElementHandle },
    IsSelected { handle: ElementHandle },
    Options { handle: ElementHandle },
    SelectByValue { handle: ElementHandle, value: String },
    SelectByText { handle: ElementHandle, text: String },
    Submit { handle: ElementHandle },
    Wait { duration_ms: u64 },
    Quit,
}

impl BrowserRequest {
    /// Command name used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            BrowserRequest::Navigate { .. } => "navigate",
            BrowserRequest::Find { .. } => "find",
            BrowserRequest::FindWithin { .. } => "find_within",
            BrowserRequest::TagName { .. } => "tag_name",
            BrowserRequest::Attribute { .. } => "attribute",
            BrowserRequest::Clear { .. } => "clear",
            BrowserRequest::SendKeys { .. } => "send_keys",
            BrowserRequest::Click { .. } => "click",
            BrowserRequest::IsSelected { .. } => "is_selected",
            BrowserRequest::Options { .. } => "options",
            BrowserRequest::SelectByValue { .. } => "select_by_value",
            BrowserRequest::SelectByText { .. } => "select_by_text",
            BrowserRequest::Submit { .. } => "submit",
            BrowserRequest::Wait { .. } => "wait",
            BrowserRequest::Quit => "quit",
        }
    }
}

/// Response received from the browser server over stdout (one JSON line).
#[derive(Debug, Default, Deserialize)]
pub struct BrowserResponse {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub error_kind: Option<String>,
    #[serde(default)]
    pub ready: Option<bool>,
    #[serde(default)]
    pub handles: Option<Vec<ElementHandle>>,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub selected: Option<bool>,
    #[serde(default)]
    pub options: Option<Vec<SelectOption>>,
}

impl BrowserResponse {
    /// Map a failed response onto the matching automation error.
    pub fn into_error(self, command: &str) -> AutomationError {
        let error = self.error.unwrap_or_else(|| "Unknown error".into());
        match self.error_kind.as_deref() {
            Some("stale") => AutomationError::StaleElement(error),
            Some("not_interactable") => AutomationError::NotInteractable(error),
            Some("no_such_element") => AutomationError::NoSuchElement(error),
            Some("invalid_selector") => AutomationError::InvalidSelector(error),
            _ => AutomationError::SessionProtocol {
                command: command.into(),
                error,
            },
        }
    }
}

/// A persistent browser session backed by a Node.js browser server.
///
/// Launches a long-lived process that keeps a browser open and holds element
/// references. Commands are sent as NDJSON over stdin, responses read from
/// stdout.
pub struct BrowserSession {
    child: Child,
    stdin: std::process::ChildStdin,
    reader: BufReader<std::process::ChildStdout>,
    current_url: Option<String>,
    closed: bool,
}

impl BrowserSession {
    /// Launch a new browser session by spawning `node <script>`.
    pub fn launch(script: &str) -> Result<Self, AutomationError> {
        let mut child = Command::new("node")
            .arg(script)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| AutomationError::SubprocessSpawn {
                script: script.into(),
                source: e,
            })?;

        let stdin = child.stdin.take().ok_or_else(|| {
            AutomationError::SessionIO(format!("Failed to capture stdin of {}", script))
        })?;

        let stdout = child.stdout.take().ok_or_else(|| {
            AutomationError::SessionIO(format!("Failed to capture stdout of {}", script))
        })?;

        let mut reader = BufReader::new(stdout);

        // Wait for the ready signal
        let mut line = String::new();
        reader.read_line(&mut line).map_err(|e| {
            AutomationError::SessionIO(format!("Failed to read ready signal: {}", e))
        })?;

        let response: BrowserResponse = serde_json::from_str(line.trim()).map_err(|e| {
            AutomationError::JsonParse {
                context: "browser server ready signal".into(),
                source: e,
            }
        })?;

        if !response.ok || response.ready != Some(true) {
            return Err(AutomationError::SessionProtocol {
                command: "launch".into(),
                error: format!("Did not receive ready signal from {}", script),
            });
        }

        Ok(BrowserSession {
            child,
            stdin,
            reader,
            current_url: None,
            closed: false,
        })
    }

    /// Send a request and read the response.
    fn send(&mut self, request: &BrowserRequest) -> Result<BrowserResponse, AutomationError> {
        let json = serde_json::to_string(request).map_err(|e| AutomationError::JsonSerialize {
            context: "BrowserRequest".into(),
            source: e,
        })?;

        debug!("browser <- {}", json);

        writeln!(self.stdin, "{}", json).map_err(|e| {
            AutomationError::SessionIO(format!("Failed to write to browser server stdin: {}", e))
        })?;

        self.stdin.flush().map_err(|e| {
            AutomationError::SessionIO(format!("Failed to flush browser server stdin: {}", e))
        })?;

        let mut line = String::new();
        self.reader.read_line(&mut line).map_err(|e| {
            AutomationError::SessionIO(format!("Failed to read from browser server stdout: {}", e))
        })?;

        if line.trim().is_empty() {
            return Err(AutomationError::SessionIO(
                "Empty response from browser server (process may have died)".into(),
            ));
        }

        serde_json::from_str(line.trim()).map_err(|e| AutomationError::JsonParse {
            context: "browser server response".into(),
            source: e,
        })
    }

    /// Send a request and verify it succeeded.
    fn send_ok(&mut self, request: &BrowserRequest) -> Result<BrowserResponse, AutomationError> {
        let response = self.send(request)?;
        if !response.ok {
            return Err(response.into_error(request.name()));
        }
        Ok(response)
    }

    fn missing(command: &str, field: &str) -> AutomationError {
        AutomationError::SessionProtocol {
            command: command.into(),
            error: format!("No {} in {} response", field, command),
        }
    }

    /// Navigate to a URL.
    pub fn navigate(&mut self, url: &str) -> Result<(), AutomationError> {
        self.send_ok(&BrowserRequest::Navigate { url: url.to_string() })?;
        self.current_url = Some(url.to_string());
        Ok(())
    }

    /// Wait for the page to settle.
    pub fn wait_idle(&mut self, ms: u64) -> Result<(), AutomationError> {
        self.send_ok(&BrowserRequest::Wait { duration_ms: ms })?;
        Ok(())
    }

    /// Get the last navigated URL (cached, no browser call).
    pub fn last_url(&self) -> Option<&str> {
        self.current_url.as_deref()
    }

    /// Quit the browser session.
    pub fn quit(&mut self) -> Result<(), AutomationError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        // Best-effort quit: the process may already be gone
        let _ = self.send(&BrowserRequest::Quit);
        let _ = self.child.wait();
        Ok(())
    }

    fn handles(&mut self, request: BrowserRequest) -> Result<Vec<ElementHandle>, AutomationError> {
        let command = request.name();
        self.send_ok(&request)?
            .handles
            .ok_or_else(|| Self::missing(command, "handles"))
    }

    fn unit(&mut self, request: BrowserRequest) -> Result<(), AutomationError> {
        self.send_ok(&request)?;
        Ok(())
    }
}

impl Automation for BrowserSession {
    type Element = ElementHandle;

    fn find_all(&mut self, selector: &str) -> Result<Vec<ElementHandle>, AutomationError> {
        self.handles(BrowserRequest::Find {
            selector: selector.to_string(),
        })
    }

    fn find_descendants(
        &mut self,
        root: &ElementHandle,
        selector: &str,
    ) -> Result<Vec<ElementHandle>, AutomationError> {
        self.handles(BrowserRequest::FindWithin {
            handle: root.clone(),
            selector: selector.to_string(),
        })
    }

    fn tag_name(&mut self, element: &ElementHandle) -> Result<String, AutomationError> {
        let response = self.send_ok(&BrowserRequest::TagName {
            handle: element.clone(),
        })?;
        response
            .value
            .map(|t| t.to_lowercase())
            .ok_or_else(|| Self::missing("tag_name", "value"))
    }

    fn attribute(
        &mut self,
        element: &ElementHandle,
        name: &str,
    ) -> Result<Option<String>, AutomationError> {
        let response = self.send_ok(&BrowserRequest::Attribute {
            handle: element.clone(),
            name: name.to_string(),
        })?;
        Ok(response.value)
    }

    fn clear(&mut self, element: &ElementHandle) -> Result<(), AutomationError> {
        self.unit(BrowserRequest::Clear {
            handle: element.clone(),
        })
    }

    fn send_keys(&mut self, element: &ElementHandle, text: &str) -> Result<(), AutomationError> {
        self.unit(BrowserRequest::SendKeys {
            handle: element.clone(),
            text: text.to_string(),
        })
    }

    fn click(&mut self, element: &ElementHandle) -> Result<(), AutomationError> {
        self.unit(BrowserRequest::Click {
            handle: element.clone(),
        })
    }

    fn is_selected(&mut self, element: &ElementHandle) -> Result<bool, AutomationError> {
        let response = self.send_ok(&BrowserRequest::IsSelected {
            handle: element.clone(),
        })?;
        response
            .selected
            .ok_or_else(|| Self::missing("is_selected", "selected"))
    }

    fn options(&mut self, element: &ElementHandle) -> Result<Vec<SelectOption>, AutomationError> {
        let response = self.send_ok(&BrowserRequest::Options {
            handle: element.clone(),
        })?;
        response
            .options
            .ok_or_else(|| Self::missing("options", "options"))
    }

    fn select_by_value(&mut self, element: &ElementHandle, value: &str) -> Result<(), AutomationError> {
        self.unit(BrowserRequest::SelectByValue {
            handle: element.clone(),
            value: value.to_string(),
        })
    }

    fn select_by_text(&mut self, element: &ElementHandle, text: &str) -> Result<(), AutomationError> {
        self.unit(BrowserRequest::SelectByText {
            handle: element.clone(),
            text: text.to_string(),
        })
    }

    fn submit(&mut self, element: &ElementHandle) -> Result<(), AutomationError> {
        self.unit(BrowserRequest::Submit {
            handle: element.clone(),
        })
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        // Best-effort cleanup
        let _ = self.quit();
    }
}
