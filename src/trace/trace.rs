use serde::Serialize;

use crate::fill::{control::ControlKind, resolver::Provenance, session::FillPhase};

/// One line of the JSONL fill trace.
#[derive(Debug, Serialize)]
pub struct FillEvent {
    pub timestamp_ms: i64,
    pub step: u64,

    pub phase: String,

    pub control: Option<String>,
    pub key: Option<String>,

    pub action: Option<String>,
    pub value: Option<String>,
    pub provenance: Option<Provenance>,
}

impl FillEvent {
    pub fn now(step: u64, phase: FillPhase) -> Self {
        Self {
            timestamp_ms: chrono::Utc::now().timestamp_millis(),
            step,
            phase: format!("{:?}", phase),
            control: None,
            key: None,
            action: None,
            value: None,
            provenance: None,
        }
    }

    pub fn with_control(mut self, kind: ControlKind, key: Option<&str>) -> Self {
        self.control = Some(format!("{:?}", kind));
        self.key = key.map(str::to_string);
        self
    }

    pub fn with_action(mut self, action: impl ToString) -> Self {
        self.action = Some(action.to_string());
        self
    }

    pub fn with_value(mut self, value: impl ToString) -> Self {
        self.value = Some(value.to_string());
        self
    }

    pub fn with_provenance(mut self, provenance: Provenance) -> Self {
        self.provenance = Some(provenance);
        self
    }
}
