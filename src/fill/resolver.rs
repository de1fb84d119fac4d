use serde::Serialize;
use serde_json::Value;

use crate::data::lookup::StructuredLookup;
use crate::fill::seed::{Seed, SeedMode, classify, coerce};

/// Where a fill value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    SeedSimple,
    SeedLookup,
    Generated,
}

/// The string to apply to one control, with its origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FillDecision {
    pub value: String,
    pub provenance: Provenance,
}

impl FillDecision {
    pub fn generated(value: String) -> Self {
        Self {
            value,
            provenance: Provenance::Generated,
        }
    }
}

/// Resolves seed-derived values for controls.
///
/// The seed mode is fixed when the resolver is built and reused for every
/// control of the session. `None` from any method means "no seed value",
/// and the caller falls back to the generator.
pub struct ValueResolver<'a> {
    seed: &'a Seed,
    mode: SeedMode,
    lookup: &'a dyn StructuredLookup,
}

impl<'a> ValueResolver<'a> {
    pub fn new(seed: &'a Seed, lookup: &'a dyn StructuredLookup) -> Self {
        Self {
            seed,
            mode: classify(seed),
            lookup,
        }
    }

    pub fn mode(&self) -> SeedMode {
        self.mode
    }

    pub fn seed(&self) -> &Seed {
        self.seed
    }

    /// Value for a control identified by `key`.
    ///
    /// A simple seed ignores the key. A structured seed is looked up by key;
    /// without a key no lookup is attempted.
    pub fn resolve(&self, key: Option<&str>) -> Option<FillDecision> {
        match self.mode {
            SeedMode::Simple => Some(FillDecision {
                value: self.seed.to_fill_string(),
                provenance: Provenance::SeedSimple,
            }),
            SeedMode::Structured => {
                let value = self.lookup.lookup(self.seed, None, key?)?;
                Some(FillDecision {
                    value: self.coerce(&value),
                    provenance: Provenance::SeedLookup,
                })
            }
        }
    }

    /// Checked state for a checkbox from a `"true"`/`"false"` seed field
    /// (ASCII case-insensitive). Any other value is ignored.
    pub fn resolve_flag(&self, key: Option<&str>) -> Option<bool> {
        let value = self.lookup.lookup(self.seed, None, key?)?;
        let text = match &value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };

        if text.eq_ignore_ascii_case("true") {
            Some(true)
        } else if text.eq_ignore_ascii_case("false") {
            Some(false)
        } else {
            None
        }
    }

    pub fn coerce(&self, value: &Value) -> String {
        coerce(value, self.seed)
    }
}
