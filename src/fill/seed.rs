use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;
use serde_json::Value;

/// US short date, e.g. `3/7/2024`.
pub const SHORT_DATE_FORMAT: &str = "%-m/%-d/%Y";

/// Data a fill session is seeded with.
///
/// Scalars (text, numbers, booleans, dates, enumeration members) are applied
/// uniformly to every control. Anything else is queried per control by key.
#[derive(Debug, Clone, PartialEq)]
pub enum Seed {
    Null,
    Text(String),
    Bool(bool),
    Int(i64),
    Float(f64),
    Date(NaiveDateTime),
    /// An enumeration member, coerced through its numeric discriminant.
    Enum { name: String, discriminant: i64 },
    Structured(Value),
}

/// How a seed is consulted during a fill session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedMode {
    /// One scalar for every control.
    Simple,
    /// Per-control lookup by key.
    Structured,
}

/// Decide once how a seed is consulted. `Null` is never simple: every key
/// misses, so every control falls through to generated data.
pub fn classify(seed: &Seed) -> SeedMode {
    match seed {
        Seed::Text(_)
        | Seed::Bool(_)
        | Seed::Int(_)
        | Seed::Float(_)
        | Seed::Date(_)
        | Seed::Enum { .. } => SeedMode::Simple,
        Seed::Null | Seed::Structured(_) => SeedMode::Structured,
    }
}

impl Seed {
    pub fn mode(&self) -> SeedMode {
        classify(self)
    }

    pub fn enumeration(name: &str, discriminant: i64) -> Self {
        Seed::Enum {
            name: name.to_string(),
            discriminant,
        }
    }

    /// Build a seed from any serializable model. Models that serialize to a
    /// scalar (newtypes, plain values) give a simple seed.
    pub fn from_model<T: Serialize>(model: &T) -> Result<Self, serde_json::Error> {
        Ok(Seed::from(serde_json::to_value(model)?))
    }

    /// String applied to controls when the seed is simple.
    pub fn to_fill_string(&self) -> String {
        match self {
            Seed::Null => String::new(),
            Seed::Text(s) => s.clone(),
            Seed::Bool(b) => b.to_string(),
            Seed::Int(i) => i.to_string(),
            Seed::Float(f) => f.to_string(),
            Seed::Date(d) => d.format(SHORT_DATE_FORMAT).to_string(),
            Seed::Enum { discriminant, .. } => discriminant.to_string(),
            Seed::Structured(v) => v.to_string(),
        }
    }
}

/// Convert a resolved value to the string applied to a control.
///
/// Strings pass through. Otherwise the *session seed* picks the format: a
/// date seed formats as a short date and an enumeration seed as its
/// discriminant, whatever the resolved value holds. Any other value uses its
/// own default rendering.
pub fn coerce(value: &Value, seed: &Seed) -> String {
    if let Value::String(s) = value {
        return s.clone();
    }

    match seed {
        Seed::Date(_) | Seed::Enum { .. } => seed.to_fill_string(),
        _ => render(value),
    }
}

fn render(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

impl From<&str> for Seed {
    fn from(s: &str) -> Self {
        Seed::Text(s.to_string())
    }
}

impl From<String> for Seed {
    fn from(s: String) -> Self {
        Seed::Text(s)
    }
}

impl From<bool> for Seed {
    fn from(b: bool) -> Self {
        Seed::Bool(b)
    }
}

impl From<i32> for Seed {
    fn from(i: i32) -> Self {
        Seed::Int(i64::from(i))
    }
}

impl From<i64> for Seed {
    fn from(i: i64) -> Self {
        Seed::Int(i)
    }
}

impl From<u32> for Seed {
    fn from(i: u32) -> Self {
        Seed::Int(i64::from(i))
    }
}

impl From<f64> for Seed {
    fn from(f: f64) -> Self {
        Seed::Float(f)
    }
}

impl From<NaiveDateTime> for Seed {
    fn from(d: NaiveDateTime) -> Self {
        Seed::Date(d)
    }
}

impl From<NaiveDate> for Seed {
    fn from(d: NaiveDate) -> Self {
        Seed::Date(d.and_time(NaiveTime::MIN))
    }
}

impl<T: Into<Seed>> From<Option<T>> for Seed {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Seed::Null)
    }
}

impl From<Value> for Seed {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Seed::Null,
            Value::String(s) => Seed::Text(s),
            Value::Bool(b) => Seed::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Seed::Int(i),
                None => Seed::Float(n.as_f64().unwrap_or_default()),
            },
            other @ (Value::Array(_) | Value::Object(_)) => Seed::Structured(other),
        }
    }
}
