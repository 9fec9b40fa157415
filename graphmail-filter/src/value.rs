use chrono::{DateTime, NaiveDateTime, Utc};
use graphmail_model::ValueKind;
use std::fmt;

/// Literal on the right-hand side of a comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    String(String),
    Int(i64),
    Float(f64),
    Boolean(bool),
    /// Emitted as `YYYY-MM-DDTHH:MM:SS`, without a zone suffix.
    DateTime(NaiveDateTime),
}

impl FilterValue {
    /// Formats the literal for a property of `kind`.
    ///
    /// Numbers, booleans and structured dates are never quoted. Strings are
    /// quoted unless the property is numeric, boolean or temporal, in which
    /// case the caller's text is a raw token and passes through as is.
    pub(crate) fn format_for(&self, kind: ValueKind) -> String {
        match self {
            Self::String(s) => match kind {
                ValueKind::Number
                | ValueKind::Boolean
                | ValueKind::DateTime
                | ValueKind::DateTimeTimeZone => s.clone(),
                _ => quote(s),
            },
            other => other.to_string(),
        }
    }
}

/// Wraps `text` in single quotes, doubling embedded quotes.
pub(crate) fn quote(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S")),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for FilterValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u32> for FilterValue {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for FilterValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<NaiveDateTime> for FilterValue {
    fn from(value: NaiveDateTime) -> Self {
        Self::DateTime(value)
    }
}

impl From<DateTime<Utc>> for FilterValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::DateTime(value.naive_utc())
    }
}
