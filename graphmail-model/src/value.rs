use crate::schema::ValueKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An email participant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Recipient {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub address: String,
}

impl Recipient {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            name: None,
            address: address.into(),
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Content type of an item body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyType {
    #[default]
    Text,
    Html,
}

/// Body of a message or event.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemBody {
    pub content_type: BodyType,
    pub content: String,
}

impl ItemBody {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content_type: BodyType::Text,
            content: content.into(),
        }
    }

    pub fn html(content: impl Into<String>) -> Self {
        Self {
            content_type: BodyType::Html,
            content: content.into(),
        }
    }
}

/// A value stored in a property bag.
///
/// Each variant corresponds to one or more [`ValueKind`]s; [`fits`](Self::fits)
/// is the runtime check applied on every write. `Null` fits every kind and
/// clears the property on the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum PropertyValue {
    Null,
    String(String),
    Int(i64),
    Float(f64),
    Boolean(bool),
    DateTime(DateTime<Utc>),
    Recipient(Recipient),
    Recipients(Vec<Recipient>),
    Body(ItemBody),
    Strings(Vec<String>),
}

impl PropertyValue {
    /// Whether this value may be stored in a property of `kind`.
    #[must_use]
    pub fn fits(&self, kind: ValueKind) -> bool {
        match self {
            Self::Null => true,
            Self::String(_) => kind == ValueKind::String,
            Self::Int(_) | Self::Float(_) => kind == ValueKind::Number,
            Self::Boolean(_) => kind == ValueKind::Boolean,
            Self::DateTime(_) => {
                matches!(kind, ValueKind::DateTime | ValueKind::DateTimeTimeZone)
            }
            Self::Recipient(_) => kind == ValueKind::Recipient,
            Self::Recipients(_) => kind == ValueKind::RecipientCollection,
            Self::Body(_) => kind == ValueKind::Body,
            Self::Strings(_) => kind == ValueKind::StringCollection,
        }
    }

    /// Variant name, for error messages.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::String(_) => "string",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Boolean(_) => "boolean",
            Self::DateTime(_) => "date_time",
            Self::Recipient(_) => "recipient",
            Self::Recipients(_) => "recipients",
            Self::Body(_) => "body",
            Self::Strings(_) => "strings",
        }
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Numeric value; integers widen to `f64`.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(n) => Some(*n as f64),
            Self::Float(n) => Some(*n),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_date_time(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_recipient(&self) -> Option<&Recipient> {
        match self {
            Self::Recipient(r) => Some(r),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_recipients(&self) -> Option<&[Recipient]> {
        match self {
            Self::Recipients(r) => Some(r),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_body(&self) -> Option<&ItemBody> {
        match self {
            Self::Body(b) => Some(b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_strings(&self) -> Option<&[String]> {
        match self {
            Self::Strings(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for PropertyValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u32> for PropertyValue {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<DateTime<Utc>> for PropertyValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::DateTime(value)
    }
}

impl From<Recipient> for PropertyValue {
    fn from(value: Recipient) -> Self {
        Self::Recipient(value)
    }
}

impl From<Vec<Recipient>> for PropertyValue {
    fn from(value: Vec<Recipient>) -> Self {
        Self::Recipients(value)
    }
}

impl From<ItemBody> for PropertyValue {
    fn from(value: ItemBody) -> Self {
        Self::Body(value)
    }
}

impl From<Vec<String>> for PropertyValue {
    fn from(value: Vec<String>) -> Self {
        Self::Strings(value)
    }
}

impl<T: Into<PropertyValue>> From<Option<T>> for PropertyValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}
