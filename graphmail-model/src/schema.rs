use crate::error::{ModelError, ModelResult};
use graphmail_types::EntityKind;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt;

/// Declared value type of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    String,
    Number,
    Boolean,
    /// Instant in time, serialized as an RFC 3339 string.
    DateTime,
    /// Wall-clock time paired with a time zone name (calendar start/end).
    DateTimeTimeZone,
    Recipient,
    RecipientCollection,
    Body,
    StringCollection,
}

impl ValueKind {
    /// Whether values of this kind hold a list.
    #[must_use]
    pub const fn is_collection(self) -> bool {
        matches!(self, Self::RecipientCollection | Self::StringCollection)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::DateTime => "date_time",
            Self::DateTimeTimeZone => "date_time_time_zone",
            Self::Recipient => "recipient",
            Self::RecipientCollection => "recipient_collection",
            Self::Body => "body",
            Self::StringCollection => "string_collection",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single named, typed property of an entity type.
///
/// Definitions are immutable. Within a schema a definition is identified
/// by its name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PropertyDefinition {
    name: Cow<'static, str>,
    value_kind: ValueKind,
    is_relational: bool,
}

impl PropertyDefinition {
    const fn simple(name: &'static str, value_kind: ValueKind, is_relational: bool) -> Self {
        Self {
            name: Cow::Borrowed(name),
            value_kind,
            is_relational,
        }
    }

    /// Builds a definition with a runtime-owned name.
    pub fn new(name: impl Into<String>, value_kind: ValueKind, is_relational: bool) -> Self {
        Self {
            name: Cow::Owned(name.into()),
            value_kind,
            is_relational,
        }
    }

    /// Shorthand for a plain string property.
    pub const fn string(name: &'static str) -> Self {
        Self::simple(name, ValueKind::String, false)
    }

    /// Shorthand for a numeric property.
    pub const fn number(name: &'static str) -> Self {
        Self::simple(name, ValueKind::Number, false)
    }

    /// Shorthand for a boolean property.
    pub const fn boolean(name: &'static str) -> Self {
        Self::simple(name, ValueKind::Boolean, false)
    }

    /// Shorthand for an instant-in-time property.
    pub const fn date_time(name: &'static str) -> Self {
        Self::simple(name, ValueKind::DateTime, false)
    }

    /// Shorthand for a zoned wall-clock property.
    pub const fn date_time_time_zone(name: &'static str) -> Self {
        Self::simple(name, ValueKind::DateTimeTimeZone, false)
    }

    /// Shorthand for a single email participant. Always relational.
    pub const fn recipient(name: &'static str) -> Self {
        Self::simple(name, ValueKind::Recipient, true)
    }

    /// Shorthand for a list of email participants. Always relational.
    pub const fn recipients(name: &'static str) -> Self {
        Self::simple(name, ValueKind::RecipientCollection, true)
    }

    /// Shorthand for an item body (content plus content type).
    pub const fn body(name: &'static str) -> Self {
        Self::simple(name, ValueKind::Body, false)
    }

    /// Shorthand for a list of strings (e.g. categories).
    pub const fn strings(name: &'static str) -> Self {
        Self::simple(name, ValueKind::StringCollection, false)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn value_kind(&self) -> ValueKind {
        self.value_kind
    }

    /// Whether the property links to another identity (an email participant).
    #[must_use]
    pub const fn is_relational(&self) -> bool {
        self.is_relational
    }
}

impl fmt::Display for PropertyDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Ordered set of property definitions for one entity type.
///
/// One schema exists per [`EntityKind`] and is shared read-only by every
/// instance of that kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectSchema {
    entity_kind: EntityKind,
    properties: Vec<PropertyDefinition>,
}

impl ObjectSchema {
    /// Builds a schema, rejecting duplicate property names.
    pub fn new(entity_kind: EntityKind, properties: Vec<PropertyDefinition>) -> ModelResult<Self> {
        let mut seen = HashSet::with_capacity(properties.len());
        for property in &properties {
            if !seen.insert(property.name()) {
                return Err(ModelError::InvalidArgument(format!(
                    "duplicate property {} in {entity_kind} schema",
                    property.name()
                )));
            }
        }
        Ok(Self {
            entity_kind,
            properties,
        })
    }

    /// Catalog constructor; names are unique by construction.
    pub(crate) fn from_catalog(entity_kind: EntityKind, properties: &[PropertyDefinition]) -> Self {
        Self {
            entity_kind,
            properties: properties.to_vec(),
        }
    }

    #[must_use]
    pub const fn entity_kind(&self) -> EntityKind {
        self.entity_kind
    }

    /// Properties in declaration order.
    #[must_use]
    pub fn properties(&self) -> &[PropertyDefinition] {
        &self.properties
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Looks up a property by name.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&PropertyDefinition> {
        self.position(name).map(|index| &self.properties[index])
    }

    /// Declaration index of the named property.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.properties.iter().position(|p| p.name() == name)
    }

    /// Whether this exact definition belongs to the schema.
    #[must_use]
    pub fn contains(&self, property: &PropertyDefinition) -> bool {
        self.property(property.name()) == Some(property)
    }

    /// Resolves a definition to its declaration index, failing for foreign
    /// definitions (unknown name, or same name with a different shape).
    pub(crate) fn index_of(&self, property: &PropertyDefinition) -> ModelResult<usize> {
        match self.position(property.name()) {
            Some(index) if self.properties[index] == *property => Ok(index),
            _ => Err(self.unknown(property.name())),
        }
    }

    pub(crate) fn index_of_name(&self, name: &str) -> ModelResult<usize> {
        self.position(name).ok_or_else(|| self.unknown(name))
    }

    fn unknown(&self, name: &str) -> ModelError {
        ModelError::UnknownProperty {
            entity: self.entity_kind,
            property: name.to_string(),
        }
    }
}
