//! Error types for the object model.
//!
//! Every variant is a local validation failure raised before any network
//! interaction, except [`ModelError::Transport`], which carries failures
//! reported by an [`EntityTransport`](crate::EntityTransport).

use crate::entity::EntityState;
use crate::schema::ValueKind;
use graphmail_types::EntityKind;
use thiserror::Error;

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors that can occur in model operations.
#[derive(Debug, Error)]
pub enum ModelError {
    /// No schema registered for the entity type.
    #[error("no schema registered for entity type {0}")]
    SchemaNotFound(EntityKind),

    /// Property is not part of the entity's schema.
    #[error("property {property} is not defined for {entity}")]
    UnknownProperty { entity: EntityKind, property: String },

    /// Operation is not legal in the entity's current lifecycle state.
    #[error("cannot {operation} an entity in state {state}")]
    InvalidLifecycle {
        operation: &'static str,
        state: EntityState,
    },

    /// Update attempted with nothing changed.
    #[error("no changes to update")]
    NoChanges,

    /// Missing or malformed argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Value does not fit the property's declared kind.
    #[error("property {property} expects {expected}, got {actual}")]
    PropertyTypeMismatch {
        property: String,
        expected: ValueKind,
        actual: &'static str,
    },

    /// Transport handed back data for a different entity type.
    #[error("transport returned a {actual} for a {expected} entity")]
    SchemaMismatch {
        expected: EntityKind,
        actual: EntityKind,
    },

    /// Failure reported by the transport.
    #[error("transport error: {0}")]
    Transport(String),
}

impl From<graphmail_types::Error> for ModelError {
    fn from(err: graphmail_types::Error) -> Self {
        Self::InvalidArgument(err.to_string())
    }
}
