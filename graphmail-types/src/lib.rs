//! Core type definitions for graphmail.
//!
//! This crate defines the identifier types shared by every other crate:
//! - [`EntityKind`], the tag naming each entity type the client manages
//! - [`Mailbox`], the mailbox scope a resource lives in
//! - Typed ids ([`MessageId`], [`MailFolderId`], ...) and the tagged
//!   [`ItemId`] union with its per-kind factory table
//! - [`WellKnownFolder`] names usable in place of folder ids
//!
//! Nothing here performs I/O.

mod ids;
mod kind;
mod mailbox;

pub use ids::{EventId, IdFactory, ItemId, MailFolderId, MessageId, MessageRuleId, WellKnownFolder};
pub use kind::EntityKind;
pub use mailbox::Mailbox;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when building identifiers.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("empty {0} id")]
    EmptyId(EntityKind),

    #[error("invalid mailbox: {0}")]
    InvalidMailbox(String),

    #[error("unknown entity kind: {0}")]
    UnknownKind(String),

    #[error("unknown well-known folder: {0}")]
    UnknownFolder(String),
}
