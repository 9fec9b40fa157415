//! Entity object model for graphmail.
//!
//! Defines the in-memory side of the client:
//! - [`PropertyDefinition`] / [`ObjectSchema`]: the static shape of each entity type
//! - [`SchemaRegistry`]: process-wide lookup from [`EntityKind`] to schema
//! - [`PropertyValue`]: the typed value union stored in bags
//! - [`PropertyBag`]: schema-bound, change-tracking value store
//! - [`Entity`]: lifecycle state machine (new, bound, cleared) around a bag
//! - [`EntityTransport`]: the seam through which entities reach the server
//!
//! Nothing in this crate performs I/O; every network call goes through an
//! [`EntityTransport`] implementation supplied by the caller.
//!
//! [`EntityKind`]: graphmail_types::EntityKind

mod bag;
pub mod catalog;
mod entity;
mod error;
mod registry;
mod schema;
pub mod transport;
mod value;

pub use bag::PropertyBag;
pub use catalog::KindDescriptor;
pub use entity::{Entity, EntityState};
pub use error::{ModelError, ModelResult};
pub use registry::SchemaRegistry;
pub use schema::{ObjectSchema, PropertyDefinition, ValueKind};
pub use transport::{CreateRequest, EntityTransport, Persisted, RelocateMode};
pub use value::{BodyType, ItemBody, PropertyValue, Recipient};
