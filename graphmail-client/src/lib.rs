//! HTTP side of graphmail.
//!
//! [`GraphTransport`] implements the model's
//! [`EntityTransport`](graphmail_model::EntityTransport) over the mailbox
//! REST API: JSON mapping lives in [`wire`], URL layout in [`paths`].
//! Listing with a compiled filter goes through
//! [`GraphTransport::find_items`].

mod auth;
mod config;
mod error;
mod http;
pub mod logging;
pub mod paths;
mod query;
pub mod wire;

pub use auth::{StaticToken, TokenProvider};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::GraphTransport;
pub use query::MessageQuery;
