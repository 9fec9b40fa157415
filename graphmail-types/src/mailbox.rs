//! Mailbox scope for mailbox-owned resources.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The mailbox a resource belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mailbox {
    /// The signed-in user's own mailbox.
    #[default]
    Me,
    /// Another user's mailbox, addressed by user principal name or id.
    User(String),
}

impl Mailbox {
    /// Creates a mailbox scope for the given user principal name.
    ///
    /// `"me"` (any case) maps to [`Mailbox::Me`].
    pub fn user(upn: impl Into<String>) -> crate::Result<Self> {
        let upn = upn.into();
        let trimmed = upn.trim();
        if trimmed.is_empty() || trimmed.contains('/') {
            return Err(crate::Error::InvalidMailbox(upn));
        }
        if trimmed.eq_ignore_ascii_case("me") {
            return Ok(Self::Me);
        }
        Ok(Self::User(trimmed.to_string()))
    }

    /// Resource path prefix: `me` or `users/{upn}`.
    #[must_use]
    pub fn path_prefix(&self) -> String {
        match self {
            Self::Me => "me".to_string(),
            Self::User(upn) => format!("users/{upn}"),
        }
    }
}

impl fmt::Display for Mailbox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Me => f.write_str("me"),
            Self::User(upn) => f.write_str(upn),
        }
    }
}

impl FromStr for Mailbox {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::user(s)
    }
}
