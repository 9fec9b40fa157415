use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Tag identifying an entity type managed by the client.
///
/// The tag is the key for schema lookups and for the id factory table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityKind {
    Message,
    MailFolder,
    MessageRule,
    Event,
}

impl EntityKind {
    /// Every kind, in declaration order.
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Message,
        EntityKind::MailFolder,
        EntityKind::MessageRule,
        EntityKind::Event,
    ];

    /// Type name as it appears in schemas and log output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Message => "Message",
            Self::MailFolder => "MailFolder",
            Self::MessageRule => "MessageRule",
            Self::Event => "Event",
        }
    }

    /// REST collection segment for this kind (e.g. `messages`).
    #[must_use]
    pub const fn collection_segment(self) -> &'static str {
        match self {
            Self::Message => "messages",
            Self::MailFolder => "mailFolders",
            Self::MessageRule => "messageRules",
            Self::Event => "events",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| crate::Error::UnknownKind(s.to_string()))
    }
}
