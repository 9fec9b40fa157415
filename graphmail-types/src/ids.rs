//! Identifier types used throughout the graphmail crates.
//!
//! Every server-side id is scoped to a mailbox. Each entity kind has its
//! own id type so a folder id cannot be passed where a message id is
//! expected; [`ItemId`] is the tagged union used where the kind is only
//! known at runtime.

use crate::{EntityKind, Mailbox};
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! mailbox_scoped_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name {
            id: String,
            mailbox: Mailbox,
        }

        impl $name {
            /// Creates an id scoped to the given mailbox.
            #[must_use]
            pub fn new(id: impl Into<String>, mailbox: Mailbox) -> Self {
                Self {
                    id: id.into(),
                    mailbox,
                }
            }

            /// Returns the server-assigned id string.
            #[must_use]
            pub fn id(&self) -> &str {
                &self.id
            }

            /// Returns the owning mailbox.
            #[must_use]
            pub fn mailbox(&self) -> &Mailbox {
                &self.mailbox
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}:{}", self.mailbox, self.id)
            }
        }
    };
}

mailbox_scoped_id!(
    /// Identifier of a mail message.
    MessageId
);
mailbox_scoped_id!(
    /// Identifier of a mail folder. May be a well-known folder name.
    MailFolderId
);
mailbox_scoped_id!(
    /// Identifier of an inbox rule.
    MessageRuleId
);
mailbox_scoped_id!(
    /// Identifier of a calendar event.
    EventId
);

impl MailFolderId {
    /// Addresses a well-known folder by name instead of by opaque id.
    #[must_use]
    pub fn well_known(folder: WellKnownFolder, mailbox: Mailbox) -> Self {
        Self::new(folder.as_str(), mailbox)
    }
}

/// Folders the server resolves by name in every mailbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WellKnownFolder {
    Inbox,
    Drafts,
    SentItems,
    DeletedItems,
    JunkEmail,
    Archive,
    Outbox,
}

impl WellKnownFolder {
    pub const ALL: [Self; 7] = [
        Self::Inbox,
        Self::Drafts,
        Self::SentItems,
        Self::DeletedItems,
        Self::JunkEmail,
        Self::Archive,
        Self::Outbox,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Inbox => "inbox",
            Self::Drafts => "drafts",
            Self::SentItems => "sentitems",
            Self::DeletedItems => "deleteditems",
            Self::JunkEmail => "junkemail",
            Self::Archive => "archive",
            Self::Outbox => "outbox",
        }
    }
}

impl fmt::Display for WellKnownFolder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for WellKnownFolder {
    type Err = crate::Error;

    /// Case-insensitive, so `SentItems` and `sentitems` both parse.
    fn from_str(s: &str) -> crate::Result<Self> {
        Self::ALL
            .into_iter()
            .find(|folder| folder.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| crate::Error::UnknownFolder(s.to_string()))
    }
}

/// Builds a concrete id for one entity kind.
pub type IdFactory = fn(String, Mailbox) -> ItemId;

fn message_id(id: String, mailbox: Mailbox) -> ItemId {
    ItemId::Message(MessageId::new(id, mailbox))
}

fn mail_folder_id(id: String, mailbox: Mailbox) -> ItemId {
    ItemId::MailFolder(MailFolderId::new(id, mailbox))
}

fn message_rule_id(id: String, mailbox: Mailbox) -> ItemId {
    ItemId::MessageRule(MessageRuleId::new(id, mailbox))
}

fn event_id(id: String, mailbox: Mailbox) -> ItemId {
    ItemId::Event(EventId::new(id, mailbox))
}

/// An id whose entity kind is carried as a tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum ItemId {
    Message(MessageId),
    MailFolder(MailFolderId),
    MessageRule(MessageRuleId),
    Event(EventId),
}

impl ItemId {
    /// Returns the factory that builds ids of the given kind.
    #[must_use]
    pub fn factory(kind: EntityKind) -> IdFactory {
        match kind {
            EntityKind::Message => message_id,
            EntityKind::MailFolder => mail_folder_id,
            EntityKind::MessageRule => message_rule_id,
            EntityKind::Event => event_id,
        }
    }

    /// Builds an id of the given kind, rejecting empty id strings.
    pub fn new(kind: EntityKind, id: impl Into<String>, mailbox: Mailbox) -> crate::Result<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(crate::Error::EmptyId(kind));
        }
        Ok(Self::factory(kind)(id, mailbox))
    }

    #[must_use]
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Message(_) => EntityKind::Message,
            Self::MailFolder(_) => EntityKind::MailFolder,
            Self::MessageRule(_) => EntityKind::MessageRule,
            Self::Event(_) => EntityKind::Event,
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Message(id) => id.id(),
            Self::MailFolder(id) => id.id(),
            Self::MessageRule(id) => id.id(),
            Self::Event(id) => id.id(),
        }
    }

    #[must_use]
    pub fn mailbox(&self) -> &Mailbox {
        match self {
            Self::Message(id) => id.mailbox(),
            Self::MailFolder(id) => id.mailbox(),
            Self::MessageRule(id) => id.mailbox(),
            Self::Event(id) => id.mailbox(),
        }
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}:{})", self.kind(), self.mailbox(), self.id())
    }
}

impl From<MessageId> for ItemId {
    fn from(id: MessageId) -> Self {
        Self::Message(id)
    }
}

impl From<MailFolderId> for ItemId {
    fn from(id: MailFolderId) -> Self {
        Self::MailFolder(id)
    }
}

impl From<MessageRuleId> for ItemId {
    fn from(id: MessageRuleId) -> Self {
        Self::MessageRule(id)
    }
}

impl From<EventId> for ItemId {
    fn from(id: EventId) -> Self {
        Self::Event(id)
    }
}
