//! Resource paths relative to the API base URL.

use graphmail_model::RelocateMode;
use graphmail_types::{EntityKind, ItemId, MailFolderId, Mailbox, WellKnownFolder};

fn segment(id: &str) -> String {
    urlencoding::encode(id).into_owned()
}

/// Collection an entity of `kind` is created in or listed from.
///
/// `parent` scopes messages and child folders to a folder; rules always
/// live under the inbox and events ignore it.
#[must_use]
pub fn collection(kind: EntityKind, mailbox: &Mailbox, parent: Option<&MailFolderId>) -> String {
    let prefix = mailbox.path_prefix();
    match (kind, parent) {
        (EntityKind::Message, Some(folder)) => {
            format!("{prefix}/mailFolders/{}/messages", segment(folder.id()))
        }
        (EntityKind::MailFolder, Some(folder)) => {
            format!("{prefix}/mailFolders/{}/childFolders", segment(folder.id()))
        }
        (EntityKind::MessageRule, _) => format!(
            "{prefix}/mailFolders/{}/messageRules",
            WellKnownFolder::Inbox
        ),
        (kind, _) => format!("{prefix}/{}", kind.collection_segment()),
    }
}

/// Path of a single entity.
#[must_use]
pub fn item(id: &ItemId) -> String {
    format!(
        "{}/{}",
        collection(id.kind(), id.mailbox(), None),
        segment(id.id())
    )
}

/// Action path for a move or copy.
#[must_use]
pub fn relocate(id: &ItemId, mode: RelocateMode) -> String {
    let action = match mode {
        RelocateMode::Move => "move",
        RelocateMode::Copy => "copy",
    };
    format!("{}/{action}", item(id))
}
