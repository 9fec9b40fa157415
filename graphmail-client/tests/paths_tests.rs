use graphmail_client::paths;
use graphmail_model::RelocateMode;
use graphmail_types::{
    EntityKind, ItemId, MailFolderId, Mailbox, MessageId, WellKnownFolder,
};
use pretty_assertions::assert_eq;

fn bob() -> Mailbox {
    Mailbox::user("bob@contoso.com").unwrap()
}

// ── Collections ─────────────────────────────────────────────────

#[test]
fn top_level_collections() {
    let me = Mailbox::Me;
    assert_eq!(paths::collection(EntityKind::Message, &me, None), "me/messages");
    assert_eq!(paths::collection(EntityKind::MailFolder, &me, None), "me/mailFolders");
    assert_eq!(paths::collection(EntityKind::Event, &me, None), "me/events");
    assert_eq!(
        paths::collection(EntityKind::MessageRule, &me, None),
        "me/mailFolders/inbox/messageRules"
    );
}

#[test]
fn parent_scoped_collections() {
    let inbox = MailFolderId::well_known(WellKnownFolder::Inbox, bob());
    assert_eq!(
        paths::collection(EntityKind::Message, &bob(), Some(&inbox)),
        "users/bob@contoso.com/mailFolders/inbox/messages"
    );
    assert_eq!(
        paths::collection(EntityKind::MailFolder, &bob(), Some(&inbox)),
        "users/bob@contoso.com/mailFolders/inbox/childFolders"
    );
}

#[test]
fn rules_and_events_ignore_parent() {
    let drafts = MailFolderId::well_known(WellKnownFolder::Drafts, Mailbox::Me);
    assert_eq!(
        paths::collection(EntityKind::MessageRule, &Mailbox::Me, Some(&drafts)),
        "me/mailFolders/inbox/messageRules"
    );
    assert_eq!(
        paths::collection(EntityKind::Event, &Mailbox::Me, Some(&drafts)),
        "me/events"
    );
}

// ── Items ───────────────────────────────────────────────────────

#[test]
fn item_paths_per_kind() {
    let cases = [
        (EntityKind::Message, "me/messages/x1"),
        (EntityKind::MailFolder, "me/mailFolders/x1"),
        (EntityKind::MessageRule, "me/mailFolders/inbox/messageRules/x1"),
        (EntityKind::Event, "me/events/x1"),
    ];
    for (kind, expected) in cases {
        let id = ItemId::new(kind, "x1", Mailbox::Me).unwrap();
        assert_eq!(paths::item(&id), expected);
    }
}

#[test]
fn item_ids_are_percent_encoded() {
    let id = ItemId::from(MessageId::new("AAMk/a+b=", Mailbox::Me));
    assert_eq!(paths::item(&id), "me/messages/AAMk%2Fa%2Bb%3D");
}

#[test]
fn relocate_paths() {
    let id = ItemId::from(MessageId::new("m1", bob()));
    assert_eq!(
        paths::relocate(&id, RelocateMode::Move),
        "users/bob@contoso.com/messages/m1/move"
    );
    assert_eq!(
        paths::relocate(&id, RelocateMode::Copy),
        "users/bob@contoso.com/messages/m1/copy"
    );
}
