//! Builtin catalog of entity types.
//!
//! Each submodule lists the properties of one entity type as constants,
//! so callers can write `message::SUBJECT` wherever a
//! [`PropertyDefinition`] is expected. The schemas built from these lists
//! populate [`SchemaRegistry::builtin`](crate::SchemaRegistry::builtin).

use crate::schema::{ObjectSchema, PropertyDefinition};
use graphmail_types::{EntityKind, IdFactory, ItemId};

/// Per-kind capabilities attached as data.
#[derive(Debug, Clone, Copy)]
pub struct KindDescriptor {
    pub kind: EntityKind,
    /// Builds this kind's concrete id from `(id, mailbox)`.
    pub id_factory: IdFactory,
    /// Properties the server returns when listing items of this kind.
    pub first_class: &'static [&'static str],
    /// Whether instances can be moved or copied between folders.
    pub relocatable: bool,
}

/// Returns the descriptor for `kind`.
#[must_use]
pub fn descriptor(kind: EntityKind) -> KindDescriptor {
    match kind {
        EntityKind::Message => KindDescriptor {
            kind,
            id_factory: ItemId::factory(kind),
            first_class: message::FIRST_CLASS,
            relocatable: true,
        },
        EntityKind::MailFolder => KindDescriptor {
            kind,
            id_factory: ItemId::factory(kind),
            first_class: mail_folder::FIRST_CLASS,
            relocatable: true,
        },
        EntityKind::MessageRule => KindDescriptor {
            kind,
            id_factory: ItemId::factory(kind),
            first_class: message_rule::FIRST_CLASS,
            relocatable: false,
        },
        EntityKind::Event => KindDescriptor {
            kind,
            id_factory: ItemId::factory(kind),
            first_class: event::FIRST_CLASS,
            relocatable: false,
        },
    }
}

pub(crate) fn builtin_schemas() -> Vec<ObjectSchema> {
    EntityKind::ALL
        .into_iter()
        .map(|kind| ObjectSchema::from_catalog(kind, properties(kind)))
        .collect()
}

pub mod message {
    use crate::schema::PropertyDefinition;

    pub const SUBJECT: PropertyDefinition = PropertyDefinition::string("Subject");
    pub const BODY: PropertyDefinition = PropertyDefinition::body("Body");
    pub const BODY_PREVIEW: PropertyDefinition = PropertyDefinition::string("BodyPreview");
    pub const FROM: PropertyDefinition = PropertyDefinition::recipient("From");
    pub const SENDER: PropertyDefinition = PropertyDefinition::recipient("Sender");
    pub const TO_RECIPIENTS: PropertyDefinition = PropertyDefinition::recipients("ToRecipients");
    pub const CC_RECIPIENTS: PropertyDefinition = PropertyDefinition::recipients("CcRecipients");
    pub const BCC_RECIPIENTS: PropertyDefinition = PropertyDefinition::recipients("BccRecipients");
    pub const REPLY_TO: PropertyDefinition = PropertyDefinition::recipients("ReplyTo");
    pub const IS_READ: PropertyDefinition = PropertyDefinition::boolean("IsRead");
    pub const IS_DRAFT: PropertyDefinition = PropertyDefinition::boolean("IsDraft");
    pub const HAS_ATTACHMENTS: PropertyDefinition = PropertyDefinition::boolean("HasAttachments");
    pub const IMPORTANCE: PropertyDefinition = PropertyDefinition::string("Importance");
    pub const CATEGORIES: PropertyDefinition = PropertyDefinition::strings("Categories");
    pub const CREATED_DATE_TIME: PropertyDefinition =
        PropertyDefinition::date_time("CreatedDateTime");
    pub const RECEIVED_DATE_TIME: PropertyDefinition =
        PropertyDefinition::date_time("ReceivedDateTime");
    pub const SENT_DATE_TIME: PropertyDefinition = PropertyDefinition::date_time("SentDateTime");
    pub const PARENT_FOLDER_ID: PropertyDefinition = PropertyDefinition::string("ParentFolderId");
    pub const CONVERSATION_ID: PropertyDefinition = PropertyDefinition::string("ConversationId");
    pub const INTERNET_MESSAGE_ID: PropertyDefinition =
        PropertyDefinition::string("InternetMessageId");

    pub(crate) const ALL: [PropertyDefinition; 20] = [
        SUBJECT,
        BODY,
        BODY_PREVIEW,
        FROM,
        SENDER,
        TO_RECIPIENTS,
        CC_RECIPIENTS,
        BCC_RECIPIENTS,
        REPLY_TO,
        IS_READ,
        IS_DRAFT,
        HAS_ATTACHMENTS,
        IMPORTANCE,
        CATEGORIES,
        CREATED_DATE_TIME,
        RECEIVED_DATE_TIME,
        SENT_DATE_TIME,
        PARENT_FOLDER_ID,
        CONVERSATION_ID,
        INTERNET_MESSAGE_ID,
    ];

    pub(crate) const FIRST_CLASS: &[&str] = &[
        "Subject",
        "BodyPreview",
        "From",
        "ToRecipients",
        "IsRead",
        "HasAttachments",
        "Importance",
        "ReceivedDateTime",
        "ParentFolderId",
    ];
}

pub mod mail_folder {
    use crate::schema::PropertyDefinition;

    pub const DISPLAY_NAME: PropertyDefinition = PropertyDefinition::string("DisplayName");
    pub const PARENT_FOLDER_ID: PropertyDefinition = PropertyDefinition::string("ParentFolderId");
    pub const CHILD_FOLDER_COUNT: PropertyDefinition =
        PropertyDefinition::number("ChildFolderCount");
    pub const UNREAD_ITEM_COUNT: PropertyDefinition = PropertyDefinition::number("UnreadItemCount");
    pub const TOTAL_ITEM_COUNT: PropertyDefinition = PropertyDefinition::number("TotalItemCount");
    pub const IS_HIDDEN: PropertyDefinition = PropertyDefinition::boolean("IsHidden");

    pub(crate) const ALL: [PropertyDefinition; 6] = [
        DISPLAY_NAME,
        PARENT_FOLDER_ID,
        CHILD_FOLDER_COUNT,
        UNREAD_ITEM_COUNT,
        TOTAL_ITEM_COUNT,
        IS_HIDDEN,
    ];

    pub(crate) const FIRST_CLASS: &[&str] = &[
        "DisplayName",
        "ParentFolderId",
        "ChildFolderCount",
        "UnreadItemCount",
        "TotalItemCount",
    ];
}

pub mod message_rule {
    use crate::schema::PropertyDefinition;

    pub const DISPLAY_NAME: PropertyDefinition = PropertyDefinition::string("DisplayName");
    pub const SEQUENCE: PropertyDefinition = PropertyDefinition::number("Sequence");
    pub const IS_ENABLED: PropertyDefinition = PropertyDefinition::boolean("IsEnabled");
    pub const HAS_ERROR: PropertyDefinition = PropertyDefinition::boolean("HasError");
    pub const IS_READ_ONLY: PropertyDefinition = PropertyDefinition::boolean("IsReadOnly");

    pub(crate) const ALL: [PropertyDefinition; 5] =
        [DISPLAY_NAME, SEQUENCE, IS_ENABLED, HAS_ERROR, IS_READ_ONLY];

    pub(crate) const FIRST_CLASS: &[&str] = &["DisplayName", "Sequence", "IsEnabled"];
}

pub mod event {
    use crate::schema::PropertyDefinition;

    pub const SUBJECT: PropertyDefinition = PropertyDefinition::string("Subject");
    pub const BODY: PropertyDefinition = PropertyDefinition::body("Body");
    pub const START: PropertyDefinition = PropertyDefinition::date_time_time_zone("Start");
    pub const END: PropertyDefinition = PropertyDefinition::date_time_time_zone("End");
    pub const ICAL_UID: PropertyDefinition = PropertyDefinition::string("ICalUId");
    pub const IS_ALL_DAY: PropertyDefinition = PropertyDefinition::boolean("IsAllDay");
    pub const IS_CANCELLED: PropertyDefinition = PropertyDefinition::boolean("IsCancelled");
    pub const ORGANIZER: PropertyDefinition = PropertyDefinition::recipient("Organizer");
    pub const ATTENDEES: PropertyDefinition = PropertyDefinition::recipients("Attendees");
    pub const SHOW_AS: PropertyDefinition = PropertyDefinition::string("ShowAs");
    pub const IMPORTANCE: PropertyDefinition = PropertyDefinition::string("Importance");
    pub const CATEGORIES: PropertyDefinition = PropertyDefinition::strings("Categories");
    pub const CREATED_DATE_TIME: PropertyDefinition =
        PropertyDefinition::date_time("CreatedDateTime");

    pub(crate) const ALL: [PropertyDefinition; 13] = [
        SUBJECT,
        BODY,
        START,
        END,
        ICAL_UID,
        IS_ALL_DAY,
        IS_CANCELLED,
        ORGANIZER,
        ATTENDEES,
        SHOW_AS,
        IMPORTANCE,
        CATEGORIES,
        CREATED_DATE_TIME,
    ];

    pub(crate) const FIRST_CLASS: &[&str] = &["Subject", "Start", "End", "IsAllDay", "Organizer"];
}

/// Every builtin definition for `kind`, in schema order.
#[must_use]
pub fn properties(kind: EntityKind) -> &'static [PropertyDefinition] {
    match kind {
        EntityKind::Message => &MESSAGE_ALL,
        EntityKind::MailFolder => &MAIL_FOLDER_ALL,
        EntityKind::MessageRule => &MESSAGE_RULE_ALL,
        EntityKind::Event => &EVENT_ALL,
    }
}

static MESSAGE_ALL: [PropertyDefinition; 20] = message::ALL;
static MAIL_FOLDER_ALL: [PropertyDefinition; 6] = mail_folder::ALL;
static MESSAGE_RULE_ALL: [PropertyDefinition; 5] = message_rule::ALL;
static EVENT_ALL: [PropertyDefinition; 13] = event::ALL;
