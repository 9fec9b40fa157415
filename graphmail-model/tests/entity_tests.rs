use async_trait::async_trait;
use graphmail_model::catalog::{event, mail_folder, message, message_rule};
use graphmail_model::transport::mock::MockTransport;
use graphmail_model::{
    CreateRequest, Entity, EntityState, EntityTransport, ModelError, ModelResult, ObjectSchema,
    Persisted, PropertyBag, PropertyValue, RelocateMode, SchemaRegistry,
};
use graphmail_types::{EntityKind, ItemId, MailFolderId, Mailbox, WellKnownFolder};
use pretty_assertions::assert_eq;
use std::sync::Arc;

/// Hands the caller's own bag back, flags and all.
struct EchoTransport;

#[async_trait]
impl EntityTransport for EchoTransport {
    async fn create(&self, request: CreateRequest<'_>) -> ModelResult<Persisted> {
        Ok(Persisted {
            id: ItemId::factory(request.kind)("echo-1".to_string(), request.mailbox.clone()),
            bag: request.bag.clone(),
        })
    }

    async fn update(&self, _id: &ItemId, bag: &PropertyBag) -> ModelResult<Option<PropertyBag>> {
        Ok(Some(bag.clone()))
    }

    async fn delete(&self, _id: &ItemId) -> ModelResult<()> {
        Ok(())
    }

    async fn fetch(&self, id: &ItemId, _schema: Arc<ObjectSchema>) -> ModelResult<Persisted> {
        Err(ModelError::Transport(format!("{id} not stored")))
    }

    async fn relocate(
        &self,
        id: &ItemId,
        _destination: &MailFolderId,
        _mode: RelocateMode,
    ) -> ModelResult<Persisted> {
        Err(ModelError::Transport(format!("{id} not stored")))
    }
}

fn mock() -> Arc<MockTransport> {
    Arc::new(MockTransport::new())
}

async fn saved_message(transport: &Arc<MockTransport>) -> Entity {
    let mut entity = Entity::new(EntityKind::Message)
        .unwrap()
        .with_transport(transport.clone());
    entity.set(&message::SUBJECT, "hello").unwrap();
    entity.save().await.unwrap();
    entity
}

fn inbox() -> MailFolderId {
    MailFolderId::well_known(WellKnownFolder::Inbox, Mailbox::Me)
}

// ── Construction ─────────────────────────────────────────────────

#[test]
fn new_entity_is_new_with_clean_bag() {
    let entity = Entity::new(EntityKind::Message).unwrap();
    assert_eq!(entity.state(), EntityState::New);
    assert!(entity.bag().is_new());
    assert!(entity.bag().changed_property_names().is_empty());
    assert!(entity.id().is_none());
    assert!(!entity.has_transport());
}

#[test]
fn new_entity_without_schema_fails() {
    let err = Entity::with_registry(&SchemaRegistry::new(), EntityKind::Event).unwrap_err();
    assert!(matches!(err, ModelError::SchemaNotFound(EntityKind::Event)));
}

#[test]
fn from_persisted_checks_kind() {
    let bag = PropertyBag::for_kind(SchemaRegistry::global(), EntityKind::Event).unwrap();
    let id = ItemId::new(EntityKind::Message, "m1", Mailbox::Me).unwrap();
    let err = Entity::from_persisted(graphmail_model::Persisted { id, bag }).unwrap_err();
    assert!(matches!(
        err,
        ModelError::SchemaMismatch {
            expected: EntityKind::Message,
            actual: EntityKind::Event
        }
    ));
}

// ── save ─────────────────────────────────────────────────────────

#[tokio::test]
async fn save_binds_and_swaps_bag() {
    let transport = mock();
    let entity = saved_message(&transport).await;

    assert_eq!(entity.state(), EntityState::Bound);
    assert!(!entity.bag().is_new());
    assert!(!entity.bag().is_dirty());
    let id = entity.id().unwrap();
    assert_eq!(id.kind(), EntityKind::Message);
    assert!(transport.contains(id));
    assert_eq!(
        entity.get(&message::SUBJECT).unwrap(),
        Some(&PropertyValue::from("hello"))
    );
}

#[tokio::test]
async fn save_normalises_echoed_bag() {
    let mut entity = Entity::new(EntityKind::Message)
        .unwrap()
        .with_transport(Arc::new(EchoTransport));
    entity.set(&message::SUBJECT, "hello").unwrap();
    entity.save().await.unwrap();

    assert_eq!(entity.state(), EntityState::Bound);
    assert!(!entity.bag().is_new());
    assert!(entity.bag().changed_property_names().is_empty());
    assert_eq!(
        entity.get(&message::SUBJECT).unwrap(),
        Some(&PropertyValue::from("hello"))
    );
    assert!(matches!(entity.update().await, Err(ModelError::NoChanges)));
}

#[tokio::test]
async fn update_normalises_echoed_bag() {
    let mut entity = Entity::new(EntityKind::Message)
        .unwrap()
        .with_transport(Arc::new(EchoTransport));
    entity.save().await.unwrap();
    entity.set(&message::IS_READ, true).unwrap();
    entity.update().await.unwrap();
    assert!(!entity.bag().is_dirty());
    assert!(matches!(entity.update().await, Err(ModelError::NoChanges)));
}

#[test]
fn from_persisted_takes_bag_as_server_state() {
    let mut bag = PropertyBag::for_kind(SchemaRegistry::global(), EntityKind::Message).unwrap();
    bag.set(&message::SUBJECT, "draft").unwrap();
    let id = ItemId::new(EntityKind::Message, "m1", Mailbox::Me).unwrap();
    let entity = Entity::from_persisted(Persisted { id, bag }).unwrap();
    assert!(!entity.bag().is_new());
    assert!(!entity.bag().is_dirty());
}

#[tokio::test]
async fn save_uses_parent_and_mailbox() {
    let transport = mock();
    let bob = Mailbox::user("bob@contoso.com").unwrap();
    let mut folder = Entity::new(EntityKind::MailFolder)
        .unwrap()
        .with_transport(transport.clone());
    folder.set_mailbox(bob.clone()).unwrap();
    folder.set_parent(inbox()).unwrap();
    folder.set(&mail_folder::DISPLAY_NAME, "Receipts").unwrap();
    folder.save().await.unwrap();

    let id = folder.id().unwrap();
    assert_eq!(id.mailbox(), &bob);
    assert_eq!(folder.mailbox(), &bob);
    assert_eq!(transport.parent_of(id).as_deref(), Some("inbox"));
}

#[tokio::test]
async fn save_on_bound_entity_is_invalid_lifecycle() {
    let transport = mock();
    let mut entity = saved_message(&transport).await;
    let err = entity.save().await.unwrap_err();
    assert!(matches!(
        err,
        ModelError::InvalidLifecycle {
            operation: "save",
            state: EntityState::Bound
        }
    ));
    assert_eq!(transport.len(), 1);
}

#[tokio::test]
async fn save_without_transport_is_invalid_argument() {
    let mut entity = Entity::new(EntityKind::Message).unwrap();
    let err = entity.save().await.unwrap_err();
    assert!(matches!(err, ModelError::InvalidArgument(_)));
    assert_eq!(entity.state(), EntityState::New);
}

#[tokio::test]
async fn failed_save_leaves_entity_new() {
    let transport = mock();
    let mut entity = Entity::new(EntityKind::Message)
        .unwrap()
        .with_transport(transport.clone());
    entity.set(&message::SUBJECT, "draft").unwrap();
    transport.fail_next("boom");

    let err = entity.save().await.unwrap_err();
    assert!(matches!(err, ModelError::Transport(ref m) if m == "boom"));
    assert_eq!(entity.state(), EntityState::New);
    assert!(entity.id().is_none());
    assert_eq!(entity.bag().changed_property_names(), vec!["Subject"]);
}

// ── update ───────────────────────────────────────────────────────

#[tokio::test]
async fn update_on_new_entity_is_invalid_lifecycle() {
    let mut entity = Entity::new(EntityKind::Message)
        .unwrap()
        .with_transport(mock());
    entity.set(&message::SUBJECT, "x").unwrap();
    let err = entity.update().await.unwrap_err();
    assert!(matches!(
        err,
        ModelError::InvalidLifecycle {
            operation: "update",
            state: EntityState::New
        }
    ));
}

#[tokio::test]
async fn update_without_changes_fails() {
    let transport = mock();
    let mut entity = saved_message(&transport).await;
    let calls = transport.call_count();
    let err = entity.update().await.unwrap_err();
    assert!(matches!(err, ModelError::NoChanges));
    assert_eq!(transport.call_count(), calls);
}

#[tokio::test]
async fn update_sends_only_changed_properties() {
    let transport = mock();
    let mut entity = saved_message(&transport).await;
    entity.set(&message::IS_READ, true).unwrap();
    entity.set(&message::IMPORTANCE, "high").unwrap();
    entity.set(&message::IS_READ, true).unwrap();
    entity.update().await.unwrap();

    let updates = transport.updates();
    assert_eq!(updates.len(), 1);
    assert_eq!(&updates[0].0, entity.id().unwrap());
    assert_eq!(updates[0].1, vec!["IsRead", "Importance"]);

    assert_eq!(entity.state(), EntityState::Bound);
    assert!(!entity.bag().is_dirty());
    assert_eq!(
        entity.get(&message::SUBJECT).unwrap(),
        Some(&PropertyValue::from("hello"))
    );
    let stored = transport.stored(entity.id().unwrap()).unwrap();
    assert_eq!(
        stored.get(&message::IMPORTANCE).unwrap(),
        Some(&PropertyValue::from("high"))
    );
}

#[tokio::test]
async fn bodyless_update_resets_change_tracking() {
    let transport = Arc::new(MockTransport::with_bodyless_updates());
    let mut entity = saved_message(&transport).await;
    entity.set(&message::IS_READ, false).unwrap();
    entity.update().await.unwrap();
    assert!(!entity.bag().is_dirty());
    assert_eq!(
        entity.get(&message::IS_READ).unwrap(),
        Some(&PropertyValue::Boolean(false))
    );
}

#[tokio::test]
async fn failed_update_keeps_changes() {
    let transport = mock();
    let mut entity = saved_message(&transport).await;
    entity.set(&message::IS_READ, true).unwrap();
    transport.fail_next("503");
    assert!(entity.update().await.is_err());
    assert_eq!(entity.bag().changed_property_names(), vec!["IsRead"]);
    entity.update().await.unwrap();
    assert!(!entity.bag().is_dirty());
}

// ── delete ───────────────────────────────────────────────────────

#[tokio::test]
async fn delete_clears_bag_and_is_terminal() {
    let transport = mock();
    let mut entity = saved_message(&transport).await;
    let id = entity.id().unwrap().clone();
    entity.delete().await.unwrap();

    assert_eq!(entity.state(), EntityState::Cleared);
    assert!(entity.bag().is_empty());
    assert!(!transport.contains(&id));

    assert!(matches!(
        entity.delete().await,
        Err(ModelError::InvalidLifecycle { .. })
    ));
    assert!(matches!(
        entity.update().await,
        Err(ModelError::InvalidLifecycle { .. })
    ));
    assert!(matches!(
        entity.save().await,
        Err(ModelError::InvalidLifecycle { .. })
    ));
    assert!(matches!(
        entity.set(&message::SUBJECT, "late"),
        Err(ModelError::InvalidLifecycle { .. })
    ));
}

#[tokio::test]
async fn delete_on_new_entity_is_invalid_lifecycle() {
    let mut entity = Entity::new(EntityKind::Event)
        .unwrap()
        .with_transport(mock());
    assert!(matches!(
        entity.delete().await,
        Err(ModelError::InvalidLifecycle {
            operation: "delete",
            state: EntityState::New
        })
    ));
}

// ── bind / refresh ───────────────────────────────────────────────

#[tokio::test]
async fn bind_loads_server_state() {
    let transport = mock();
    let saved = saved_message(&transport).await;
    let id = saved.id().unwrap().clone();

    let dyn_transport: Arc<dyn EntityTransport> = transport.clone();
    let bound = Entity::bind(dyn_transport, id.clone()).await.unwrap();
    assert_eq!(bound.state(), EntityState::Bound);
    assert_eq!(bound.id(), Some(&id));
    assert!(bound.has_transport());
    assert_eq!(
        bound.get(&message::SUBJECT).unwrap(),
        Some(&PropertyValue::from("hello"))
    );
}

#[tokio::test]
async fn bind_with_registry_missing_kind_fails_before_transport() {
    let transport = mock();
    let dyn_transport: Arc<dyn EntityTransport> = transport.clone();
    let id = ItemId::new(EntityKind::Event, "e1", Mailbox::Me).unwrap();
    let err = Entity::bind_with_registry(&SchemaRegistry::new(), dyn_transport, id)
        .await
        .unwrap_err();
    assert!(matches!(err, ModelError::SchemaNotFound(EntityKind::Event)));
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn refresh_discards_local_changes() {
    let transport = mock();
    let mut entity = saved_message(&transport).await;
    entity.set(&message::SUBJECT, "local edit").unwrap();
    entity.refresh().await.unwrap();
    assert!(!entity.bag().is_dirty());
    assert_eq!(
        entity.get(&message::SUBJECT).unwrap(),
        Some(&PropertyValue::from("hello"))
    );
}

// ── move / copy ──────────────────────────────────────────────────

#[tokio::test]
async fn move_to_rebinds_with_new_id() {
    let transport = mock();
    let mut entity = saved_message(&transport).await;
    let old_id = entity.id().unwrap().clone();
    let archive = MailFolderId::well_known(WellKnownFolder::Archive, Mailbox::Me);
    entity.move_to(&archive).await.unwrap();

    let new_id = entity.id().unwrap();
    assert_ne!(new_id, &old_id);
    assert!(!transport.contains(&old_id));
    assert_eq!(transport.parent_of(new_id).as_deref(), Some("archive"));
    assert_eq!(entity.state(), EntityState::Bound);
}

#[tokio::test]
async fn copy_to_leaves_source_untouched() {
    let transport = mock();
    let entity = saved_message(&transport).await;
    let copy = entity.copy_to(&inbox()).await.unwrap();

    assert_ne!(copy.id(), entity.id());
    assert!(transport.contains(entity.id().unwrap()));
    assert!(copy.has_transport());
    assert_eq!(
        copy.get(&message::SUBJECT).unwrap(),
        Some(&PropertyValue::from("hello"))
    );
}

#[tokio::test]
async fn events_cannot_be_moved() {
    let transport = mock();
    let mut entity = Entity::new(EntityKind::Event)
        .unwrap()
        .with_transport(transport.clone());
    entity.set(&event::SUBJECT, "standup").unwrap();
    entity.save().await.unwrap();
    let calls = transport.call_count();
    assert!(matches!(
        entity.move_to(&inbox()).await,
        Err(ModelError::InvalidArgument(_))
    ));
    assert_eq!(transport.call_count(), calls);
}

#[tokio::test]
async fn rules_can_be_saved_and_updated() {
    let transport = mock();
    let mut rule = Entity::new(EntityKind::MessageRule)
        .unwrap()
        .with_transport(transport.clone());
    rule.set(&message_rule::DISPLAY_NAME, "From boss").unwrap();
    rule.set(&message_rule::SEQUENCE, 1).unwrap();
    rule.save().await.unwrap();
    rule.set(&message_rule::IS_ENABLED, false).unwrap();
    rule.update().await.unwrap();
    assert_eq!(transport.updates()[0].1, vec!["IsEnabled"]);
}

#[tokio::test]
async fn set_parent_after_save_is_rejected() {
    let transport = mock();
    let mut entity = saved_message(&transport).await;
    assert!(matches!(
        entity.set_parent(inbox()),
        Err(ModelError::InvalidLifecycle { .. })
    ));
}
