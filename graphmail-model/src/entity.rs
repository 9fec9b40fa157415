use crate::bag::PropertyBag;
use crate::catalog;
use crate::error::{ModelError, ModelResult};
use crate::registry::SchemaRegistry;
use crate::schema::PropertyDefinition;
use crate::transport::{CreateRequest, EntityTransport, Persisted, RelocateMode};
use crate::value::PropertyValue;
use graphmail_types::{EntityKind, ItemId, MailFolderId, Mailbox};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// Lifecycle state of an [`Entity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityState {
    /// Created locally, no server identity yet.
    New,
    /// Has a server identity.
    Bound,
    /// Deleted on the server; values released. Terminal.
    Cleared,
}

impl fmt::Display for EntityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::New => "new",
            Self::Bound => "bound",
            Self::Cleared => "cleared",
        })
    }
}

/// A mailbox entity: one property bag plus its lifecycle state.
///
/// The entity only checks preconditions and swaps or clears its bag; the
/// attached [`EntityTransport`] performs the network work. Every check runs
/// before the transport is called, and a failed operation leaves the
/// entity exactly as it was.
///
/// Entities are not synchronized. Callers must not mutate one instance
/// from several tasks at once.
pub struct Entity {
    kind: EntityKind,
    mailbox: Mailbox,
    id: Option<ItemId>,
    parent: Option<MailFolderId>,
    state: EntityState,
    bag: PropertyBag,
    transport: Option<Arc<dyn EntityTransport>>,
}

impl Entity {
    /// Creates a new, unsaved entity using the global schema registry.
    pub fn new(kind: EntityKind) -> ModelResult<Self> {
        Self::with_registry(SchemaRegistry::global(), kind)
    }

    /// Creates a new, unsaved entity; fails if `registry` lacks the kind.
    pub fn with_registry(registry: &SchemaRegistry, kind: EntityKind) -> ModelResult<Self> {
        let mut bag = PropertyBag::for_kind(registry, kind)?;
        bag.mark_as_new();
        Ok(Self {
            kind,
            mailbox: Mailbox::Me,
            id: None,
            parent: None,
            state: EntityState::New,
            bag,
            transport: None,
        })
    }

    /// Wraps server state returned by a transport as a bound entity.
    ///
    /// The bag is taken as server state whatever flags it carries: it is
    /// not new and has no dirty properties.
    pub fn from_persisted(persisted: Persisted) -> ModelResult<Self> {
        let Persisted { id, mut bag } = persisted;
        let kind = id.kind();
        if bag.kind() != kind {
            return Err(ModelError::SchemaMismatch {
                expected: kind,
                actual: bag.kind(),
            });
        }
        bag.mark_as_persisted();
        Ok(Self {
            kind,
            mailbox: id.mailbox().clone(),
            id: Some(id),
            parent: None,
            state: EntityState::Bound,
            bag,
            transport: None,
        })
    }

    /// Loads an existing entity from the server using the global schema
    /// registry.
    pub async fn bind(transport: Arc<dyn EntityTransport>, id: ItemId) -> ModelResult<Self> {
        Self::bind_with_registry(SchemaRegistry::global(), transport, id).await
    }

    /// Loads an existing entity; fails if `registry` lacks its kind.
    pub async fn bind_with_registry(
        registry: &SchemaRegistry,
        transport: Arc<dyn EntityTransport>,
        id: ItemId,
    ) -> ModelResult<Self> {
        let schema = registry.schema(id.kind())?;
        let persisted = transport.fetch(&id, schema).await?;
        if persisted.id.kind() != id.kind() {
            return Err(ModelError::SchemaMismatch {
                expected: id.kind(),
                actual: persisted.id.kind(),
            });
        }
        debug!("Bound {}", persisted.id);
        Ok(Self::from_persisted(persisted)?.with_transport(transport))
    }

    /// Attaches the transport used by `save`, `update` and friends.
    #[must_use]
    pub fn with_transport(mut self, transport: Arc<dyn EntityTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn attach(&mut self, transport: Arc<dyn EntityTransport>) {
        self.transport = Some(transport);
    }

    /// Sets the mailbox a new entity is created in.
    pub fn set_mailbox(&mut self, mailbox: Mailbox) -> ModelResult<()> {
        self.require("set the mailbox of", EntityState::New)?;
        self.mailbox = mailbox;
        Ok(())
    }

    /// Sets the folder a new entity is created in.
    pub fn set_parent(&mut self, parent: MailFolderId) -> ModelResult<()> {
        self.require("set the parent of", EntityState::New)?;
        self.parent = Some(parent);
        Ok(())
    }

    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        self.kind
    }

    #[must_use]
    pub const fn state(&self) -> EntityState {
        self.state
    }

    #[must_use]
    pub fn id(&self) -> Option<&ItemId> {
        self.id.as_ref()
    }

    #[must_use]
    pub fn mailbox(&self) -> &Mailbox {
        &self.mailbox
    }

    #[must_use]
    pub fn parent(&self) -> Option<&MailFolderId> {
        self.parent.as_ref()
    }

    #[must_use]
    pub fn bag(&self) -> &PropertyBag {
        &self.bag
    }

    #[must_use]
    pub fn has_transport(&self) -> bool {
        self.transport.is_some()
    }

    pub fn get(&self, property: &PropertyDefinition) -> ModelResult<Option<&PropertyValue>> {
        self.bag.get(property)
    }

    /// Writes a property. Not allowed once the entity has been deleted.
    pub fn set(
        &mut self,
        property: &PropertyDefinition,
        value: impl Into<PropertyValue>,
    ) -> ModelResult<()> {
        if self.state == EntityState::Cleared {
            return Err(self.illegal("modify"));
        }
        self.bag.set(property, value)
    }

    /// Creates the entity on the server. Legal only for new entities.
    pub async fn save(&mut self) -> ModelResult<()> {
        self.require("save", EntityState::New)?;
        let transport = self.transport()?;
        let persisted = transport
            .create(CreateRequest {
                kind: self.kind,
                mailbox: &self.mailbox,
                parent: self.parent.as_ref(),
                bag: &self.bag,
            })
            .await?;
        self.accept(persisted)?;
        info!("Saved {}", self.describe());
        Ok(())
    }

    /// Sends changed properties to the server. Legal only for bound entities
    /// with at least one dirty property.
    pub async fn update(&mut self) -> ModelResult<()> {
        self.require("update", EntityState::Bound)?;
        if !self.bag.is_dirty() {
            return Err(ModelError::NoChanges);
        }
        let transport = self.transport()?;
        let id = self.server_id()?;
        debug!(
            "Updating {} ({} changed)",
            id,
            self.bag.changed_property_names().join(", ")
        );
        match transport.update(id, &self.bag).await? {
            Some(bag) => {
                let id = id.clone();
                self.accept(Persisted { id, bag })?;
            }
            None => self.bag.reset_change_tracking(),
        }
        Ok(())
    }

    /// Deletes the entity on the server and releases its values.
    pub async fn delete(&mut self) -> ModelResult<()> {
        self.require("delete", EntityState::Bound)?;
        let id = self.server_id()?;
        let transport = self.transport()?;
        transport.delete(id).await?;
        info!("Deleted {}", id);
        self.bag.clear();
        self.state = EntityState::Cleared;
        Ok(())
    }

    /// Reloads server state, discarding local changes.
    pub async fn refresh(&mut self) -> ModelResult<()> {
        self.require("refresh", EntityState::Bound)?;
        let id = self.server_id()?;
        let transport = self.transport()?;
        let persisted = transport.fetch(id, Arc::clone(self.bag.schema())).await?;
        self.accept(persisted)
    }

    /// Moves the entity into `destination`; the server assigns a new id.
    pub async fn move_to(&mut self, destination: &MailFolderId) -> ModelResult<()> {
        let persisted = self.relocate(destination, RelocateMode::Move).await?;
        self.accept(persisted)?;
        info!("Moved {} to {}", self.describe(), destination);
        Ok(())
    }

    /// Copies the entity into `destination`, returning the copy.
    pub async fn copy_to(&self, destination: &MailFolderId) -> ModelResult<Entity> {
        let persisted = self.relocate(destination, RelocateMode::Copy).await?;
        let mut copy = Self::from_persisted(persisted)?;
        if copy.kind != self.kind {
            return Err(ModelError::SchemaMismatch {
                expected: self.kind,
                actual: copy.kind,
            });
        }
        copy.transport = self.transport.clone();
        Ok(copy)
    }

    async fn relocate(
        &self,
        destination: &MailFolderId,
        mode: RelocateMode,
    ) -> ModelResult<Persisted> {
        let operation = match mode {
            RelocateMode::Move => "move",
            RelocateMode::Copy => "copy",
        };
        self.require(operation, EntityState::Bound)?;
        if !catalog::descriptor(self.kind).relocatable {
            return Err(ModelError::InvalidArgument(format!(
                "{} entities cannot be moved or copied",
                self.kind
            )));
        }
        let id = self.server_id()?;
        let transport = self.transport()?;
        transport.relocate(id, destination, mode).await
    }

    /// Swaps in server state after checking it belongs to this kind.
    ///
    /// The incoming bag always ends up bound and clean.
    fn accept(&mut self, persisted: Persisted) -> ModelResult<()> {
        let Persisted { id, mut bag } = persisted;
        for actual in [id.kind(), bag.kind()] {
            if actual != self.kind {
                return Err(ModelError::SchemaMismatch {
                    expected: self.kind,
                    actual,
                });
            }
        }
        bag.mark_as_persisted();
        self.mailbox = id.mailbox().clone();
        self.id = Some(id);
        self.bag = bag;
        self.state = EntityState::Bound;
        Ok(())
    }

    fn require(&self, operation: &'static str, state: EntityState) -> ModelResult<()> {
        if self.state == state {
            Ok(())
        } else {
            Err(self.illegal(operation))
        }
    }

    fn illegal(&self, operation: &'static str) -> ModelError {
        ModelError::InvalidLifecycle {
            operation,
            state: self.state,
        }
    }

    fn transport(&self) -> ModelResult<Arc<dyn EntityTransport>> {
        self.transport
            .clone()
            .ok_or_else(|| ModelError::InvalidArgument("no transport attached".to_string()))
    }

    fn server_id(&self) -> ModelResult<&ItemId> {
        self.id
            .as_ref()
            .ok_or_else(|| ModelError::InvalidArgument("entity has no server id".to_string()))
    }

    fn describe(&self) -> String {
        match &self.id {
            Some(id) => id.to_string(),
            None => format!("new {}", self.kind),
        }
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("kind", &self.kind)
            .field("mailbox", &self.mailbox)
            .field("id", &self.id)
            .field("parent", &self.parent)
            .field("state", &self.state)
            .field("bag", &self.bag)
            .field("has_transport", &self.transport.is_some())
            .finish()
    }
}
