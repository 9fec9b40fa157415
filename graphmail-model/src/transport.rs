//! Transport seam between entities and the server.
//!
//! The model owns lifecycle checks and bag bookkeeping; every network
//! round trip is delegated to an [`EntityTransport`]. Implementations
//! must hand back fully populated bags of the same entity kind, which
//! the entity swaps in wholesale.

use crate::bag::PropertyBag;
use crate::error::ModelResult;
use crate::schema::ObjectSchema;
use async_trait::async_trait;
use graphmail_types::{EntityKind, ItemId, MailFolderId, Mailbox};
use std::sync::Arc;

/// Everything a transport needs to create an entity on the server.
#[derive(Debug, Clone, Copy)]
pub struct CreateRequest<'a> {
    pub kind: EntityKind,
    pub mailbox: &'a Mailbox,
    /// Folder to create the entity in; `None` uses the server default.
    pub parent: Option<&'a MailFolderId>,
    pub bag: &'a PropertyBag,
}

/// Server state of an entity after a successful round trip.
#[derive(Debug, Clone)]
pub struct Persisted {
    pub id: ItemId,
    pub bag: PropertyBag,
}

/// How [`EntityTransport::relocate`] treats the source item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelocateMode {
    Move,
    Copy,
}

/// A backend able to persist entities.
#[async_trait]
pub trait EntityTransport: Send + Sync {
    /// Creates the entity and returns its server identity and state.
    async fn create(&self, request: CreateRequest<'_>) -> ModelResult<Persisted>;

    /// Sends the bag's changed properties.
    ///
    /// Returns the server's view of the entity when it sends one back;
    /// `None` means the server acknowledged without a body.
    async fn update(&self, id: &ItemId, bag: &PropertyBag) -> ModelResult<Option<PropertyBag>>;

    /// Deletes the entity.
    async fn delete(&self, id: &ItemId) -> ModelResult<()>;

    /// Loads the entity's current server state.
    async fn fetch(&self, id: &ItemId, schema: Arc<ObjectSchema>) -> ModelResult<Persisted>;

    /// Moves or copies the entity into `destination`.
    async fn relocate(
        &self,
        id: &ItemId,
        destination: &MailFolderId,
        mode: RelocateMode,
    ) -> ModelResult<Persisted>;
}

/// An in-memory transport for testing.
pub mod mock {
    use super::*;
    use crate::error::ModelError;
    use std::collections::HashMap;
    use std::sync::{Mutex, MutexGuard, PoisonError};

    #[derive(Debug, Default)]
    struct MockState {
        items: HashMap<ItemId, PropertyBag>,
        parents: HashMap<ItemId, String>,
        next_id: u64,
        updates: Vec<(ItemId, Vec<String>)>,
        fail_next: Option<String>,
        calls: usize,
    }

    /// A transport that keeps entities in a map.
    ///
    /// Ids are assigned as `mock-1`, `mock-2`, ... Updates record the
    /// changed-property names they were given.
    #[derive(Debug, Default)]
    pub struct MockTransport {
        state: Mutex<MockState>,
        bodyless_updates: bool,
    }

    impl MockTransport {
        pub fn new() -> Self {
            Self::default()
        }

        fn state(&self) -> MutexGuard<'_, MockState> {
            self.state.lock().unwrap_or_else(PoisonError::into_inner)
        }

        /// Makes `update` answer without a body, like an HTTP 204.
        pub fn with_bodyless_updates() -> Self {
            Self {
                bodyless_updates: true,
                ..Self::default()
            }
        }

        /// Makes the next call fail with a transport error.
        pub fn fail_next(&self, message: impl Into<String>) {
            self.state().fail_next = Some(message.into());
        }

        /// Changed-property names received by each update, in call order.
        pub fn updates(&self) -> Vec<(ItemId, Vec<String>)> {
            self.state().updates.clone()
        }

        /// Total number of transport calls, including failed ones.
        pub fn call_count(&self) -> usize {
            self.state().calls
        }

        pub fn contains(&self, id: &ItemId) -> bool {
            self.state().items.contains_key(id)
        }

        /// Folder an item was created in or moved to, if any.
        pub fn parent_of(&self, id: &ItemId) -> Option<String> {
            self.state().parents.get(id).cloned()
        }

        /// Server-side copy of a stored item.
        pub fn stored(&self, id: &ItemId) -> Option<PropertyBag> {
            self.state().items.get(id).cloned()
        }

        pub fn len(&self) -> usize {
            self.state().items.len()
        }

        pub fn is_empty(&self) -> bool {
            self.len() == 0
        }

        fn begin(&self) -> ModelResult<std::sync::MutexGuard<'_, MockState>> {
            let mut state = self.state();
            state.calls += 1;
            match state.fail_next.take() {
                Some(message) => Err(ModelError::Transport(message)),
                None => Ok(state),
            }
        }
    }

    impl MockState {
        fn allocate(&mut self, kind: EntityKind, mailbox: &Mailbox) -> ItemId {
            self.next_id += 1;
            ItemId::factory(kind)(format!("mock-{}", self.next_id), mailbox.clone())
        }

        fn find(&self, id: &ItemId) -> ModelResult<&PropertyBag> {
            self.items
                .get(id)
                .ok_or_else(|| ModelError::Transport(format!("not found: {id}")))
        }
    }

    /// Copies the populated values of `bag` into a fresh server-side bag.
    fn snapshot(bag: &PropertyBag) -> ModelResult<PropertyBag> {
        PropertyBag::loaded(
            Arc::clone(bag.schema()),
            bag.iter()
                .map(|(property, value)| (property.name(), value.clone())),
        )
    }

    #[async_trait]
    impl EntityTransport for MockTransport {
        async fn create(&self, request: CreateRequest<'_>) -> ModelResult<Persisted> {
            let mut state = self.begin()?;
            let stored = snapshot(request.bag)?;
            let id = state.allocate(request.kind, request.mailbox);
            if let Some(parent) = request.parent {
                state.parents.insert(id.clone(), parent.id().to_string());
            }
            state.items.insert(id.clone(), stored.clone());
            Ok(Persisted { id, bag: stored })
        }

        async fn update(
            &self,
            id: &ItemId,
            bag: &PropertyBag,
        ) -> ModelResult<Option<PropertyBag>> {
            let mut state = self.begin()?;
            let mut stored = state.find(id)?.clone();
            for (property, value) in bag.changes() {
                stored.set(property, value.clone())?;
            }
            stored.reset_change_tracking();
            let names = bag
                .changed_property_names()
                .into_iter()
                .map(str::to_string)
                .collect();
            state.updates.push((id.clone(), names));
            state.items.insert(id.clone(), stored.clone());
            Ok((!self.bodyless_updates).then_some(stored))
        }

        async fn delete(&self, id: &ItemId) -> ModelResult<()> {
            let mut state = self.begin()?;
            state.find(id)?;
            state.items.remove(id);
            state.parents.remove(id);
            Ok(())
        }

        async fn fetch(&self, id: &ItemId, schema: Arc<ObjectSchema>) -> ModelResult<Persisted> {
            let state = self.begin()?;
            let stored = state.find(id)?;
            if stored.kind() != schema.entity_kind() {
                return Err(ModelError::SchemaMismatch {
                    expected: schema.entity_kind(),
                    actual: stored.kind(),
                });
            }
            Ok(Persisted {
                id: id.clone(),
                bag: stored.clone(),
            })
        }

        async fn relocate(
            &self,
            id: &ItemId,
            destination: &MailFolderId,
            mode: RelocateMode,
        ) -> ModelResult<Persisted> {
            let mut state = self.begin()?;
            let stored = state.find(id)?.clone();
            let new_id = state.allocate(id.kind(), id.mailbox());
            if mode == RelocateMode::Move {
                state.items.remove(id);
                state.parents.remove(id);
            }
            state
                .parents
                .insert(new_id.clone(), destination.id().to_string());
            state.items.insert(new_id.clone(), stored.clone());
            Ok(Persisted {
                id: new_id,
                bag: stored,
            })
        }
    }
}
