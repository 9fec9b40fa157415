//! Schema-bound, change-tracking value store.
//!
//! A [`PropertyBag`] backs exactly one entity instance. Values are slotted
//! by schema position; the dirty list records every written slot once, in
//! the order it was first written since the last reset. Writes always
//! dirty the slot, even when the value is unchanged.

use crate::error::{ModelError, ModelResult};
use crate::registry::SchemaRegistry;
use crate::schema::{ObjectSchema, PropertyDefinition};
use crate::value::PropertyValue;
use graphmail_types::EntityKind;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct PropertyBag {
    schema: Arc<ObjectSchema>,
    values: Vec<Option<PropertyValue>>,
    dirty: Vec<usize>,
    is_new: bool,
}

impl PropertyBag {
    /// Creates an empty bag for `schema`.
    #[must_use]
    pub fn new(schema: Arc<ObjectSchema>) -> Self {
        let slots = schema.len();
        Self {
            schema,
            values: vec![None; slots],
            dirty: Vec::new(),
            is_new: false,
        }
    }

    /// Creates an empty bag for `kind`, failing if the registry has no schema.
    pub fn for_kind(registry: &SchemaRegistry, kind: EntityKind) -> ModelResult<Self> {
        Ok(Self::new(registry.schema(kind)?))
    }

    /// Builds a bag from values reported by the server.
    ///
    /// The result is bound (not new) and has no dirty properties. Names
    /// must belong to the schema and values must fit their declared kinds.
    pub fn loaded<N, I>(schema: Arc<ObjectSchema>, values: I) -> ModelResult<Self>
    where
        N: AsRef<str>,
        I: IntoIterator<Item = (N, PropertyValue)>,
    {
        let mut bag = Self::new(schema);
        for (name, value) in values {
            let index = bag.schema.index_of_name(name.as_ref())?;
            bag.check_fits(index, &value)?;
            bag.values[index] = Some(value);
        }
        Ok(bag)
    }

    /// Flags the bag as belonging to an entity that has not been persisted.
    ///
    /// Only the entity's creation path calls this.
    pub(crate) fn mark_as_new(&mut self) {
        self.is_new = true;
        self.dirty.clear();
    }

    /// Marks the bag as server state: not new, nothing dirty.
    pub(crate) fn mark_as_persisted(&mut self) {
        self.is_new = false;
        self.dirty.clear();
    }

    #[must_use]
    pub fn schema(&self) -> &Arc<ObjectSchema> {
        &self.schema
    }

    #[must_use]
    pub fn kind(&self) -> EntityKind {
        self.schema.entity_kind()
    }

    #[must_use]
    pub const fn is_new(&self) -> bool {
        self.is_new
    }

    /// Whether any property was written since the last reset.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    /// Current value of `property`, or `None` if absent.
    pub fn get(&self, property: &PropertyDefinition) -> ModelResult<Option<&PropertyValue>> {
        let index = self.schema.index_of(property)?;
        Ok(self.values[index].as_ref())
    }

    /// Current value of the named property, or `None` if absent.
    pub fn get_by_name(&self, name: &str) -> ModelResult<Option<&PropertyValue>> {
        let index = self.schema.index_of_name(name)?;
        Ok(self.values[index].as_ref())
    }

    /// Stores `value` and marks `property` dirty.
    pub fn set(
        &mut self,
        property: &PropertyDefinition,
        value: impl Into<PropertyValue>,
    ) -> ModelResult<()> {
        let index = self.schema.index_of(property)?;
        self.write(index, value.into())
    }

    /// Stores `value` under the named property and marks it dirty.
    pub fn set_by_name(&mut self, name: &str, value: impl Into<PropertyValue>) -> ModelResult<()> {
        let index = self.schema.index_of_name(name)?;
        self.write(index, value.into())
    }

    fn write(&mut self, index: usize, value: PropertyValue) -> ModelResult<()> {
        self.check_fits(index, &value)?;
        self.values[index] = Some(value);
        if !self.dirty.contains(&index) {
            self.dirty.push(index);
        }
        Ok(())
    }

    fn check_fits(&self, index: usize, value: &PropertyValue) -> ModelResult<()> {
        let property = &self.schema.properties()[index];
        if value.fits(property.value_kind()) {
            Ok(())
        } else {
            Err(ModelError::PropertyTypeMismatch {
                property: property.name().to_string(),
                expected: property.value_kind(),
                actual: value.type_name(),
            })
        }
    }

    /// Names of the dirty properties, in first-write order.
    #[must_use]
    pub fn changed_property_names(&self) -> Vec<&str> {
        self.changed_properties()
            .into_iter()
            .map(PropertyDefinition::name)
            .collect()
    }

    /// Dirty property definitions, in first-write order.
    #[must_use]
    pub fn changed_properties(&self) -> Vec<&PropertyDefinition> {
        let properties = self.schema.properties();
        self.dirty.iter().map(|&index| &properties[index]).collect()
    }

    /// Dirty properties with their current values, in first-write order.
    pub fn changes(&self) -> impl Iterator<Item = (&PropertyDefinition, &PropertyValue)> {
        let properties = self.schema.properties();
        self.dirty.iter().filter_map(move |&index| {
            self.values[index]
                .as_ref()
                .map(|value| (&properties[index], value))
        })
    }

    /// Forgets which properties were written; values are kept.
    pub fn reset_change_tracking(&mut self) {
        self.dirty.clear();
    }

    /// Drops every value and the dirty list.
    pub fn clear(&mut self) {
        self.values.iter_mut().for_each(|slot| *slot = None);
        self.dirty.clear();
    }

    /// Populated properties in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (&PropertyDefinition, &PropertyValue)> {
        self.schema
            .properties()
            .iter()
            .zip(&self.values)
            .filter_map(|(property, slot)| slot.as_ref().map(|value| (property, value)))
    }

    /// Number of populated properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.iter().filter(|slot| slot.is_some()).count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.iter().all(Option::is_none)
    }
}
