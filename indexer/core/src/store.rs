use std::{collections::BTreeMap, fmt};

use error_stack::{Result, ResultExt};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::event::EventPosition;

#[derive(Debug)]
pub struct EntityStoreError;

/// A context for the store write.
#[derive(Debug, Clone, Copy, Default)]
pub struct Context {
    /// Position of the log being handled.
    pub position: EventPosition,
}

/// A record persisted in the entity store.
pub trait Entity: Serialize + DeserializeOwned {
    /// The entity type name, e.g. `StickerDesign`.
    const KIND: &'static str;

    /// The entity id, unique within its kind.
    fn id(&self) -> &str;
}

/// A keyed entity storage interface.
///
/// Entities are stored as json objects, grouped by kind.
pub trait EntityStore {
    /// Get the entity with the given kind and id.
    fn get(&mut self, kind: &str, id: &str) -> Result<Option<Value>, EntityStoreError>;

    /// Create or replace the entity with the given kind and id.
    fn set(
        &mut self,
        ctx: &Context,
        kind: &str,
        id: &str,
        value: &Value,
    ) -> Result<(), EntityStoreError>;

    /// Get the entity of the given kind whose top-level `field` is equal to `value`, written
    /// by the last log strictly before `before`.
    ///
    /// Write order does not matter, so handling a log again sees the same entity.
    fn latest_by(
        &mut self,
        kind: &str,
        field: &str,
        value: &Value,
        before: EventPosition,
    ) -> Result<Option<Value>, EntityStoreError>;

    /// Number of entities of the given kind.
    fn count(&mut self, kind: &str) -> Result<usize, EntityStoreError>;
}

/// Typed access to an [EntityStore].
pub trait EntityStoreExt: EntityStore {
    fn load<E: Entity>(&mut self, id: &str) -> Result<Option<E>, EntityStoreError> {
        let Some(value) = self.get(E::KIND, id)? else {
            return Ok(None);
        };
        decode(value).map(Some)
    }

    fn load_latest_by<E: Entity>(
        &mut self,
        field: &str,
        value: &Value,
        before: EventPosition,
    ) -> Result<Option<E>, EntityStoreError> {
        let Some(value) = self.latest_by(E::KIND, field, value, before)? else {
            return Ok(None);
        };
        decode(value).map(Some)
    }

    fn save<E: Entity>(&mut self, ctx: &Context, entity: &E) -> Result<(), EntityStoreError> {
        let value = serde_json::to_value(entity)
            .change_context(EntityStoreError)
            .attach_printable_lazy(|| format!("failed to serialize {} entity", E::KIND))?;
        self.set(ctx, E::KIND, entity.id(), &value)
    }
}

impl<S: EntityStore + ?Sized> EntityStoreExt for S {}

fn decode<E: Entity>(value: Value) -> Result<E, EntityStoreError> {
    serde_json::from_value(value)
        .change_context(EntityStoreError)
        .attach_printable_lazy(|| format!("failed to deserialize {} entity", E::KIND))
}

/// An in-memory entity store.
#[derive(Debug, Default)]
pub struct MemoryEntityStore {
    entities: BTreeMap<(String, String), StoredEntity>,
}

#[derive(Debug)]
struct StoredEntity {
    position: EventPosition,
    value: Value,
}

impl MemoryEntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the block number of the last write to the entity.
    pub fn block_number(&self, kind: &str, id: &str) -> Option<u64> {
        self.entities
            .get(&(kind.to_string(), id.to_string()))
            .map(|stored| stored.position.block_number)
    }

    /// Iterate over all entities of the given kind, ordered by id.
    pub fn iter_kind<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = (&'a str, &'a Value)> {
        self.entities
            .iter()
            .filter(move |((k, _), _)| k == kind)
            .map(|((_, id), stored)| (id.as_str(), &stored.value))
    }
}

impl EntityStore for MemoryEntityStore {
    fn get(&mut self, kind: &str, id: &str) -> Result<Option<Value>, EntityStoreError> {
        let value = self
            .entities
            .get(&(kind.to_string(), id.to_string()))
            .map(|stored| stored.value.clone());
        Ok(value)
    }

    fn set(
        &mut self,
        ctx: &Context,
        kind: &str,
        id: &str,
        value: &Value,
    ) -> Result<(), EntityStoreError> {
        let stored = StoredEntity {
            position: ctx.position,
            value: value.clone(),
        };
        self.entities.insert((kind.to_string(), id.to_string()), stored);
        Ok(())
    }

    fn latest_by(
        &mut self,
        kind: &str,
        field: &str,
        value: &Value,
        before: EventPosition,
    ) -> Result<Option<Value>, EntityStoreError> {
        let latest = self
            .entities
            .iter()
            .filter(|((k, _), stored)| {
                k == kind && stored.position < before && stored.value.get(field) == Some(value)
            })
            .max_by_key(|(_, stored)| stored.position)
            .map(|(_, stored)| stored.value.clone());
        Ok(latest)
    }

    fn count(&mut self, kind: &str) -> Result<usize, EntityStoreError> {
        Ok(self.iter_kind(kind).count())
    }
}

impl error_stack::Context for EntityStoreError {}

impl fmt::Display for EntityStoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entity store error")
    }
}
