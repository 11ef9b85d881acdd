//! Registry of actors spawned into the world.

use underworld_core::{EntityId, EntityKind, PixelPoint, WorldError};

/// Actor registered with the world.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entity {
    id: EntityId,
    kind: EntityKind,
    name: String,
    position: PixelPoint,
}

impl Entity {
    /// Identifier allocated by the registry.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Kind of actor.
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Name tag assigned at spawn time.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Pixel position the entity was spawned at.
    #[must_use]
    pub const fn position(&self) -> PixelPoint {
        self.position
    }
}

/// Append-only registry that stores entities in spawn order and allocates identifiers.
#[derive(Clone, Debug)]
pub struct EntityRegistry {
    entries: Vec<Entity>,
    next_entity_id: EntityId,
}

impl EntityRegistry {
    /// Creates an empty registry with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_entity_id: EntityId::new(0),
        }
    }

    #[cfg(test)]
    pub(crate) fn starting_at(next_entity_id: EntityId) -> Self {
        Self {
            entries: Vec::new(),
            next_entity_id,
        }
    }

    /// Number of identifiers that can still be allocated.
    pub(crate) fn remaining_ids(&self) -> u64 {
        u64::from(u32::MAX - self.next_entity_id.get())
    }

    /// Registers a new entity and returns the identifier allocated for it.
    ///
    /// Fails once the identifier space is exhausted.
    pub(crate) fn spawn(
        &mut self,
        kind: EntityKind,
        position: PixelPoint,
    ) -> Result<EntityId, WorldError> {
        let id = self.next_entity_id;
        let next = id.get().checked_add(1).ok_or_else(|| {
            WorldError::InvalidArgument("entity identifiers exhausted".to_owned())
        })?;
        self.next_entity_id = EntityId::new(next);
        self.entries.push(Entity {
            id,
            kind,
            name: kind.name_tag().to_owned(),
            position,
        });
        Ok(id)
    }

    /// Number of registered entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Reports whether no entity has been spawned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Retrieves the entity at the provided registry position.
    pub fn get(&self, index: i64) -> Result<&Entity, WorldError> {
        usize::try_from(index)
            .ok()
            .and_then(|position| self.entries.get(position))
            .ok_or(WorldError::OutOfRange {
                index,
                len: self.entries.len(),
            })
    }

    /// Looks up an entity by identifier.
    #[must_use]
    pub fn find(&self, id: EntityId) -> Option<&Entity> {
        self.entries.iter().find(|entity| entity.id == id)
    }

    /// Iterates over entities in spawn order.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_starts_empty_with_zero_identifier() {
        let registry = EntityRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.next_entity_id.get(), 0);
    }

    #[test]
    fn spawn_allocates_sequential_identifiers() {
        let mut registry = EntityRegistry::new();
        let first = registry
            .spawn(EntityKind::Zombie, PixelPoint::new(1, 2))
            .expect("identifiers available");
        let second = registry
            .spawn(EntityKind::Zombie, PixelPoint::new(1, 2))
            .expect("identifiers available");
        assert_eq!(first.get(), 0);
        assert_eq!(second.get(), 1);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.find(second).map(Entity::name), Some("Zombie"));
    }

    #[test]
    fn get_rejects_negative_and_past_end_positions() {
        let mut registry = EntityRegistry::new();
        let _ = registry
            .spawn(EntityKind::Zombie, PixelPoint::default())
            .expect("identifiers available");
        assert!(registry.get(0).is_ok());
        assert_eq!(
            registry.get(1),
            Err(WorldError::OutOfRange { index: 1, len: 1 })
        );
        assert_eq!(
            registry.get(-1),
            Err(WorldError::OutOfRange { index: -1, len: 1 })
        );
    }

    #[test]
    fn spawn_refuses_to_reuse_the_last_identifier() {
        let mut registry = EntityRegistry::starting_at(EntityId::new(u32::MAX - 1));
        assert_eq!(registry.remaining_ids(), 1);

        let last = registry
            .spawn(EntityKind::Zombie, PixelPoint::default())
            .expect("one identifier left");
        assert_eq!(last.get(), u32::MAX - 1);
        assert_eq!(registry.remaining_ids(), 0);
        assert!(matches!(
            registry.spawn(EntityKind::Zombie, PixelPoint::default()),
            Err(WorldError::InvalidArgument(_))
        ));
        assert_eq!(registry.len(), 1);
    }
}
