//! Authoritative damageable entity storage.

use std::collections::BTreeMap;

use hexfall_core::{EntityId, EntitySnapshot, HexStatus, Position};

/// Damageable entity stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct Entity {
    /// Identifier allocated by the world for the entity.
    pub(crate) id: EntityId,
    /// Location of the entity in world units.
    pub(crate) position: Position,
    /// Health remaining.
    pub(crate) health: f32,
    /// Health the entity spawned with.
    pub(crate) max_health: f32,
    /// Whether the entity ignores health loss.
    pub(crate) invincible: bool,
    /// Hex affliction carried by the entity.
    pub(crate) hex: HexStatus,
}

impl Entity {
    /// Removes health unless the entity is invincible, returning the amount lost.
    pub(crate) fn take_damage(&mut self, amount: f32) -> f32 {
        if self.invincible || amount <= 0.0 {
            return 0.0;
        }
        self.health -= amount;
        amount
    }

    pub(crate) fn is_dead(&self) -> bool {
        !self.invincible && self.health <= 0.0
    }

    pub(crate) fn snapshot(&self) -> EntitySnapshot {
        EntitySnapshot {
            id: self.id,
            position: self.position,
            health: self.health,
            max_health: self.max_health,
            invincible: self.invincible,
            hex_stacks: self.hex.stacks(),
            damage_multiplier: self.hex.damage_multiplier(),
            speed_multiplier: self.hex.speed_multiplier(),
        }
    }
}

/// Registry that stores live entities and manages identifier allocation.
#[derive(Debug)]
pub(crate) struct EntityRegistry {
    entries: BTreeMap<EntityId, Entity>,
    next_entity_id: Option<EntityId>,
}

impl EntityRegistry {
    /// Creates an empty registry with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_entity_id: Some(EntityId::new(0)),
        }
    }

    /// Inserts a fresh unafflicted entity and returns its identifier.
    ///
    /// Returns `None` once every identifier has been handed out.
    pub(crate) fn spawn(
        &mut self,
        position: Position,
        health: f32,
        invincible: bool,
    ) -> Option<EntityId> {
        let id = self.next_entity_id?;
        self.next_entity_id = id.get().checked_add(1).map(EntityId::new);
        let _ = self.entries.insert(
            id,
            Entity {
                id,
                position,
                health,
                max_health: health,
                invincible,
                hex: HexStatus::new(),
            },
        );
        Some(id)
    }

    pub(crate) fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entries.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entries.get_mut(&id)
    }

    pub(crate) fn remove(&mut self, id: EntityId) -> Option<Entity> {
        self.entries.remove(&id)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entries.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entries.values_mut()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Identifiers of live entities within `radius` of `position`, ascending.
    pub(crate) fn within_radius(&self, position: Position, radius: f32) -> Vec<EntityId> {
        self.entries
            .values()
            .filter(|entity| entity.position.within(position, radius))
            .map(|entity| entity.id)
            .collect()
    }
}
