#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Hexfall combat simulation.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative arena world, and the Hex systems. Adapters submit [`Command`]
//! values describing desired mutations, the world executes those commands via
//! its `apply` entry point, and then broadcasts [`Event`] values describing
//! what happened. The [`hex`] module holds the per-entity Hex status record
//! that every damageable entity embeds.

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub mod hex;

pub use hex::HexStatus;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Replaces the arena tuning used for subsequent strikes and detonations.
    ConfigureArena {
        /// Radius of the area hit by a death detonation, in world units.
        detonation_radius: f32,
        /// Global multiplier applied to strike damage before it reaches health.
        incoming_damage_scale: f32,
        /// Global multiplier applied to the health of newly spawned entities.
        spawn_health_scale: f32,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests that a new damageable entity join the arena.
    SpawnEntity {
        /// Location of the entity in world units.
        position: Position,
        /// Starting and maximum health of the entity.
        health: f32,
        /// Whether the entity ignores health loss.
        invincible: bool,
    },
    /// Delivers a hit through the damage pipeline.
    Strike {
        /// Entity receiving the hit.
        target: EntityId,
        /// Base damage carried by the hit before Hex modifiers.
        damage: f32,
        /// Hex stacks carried by the hit. Zero for plain attacks.
        hex_stacks: u8,
    },
    /// Applies Hex stacks to an entity without dealing damage.
    ApplyHex {
        /// Entity receiving the stacks.
        target: EntityId,
        /// Number of stacks to apply.
        stacks: u8,
    },
    /// Removes an entity from the arena without a death or detonation.
    DespawnEntity {
        /// Entity to remove.
        entity: EntityId,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that an entity joined the arena.
    EntitySpawned {
        /// Identifier assigned to the entity.
        entity: EntityId,
        /// Location of the entity.
        position: Position,
        /// Starting health of the entity.
        health: f32,
    },
    /// Reports Hex stacks landing on an entity.
    HexApplied {
        /// Entity that received the stacks.
        entity: EntityId,
        /// Stack count after the application.
        stacks: u8,
        /// Whether the entity was already capped before the application.
        overflow: bool,
    },
    /// Reports that a Hex stack decayed.
    HexDecayed {
        /// Entity that lost a stack.
        entity: EntityId,
        /// Stack count after the decay.
        stacks: u8,
    },
    /// Reports health lost by an entity.
    EntityDamaged {
        /// Entity that took damage.
        entity: EntityId,
        /// Health removed by the hit after all modifiers.
        amount: f32,
        /// Health remaining after the hit.
        remaining: f32,
    },
    /// Announces that an entity's health reached zero and it left the arena.
    EntityDied {
        /// Entity that died.
        entity: EntityId,
        /// Position the entity occupied when it died.
        position: Position,
        /// Hex stacks carried at the moment of death.
        hex_stacks: u8,
    },
    /// Announces a death detonation.
    HexDetonated {
        /// Entity whose death caused the detonation.
        origin: EntityId,
        /// Centre of the blast.
        position: Position,
        /// Stacks handed to every entity caught in the blast.
        stacks: u8,
        /// Burst damage dealt to every entity caught in the blast.
        damage: f32,
    },
    /// Confirms that an entity was removed without dying.
    EntityDespawned {
        /// Entity that was removed.
        entity: EntityId,
    },
    /// Reports that a strike could not be delivered.
    StrikeRejected {
        /// Entity targeted by the request.
        target: EntityId,
        /// Specific reason the request failed.
        reason: CommandError,
    },
    /// Reports that Hex stacks could not be applied.
    HexRejected {
        /// Entity targeted by the request.
        target: EntityId,
        /// Specific reason the request failed.
        reason: CommandError,
    },
    /// Reports that an entity could not join the arena.
    SpawnRejected {
        /// Location requested for the entity.
        position: Position,
        /// Specific reason the request failed.
        reason: CommandError,
    },
    /// Reports that a despawn request could not be honoured.
    DespawnRejected {
        /// Entity targeted by the request.
        entity: EntityId,
        /// Specific reason the request failed.
        reason: CommandError,
    },
}

/// Reasons a command targeting an entity may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error)]
pub enum CommandError {
    /// No live entity with the provided identifier exists.
    #[error("entity is not present in the arena")]
    MissingEntity,
    /// The requested starting health was not a positive finite number.
    #[error("spawn health must be a positive, finite number")]
    InvalidHealth,
    /// Every entity identifier has already been allocated.
    #[error("no entity identifiers remain")]
    IdentifiersExhausted,
}

/// Unique identifier assigned to a damageable entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(u32);

impl EntityId {
    /// Creates a new entity identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Continuous location expressed in world units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    x: f32,
    y: f32,
}

impl Position {
    /// Creates a new position from its components.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal component.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical component.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Euclidean distance between two positions.
    #[must_use]
    pub fn distance(self, other: Position) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Reports whether `other` lies within `radius` of this position, inclusive.
    #[must_use]
    pub fn within(self, other: Position, radius: f32) -> bool {
        self.distance(other) <= radius
    }
}

/// Immutable representation of a single entity's state used for queries.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EntitySnapshot {
    /// Unique identifier assigned to the entity.
    pub id: EntityId,
    /// Location of the entity.
    pub position: Position,
    /// Health remaining.
    pub health: f32,
    /// Health the entity spawned with.
    pub max_health: f32,
    /// Whether the entity ignores health loss.
    pub invincible: bool,
    /// Hex stacks currently applied.
    pub hex_stacks: u8,
    /// Multiplier applied to damage the entity takes.
    pub damage_multiplier: f32,
    /// Multiplier the movement layer applies to the entity's speed.
    pub speed_multiplier: f32,
}

/// Read-only snapshot describing all entities within the arena.
#[derive(Clone, Debug, Default)]
pub struct EntityView {
    snapshots: Vec<EntitySnapshot>,
}

impl EntityView {
    /// Creates a new entity view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EntitySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &EntitySnapshot> {
        self.snapshots.iter()
    }

    /// Looks up the snapshot for a single entity.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&EntitySnapshot> {
        self.snapshots
            .binary_search_by_key(&id, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Number of entities captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view captured no entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EntitySnapshot> {
        self.snapshots
    }
}
