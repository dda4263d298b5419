#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative arena state management for Hexfall.
//!
//! The world owns every damageable entity together with its embedded
//! [`HexStatus`](hexfall_core::HexStatus). It runs the damage pipeline for
//! strikes, decays Hex stacks on every tick, and handles deaths by
//! snapshotting the dying entity's stacks, removing it, and resolving the
//! resulting detonation cascade before the command that caused the death
//! returns.

use std::time::Duration;

use hexfall_core::{Command, CommandError, EntityId, Event, Position};
use hexfall_system_hex_propagation::HexPropagator;

mod arena;
mod combat;
mod entities;

use arena::CascadeArena;
use entities::EntityRegistry;

/// Default radius of a death detonation, in world units.
pub const DEFAULT_DETONATION_RADIUS: f32 = 2.5;

/// Default global multiplier applied to strike and burst damage.
pub const DEFAULT_INCOMING_DAMAGE_SCALE: f32 = 1.0;

/// Default global multiplier applied to spawn health.
pub const DEFAULT_SPAWN_HEALTH_SCALE: f32 = 1.0;

/// Tuning values that shape strikes and detonations.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArenaConfig {
    detonation_radius: f32,
    incoming_damage_scale: f32,
    spawn_health_scale: f32,
}

impl ArenaConfig {
    /// Creates a configuration, replacing non-finite or negative values with
    /// the defaults. The spawn health scale must also be non-zero.
    #[must_use]
    pub fn new(
        detonation_radius: f32,
        incoming_damage_scale: f32,
        spawn_health_scale: f32,
    ) -> Self {
        let spawn_health_scale = if spawn_health_scale > 0.0 {
            sanitize(spawn_health_scale, DEFAULT_SPAWN_HEALTH_SCALE)
        } else {
            DEFAULT_SPAWN_HEALTH_SCALE
        };
        Self {
            detonation_radius: sanitize(detonation_radius, DEFAULT_DETONATION_RADIUS),
            incoming_damage_scale: sanitize(incoming_damage_scale, DEFAULT_INCOMING_DAMAGE_SCALE),
            spawn_health_scale,
        }
    }

    /// Radius of a death detonation, in world units.
    #[must_use]
    pub const fn detonation_radius(&self) -> f32 {
        self.detonation_radius
    }

    /// Global multiplier applied to strike and burst damage.
    #[must_use]
    pub const fn incoming_damage_scale(&self) -> f32 {
        self.incoming_damage_scale
    }

    /// Global multiplier applied to the health of newly spawned entities.
    #[must_use]
    pub const fn spawn_health_scale(&self) -> f32 {
        self.spawn_health_scale
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            detonation_radius: DEFAULT_DETONATION_RADIUS,
            incoming_damage_scale: DEFAULT_INCOMING_DAMAGE_SCALE,
            spawn_health_scale: DEFAULT_SPAWN_HEALTH_SCALE,
        }
    }
}

fn sanitize(value: f32, fallback: f32) -> f32 {
    if value.is_finite() && value >= 0.0 {
        value
    } else {
        fallback
    }
}

/// Represents the authoritative Hexfall arena state.
#[derive(Debug)]
pub struct World {
    config: ArenaConfig,
    clock: Duration,
    entities: EntityRegistry,
    kills: u64,
    tick_index: u64,
}

impl World {
    /// Creates an empty arena using the default tuning.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ArenaConfig::default())
    }

    /// Creates an empty arena using the provided tuning.
    #[must_use]
    pub fn with_config(config: ArenaConfig) -> Self {
        Self {
            config,
            clock: Duration::ZERO,
            entities: EntityRegistry::new(),
            kills: 0,
            tick_index: 0,
        }
    }

    fn spawn(
        &mut self,
        position: Position,
        health: f32,
        invincible: bool,
        out_events: &mut Vec<Event>,
    ) {
        let health = health * self.config.spawn_health_scale;
        if !health.is_finite() || health <= 0.0 {
            out_events.push(Event::SpawnRejected {
                position,
                reason: CommandError::InvalidHealth,
            });
            return;
        }

        match self.entities.spawn(position, health, invincible) {
            Some(entity) => out_events.push(Event::EntitySpawned {
                entity,
                position,
                health,
            }),
            None => {
                tracing::warn!("entity identifiers exhausted, rejecting spawn");
                out_events.push(Event::SpawnRejected {
                    position,
                    reason: CommandError::IdentifiersExhausted,
                });
            }
        }
    }

    fn decay_hex(&mut self, out_events: &mut Vec<Event>) {
        let now = self.clock;
        for entity in self.entities.iter_mut() {
            if entity.hex.tick(now) {
                tracing::trace!(
                    entity = entity.id.get(),
                    stacks = entity.hex.stacks(),
                    "hex stack decayed"
                );
                out_events.push(Event::HexDecayed {
                    entity: entity.id,
                    stacks: entity.hex.stacks(),
                });
            }
        }
    }

    fn strike(&mut self, target: EntityId, damage: f32, hex_stacks: u8, out_events: &mut Vec<Event>) {
        let scale = self.config.incoming_damage_scale;
        let now = self.clock;
        let Some(entity) = self.entities.get_mut(target) else {
            reject_strike(target, out_events);
            return;
        };

        let resolution = combat::resolve_strike(entity, damage, hex_stacks, scale, now);
        if resolution.applied_hex {
            out_events.push(Event::HexApplied {
                entity: target,
                stacks: resolution.stacks,
                overflow: resolution.overflow,
            });
        }
        if resolution.damage > 0.0 {
            out_events.push(Event::EntityDamaged {
                entity: target,
                amount: resolution.damage,
                remaining: entity.health,
            });
        }

        if entity.is_dead() {
            self.kill(target, out_events);
        }
    }

    fn kill(&mut self, target: EntityId, out_events: &mut Vec<Event>) {
        let Some(dying) = self.entities.remove(target) else {
            return;
        };
        let stacks = dying.hex.stacks();
        self.kills = self.kills.saturating_add(1);
        out_events.push(Event::EntityDied {
            entity: target,
            position: dying.position,
            hex_stacks: stacks,
        });

        let propagator = HexPropagator::new(self.config.detonation_radius);
        let mut arena = CascadeArena {
            entities: &mut self.entities,
            now: self.clock,
            damage_scale: self.config.incoming_damage_scale,
            kills: &mut self.kills,
            out_events,
        };
        let (report, visited) = propagator.cascade(&mut arena, target, dying.position, stacks);

        tracing::debug!(
            origin = target.get(),
            stacks,
            detonations = report.detonations().len(),
            strikes = report.strikes().len(),
            deaths = report.deaths().count(),
            visited = visited.len(),
            "hex cascade resolved"
        );
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

fn reject_strike(target: EntityId, out_events: &mut Vec<Event>) {
    tracing::trace!(target = target.get(), "rejected strike for missing entity");
    out_events.push(Event::StrikeRejected {
        target,
        reason: CommandError::MissingEntity,
    });
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureArena {
            detonation_radius,
            incoming_damage_scale,
            spawn_health_scale,
        } => {
            world.config =
                ArenaConfig::new(detonation_radius, incoming_damage_scale, spawn_health_scale);
        }
        Command::Tick { dt } => {
            world.tick_index = world.tick_index.saturating_add(1);
            world.clock = world.clock.saturating_add(dt);
            out_events.push(Event::TimeAdvanced { dt });
            world.decay_hex(out_events);
        }
        Command::SpawnEntity {
            position,
            health,
            invincible,
        } => world.spawn(position, health, invincible, out_events),
        Command::Strike {
            target,
            damage,
            hex_stacks,
        } => world.strike(target, damage, hex_stacks, out_events),
        Command::ApplyHex { target, stacks } => {
            let now = world.clock;
            let Some(entity) = world.entities.get_mut(target) else {
                out_events.push(Event::HexRejected {
                    target,
                    reason: CommandError::MissingEntity,
                });
                return;
            };
            if stacks == 0 {
                return;
            }
            let overflow = entity.hex.apply_with_overflow(stacks, now);
            out_events.push(Event::HexApplied {
                entity: target,
                stacks: entity.hex.stacks(),
                overflow,
            });
        }
        Command::DespawnEntity { entity } => {
            if world.entities.remove(entity).is_some() {
                out_events.push(Event::EntityDespawned { entity });
            } else {
                out_events.push(Event::DespawnRejected {
                    entity,
                    reason: CommandError::MissingEntity,
                });
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use hexfall_core::{EntityId, EntityView, HexStatus};

    use super::{ArenaConfig, World};

    /// Current simulation time.
    #[must_use]
    pub fn clock(world: &World) -> Duration {
        world.clock
    }

    /// Number of ticks processed so far.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Tuning currently applied to strikes and detonations.
    #[must_use]
    pub fn config(world: &World) -> ArenaConfig {
        world.config
    }

    /// Captures a read-only view of the live entities.
    #[must_use]
    pub fn entity_view(world: &World) -> EntityView {
        EntityView::from_snapshots(world.entities.iter().map(|entity| entity.snapshot()).collect())
    }

    /// Hex status of a live entity.
    #[must_use]
    pub fn hex_status(world: &World, entity: EntityId) -> Option<HexStatus> {
        world.entities.get(entity).map(|entity| entity.hex)
    }

    /// Number of live entities.
    #[must_use]
    pub fn entity_count(world: &World) -> usize {
        world.entities.len()
    }

    /// Number of entities that died since the world was created.
    #[must_use]
    pub fn entities_killed(world: &World) -> u64 {
        world.kills
    }
}

/// Convenience used by adapters to place an entity and learn its identifier.
///
/// Returns `None` if the world did not report a spawn.
pub fn spawn(
    world: &mut World,
    position: Position,
    health: f32,
    invincible: bool,
    out_events: &mut Vec<Event>,
) -> Option<EntityId> {
    let before = out_events.len();
    apply(
        world,
        Command::SpawnEntity {
            position,
            health,
            invincible,
        },
        out_events,
    );
    out_events[before..].iter().find_map(|event| match event {
        Event::EntitySpawned { entity, .. } => Some(*entity),
        _ => None,
    })
}
