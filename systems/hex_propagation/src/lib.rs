#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Death-triggered Hex detonation and its chain reactions.
//!
//! When an afflicted entity dies its remaining stacks detonate: every live
//! entity within the blast radius takes burst damage and receives the same
//! number of stacks. Entities killed by the burst detonate in turn. The whole
//! cascade resolves synchronously and shares a single [`VisitedSet`], so an
//! entity is struck at most once per cascade and the process terminates after
//! at most one detonation per entity in the arena.
//!
//! The propagator owns no entity state. It talks to the surrounding simulation
//! through the [`HexArena`] trait, which supplies the spatial query and applies
//! strikes to the entities it owns.

use std::collections::BTreeSet;

use hexfall_core::{hex::detonation_damage_for, EntityId, Position};

/// Spatial and damage interface the propagator needs from the simulation.
pub trait HexArena {
    /// Returns every live damageable entity within `radius` of `position`.
    fn query_within_radius(&self, position: Position, radius: f32) -> Vec<EntityId>;

    /// Deals `damage` to `entity` and applies `stacks` Hex stacks to it.
    ///
    /// Returns `None` when the entity is no longer part of the arena. An entity
    /// whose health reaches zero must be removed from the live population
    /// before this returns, and reported with `died` set.
    fn strike(&mut self, entity: EntityId, damage: f32, stacks: u8) -> Option<StrikeOutcome>;

    /// Called once per detonation, before any entity it reaches is struck.
    fn detonated(&mut self, _detonation: &DetonationRecord) {}
}

/// Result of striking a single entity with a detonation burst.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrikeOutcome {
    /// Position of the struck entity.
    pub position: Position,
    /// Stack count carried by the entity after the burst's stacks landed.
    pub stacks: u8,
    /// Whether the burst killed the entity.
    pub died: bool,
}

/// Entities already consumed by the current cascade.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VisitedSet {
    entities: BTreeSet<EntityId>,
}

impl VisitedSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an entity, returning `false` when it was already present.
    pub fn insert(&mut self, entity: EntityId) -> bool {
        self.entities.insert(entity)
    }

    /// Reports whether the entity was already consumed.
    #[must_use]
    pub fn contains(&self, entity: EntityId) -> bool {
        self.entities.contains(&entity)
    }

    /// Number of consumed entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Reports whether no entity was consumed yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Iterator over consumed entities in ascending identifier order.
    pub fn iter(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entities.iter().copied()
    }
}

/// Single detonation resolved during a cascade.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DetonationRecord {
    /// Entity whose death caused the detonation, when known.
    pub origin: Option<EntityId>,
    /// Centre of the blast.
    pub position: Position,
    /// Stacks handed to every struck entity.
    pub stacks: u8,
    /// Burst damage dealt to every struck entity.
    pub damage: f32,
}

/// Single strike delivered during a cascade.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrikeRecord {
    /// Entity that was struck.
    pub entity: EntityId,
    /// Burst damage delivered.
    pub damage: f32,
    /// Stack count carried by the entity after the strike.
    pub stacks: u8,
    /// Whether the strike killed the entity.
    pub died: bool,
}

/// Ordered account of everything a cascade did.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CascadeReport {
    detonations: Vec<DetonationRecord>,
    strikes: Vec<StrikeRecord>,
}

impl CascadeReport {
    /// Detonations in the order they were resolved, starting with the root.
    #[must_use]
    pub fn detonations(&self) -> &[DetonationRecord] {
        &self.detonations
    }

    /// Strikes in the order they were delivered.
    #[must_use]
    pub fn strikes(&self) -> &[StrikeRecord] {
        &self.strikes
    }

    /// Entities killed by the cascade, excluding the entity that started it.
    pub fn deaths(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.strikes
            .iter()
            .filter(|strike| strike.died)
            .map(|strike| strike.entity)
    }
}

/// Resolves death detonations against a [`HexArena`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HexPropagator {
    radius: f32,
}

struct Frame {
    damage: f32,
    stacks: u8,
    pending: std::vec::IntoIter<EntityId>,
}

impl HexPropagator {
    /// Creates a propagator whose blasts reach `radius` world units.
    #[must_use]
    pub const fn new(radius: f32) -> Self {
        Self { radius }
    }

    /// Radius covered by each blast.
    #[must_use]
    pub const fn radius(&self) -> f32 {
        self.radius
    }

    /// Starts a fresh cascade for the entity that just died.
    ///
    /// The dying entity is recorded as visited before anything is struck, so it
    /// can never be hit by a detonation it caused.
    pub fn cascade<A: HexArena>(
        &self,
        arena: &mut A,
        origin: EntityId,
        position: Position,
        stacks: u8,
    ) -> (CascadeReport, VisitedSet) {
        let mut visited = VisitedSet::new();
        let _ = visited.insert(origin);
        let report = self.resolve(arena, Some(origin), position, stacks, &mut visited);
        (report, visited)
    }

    /// Detonates `stacks` at `position`, recording every consumed entity in
    /// `visited` and following every death it causes.
    pub fn detonate<A: HexArena>(
        &self,
        arena: &mut A,
        position: Position,
        stacks: u8,
        visited: &mut VisitedSet,
    ) -> CascadeReport {
        self.resolve(arena, None, position, stacks, visited)
    }

    fn resolve<A: HexArena>(
        &self,
        arena: &mut A,
        origin: Option<EntityId>,
        position: Position,
        stacks: u8,
        visited: &mut VisitedSet,
    ) -> CascadeReport {
        let mut report = CascadeReport::default();
        let mut frames = Vec::new();
        self.open(arena, origin, position, stacks, visited, &mut report, &mut frames);

        // Depth-first, so nested blasts resolve before the outer blast moves on.
        while let Some(frame) = frames.last_mut() {
            let Some(entity) = frame.pending.next() else {
                let _ = frames.pop();
                continue;
            };
            let (damage, stacks) = (frame.damage, frame.stacks);

            if !visited.insert(entity) {
                continue;
            }

            let Some(outcome) = arena.strike(entity, damage, stacks) else {
                continue;
            };
            tracing::trace!(
                entity = entity.get(),
                damage,
                stacks = outcome.stacks,
                died = outcome.died,
                "hex burst struck entity"
            );
            report.strikes.push(StrikeRecord {
                entity,
                damage,
                stacks: outcome.stacks,
                died: outcome.died,
            });

            if outcome.died {
                self.open(
                    arena,
                    Some(entity),
                    outcome.position,
                    outcome.stacks,
                    visited,
                    &mut report,
                    &mut frames,
                );
            }
        }

        report
    }

    #[allow(clippy::too_many_arguments)]
    fn open<A: HexArena>(
        &self,
        arena: &mut A,
        origin: Option<EntityId>,
        position: Position,
        stacks: u8,
        visited: &VisitedSet,
        report: &mut CascadeReport,
        frames: &mut Vec<Frame>,
    ) {
        let damage = detonation_damage_for(stacks);
        let detonation = DetonationRecord {
            origin,
            position,
            stacks,
            damage,
        };
        arena.detonated(&detonation);
        report.detonations.push(detonation);

        if stacks == 0 {
            return;
        }

        let targets: Vec<EntityId> = arena
            .query_within_radius(position, self.radius)
            .into_iter()
            .filter(|entity| !visited.contains(*entity))
            .collect();

        frames.push(Frame {
            damage,
            stacks,
            pending: targets.into_iter(),
        });
    }
}
