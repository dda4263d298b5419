//! Binds the world's entity registry to the Hex propagator.

use std::time::Duration;

use hexfall_core::{EntityId, Event, Position};
use hexfall_system_hex_propagation::{DetonationRecord, HexArena, StrikeOutcome};

use crate::entities::EntityRegistry;

/// Mutable view of the world used while a cascade resolves.
///
/// Entities killed by a burst leave the registry immediately, so later spatial
/// queries in the same cascade never return them. Burst damage goes through the
/// incoming damage scale but not the victim's Hex multiplier.
pub(crate) struct CascadeArena<'a> {
    pub(crate) entities: &'a mut EntityRegistry,
    pub(crate) now: Duration,
    pub(crate) damage_scale: f32,
    pub(crate) kills: &'a mut u64,
    pub(crate) out_events: &'a mut Vec<Event>,
}

impl HexArena for CascadeArena<'_> {
    fn query_within_radius(&self, position: Position, radius: f32) -> Vec<EntityId> {
        self.entities.within_radius(position, radius)
    }

    fn strike(&mut self, entity: EntityId, damage: f32, stacks: u8) -> Option<StrikeOutcome> {
        let target = self.entities.get_mut(entity)?;

        let amount = target.take_damage(damage * self.damage_scale);
        let overflow = target.hex.apply_with_overflow(stacks, self.now);
        let position = target.position;
        let stacks_after = target.hex.stacks();
        let remaining = target.health;
        let died = target.is_dead();

        self.out_events.push(Event::HexApplied {
            entity,
            stacks: stacks_after,
            overflow,
        });
        if amount > 0.0 {
            self.out_events.push(Event::EntityDamaged {
                entity,
                amount,
                remaining,
            });
        }

        if died {
            let _ = self.entities.remove(entity);
            *self.kills = self.kills.saturating_add(1);
            self.out_events.push(Event::EntityDied {
                entity,
                position,
                hex_stacks: stacks_after,
            });
        }

        Some(StrikeOutcome {
            position,
            stacks: stacks_after,
            died,
        })
    }

    fn detonated(&mut self, detonation: &DetonationRecord) {
        let Some(origin) = detonation.origin else {
            return;
        };
        self.out_events.push(Event::HexDetonated {
            origin,
            position: detonation.position,
            stacks: detonation.stacks,
            damage: detonation.damage,
        });
    }
}
