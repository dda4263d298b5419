//! Damage pipeline applied to direct strikes.

use std::time::Duration;

use crate::entities::Entity;

/// Outcome of a single strike against an entity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct StrikeResolution {
    /// Health removed after all modifiers.
    pub(crate) damage: f32,
    /// Stack count after the strike's stacks landed.
    pub(crate) stacks: u8,
    /// Whether the target was capped before the strike's stacks landed.
    pub(crate) overflow: bool,
    /// Whether the strike carried stacks at all.
    pub(crate) applied_hex: bool,
}

/// Resolves a direct hit.
///
/// Damage is scaled by the target's Hex multiplier as it stood before the hit
/// and by the arena's incoming damage scale. A Hex-carrying hit that lands on
/// a capped target deals double damage.
pub(crate) fn resolve_strike(
    target: &mut Entity,
    damage: f32,
    hex_stacks: u8,
    incoming_damage_scale: f32,
    now: Duration,
) -> StrikeResolution {
    let multiplier = target.hex.damage_multiplier();

    let applied_hex = hex_stacks > 0;
    let overflow = applied_hex && target.hex.apply_with_overflow(hex_stacks, now);

    let mut amount = damage.max(0.0) * multiplier * incoming_damage_scale;
    if overflow {
        amount *= 2.0;
    }

    StrikeResolution {
        damage: target.take_damage(amount),
        stacks: target.hex.stacks(),
        overflow,
        applied_hex,
    }
}
