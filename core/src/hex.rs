//! Stacking Hex debuff carried by every damageable entity.
//!
//! Hex stacks up to [`MAX_STACKS`] times. Each stack increases the damage the
//! afflicted entity takes and slows it down; at the cap the per-stack amount
//! doubles for both modifiers. Stacks fall off one at a time once
//! [`DECAY_INTERVAL`] elapses without a fresh application. When the afflicted
//! entity dies its remaining stacks detonate, dealing
//! [`DETONATION_DAMAGE_PER_STACK`] per stack to its neighbours and handing the
//! stacks on to them.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Maximum number of stacks an entity can carry.
pub const MAX_STACKS: u8 = 6;

/// Bonus damage taken per stack, expressed as a fraction of incoming damage.
pub const DAMAGE_BONUS_PER_STACK: f32 = 0.05;

/// Movement speed penalty per stack, expressed as a fraction of base speed.
pub const SPEED_PENALTY_PER_STACK: f32 = 0.06;

/// Simulated time a stack survives without a fresh application.
pub const DECAY_INTERVAL: Duration = Duration::from_secs(3);

/// Burst damage dealt per stack when an afflicted entity detonates.
pub const DETONATION_DAMAGE_PER_STACK: f32 = 2.0;

/// Lower bound applied to the speed multiplier.
pub const MIN_SPEED_MULTIPLIER: f32 = 0.1;

/// Per-entity Hex bookkeeping.
///
/// The record is embedded by value inside the entity it afflicts. It holds
/// only the stack count and the simulation time at which the next stack decays;
/// all modifiers are derived from the stack count on demand.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HexStatus {
    stacks: u8,
    next_decay_at: Duration,
}

impl HexStatus {
    /// Creates an unafflicted status.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            stacks: 0,
            next_decay_at: Duration::ZERO,
        }
    }

    /// Number of stacks currently applied.
    #[must_use]
    pub const fn stacks(&self) -> u8 {
        self.stacks
    }

    /// Simulation time at which the next stack falls off.
    #[must_use]
    pub const fn next_decay_at(&self) -> Duration {
        self.next_decay_at
    }

    /// Adds stacks, clamping at [`MAX_STACKS`], and restarts the decay window.
    ///
    /// The decay timer is refreshed even when the entity is already capped, so
    /// repeated hits keep a capped entity at full stacks.
    pub fn apply(&mut self, stacks: u8, now: Duration) {
        self.adjust(i32::from(stacks), now);
    }

    /// Applies stacks like [`HexStatus::apply`] and reports whether the entity
    /// was already capped before the application.
    #[must_use]
    pub fn apply_with_overflow(&mut self, stacks: u8, now: Duration) -> bool {
        let overflow = self.is_at_cap();
        self.apply(stacks, now);
        overflow
    }

    /// Advances decay to `now`, removing at most one stack.
    ///
    /// Returns `true` when a stack was removed.
    pub fn tick(&mut self, now: Duration) -> bool {
        if self.stacks == 0 {
            return false;
        }

        if now < self.next_decay_at {
            return false;
        }

        self.adjust(-1, now);
        true
    }

    /// Multiplier applied to damage taken by the afflicted entity.
    #[must_use]
    pub fn damage_multiplier(&self) -> f32 {
        damage_multiplier_for(self.stacks)
    }

    /// Multiplier applied to the afflicted entity's movement speed.
    #[must_use]
    pub fn speed_multiplier(&self) -> f32 {
        speed_multiplier_for(self.stacks)
    }

    /// Burst damage the entity deals to its neighbours if it dies now.
    #[must_use]
    pub fn detonation_damage(&self) -> f32 {
        detonation_damage_for(self.stacks)
    }

    /// Reports whether the entity carries the maximum number of stacks.
    #[must_use]
    pub const fn is_at_cap(&self) -> bool {
        self.stacks == MAX_STACKS
    }

    fn adjust(&mut self, delta: i32, now: Duration) {
        let next = (i32::from(self.stacks) + delta).clamp(0, i32::from(MAX_STACKS));
        self.stacks = u8::try_from(next).unwrap_or(MAX_STACKS);
        self.next_decay_at = now.saturating_add(DECAY_INTERVAL);
    }
}

/// Damage taken multiplier for the provided stack count.
///
/// At the cap every stack counts twice.
#[must_use]
pub fn damage_multiplier_for(stacks: u8) -> f32 {
    1.0 + DAMAGE_BONUS_PER_STACK * cap_factor(stacks) * f32::from(stacks)
}

/// Movement speed multiplier for the provided stack count, clamped to
/// `[MIN_SPEED_MULTIPLIER, 1.0]`.
#[must_use]
pub fn speed_multiplier_for(stacks: u8) -> f32 {
    let raw = 1.0 - SPEED_PENALTY_PER_STACK * cap_factor(stacks) * f32::from(stacks);
    raw.clamp(MIN_SPEED_MULTIPLIER, 1.0)
}

/// Detonation burst damage for the provided stack count. Never doubled at cap.
#[must_use]
pub fn detonation_damage_for(stacks: u8) -> f32 {
    DETONATION_DAMAGE_PER_STACK * f32::from(stacks)
}

fn cap_factor(stacks: u8) -> f32 {
    if stacks == MAX_STACKS {
        2.0
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    fn at(seconds: u64) -> Duration {
        Duration::from_secs(seconds)
    }

    fn with_stacks(stacks: u8) -> HexStatus {
        let mut status = HexStatus::new();
        if stacks > 0 {
            status.apply(stacks, Duration::ZERO);
        }
        status
    }

    #[test]
    fn new_status_is_unafflicted() {
        let status = HexStatus::new();
        assert_eq!(status.stacks(), 0);
        assert!(!status.is_at_cap());
        assert!((status.damage_multiplier() - 1.0).abs() < EPSILON);
        assert!((status.speed_multiplier() - 1.0).abs() < EPSILON);
        assert!(status.detonation_damage().abs() < EPSILON);
    }

    #[test]
    fn apply_accumulates_and_clamps_at_cap() {
        for previous in 0..=MAX_STACKS {
            for added in 1..=MAX_STACKS {
                let mut status = with_stacks(previous);
                status.apply(added, at(10));
                assert_eq!(
                    status.stacks(),
                    MAX_STACKS.min(previous + added),
                    "previous {previous} + {added}",
                );
                assert_eq!(status.next_decay_at(), at(10) + DECAY_INTERVAL);
            }
        }
    }

    #[test]
    fn apply_at_cap_still_refreshes_decay_window() {
        let mut status = with_stacks(MAX_STACKS);
        assert_eq!(status.next_decay_at(), DECAY_INTERVAL);

        status.apply(1, at(2));

        assert_eq!(status.stacks(), MAX_STACKS);
        assert_eq!(status.next_decay_at(), at(2) + DECAY_INTERVAL);
    }

    #[test]
    fn overflow_reflects_state_before_application() {
        let mut status = with_stacks(5);
        assert!(!status.apply_with_overflow(4, at(1)));
        assert!(status.is_at_cap());

        assert!(status.apply_with_overflow(1, at(2)));
        assert!(status.apply_with_overflow(6, at(3)));
        assert_eq!(status.stacks(), MAX_STACKS);
    }

    #[test]
    fn tick_before_deadline_keeps_stacks() {
        let mut status = with_stacks(3);

        assert!(!status.tick(Duration::from_millis(2_999)));

        assert_eq!(status.stacks(), 3);
    }

    #[test]
    fn tick_removes_single_stack_and_restarts_timer() {
        let mut status = with_stacks(3);

        assert!(status.tick(at(30)));

        assert_eq!(status.stacks(), 2, "a late tick still removes one stack");
        assert_eq!(status.next_decay_at(), at(30) + DECAY_INTERVAL);
        assert!(!status.tick(at(31)));
        assert!(status.tick(at(33)));
        assert_eq!(status.stacks(), 1);
    }

    #[test]
    fn tick_on_empty_status_is_noop() {
        let mut status = HexStatus::new();
        assert!(!status.tick(at(100)));
        assert_eq!(status, HexStatus::new());
    }

    #[test]
    fn modifiers_are_monotonic_below_cap() {
        for stacks in 0..MAX_STACKS - 1 {
            assert!(damage_multiplier_for(stacks + 1) > damage_multiplier_for(stacks));
            assert!(speed_multiplier_for(stacks + 1) < speed_multiplier_for(stacks));
        }
    }

    #[test]
    fn cap_doubles_per_stack_modifiers() {
        assert!((damage_multiplier_for(5) - 1.25).abs() < EPSILON);
        assert!((damage_multiplier_for(MAX_STACKS) - 1.6).abs() < EPSILON);
        assert!((speed_multiplier_for(5) - 0.7).abs() < EPSILON);
        assert!((speed_multiplier_for(MAX_STACKS) - 0.28).abs() < EPSILON);
    }

    #[test]
    fn detonation_damage_stays_linear_at_cap() {
        assert!((detonation_damage_for(5) - 10.0).abs() < EPSILON);
        assert!((detonation_damage_for(MAX_STACKS) - 12.0).abs() < EPSILON);
        assert!((with_stacks(MAX_STACKS).detonation_damage() - 12.0).abs() < EPSILON);
    }

    #[test]
    fn speed_multiplier_has_floor_for_out_of_range_stacks() {
        let status = HexStatus {
            stacks: 20,
            next_decay_at: Duration::ZERO,
        };
        assert!((status.speed_multiplier() - MIN_SPEED_MULTIPLIER).abs() < EPSILON);
        assert!((speed_multiplier_for(u8::MAX) - MIN_SPEED_MULTIPLIER).abs() < EPSILON);
    }

    #[test]
    fn status_round_trips_through_bincode() {
        let mut status = HexStatus::new();
        status.apply(4, Duration::from_millis(1_250));

        let bytes = bincode::serialize(&status).expect("serialize");
        let restored: HexStatus = bincode::deserialize(&bytes).expect("deserialize");

        assert_eq!(restored, status);
    }
}
