use std::time::Duration;

use hexfall_core::{Command, EntityId, Event, Position};
use hexfall_world::{self as world, query, ArenaConfig, World, DEFAULT_SPAWN_HEALTH_SCALE};

fn spawn_at(world: &mut World, x: f32, health: f32) -> EntityId {
    let mut events = Vec::new();
    world::spawn(world, Position::new(x, 0.0), health, false, &mut events).expect("spawned")
}

fn apply_all(world: &mut World, commands: Vec<Command>) -> Vec<Event> {
    let mut events = Vec::new();
    for command in commands {
        world::apply(world, command, &mut events);
    }
    events
}

#[test]
fn lethal_strike_on_capped_entity_chains_through_neighbour() {
    let mut world = World::new();
    let a = spawn_at(&mut world, 0.0, 5.0);
    let b = spawn_at(&mut world, 1.0, 12.0);
    let c = spawn_at(&mut world, 3.0, 100.0);

    let _ = apply_all(&mut world, vec![Command::ApplyHex { target: a, stacks: 6 }]);
    let events = apply_all(
        &mut world,
        vec![Command::Strike {
            target: a,
            damage: 10.0,
            hex_stacks: 0,
        }],
    );

    assert_eq!(
        events,
        vec![
            Event::EntityDamaged {
                entity: a,
                amount: 16.0,
                remaining: -11.0,
            },
            Event::EntityDied {
                entity: a,
                position: Position::new(0.0, 0.0),
                hex_stacks: 6,
            },
            Event::HexDetonated {
                origin: a,
                position: Position::new(0.0, 0.0),
                stacks: 6,
                damage: 12.0,
            },
            Event::HexApplied {
                entity: b,
                stacks: 6,
                overflow: false,
            },
            Event::EntityDamaged {
                entity: b,
                amount: 12.0,
                remaining: 0.0,
            },
            Event::EntityDied {
                entity: b,
                position: Position::new(1.0, 0.0),
                hex_stacks: 6,
            },
            Event::HexDetonated {
                origin: b,
                position: Position::new(1.0, 0.0),
                stacks: 6,
                damage: 12.0,
            },
            Event::HexApplied {
                entity: c,
                stacks: 6,
                overflow: false,
            },
            Event::EntityDamaged {
                entity: c,
                amount: 12.0,
                remaining: 88.0,
            },
        ],
    );

    assert_eq!(query::entities_killed(&world), 2);
    assert_eq!(query::entity_count(&world), 1);
    let survivor = query::entity_view(&world);
    let snapshot = survivor.get(c).expect("c survives");
    assert_eq!(snapshot.hex_stacks, 6);
    assert!((snapshot.damage_multiplier - 1.6).abs() < 1e-5);
    assert!((snapshot.speed_multiplier - 0.28).abs() < 1e-5);
}

#[test]
fn chain_of_five_kills_every_link_once() {
    let mut world = World::new();
    let ids: Vec<EntityId> = (0..5)
        .map(|index| spawn_at(&mut world, index as f32 * 2.0, 10.0))
        .collect();

    let _ = apply_all(&mut world, vec![Command::ApplyHex { target: ids[0], stacks: 6 }]);
    let events = apply_all(
        &mut world,
        vec![Command::Strike {
            target: ids[0],
            damage: 100.0,
            hex_stacks: 0,
        }],
    );

    let deaths: Vec<EntityId> = events
        .iter()
        .filter_map(|event| match event {
            Event::EntityDied { entity, .. } => Some(*entity),
            _ => None,
        })
        .collect();
    assert_eq!(deaths, ids, "each link dies exactly once, in chain order");

    let detonations = events
        .iter()
        .filter(|event| matches!(event, Event::HexDetonated { .. }))
        .count();
    assert_eq!(detonations, 5);
    assert_eq!(query::entity_count(&world), 0);
    assert_eq!(query::entities_killed(&world), 5);
}

#[test]
fn unhexed_death_detonates_without_effect() {
    let mut world = World::new();
    let victim = spawn_at(&mut world, 0.0, 1.0);
    let bystander = spawn_at(&mut world, 0.5, 1.0);

    let events = apply_all(
        &mut world,
        vec![Command::Strike {
            target: victim,
            damage: 5.0,
            hex_stacks: 0,
        }],
    );

    assert!(events.contains(&Event::HexDetonated {
        origin: victim,
        position: Position::new(0.0, 0.0),
        stacks: 0,
        damage: 0.0,
    }));
    let view = query::entity_view(&world);
    let snapshot = view.get(bystander).expect("bystander survives");
    assert_eq!(snapshot.hex_stacks, 0);
    assert!((snapshot.health - 1.0).abs() < f32::EPSILON);
}

#[test]
fn invincible_neighbour_takes_stacks_but_never_dies() {
    let mut world = World::new();
    let victim = spawn_at(&mut world, 0.0, 1.0);
    let mut events = Vec::new();
    let wall = world::spawn(&mut world, Position::new(1.0, 0.0), 1.0, true, &mut events)
        .expect("spawned");

    let _ = apply_all(
        &mut world,
        vec![
            Command::ApplyHex {
                target: victim,
                stacks: 4,
            },
            Command::Strike {
                target: victim,
                damage: 5.0,
                hex_stacks: 0,
            },
        ],
    );

    let status = query::hex_status(&world, wall).expect("wall survives");
    assert_eq!(status.stacks(), 4);
    assert_eq!(query::entities_killed(&world), 1);
}

#[test]
fn stacks_decay_back_to_zero_without_fresh_hits() {
    let mut world = World::new();
    let entity = spawn_at(&mut world, 0.0, 10.0);
    let _ = apply_all(&mut world, vec![Command::ApplyHex { target: entity, stacks: 2 }]);

    let ticks = (0..60)
        .map(|_| Command::Tick {
            dt: Duration::from_millis(100),
        })
        .collect();
    let events = apply_all(&mut world, ticks);

    let decays: Vec<u8> = events
        .iter()
        .filter_map(|event| match event {
            Event::HexDecayed { stacks, .. } => Some(*stacks),
            _ => None,
        })
        .collect();
    assert_eq!(decays, vec![1, 0]);
    assert_eq!(query::hex_status(&world, entity).map(|s| s.stacks()), Some(0));
}

#[test]
fn hex_strike_on_capped_target_doubles_damage() {
    let mut world = World::new();
    let target = spawn_at(&mut world, 0.0, 100.0);
    let _ = apply_all(&mut world, vec![Command::ApplyHex { target, stacks: 6 }]);

    let events = apply_all(
        &mut world,
        vec![Command::Strike {
            target,
            damage: 10.0,
            hex_stacks: 1,
        }],
    );

    assert_eq!(
        events,
        vec![
            Event::HexApplied {
                entity: target,
                stacks: 6,
                overflow: true,
            },
            Event::EntityDamaged {
                entity: target,
                amount: 32.0,
                remaining: 68.0,
            },
        ]
    );
}

#[test]
fn incoming_damage_scale_reduces_burst_damage() {
    let mut world = World::with_config(ArenaConfig::new(2.5, 0.5, DEFAULT_SPAWN_HEALTH_SCALE));
    let a = spawn_at(&mut world, 0.0, 5.0);
    let b = spawn_at(&mut world, 1.0, 20.0);

    let _ = apply_all(&mut world, vec![Command::ApplyHex { target: a, stacks: 6 }]);
    let events = apply_all(
        &mut world,
        vec![Command::Strike {
            target: a,
            damage: 10.0,
            hex_stacks: 0,
        }],
    );

    assert!(events.contains(&Event::EntityDamaged {
        entity: a,
        amount: 8.0,
        remaining: -3.0,
    }));
    assert!(
        events.contains(&Event::HexDetonated {
            origin: a,
            position: Position::new(0.0, 0.0),
            stacks: 6,
            damage: 12.0,
        }),
        "the detonation itself reports the unscaled burst"
    );
    assert!(events.contains(&Event::EntityDamaged {
        entity: b,
        amount: 6.0,
        remaining: 14.0,
    }));
    assert_eq!(query::entity_count(&world), 1);
}
