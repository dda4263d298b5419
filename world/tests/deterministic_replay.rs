use std::time::Duration;

use hexfall_core::{Command, EntityId, EntitySnapshot, Event, Position};
use hexfall_world::{self as world, query, World};

#[test]
fn deterministic_replay_produces_identical_outcomes() {
    let first = replay(scripted_commands());
    let second = replay(scripted_commands());

    assert_eq!(first, second, "replay diverged between runs");
    assert!(first.kills > 0, "script should trigger at least one cascade");
}

#[derive(Debug, PartialEq)]
struct ReplayOutcome {
    events: Vec<Event>,
    entities: Vec<EntitySnapshot>,
    kills: u64,
}

fn replay(commands: Vec<Command>) -> ReplayOutcome {
    let mut world = World::new();
    let mut events = Vec::new();

    for command in commands {
        world::apply(&mut world, command, &mut events);
    }

    ReplayOutcome {
        events,
        entities: query::entity_view(&world).into_vec(),
        kills: query::entities_killed(&world),
    }
}

fn scripted_commands() -> Vec<Command> {
    let mut commands = vec![Command::ConfigureArena {
        detonation_radius: 2.0,
        incoming_damage_scale: 1.0,
        spawn_health_scale: 1.0,
    }];

    for row in 0..4u32 {
        for column in 0..4u32 {
            commands.push(Command::SpawnEntity {
                position: Position::new(column as f32 * 1.5, row as f32 * 1.5),
                health: 8.0 + (row * 4 + column) as f32,
                invincible: column == 3 && row == 3,
            });
        }
    }

    for step in 0..24u32 {
        let target = EntityId::new((step * 7) % 16);
        commands.push(Command::Strike {
            target,
            damage: 6.0,
            hex_stacks: 1 + (step % 3) as u8,
        });
        commands.push(Command::Tick {
            dt: Duration::from_millis(500),
        });
    }

    commands
}
