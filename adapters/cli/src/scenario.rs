//! Scripted chain-reaction scenarios driven against the arena world.

use std::time::Duration;

use hexfall_core::{hex::MAX_STACKS, Command, EntityId, Event, Position};
use hexfall_world::{self as world, ArenaConfig, World};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const SETTLE_TICKS: u32 = 40;
const SETTLE_STEP: Duration = Duration::from_millis(250);

/// Shape of a single scripted run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Scenario {
    /// Number of entities lined up along the x axis.
    pub(crate) chain: u32,
    /// Distance between neighbouring chain links.
    pub(crate) spacing: f32,
    /// Health of every spawned entity.
    pub(crate) health: f32,
    /// Hex stacks applied to the first link before it is killed.
    pub(crate) stacks: u8,
    /// Number of randomly placed bystanders around the chain.
    pub(crate) scatter: u32,
    /// Seed for bystander placement.
    pub(crate) seed: u64,
}

/// Everything observed while running a scenario.
#[derive(Debug)]
pub(crate) struct Outcome {
    pub(crate) events: Vec<Event>,
    pub(crate) world: World,
}

impl Scenario {
    /// Spawns the chain and bystanders, hexes and kills the first link, then
    /// lets the survivors' stacks decay.
    pub(crate) fn run(&self, config: ArenaConfig) -> Outcome {
        let mut world = World::with_config(config);
        let mut events = Vec::new();

        let mut chain = Vec::new();
        for index in 0..self.chain {
            let position = Position::new(index as f32 * self.spacing, 0.0);
            if let Some(id) = world::spawn(&mut world, position, self.health, false, &mut events) {
                chain.push(id);
            }
        }
        self.scatter_bystanders(&mut world, &mut events);

        if let Some(&first) = chain.first() {
            for command in self.opening(first, config.spawn_health_scale()) {
                world::apply(&mut world, command, &mut events);
            }
        }

        for _ in 0..SETTLE_TICKS {
            world::apply(&mut world, Command::Tick { dt: SETTLE_STEP }, &mut events);
        }

        Outcome { events, world }
    }

    fn scatter_bystanders(&self, world: &mut World, events: &mut Vec<Event>) {
        if self.scatter == 0 {
            return;
        }

        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let length = (self.chain.max(1) as f32 * self.spacing).max(1.0);
        for _ in 0..self.scatter {
            let position = Position::new(
                rng.gen_range(-self.spacing..=length),
                rng.gen_range(-self.spacing..=self.spacing),
            );
            let health = self.health * rng.gen_range(0.5..=2.0);
            let _ = world::spawn(world, position, health, false, events);
        }
    }

    fn opening(&self, first: EntityId, health_scale: f32) -> Vec<Command> {
        vec![
            Command::ApplyHex {
                target: first,
                stacks: self.stacks.min(MAX_STACKS),
            },
            Command::Strike {
                target: first,
                damage: self.health.max(1.0) * health_scale * 2.0,
                hex_stacks: 0,
            },
        ]
    }
}
