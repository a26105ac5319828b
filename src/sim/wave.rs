//! Invader archetypes and wave generation

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::policy::{FiringPolicy, MovementPolicy};
use crate::consts::*;

/// Invader types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Archetype {
    #[default]
    Small,
    Medium,
    Large,
}

/// Per-archetype data
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArchetypeStats {
    pub size: IVec2,
    pub health: u8,
    pub points: u32,
    /// Descent speed
    pub speed: i32,
    /// Sideways speed (0 = straight descent)
    pub horizontal_speed: i32,
    pub firing: FiringPolicy,
}

impl ArchetypeStats {
    /// Fresh movement policy for a newly spawned invader
    pub fn movement(&self, flip_chance: f64) -> MovementPolicy {
        if self.horizontal_speed == 0 {
            MovementPolicy::Linear { speed: self.speed }
        } else {
            MovementPolicy::zigzag(self.speed, self.horizontal_speed, flip_chance)
        }
    }
}

impl Archetype {
    pub const ALL: [Archetype; 3] = [Archetype::Small, Archetype::Medium, Archetype::Large];

    pub fn stats(self) -> ArchetypeStats {
        match self {
            Archetype::Small => ArchetypeStats {
                size: IVec2::new(30, 20),
                health: 1,
                points: 10,
                speed: 1,
                horizontal_speed: 0,
                firing: FiringPolicy::EnemySingle,
            },
            Archetype::Medium => ArchetypeStats {
                size: IVec2::new(40, 25),
                health: 2,
                points: 25,
                speed: 1,
                horizontal_speed: 2,
                firing: FiringPolicy::EnemySingle,
            },
            Archetype::Large => ArchetypeStats {
                size: IVec2::new(50, 35),
                health: 3,
                points: 50,
                speed: 2,
                horizontal_speed: 0,
                firing: FiringPolicy::EnemySingle,
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Archetype::Small => "small",
            Archetype::Medium => "medium",
            Archetype::Large => "large",
        }
    }

    /// Look up an archetype by name. Unknown names fall back to `Small`.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "small" => Archetype::Small,
            "medium" => Archetype::Medium,
            "large" => Archetype::Large,
            other => {
                log::debug!("Unknown archetype {other:?}, spawning small");
                Archetype::Small
            }
        }
    }
}

/// One invader placement in a wave
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spawn {
    pub archetype: Archetype,
    pub pos: IVec2,
}

/// The invaders to spawn for a level
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaveDescriptor {
    pub level: u32,
    pub spawns: Vec<Spawn>,
}

impl WaveDescriptor {
    pub fn len(&self) -> usize {
        self.spawns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spawns.is_empty()
    }
}

/// Number of invaders in a level's wave
pub fn wave_size(level: u32) -> u32 {
    level.saturating_add(5).min(MAX_WAVE_SIZE)
}

/// Archetype for the `index`-th invader of a level
pub fn archetype_for(level: u32, index: u32) -> Archetype {
    match level {
        0..=2 => Archetype::Small,
        3..=4 => {
            if index.is_multiple_of(2) {
                Archetype::Small
            } else {
                Archetype::Medium
            }
        }
        _ => Archetype::ALL[(index % 3) as usize],
    }
}

/// Grid position for the `index`-th invader
pub fn spawn_position(index: u32) -> IVec2 {
    let col = (index % WAVE_COLUMNS) as i32;
    let row = (index / WAVE_COLUMNS) as i32;
    IVec2::new(
        WAVE_ORIGIN_X + col * WAVE_SPACING_X,
        WAVE_ORIGIN_Y + row * WAVE_SPACING_Y,
    )
}

/// Build the wave for a level
pub fn spawn_wave(level: u32) -> WaveDescriptor {
    let spawns = (0..wave_size(level))
        .map(|i| Spawn {
            archetype: archetype_for(level, i),
            pos: spawn_position(i),
        })
        .collect();
    WaveDescriptor { level, spawns }
}
