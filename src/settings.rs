//! Session settings and tuning
//!
//! Loaded from JSON by the host; every field falls back to the classic
//! arcade values when omitted.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// How zigzagging invaders pick their horizontal direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ZigzagMode {
    /// Flip only when touching a playfield edge
    #[default]
    AtEdges,
    /// Also flip at random, each tick, with `erratic_flip_chance`
    Erratic,
}

impl ZigzagMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ZigzagMode::AtEdges => "AtEdges",
            ZigzagMode::Erratic => "Erratic",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "atedges" | "edges" | "bounce" => Some(ZigzagMode::AtEdges),
            "erratic" | "random" => Some(ZigzagMode::Erratic),
            _ => None,
        }
    }
}

/// Tunable session parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Seed for the session RNG (enemy fire choice, erratic zigzag)
    pub seed: u64,
    /// Simulated milliseconds per tick
    pub tick_ms: u64,
    /// Lives at session start and after restart
    pub starting_lives: u8,
    /// Minimum gap between accepted player shots
    pub player_fire_cooldown_ms: u64,
    /// Minimum gap between enemy shots
    pub enemy_fire_interval_ms: u64,

    // === Enemy behaviour ===
    pub zigzag: ZigzagMode,
    /// Per-tick flip probability in `ZigzagMode::Erratic`
    pub erratic_flip_chance: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: 0x5EED_1978,
            tick_ms: TICK_MS,
            starting_lives: STARTING_LIVES,
            player_fire_cooldown_ms: PLAYER_FIRE_COOLDOWN_MS,
            enemy_fire_interval_ms: ENEMY_FIRE_INTERVAL_MS,

            zigzag: ZigzagMode::AtEdges,
            erratic_flip_chance: 0.3,
        }
    }
}

impl Settings {
    /// Settings with a specific RNG seed
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Parse settings from JSON (missing fields use defaults)
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Settings>(json).map(Settings::sanitized)
    }

    /// Parse settings from JSON, falling back to defaults on malformed input
    pub fn from_json_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(settings) => {
                log::info!("Loaded settings (seed {})", settings.seed);
                settings
            }
            Err(err) => {
                log::warn!("Invalid settings ({err}), using defaults");
                Self::default()
            }
        }
    }

    /// Serialize settings to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Clamp values that would stall or break the simulation
    pub fn sanitized(mut self) -> Self {
        if self.tick_ms == 0 {
            log::warn!("tick_ms of 0 is not allowed, using {TICK_MS}");
            self.tick_ms = TICK_MS;
        }
        if self.starting_lives == 0 {
            log::warn!("starting_lives of 0 is not allowed, using {STARTING_LIVES}");
            self.starting_lives = STARTING_LIVES;
        }
        if !self.erratic_flip_chance.is_finite() {
            self.erratic_flip_chance = 0.0;
        }
        self.erratic_flip_chance = self.erratic_flip_chance.clamp(0.0, 1.0);
        self
    }

    /// Flip probability the zigzag policy should use
    pub fn effective_flip_chance(&self) -> f64 {
        match self.zigzag {
            ZigzagMode::AtEdges => 0.0,
            ZigzagMode::Erratic => self.erratic_flip_chance,
        }
    }
}
