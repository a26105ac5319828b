//! Game state and core simulation types
//!
//! Entities are plain data; their behaviour comes from the policies attached
//! to them. `GameState` is the session scoreboard and phase machine.

use glam::IVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::policy::{FiringPolicy, MoveContext, MovementPolicy, ShotSpec, ShotStyle, Steer, Weapon};
use super::wave::Archetype;
use crate::consts::*;

/// Stable handle for a live entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Which side an entity or projectile belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Faction {
    Player,
    Enemy,
}

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Constructed, not yet playable
    Init,
    /// Accepting ticks
    Running,
    /// Run ended; only a restart has effect
    GameOver,
}

/// Scoreboard and phase machine for one play session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    score: u64,
    level: u32,
    lives: u8,
    phase: GamePhase,
    starting_lives: u8,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(STARTING_LIVES)
    }
}

impl GameState {
    pub fn new(starting_lives: u8) -> Self {
        Self {
            score: 0,
            level: 1,
            lives: starting_lives,
            phase: GamePhase::Init,
            starting_lives,
        }
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lives(&self) -> u8 {
        self.lives
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    /// Reset the scoreboard and enter `Running`
    pub fn begin(&mut self) {
        self.score = 0;
        self.level = 1;
        self.lives = self.starting_lives;
        self.phase = GamePhase::Running;
    }

    /// Award points; ignored outside `Running`
    pub fn add_score(&mut self, points: u64) {
        if self.is_running() {
            self.score += points;
        }
    }

    /// Move to the next level, returning it. Ignored outside `Running`.
    pub fn advance_level(&mut self) -> u32 {
        if self.is_running() {
            self.level += 1;
        }
        self.level
    }

    /// Take one life. Returns true exactly when this call ended the game.
    pub fn lose_life(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 {
            self.phase = GamePhase::GameOver;
            log::info!("Game over at level {} with score {}", self.level, self.score);
            return true;
        }
        false
    }
}

/// An invader
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: EntityId,
    pub archetype: Archetype,
    /// Top-left corner
    pub pos: IVec2,
    pub size: IVec2,
    /// Remaining hit points (> 0 while live)
    pub health: u8,
    /// Score awarded on destruction
    pub points: u32,
    pub movement: MovementPolicy,
    pub firing: FiringPolicy,
    /// Marked for removal at the next sweep
    pub removed: bool,
}

impl Enemy {
    pub fn new(id: EntityId, archetype: Archetype, pos: IVec2, flip_chance: f64) -> Self {
        let stats = archetype.stats();
        Self {
            id,
            archetype,
            pos,
            size: stats.size,
            health: stats.health,
            points: stats.points,
            movement: stats.movement(flip_chance),
            firing: stats.firing,
            removed: false,
        }
    }

    pub fn is_live(&self) -> bool {
        !self.removed
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    /// Apply damage. Returns the point value exactly once, on the hit that destroys it.
    pub fn take_damage(&mut self, amount: u8) -> Option<u32> {
        if self.removed {
            return None;
        }
        self.health = self.health.saturating_sub(amount);
        if self.health == 0 {
            self.removed = true;
            Some(self.points)
        } else {
            None
        }
    }

    pub fn advance<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let (pos, movement) = self
            .movement
            .advance(self.pos, &MoveContext::single(self.size), rng);
        self.pos = pos;
        self.movement = movement;
    }

    /// Projectiles this invader fires from its bottom center
    pub fn fire(&self) -> Vec<ShotSpec> {
        self.firing
            .fire(IVec2::new(self.pos.x + self.size.x / 2, self.pos.y + self.size.y))
    }
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: EntityId,
    pub pos: IVec2,
    pub size: IVec2,
    pub movement: MovementPolicy,
    pub weapon: Weapon,
}

impl Player {
    pub fn new(id: EntityId, fire_cooldown_ms: u64) -> Self {
        Self {
            id,
            pos: IVec2::new(PLAYER_START_X, PLAYER_START_Y),
            size: IVec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            movement: MovementPolicy::PlayerDirectional { step: PLAYER_STEP },
            weapon: Weapon::new(fire_cooldown_ms),
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    /// Top center of the ship
    pub fn muzzle(&self) -> IVec2 {
        IVec2::new(self.pos.x + self.size.x / 2, self.pos.y)
    }

    pub fn advance<R: Rng + ?Sized>(&mut self, steer: Steer, rng: &mut R) {
        let (pos, movement) = self
            .movement
            .advance(self.pos, &MoveContext::steered(self.size, steer), rng);
        self.pos = pos;
        self.movement = movement;
    }

    /// Request a shot at simulated time `now_ms`
    pub fn shoot(&mut self, now_ms: u64) -> Vec<ShotSpec> {
        let muzzle = self.muzzle();
        self.weapon.try_fire(now_ms, muzzle)
    }
}

/// A bullet in flight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: EntityId,
    pub pos: IVec2,
    pub size: IVec2,
    /// Signed vertical speed (negative = upward)
    pub velocity: i32,
    pub faction: Faction,
    pub style: ShotStyle,
    /// Consumed or off-screen; dropped at the next sweep
    pub removed: bool,
}

impl Projectile {
    pub fn from_spec(id: EntityId, spec: ShotSpec) -> Self {
        Self {
            id,
            pos: spec.pos,
            size: IVec2::new(SHOT_WIDTH, SHOT_HEIGHT),
            velocity: spec.velocity,
            faction: spec.faction,
            style: spec.style,
            removed: false,
        }
    }

    pub fn is_live(&self) -> bool {
        !self.removed
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    pub fn advance(&mut self) {
        self.pos.y += self.velocity;
    }

    /// Past the top or bottom of the playfield
    pub fn is_off_screen(&self) -> bool {
        self.pos.y < 0 || self.pos.y > PLAYFIELD_HEIGHT
    }
}
