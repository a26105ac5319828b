//! Movement and firing policies
//!
//! Policies are small `Copy` values attached to entities. Movement policies
//! carry their own local state (bounce direction) and hand back an updated
//! copy on every advance, so the entity simply reassigns it.

use glam::IVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::Faction;
use crate::consts::*;
use crate::{clamp_x, max_x_for_width};

/// Held movement keys for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Steer {
    pub left: bool,
    pub right: bool,
}

/// Everything a movement policy may look at besides the position itself
#[derive(Debug, Clone, Copy)]
pub struct MoveContext {
    /// Number of ticks to advance
    pub ticks: u32,
    /// Size of the moving body
    pub size: IVec2,
    /// Input flags (only read by `PlayerDirectional`)
    pub steer: Steer,
}

impl MoveContext {
    pub fn single(size: IVec2) -> Self {
        Self {
            ticks: 1,
            size,
            steer: Steer::default(),
        }
    }

    pub fn steered(size: IVec2, steer: Steer) -> Self {
        Self {
            ticks: 1,
            size,
            steer,
        }
    }
}

/// How an entity moves each tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MovementPolicy {
    /// Straight descent
    Linear { speed: i32 },
    /// Descend while bouncing between the side edges
    Zigzag {
        speed: i32,
        horizontal_speed: i32,
        moving_right: bool,
        /// Per-tick chance of flipping direction away from the edges (0 = edges only)
        flip_chance: f64,
    },
    /// Horizontal movement driven by held keys
    PlayerDirectional { step: i32 },
}

impl MovementPolicy {
    pub fn zigzag(speed: i32, horizontal_speed: i32, flip_chance: f64) -> Self {
        MovementPolicy::Zigzag {
            speed,
            horizontal_speed,
            moving_right: true,
            flip_chance,
        }
    }

    /// Advance a position by `ctx.ticks` ticks.
    ///
    /// Returns the new position together with the policy's updated local state.
    pub fn advance<R: Rng + ?Sized>(
        self,
        pos: IVec2,
        ctx: &MoveContext,
        rng: &mut R,
    ) -> (IVec2, MovementPolicy) {
        let mut pos = pos;
        let mut policy = self;
        for _ in 0..ctx.ticks {
            (pos, policy) = policy.step(pos, ctx, rng);
        }
        (pos, policy)
    }

    fn step<R: Rng + ?Sized>(
        self,
        pos: IVec2,
        ctx: &MoveContext,
        rng: &mut R,
    ) -> (IVec2, MovementPolicy) {
        match self {
            MovementPolicy::Linear { speed } => (IVec2::new(pos.x, pos.y + speed), self),

            MovementPolicy::Zigzag {
                speed,
                horizontal_speed,
                moving_right,
                flip_chance,
            } => {
                let dx = if moving_right {
                    horizontal_speed
                } else {
                    -horizontal_speed
                };
                let right_edge = max_x_for_width(ctx.size.x);
                let x = (pos.x + dx).clamp(0, right_edge);

                let moving_right = if x <= 0 {
                    true
                } else if x >= right_edge {
                    false
                } else if flip_chance > 0.0 && rng.random_bool(flip_chance) {
                    !moving_right
                } else {
                    moving_right
                };

                (
                    IVec2::new(x, pos.y + speed),
                    MovementPolicy::Zigzag {
                        speed,
                        horizontal_speed,
                        moving_right,
                        flip_chance,
                    },
                )
            }

            MovementPolicy::PlayerDirectional { step } => {
                let mut x = pos.x;
                if ctx.steer.left {
                    x -= step;
                }
                if ctx.steer.right {
                    x += step;
                }
                (clamp_x(IVec2::new(x, pos.y), ctx.size.x), self)
            }
        }
    }
}

/// Visual style of a projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShotStyle {
    Standard,
    Spread,
    Enemy,
}

/// A projectile to be created by the entity store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShotSpec {
    /// Top-left corner
    pub pos: IVec2,
    /// Signed vertical speed (negative = upward)
    pub velocity: i32,
    pub faction: Faction,
    pub style: ShotStyle,
}

impl ShotSpec {
    fn centered(origin: IVec2, velocity: i32, faction: Faction, style: ShotStyle) -> Self {
        Self {
            pos: IVec2::new(origin.x - SHOT_WIDTH / 2, origin.y),
            velocity,
            faction,
            style,
        }
    }
}

/// What an entity produces when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FiringPolicy {
    #[default]
    SingleShot,
    TripleSpread,
    EnemySingle,
}

impl FiringPolicy {
    /// Projectiles fired from `origin` (the muzzle point, horizontally centered on the firer)
    pub fn fire(self, origin: IVec2) -> Vec<ShotSpec> {
        match self {
            FiringPolicy::SingleShot => vec![ShotSpec::centered(
                origin,
                PLAYER_SHOT_SPEED,
                Faction::Player,
                ShotStyle::Standard,
            )],
            FiringPolicy::TripleSpread => [-SPREAD_SPACING, 0, SPREAD_SPACING]
                .into_iter()
                .map(|offset| {
                    ShotSpec::centered(
                        origin + IVec2::new(offset, 0),
                        PLAYER_SHOT_SPEED,
                        Faction::Player,
                        ShotStyle::Spread,
                    )
                })
                .collect(),
            FiringPolicy::EnemySingle => vec![ShotSpec::centered(
                origin,
                ENEMY_SHOT_SPEED,
                Faction::Enemy,
                ShotStyle::Enemy,
            )],
        }
    }
}

/// The player's gun: a swappable firing policy plus a rate limiter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Weapon {
    pub policy: FiringPolicy,
    pub cooldown_ms: u64,
    last_shot_ms: Option<u64>,
}

impl Weapon {
    pub fn new(cooldown_ms: u64) -> Self {
        Self {
            policy: FiringPolicy::SingleShot,
            cooldown_ms,
            last_shot_ms: None,
        }
    }

    /// Whether a shot requested at `now_ms` would be accepted
    pub fn ready(&self, now_ms: u64) -> bool {
        self.last_shot_ms
            .is_none_or(|last| now_ms.saturating_sub(last) >= self.cooldown_ms)
    }

    /// Fire if the cooldown has elapsed; requests inside the cooldown are dropped
    pub fn try_fire(&mut self, now_ms: u64, origin: IVec2) -> Vec<ShotSpec> {
        if !self.ready(now_ms) {
            return Vec::new();
        }
        self.last_shot_ms = Some(now_ms);
        self.policy.fire(origin)
    }

    pub fn upgrade(&mut self) {
        self.policy = FiringPolicy::TripleSpread;
    }

    pub fn reset(&mut self) {
        self.policy = FiringPolicy::SingleShot;
        self.last_shot_ms = None;
    }

    pub fn is_upgraded(&self) -> bool {
        self.policy == FiringPolicy::TripleSpread
    }
}
