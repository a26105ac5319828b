//! Invaders - a fixed-tick Space Invaders simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (policies, collisions, waves, game state)
//! - `render`: Render contract for an external drawing surface
//! - `settings`: Data-driven tuning

pub mod render;
pub mod settings;
pub mod sim;

pub use render::{AsciiSurface, DrawHint, Hud, Sprite, Surface};
pub use settings::Settings;
pub use sim::{GamePhase, GameState, Session, TickInput, tick};

use glam::IVec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep in milliseconds (~60 Hz)
    pub const TICK_MS: u64 = 16;

    /// Playfield dimensions
    pub const PLAYFIELD_WIDTH: i32 = 800;
    pub const PLAYFIELD_HEIGHT: i32 = 600;
    /// Gap kept between horizontally moving bodies and the right edge
    pub const RIGHT_MARGIN: i32 = 10;
    /// Enemies whose top edge passes this line have breached the defenses
    pub const BOTTOM_BREACH_Y: i32 = 500;

    /// Player defaults
    pub const PLAYER_WIDTH: i32 = 40;
    pub const PLAYER_HEIGHT: i32 = 30;
    pub const PLAYER_START_X: i32 = 375;
    pub const PLAYER_START_Y: i32 = 550;
    pub const PLAYER_STEP: i32 = 5;
    pub const STARTING_LIVES: u8 = 3;
    /// Minimum time between accepted player shots
    pub const PLAYER_FIRE_COOLDOWN_MS: u64 = 200;

    /// Projectile defaults
    pub const SHOT_WIDTH: i32 = 4;
    pub const SHOT_HEIGHT: i32 = 8;
    pub const PLAYER_SHOT_SPEED: i32 = -5;
    pub const ENEMY_SHOT_SPEED: i32 = 3;
    pub const SPREAD_SPACING: i32 = 10;

    /// An enemy may fire once this much time has passed since the last enemy shot
    pub const ENEMY_FIRE_INTERVAL_MS: u64 = 1000;

    /// Wave layout
    pub const MAX_WAVE_SIZE: u32 = 15;
    pub const WAVE_COLUMNS: u32 = 10;
    pub const WAVE_ORIGIN_X: i32 = 50;
    pub const WAVE_ORIGIN_Y: i32 = 50;
    pub const WAVE_SPACING_X: i32 = 70;
    pub const WAVE_SPACING_Y: i32 = 60;
    /// Every Nth level upgrades the player's weapon
    pub const UPGRADE_EVERY_LEVELS: u32 = 3;
}

/// Largest x a body of the given width may occupy
#[inline]
pub fn max_x_for_width(width: i32) -> i32 {
    (consts::PLAYFIELD_WIDTH - consts::RIGHT_MARGIN - width).max(0)
}

/// Clamp a body's x so it stays inside the playfield
#[inline]
pub fn clamp_x(pos: IVec2, width: i32) -> IVec2 {
    IVec2::new(pos.x.clamp(0, max_x_for_width(width)), pos.y)
}
