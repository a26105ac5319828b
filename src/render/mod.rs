//! Render contract
//!
//! The simulation never draws anything itself. `Session::render` walks the
//! live entities and hands a `Sprite` per entity, plus one `Hud`, to whatever
//! `Surface` the host provides.

pub mod ascii;

pub use ascii::AsciiSurface;

use glam::IVec2;

use crate::sim::{Archetype, Enemy, GamePhase, Player, Projectile, ShotStyle};

/// What kind of thing a sprite is, so the surface can pick its look
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawHint {
    Player { upgraded: bool },
    Invader(Archetype),
    Shot(ShotStyle),
}

impl DrawHint {
    /// Single-character look used by text surfaces
    pub fn glyph(&self) -> char {
        match self {
            DrawHint::Player { upgraded: false } => 'A',
            DrawHint::Player { upgraded: true } => 'W',
            DrawHint::Invader(Archetype::Small) => 's',
            DrawHint::Invader(Archetype::Medium) => 'm',
            DrawHint::Invader(Archetype::Large) => 'L',
            DrawHint::Shot(ShotStyle::Standard) => '|',
            DrawHint::Shot(ShotStyle::Spread) => '!',
            DrawHint::Shot(ShotStyle::Enemy) => ':',
        }
    }
}

/// A box to draw, in playfield pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sprite {
    /// Top-left corner
    pub pos: IVec2,
    pub size: IVec2,
    pub hint: DrawHint,
}

impl Sprite {
    pub fn player(player: &Player) -> Self {
        Self {
            pos: player.pos,
            size: player.size,
            hint: DrawHint::Player {
                upgraded: player.weapon.is_upgraded(),
            },
        }
    }

    pub fn enemy(enemy: &Enemy) -> Self {
        Self {
            pos: enemy.pos,
            size: enemy.size,
            hint: DrawHint::Invader(enemy.archetype),
        }
    }

    pub fn projectile(shot: &Projectile) -> Self {
        Self {
            pos: shot.pos,
            size: shot.size,
            hint: DrawHint::Shot(shot.style),
        }
    }
}

/// Scoreboard readout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hud {
    pub score: u64,
    pub level: u32,
    pub lives: u8,
    pub phase: GamePhase,
    pub weapon_upgraded: bool,
}

impl Hud {
    /// One-line summary for text displays
    pub fn status_line(&self) -> String {
        match self.phase {
            GamePhase::Init => "Press start".to_string(),
            GamePhase::Running => format!(
                "Score: {}  Level: {}  Lives: {}{}",
                self.score,
                self.level,
                self.lives,
                if self.weapon_upgraded { "  [TRIPLE]" } else { "" }
            ),
            GamePhase::GameOver => format!(
                "GAME OVER  Final score: {}  Press R to restart",
                self.score
            ),
        }
    }
}

/// Anything that can display a session
pub trait Surface {
    fn draw_sprite(&mut self, sprite: &Sprite);
    fn draw_hud(&mut self, hud: &Hud);
}
