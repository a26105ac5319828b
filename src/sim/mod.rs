//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod policy;
pub mod state;
pub mod store;
pub mod tick;
pub mod wave;

pub use collision::{Aabb, CollisionReport, purge_off_screen, resolve_enemy_shots, resolve_player_shots};
pub use policy::{FiringPolicy, MoveContext, MovementPolicy, ShotSpec, ShotStyle, Steer, Weapon};
pub use state::{Enemy, EntityId, Faction, GamePhase, GameState, Player, Projectile};
pub use store::EntityStore;
pub use tick::{Session, TickInput, tick};
pub use wave::{Archetype, ArchetypeStats, Spawn, WaveDescriptor, spawn_wave};
