//! Entity store
//!
//! Owns every enemy and projectile for the current session. Removal is two
//! phase: systems set `removed`, then `sweep` compacts the collections.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::policy::ShotSpec;
use super::state::{Enemy, EntityId, Faction, Projectile};
use super::wave::{Archetype, WaveDescriptor};

/// Live enemies and projectiles (each sorted by id)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityStore {
    pub enemies: Vec<Enemy>,
    /// Projectiles fired by the player
    pub player_shots: Vec<Projectile>,
    /// Projectiles fired by enemies
    pub enemy_shots: Vec<Projectile>,
    next_id: u32,
}

impl Default for EntityStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityStore {
    pub fn new() -> Self {
        Self {
            enemies: Vec::new(),
            player_shots: Vec::new(),
            enemy_shots: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn spawn_enemy(&mut self, archetype: Archetype, pos: IVec2, flip_chance: f64) -> EntityId {
        let id = self.next_entity_id();
        self.enemies.push(Enemy::new(id, archetype, pos, flip_chance));
        id
    }

    /// Spawn an invader by archetype name. Unknown names spawn a small invader.
    pub fn spawn_named(&mut self, name: &str, pos: IVec2, flip_chance: f64) -> EntityId {
        self.spawn_enemy(Archetype::from_name(name), pos, flip_chance)
    }

    /// Spawn every invader of a wave. Returns how many were added.
    pub fn spawn_wave(&mut self, wave: &WaveDescriptor, flip_chance: f64) -> usize {
        for spawn in &wave.spawns {
            self.spawn_enemy(spawn.archetype, spawn.pos, flip_chance);
        }
        wave.len()
    }

    /// Create projectiles, routing each to its faction's collection
    pub fn add_shots(&mut self, shots: impl IntoIterator<Item = ShotSpec>) -> usize {
        let mut added = 0;
        for spec in shots {
            let shot = Projectile::from_spec(self.next_entity_id(), spec);
            match spec.faction {
                Faction::Player => self.player_shots.push(shot),
                Faction::Enemy => self.enemy_shots.push(shot),
            }
            added += 1;
        }
        added
    }

    pub fn enemy(&self, id: EntityId) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id == id)
    }

    pub fn live_enemies(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.iter().filter(|e| e.is_live())
    }

    pub fn live_enemy_count(&self) -> usize {
        self.live_enemies().count()
    }

    /// All live projectiles of both factions
    pub fn live_shots(&self) -> impl Iterator<Item = &Projectile> {
        self.player_shots
            .iter()
            .chain(self.enemy_shots.iter())
            .filter(|s| s.is_live())
    }

    /// Drop everything marked for removal. Returns how many entities were dropped.
    pub fn sweep(&mut self) -> usize {
        let before = self.enemies.len() + self.player_shots.len() + self.enemy_shots.len();
        self.enemies.retain(Enemy::is_live);
        self.player_shots.retain(Projectile::is_live);
        self.enemy_shots.retain(Projectile::is_live);
        before - (self.enemies.len() + self.player_shots.len() + self.enemy_shots.len())
    }

    /// Remove every entity (ids keep counting up)
    pub fn clear(&mut self) {
        self.enemies.clear();
        self.player_shots.clear();
        self.enemy_shots.clear();
    }

    /// No enemies left, live or pending removal
    pub fn is_wave_clear(&self) -> bool {
        self.enemies.is_empty()
    }
}
