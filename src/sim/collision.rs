//! Collision detection and response
//!
//! Everything is an axis-aligned box. Resolution marks projectiles and
//! enemies as removed instead of deleting them, so the collections stay
//! index-stable until the store sweeps them.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::state::{Enemy, EntityId, Projectile};

/// Axis-aligned bounding box (top-left corner + size)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: IVec2,
    pub size: IVec2,
}

impl Aabb {
    pub fn new(min: IVec2, size: IVec2) -> Self {
        Self { min, size }
    }

    #[inline]
    pub fn max(&self) -> IVec2 {
        self.min + self.size
    }

    /// Strict overlap test; boxes that only share an edge do not intersect
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        if self.size.x <= 0 || self.size.y <= 0 || other.size.x <= 0 || other.size.y <= 0 {
            return false;
        }
        self.min.x < other.max().x
            && other.min.x < self.max().x
            && self.min.y < other.max().y
            && other.min.y < self.max().y
    }
}

/// Outcome of resolving player projectiles against enemies
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollisionReport {
    /// Points earned from destroyed enemies
    pub points: u64,
    /// Enemies destroyed this pass, in hit order
    pub destroyed: Vec<EntityId>,
    /// Projectiles consumed this pass
    pub consumed: usize,
}

/// Mark projectiles that left the playfield. Returns how many were marked.
pub fn purge_off_screen(shots: &mut [Projectile]) -> usize {
    let mut purged = 0;
    for shot in shots.iter_mut().filter(|s| s.is_live() && s.is_off_screen()) {
        shot.removed = true;
        purged += 1;
    }
    purged
}

/// Resolve player projectiles against enemies.
///
/// Each projectile hits at most one enemy (the first live one in iteration
/// order) and is consumed. Destroyed enemies are skipped by later projectiles.
pub fn resolve_player_shots(shots: &mut [Projectile], enemies: &mut [Enemy]) -> CollisionReport {
    let mut report = CollisionReport::default();

    for shot in shots.iter_mut().filter(|s| s.is_live()) {
        let bounds = shot.bounds();
        let Some(enemy) = enemies
            .iter_mut()
            .find(|e| e.is_live() && e.bounds().intersects(&bounds))
        else {
            continue;
        };

        shot.removed = true;
        report.consumed += 1;
        if let Some(points) = enemy.take_damage(1) {
            report.points += u64::from(points);
            report.destroyed.push(enemy.id);
        }
    }

    report
}

/// Resolve enemy projectiles against the player. Returns the number of hits.
pub fn resolve_enemy_shots(shots: &mut [Projectile], player: &Aabb) -> u32 {
    let mut hits = 0;
    for shot in shots
        .iter_mut()
        .filter(|s| s.is_live() && s.bounds().intersects(player))
    {
        shot.removed = true;
        hits += 1;
    }
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::policy::FiringPolicy;
    use crate::sim::wave::Archetype;

    fn player_shot(id: u32, x: i32, y: i32) -> Projectile {
        let spec = FiringPolicy::SingleShot.fire(IVec2::ZERO)[0];
        let mut shot = Projectile::from_spec(EntityId(id), spec);
        shot.pos = IVec2::new(x, y);
        shot
    }

    fn enemy_shot(id: u32, x: i32, y: i32) -> Projectile {
        let spec = FiringPolicy::EnemySingle.fire(IVec2::ZERO)[0];
        let mut shot = Projectile::from_spec(EntityId(id), spec);
        shot.pos = IVec2::new(x, y);
        shot
    }

    fn enemy(id: u32, archetype: Archetype, x: i32, y: i32) -> Enemy {
        Enemy::new(EntityId(id), archetype, IVec2::new(x, y), 0.0)
    }

    #[test]
    fn test_aabb_overlap() {
        let a = Aabb::new(IVec2::new(0, 0), IVec2::new(10, 10));
        assert!(a.intersects(&Aabb::new(IVec2::new(5, 5), IVec2::new(10, 10))));
        assert!(a.intersects(&Aabb::new(IVec2::new(2, 2), IVec2::new(2, 2))));
    }

    #[test]
    fn test_aabb_touching_edges_miss() {
        let a = Aabb::new(IVec2::new(0, 0), IVec2::new(10, 10));
        assert!(!a.intersects(&Aabb::new(IVec2::new(10, 0), IVec2::new(5, 5))));
        assert!(!a.intersects(&Aabb::new(IVec2::new(0, 10), IVec2::new(5, 5))));
        assert!(!a.intersects(&Aabb::new(IVec2::new(3, 3), IVec2::ZERO)));
    }

    #[test]
    fn test_one_shot_damages_one_of_two_overlapping_enemies() {
        let mut enemies = vec![
            enemy(1, Archetype::Small, 100, 100),
            enemy(2, Archetype::Small, 105, 100),
        ];
        let mut shots = vec![player_shot(10, 110, 105)];

        let report = resolve_player_shots(&mut shots, &mut enemies);
        assert_eq!(report.destroyed, vec![EntityId(1)]);
        assert_eq!(report.points, 10);
        assert_eq!(report.consumed, 1);
        assert!(shots[0].removed);
        assert!(enemies[0].removed);
        assert!(!enemies[1].removed);
    }

    #[test]
    fn test_second_shot_skips_destroyed_enemy() {
        let mut enemies = vec![
            enemy(1, Archetype::Small, 100, 100),
            enemy(2, Archetype::Small, 105, 100),
        ];
        let mut shots = vec![player_shot(10, 110, 105), player_shot(11, 110, 105)];

        let report = resolve_player_shots(&mut shots, &mut enemies);
        assert_eq!(report.destroyed, vec![EntityId(1), EntityId(2)]);
        assert_eq!(report.points, 20);
    }

    #[test]
    fn test_armored_enemy_takes_several_hits() {
        let mut enemies = vec![enemy(1, Archetype::Large, 100, 100)];
        let mut shots = vec![player_shot(10, 110, 110), player_shot(11, 120, 110)];

        let report = resolve_player_shots(&mut shots, &mut enemies);
        assert!(report.destroyed.is_empty());
        assert_eq!(report.consumed, 2);
        assert_eq!(enemies[0].health, 1);

        let mut shots = vec![player_shot(12, 110, 110)];
        let report = resolve_player_shots(&mut shots, &mut enemies);
        assert_eq!(report.points, 50);
        assert_eq!(report.destroyed, vec![EntityId(1)]);
    }

    #[test]
    fn test_consumed_shots_are_ignored() {
        let mut enemies = vec![enemy(1, Archetype::Medium, 100, 100)];
        let mut shots = vec![player_shot(10, 110, 110)];
        shots[0].removed = true;

        let report = resolve_player_shots(&mut shots, &mut enemies);
        assert_eq!(report, CollisionReport::default());
        assert_eq!(enemies[0].health, 2);
    }

    #[test]
    fn test_enemy_shots_hit_player() {
        let player = Aabb::new(IVec2::new(375, 550), IVec2::new(40, 30));
        let mut shots = vec![
            enemy_shot(1, 380, 545),
            enemy_shot(2, 200, 545),
            enemy_shot(3, 410, 570),
        ];
        assert_eq!(resolve_enemy_shots(&mut shots, &player), 2);
        assert!(shots[0].removed);
        assert!(!shots[1].removed);
        assert!(shots[2].removed);
    }

    #[test]
    fn test_purge_off_screen() {
        let mut shots = vec![
            player_shot(1, 100, -1),
            player_shot(2, 100, 0),
            enemy_shot(3, 100, 601),
        ];
        assert_eq!(purge_off_screen(&mut shots), 2);
        assert!(shots[0].removed);
        assert!(!shots[1].removed);
        assert!(shots[2].removed);
    }
}
