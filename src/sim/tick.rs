//! Fixed timestep simulation tick
//!
//! Core game loop that advances a session deterministically. The host calls
//! `tick` every `Settings::tick_ms` with a snapshot of the input.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::collision::{purge_off_screen, resolve_enemy_shots, resolve_player_shots};
use super::policy::Steer;
use super::state::{GamePhase, GameState, Player};
use super::store::EntityStore;
use super::wave::spawn_wave;
use crate::consts::*;
use crate::render::{Hud, Sprite, Surface};
use crate::settings::Settings;

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Move left key held
    pub move_left: bool,
    /// Move right key held
    pub move_right: bool,
    /// Fire pressed since the last tick (edge-triggered)
    pub fire: bool,
    /// Restart pressed since the last tick (only meaningful in GameOver)
    pub restart: bool,
}

impl TickInput {
    pub fn steer(&self) -> Steer {
        Steer {
            left: self.move_left,
            right: self.move_right,
        }
    }
}

/// One play session: scoreboard, entities and the session clock
#[derive(Debug, Clone)]
pub struct Session {
    settings: Settings,
    pub state: GameState,
    pub store: EntityStore,
    pub player: Player,
    rng: Pcg32,
    /// Simulated time since the run started
    clock_ms: u64,
    last_enemy_shot_ms: u64,
    /// Running ticks since the run started
    time_ticks: u64,
}

impl Session {
    /// Create a session in `Init`; call `start` to begin play
    pub fn new(settings: Settings) -> Self {
        let settings = settings.sanitized();
        let mut store = EntityStore::new();
        let player = Player::new(store.next_entity_id(), settings.player_fire_cooldown_ms);
        Self {
            state: GameState::new(settings.starting_lives),
            store,
            player,
            rng: Pcg32::seed_from_u64(settings.seed),
            clock_ms: 0,
            last_enemy_shot_ms: 0,
            time_ticks: 0,
            settings,
        }
    }

    /// Leave `Init` and spawn the first wave. No effect once started.
    pub fn start(&mut self) {
        if self.state.phase() != GamePhase::Init {
            return;
        }
        log::info!("Session starting (seed {})", self.settings.seed);
        self.reset_world();
    }

    /// Start over after a game over. No effect in other phases.
    pub fn restart(&mut self) {
        if self.state.phase() != GamePhase::GameOver {
            return;
        }
        log::info!("Restarting after game over (final score {})", self.state.score());
        self.reset_world();
    }

    fn reset_world(&mut self) {
        self.store = EntityStore::new();
        self.player = Player::new(
            self.store.next_entity_id(),
            self.settings.player_fire_cooldown_ms,
        );
        self.clock_ms = 0;
        self.last_enemy_shot_ms = 0;
        self.time_ticks = 0;
        self.state.begin();
        self.spawn_next_wave();
    }

    fn spawn_next_wave(&mut self) {
        let wave = spawn_wave(self.state.level());
        let count = self
            .store
            .spawn_wave(&wave, self.settings.effective_flip_chance());
        log::info!("Level {}: spawned {} invaders", wave.level, count);
    }

    /// Settings in effect (sanitized at construction)
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase()
    }

    pub fn clock_ms(&self) -> u64 {
        self.clock_ms
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    /// Scoreboard readout for display
    pub fn hud(&self) -> Hud {
        Hud {
            score: self.state.score(),
            level: self.state.level(),
            lives: self.state.lives(),
            phase: self.state.phase(),
            weapon_upgraded: self.player.weapon.is_upgraded(),
        }
    }

    /// Draw the session. Entities are only emitted while running.
    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S) {
        if self.state.is_running() {
            surface.draw_sprite(&Sprite::player(&self.player));
            for enemy in self.store.live_enemies() {
                surface.draw_sprite(&Sprite::enemy(enemy));
            }
            for shot in self.store.live_shots() {
                surface.draw_sprite(&Sprite::projectile(shot));
            }
        }
        surface.draw_hud(&self.hud());
    }

    /// Pick one enemy to fire if the enemy cooldown has elapsed
    fn enemy_fire(&mut self) {
        if self.store.enemies.is_empty()
            || self.clock_ms.saturating_sub(self.last_enemy_shot_ms)
                <= self.settings.enemy_fire_interval_ms
        {
            return;
        }
        let shooter = self.rng.random_range(0..self.store.enemies.len());
        let shots = self.store.enemies[shooter].fire();
        self.store.add_shots(shots);
        self.last_enemy_shot_ms = self.clock_ms;
    }
}

/// Advance the session by one fixed timestep
pub fn tick(session: &mut Session, input: &TickInput) {
    match session.state.phase() {
        GamePhase::Init => return,
        GamePhase::GameOver => {
            if input.restart {
                session.restart();
            }
            return;
        }
        GamePhase::Running => {}
    }

    session.time_ticks += 1;
    session.clock_ms += session.settings.tick_ms;
    let now = session.clock_ms;

    // Input: fire request, then steer while moving
    if input.fire {
        let shots = session.player.shoot(now);
        session.store.add_shots(shots);
    }

    // Movement
    session.player.advance(input.steer(), &mut session.rng);
    for enemy in &mut session.store.enemies {
        enemy.advance(&mut session.rng);
    }
    for shot in session
        .store
        .player_shots
        .iter_mut()
        .chain(session.store.enemy_shots.iter_mut())
    {
        shot.advance();
    }

    session.enemy_fire();

    // Off-screen projectiles go before any hit test
    purge_off_screen(&mut session.store.player_shots);
    purge_off_screen(&mut session.store.enemy_shots);

    let report = resolve_player_shots(
        &mut session.store.player_shots,
        &mut session.store.enemies,
    );
    session.state.add_score(report.points);
    for id in &report.destroyed {
        log::debug!("Invader {:?} destroyed", id);
    }

    let hits = resolve_enemy_shots(&mut session.store.enemy_shots, &session.player.bounds());
    for _ in 0..hits {
        session.state.lose_life();
    }

    session.store.sweep();
    if !session.state.is_running() {
        return;
    }

    // Wave clear
    if session.store.is_wave_clear() {
        let level = session.state.advance_level();
        session.spawn_next_wave();
        if level.is_multiple_of(UPGRADE_EVERY_LEVELS) && !session.player.weapon.is_upgraded() {
            session.player.weapon.upgrade();
            log::info!("Weapon upgraded to triple spread at level {}", level);
        }
    }

    // Bottom breach: invaders past the line stay put and cost a life every tick
    let breached = session
        .store
        .live_enemies()
        .filter(|e| e.pos.y > BOTTOM_BREACH_Y)
        .count();
    if breached > 0 {
        log::debug!("{} invader(s) past the bottom line", breached);
        session.state.lose_life();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::ZigzagMode;
    use crate::sim::policy::MovementPolicy;
    use crate::sim::wave::Archetype;
    use glam::IVec2;

    fn running(seed: u64) -> Session {
        let mut session = Session::new(Settings::with_seed(seed));
        session.start();
        session
    }

    fn fire() -> TickInput {
        TickInput {
            fire: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_init_ignores_ticks() {
        let mut session = Session::new(Settings::default());
        tick(&mut session, &fire());
        assert_eq!(session.phase(), GamePhase::Init);
        assert_eq!(session.time_ticks(), 0);
        assert!(session.store.enemies.is_empty());
    }

    #[test]
    fn test_start_spawns_first_wave() {
        let session = running(1);
        assert_eq!(session.phase(), GamePhase::Running);
        assert_eq!(session.store.enemies.len(), 6);
        assert_eq!(session.player.pos, IVec2::new(PLAYER_START_X, PLAYER_START_Y));
    }

    #[test]
    fn test_fire_spawns_and_moves_shot() {
        let mut session = running(1);
        tick(&mut session, &fire());
        assert_eq!(session.store.player_shots.len(), 1);
        // Spawned at the muzzle then moved once
        assert_eq!(session.store.player_shots[0].pos.y, PLAYER_START_Y + PLAYER_SHOT_SPEED);
    }

    #[test]
    fn test_fire_held_respects_cooldown() {
        let mut session = running(1);
        for _ in 0..13 {
            tick(&mut session, &fire());
        }
        // First shot at 16 ms, tick 13 is only 192 ms later
        assert_eq!(session.store.player_shots.len(), 1);
        tick(&mut session, &fire());
        assert_eq!(session.store.player_shots.len(), 2);
    }

    #[test]
    fn test_enemy_fires_after_interval() {
        let mut session = running(1);
        for _ in 0..62 {
            tick(&mut session, &TickInput::default());
        }
        // 62 * 16 = 992 ms
        assert!(session.store.enemy_shots.is_empty());
        for _ in 0..2 {
            tick(&mut session, &TickInput::default());
        }
        assert_eq!(session.store.enemy_shots.len(), 1);
    }

    #[test]
    fn test_wave_clear_advances_level() {
        let mut session = running(1);
        for enemy in &mut session.store.enemies {
            enemy.removed = true;
        }
        session.store.sweep();
        tick(&mut session, &TickInput::default());
        assert_eq!(session.state.level(), 2);
        assert_eq!(session.store.enemies.len(), 7);
        assert!(!session.player.weapon.is_upgraded());
    }

    #[test]
    fn test_level_three_upgrades_weapon() {
        let mut session = running(1);
        for _ in 0..2 {
            session.store.clear();
            tick(&mut session, &TickInput::default());
        }
        assert_eq!(session.state.level(), 3);
        assert!(session.player.weapon.is_upgraded());
    }

    #[test]
    fn test_bottom_breach_costs_a_life_each_tick() {
        let mut session = running(1);
        session.store.clear();
        session
            .store
            .spawn_enemy(Archetype::Small, IVec2::new(100, BOTTOM_BREACH_Y), 0.0);
        session
            .store
            .spawn_enemy(Archetype::Small, IVec2::new(200, BOTTOM_BREACH_Y), 0.0);
        session
            .store
            .spawn_enemy(Archetype::Small, IVec2::new(300, 100), 0.0);

        tick(&mut session, &TickInput::default());
        assert_eq!(session.state.lives(), 2);
        assert_eq!(session.store.enemies.len(), 3);

        tick(&mut session, &TickInput::default());
        assert_eq!(session.state.lives(), 1);
        assert_eq!(session.state.level(), 1);
    }

    #[test]
    fn test_breached_wave_is_not_cleared() {
        let mut session = running(1);
        session.store.clear();
        session
            .store
            .spawn_enemy(Archetype::Small, IVec2::new(100, BOTTOM_BREACH_Y), 0.0);

        tick(&mut session, &TickInput::default());
        tick(&mut session, &TickInput::default());
        assert_eq!(session.state.level(), 1);
        assert_eq!(session.store.enemies.len(), 1);
        assert!(!session.player.weapon.is_upgraded());
    }

    #[test]
    fn test_erratic_setting_reaches_spawned_invaders() {
        let settings = Settings {
            zigzag: ZigzagMode::Erratic,
            ..Settings::with_seed(5)
        };
        let mut session = Session::new(settings);
        session.start();
        for _ in 0..2 {
            session.store.clear();
            tick(&mut session, &TickInput::default());
        }
        assert_eq!(session.state.level(), 3);

        let chances: Vec<f64> = session
            .store
            .enemies
            .iter()
            .filter(|e| e.archetype == Archetype::Medium)
            .filter_map(|e| match e.movement {
                MovementPolicy::Zigzag { flip_chance, .. } => Some(flip_chance),
                _ => None,
            })
            .collect();
        assert_eq!(chances.len(), 4);
        assert!(chances.iter().all(|&c| c == session.settings().erratic_flip_chance));
        assert!(chances[0] > 0.0);
    }

    #[test]
    fn test_default_zigzag_never_flips_at_random() {
        let mut session = running(5);
        for _ in 0..2 {
            session.store.clear();
            tick(&mut session, &TickInput::default());
        }
        assert!(session.store.enemies.iter().all(|e| match e.movement {
            MovementPolicy::Zigzag { flip_chance, .. } => flip_chance == 0.0,
            _ => true,
        }));
    }

    #[test]
    fn test_game_over_freezes_world() {
        let mut session = running(1);
        session.store.clear();
        session
            .store
            .spawn_enemy(Archetype::Small, IVec2::new(100, 100), 0.0);
        for _ in 0..3 {
            session
                .store
                .spawn_enemy(Archetype::Large, IVec2::new(300, BOTTOM_BREACH_Y), 0.0);
            tick(&mut session, &TickInput::default());
        }
        assert_eq!(session.phase(), GamePhase::GameOver);

        let ticks = session.time_ticks();
        let enemy_y = session.store.enemies[0].pos.y;
        tick(&mut session, &fire());
        assert_eq!(session.time_ticks(), ticks);
        assert_eq!(session.store.enemies[0].pos.y, enemy_y);
        assert!(session.store.player_shots.is_empty());
    }

    #[test]
    fn test_restart_only_from_game_over() {
        let mut session = running(1);
        let restart = TickInput {
            restart: true,
            ..Default::default()
        };
        tick(&mut session, &restart);
        assert_eq!(session.time_ticks(), 1);

        session.restart();
        assert_eq!(session.time_ticks(), 1);
    }

    #[test]
    fn test_determinism() {
        let mut a = running(99999);
        let mut b = running(99999);

        let inputs = [
            TickInput {
                move_left: true,
                fire: true,
                ..Default::default()
            },
            TickInput::default(),
            TickInput {
                move_right: true,
                ..Default::default()
            },
        ];

        for i in 0..600 {
            let input = &inputs[i % inputs.len()];
            tick(&mut a, input);
            tick(&mut b, input);
        }

        assert_eq!(a.time_ticks(), b.time_ticks());
        assert_eq!(a.state.score(), b.state.score());
        assert_eq!(a.state.lives(), b.state.lives());
        assert_eq!(a.player.pos, b.player.pos);
        assert_eq!(a.store.enemy_shots.len(), b.store.enemy_shots.len());
    }
}
