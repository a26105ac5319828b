//! Invaders entry point
//!
//! Runs a scripted, headless session: the ship sweeps back and forth firing
//! until the run ends (or a tick limit is hit), then prints the final frame.

use invaders::{AsciiSurface, GamePhase, Session, Settings, TickInput, tick};

/// About five minutes of play at 60 Hz
const MAX_TICKS: u64 = 60 * 60 * 5;
/// Ticks spent sweeping in one direction
const SWEEP_TICKS: u64 = 150;

fn scripted_input(t: u64) -> TickInput {
    let leftward = (t / SWEEP_TICKS) % 2 == 0;
    TickInput {
        move_left: leftward,
        move_right: !leftward,
        // Tap fire every few ticks; the weapon cooldown drops the rest
        fire: t % 4 == 0,
        restart: false,
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Invaders (headless demo) starting...");

    let settings = match std::env::var("INVADERS_SETTINGS") {
        Ok(json) => Settings::from_json_or_default(&json),
        Err(_) => Settings::default(),
    };

    let mut session = Session::new(settings);
    session.start();

    let mut t = 0;
    while t < MAX_TICKS && session.phase() == GamePhase::Running {
        tick(&mut session, &scripted_input(t));
        t += 1;
        if t % 600 == 0 {
            log::info!("[{:>5}] {}", t, session.hud().status_line());
        }
    }

    log::info!(
        "Stopped after {} ticks ({} ms simulated)",
        t,
        session.clock_ms()
    );

    let mut surface = AsciiSurface::default();
    session.render(&mut surface);
    println!("{surface}");
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The core is driven by the host page on wasm
}
