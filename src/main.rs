//! Growth Rush entry point
//!
//! The browser build is driven through `platform::GameHandle`. Natively this
//! runs a headless session with a simple autopilot, which is handy for
//! checking balance changes from the terminal:
//!
//! ```text
//! growth-rush [seed] [max_ticks]
//! ```

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use glam::Vec2;
    use growth_rush::sim::{GameEvent, GamePhase, GameState, TickInput, Viewport, tick};
    use growth_rush::{BestScore, MemoryStore, Tuning};

    /// Steer away from nearby hazards, otherwise chase the nearest orb
    fn autopilot(state: &GameState) -> Vec2 {
        let pos = state.player.pos;
        let mut push = Vec2::ZERO;
        for hazard in &state.hazards {
            let away = pos - hazard.pos;
            let dist = away.length();
            if dist < 120.0 {
                push += away.normalize_or_zero() * (120.0 - dist);
            }
        }
        if push != Vec2::ZERO {
            return pos + push;
        }

        state
            .collectibles
            .iter()
            .min_by(|a, b| {
                a.pos
                    .distance_squared(pos)
                    .total_cmp(&b.pos.distance_squared(pos))
            })
            .map(|orb| orb.pos)
            .unwrap_or_else(|| state.viewport.center())
    }

    pub fn run(seed: u64, max_ticks: u64) {
        let mut store = MemoryStore::new();
        let mut best = BestScore::load(&store);
        let viewport = Viewport::new(1280.0, 720.0);
        let mut state = GameState::new(seed, Tuning::default(), viewport).with_best_score(best.get());

        let mut input = TickInput {
            start: true,
            ..Default::default()
        };
        let mut pickups = 0u32;

        for _ in 0..max_ticks {
            tick(&mut state, &input);
            input.start = false;
            input.target = Some(autopilot(&state));

            for event in state.drain_events() {
                match event {
                    GameEvent::Collected { .. } => pickups += 1,
                    GameEvent::LevelUp { level } => log::info!("Reached level {level}"),
                    GameEvent::GameOver { score, .. } => {
                        best.commit(&mut store, score);
                    }
                    _ => {}
                }
            }
            if state.phase == GamePhase::GameOver {
                break;
            }
        }

        log::info!(
            "Session over: phase {}, score {}, level {}, {} pickups in {} ticks ({:.1}s), best {}",
            state.phase.as_str(),
            state.score,
            state.level(),
            pickups,
            state.time_ticks,
            state.time_ticks as f32 * growth_rush::consts::FRAME_DT,
            best.get()
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(0x6772_6f77);
    let max_ticks = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(60 * 60 * 5);

    log::info!("Growth Rush (headless) seed {seed}, up to {max_ticks} ticks");
    headless::run(seed, max_ticks);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::driver::wasm_start
}
