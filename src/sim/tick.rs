//! Fixed timestep simulation tick
//!
//! One call advances the arcade by exactly one frame tick. Input listeners
//! only fill in a `TickInput`; all entity mutation happens here.

use glam::Vec2;

use super::collision;
use super::difficulty;
use super::spawn;
use super::state::{GamePhase, GameState, Viewport};

/// Input collected since the previous tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Latest pointer/touch coordinate in canvas space
    pub target: Option<Vec2>,
    /// New canvas size after a resize
    pub viewport: Option<Viewport>,
    /// Start / retry button pressed
    pub start: bool,
}

/// Advance the game state by one frame tick
pub fn tick(state: &mut GameState, input: &TickInput) {
    if let Some(viewport) = input.viewport {
        state.resize(viewport);
    }
    if let Some(target) = input.target.filter(|t| t.is_finite()) {
        state.target = target;
    }
    if input.start {
        state.start();
    }

    match state.phase {
        GamePhase::Start | GamePhase::GameOver => return,
        GamePhase::Booting => {
            state.boot_ticks_left = state.boot_ticks_left.saturating_sub(1);
            if state.boot_ticks_left == 0 {
                state.begin_playing();
            }
            return;
        }
        GamePhase::Playing => {}
    }

    state.time_ticks += 1;
    state.banner_ticks_left = state.banner_ticks_left.saturating_sub(1);

    update_player(state);
    spawn::run_spawners(state);
    update_entities(state);
    collision::resolve(state);
}

/// Ease the avatar toward the target and extend its trail
fn update_player(state: &mut GameState) {
    let factor = state.tuning.follow_factor;
    state.player.follow(state.target, factor);
    if !state.player.pos.is_finite() {
        log::warn!("Player position went non-finite, recentring");
        let center = state.viewport.center();
        state.player.reset(center);
        state.target = center;
    }
    let cap = difficulty::trail_capacity(&state.tuning, state.level());
    state.player.record_trail(cap);
}

/// Move hazards and particles, dropping anything that left play or went bad
fn update_entities(state: &mut GameState) {
    let viewport = state.viewport;
    let margin = state.tuning.despawn_margin;
    state.hazards.retain_mut(|h| {
        h.advance();
        h.is_finite() && viewport.contains_with_margin(h.pos, margin)
    });

    state.collectibles.retain(|c| c.pos.is_finite());

    let decay = state.tuning.particle_decay;
    state.particles.retain_mut(|p| p.advance(decay));
}
