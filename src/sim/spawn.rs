//! Entity spawning
//!
//! Hazards enter from a random screen edge aimed at the avatar; collectibles
//! appear at random positions inside the viewport.

use glam::Vec2;
use rand::Rng;

use super::difficulty;
use super::state::{Collectible, GameState, Hazard, Viewport};

/// Roll uniformly in `[lo, hi)`, or the midpoint when the span is empty
fn roll_span<R: Rng>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    if hi > lo {
        rng.random_range(lo..hi)
    } else {
        (lo + hi) / 2.0
    }
}

/// Pick a point just outside one of the four viewport edges.
///
/// Half the time a vertical edge is chosen (x = -r or width + r), otherwise
/// a horizontal one (y = -r or height + r).
pub fn edge_point<R: Rng>(rng: &mut R, viewport: &Viewport, radius: f32) -> Vec2 {
    if rng.random_bool(0.5) {
        let x = if rng.random_bool(0.5) {
            -radius
        } else {
            viewport.width + radius
        };
        Vec2::new(x, roll_span(rng, 0.0, viewport.height))
    } else {
        let y = if rng.random_bool(0.5) {
            -radius
        } else {
            viewport.height + radius
        };
        Vec2::new(roll_span(rng, 0.0, viewport.width), y)
    }
}

/// Velocity from `from` toward `target` at `speed`.
///
/// If the two points coincide the hazard heads for `fallback` instead, and
/// if that also coincides it moves right.
pub fn aim_velocity(from: Vec2, target: Vec2, fallback: Vec2, speed: f32) -> Vec2 {
    let dir = (target - from)
        .try_normalize()
        .or_else(|| (fallback - from).try_normalize())
        .unwrap_or(Vec2::X);
    dir * speed
}

/// Spawn one hazard aimed at the avatar's current position
pub fn spawn_hazard(state: &mut GameState) -> u32 {
    let level = state.level();
    let t = &state.tuning;
    let (radius_min, radius_max) = (t.hazard_radius_min, t.hazard_radius_max);

    let radius = roll_span(&mut state.rng, radius_min, radius_max);
    let pos = edge_point(&mut state.rng, &state.viewport, radius);
    let speed = difficulty::hazard_speed(&state.tuning, level, &mut state.rng);
    let vel = aim_velocity(pos, state.player.pos, state.viewport.center(), speed);

    let id = state.next_entity_id();
    state.hazards.push(Hazard {
        id,
        pos,
        vel,
        radius,
    });
    log::debug!("Hazard {id} spawned at {pos} (speed {speed:.2}, level {level})");
    id
}

/// Spawn one collectible somewhere inside the inset viewport
pub fn spawn_collectible(state: &mut GameState) -> u32 {
    let inset = state.tuning.collectible_inset;
    let radius = state.tuning.collectible_radius;
    let vp = state.viewport;

    let x = roll_span(&mut state.rng, inset, vp.width - inset);
    let y = roll_span(&mut state.rng, inset, vp.height - inset);

    let id = state.next_entity_id();
    state.collectibles.push(Collectible {
        id,
        pos: Vec2::new(x, y),
        radius,
    });
    id
}

/// Advance both spawn timers and spawn whatever is due this tick
pub fn run_spawners(state: &mut GameState) {
    let interval = difficulty::spawn_interval(&state.tuning, state.level());
    state.hazard_timer += 1;
    if state.hazard_timer >= interval {
        spawn_hazard(state);
        state.hazard_timer = 0;
    }

    state.collectible_timer += 1;
    if state.collectible_timer >= state.tuning.collectible_interval {
        spawn_collectible(state);
        state.collectible_timer = 0;
    }
}
