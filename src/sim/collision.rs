//! Collision detection and scoring
//!
//! Everything here is circle-vs-circle against the avatar. Hazards and
//! collectibles never test against each other.

use glam::Vec2;
use rand::Rng;

use super::difficulty;
use super::state::{GameEvent, GamePhase, GameState, Particle};

/// Outcome of a collision pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CollisionResult {
    /// A hazard touched the avatar
    pub hit: bool,
    /// Collectibles picked up this pass
    pub collected: u32,
}

/// `distance(a, b) < ra + rb + tolerance`
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32, tolerance: f32) -> bool {
    a.distance_squared(b) < (ra + rb + tolerance).powi(2)
}

/// Test the avatar against every live hazard and collectible.
///
/// A hazard hit ends the run immediately and skips the pickup pass.
pub fn resolve(state: &mut GameState) -> CollisionResult {
    let mut result = CollisionResult::default();
    if state.phase != GamePhase::Playing {
        return result;
    }

    let player_pos = state.player.pos;
    let player_radius = state.player.radius;

    let before = state.hazards.len();
    state
        .hazards
        .retain(|h| !circles_overlap(player_pos, player_radius, h.pos, h.radius, 0.0));
    if state.hazards.len() != before {
        result.hit = true;
        state.end_game();
        return result;
    }

    let tolerance = state.tuning.pickup_tolerance;
    let mut picked = Vec::new();
    state.collectibles.retain(|c| {
        let touching = circles_overlap(player_pos, player_radius, c.pos, c.radius, tolerance);
        if touching {
            picked.push(c.pos);
        }
        !touching
    });

    for pos in picked {
        collect_at(state, pos);
        result.collected += 1;
    }
    result
}

/// Award a pickup at `pos`: score, particle burst, cue and level-up check
fn collect_at(state: &mut GameState, pos: Vec2) {
    let old_score = state.score;
    state.score = state.score.saturating_add(state.tuning.pickup_score);
    state.push_event(GameEvent::Collected { pos });
    emit_burst(state, pos);

    for level in difficulty::level_ups(&state.tuning, old_score, state.score) {
        state.push_event(GameEvent::LevelUp { level });
        state.banner_ticks_left = state.tuning.banner_ticks;
        log::info!("Level up: {level} (score {})", state.score);
    }
}

/// Spray `burst_count` particles from `pos`, respecting the particle cap
fn emit_burst(state: &mut GameState, pos: Vec2) {
    let half = state.tuning.burst_spread / 2.0;
    for _ in 0..state.tuning.burst_count {
        if state.particles.len() >= state.max_particles {
            break;
        }
        let vel = if half > 0.0 {
            Vec2::new(
                state.rng.random_range(-half..half),
                state.rng.random_range(-half..half),
            )
        } else {
            Vec2::ZERO
        };
        state.particles.push(Particle { pos, vel, life: 1.0 });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Collectible, Hazard, Viewport};
    use crate::tuning::Tuning;

    fn playing_state() -> GameState {
        let mut state = GameState::new(42, Tuning::default(), Viewport::new(800.0, 600.0));
        state.start();
        state.begin_playing();
        state.drain_events();
        state
    }

    fn orb_at(state: &mut GameState, pos: Vec2) {
        let id = state.next_entity_id();
        state.collectibles.push(Collectible { id, pos, radius: 6.0 });
    }

    #[test]
    fn test_circles_overlap() {
        assert!(circles_overlap(Vec2::ZERO, 10.0, Vec2::new(19.9, 0.0), 10.0, 0.0));
        assert!(!circles_overlap(Vec2::ZERO, 10.0, Vec2::new(20.0, 0.0), 10.0, 0.0));
        assert!(circles_overlap(Vec2::ZERO, 10.0, Vec2::new(30.0, 0.0), 6.0, 15.0));
    }

    #[test]
    fn test_hazard_hit_ends_game() {
        let mut state = playing_state();
        state.score = 700;
        let id = state.next_entity_id();
        state.hazards.push(Hazard {
            id,
            pos: state.player.pos + Vec2::new(5.0, 0.0),
            vel: Vec2::ZERO,
            radius: 10.0,
        });
        let at_player = state.player.pos;
        orb_at(&mut state, at_player);

        let result = resolve(&mut state);
        assert!(result.hit);
        assert_eq!(result.collected, 0, "pickups are skipped after a hit");
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.best_score, 700);
        assert!(state.hazards.is_empty());
        let events = state.drain_events();
        assert_eq!(events[0], GameEvent::Hit);
        assert!(matches!(events[1], GameEvent::GameOver { score: 700, new_best: true, .. }));
    }

    #[test]
    fn test_pickup_grants_exactly_one_hundred() {
        let mut state = playing_state();
        let near = state.player.pos + Vec2::new(25.0, 0.0);
        orb_at(&mut state, near);

        let result = resolve(&mut state);
        assert_eq!(result.collected, 1);
        assert_eq!(state.score, 100);
        assert!(state.collectibles.is_empty());
        assert_eq!(state.particles.len(), 8);
        for p in &state.particles {
            assert!(p.vel.x.abs() <= 4.0 && p.vel.y.abs() <= 4.0);
            assert_eq!(p.pos, near);
        }
        assert_eq!(state.drain_events(), vec![GameEvent::Collected { pos: near }]);
    }

    #[test]
    fn test_far_orb_is_untouched() {
        let mut state = playing_state();
        let far = state.player.pos + Vec2::new(31.0, 0.0);
        orb_at(&mut state, far);
        assert_eq!(resolve(&mut state).collected, 0);
        assert_eq!(state.collectibles.len(), 1);
    }

    #[test]
    fn test_fifth_pickup_levels_up_once() {
        let mut state = playing_state();
        for _ in 0..5 {
            let at_player = state.player.pos;
            orb_at(&mut state, at_player);
            resolve(&mut state);
        }
        assert_eq!(state.score, 500);
        assert_eq!(state.level(), 2);
        let level_ups: Vec<_> = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::LevelUp { .. }))
            .collect();
        assert_eq!(level_ups, vec![GameEvent::LevelUp { level: 2 }]);
        assert!(state.level_up_visible());
    }

    #[test]
    fn test_bonus_pickup_crossing_threshold_levels_up() {
        let mut state = playing_state();
        state.tuning.pickup_score = 150;
        for _ in 0..4 {
            let at_player = state.player.pos;
            orb_at(&mut state, at_player);
            resolve(&mut state);
        }
        // 150, 300, 450, 600: never lands on 500
        assert_eq!(state.score, 600);
        let ups = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::LevelUp { .. }))
            .count();
        assert_eq!(ups, 1);
    }

    #[test]
    fn test_particle_cap() {
        let mut state = playing_state();
        state.max_particles = 3;
        let at_player = state.player.pos;
        orb_at(&mut state, at_player);
        resolve(&mut state);
        assert_eq!(state.particles.len(), 3);
    }
}
