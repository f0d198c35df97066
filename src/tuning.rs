//! Data-driven game balance
//!
//! Every gameplay number lives here so the arcade can be rebalanced from a
//! JSON file without touching simulation code. Missing fields fall back to
//! the shipped values in [`crate::consts`].

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Gameplay constants consumed by the simulation.
///
/// Durations are in frame ticks, distances in canvas pixels and speeds in
/// pixels per tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Score needed to advance one level
    pub level_step: u64,
    /// Hazard spawn interval before level scaling
    pub spawn_interval_base: u32,
    /// Ticks removed from the spawn interval per level
    pub spawn_interval_step: u32,
    /// Floor for the hazard spawn interval
    pub spawn_interval_min: u32,
    /// Hazard base speed is rolled uniformly in `[min, max)`
    pub hazard_speed_min: f32,
    pub hazard_speed_max: f32,
    /// Extra hazard speed per level
    pub hazard_speed_per_level: f32,
    /// Hazard radius is rolled uniformly in `[min, max)`
    pub hazard_radius_min: f32,
    pub hazard_radius_max: f32,
    /// How far past the viewport a hazard may travel before despawning
    pub despawn_margin: f32,
    /// Ticks between collectible spawns
    pub collectible_interval: u32,
    pub collectible_radius: f32,
    /// Keep collectibles this far from every edge
    pub collectible_inset: f32,
    /// Extra reach when picking up collectibles
    pub pickup_tolerance: f32,
    /// Score granted per collectible
    pub pickup_score: u64,
    /// Particles emitted per pickup
    pub burst_count: usize,
    /// Width of the uniform range each particle velocity component is drawn from
    pub burst_spread: f32,
    /// Life lost by a particle every tick
    pub particle_decay: f32,
    pub player_radius: f32,
    /// Fraction of the remaining distance the avatar covers each tick
    pub follow_factor: f32,
    /// Trail length at level 0 (before the per-level bonus)
    pub trail_base: usize,
    pub trail_per_level: usize,
    /// Length of the boot sequence before play starts
    pub boot_ticks: u32,
    /// How long the level-up banner stays visible
    pub banner_ticks: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            level_step: LEVEL_STEP,
            spawn_interval_base: SPAWN_INTERVAL_BASE,
            spawn_interval_step: SPAWN_INTERVAL_STEP,
            spawn_interval_min: SPAWN_INTERVAL_MIN,
            hazard_speed_min: 2.0,
            hazard_speed_max: 5.0,
            hazard_speed_per_level: 0.5,
            hazard_radius_min: 10.0,
            hazard_radius_max: 20.0,
            despawn_margin: DESPAWN_MARGIN,
            collectible_interval: COLLECTIBLE_INTERVAL,
            collectible_radius: 6.0,
            collectible_inset: 20.0,
            pickup_tolerance: 15.0,
            pickup_score: PICKUP_SCORE,
            burst_count: 8,
            burst_spread: 8.0,
            particle_decay: 0.04,
            player_radius: PLAYER_RADIUS,
            follow_factor: 0.15,
            trail_base: 5,
            trail_per_level: 2,
            boot_ticks: (BOOT_SECONDS / FRAME_DT).round() as u32,
            banner_ticks: (BANNER_SECONDS / FRAME_DT).round() as u32,
        }
    }
}

impl Tuning {
    /// Parse tuning overrides from JSON; absent fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Parse tuning overrides, falling back to defaults on malformed input.
    pub fn from_json_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(tuning) => tuning,
            Err(err) => {
                log::warn!("Ignoring malformed tuning ({err}), using defaults");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_durations_at_60hz() {
        let tuning = Tuning::default();
        assert_eq!(tuning.boot_ticks, 90);
        assert_eq!(tuning.banner_ticks, 120);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "pickup_score": 250 }"#).unwrap();
        assert_eq!(tuning.pickup_score, 250);
        assert_eq!(tuning.level_step, 500);
        assert_eq!(tuning.spawn_interval_min, 15);
    }

    #[test]
    fn test_malformed_json_falls_back() {
        assert!(Tuning::from_json("{ nope").is_err());
        assert_eq!(Tuning::from_json_or_default("{ nope"), Tuning::default());
    }
}
