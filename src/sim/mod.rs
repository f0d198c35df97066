//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One fixed frame tick per `tick` call
//! - Seeded RNG only
//! - No rendering, audio or storage dependencies

pub mod collision;
pub mod difficulty;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{CollisionResult, circles_overlap};
pub use difficulty::{level_for_score, level_progress, level_ups, spawn_interval};
pub use state::{
    Collectible, GameEvent, GamePhase, GameState, Hazard, Particle, Player, Viewport,
};
pub use tick::{TickInput, tick};
