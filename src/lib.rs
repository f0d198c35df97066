//! Growth Rush - the Conecta arcade mini-game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, collisions, scoring, phases)
//! - `tuning`: Data-driven game balance
//! - `settings`: Player preferences
//! - `highscore`: Best score persistence over a key-value store
//! - `hud`: Overlay screens and host notifications derived from the state
//! - `renderer`, `audio`, `platform`: Browser canvas, Web Audio and the
//!   frame loop (wasm32 only)

pub mod highscore;
pub mod hud;
pub mod settings;
pub mod sim;
pub mod tuning;

#[cfg(target_arch = "wasm32")]
pub mod audio;
#[cfg(target_arch = "wasm32")]
pub mod platform;
#[cfg(target_arch = "wasm32")]
pub mod renderer;

pub use highscore::{BestScore, KeyValueStore, MemoryStore, StorageError};
pub use hud::{HostNotice, Overlay};
pub use settings::{QualityPreset, Settings};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (one display frame at 60 Hz)
    pub const FRAME_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per display frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;
    /// Longest wall-clock gap folded into one display frame (seconds)
    pub const MAX_FRAME_GAP: f32 = 0.1;

    /// Score per level
    pub const LEVEL_STEP: u64 = 500;
    /// Hazard spawn interval: max(MIN, BASE - STEP * level) ticks
    pub const SPAWN_INTERVAL_BASE: u32 = 45;
    pub const SPAWN_INTERVAL_STEP: u32 = 3;
    pub const SPAWN_INTERVAL_MIN: u32 = 15;
    /// Ticks between collectible spawns
    pub const COLLECTIBLE_INTERVAL: u32 = 60;
    /// Hazards this far outside the viewport are dropped
    pub const DESPAWN_MARGIN: f32 = 100.0;
    pub const PICKUP_SCORE: u64 = 100;
    pub const PLAYER_RADIUS: f32 = 10.0;

    /// Boot sequence length (seconds)
    pub const BOOT_SECONDS: f32 = 1.5;
    /// Level-up banner visibility (seconds)
    pub const BANNER_SECONDS: f32 = 2.0;

    /// Particle cap before settings are applied
    pub const DEFAULT_MAX_PARTICLES: usize = 256;
}
