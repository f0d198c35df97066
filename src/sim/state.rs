//! Game state and core simulation types
//!
//! One `GameState` exists per open game view and owns every entity
//! collection. Collections are cleared between runs, never reallocated.

use std::collections::VecDeque;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::difficulty;
use crate::consts::DEFAULT_MAX_PARTICLES;
use crate::tuning::Tuning;

/// Current phase of the arcade session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Instructions screen, nothing simulated
    Start,
    /// Boot sequence counting down to play
    Booting,
    /// Active gameplay
    Playing,
    /// Run ended by a hazard
    GameOver,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Start => "start",
            GamePhase::Booting => "booting",
            GamePhase::Playing => "playing",
            GamePhase::GameOver => "gameover",
        }
    }

    /// Phases in which the frame loop keeps rescheduling itself
    pub fn is_running(&self) -> bool {
        matches!(self, GamePhase::Booting | GamePhase::Playing)
    }
}

/// Things that happened during a tick, drained by the platform layer for
/// sound cues, HUD updates and persistence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// Start action accepted, boot sequence running
    BootStarted,
    /// Boot finished, entities reset
    PlayingStarted,
    /// A score threshold was crossed
    LevelUp { level: u32 },
    /// A collectible was picked up at `pos`
    Collected { pos: Vec2 },
    /// The avatar touched a hazard
    Hit,
    /// Run ended
    GameOver { score: u64, best: u64, new_best: bool },
    /// Game view torn down
    Closed,
}

/// Visible area the simulation plays in
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// True while `pos` lies within the viewport grown by `margin` on each side
    pub fn contains_with_margin(&self, pos: Vec2, margin: f32) -> bool {
        pos.x >= -margin
            && pos.x <= self.width + margin
            && pos.y >= -margin
            && pos.y <= self.height + margin
    }
}

/// The player's avatar
#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    pub radius: f32,
    /// Recent positions, oldest first
    pub trail: VecDeque<Vec2>,
}

impl Player {
    pub fn new(pos: Vec2, radius: f32) -> Self {
        Self {
            pos,
            radius,
            trail: VecDeque::new(),
        }
    }

    /// Move a fraction of the way toward `target`
    pub fn follow(&mut self, target: Vec2, factor: f32) {
        self.pos += (target - self.pos) * factor;
    }

    /// Record current position, keeping at most `cap` points
    pub fn record_trail(&mut self, cap: usize) {
        self.trail.push_back(self.pos);
        while self.trail.len() > cap {
            self.trail.pop_front();
        }
    }

    /// Put the avatar back at `pos` with an empty trail
    pub fn reset(&mut self, pos: Vec2) {
        self.pos = pos;
        self.trail.clear();
    }
}

/// A hostile "glitch" flying across the screen
#[derive(Debug, Clone)]
pub struct Hazard {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

impl Hazard {
    pub fn advance(&mut self) {
        self.pos += self.vel;
    }

    pub fn is_finite(&self) -> bool {
        self.pos.is_finite() && self.vel.is_finite()
    }
}

/// A data orb worth points
#[derive(Debug, Clone)]
pub struct Collectible {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
}

/// A cosmetic spark from a pickup burst
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// 0-1, decreases every tick
    pub life: f32,
}

impl Particle {
    /// Move and age the particle. Returns false once it has expired.
    pub fn advance(&mut self, decay: f32) -> bool {
        self.pos += self.vel;
        self.life -= decay;
        self.life > 0.0 && self.pos.is_finite()
    }
}

/// Complete arcade state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the RNG was created from
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub tuning: Tuning,
    pub phase: GamePhase,
    pub score: u64,
    /// Best score known to this session (loaded from storage by the host)
    pub best_score: u64,
    /// Ticks simulated while Playing in the current run
    pub time_ticks: u64,
    /// Ticks left in the boot sequence
    pub boot_ticks_left: u32,
    /// Ticks left on the level-up banner
    pub banner_ticks_left: u32,
    pub viewport: Viewport,
    /// Pointer/touch coordinate the avatar steers toward
    pub target: Vec2,
    pub player: Player,
    pub hazards: Vec<Hazard>,
    pub collectibles: Vec<Collectible>,
    pub particles: Vec<Particle>,
    /// Cap on live particles (quality setting)
    pub max_particles: usize,
    pub(crate) hazard_timer: u32,
    pub(crate) collectible_timer: u32,
    events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a fresh session on the Start screen
    pub fn new(seed: u64, tuning: Tuning, viewport: Viewport) -> Self {
        let center = viewport.center();
        let player = Player::new(center, tuning.player_radius);
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            phase: GamePhase::Start,
            score: 0,
            best_score: 0,
            time_ticks: 0,
            boot_ticks_left: 0,
            banner_ticks_left: 0,
            viewport,
            target: center,
            player,
            hazards: Vec::new(),
            collectibles: Vec::new(),
            particles: Vec::new(),
            max_particles: DEFAULT_MAX_PARTICLES,
            hazard_timer: 0,
            collectible_timer: 0,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Seed the session with a previously stored best score
    pub fn with_best_score(mut self, best: u64) -> Self {
        self.best_score = best;
        self
    }

    /// Current difficulty level, always derived from the score
    pub fn level(&self) -> u32 {
        difficulty::level_for_score(&self.tuning, self.score)
    }

    /// Progress toward the next level in `[0, 1)`
    pub fn level_progress(&self) -> f32 {
        difficulty::level_progress(&self.tuning, self.score)
    }

    pub fn level_up_visible(&self) -> bool {
        self.banner_ticks_left > 0
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Start (or retry) a run. Ignored while already booting or playing.
    pub fn start(&mut self) -> bool {
        match self.phase {
            GamePhase::Start | GamePhase::GameOver => {
                self.clear_run();
                self.phase = GamePhase::Booting;
                self.boot_ticks_left = self.tuning.boot_ticks;
                self.push_event(GameEvent::BootStarted);
                log::info!("Boot sequence started");
                true
            }
            GamePhase::Booting | GamePhase::Playing => false,
        }
    }

    /// Boot finished: reset the run and begin simulating
    pub(crate) fn begin_playing(&mut self) {
        self.clear_run();
        self.phase = GamePhase::Playing;
        self.push_event(GameEvent::PlayingStarted);
        log::info!("Run started (seed {}, best {})", self.seed, self.best_score);
    }

    /// Hazard contact: stop the run and commit the best score
    pub(crate) fn end_game(&mut self) {
        if self.phase != GamePhase::Playing {
            return;
        }
        self.phase = GamePhase::GameOver;
        self.banner_ticks_left = 0;
        let new_best = self.score > self.best_score;
        self.best_score = self.best_score.max(self.score);
        self.push_event(GameEvent::Hit);
        self.push_event(GameEvent::GameOver {
            score: self.score,
            best: self.best_score,
            new_best,
        });
        log::info!(
            "Game over: score {} (level {}), best {}",
            self.score,
            self.level(),
            self.best_score
        );
    }

    /// Tear the view down from any phase, back to the Start screen
    pub fn close(&mut self) {
        self.clear_run();
        self.phase = GamePhase::Start;
        self.boot_ticks_left = 0;
        self.events.clear();
        self.push_event(GameEvent::Closed);
    }

    fn clear_run(&mut self) {
        let center = self.viewport.center();
        self.score = 0;
        self.time_ticks = 0;
        self.banner_ticks_left = 0;
        self.hazard_timer = 0;
        self.collectible_timer = 0;
        self.hazards.clear();
        self.collectibles.clear();
        self.particles.clear();
        self.player.reset(center);
        self.target = center;
    }
}
