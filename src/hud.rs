//! What the player and the host page are told about the game
//!
//! `Overlay` picks the screen drawn over the playfield for the current
//! phase. `HostNotice` is the slimmed-down event forwarded to the host
//! page's callback.

use crate::sim::{GameEvent, GamePhase, GameState};

/// Screen layer drawn on top of (or instead of) the playfield
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Overlay {
    /// Instructions screen with the stored best score
    Title { best: u64 },
    /// Boot sequence, `progress` in `[0, 1]`
    Boot { progress: f32 },
    /// In-run score/level readout
    Hud { score: u64, level: u32, progress: f32 },
    /// "SYSTEM FAILURE" summary of the finished run
    Failure { score: u64, level: u32, best: u64 },
}

impl Overlay {
    pub fn for_state(state: &GameState) -> Self {
        match state.phase {
            GamePhase::Start => Overlay::Title {
                best: state.best_score,
            },
            GamePhase::Booting => Overlay::Boot {
                progress: boot_progress(state),
            },
            GamePhase::Playing => Overlay::Hud {
                score: state.score,
                level: state.level(),
                progress: state.level_progress(),
            },
            GamePhase::GameOver => Overlay::Failure {
                score: state.score,
                level: state.level(),
                best: state.best_score,
            },
        }
    }

    /// Whether entities are drawn underneath
    pub fn shows_playfield(&self) -> bool {
        matches!(self, Overlay::Hud { .. } | Overlay::Failure { .. })
    }
}

/// Fraction of the boot sequence already elapsed
pub fn boot_progress(state: &GameState) -> f32 {
    let total = state.tuning.boot_ticks;
    if total == 0 {
        return 1.0;
    }
    let left = state.boot_ticks_left.min(total);
    1.0 - left as f32 / total as f32
}

/// Event forwarded to the host page as `callback(kind, value)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostNotice {
    pub kind: &'static str,
    /// Level for "levelup", final score for "gameover", 0 otherwise
    pub value: u64,
}

impl HostNotice {
    /// Phase changes and milestones only; per-pickup events stay internal
    pub fn from_event(event: &GameEvent) -> Option<Self> {
        let (kind, value) = match *event {
            GameEvent::BootStarted => ("booting", 0),
            GameEvent::PlayingStarted => ("playing", 0),
            GameEvent::LevelUp { level } => ("levelup", level as u64),
            GameEvent::GameOver { score, .. } => ("gameover", score),
            GameEvent::Closed => ("closed", 0),
            GameEvent::Collected { .. } | GameEvent::Hit => return None,
        };
        Some(Self { kind, value })
    }
}
