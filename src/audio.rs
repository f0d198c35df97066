//! Audio cues using the Web Audio API
//!
//! Procedurally generated blips - no external files needed. Sound is
//! decorative: every failure is swallowed.

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::settings::Settings;

/// Sound cue types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// Boot sequence started
    Start,
    /// Collectible picked up
    Collect,
    /// Avatar hit a hazard
    Hit,
    /// New level reached
    LevelUp,
}

/// Audio manager for the arcade
pub struct AudioManager {
    ctx: Option<AudioContext>,
    /// Context creation already failed once; don't retry every cue
    unavailable: bool,
    volume: f32,
}

impl AudioManager {
    pub fn new(settings: &Settings) -> Self {
        Self {
            ctx: None,
            unavailable: false,
            volume: settings.effective_volume(),
        }
    }

    pub fn apply_settings(&mut self, settings: &Settings) {
        self.volume = settings.effective_volume();
    }

    /// Lazily create the context; browsers only allow it after a user gesture
    fn context(&mut self) -> Option<&AudioContext> {
        if self.ctx.is_none() && !self.unavailable {
            match AudioContext::new() {
                Ok(ctx) => self.ctx = Some(ctx),
                Err(_) => {
                    log::warn!("Failed to create AudioContext - audio disabled");
                    self.unavailable = true;
                }
            }
        }
        self.ctx.as_ref()
    }

    /// Play a cue
    pub fn play(&mut self, cue: Cue) {
        let vol = self.volume;
        if vol <= 0.0 {
            return;
        }

        let Some(ctx) = self.context() else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match cue {
            Cue::Start => play_start(ctx, vol),
            Cue::Collect => play_collect(ctx, vol),
            Cue::Hit => play_hit(ctx, vol),
            Cue::LevelUp => play_level_up(ctx, vol),
        }
    }
}

/// Create an oscillator routed through a gain node
fn create_osc(
    ctx: &AudioContext,
    freq: f32,
    osc_type: OscillatorType,
) -> Option<(OscillatorNode, GainNode)> {
    let osc = ctx.create_oscillator().ok()?;
    let gain = ctx.create_gain().ok()?;

    osc.set_type(osc_type);
    osc.frequency().set_value(freq);
    osc.connect_with_audio_node(&gain).ok()?;
    gain.connect_with_audio_node(&ctx.destination()).ok()?;

    Some((osc, gain))
}

/// Start - rising triangle sweep
fn play_start(ctx: &AudioContext, vol: f32) {
    let Some((osc, gain)) = create_osc(ctx, 200.0, OscillatorType::Triangle) else {
        return;
    };
    let t = ctx.current_time();

    osc.frequency().set_value_at_time(200.0, t).ok();
    osc.frequency().linear_ramp_to_value_at_time(600.0, t + 0.5).ok();
    gain.gain().set_value_at_time(vol * 0.1, t).ok();
    gain.gain().linear_ramp_to_value_at_time(0.0, t + 0.5).ok();

    osc.start().ok();
    osc.stop_with_when(t + 0.5).ok();
}

/// Collect - quick bright chirp
fn play_collect(ctx: &AudioContext, vol: f32) {
    let Some((osc, gain)) = create_osc(ctx, 600.0, OscillatorType::Sine) else {
        return;
    };
    let t = ctx.current_time();

    osc.frequency().set_value_at_time(600.0, t).ok();
    osc.frequency()
        .exponential_ramp_to_value_at_time(1000.0, t + 0.1)
        .ok();
    gain.gain().set_value_at_time(vol * 0.1, t).ok();
    gain.gain()
        .exponential_ramp_to_value_at_time(0.01, t + 0.1)
        .ok();

    osc.start().ok();
    osc.stop_with_when(t + 0.1).ok();
}

/// Hit - falling sawtooth buzz
fn play_hit(ctx: &AudioContext, vol: f32) {
    let Some((osc, gain)) = create_osc(ctx, 100.0, OscillatorType::Sawtooth) else {
        return;
    };
    let t = ctx.current_time();

    osc.frequency().set_value_at_time(100.0, t).ok();
    osc.frequency().linear_ramp_to_value_at_time(50.0, t + 0.3).ok();
    gain.gain().set_value_at_time(vol * 0.2, t).ok();
    gain.gain()
        .exponential_ramp_to_value_at_time(0.01, t + 0.3)
        .ok();

    osc.start().ok();
    osc.stop_with_when(t + 0.3).ok();
}

/// Level up - square wave climb
fn play_level_up(ctx: &AudioContext, vol: f32) {
    let Some((osc, gain)) = create_osc(ctx, 400.0, OscillatorType::Square) else {
        return;
    };
    let t = ctx.current_time();

    osc.frequency().set_value_at_time(400.0, t).ok();
    osc.frequency().linear_ramp_to_value_at_time(800.0, t + 0.2).ok();
    gain.gain().set_value_at_time(vol * 0.1, t).ok();
    gain.gain().linear_ramp_to_value_at_time(0.0, t + 0.4).ok();

    osc.start().ok();
    osc.stop_with_when(t + 0.4).ok();
}
