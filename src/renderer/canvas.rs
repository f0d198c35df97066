//! Immediate-mode 2D canvas renderer
//!
//! Nothing is retained between frames: the canvas is dimmed with a
//! translucent fill and everything is drawn again, which leaves motion trails.

use std::f64::consts::TAU;

use glam::Vec2;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::hud::Overlay;
use crate::settings::Settings;
use crate::sim::{GamePhase, GameState};

const FADE: &str = "rgba(5, 5, 5, 0.25)";
const PLAYER: &str = "#2563eb";
const PLAYER_TRAIL: &str = "rgba(37, 99, 235, 0.5)";
const HAZARD: &str = "#ef4444";
const COLLECTIBLE: &str = "#ffffff";
const PARTICLE: &str = "#60a5fa";
const PROGRESS_TRACK: &str = "#1f2937";
const BANNER: &str = "#22d3ee";
const TEXT: &str = "#ffffff";
const MUTED: &str = "#9ca3af";
const PANEL: &str = "rgba(0, 0, 0, 0.8)";
const LABEL_FONT: &str = "bold 10px sans-serif";
const VALUE_FONT: &str = "bold 30px sans-serif";

/// Draws a `GameState` onto a canvas
pub struct CanvasRenderer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasRenderer {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into()?;
        Ok(Self { canvas, ctx })
    }

    /// Match the canvas backing store to the viewport
    pub fn resize(&self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    /// Wipe the canvas completely (used when the view closes)
    pub fn clear(&self) {
        let w = self.canvas.width() as f64;
        let h = self.canvas.height() as f64;
        self.ctx.clear_rect(0.0, 0.0, w, h);
    }

    /// Render one frame
    pub fn render(&self, state: &GameState, settings: &Settings, time_ms: f64) {
        let ctx = &self.ctx;
        let w = state.viewport.width as f64;
        let h = state.viewport.height as f64;
        let overlay = Overlay::for_state(state);

        if state.phase == GamePhase::Start {
            // Drawn once while idle, so no trail fade
            ctx.clear_rect(0.0, 0.0, w, h);
        } else {
            ctx.set_fill_style_str(FADE);
            ctx.fill_rect(0.0, 0.0, w, h);
        }

        if overlay.shows_playfield() {
            self.draw_playfield(state, settings, time_ms);
        }

        match overlay {
            Overlay::Title { best } => self.draw_title(w, h, best),
            Overlay::Boot { progress } => self.draw_boot(w, h, progress),
            Overlay::Hud {
                score,
                level,
                progress,
            } => {
                self.draw_hud(w, score, level, progress);
                if state.level_up_visible() {
                    self.draw_banner(w);
                }
            }
            Overlay::Failure { score, level, best } => self.draw_failure(w, h, score, level, best),
        }
    }

    fn draw_playfield(&self, state: &GameState, settings: &Settings, time_ms: f64) {
        let ctx = &self.ctx;
        let glow = settings.quality.glow_enabled();

        if settings.effective_trails() {
            self.draw_trail(state);
        }
        self.draw_player(state, glow);

        ctx.set_fill_style_str(HAZARD);
        for hazard in &state.hazards {
            self.draw_triangle(hazard.pos, hazard.radius);
        }

        let pulse = if settings.effective_pulse() {
            (time_ms / 200.0).sin() * 2.0
        } else {
            0.0
        };
        if glow {
            ctx.set_shadow_blur(10.0);
            ctx.set_shadow_color("#fff");
        }
        ctx.set_fill_style_str(COLLECTIBLE);
        for orb in &state.collectibles {
            let r = (orb.radius as f64 + pulse).max(1.0);
            self.fill_circle(orb.pos, r);
        }
        ctx.set_shadow_blur(0.0);

        ctx.set_fill_style_str(PARTICLE);
        for p in &state.particles {
            ctx.set_global_alpha(p.life.clamp(0.0, 1.0) as f64);
            self.fill_circle(p.pos, 2.0);
        }
        ctx.set_global_alpha(1.0);
    }

    fn draw_trail(&self, state: &GameState) {
        let trail = &state.player.trail;
        if trail.len() < 2 {
            return;
        }
        let ctx = &self.ctx;
        ctx.begin_path();
        for (i, p) in trail.iter().enumerate() {
            if i == 0 {
                ctx.move_to(p.x as f64, p.y as f64);
            } else {
                ctx.line_to(p.x as f64, p.y as f64);
            }
        }
        ctx.set_stroke_style_str(PLAYER_TRAIL);
        ctx.set_line_width(state.player.radius as f64);
        ctx.set_line_cap("round");
        ctx.stroke();
    }

    fn draw_player(&self, state: &GameState, glow: bool) {
        let ctx = &self.ctx;
        if glow {
            ctx.set_shadow_blur(15.0);
            ctx.set_shadow_color(PLAYER);
        }
        ctx.set_fill_style_str(PLAYER);
        self.fill_circle(state.player.pos, state.player.radius as f64);
        ctx.set_shadow_blur(0.0);
    }

    /// Upward-pointing triangle inscribed in the hazard's bounding box
    fn draw_triangle(&self, pos: Vec2, radius: f32) {
        let (x, y, r) = (pos.x as f64, pos.y as f64, radius as f64);
        let ctx = &self.ctx;
        ctx.begin_path();
        ctx.move_to(x, y - r);
        ctx.line_to(x + r, y + r);
        ctx.line_to(x - r, y + r);
        ctx.close_path();
        ctx.fill();
    }

    fn fill_circle(&self, pos: Vec2, radius: f64) {
        let ctx = &self.ctx;
        ctx.begin_path();
        if ctx
            .arc(pos.x as f64, pos.y as f64, radius, 0.0, TAU)
            .is_ok()
        {
            ctx.fill();
        }
    }

    fn text(&self, text: &str, x: f64, y: f64, font: &str, color: &str, align: &str) {
        let ctx = &self.ctx;
        ctx.set_font(font);
        ctx.set_text_align(align);
        ctx.set_fill_style_str(color);
        let _ = ctx.fill_text(text, x, y);
    }

    /// Score on the left, level on the right, progress bar in between
    fn draw_hud(&self, width: f64, score: u64, level: u32, progress: f32) {
        self.text("DATA (SCORE)", 40.0, 48.0, LABEL_FONT, MUTED, "left");
        self.text(&score.to_string(), 40.0, 82.0, VALUE_FONT, TEXT, "left");
        self.text("LEVEL", width - 40.0, 48.0, LABEL_FONT, PLAYER, "right");
        self.text(&level.to_string(), width - 40.0, 82.0, VALUE_FONT, PLAYER, "right");

        let ctx = &self.ctx;
        let bar_w = 64.0;
        let x = (width - bar_w) / 2.0;
        ctx.set_fill_style_str(PROGRESS_TRACK);
        ctx.fill_rect(x, 40.0, bar_w, 4.0);
        ctx.set_fill_style_str(PLAYER);
        ctx.fill_rect(x, 40.0, bar_w * progress as f64, 4.0);
        self.text("NEXT LEVEL", width / 2.0, 60.0, LABEL_FONT, MUTED, "center");
    }

    fn draw_banner(&self, width: f64) {
        self.text("SYSTEM UPGRADE", width / 2.0, 140.0, "bold 24px sans-serif", BANNER, "center");
    }

    fn draw_title(&self, width: f64, height: f64, best: u64) {
        let cx = width / 2.0;
        let cy = height / 2.0;
        self.text("MINI-GAME ARCADE", cx, cy - 70.0, LABEL_FONT, PLAYER, "center");
        self.text("GROWTH RUSH", cx, cy - 20.0, "bold 48px sans-serif", TEXT, "center");
        self.text(
            "Dodge the glitches, collect data, level up.",
            cx,
            cy + 20.0,
            "14px sans-serif",
            MUTED,
            "center",
        );
        self.text(&format!("HIGH SCORE: {best}"), cx, cy + 60.0, LABEL_FONT, PLAYER, "center");
    }

    fn draw_boot(&self, width: f64, height: f64, progress: f32) {
        let cx = width / 2.0;
        let cy = height / 2.0;
        self.text("INITIALIZING SYSTEM...", cx, cy - 20.0, "24px monospace", TEXT, "center");

        let ctx = &self.ctx;
        let bar_w = 256.0;
        ctx.set_fill_style_str(PROGRESS_TRACK);
        ctx.fill_rect(cx - bar_w / 2.0, cy, bar_w, 4.0);
        ctx.set_fill_style_str(PLAYER);
        ctx.fill_rect(cx - bar_w / 2.0, cy, bar_w * progress.clamp(0.0, 1.0) as f64, 4.0);

        if progress >= 0.4 {
            self.text("LOADING ASSETS... OK", cx, cy + 30.0, "12px monospace", PLAYER, "center");
        }
        if progress >= 0.8 {
            self.text("ESTABLISHING UPLINK... OK", cx, cy + 48.0, "12px monospace", PLAYER, "center");
        }
    }

    fn draw_failure(&self, width: f64, height: f64, score: u64, level: u32, best: u64) {
        let cx = width / 2.0;
        let cy = height / 2.0;
        let ctx = &self.ctx;
        ctx.set_fill_style_str(PANEL);
        ctx.fill_rect(cx - 200.0, cy - 120.0, 400.0, 240.0);
        ctx.set_stroke_style_str(HAZARD);
        ctx.set_line_width(1.0);
        ctx.stroke_rect(cx - 200.0, cy - 120.0, 400.0, 240.0);

        self.text("SYSTEM FAILURE", cx, cy - 60.0, "bold 36px sans-serif", TEXT, "center");
        self.text("CONNECTION ERROR DETECTED", cx, cy - 30.0, "14px monospace", HAZARD, "center");

        self.text("FINAL SCORE", cx - 90.0, cy + 10.0, LABEL_FONT, MUTED, "center");
        self.text(&score.to_string(), cx - 90.0, cy + 50.0, VALUE_FONT, TEXT, "center");
        self.text("LEVEL REACHED", cx + 90.0, cy + 10.0, LABEL_FONT, MUTED, "center");
        self.text(&level.to_string(), cx + 90.0, cy + 50.0, VALUE_FONT, PLAYER, "center");
        self.text(&format!("BEST: {best}"), cx, cy + 95.0, LABEL_FONT, PLAYER, "center");
    }
}
