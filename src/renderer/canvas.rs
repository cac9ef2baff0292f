//! Canvas2D renderer

use std::f64::consts::TAU;

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use crate::assets::{FallbackShape, WeaponAsset, WeaponModel};
use crate::camera::{Camera, ScreenCircle};
use crate::sim::{MatchPhase, MatchState};

const SKY_COLOR: &str = "#0b1020";
const GROUND_COLOR: &str = "#1a2233";
const FLASH_COLOR: &str = "#ffffff";

pub struct CanvasRenderer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    /// Weapon sprite handle; drawn once the asset slot reports it ready
    pub weapon_image: Option<HtmlImageElement>,
    pub size: (u32, u32),
}

impl CanvasRenderer {
    pub fn new(canvas: HtmlCanvasElement) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        let size = (canvas.width(), canvas.height());
        Some(Self {
            canvas,
            ctx,
            weapon_image: None,
            size,
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        self.size = (width, height);
    }

    /// Draw one frame
    pub fn render(&self, state: &MatchState, camera: &Camera, weapon: &WeaponAsset) {
        let (w, h) = (self.size.0 as f64, self.size.1 as f64);
        let ctx = &self.ctx;

        // Horizon follows pitch
        let forward = camera.forward();
        let level_ahead = glam::Vec3::new(forward.x, 0.0, forward.z).normalize_or_zero() * 100.0;
        let horizon = camera
            .project_sphere(camera.position + level_ahead, 0.0, w as f32, h as f32)
            .map(|c| c.center.y as f64)
            .unwrap_or(h * 0.5)
            .clamp(0.0, h);
        ctx.set_fill_style_str(SKY_COLOR);
        ctx.fill_rect(0.0, 0.0, w, horizon);
        ctx.set_fill_style_str(GROUND_COLOR);
        ctx.fill_rect(0.0, horizon, w, h - horizon);

        if matches!(state.phase, MatchPhase::Countdown | MatchPhase::Active) {
            self.draw_targets(state, camera);
        }
        self.draw_weapon(weapon);
    }

    fn draw_targets(&self, state: &MatchState, camera: &Camera) {
        let Some(level) = state.level.as_ref() else {
            return;
        };
        let (w, h) = (self.size.0 as f32, self.size.1 as f32);

        let mut circles: Vec<(ScreenCircle, f32, (f32, f32))> = state
            .targets
            .iter()
            .filter_map(|t| {
                camera
                    .project_sphere(t.pos, level.target_size, w, h)
                    .map(|c| (c, t.hit_flash, t.ring_ellipse()))
            })
            .collect();
        // Back to front
        circles.sort_by(|a, b| {
            b.0.depth
                .partial_cmp(&a.0.depth)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let ctx = &self.ctx;
        for (circle, flash, (squash, roll)) in circles {
            let color = if flash > 0.0 { FLASH_COLOR } else { level.color.as_str() };
            ctx.set_fill_style_str(color);
            ctx.begin_path();
            if ctx
                .arc(
                    circle.center.x as f64,
                    circle.center.y as f64,
                    circle.radius.max(1.0) as f64,
                    0.0,
                    TAU,
                )
                .is_ok()
            {
                ctx.fill();
            }

            // Bullseye ring, tumbling with the target's spin
            let ring = (circle.radius * 0.5).max(0.5);
            ctx.set_stroke_style_str(SKY_COLOR);
            ctx.set_line_width((circle.radius * 0.15).max(1.0) as f64);
            ctx.begin_path();
            if ctx
                .ellipse(
                    circle.center.x as f64,
                    circle.center.y as f64,
                    ring as f64,
                    (ring * squash).max(0.5) as f64,
                    roll as f64,
                    0.0,
                    TAU,
                )
                .is_ok()
            {
                ctx.stroke();
            }
        }
    }

    fn draw_weapon(&self, weapon: &WeaponAsset) {
        let (w, h) = (self.size.0 as f64, self.size.1 as f64);
        let ctx = &self.ctx;

        let shape = match (weapon.current(), &self.weapon_image) {
            (WeaponModel::Sprite { width, height, .. }, Some(image)) => {
                let scale = (h * 0.35) / (*height).max(1) as f64;
                let (dw, dh) = (*width as f64 * scale, *height as f64 * scale);
                let _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(
                    image,
                    w * 0.62,
                    h - dh,
                    dw,
                    dh,
                );
                return;
            }
            (WeaponModel::Placeholder(shape), _) => *shape,
            // Sprite decoded but the renderer never got its handle
            (WeaponModel::Sprite { .. }, None) => FallbackShape::default(),
        };

        let (bw, bh) = (w * shape.width as f64, h * shape.height as f64);
        ctx.set_fill_style_str(&format!("#{:06x}", shape.color));
        ctx.fill_rect(w * 0.68, h - bh, bw, bh);
    }
}
