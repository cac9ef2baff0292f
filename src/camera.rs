//! First-person camera: mouse look, view ray and screen projection.

use glam::{Mat4, Quat, Vec2, Vec3};

use crate::consts::PLAYER_EYE;
use crate::sim::Ray;

/// A sphere projected to screen space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenCircle {
    /// Center in pixels (origin top-left)
    pub center: Vec2,
    pub radius: f32,
    /// View-space distance, for back-to-front sorting
    pub depth: f32,
}

/// Fixed-position camera with yaw/pitch look controls.
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vec3,
    /// Field of view in degrees (vertical).
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Width / height.
    pub aspect: f32,
    /// Radians per pixel of mouse movement.
    pub sensitivity: f32,
    pub invert_y: bool,
    pitch: f32,
    yaw: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: PLAYER_EYE,
            fov_degrees: 75.0,
            near: 0.1,
            far: 500.0,
            aspect: 16.0 / 9.0,
            sensitivity: 0.002,
            invert_y: false,
            pitch: 0.0,
            yaw: 0.0,
        }
    }
}

impl Camera {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Update aspect ratio (call on resize).
    pub fn set_aspect(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    /// Apply a mouse movement delta in pixels.
    pub fn process_mouse(&mut self, delta_x: f32, delta_y: f32) {
        let delta_y = if self.invert_y { -delta_y } else { delta_y };
        self.yaw -= delta_x * self.sensitivity;
        self.pitch -= delta_y * self.sensitivity;

        // Clamp pitch to prevent flipping
        let max_pitch = std::f32::consts::FRAC_PI_2 - 0.01;
        self.pitch = self.pitch.clamp(-max_pitch, max_pitch);
    }

    /// Look straight down -Z again (new match)
    pub fn reset_look(&mut self) {
        self.yaw = 0.0;
        self.pitch = 0.0;
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_y(self.yaw) * Quat::from_rotation_x(self.pitch)
    }

    pub fn forward(&self) -> Vec3 {
        self.rotation() * Vec3::NEG_Z
    }

    /// Ray through the crosshair.
    pub fn view_ray(&self) -> Ray {
        Ray::new(self.position, self.forward())
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.forward(), Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_degrees.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Project a world-space sphere onto a `width` x `height` viewport.
    ///
    /// Returns `None` when the center is behind the near plane.
    pub fn project_sphere(
        &self,
        center: Vec3,
        radius: f32,
        width: f32,
        height: f32,
    ) -> Option<ScreenCircle> {
        let clip = self.view_projection() * center.extend(1.0);
        if clip.w <= self.near {
            return None;
        }

        let ndc = clip.truncate() / clip.w;
        let focal = (height * 0.5) / (self.fov_degrees.to_radians() * 0.5).tan();
        Some(ScreenCircle {
            center: Vec2::new((ndc.x + 1.0) * 0.5 * width, (1.0 - ndc.y) * 0.5 * height),
            radius: radius * focal / clip.w,
            depth: clip.w,
        })
    }
}
