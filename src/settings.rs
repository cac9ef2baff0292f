//! Player preferences
//!
//! Persisted in LocalStorage. Extra level presets live under their own key
//! so a deployment can seed them without touching preferences.

use serde::{Deserialize, Serialize};

use crate::camera::Camera;
use crate::level::LevelCatalog;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Controls ===
    /// Mouse sensitivity multiplier (1.0 = default)
    pub mouse_sensitivity: f32,
    /// Invert vertical look
    pub invert_y: bool,
    /// Vertical field of view (degrees)
    pub fov_degrees: f32,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,
    /// Autopilot plays the game (attract mode)
    pub demo_mode: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mouse_sensitivity: 1.0,
            invert_y: false,
            fov_degrees: 75.0,

            show_fps: false,
            demo_mode: false,

            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }
}

impl Settings {
    /// Base look speed in radians per pixel
    const BASE_SENSITIVITY: f32 = 0.002;

    /// LocalStorage keys (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "target_range_settings";
    #[allow(dead_code)]
    const LEVELS_KEY: &'static str = "target_range_levels";

    /// Push control preferences into the camera
    pub fn apply_to_camera(&self, camera: &mut Camera) {
        camera.sensitivity = Self::BASE_SENSITIVITY * self.mouse_sensitivity.clamp(0.1, 5.0);
        camera.invert_y = self.invert_y;
        camera.fov_degrees = self.fov_degrees.clamp(50.0, 110.0);
    }

    /// Parse settings JSON, keeping defaults for missing fields
    pub fn from_json(json: &str) -> Option<Self> {
        match serde_json::from_str(json) {
            Ok(settings) => Some(settings),
            Err(e) => {
                log::warn!("Ignoring stored settings: {}", e);
                None
            }
        }
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Some(settings) = Self::from_json(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Built-in levels plus any presets stored in LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load_levels() -> LevelCatalog {
        let mut catalog = LevelCatalog::builtin();
        let stored = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .and_then(|s| s.get_item(Self::LEVELS_KEY).ok().flatten());

        if let Some(json) = stored {
            if let Err(e) = catalog.extend_from_json(&json) {
                log::warn!("Ignoring stored level presets: {}", e);
            }
        }
        catalog
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_levels() -> LevelCatalog {
        LevelCatalog::builtin()
    }
}
