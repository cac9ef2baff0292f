//! Target Range - A first-person target shooting demo
//!
//! Core modules:
//! - `sim`: Match lifecycle and target simulation (no rendering or platform dependencies)
//! - `level`: Difficulty presets
//! - `camera`: First-person view ray and screen projection
//! - `assets`: Load tracking with fallback substitution
//! - `audio`: Pooled sound channels (samples or synthesized tones)
//! - `hud` / `renderer`: Browser presentation

pub mod assets;
pub mod audio;
pub mod camera;
pub mod error;
pub mod hud;
pub mod level;
#[cfg(target_arch = "wasm32")]
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::{AssetError, ConfigError, MatchError};
pub use level::{LevelCatalog, LevelConfig, LevelInfo, SpawnVolume};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    use glam::Vec3;

    /// Player eye position (the camera never moves)
    pub const PLAYER_EYE: Vec3 = Vec3::new(0.0, 1.6, 0.0);

    /// Height added to every spawn so targets never clip the floor
    pub const GROUND_CLEARANCE: f32 = 1.0;
    /// Closest a target may spawn in front of the player (along -Z)
    pub const MIN_FORWARD_OFFSET: f32 = 10.0;
    /// Targets closer than this are recycled
    pub const RESPAWN_DISTANCE: f32 = 1.0;
    /// Cosmetic spin per tick (radians, x and y axes)
    pub const TARGET_SPIN_PER_TICK: f32 = 0.02;
    /// Hit flash decay per tick
    pub const HIT_FLASH_DECAY: f32 = 0.05;

    /// Countdown start value (seconds)
    pub const COUNTDOWN_START: u32 = 5;
    /// Countdown and match clock period
    pub const SECOND_MS: u64 = 1000;
    /// Delay between a hit and the target's respawn
    pub const HIT_RESPAWN_DELAY_MS: u64 = 200;

    /// Clamp for a single frame's elapsed time (tab switches, breakpoints)
    pub const MAX_FRAME_MS: u64 = 250;
}

/// Format whole seconds as `M:SS`
pub fn format_clock(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0), "0:00");
        assert_eq!(format_clock(9), "0:09");
        assert_eq!(format_clock(60), "1:00");
        assert_eq!(format_clock(125), "2:05");
        assert_eq!(format_clock(600), "10:00");
    }
}
