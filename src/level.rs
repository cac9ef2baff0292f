//! Difficulty presets
//!
//! A `LevelConfig` is immutable once a match starts; the controller shares it
//! with every target through an `Rc`.

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Box in front of the player that targets spawn in
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpawnVolume {
    /// X range is [-half_width, half_width]
    pub half_width: f32,
    /// Y range is [0, half_height) above the ground clearance
    pub half_height: f32,
    /// Farthest spawn distance along -Z
    pub depth: f32,
}

/// One difficulty preset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelConfig {
    pub name: String,
    pub target_count: u32,
    /// Units moved per tick
    pub target_speed: f32,
    /// Hit sphere radius
    pub target_size: f32,
    /// Match length in seconds
    pub game_time: u32,
    pub spawn_volume: SpawnVolume,
    /// A target closer than this ends the match
    pub collision_distance: f32,
    /// CSS color for the target and level card
    pub color: String,
    pub description: String,
}

impl LevelConfig {
    /// Check that every numeric field is positive.
    ///
    /// Only used when presets come from outside the binary; the simulation
    /// trusts whatever it is given.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks: [(&'static str, bool); 8] = [
            ("targetCount", self.target_count > 0),
            ("targetSpeed", self.target_speed > 0.0),
            ("targetSize", self.target_size > 0.0),
            ("gameTime", self.game_time > 0),
            ("spawnVolume.halfWidth", self.spawn_volume.half_width > 0.0),
            ("spawnVolume.halfHeight", self.spawn_volume.half_height > 0.0),
            ("spawnVolume.depth", self.spawn_volume.depth > 0.0),
            ("collisionDistance", self.collision_distance > 0.0),
        ];

        match checks.iter().find(|(_, ok)| !*ok) {
            Some(&(field, _)) => Err(ConfigError::InvalidPreset {
                name: self.name.clone(),
                field,
            }),
            None => Ok(()),
        }
    }

    /// Summary shown when the player hovers a level card
    pub fn info(&self) -> LevelInfo {
        LevelInfo {
            name: self.name.clone(),
            description: self.description.clone(),
            color: self.color.clone(),
            target_count: self.target_count,
            game_time: self.game_time,
        }
    }

    pub fn easy() -> Self {
        Self {
            name: "Easy".to_string(),
            target_count: 5,
            target_speed: 0.05,
            target_size: 1.0,
            game_time: 60,
            spawn_volume: SpawnVolume {
                half_width: 15.0,
                half_height: 8.0,
                depth: 50.0,
            },
            collision_distance: 3.0,
            color: "#44ff44".to_string(),
            description: "Five slow, large targets. A minute on the clock.".to_string(),
        }
    }

    pub fn medium() -> Self {
        Self {
            name: "Medium".to_string(),
            target_count: 8,
            target_speed: 0.08,
            target_size: 0.8,
            game_time: 45,
            spawn_volume: SpawnVolume {
                half_width: 20.0,
                half_height: 10.0,
                depth: 60.0,
            },
            collision_distance: 3.0,
            color: "#ffcc00".to_string(),
            description: "Eight quicker targets spread wider.".to_string(),
        }
    }

    pub fn hard() -> Self {
        Self {
            name: "Hard".to_string(),
            target_count: 12,
            target_speed: 0.12,
            target_size: 0.6,
            game_time: 30,
            spawn_volume: SpawnVolume {
                half_width: 25.0,
                half_height: 12.0,
                depth: 70.0,
            },
            collision_distance: 3.0,
            color: "#ff4444".to_string(),
            description: "Twelve small, fast targets. Thirty seconds.".to_string(),
        }
    }
}

/// Level card contents for the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelInfo {
    pub name: String,
    pub description: String,
    pub color: String,
    pub target_count: u32,
    pub game_time: u32,
}

/// Ordered set of selectable presets
#[derive(Debug, Clone)]
pub struct LevelCatalog {
    levels: Vec<Rc<LevelConfig>>,
}

impl Default for LevelCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl LevelCatalog {
    /// The three built-in presets, easiest first
    pub fn builtin() -> Self {
        Self {
            levels: vec![
                Rc::new(LevelConfig::easy()),
                Rc::new(LevelConfig::medium()),
                Rc::new(LevelConfig::hard()),
            ],
        }
    }

    pub fn from_levels(levels: impl IntoIterator<Item = LevelConfig>) -> Self {
        Self {
            levels: levels.into_iter().map(Rc::new).collect(),
        }
    }

    /// Case-insensitive lookup
    pub fn find(&self, name: &str) -> Option<Rc<LevelConfig>> {
        self.levels
            .iter()
            .find(|l| l.name.eq_ignore_ascii_case(name))
            .cloned()
    }

    pub fn info(&self, name: &str) -> Option<LevelInfo> {
        self.find(name).map(|l| l.info())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rc<LevelConfig>> {
        self.levels.iter()
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Add presets from a JSON array of level objects.
    ///
    /// A preset with an existing name replaces it in place. Nothing is added
    /// unless every preset in the array is valid. Returns the number of presets read.
    pub fn extend_from_json(&mut self, json: &str) -> Result<usize, ConfigError> {
        let presets: Vec<LevelConfig> = serde_json::from_str(json)?;
        for preset in &presets {
            preset.validate()?;
        }

        let count = presets.len();
        for preset in presets {
            match self
                .levels
                .iter()
                .position(|l| l.name.eq_ignore_ascii_case(&preset.name))
            {
                Some(i) => {
                    log::info!("Level preset '{}' overridden", preset.name);
                    self.levels[i] = Rc::new(preset);
                }
                None => {
                    log::info!("Level preset '{}' added", preset.name);
                    self.levels.push(Rc::new(preset));
                }
            }
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_presets_valid() {
        let catalog = LevelCatalog::builtin();
        assert_eq!(catalog.len(), 3);
        for level in catalog.iter() {
            assert!(level.validate().is_ok(), "{} invalid", level.name);
        }
    }

    #[test]
    fn test_find_case_insensitive() {
        let catalog = LevelCatalog::builtin();
        assert_eq!(catalog.find("hard").unwrap().target_count, 12);
        assert_eq!(catalog.find("MEDIUM").unwrap().name, "Medium");
        assert!(catalog.find("nightmare").is_none());
    }

    #[test]
    fn test_info_matches_config() {
        let catalog = LevelCatalog::builtin();
        let info = catalog.info("Easy").unwrap();
        assert_eq!(info.target_count, 5);
        assert_eq!(info.game_time, 60);
        assert_eq!(info.color, "#44ff44");
    }

    #[test]
    fn test_extend_from_json() {
        let mut catalog = LevelCatalog::builtin();
        let json = r##"[
            {
                "name": "Insane",
                "targetCount": 20,
                "targetSpeed": 0.2,
                "targetSize": 0.4,
                "gameTime": 20,
                "spawnVolume": { "halfWidth": 30.0, "halfHeight": 15.0, "depth": 80.0 },
                "collisionDistance": 3.0,
                "color": "#ff00ff",
                "description": "Good luck."
            },
            {
                "name": "easy",
                "targetCount": 3,
                "targetSpeed": 0.03,
                "targetSize": 1.2,
                "gameTime": 90,
                "spawnVolume": { "halfWidth": 10.0, "halfHeight": 5.0, "depth": 40.0 },
                "collisionDistance": 3.0,
                "color": "#00ff00",
                "description": "Warm-up."
            }
        ]"##;

        assert_eq!(catalog.extend_from_json(json).unwrap(), 2);
        assert_eq!(catalog.len(), 4);
        assert_eq!(catalog.find("insane").unwrap().target_count, 20);
        // Replaced in place, still first
        assert_eq!(catalog.iter().next().unwrap().target_count, 3);
    }

    #[test]
    fn test_extend_rejects_non_positive_fields() {
        let mut catalog = LevelCatalog::builtin();
        let mut broken = LevelConfig::hard();
        broken.name = "Broken".to_string();
        broken.target_speed = 0.0;
        let json = serde_json::to_string(&vec![broken]).unwrap();

        match catalog.extend_from_json(&json) {
            Err(ConfigError::InvalidPreset { name, field }) => {
                assert_eq!(name, "Broken");
                assert_eq!(field, "targetSpeed");
            }
            other => panic!("expected InvalidPreset, got {:?}", other),
        }
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn test_extend_rejects_malformed_json() {
        let mut catalog = LevelCatalog::builtin();
        assert!(matches!(
            catalog.extend_from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }
}
