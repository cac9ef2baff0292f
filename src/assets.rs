//! Asset load tracking with fallback substitution
//!
//! Loaders report progress through `LoadEvent`s. A failed load never reaches
//! the match: the slot swaps in a fallback and logs a warning.

use crate::error::AssetError;

/// Callback payload from a loader
#[derive(Debug, Clone, PartialEq)]
pub enum LoadEvent<T> {
    Progress { loaded: u64, total: u64 },
    Loaded(T),
    Failed(AssetError),
}

/// Load status of one asset
#[derive(Debug, Clone, PartialEq)]
pub enum AssetSlot<T> {
    Loading { loaded: u64, total: u64 },
    Ready(T),
    Fallback(T),
}

impl<T> Default for AssetSlot<T> {
    fn default() -> Self {
        AssetSlot::Loading { loaded: 0, total: 0 }
    }
}

impl<T> AssetSlot<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a loader event. Events after the slot has settled are ignored.
    pub fn on_event(&mut self, event: LoadEvent<T>, fallback: impl FnOnce() -> T) {
        if !self.is_loading() {
            return;
        }
        *self = match event {
            LoadEvent::Progress { loaded, total } => AssetSlot::Loading { loaded, total },
            LoadEvent::Loaded(asset) => AssetSlot::Ready(asset),
            LoadEvent::Failed(err) => {
                log::warn!("{}; using fallback", err);
                AssetSlot::Fallback(fallback())
            }
        };
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, AssetSlot::Loading { .. })
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, AssetSlot::Fallback(_))
    }

    /// Load fraction (0-1); 1 once settled
    pub fn progress(&self) -> f32 {
        match self {
            AssetSlot::Loading { loaded, total } if *total > 0 => {
                (*loaded as f32 / *total as f32).min(1.0)
            }
            AssetSlot::Loading { .. } => 0.0,
            _ => 1.0,
        }
    }

    /// The settled asset, if any
    pub fn get(&self) -> Option<&T> {
        match self {
            AssetSlot::Ready(asset) | AssetSlot::Fallback(asset) => Some(asset),
            AssetSlot::Loading { .. } => None,
        }
    }
}

/// Box drawn when the weapon sprite is unavailable
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FallbackShape {
    /// Fraction of viewport width
    pub width: f32,
    /// Fraction of viewport height
    pub height: f32,
    /// Packed RGB
    pub color: u32,
}

impl Default for FallbackShape {
    fn default() -> Self {
        Self {
            width: 0.08,
            height: 0.3,
            color: 0x33_33_33,
        }
    }
}

/// Weapon held in view
#[derive(Debug, Clone, PartialEq)]
pub enum WeaponModel {
    /// Decoded image, drawn by the renderer from its own handle
    Sprite { path: String, width: u32, height: u32 },
    Placeholder(FallbackShape),
}

impl WeaponModel {
    pub fn placeholder() -> Self {
        WeaponModel::Placeholder(FallbackShape::default())
    }
}

/// Weapon asset slot; shows the placeholder until the sprite arrives
#[derive(Debug, Clone, Default)]
pub struct WeaponAsset {
    slot: AssetSlot<WeaponModel>,
    placeholder: WeaponModel,
}

impl Default for WeaponModel {
    fn default() -> Self {
        Self::placeholder()
    }
}

impl WeaponAsset {
    pub fn on_event(&mut self, event: LoadEvent<WeaponModel>) {
        self.slot.on_event(event, WeaponModel::placeholder);
    }

    /// Model to draw this frame
    pub fn current(&self) -> &WeaponModel {
        self.slot.get().unwrap_or(&self.placeholder)
    }

    pub fn slot(&self) -> &AssetSlot<WeaponModel> {
        &self.slot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_then_ready() {
        let mut slot: AssetSlot<u32> = AssetSlot::new();
        assert_eq!(slot.progress(), 0.0);

        slot.on_event(LoadEvent::Progress { loaded: 50, total: 200 }, || 0);
        assert!((slot.progress() - 0.25).abs() < 1e-6);
        assert!(slot.get().is_none());

        slot.on_event(LoadEvent::Loaded(7), || 0);
        assert_eq!(slot, AssetSlot::Ready(7));
        assert_eq!(slot.progress(), 1.0);
    }

    #[test]
    fn test_failure_substitutes_fallback() {
        let mut slot: AssetSlot<&str> = AssetSlot::new();
        slot.on_event(
            LoadEvent::Failed(AssetError::NotFound("weapon.png".to_string())),
            || "box",
        );
        assert!(slot.is_fallback());
        assert_eq!(slot.get(), Some(&"box"));
    }

    #[test]
    fn test_settled_slot_ignores_late_events() {
        let mut slot: AssetSlot<u32> = AssetSlot::new();
        slot.on_event(LoadEvent::Loaded(1), || 0);
        slot.on_event(
            LoadEvent::Failed(AssetError::Network {
                path: "x".to_string(),
                reason: "timeout".to_string(),
            }),
            || 0,
        );
        assert_eq!(slot, AssetSlot::Ready(1));
    }

    #[test]
    fn test_weapon_placeholder_while_loading_and_on_error() {
        let mut weapon = WeaponAsset::default();
        assert_eq!(weapon.current(), &WeaponModel::placeholder());

        weapon.on_event(LoadEvent::Failed(AssetError::Decode {
            path: "images/weapon.png".to_string(),
            reason: "bad header".to_string(),
        }));
        assert!(weapon.slot().is_fallback());
        assert!(matches!(weapon.current(), WeaponModel::Placeholder(_)));
    }

    #[test]
    fn test_weapon_sprite_loaded() {
        let mut weapon = WeaponAsset::default();
        weapon.on_event(LoadEvent::Loaded(WeaponModel::Sprite {
            path: "images/weapon.png".to_string(),
            width: 256,
            height: 256,
        }));
        assert!(matches!(weapon.current(), WeaponModel::Sprite { .. }));
    }

    #[test]
    fn test_error_path() {
        let err = AssetError::Decode {
            path: "a.mp3".to_string(),
            reason: "x".to_string(),
        };
        assert_eq!(err.path(), "a.mp3");
        assert_eq!(AssetError::NotFound("b".to_string()).path(), "b");
    }
}
