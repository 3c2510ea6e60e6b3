//! Persisted audio settings.

use serde::{Deserialize, Serialize};

use crate::storage::Storage;

/// Master volume used when nothing (or garbage) is stored.
pub const DEFAULT_MASTER_VOLUME: f32 = 0.7;

/// User-facing audio preferences, stored under their own key.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AudioSettings {
    pub muted: bool,
    /// Always within `[0, 1]`.
    pub master_volume: f32,
    pub background_music_enabled: bool,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            muted: false,
            master_volume: DEFAULT_MASTER_VOLUME,
            background_music_enabled: false,
        }
    }
}

impl AudioSettings {
    /// Load settings, falling back to defaults on absence or corruption.
    ///
    /// A stored volume outside `[0, 1]` is clamped; a non-finite one is
    /// replaced by the default.
    pub fn load(storage: &Storage, key: &str) -> Self {
        storage.read(key, Self::default()).sanitized()
    }

    /// Persist the settings. Returns whether they were written.
    pub fn save(&self, storage: &Storage, key: &str) -> bool {
        storage.write(key, self)
    }

    fn sanitized(mut self) -> Self {
        self.master_volume = clamp_volume(self.master_volume).unwrap_or(DEFAULT_MASTER_VOLUME);
        self
    }
}

/// Clamp a volume into `[0, 1]`. `None` for NaN.
pub(crate) fn clamp_volume(volume: f32) -> Option<f32> {
    if volume.is_nan() {
        None
    } else {
        Some(volume.clamp(0.0, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{KeyValueStore, MemoryStore};
    use std::sync::Arc;

    #[test]
    fn test_defaults() {
        let settings = AudioSettings::default();
        assert!(!settings.muted);
        assert_eq!(settings.master_volume, 0.7);
        assert!(!settings.background_music_enabled);
    }

    #[test]
    fn test_load_missing() {
        let storage = Storage::in_memory();
        assert_eq!(AudioSettings::load(&storage, "audio"), AudioSettings::default());
    }

    #[test]
    fn test_load_corrupt() {
        let store = Arc::new(MemoryStore::new());
        store.set("audio", "][").unwrap();
        let storage = Storage::from_shared(store);
        assert_eq!(AudioSettings::load(&storage, "audio"), AudioSettings::default());
    }

    #[test]
    fn test_load_clamps_out_of_range_volume() {
        let store = Arc::new(MemoryStore::new());
        store.set("audio", r#"{"muted":true,"masterVolume":4.0}"#).unwrap();
        let storage = Storage::from_shared(store);

        let settings = AudioSettings::load(&storage, "audio");
        assert!(settings.muted);
        assert_eq!(settings.master_volume, 1.0);
        assert!(!settings.background_music_enabled);
    }

    #[test]
    fn test_json_field_names() {
        let json = serde_json::to_value(AudioSettings::default()).unwrap();
        assert_eq!(json["muted"], false);
        assert_eq!(json["backgroundMusicEnabled"], false);
        assert!(json.get("masterVolume").is_some());
    }

    #[test]
    fn test_clamp_volume() {
        assert_eq!(clamp_volume(1.5), Some(1.0));
        assert_eq!(clamp_volume(-0.2), Some(0.0));
        assert_eq!(clamp_volume(f32::NAN), None);
    }
}
