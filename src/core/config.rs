//! Engine configuration.
//!
//! Hosts configure the session at startup by providing an `EngineConfig`:
//! - RNG seed (fixed for reproducible decks, or `None` for entropy)
//! - Timer interval and the fixed delays of the mismatch/completion flow
//! - Storage keys for the persisted records
//!
//! The defaults reproduce the shipped game's timings.

use std::time::Duration;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ConfigError;

/// Storage key of the player progress record.
pub const DEFAULT_PROGRESS_KEY: &str = "lucide-memory-progress";

/// Storage key of the audio settings record.
pub const DEFAULT_AUDIO_SETTINGS_KEY: &str = "lucide-memory-audio-settings";

/// Session-wide configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Deck RNG seed. `None` seeds from the operating system.
    pub seed: Option<u64>,

    /// Period of the elapsed-time tick. Never zero.
    #[serde(deserialize_with = "non_zero_interval")]
    pub tick_interval: Duration,

    /// How long a mismatched pair stays visible before flipping back.
    pub flip_back_delay: Duration,

    /// Delay of the match-failure cue after the second tap.
    pub mismatch_cue_delay: Duration,

    /// Delay of the level-complete cue, so the match cue is heard first.
    pub completion_cue_delay: Duration,

    /// Play the card-flip cue on every accepted flip.
    pub flip_cue: bool,

    /// Key of the persisted progress record.
    pub progress_key: String,

    /// Key of the persisted audio settings record.
    pub audio_settings_key: String,
}

fn non_zero_interval<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
    let interval = Duration::deserialize(deserializer)?;
    if interval.is_zero() {
        return Err(D::Error::custom(ConfigError::ZeroTickInterval));
    }
    Ok(interval)
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: None,
            tick_interval: Duration::from_secs(1),
            flip_back_delay: Duration::from_millis(1000),
            mismatch_cue_delay: Duration::from_millis(600),
            completion_cue_delay: Duration::from_millis(500),
            flip_cue: true,
            progress_key: DEFAULT_PROGRESS_KEY.to_string(),
            audio_settings_key: DEFAULT_AUDIO_SETTINGS_KEY.to_string(),
        }
    }
}

impl EngineConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a fixed deck seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the timer period.
    #[must_use]
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        assert!(!interval.is_zero(), "Tick interval must be non-zero");
        self.tick_interval = interval;
        self
    }

    /// Set the mismatch flip-back delay.
    #[must_use]
    pub fn with_flip_back_delay(mut self, delay: Duration) -> Self {
        self.flip_back_delay = delay;
        self
    }

    /// Set the match-failure cue delay.
    #[must_use]
    pub fn with_mismatch_cue_delay(mut self, delay: Duration) -> Self {
        self.mismatch_cue_delay = delay;
        self
    }

    /// Set the level-complete cue delay.
    #[must_use]
    pub fn with_completion_cue_delay(mut self, delay: Duration) -> Self {
        self.completion_cue_delay = delay;
        self
    }

    /// Enable or disable the per-flip cue.
    #[must_use]
    pub fn with_flip_cue(mut self, enabled: bool) -> Self {
        self.flip_cue = enabled;
        self
    }

    /// Use custom storage keys (e.g. one namespace per profile).
    #[must_use]
    pub fn with_storage_keys(
        mut self,
        progress_key: impl Into<String>,
        audio_settings_key: impl Into<String>,
    ) -> Self {
        self.progress_key = progress_key.into();
        self.audio_settings_key = audio_settings_key.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();

        assert_eq!(config.seed, None);
        assert_eq!(config.tick_interval, Duration::from_secs(1));
        assert_eq!(config.flip_back_delay, Duration::from_millis(1000));
        assert_eq!(config.mismatch_cue_delay, Duration::from_millis(600));
        assert_eq!(config.completion_cue_delay, Duration::from_millis(500));
        assert!(config.flip_cue);
        assert_eq!(config.progress_key, "lucide-memory-progress");
        assert_eq!(config.audio_settings_key, "lucide-memory-audio-settings");
    }

    #[test]
    fn test_builder() {
        let config = EngineConfig::new()
            .with_seed(9)
            .with_flip_back_delay(Duration::from_millis(250))
            .with_flip_cue(false)
            .with_storage_keys("p", "a");

        assert_eq!(config.seed, Some(9));
        assert_eq!(config.flip_back_delay, Duration::from_millis(250));
        assert!(!config.flip_cue);
        assert_eq!(config.progress_key, "p");
        assert_eq!(config.audio_settings_key, "a");
    }

    #[test]
    #[should_panic(expected = "Tick interval must be non-zero")]
    fn test_zero_tick_interval() {
        let _ = EngineConfig::new().with_tick_interval(Duration::ZERO);
    }

    #[test]
    fn test_config_serde() {
        let config = EngineConfig::new().with_seed(1);
        let json = serde_json::to_string(&config).unwrap();
        let back: EngineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }

    #[test]
    fn test_zero_tick_interval_json_rejected() {
        let mut json = serde_json::to_value(EngineConfig::new()).unwrap();
        json["tick_interval"] = serde_json::json!({ "secs": 0, "nanos": 0 });

        let err = serde_json::from_value::<EngineConfig>(json).unwrap_err();
        assert!(err.to_string().contains("tick interval must be non-zero"));
    }
}
