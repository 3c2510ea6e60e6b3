//! Error types for the fallible seams: key-value stores, audio backends and
//! configuration loaded from data.
//!
//! Game-facing operations never return these. Callers that sit on top of a
//! store or backend log the error and degrade (default value, skipped cue,
//! next track) so that the matching game itself stays playable.

use thiserror::Error;

/// Errors raised by a [`KeyValueStore`](crate::storage::KeyValueStore).
#[derive(Debug, Error)]
pub enum StorageError {
    /// The underlying medium failed (missing directory, quota, permissions).
    #[error("storage i/o failed for key `{key}`: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// A stored value could not be encoded or decoded as JSON.
    #[error("malformed value for key `{key}`: {source}")]
    Json {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// A shared store was poisoned by a panicking writer.
    #[error("store has been poisoned")]
    Poisoned,

    /// The store refused the write (e.g. a quota was exceeded).
    #[error("store rejected write for key `{key}`: {reason}")]
    Rejected { key: String, reason: String },
}

/// Errors raised by an [`AudioBackend`](crate::audio::AudioBackend).
#[derive(Debug, Error)]
pub enum AudioError {
    /// None of a clip's sources could be loaded.
    #[error("failed to load clip `{clip}`: {reason}")]
    Load { clip: String, reason: String },

    /// A loaded clip could not start or resume playback.
    #[error("failed to play clip `{clip}`: {reason}")]
    Play { clip: String, reason: String },

    /// The clip was never loaded into the backend.
    #[error("unknown clip `{0}`")]
    UnknownClip(String),

    /// The output device could not be opened.
    #[error("audio device unavailable: {0}")]
    Device(String),
}

/// A level catalog or engine configuration read from data was invalid.
///
/// The programmatic constructors assert the same conditions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("level must have at least 1 pair")]
    NoPairs,

    #[error("level must have at least 1 symbol")]
    NoSymbols,

    #[error("catalog must define at least 1 level")]
    EmptyCatalog,

    #[error("tick interval must be non-zero")]
    ZeroTickInterval,
}

impl AudioError {
    /// Name of the clip the error refers to, if any.
    #[must_use]
    pub fn clip(&self) -> Option<&str> {
        match self {
            AudioError::Load { clip, .. } | AudioError::Play { clip, .. } => Some(clip),
            AudioError::UnknownClip(clip) => Some(clip),
            AudioError::Device(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_display() {
        let err = StorageError::Rejected {
            key: "progress".to_string(),
            reason: "quota exceeded".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "store rejected write for key `progress`: quota exceeded"
        );
    }

    #[test]
    fn test_audio_error_clip() {
        let err = AudioError::Load {
            clip: "match-fail".to_string(),
            reason: "no sources".to_string(),
        };
        assert_eq!(err.clip(), Some("match-fail"));
        assert_eq!(AudioError::Device("none".to_string()).clip(), None);
    }

    #[test]
    fn test_config_error_display() {
        assert_eq!(
            ConfigError::EmptyCatalog.to_string(),
            "catalog must define at least 1 level"
        );
    }
}
