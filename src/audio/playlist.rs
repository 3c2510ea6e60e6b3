//! Background-music rotation.

use serde::{Deserialize, Serialize};

use super::sound::Clip;

/// Position of the current track in the rotation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackInfo {
    pub index: usize,
    pub total: usize,
    pub name: String,
}

#[derive(Clone, Debug)]
pub(crate) struct Track {
    pub clip: Clip,
    pub loaded: bool,
}

/// Ordered tracks with a wrapping cursor.
#[derive(Clone, Debug, Default)]
pub struct Playlist {
    tracks: Vec<Track>,
    current: usize,
}

impl Playlist {
    /// Create a playlist starting at the first track.
    pub fn new(clips: Vec<Clip>) -> Self {
        Self {
            tracks: clips
                .into_iter()
                .map(|clip| Track { clip, loaded: false })
                .collect(),
            current: 0,
        }
    }

    /// Number of tracks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Does the playlist have no tracks?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Does playback rotate (more than one track)?
    ///
    /// A single track loops instead.
    #[must_use]
    pub fn rotates(&self) -> bool {
        self.tracks.len() > 1
    }

    /// Index of the current track.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Clip of the current track.
    #[must_use]
    pub fn current(&self) -> Option<&Clip> {
        self.tracks.get(self.current).map(|t| &t.clip)
    }

    pub(crate) fn current_track_mut(&mut self) -> Option<&mut Track> {
        self.tracks.get_mut(self.current)
    }

    pub(crate) fn tracks_mut(&mut self) -> impl Iterator<Item = &mut Track> {
        self.tracks.iter_mut()
    }

    /// Move to the next track, wrapping around.
    pub fn advance(&mut self) -> usize {
        if !self.tracks.is_empty() {
            self.current = (self.current + 1) % self.tracks.len();
        }
        self.current
    }

    /// Describe the current track.
    #[must_use]
    pub fn info(&self) -> Option<TrackInfo> {
        self.current().map(|clip| TrackInfo {
            index: self.current,
            total: self.tracks.len(),
            name: clip.name.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playlist(names: &[&str]) -> Playlist {
        Playlist::new(
            names
                .iter()
                .map(|n| Clip::new(*n, vec![format!("{n}.mp3")], 0.2))
                .collect(),
        )
    }

    #[test]
    fn test_advance_wraps() {
        let mut list = playlist(&["a", "b", "c"]);
        assert_eq!(list.current().map(|c| c.name.as_str()), Some("a"));

        assert_eq!(list.advance(), 1);
        assert_eq!(list.advance(), 2);
        assert_eq!(list.advance(), 0);
        assert!(list.rotates());
    }

    #[test]
    fn test_info() {
        let mut list = playlist(&["a", "b"]);
        list.advance();
        assert_eq!(
            list.info(),
            Some(TrackInfo {
                index: 1,
                total: 2,
                name: "b".to_string()
            })
        );
    }

    #[test]
    fn test_empty_playlist() {
        let mut list = Playlist::new(vec![]);
        assert!(list.is_empty());
        assert_eq!(list.advance(), 0);
        assert!(list.info().is_none());
        assert!(!list.rotates());
    }

    #[test]
    fn test_single_track_does_not_rotate() {
        assert!(!playlist(&["only"]).rotates());
    }
}
