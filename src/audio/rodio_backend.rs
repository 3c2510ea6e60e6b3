//! Audio output through the default system device using rodio.
//!
//! Clip files are read into memory once at load time; every `play` decodes a
//! fresh copy into a new sink so restarts always begin at the start.

use std::io::Cursor;
use std::sync::Arc;

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use rustc_hash::FxHashMap;

use super::backend::AudioBackend;
use super::sound::Clip;
use crate::error::AudioError;

struct LoadedClip {
    data: Arc<[u8]>,
    sink: Option<Sink>,
    looping: bool,
}

/// Backend that plays clips on the default output device.
pub struct RodioBackend {
    _stream: OutputStream,
    handle: OutputStreamHandle,
    clips: FxHashMap<String, LoadedClip>,
}

impl RodioBackend {
    /// Open the default output device.
    pub fn new() -> Result<Self, AudioError> {
        let (stream, handle) = OutputStream::try_default()
            .map_err(|e| AudioError::Device(format!("failed to open output stream: {e}")))?;
        Ok(Self {
            _stream: stream,
            handle,
            clips: FxHashMap::default(),
        })
    }

    fn read_source(path: &str) -> Result<Arc<[u8]>, String> {
        let bytes = std::fs::read(path).map_err(|e| format!("{path}: {e}"))?;
        let data: Arc<[u8]> = bytes.into();
        Decoder::new(Cursor::new(Arc::clone(&data))).map_err(|e| format!("{path}: {e}"))?;
        Ok(data)
    }
}

impl std::fmt::Debug for RodioBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RodioBackend")
            .field("clips", &self.clips.len())
            .finish_non_exhaustive()
    }
}

impl AudioBackend for RodioBackend {
    fn load(&mut self, clip: &Clip) -> Result<(), AudioError> {
        if self.clips.contains_key(&clip.name) {
            return Ok(());
        }
        let mut reasons = Vec::new();
        for source in &clip.sources {
            match Self::read_source(source) {
                Ok(data) => {
                    self.clips.insert(
                        clip.name.clone(),
                        LoadedClip {
                            data,
                            sink: None,
                            looping: false,
                        },
                    );
                    return Ok(());
                }
                Err(reason) => reasons.push(reason),
            }
        }
        Err(AudioError::Load {
            clip: clip.name.clone(),
            reason: if reasons.is_empty() {
                "no sources".to_string()
            } else {
                reasons.join("; ")
            },
        })
    }

    fn play(&mut self, name: &str, volume: f32, looping: bool) -> Result<(), AudioError> {
        let clip = self
            .clips
            .get_mut(name)
            .ok_or_else(|| AudioError::UnknownClip(name.to_string()))?;

        if let Some(old) = clip.sink.take() {
            old.stop();
        }

        let play_error = |reason: String| AudioError::Play {
            clip: name.to_string(),
            reason,
        };
        let sink = Sink::try_new(&self.handle).map_err(|e| play_error(e.to_string()))?;
        let cursor = Cursor::new(Arc::clone(&clip.data));
        if looping {
            let decoder = Decoder::new_looped(cursor).map_err(|e| play_error(e.to_string()))?;
            sink.append(decoder);
        } else {
            let decoder = Decoder::new(cursor).map_err(|e| play_error(e.to_string()))?;
            sink.append(decoder);
        }
        sink.set_volume(volume);

        clip.sink = Some(sink);
        clip.looping = looping;
        Ok(())
    }

    fn stop(&mut self, name: &str) {
        if let Some(sink) = self.clips.get_mut(name).and_then(|c| c.sink.take()) {
            sink.stop();
        }
    }

    fn pause(&mut self, name: &str) {
        if let Some(sink) = self.clips.get(name).and_then(|c| c.sink.as_ref()) {
            sink.pause();
        }
    }

    fn resume(&mut self, name: &str) -> Result<(), AudioError> {
        let clip = self
            .clips
            .get(name)
            .ok_or_else(|| AudioError::UnknownClip(name.to_string()))?;
        if let Some(sink) = &clip.sink {
            sink.play();
        }
        Ok(())
    }

    fn set_volume(&mut self, name: &str, volume: f32) {
        if let Some(sink) = self.clips.get(name).and_then(|c| c.sink.as_ref()) {
            sink.set_volume(volume);
        }
    }

    fn is_playing(&self, name: &str) -> bool {
        self.clips
            .get(name)
            .and_then(|c| c.sink.as_ref())
            .is_some_and(|sink| !sink.is_paused() && !sink.empty())
    }

    fn has_ended(&self, name: &str) -> bool {
        self.clips
            .get(name)
            .is_some_and(|c| !c.looping && c.sink.as_ref().is_some_and(Sink::empty))
    }

    fn unload(&mut self, name: &str) {
        if let Some(clip) = self.clips.remove(name) {
            if let Some(sink) = clip.sink {
                sink.stop();
            }
        }
    }
}
