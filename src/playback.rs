/// Playback channel pool
///
/// Up to MAX_CHANNELS clips audible at once, at most one active channel
/// per button. The pool owns the "now playing" truth: the GUI polls it
/// on a fixed cadence and renders whatever `is_playing` says.
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use thiserror::Error;
use tracing::{debug, info};

/// Concurrent channel ceiling, matching the mixer the app grew up with
pub const MAX_CHANNELS: usize = 32;

/// Cadence for syncing visual state with channel state
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("No audio output device is available: {0}")]
    NoOutput(#[from] rodio::StreamError),

    #[error("Could not open a playback channel: {0}")]
    Channel(#[from] rodio::PlayError),

    #[error("All {MAX_CHANNELS} sound channels are busy")]
    NoFreeChannel,

    #[error("Sound file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Could not read {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: rodio::decoder::DecoderError,
    },
}

/// What a toggle did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackChange {
    Started,
    Stopped,
}

pub struct ChannelPool {
    /// Keeps the output device alive; dropping it kills every sink
    _stream: OutputStream,
    handle: OutputStreamHandle,

    /// Active channel per button
    active: HashMap<usize, Sink>,

    /// Master volume (0.0 - 1.0), applied to every channel
    master_volume: f32,
}

impl ChannelPool {
    /// Open the default output device
    pub fn new(master_volume: f32) -> Result<Self, PlaybackError> {
        let (stream, handle) = OutputStream::try_default()?;
        info!("[Playback] Output stream ready ({} channels max)", MAX_CHANNELS);
        Ok(Self {
            _stream: stream,
            handle,
            active: HashMap::new(),
            master_volume: master_volume.clamp(0.0, 1.0),
        })
    }

    /// Toggle a button's channel: stop it when audible, start it otherwise
    pub fn toggle(&mut self, button: usize, path: &Path) -> Result<PlaybackChange, PlaybackError> {
        // Already audible -> stop. One channel per button, always.
        if let Some(sink) = self.active.remove(&button) {
            sink.stop();
            debug!("[Playback] Button {} stopped", button);
            return Ok(PlaybackChange::Stopped);
        }

        if self.active.len() >= MAX_CHANNELS {
            return Err(PlaybackError::NoFreeChannel);
        }

        if !path.exists() {
            return Err(PlaybackError::FileNotFound(path.to_path_buf()));
        }

        let file = File::open(path).map_err(|source| PlaybackError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let source = Decoder::new(BufReader::new(file)).map_err(|source| PlaybackError::Decode {
            path: path.to_path_buf(),
            source,
        })?;

        let sink = Sink::try_new(&self.handle)?;
        sink.set_volume(self.master_volume);
        sink.append(source);
        self.active.insert(button, sink);
        debug!("[Playback] Button {} playing {}", button, path.display());
        Ok(PlaybackChange::Started)
    }

    /// Fixed-cadence sweep: drop drained channels, report which buttons
    /// just finished so the GUI can clear their playing state
    pub fn poll(&mut self) -> Vec<usize> {
        let mut finished = Vec::new();
        self.active.retain(|button, sink| {
            if sink.empty() {
                finished.push(*button);
                false
            } else {
                true
            }
        });
        finished
    }

    pub fn is_playing(&self, button: usize) -> bool {
        self.active.contains_key(&button)
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Master volume; takes effect on every active channel immediately
    pub fn set_volume(&mut self, volume: f32) {
        self.master_volume = volume.clamp(0.0, 1.0);
        for sink in self.active.values() {
            sink.set_volume(self.master_volume);
        }
    }

    pub fn volume(&self) -> f32 {
        self.master_volume
    }

    /// Silence everything (recording start, panic button)
    pub fn stop_all(&mut self) {
        if !self.active.is_empty() {
            info!("[Playback] Stopping all {} channel(s)", self.active.len());
        }
        for (_, sink) in self.active.drain() {
            sink.stop();
        }
    }
}
