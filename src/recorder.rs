/// Microphone recording
///
/// One background thread owns the cpal input stream and appends samples
/// to a shared buffer; the GUI thread only flips the stop flag and, on
/// stop, writes the take out as a 16-bit WAV.
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use crossbeam_channel::{bounded, Receiver, Sender};
use thiserror::Error;
use time::macros::format_description;
use time::OffsetDateTime;
use tracing::{info, warn};

use crate::storage;

#[derive(Debug, Error)]
pub enum RecorderError {
    #[error("No microphone found")]
    NoInputDevice,

    #[error("Could not query microphone format: {0}")]
    Config(#[from] cpal::DefaultStreamConfigError),

    #[error("Could not open microphone stream: {0}")]
    Build(#[from] cpal::BuildStreamError),

    #[error("Could not start microphone stream: {0}")]
    Start(#[from] cpal::PlayStreamError),

    #[error("Could not write WAV file: {0}")]
    Wav(#[from] hound::Error),

    #[error("Unsupported microphone sample format: {0}")]
    UnsupportedFormat(String),

    #[error("Microphone stream error: {0}")]
    Stream(String),
}

/// Stream properties captured by the recording thread, needed for the
/// WAV header on stop
#[derive(Clone, Copy, Debug)]
struct StreamMeta {
    sample_rate: u32,
    channels: u16,
}

/// A single in-flight take
pub struct Recorder {
    stop: Arc<AtomicBool>,
    samples: Arc<Mutex<Vec<f32>>>,
    meta: Arc<Mutex<Option<StreamMeta>>>,
    /// Errors raised inside the capture thread (stream build, device loss)
    error_rx: Receiver<RecorderError>,
    thread: Option<thread::JoinHandle<()>>,
}

impl Recorder {
    /// Spawn the capture thread on the default microphone
    pub fn start() -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let samples = Arc::new(Mutex::new(Vec::new()));
        let meta = Arc::new(Mutex::new(None));
        let (error_tx, error_rx) = bounded(4);

        let thread = {
            let stop = Arc::clone(&stop);
            let samples = Arc::clone(&samples);
            let meta = Arc::clone(&meta);
            thread::spawn(move || {
                if let Err(e) = capture_loop(&stop, &samples, &meta, &error_tx) {
                    warn!("[Recorder] Capture failed: {}", e);
                    let _ = error_tx.try_send(e);
                }
            })
        };

        Self {
            stop,
            samples,
            meta,
            error_rx,
            thread: Some(thread),
        }
    }

    /// Any error the capture thread has reported so far
    pub fn take_error(&self) -> Option<RecorderError> {
        self.error_rx.try_recv().ok()
    }

    /// Stop the take and write it to the recordings dir
    ///
    /// Returns the written path, or None when nothing was captured.
    pub fn stop(mut self) -> Result<Option<PathBuf>, RecorderError> {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }

        // A stream error may have killed the thread mid-take; if we got
        // no audio at all, surface it instead of an empty result
        let frames = std::mem::take(&mut *self.samples.lock().unwrap());
        if frames.is_empty() {
            if let Ok(e) = self.error_rx.try_recv() {
                return Err(e);
            }
            info!("[Recorder] Nothing recorded");
            return Ok(None);
        }

        let meta = self
            .meta
            .lock()
            .unwrap()
            .unwrap_or(StreamMeta {
                sample_rate: 44_100,
                channels: 1,
            });

        let path = storage::recordings_dir().join(take_filename(now()));
        write_wav(&path, &frames, meta.sample_rate, meta.channels)?;
        info!(
            "[Recorder] Saved {} ({:.1}s @ {} Hz)",
            path.display(),
            frames.len() as f32 / (meta.sample_rate as f32 * meta.channels as f32),
            meta.sample_rate
        );
        Ok(Some(path))
    }
}

impl Drop for Recorder {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
    }
}

/// The capture thread: owns the cpal stream until the stop flag flips
fn capture_loop(
    stop: &Arc<AtomicBool>,
    samples: &Arc<Mutex<Vec<f32>>>,
    meta: &Arc<Mutex<Option<StreamMeta>>>,
    error_tx: &Sender<RecorderError>,
) -> Result<(), RecorderError> {
    let host = cpal::default_host();
    let device = host
        .default_input_device()
        .ok_or(RecorderError::NoInputDevice)?;
    let config = device.default_input_config()?;

    *meta.lock().unwrap() = Some(StreamMeta {
        sample_rate: config.sample_rate().0,
        channels: config.channels(),
    });
    info!(
        "[Recorder] Recording from '{}' ({} ch @ {} Hz)",
        device.name().unwrap_or_else(|_| "unknown".to_string()),
        config.channels(),
        config.sample_rate().0
    );

    let err_tx = error_tx.clone();
    let err_fn = move |err: cpal::StreamError| {
        let _ = err_tx.try_send(RecorderError::Stream(err.to_string()));
    };

    let stream = match config.sample_format() {
        cpal::SampleFormat::F32 => {
            let samples = Arc::clone(samples);
            device.build_input_stream(
                &config.into(),
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    samples.lock().unwrap().extend_from_slice(data);
                },
                err_fn,
                None,
            )?
        }
        cpal::SampleFormat::I16 => {
            let samples = Arc::clone(samples);
            device.build_input_stream(
                &config.into(),
                move |data: &[i16], _: &cpal::InputCallbackInfo| {
                    let mut buf = samples.lock().unwrap();
                    buf.extend(data.iter().map(|&s| s as f32 / i16::MAX as f32));
                },
                err_fn,
                None,
            )?
        }
        cpal::SampleFormat::U16 => {
            let samples = Arc::clone(samples);
            device.build_input_stream(
                &config.into(),
                move |data: &[u16], _: &cpal::InputCallbackInfo| {
                    let mut buf = samples.lock().unwrap();
                    buf.extend(
                        data.iter()
                            .map(|&s| (s as f32 - u16::MAX as f32 / 2.0) / (u16::MAX as f32 / 2.0)),
                    );
                },
                err_fn,
                None,
            )?
        }
        other => return Err(RecorderError::UnsupportedFormat(format!("{:?}", other))),
    };

    stream.play()?;

    // Park here; the stream callback does the work
    while !stop.load(Ordering::Relaxed) {
        thread::sleep(Duration::from_millis(50));
    }

    info!("[Recorder] Capture stopped");
    Ok(())
}

fn now() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

/// File name for a take, e.g. "recording_20250614_153012.wav"
fn take_filename(t: OffsetDateTime) -> String {
    let fmt = format_description!("[year][month][day]_[hour][minute][second]");
    match t.format(&fmt) {
        Ok(stamp) => format!("recording_{}.wav", stamp),
        // format_description above is static; this only fires on a
        // broken clock, where any unique-ish name will do
        Err(_) => format!("recording_{}.wav", t.unix_timestamp()),
    }
}

/// Write captured f32 samples as 16-bit PCM
fn write_wav(
    path: &std::path::Path,
    frames: &[f32],
    sample_rate: u32,
    channels: u16,
) -> Result<(), hound::Error> {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec)?;
    for &s in frames {
        writer.write_sample((s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)?;
    }
    writer.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_take_filename_format() {
        let t = datetime!(2025-06-14 15:30:12 UTC);
        assert_eq!(take_filename(t), "recording_20250614_153012.wav");
    }

    #[test]
    fn test_write_wav_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("take.wav");

        // Half a second of a quiet ramp
        let frames: Vec<f32> = (0..22_050).map(|i| (i % 100) as f32 / 200.0).collect();
        write_wav(&path, &frames, 44_100, 1).unwrap();

        let mut reader = hound::WavReader::open(&path).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.sample_rate, 44_100);
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.bits_per_sample, 16);
        assert_eq!(reader.samples::<i16>().count(), frames.len());
    }

    #[test]
    fn test_write_wav_clamps_hot_samples() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hot.wav");

        write_wav(&path, &[2.0, -2.0, 0.0], 44_100, 1).unwrap();

        let mut reader = hound::WavReader::open(&path).unwrap();
        let samples: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(samples[0], i16::MAX);
        assert_eq!(samples[1], -i16::MAX);
        assert_eq!(samples[2], 0);
    }
}
