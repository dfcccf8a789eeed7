use std::time::Duration;

use rodio::source::{SineWave, Source};
use rodio::{OutputStream, OutputStreamHandle};

/// Menu feedback cues. `Move` acknowledges navigation and selection,
/// `Change` acknowledges a value edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    Move,
    Change,
}

/// Fire-and-forget playback seam. Playback never affects menu state and
/// failures are swallowed by the implementation.
pub trait CueSink {
    fn play(&mut self, cue: Cue);
}

/// Plays short synthesized tones through the default audio device.
pub struct RodioSink {
    // Held so the device stays open; dropping it silences the handle.
    _stream: OutputStream,
    handle: OutputStreamHandle,
}

impl RodioSink {
    pub fn new() -> Option<Self> {
        match OutputStream::try_default() {
            Ok((stream, handle)) => Some(Self {
                _stream: stream,
                handle,
            }),
            Err(err) => {
                tracing::warn!("audio output unavailable: {err}");
                None
            }
        }
    }
}

impl CueSink for RodioSink {
    fn play(&mut self, cue: Cue) {
        let freq = match cue {
            Cue::Move => 660.0,
            Cue::Change => 440.0,
        };
        let tone = SineWave::new(freq)
            .take_duration(Duration::from_millis(45))
            .amplify(0.15);
        if let Err(err) = self.handle.play_raw(tone) {
            tracing::trace!("cue playback failed: {err}");
        }
    }
}

/// Silent sink for hosts without an audio device.
pub struct NullSink;

impl CueSink for NullSink {
    fn play(&mut self, _cue: Cue) {}
}

/// Best available sink for this host.
pub fn default_sink() -> Box<dyn CueSink> {
    match RodioSink::new() {
        Some(sink) => Box::new(sink),
        None => Box::new(NullSink),
    }
}
