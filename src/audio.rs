//! Audio boundary: one shared, restartable sound.

use std::sync::Arc;

use parking_lot::Mutex;

/// A single sound resource with volume and playback-position controls.
pub trait AudioClip: Send {
    /// Volume in `[0, 1]`.
    fn set_volume(&mut self, volume: f32);

    /// Moves the playback position back to the start.
    fn rewind(&mut self);

    /// Starts playback from the current position.
    fn play(&mut self);
}

/// One call to [`AudioClip::play`] as seen by a [`RecordingClip`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayRecord {
    pub volume: f32,
    /// Whether the clip was rewound since the previous play.
    pub from_start: bool,
}

#[derive(Debug, Default)]
struct ClipState {
    volume: f32,
    at_start: bool,
    plays: Vec<PlayRecord>,
}

/// Clip that records plays instead of producing sound.
///
/// Clones share the same history, so a test can keep one while the scene
/// owns the other.
#[derive(Debug, Clone, Default)]
pub struct RecordingClip {
    state: Arc<Mutex<ClipState>>,
}

impl RecordingClip {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plays(&self) -> Vec<PlayRecord> {
        self.state.lock().plays.clone()
    }

    pub fn play_count(&self) -> usize {
        self.state.lock().plays.len()
    }

    pub fn volume(&self) -> f32 {
        self.state.lock().volume
    }
}

impl AudioClip for RecordingClip {
    fn set_volume(&mut self, volume: f32) {
        self.state.lock().volume = volume.clamp(0.0, 1.0);
    }

    fn rewind(&mut self) {
        self.state.lock().at_start = true;
    }

    fn play(&mut self) {
        let mut state = self.state.lock();
        let record = PlayRecord {
            volume: state.volume,
            from_start: state.at_start,
        };
        state.plays.push(record);
        state.at_start = false;
    }
}

/// Clip for builds without audio output.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentClip;

impl AudioClip for SilentClip {
    fn set_volume(&mut self, _volume: f32) {}

    fn rewind(&mut self) {}

    fn play(&mut self) {}
}
