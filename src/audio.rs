//! Background music playback
//!
//! Plays the level's track through a rodio sink and follows the level as it
//! starts, pauses and resumes. A missing device or an unreadable track leaves
//! the level silent; it never stops the game.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use rodio::{Decoder, OutputStream, Sink};

use crate::sim::GameEvent;

/// Playback state of the track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Playback {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// Open output device with the track queued on it
struct Output {
    /// Dropping the stream closes the device
    _stream: OutputStream,
    sink: Sink,
}

/// Background music for one level
pub struct MusicTrack {
    /// `None` when there is nothing to play
    output: Option<Output>,
    volume: f32,
    playback: Playback,
}

impl MusicTrack {
    /// Open and queue a track, paused. Failures are logged and leave the
    /// track silent.
    pub fn open(path: impl AsRef<Path>, volume: f32) -> Self {
        let volume = volume.clamp(0.0, 1.0);
        let output = Self::open_output(path.as_ref(), volume);
        Self {
            output,
            volume,
            playback: Playback::Stopped,
        }
    }

    fn open_output(path: &Path, volume: f32) -> Option<Output> {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) => {
                log::warn!("Failed to open music {}: {e} - audio disabled", path.display());
                return None;
            }
        };

        let source = match Decoder::new(BufReader::new(file)) {
            Ok(source) => source,
            Err(e) => {
                log::warn!("Cannot decode music {}: {e} - audio disabled", path.display());
                return None;
            }
        };

        let (stream, handle) = match OutputStream::try_default() {
            Ok(output) => output,
            Err(e) => {
                log::warn!("No audio device found ({e}) - running silent");
                return None;
            }
        };

        let sink = match Sink::try_new(&handle) {
            Ok(sink) => sink,
            Err(e) => {
                log::warn!("Failed to create audio sink: {e} - running silent");
                return None;
            }
        };
        sink.set_volume(volume);
        sink.append(source);
        sink.pause();

        log::info!("Music track {}", path.display());
        Some(Output { _stream: stream, sink })
    }

    /// A track that never plays
    pub fn silent() -> Self {
        Self {
            output: None,
            volume: 0.0,
            playback: Playback::Stopped,
        }
    }

    pub fn is_silent(&self) -> bool {
        self.output.is_none() || self.volume <= 0.0
    }

    pub fn playback(&self) -> Playback {
        self.playback
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Start or resume playback
    pub fn start(&mut self) {
        if self.playback == Playback::Playing {
            return;
        }
        if let Some(output) = &self.output {
            output.sink.play();
        }
        log::debug!("Music playing");
        self.playback = Playback::Playing;
    }

    pub fn pause(&mut self) {
        if self.playback != Playback::Playing {
            return;
        }
        if let Some(output) = &self.output {
            output.sink.pause();
        }
        log::debug!("Music paused");
        self.playback = Playback::Paused;
    }

    /// Stop for good; the queued track is dropped
    pub fn stop(&mut self) {
        if let Some(output) = self.output.take() {
            output.sink.stop();
        }
        self.playback = Playback::Stopped;
    }

    /// Follow the level's pause state
    pub fn handle_event(&mut self, event: &GameEvent) {
        match event {
            GameEvent::Paused => self.pause(),
            GameEvent::Resumed => self.start(),
            GameEvent::LevelFinished { .. } => self.stop(),
            _ => {}
        }
    }
}
