//! Sound collaborator seam
//!
//! The simulation raises named sound events; whatever plays them lives
//! outside this crate. Playback is best-effort: a failing sink is logged
//! and the game carries on.

use serde::Serialize;

/// Sound events, fired at the instant they happen in the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SoundEvent {
    /// Ball bounced off the paddle
    PaddleBounce,
    /// Ball bounced off a side or the top
    WallBounce,
    /// Meeting took a hit but is still on the calendar
    MeetingHit,
    /// Meeting was cancelled
    MeetingCancelled,
    /// Power-up collected
    PowerUp,
    /// Ball fell off the bottom with lives to spare
    LifeLost,
    /// Every meeting this week was cancelled
    LevelComplete,
    /// Last life lost
    GameOver,
}

impl SoundEvent {
    /// Stable name handed to the audio shell
    pub fn name(&self) -> &'static str {
        match self {
            SoundEvent::PaddleBounce => "paddle-bounce",
            SoundEvent::WallBounce => "wall-bounce",
            SoundEvent::MeetingHit => "meeting-hit",
            SoundEvent::MeetingCancelled => "meeting-cancelled",
            SoundEvent::PowerUp => "power-up",
            SoundEvent::LifeLost => "life-lost",
            SoundEvent::LevelComplete => "level-complete",
            SoundEvent::GameOver => "game-over",
        }
    }
}

/// Audio backend failure
#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("audio device unavailable: {0}")]
    Unavailable(String),
    #[error("failed to play '{}': {reason}", .event.name())]
    Playback { event: SoundEvent, reason: String },
}

/// Anything that can play sound events
pub trait AudioSink {
    fn play(&mut self, event: SoundEvent) -> Result<(), AudioError>;
}

/// Silent sink
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _event: SoundEvent) -> Result<(), AudioError> {
        Ok(())
    }
}

/// Sink that writes every event to the log (headless runs)
#[derive(Debug, Default, Clone)]
pub struct LogAudio {
    pub muted: bool,
}

impl LogAudio {
    /// Open the headless backend called `name` (`log` or `mute`)
    pub fn for_backend(name: &str) -> Result<Self, AudioError> {
        match name.trim() {
            "" | "log" => Ok(Self { muted: false }),
            "mute" | "off" => Ok(Self { muted: true }),
            other => {
                let reason = format!("unknown audio backend '{other}'");
                Err(AudioError::Unavailable(reason))
            }
        }
    }
}

impl AudioSink for LogAudio {
    fn play(&mut self, event: SoundEvent) -> Result<(), AudioError> {
        if !self.muted {
            log::debug!("♪ {}", event.name());
        }
        Ok(())
    }
}

/// Use the sink if it initialized, otherwise log the failure and go silent
pub fn or_silent<S>(sink: Result<S, AudioError>) -> Box<dyn AudioSink>
where
    S: AudioSink + 'static,
{
    match sink {
        Ok(sink) => Box::new(sink),
        Err(e) => {
            log::warn!("Audio initialization failed, continuing without sound: {e}");
            Box::new(NullAudio)
        }
    }
}
