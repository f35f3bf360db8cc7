//! Calendar Breaker - a breakout game where the bricks are meetings
//!
//! Core modules:
//! - `sim`: Simulation (physics, collisions, particles, levels, game state)
//! - `engine`: Frame loop, commands and collaborator fan-out
//! - `render` / `audio`: Collaborator seams for the rendering and sound shells
//! - `settings`: Data-driven game tuning

pub mod audio;
pub mod engine;
pub mod frame;
pub mod input;
pub mod render;
pub mod settings;
pub mod sim;

pub use audio::{AudioError, AudioSink, LogAudio, NullAudio, SoundEvent};
pub use engine::GameEngine;
pub use frame::{FrameHandle, FrameScheduler, ManualScheduler};
pub use input::{Key, PointerSource};
pub use render::{FrameSnapshot, NullRenderer, Renderer};
pub use settings::{ConfigError, Tuning};

/// Game configuration constants
pub mod consts {
    /// Nominal frame rate the per-tick velocities were tuned for
    pub const FRAME_DT: f32 = 1.0 / 60.0;
    /// Longest frame delta the loop will feed to a tick (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Ball trail history length (newest first)
    pub const TRAIL_LENGTH: usize = 8;

    /// Particles spawned per block burst
    pub const PARTICLES_PER_BURST: usize = 12;
    /// Downward acceleration applied to particles (pixels/tick²)
    pub const PARTICLE_GRAVITY: f32 = 0.2;

    /// Calendar grid: one column per weekday
    pub const DAYS_PER_WEEK: usize = 7;
}
