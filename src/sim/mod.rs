//! Simulation module
//!
//! All gameplay logic lives here:
//! - One tick per rendered frame, velocities in pixels/tick
//! - Randomness only through the state's own seeded RNG
//! - No rendering, audio or platform dependencies

pub mod effects;
pub mod levels;
pub mod particles;
pub mod physics;
pub mod state;
pub mod tick;

pub use effects::{ActiveEffects, ScheduledEffect};
pub use levels::{Level, LevelManager};
pub use particles::{Particle, ParticleSystem};
pub use physics::{
    Axis, ball_block_collision, ball_paddle_collision, constrain_ball_velocity, constrain_speed,
    paddle_power_up_collision, reflect_velocity, reflection_axis,
};
pub use state::{
    Ball, DEFAULT_MEETING_SCORE, Dimensions, GamePhase, GameState, GameStats, MeetingBlock,
    MeetingType, Paddle, PowerUp, PowerUpKind,
};
pub use tick::{TickInput, tick};
