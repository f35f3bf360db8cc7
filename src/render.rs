//! Rendering collaborator seam
//!
//! Once per frame the engine hands the renderer a borrowed, read-only view
//! of everything on screen. Drawing itself happens outside this crate.

use serde::Serialize;

use crate::sim::{
    Ball, GamePhase, GameState, GameStats, MeetingBlock, Paddle, Particle, PowerUp, ScheduledEffect,
};

/// Read-only view of one frame
#[derive(Debug, Clone, Serialize)]
pub struct FrameSnapshot<'a> {
    pub phase: GamePhase,
    pub level_name: &'a str,
    pub week_of: &'a str,
    pub ball: &'a Ball,
    pub paddle: &'a Paddle,
    pub blocks: &'a [MeetingBlock],
    pub power_ups: &'a [PowerUp],
    pub particles: &'a [Particle],
    pub effects: &'a [ScheduledEffect],
    pub stats: GameStats,
}

impl<'a> FrameSnapshot<'a> {
    pub fn capture(state: &'a GameState) -> Self {
        Self {
            phase: state.phase,
            level_name: &state.level.name,
            week_of: &state.level.week_of,
            ball: &state.ball,
            paddle: &state.paddle,
            blocks: &state.blocks,
            power_ups: &state.power_ups,
            particles: state.particles.particles(),
            effects: state.effects.scheduled(),
            stats: state.stats,
        }
    }

    /// Serialize for a JS/JSON rendering bridge
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Anything that can draw a frame
pub trait Renderer {
    fn render(&mut self, frame: &FrameSnapshot<'_>);
}

/// Renderer that draws nothing (headless runs and tests)
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render(&mut self, _frame: &FrameSnapshot<'_>) {}
}
