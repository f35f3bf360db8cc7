//! Game state and core simulation types
//!
//! Everything the engine mutates per tick lives in [`GameState`].

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::effects::ActiveEffects;
use super::levels::Level;
use super::particles::ParticleSystem;
use crate::audio::SoundEvent;
use crate::consts::TRAIL_LENGTH;
use crate::settings::Tuning;

/// Width and height of an axis-aligned box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f32,
    pub height: f32,
}

impl Dimensions {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn as_vec2(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

/// Current phase of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for start
    Menu,
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Out of lives
    GameOver,
    /// Week cleared, next one loads after a short delay
    LevelComplete,
    /// Every week cleared
    Victory,
}

impl GamePhase {
    /// Phases that only accept a restart
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            GamePhase::GameOver | GamePhase::LevelComplete | GamePhase::Victory
        )
    }
}

/// The ball
#[derive(Debug, Clone, Serialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Recent positions for motion blur (newest first)
    pub trail: Vec<Vec2>,
}

impl Ball {
    pub fn new(pos: Vec2, vel: Vec2, radius: f32) -> Self {
        Self {
            pos,
            vel,
            radius,
            trail: Vec::with_capacity(TRAIL_LENGTH + 1),
        }
    }

    /// Record current position to trail (call once per tick before moving)
    pub fn record_trail(&mut self) {
        self.trail.insert(0, self.pos);
        self.trail.truncate(TRAIL_LENGTH);
    }

    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    /// Top-left corner of the ball's bounding box
    pub fn min(&self) -> Vec2 {
        self.pos - Vec2::splat(self.radius)
    }

    /// Bottom-right corner of the ball's bounding box
    pub fn max(&self) -> Vec2 {
        self.pos + Vec2::splat(self.radius)
    }
}

/// The player's paddle
#[derive(Debug, Clone, Serialize)]
pub struct Paddle {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Dimensions,
}

impl Paddle {
    pub fn new(pos: Vec2, size: Dimensions) -> Self {
        Self { pos, size }
    }

    pub fn center_x(&self) -> f32 {
        self.pos.x + self.size.width / 2.0
    }

    pub fn max(&self) -> Vec2 {
        self.pos + self.size.as_vec2()
    }

    /// Keep the paddle fully inside `[0, field_width]`
    pub fn clamp_to(&mut self, field_width: f32) {
        let max_x = (field_width - self.size.width).max(0.0);
        self.pos.x = self.pos.x.clamp(0.0, max_x);
    }

    /// Center the paddle on `x`, then clamp
    pub fn center_on(&mut self, x: f32, field_width: f32) {
        self.pos.x = x - self.size.width / 2.0;
        self.clamp_to(field_width);
    }

    /// Change width around the current left edge, then clamp
    pub fn set_width(&mut self, width: f32, field_width: f32) {
        self.size.width = width;
        self.clamp_to(field_width);
    }
}

/// Meeting categories, in score order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MeetingType {
    Standup,
    OneOnOne,
    TeamMeeting,
    AllHands,
    Review,
    Planning,
    /// Anything we don't recognize; scores the default
    #[serde(other)]
    Unscheduled,
}

/// Score for a meeting type without a table entry
pub const DEFAULT_MEETING_SCORE: u64 = 100;

impl MeetingType {
    pub const ALL: [MeetingType; 6] = [
        MeetingType::Standup,
        MeetingType::OneOnOne,
        MeetingType::TeamMeeting,
        MeetingType::AllHands,
        MeetingType::Review,
        MeetingType::Planning,
    ];

    /// Points awarded when a meeting of this type is cancelled
    pub fn score(&self) -> u64 {
        match self {
            MeetingType::Standup => 100,
            MeetingType::OneOnOne => 150,
            MeetingType::TeamMeeting => 200,
            MeetingType::Review => 250,
            MeetingType::Planning => 300,
            MeetingType::AllHands => 500,
            MeetingType::Unscheduled => DEFAULT_MEETING_SCORE,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MeetingType::Standup => "standup",
            MeetingType::OneOnOne => "one-on-one",
            MeetingType::TeamMeeting => "team-meeting",
            MeetingType::AllHands => "all-hands",
            MeetingType::Review => "review",
            MeetingType::Planning => "planning",
            MeetingType::Unscheduled => "unscheduled",
        }
    }

    /// Parse a meeting name; unknown names map to `Unscheduled`
    pub fn parse(s: &str) -> Self {
        let s = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .unwrap_or(MeetingType::Unscheduled)
    }
}

/// A meeting block (the bricks)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetingBlock {
    pub id: u32,
    /// Top-left corner
    pub pos: Vec2,
    pub size: Dimensions,
    pub kind: MeetingType,
    pub hits: u32,
    pub max_hits: u32,
    /// Packed 0xRRGGBB
    pub color: u32,
    pub title: String,
}

impl MeetingBlock {
    pub fn center(&self) -> Vec2 {
        self.pos + self.size.as_vec2() / 2.0
    }

    pub fn max(&self) -> Vec2 {
        self.pos + self.size.as_vec2()
    }

    /// Count one hit. Returns true once the meeting is cancelled.
    pub fn register_hit(&mut self) -> bool {
        if self.hits < self.max_hits {
            self.hits += 1;
        }
        self.is_cancelled()
    }

    pub fn is_cancelled(&self) -> bool {
        self.hits >= self.max_hits
    }
}

/// Power-up types, in spawn-table order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PowerUpKind {
    MultiBall,
    MeetingCancellation,
    CoffeeBreak,
    ScheduleClear,
    Overtime,
    WidePaddle,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 6] = [
        PowerUpKind::MultiBall,
        PowerUpKind::MeetingCancellation,
        PowerUpKind::CoffeeBreak,
        PowerUpKind::ScheduleClear,
        PowerUpKind::Overtime,
        PowerUpKind::WidePaddle,
    ];

    /// Uniform pick over [`PowerUpKind::ALL`]
    pub fn random(rng: &mut impl Rng) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

/// A falling power-up
#[derive(Debug, Clone, Serialize)]
pub struct PowerUp {
    pub id: u32,
    pub kind: PowerUpKind,
    /// Top-left corner
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Dimensions,
}

impl PowerUp {
    pub fn max(&self) -> Vec2 {
        self.pos + self.size.as_vec2()
    }
}

/// Run statistics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GameStats {
    pub score: u64,
    /// Current level id (1-based)
    pub level: u32,
    pub lives: u32,
    pub meetings_cancelled: u32,
    pub power_ups_collected: u32,
    /// Seconds spent playing
    pub time_elapsed: f32,
}

impl GameStats {
    pub fn new(starting_lives: u32) -> Self {
        Self {
            score: 0,
            level: 1,
            lives: starting_lives,
            meetings_cancelled: 0,
            power_ups_collected: 0,
            time_elapsed: 0.0,
        }
    }
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    pub tuning: Tuning,
    pub phase: GamePhase,
    pub stats: GameStats,
    /// Definition of the level being played
    pub level: Level,
    pub ball: Ball,
    pub paddle: Paddle,
    /// Remaining meetings
    pub blocks: Vec<MeetingBlock>,
    pub power_ups: Vec<PowerUp>,
    pub particles: ParticleSystem,
    pub effects: ActiveEffects,
    /// Seconds left before the next level loads (LevelComplete only)
    pub level_complete_timer: f32,
    /// Sound events raised this tick, drained by the engine
    pub events: Vec<SoundEvent>,
    pub rng: Pcg32,
    next_id: u32,
}

impl GameState {
    /// Fresh run sitting in the menu with `level` loaded
    pub fn new(tuning: Tuning, level: Level, rng: Pcg32) -> Self {
        let stats = GameStats::new(tuning.starting_lives);
        let paddle = spawn_paddle(&tuning);
        let ball = spawn_ball(&tuning, level.ball_speed);
        let mut state = Self {
            tuning,
            phase: GamePhase::Menu,
            stats,
            level: level.clone(),
            ball,
            paddle,
            blocks: Vec::new(),
            power_ups: Vec::new(),
            particles: ParticleSystem::new(),
            effects: ActiveEffects::default(),
            level_complete_timer: 0.0,
            events: Vec::new(),
            rng,
            next_id: 1,
        };
        state.load_level(level);
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Replace every live entity with a fresh copy of `level`
    pub fn load_level(&mut self, level: Level) {
        self.paddle = spawn_paddle(&self.tuning);
        self.ball = spawn_ball(&self.tuning, level.ball_speed);
        self.blocks = level.meetings.clone();
        self.power_ups.clear();
        self.effects.clear();
        self.stats.level = level.id;
        self.level = level;
        self.level_complete_timer = 0.0;
    }

    /// Start a brand new run on `level`: fresh stats, entities and particles
    pub fn reset_run(&mut self, level: Level) {
        self.stats = GameStats::new(self.tuning.starting_lives);
        self.particles.clear();
        self.events.clear();
        self.load_level(level);
    }

    /// Put the ball back on its launch point with the level's base velocity
    pub fn respawn_ball(&mut self) {
        self.ball = spawn_ball(&self.tuning, self.level.ball_speed);
    }

    /// Bounds for the ball speed constraint this level
    pub fn speed_bounds(&self) -> (f32, f32) {
        (
            self.tuning.min_ball_speed,
            self.tuning.max_ball_speed(self.level.ball_speed),
        )
    }
}

fn spawn_paddle(tuning: &Tuning) -> Paddle {
    Paddle::new(
        Vec2::new(
            tuning.canvas_width / 2.0 - tuning.paddle_width / 2.0,
            tuning.canvas_height - tuning.paddle_bottom_offset,
        ),
        Dimensions::new(tuning.paddle_width, tuning.paddle_height),
    )
}

fn spawn_ball(tuning: &Tuning, ball_speed: f32) -> Ball {
    Ball::new(
        Vec2::new(
            tuning.canvas_width / 2.0,
            tuning.canvas_height - tuning.ball_launch_offset,
        ),
        Vec2::new(tuning.ball_launch_vx, -ball_speed),
        tuning.ball_radius,
    )
}
