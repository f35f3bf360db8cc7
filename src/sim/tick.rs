//! Per-frame simulation tick
//!
//! Advances paddle, ball, power-ups and particles, resolves collisions and
//! drives the level/lives state machine. One call per rendered frame.

use glam::Vec2;
use rand::Rng;

use super::levels::LevelManager;
use super::physics::{self, Axis};
use super::state::{Dimensions, GamePhase, GameState, MeetingBlock, PowerUp, PowerUpKind};
use crate::audio::SoundEvent;
use crate::input::HeldKeys;

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Held direction keys
    pub held: HeldKeys,
    /// Idle/demo mode - AI moves the paddle
    pub autopilot: bool,
}

/// Advance the game by one frame of `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, levels: &LevelManager, dt: f32) {
    match state.phase {
        GamePhase::Playing => update_playing(state, input, dt),
        GamePhase::LevelComplete => advance_level_countdown(state, levels, dt),
        GamePhase::Menu | GamePhase::Paused | GamePhase::GameOver | GamePhase::Victory => {}
    }
}

fn update_playing(state: &mut GameState, input: &TickInput, dt: f32) {
    update_paddle(state, input);

    update_ball(state);
    if state.phase != GamePhase::Playing {
        return;
    }

    // Power-ups fall; anything past the bottom is gone
    let field_height = state.tuning.canvas_height;
    for power_up in &mut state.power_ups {
        power_up.pos += power_up.vel;
    }
    state.power_ups.retain(|p| p.pos.y <= field_height);

    state.particles.update(dt);

    check_collisions(state);

    state.stats.time_elapsed += dt;
    expire_due_effects(state);

    if state.blocks.is_empty() {
        complete_level(state);
    }
}

fn update_paddle(state: &mut GameState, input: &TickInput) {
    let speed = state.tuning.paddle_speed;
    let dx = if input.autopilot {
        (autopilot_target(state) - state.paddle.center_x()).clamp(-speed, speed)
    } else {
        input.held.direction() * speed
    };
    state.paddle.pos.x += dx;
    state.paddle.clamp_to(state.tuning.canvas_width);
}

/// Where the demo AI wants the paddle centered.
///
/// Tracks the ball while it falls; while it rises, goes after the lowest
/// falling power-up if there is one.
fn autopilot_target(state: &GameState) -> f32 {
    let ball = &state.ball;
    if ball.vel.y < 0.0 {
        let lowest = state.power_ups.iter().max_by(|a, b| {
            a.pos
                .y
                .partial_cmp(&b.pos.y)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        if let Some(power_up) = lowest {
            return power_up.pos.x + power_up.size.width / 2.0;
        }
    }
    // Lead the ball slightly
    ball.pos.x + ball.vel.x * 2.0
}

fn update_ball(state: &mut GameState) {
    let (min_speed, max_speed) = state.speed_bounds();
    let field_width = state.tuning.canvas_width;
    let loss_line = state.tuning.canvas_height + state.tuning.ball_loss_margin;

    let ball = &mut state.ball;
    ball.record_trail();
    ball.pos += ball.vel;
    physics::constrain_ball_velocity(ball, min_speed, max_speed);

    let mut bounced = false;
    if ball.pos.x <= ball.radius && ball.vel.x < 0.0 {
        ball.vel.x = -ball.vel.x;
        bounced = true;
    } else if ball.pos.x >= field_width - ball.radius && ball.vel.x > 0.0 {
        ball.vel.x = -ball.vel.x;
        bounced = true;
    }
    if ball.pos.y <= ball.radius && ball.vel.y < 0.0 {
        ball.vel.y = -ball.vel.y;
        bounced = true;
    }
    if bounced {
        state.events.push(SoundEvent::WallBounce);
    }

    if state.ball.pos.y > loss_line {
        lose_life(state);
    }
}

fn check_collisions(state: &mut GameState) {
    if physics::ball_paddle_collision(&state.ball, &state.paddle) {
        bounce_off_paddle(state);
    }

    let hit: Vec<usize> = state
        .blocks
        .iter()
        .enumerate()
        .filter(|(_, block)| physics::ball_block_collision(&state.ball, block))
        .map(|(i, _)| i)
        .collect();

    if let Some(&first) = hit.first() {
        let axis = if state.tuning.axis_aware_block_bounce {
            physics::reflection_axis(&state.ball, &state.blocks[first])
        } else {
            Axis::Vertical
        };
        // Back to front so removals don't shift pending indices
        for &idx in hit.iter().rev() {
            hit_meeting(state, idx);
        }
        // One bounce per tick, even when two meetings are touched at once
        state.ball.vel = physics::reflect_velocity(state.ball.vel, axis);
    }

    let mut i = 0;
    while i < state.power_ups.len() {
        if physics::paddle_power_up_collision(&state.paddle, &state.power_ups[i]) {
            let power_up = state.power_ups.remove(i);
            collect_power_up(state, power_up.kind);
        } else {
            i += 1;
        }
    }
}

fn bounce_off_paddle(state: &mut GameState) {
    let paddle = &state.paddle;
    let half_width = paddle.size.width / 2.0;
    // -1 at the left edge, +1 at the right edge
    let offset = ((state.ball.pos.x - paddle.center_x()) / half_width).clamp(-1.0, 1.0);

    let ball = &mut state.ball;
    ball.vel.x = offset * state.tuning.max_paddle_deflection;
    ball.vel.y = -ball.vel.y.abs();
    state.events.push(SoundEvent::PaddleBounce);
}

/// Register a ball hit on the meeting at `idx`
fn hit_meeting(state: &mut GameState, idx: usize) {
    let block = &mut state.blocks[idx];
    let cancelled = block.register_hit();
    let (center, color) = (block.center(), block.color);
    state
        .particles
        .create_explosion(center, color, &mut state.rng);

    if !cancelled {
        state.events.push(SoundEvent::MeetingHit);
        return;
    }

    let block = state.blocks.remove(idx);
    state.stats.score += block.kind.score();
    state.stats.meetings_cancelled += 1;
    log::debug!(
        "Cancelled '{}' ({}) +{}",
        block.title,
        block.kind.as_str(),
        block.kind.score()
    );

    if state.rng.random_bool(state.level.power_up_chance) {
        spawn_power_up(state, &block);
    }
    state.events.push(SoundEvent::MeetingCancelled);
}

fn spawn_power_up(state: &mut GameState, block: &MeetingBlock) {
    let kind = PowerUpKind::random(&mut state.rng);
    let size = state.tuning.power_up_size;
    let power_up = PowerUp {
        id: state.next_entity_id(),
        kind,
        pos: block.pos,
        vel: Vec2::new(0.0, state.tuning.power_up_fall_speed),
        size: Dimensions::new(size, size),
    };
    log::debug!("Power-up {:?} dropped at {:?}", kind, power_up.pos);
    state.power_ups.push(power_up);
}

fn collect_power_up(state: &mut GameState, kind: PowerUpKind) {
    state.stats.power_ups_collected += 1;
    state.events.push(SoundEvent::PowerUp);

    let now = state.stats.time_elapsed;
    let tuning = &state.tuning;
    match kind {
        PowerUpKind::WidePaddle => {
            let width = (state.paddle.size.width * tuning.wide_paddle_factor)
                .min(tuning.wide_paddle_max);
            state.paddle.set_width(width, tuning.canvas_width);
            state
                .effects
                .activate(kind, now, tuning.wide_paddle_duration);
        }
        PowerUpKind::CoffeeBreak => {
            // A refresh only extends the timer; the slowdown is applied once
            if state
                .effects
                .activate(kind, now, tuning.coffee_break_duration)
            {
                state.ball.vel *= tuning.coffee_break_factor;
            }
        }
        PowerUpKind::ScheduleClear => schedule_clear(state),
        PowerUpKind::MultiBall | PowerUpKind::MeetingCancellation | PowerUpKind::Overtime => {}
    }
    log::debug!("Collected {:?}", kind);
}

/// Cancel a handful of random meetings outright
fn schedule_clear(state: &mut GameState) {
    for _ in 0..state.tuning.schedule_clear_count {
        if state.blocks.is_empty() {
            break;
        }
        let idx = state.rng.random_range(0..state.blocks.len());
        let block = state.blocks.remove(idx);
        state
            .particles
            .create_explosion(block.center(), block.color, &mut state.rng);
        state.stats.score += block.kind.score();
    }
}

fn expire_due_effects(state: &mut GameState) {
    for kind in state.effects.take_due(state.stats.time_elapsed) {
        revert_effect(state, kind);
        log::debug!("{:?} expired", kind);
    }
}

/// Undo an effect's side effects. Only called for effects just removed
/// from the active set, so nothing is ever reverted twice.
fn revert_effect(state: &mut GameState, kind: PowerUpKind) {
    match kind {
        PowerUpKind::WidePaddle => {
            state
                .paddle
                .set_width(state.tuning.paddle_width, state.tuning.canvas_width);
        }
        PowerUpKind::CoffeeBreak => {
            state.ball.vel /= state.tuning.coffee_break_factor;
        }
        PowerUpKind::ScheduleClear
        | PowerUpKind::MultiBall
        | PowerUpKind::MeetingCancellation
        | PowerUpKind::Overtime => {}
    }
}

fn lose_life(state: &mut GameState) {
    state.stats.lives = state.stats.lives.saturating_sub(1);

    for kind in state.effects.drain() {
        revert_effect(state, kind);
    }
    state
        .paddle
        .set_width(state.tuning.paddle_width, state.tuning.canvas_width);

    if state.stats.lives == 0 {
        state.phase = GamePhase::GameOver;
        state.events.push(SoundEvent::GameOver);
        log::info!(
            "Game over: score {}, {} meetings cancelled",
            state.stats.score,
            state.stats.meetings_cancelled
        );
    } else {
        state.respawn_ball();
        state.events.push(SoundEvent::LifeLost);
        log::info!("Life lost, {} left", state.stats.lives);
    }
}

fn complete_level(state: &mut GameState) {
    state.phase = GamePhase::LevelComplete;
    state.level_complete_timer = state.tuning.level_complete_delay;
    state.events.push(SoundEvent::LevelComplete);
    log::info!(
        "{} cleared in {:.1}s, score {}",
        state.level.name,
        state.stats.time_elapsed,
        state.stats.score
    );
}

fn advance_level_countdown(state: &mut GameState, levels: &LevelManager, dt: f32) {
    state.level_complete_timer -= dt;
    if state.level_complete_timer > 0.0 {
        return;
    }

    match levels.level(state.stats.level + 1) {
        Some(next) => {
            log::info!("Loading level {}: {}", next.id, next.name);
            state.load_level(next.clone());
            state.phase = GamePhase::Playing;
        }
        None => {
            log::info!("Victory! Final score {}", state.stats.score);
            state.phase = GamePhase::Victory;
        }
    }
}
