//! Collision detection and velocity constraints
//!
//! Everything here is stateless: functions look at the entities they are
//! given and, where documented, adjust the velocity passed in.

use glam::Vec2;
use serde::Serialize;

use super::state::{Ball, MeetingBlock, Paddle, PowerUp};

/// Velocity axis flipped by a bounce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Direction given to a ball that has no speed at all (straight up)
pub const STALLED_DIRECTION: Vec2 = Vec2::new(0.0, -1.0);

/// Inclusive overlap test between two axis-aligned boxes
#[inline]
fn aabb_overlap(a_min: Vec2, a_max: Vec2, b_min: Vec2, b_max: Vec2) -> bool {
    a_max.x >= b_min.x && a_min.x <= b_max.x && a_max.y >= b_min.y && a_min.y <= b_max.y
}

/// Ball touches the paddle while falling onto it.
///
/// A rising ball never collides, so a ball that was just bounced up cannot
/// be caught a second time on the way out.
pub fn ball_paddle_collision(ball: &Ball, paddle: &Paddle) -> bool {
    ball.vel.y > 0.0 && aabb_overlap(ball.min(), ball.max(), paddle.pos, paddle.max())
}

/// Ball's bounding box overlaps a meeting block
pub fn ball_block_collision(ball: &Ball, block: &MeetingBlock) -> bool {
    aabb_overlap(ball.min(), ball.max(), block.pos, block.max())
}

/// A falling power-up overlaps the paddle
pub fn paddle_power_up_collision(paddle: &Paddle, power_up: &PowerUp) -> bool {
    aabb_overlap(paddle.pos, paddle.max(), power_up.pos, power_up.max())
}

/// Pick the axis to reflect for a ball/block contact.
///
/// The axis with the shallower penetration is the side that was struck.
/// Ties go to vertical.
pub fn reflection_axis(ball: &Ball, block: &MeetingBlock) -> Axis {
    let delta = ball.pos - block.center();
    let half = block.size.as_vec2() / 2.0;
    let overlap_x = half.x + ball.radius - delta.x.abs();
    let overlap_y = half.y + ball.radius - delta.y.abs();

    if overlap_x < overlap_y {
        Axis::Horizontal
    } else {
        Axis::Vertical
    }
}

/// Flip one velocity component
#[inline]
pub fn reflect_velocity(velocity: Vec2, axis: Axis) -> Vec2 {
    match axis {
        Axis::Horizontal => Vec2::new(-velocity.x, velocity.y),
        Axis::Vertical => Vec2::new(velocity.x, -velocity.y),
    }
}

/// Rescale `velocity` so its length lies in `[min_speed, max_speed]`.
///
/// Direction is preserved. A zero (or non-finite) velocity has no direction,
/// so it is replaced by [`STALLED_DIRECTION`] at `min_speed`.
pub fn constrain_speed(velocity: Vec2, min_speed: f32, max_speed: f32) -> Vec2 {
    let max_speed = max_speed.max(min_speed);
    let speed = velocity.length();

    if !speed.is_finite() || speed <= f32::EPSILON {
        return STALLED_DIRECTION * min_speed;
    }

    let clamped = speed.clamp(min_speed, max_speed);
    if clamped == speed {
        velocity
    } else {
        velocity / speed * clamped
    }
}

/// Constrain the ball's own velocity in place
pub fn constrain_ball_velocity(ball: &mut Ball, min_speed: f32, max_speed: f32) {
    let before = ball.speed();
    ball.vel = constrain_speed(ball.vel, min_speed, max_speed);
    log::trace!(
        "speed constraint: {:.2} -> {:.2} (bounds {:.2}..={:.2})",
        before,
        ball.speed(),
        min_speed,
        max_speed
    );
}
