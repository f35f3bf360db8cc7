//! Particle pool for block-hit bursts
//!
//! Particles are purely visual. They never feed back into gameplay, so the
//! pool can be cleared or dropped at any time.

use glam::Vec2;
use rand::Rng;
use serde::Serialize;

use crate::consts::{PARTICLE_GRAVITY, PARTICLES_PER_BURST};

/// Launch speed band (pixels/tick)
const BURST_SPEED_MIN: f32 = 2.0;
const BURST_SPEED_SPREAD: f32 = 4.0;
/// Lifetime band (seconds)
const BURST_LIFE_MIN: f32 = 1.0;
const BURST_LIFE_SPREAD: f32 = 0.5;
/// Radius band (pixels)
const BURST_SIZE_MIN: f32 = 3.0;
const BURST_SIZE_SPREAD: f32 = 4.0;

/// A particle for visual effects
#[derive(Debug, Clone, Serialize)]
pub struct Particle {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Remaining life in seconds
    pub life: f32,
    /// Life at spawn, for fade-out
    pub max_life: f32,
    /// Packed 0xRRGGBB
    pub color: u32,
    pub size: f32,
}

impl Particle {
    /// Remaining life as a 0-1 fraction
    pub fn alpha(&self) -> f32 {
        if self.max_life <= 0.0 {
            0.0
        } else {
            (self.life / self.max_life).clamp(0.0, 1.0)
        }
    }
}

/// Owns every live particle
#[derive(Debug, Clone, Default)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
    next_id: u32,
}

impl ParticleSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a ring of particles at `origin`, evenly spaced around a full circle
    pub fn create_explosion(&mut self, origin: Vec2, color: u32, rng: &mut impl Rng) {
        self.particles.reserve(PARTICLES_PER_BURST);
        for i in 0..PARTICLES_PER_BURST {
            let angle = i as f32 / PARTICLES_PER_BURST as f32 * std::f32::consts::TAU;
            let speed = BURST_SPEED_MIN + rng.random::<f32>() * BURST_SPEED_SPREAD;
            let life = BURST_LIFE_MIN + rng.random::<f32>() * BURST_LIFE_SPREAD;
            let size = BURST_SIZE_MIN + rng.random::<f32>() * BURST_SIZE_SPREAD;

            let id = self.next_id;
            self.next_id = self.next_id.wrapping_add(1);
            self.particles.push(Particle {
                id,
                pos: origin,
                vel: Vec2::new(angle.cos(), angle.sin()) * speed,
                life,
                max_life: life,
                color,
                size,
            });
        }
    }

    /// Integrate, apply gravity, age and prune
    pub fn update(&mut self, dt: f32) {
        for particle in &mut self.particles {
            particle.pos += particle.vel;
            particle.vel.y += PARTICLE_GRAVITY;
            particle.life -= dt;
        }
        self.particles.retain(|p| p.life > 0.0);
    }

    /// Drop every particle
    pub fn clear(&mut self) {
        self.particles.clear();
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}
