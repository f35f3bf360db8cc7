//! Timed power-up effects
//!
//! Each effect type holds at most one timer. Collecting a type that is
//! already running restarts its timer instead of stacking a second one,
//! so an effect is reverted exactly once no matter how often it was picked up.

use serde::Serialize;

use super::state::PowerUpKind;

/// A running effect and when it was (re)started, in run-clock seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScheduledEffect {
    pub kind: PowerUpKind,
    pub activated_at: f32,
    pub duration: f32,
}

impl ScheduledEffect {
    pub fn expires_at(&self) -> f32 {
        self.activated_at + self.duration
    }
}

/// The set of effects currently modifying the paddle or ball
#[derive(Debug, Clone, Default, Serialize)]
pub struct ActiveEffects {
    scheduled: Vec<ScheduledEffect>,
}

impl ActiveEffects {
    /// Start (or restart) the timer for `kind`.
    ///
    /// Returns true if the effect was not running before.
    pub fn activate(&mut self, kind: PowerUpKind, now: f32, duration: f32) -> bool {
        if let Some(existing) = self.scheduled.iter_mut().find(|e| e.kind == kind) {
            existing.activated_at = now;
            existing.duration = duration;
            return false;
        }
        self.scheduled.push(ScheduledEffect {
            kind,
            activated_at: now,
            duration,
        });
        true
    }

    pub fn is_active(&self, kind: PowerUpKind) -> bool {
        self.scheduled.iter().any(|e| e.kind == kind)
    }

    /// Remove and return every effect whose timer has run out at `now`
    pub fn take_due(&mut self, now: f32) -> Vec<PowerUpKind> {
        let mut due = Vec::new();
        self.scheduled.retain(|e| {
            if now >= e.expires_at() {
                due.push(e.kind);
                false
            } else {
                true
            }
        });
        due
    }

    /// Remove and return every running effect, due or not
    pub fn drain(&mut self) -> Vec<PowerUpKind> {
        self.scheduled.drain(..).map(|e| e.kind).collect()
    }

    /// Forget every timer without reporting it
    pub fn clear(&mut self) {
        self.scheduled.clear();
    }

    pub fn scheduled(&self) -> &[ScheduledEffect] {
        &self.scheduled
    }

    pub fn is_empty(&self) -> bool {
        self.scheduled.is_empty()
    }
}
