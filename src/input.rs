//! Raw input state owned by one engine instance

use serde::{Deserialize, Serialize};

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Left,
    Right,
    /// Start / pause / restart, depending on the phase
    Confirm,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "ArrowLeft" | "a" | "A" => Some(Key::Left),
            "ArrowRight" | "d" | "D" => Some(Key::Right),
            " " | "Space" | "Spacebar" => Some(Key::Confirm),
            _ => None,
        }
    }
}

/// Where a pointer position came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerSource {
    /// Only steers the paddle during play
    Mouse,
    /// Steers the paddle in any phase
    Touch,
}

/// Held-key table for paddle movement
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeldKeys {
    pub left: bool,
    pub right: bool,
}

impl HeldKeys {
    pub fn set(&mut self, key: Key, down: bool) {
        match key {
            Key::Left => self.left = down,
            Key::Right => self.right = down,
            Key::Confirm => {}
        }
    }

    /// -1, 0 or 1. Right wins when both are held.
    pub fn direction(&self) -> f32 {
        if self.right {
            1.0
        } else if self.left {
            -1.0
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_codes() {
        assert_eq!(Key::from_code("ArrowLeft"), Some(Key::Left));
        assert_eq!(Key::from_code("a"), Some(Key::Left));
        assert_eq!(Key::from_code("d"), Some(Key::Right));
        assert_eq!(Key::from_code(" "), Some(Key::Confirm));
        assert_eq!(Key::from_code("Escape"), None);
    }

    #[test]
    fn test_direction_right_wins() {
        let mut held = HeldKeys::default();
        assert_eq!(held.direction(), 0.0);

        held.set(Key::Left, true);
        assert_eq!(held.direction(), -1.0);

        held.set(Key::Right, true);
        assert_eq!(held.direction(), 1.0);

        held.set(Key::Right, false);
        held.set(Key::Confirm, true);
        assert_eq!(held.direction(), -1.0);
    }
}
