//! Keyboard mapping
//!
//! Browser key names are mapped to actions. Movement is level-triggered
//! (held keys); launch and pause are edge-triggered and consumed by the next
//! simulation tick.

use crate::sim::TickInput;

/// What a key does in game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    MoveLeft,
    MoveRight,
    Launch,
    Pause,
}

/// Map a `KeyboardEvent.key` value to an action
pub fn key_action(key: &str) -> Option<KeyAction> {
    match key {
        "ArrowLeft" | "Left" => Some(KeyAction::MoveLeft),
        "ArrowRight" | "Right" => Some(KeyAction::MoveRight),
        " " | "Spacebar" => Some(KeyAction::Launch),
        "Escape" | "p" | "P" => Some(KeyAction::Pause),
        _ => None,
    }
}

/// Keyboard state between frames
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeldKeys {
    pub left: bool,
    pub right: bool,
    /// Pending one-shot launch
    pub launch: bool,
    /// Pending one-shot pause toggle
    pub pause: bool,
}

impl HeldKeys {
    /// Returns the action so callers can decide whether to swallow the event
    pub fn key_down(&mut self, key: &str) -> Option<KeyAction> {
        let action = key_action(key)?;
        match action {
            KeyAction::MoveLeft => self.left = true,
            KeyAction::MoveRight => self.right = true,
            KeyAction::Launch => self.launch = true,
            KeyAction::Pause => self.pause = true,
        }
        Some(action)
    }

    pub fn key_up(&mut self, key: &str) {
        match key_action(key) {
            Some(KeyAction::MoveLeft) => self.left = false,
            Some(KeyAction::MoveRight) => self.right = false,
            _ => {}
        }
    }

    /// Release everything (focus lost, screen change)
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Input for the next tick; one-shot commands are consumed
    pub fn take_tick_input(&mut self) -> TickInput {
        let input = TickInput {
            left: self.left,
            right: self.right,
            launch: self.launch,
            pause: self.pause,
            autopilot: false,
        };
        self.launch = false;
        self.pause = false;
        input
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        assert_eq!(key_action("ArrowLeft"), Some(KeyAction::MoveLeft));
        assert_eq!(key_action("Left"), Some(KeyAction::MoveLeft));
        assert_eq!(key_action("Right"), Some(KeyAction::MoveRight));
        assert_eq!(key_action(" "), Some(KeyAction::Launch));
        assert_eq!(key_action("Escape"), Some(KeyAction::Pause));
        assert_eq!(key_action("p"), Some(KeyAction::Pause));
        assert_eq!(key_action("Enter"), None);
    }

    #[test]
    fn test_held_movement_persists() {
        let mut keys = HeldKeys::default();
        keys.key_down("ArrowLeft");
        assert!(keys.take_tick_input().left);
        assert!(keys.take_tick_input().left);

        keys.key_up("ArrowLeft");
        assert!(!keys.take_tick_input().left);
    }

    #[test]
    fn test_one_shots_are_consumed() {
        let mut keys = HeldKeys::default();
        keys.key_down(" ");
        keys.key_down("Escape");

        let first = keys.take_tick_input();
        assert!(first.launch && first.pause);

        let second = keys.take_tick_input();
        assert!(!second.launch && !second.pause);
    }

    #[test]
    fn test_clear_releases_keys() {
        let mut keys = HeldKeys::default();
        keys.key_down("ArrowRight");
        keys.key_down(" ");
        keys.clear();
        assert_eq!(keys.take_tick_input(), TickInput::default());
    }
}
