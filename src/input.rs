//! Action-level input
//!
//! The simulation never sees raw keys, only whether an action is active.

use serde::{Deserialize, Serialize};

/// Actions the simulation can query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    Fire,
    RotateTurretCw,
    RotateTurretCcw,
}

/// Queryable input state
pub trait InputState {
    fn is_action_active(&self, action: Action) -> bool;
}

/// Input snapshot for a single frame (deterministic, replayable)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub fire: bool,
    pub turret_cw: bool,
    pub turret_ccw: bool,
}

impl TickInput {
    /// Build an input snapshot from a list of held actions
    pub fn from_actions(actions: &[Action]) -> Self {
        let mut input = Self::default();
        for action in actions {
            input.set(*action, true);
        }
        input
    }

    pub fn set(&mut self, action: Action, active: bool) {
        match action {
            Action::MoveUp => self.up = active,
            Action::MoveDown => self.down = active,
            Action::MoveLeft => self.left = active,
            Action::MoveRight => self.right = active,
            Action::Fire => self.fire = active,
            Action::RotateTurretCw => self.turret_cw = active,
            Action::RotateTurretCcw => self.turret_ccw = active,
        }
    }
}

impl InputState for TickInput {
    fn is_action_active(&self, action: Action) -> bool {
        match action {
            Action::MoveUp => self.up,
            Action::MoveDown => self.down,
            Action::MoveLeft => self.left,
            Action::MoveRight => self.right,
            Action::Fire => self.fire,
            Action::RotateTurretCw => self.turret_cw,
            Action::RotateTurretCcw => self.turret_ccw,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_actions() {
        let input = TickInput::from_actions(&[Action::MoveUp, Action::Fire]);
        assert!(input.is_action_active(Action::MoveUp));
        assert!(input.is_action_active(Action::Fire));
        assert!(!input.is_action_active(Action::MoveDown));
        assert!(!input.is_action_active(Action::RotateTurretCw));
    }
}
