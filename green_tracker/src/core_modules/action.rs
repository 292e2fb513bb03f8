// THEORY:
// The `ActionDecider` turns the target position into the one decision the rest of
// the application cares about: move the on-screen element left, right, or leave it.
//
// It looks only at the target's x coordinate and only at the current frame. The
// rule is evaluated in a fixed order:
// 1. the "nothing detected" sentinel maps to `None`;
// 2. left of `left_deadzone` maps to `MoveRight`;
// 3. right of `right_deadzone` maps to `MoveLeft`;
// 4. anything in between is the dead zone and maps to `None`.
//
// The polarity is mirrored: a target on the image's left yields `MoveRight`.
// Both bounds are exclusive.

use crate::config::DeciderConfig;
use crate::core_modules::aggregator::TargetPoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Action {
    #[default]
    None,
    MoveLeft,
    MoveRight,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActionDecider {
    left_deadzone: f64,
    right_deadzone: f64,
}

impl Default for ActionDecider {
    fn default() -> Self {
        Self::from(&DeciderConfig::default())
    }
}

impl From<&DeciderConfig> for ActionDecider {
    fn from(config: &DeciderConfig) -> Self {
        Self::new(config.left_deadzone, config.right_deadzone)
    }
}

impl ActionDecider {
    pub fn new(left_deadzone: f64, right_deadzone: f64) -> Self {
        Self {
            left_deadzone,
            right_deadzone,
        }
    }

    pub fn decide(&self, target: TargetPoint) -> Action {
        if target.x == 0.0 {
            Action::None
        } else if target.x < self.left_deadzone {
            Action::MoveRight
        } else if target.x > self.right_deadzone {
            Action::MoveLeft
        } else {
            Action::None
        }
    }
}
