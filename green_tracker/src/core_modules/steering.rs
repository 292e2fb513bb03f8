// THEORY:
// The decided `Action` drives a single on-screen element along the horizontal
// axis. This is the only piece of state that outlives a frame, and it belongs to
// the presentation side: the decision itself never looks at it.

use crate::config::ElementConfig;
use crate::core_modules::action::Action;

/// Clamps `value` into `[low, high]`.
pub fn clamp(value: f64, low: f64, high: f64) -> f64 {
    if value < low {
        low
    } else if value > high {
        high
    } else {
        value
    }
}

/// Horizontal position of the element being steered.
#[derive(Debug, Clone, PartialEq)]
pub struct SteeredElement {
    x: f64,
    step: f64,
    surface_width: f64,
}

impl SteeredElement {
    /// Starts centered on a surface `surface_width` pixels wide.
    pub fn centered(surface_width: u32, config: &ElementConfig) -> Self {
        Self {
            x: surface_width as f64 / 2.0,
            step: config.step,
            surface_width: surface_width as f64,
        }
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    /// Moves one step in the action's direction, staying on the surface.
    pub fn apply(&mut self, action: Action) -> f64 {
        let delta = match action {
            Action::None => 0.0,
            Action::MoveLeft => -self.step,
            Action::MoveRight => self.step,
        };
        self.x = clamp(self.x + delta, 0.0, self.surface_width);
        self.x
    }
}
