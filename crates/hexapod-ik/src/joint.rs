//! Per-joint and per-segment data holders owned by a leg.
//!
//! These are not read by the FK/IK math. They carry actuator-facing state
//! (positions and velocities) and segment lengths for telemetry.

use serde::{Deserialize, Serialize};

/// Raw state of one actuated axis.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Joint {
    pub position: f64,
    pub velocity: f64,
    pub last_position: f64,
    pub last_velocity: f64,
}

impl Joint {
    /// Joint resting at `position`.
    pub const fn at(position: f64) -> Self {
        Self {
            position,
            velocity: 0.0,
            last_position: position,
            last_velocity: 0.0,
        }
    }

    /// Shift the current sample into `last_*` and record a new position.
    ///
    /// Velocity is the backward difference over `dt`. A non-positive `dt`
    /// records the position and keeps the previous velocity.
    pub fn record(&mut self, position: f64, dt: f64) {
        self.last_position = self.position;
        self.last_velocity = self.velocity;
        self.position = position;
        if dt > 0.0 {
            self.velocity = (self.position - self.last_position) / dt;
        }
    }

    /// Change in velocity since the previous sample.
    pub fn velocity_delta(&self) -> f64 {
        self.velocity - self.last_velocity
    }
}

/// A rigid segment between two joints.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Link {
    length: f64,
}

impl Link {
    pub const fn new(length: f64) -> Self {
        Self { length }
    }

    pub const fn length(&self) -> f64 {
        self.length
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn joint_at_rest() {
        let j = Joint::at(0.4);
        assert_eq!(j.position, 0.4);
        assert_eq!(j.last_position, 0.4);
        assert_eq!(j.velocity, 0.0);
    }

    #[test]
    fn record_derives_velocity() {
        let mut j = Joint::at(0.0);
        j.record(0.1, 0.02);
        assert_relative_eq!(j.velocity, 5.0, epsilon = 1e-12);
        j.record(0.1, 0.02);
        assert_relative_eq!(j.velocity, 0.0, epsilon = 1e-12);
        assert_relative_eq!(j.last_velocity, 5.0, epsilon = 1e-12);
        assert_relative_eq!(j.velocity_delta(), -5.0, epsilon = 1e-12);
    }

    #[test]
    fn record_with_zero_dt_keeps_velocity() {
        let mut j = Joint::at(0.0);
        j.record(0.1, 0.1);
        j.record(0.3, 0.0);
        assert_eq!(j.position, 0.3);
        assert_eq!(j.last_position, 0.1);
        assert_relative_eq!(j.velocity, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn link_length() {
        assert_eq!(Link::new(0.2).length(), 0.2);
        assert_eq!(Link::default().length(), 0.0);
    }
}
