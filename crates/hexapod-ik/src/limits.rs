//! Body-wide joint limits and the diagnostics produced when enforcing them.

use serde::{Deserialize, Serialize};

use hexapod_core::{
    JointAngles, JointKind, JointRange, LEG_POSITION_COUNT, LegId, LegPosition, LimitsConfig,
};

/// A joint was pushed outside its limit and saturated.
///
/// This is an expected operating condition (a leg at full extension or
/// flexion), reported for observability and never treated as an error.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LimitExceeded {
    pub leg: LegId,
    pub joint: JointKind,
    /// Angle before clamping (rad).
    pub requested: f64,
    /// Limit the joint was clamped to (rad).
    pub clamped: f64,
}

/// Angle ranges for the three joints of one leg.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointLimits {
    pub yaw: JointRange,
    pub lift: JointRange,
    pub knee: JointRange,
}

impl JointLimits {
    pub const fn range(&self, joint: JointKind) -> JointRange {
        match joint {
            JointKind::Yaw => self.yaw,
            JointKind::Lift => self.lift,
            JointKind::Knee => self.knee,
        }
    }

    /// Clamp each joint independently, pushing one event per saturated joint.
    pub fn clamp(&self, leg: LegId, angles: &mut JointAngles, events: &mut Vec<LimitExceeded>) {
        for joint in JointKind::ALL {
            let requested = angles.get(joint);
            if let Some(clamped) = self.range(joint).saturate(requested) {
                angles.set(joint, clamped);
                events.push(LimitExceeded {
                    leg,
                    joint,
                    requested,
                    clamped,
                });
            }
        }
    }
}

/// Limits shared by the whole body, indexed by leg-position.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyLimits {
    stance_yaw: [f64; LEG_POSITION_COUNT],
    yaw_limit: [f64; LEG_POSITION_COUNT],
    knee: JointRange,
    hip_lift: JointRange,
    joint_max_angular_speed: [f64; 3],
}

impl BodyLimits {
    pub fn stance_yaw(&self, position: LegPosition) -> f64 {
        self.stance_yaw[position.index()]
    }

    /// Half-width of the yaw sweep around the stance yaw.
    pub fn yaw_limit(&self, position: LegPosition) -> f64 {
        self.yaw_limit[position.index()]
    }

    pub const fn knee(&self) -> JointRange {
        self.knee
    }

    pub const fn hip_lift(&self) -> JointRange {
        self.hip_lift
    }

    /// Max angular speed of a joint (rad/s).
    pub const fn max_angular_speed(&self, joint: JointKind) -> f64 {
        self.joint_max_angular_speed[joint.index()]
    }

    /// Joint ranges for every leg at `position`.
    pub fn for_position(&self, position: LegPosition) -> JointLimits {
        JointLimits {
            yaw: JointRange::around(self.stance_yaw(position), self.yaw_limit(position)),
            lift: self.hip_lift,
            knee: self.knee,
        }
    }
}

impl From<&LimitsConfig> for BodyLimits {
    fn from(config: &LimitsConfig) -> Self {
        Self {
            stance_yaw: config.stance_yaw,
            yaw_limit: config.yaw_limit,
            knee: config.knee,
            hip_lift: config.hip_lift,
            joint_max_angular_speed: config.joint_max_angular_speed,
        }
    }
}
