//! Denavit-Hartenberg records and chain forward kinematics.
//!
//! Each record describes the transform from joint frame `i-1` to frame `i`:
//!
//! ```text
//! T_i = Rz(theta) · Tz(d) · Tx(r) · Rx(alpha)
//! ```

use std::collections::HashMap;

use nalgebra::{Isometry3, Translation3, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

use hexapod_core::JacobianError;

/// One link of a serial revolute chain.
///
/// `theta` doubles as the joint variable at which Jacobians are evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DhParameters {
    /// Offset along the previous Z axis (m).
    pub d: f64,
    /// Length along the rotated X axis (m).
    pub r: f64,
    /// Rotation about the previous Z axis (rad).
    pub theta: f64,
    /// Twist about the rotated X axis (rad).
    pub alpha: f64,
}

impl DhParameters {
    pub const fn new(d: f64, r: f64, theta: f64, alpha: f64) -> Self {
        Self { d, r, theta, alpha }
    }

    /// Read a record from a string-keyed map with keys `d`, `r`, `theta`,
    /// `alpha`. Extra keys are ignored.
    pub fn from_map(joint: usize, map: &HashMap<String, f64>) -> Result<Self, JacobianError> {
        let field = |name: &'static str| {
            map.get(name)
                .copied()
                .ok_or(JacobianError::MissingParameter { joint, field: name })
        };
        Ok(Self {
            d: field("d")?,
            r: field("r")?,
            theta: field("theta")?,
            alpha: field("alpha")?,
        })
    }

    /// Homogeneous transform from the previous joint frame to this one.
    pub fn transform(&self) -> Isometry3<f64> {
        let (sin_t, cos_t) = self.theta.sin_cos();
        let rotation = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), self.theta)
            * UnitQuaternion::from_axis_angle(&Vector3::x_axis(), self.alpha);
        Isometry3::from_parts(
            Translation3::new(self.r * cos_t, self.r * sin_t, self.d),
            rotation,
        )
    }
}

impl From<[f64; 4]> for DhParameters {
    /// `[d, r, theta, alpha]`
    fn from([d, r, theta, alpha]: [f64; 4]) -> Self {
        Self::new(d, r, theta, alpha)
    }
}

/// Origin and joint axis of one chain frame, expressed in the base frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointFrame {
    pub origin: Vector3<f64>,
    pub z_axis: Vector3<f64>,
}

impl JointFrame {
    fn from_pose(pose: &Isometry3<f64>) -> Self {
        Self {
            origin: pose.translation.vector,
            z_axis: pose.rotation * Vector3::z(),
        }
    }
}

/// Base-to-end-effector transform of the chain.
pub fn forward_kinematics(chain: &[DhParameters]) -> Isometry3<f64> {
    chain
        .iter()
        .fold(Isometry3::identity(), |pose, link| pose * link.transform())
}

/// Frames `0..=n` of an `n`-link chain. Frame 0 is the base.
pub fn joint_frames(chain: &[DhParameters]) -> Vec<JointFrame> {
    let mut frames = Vec::with_capacity(chain.len() + 1);
    let mut pose = Isometry3::identity();
    frames.push(JointFrame::from_pose(&pose));
    for link in chain {
        pose *= link.transform();
        frames.push(JointFrame::from_pose(&pose));
    }
    frames
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    fn map(entries: &[(&str, f64)]) -> HashMap<String, f64> {
        entries.iter().map(|(k, v)| ((*k).to_string(), *v)).collect()
    }

    #[test]
    fn single_link_translation() {
        let link = DhParameters::new(0.2, 0.5, FRAC_PI_2, 0.3);
        let t = link.transform().translation.vector;
        assert_relative_eq!(t, Vector3::new(0.0, 0.5, 0.2), epsilon = 1e-12);
    }

    #[test]
    fn twist_tilts_next_axis() {
        let frames = joint_frames(&[DhParameters::new(0.0, 1.0, 0.0, FRAC_PI_2)]);
        assert_eq!(frames.len(), 2);
        assert_relative_eq!(frames[0].z_axis, Vector3::z(), epsilon = 1e-12);
        // Rx(pi/2) takes +Z onto -Y.
        assert_relative_eq!(frames[1].z_axis, -Vector3::y(), epsilon = 1e-12);
    }

    #[test]
    fn empty_chain_is_identity() {
        assert_eq!(forward_kinematics(&[]), Isometry3::identity());
        assert_eq!(joint_frames(&[]).len(), 1);
    }

    #[test]
    fn planar_two_link_reach() {
        let chain = [
            DhParameters::new(0.0, 1.0, FRAC_PI_2, 0.0),
            DhParameters::new(0.0, 0.5, -FRAC_PI_2, 0.0),
        ];
        let end = forward_kinematics(&chain).translation.vector;
        assert_relative_eq!(end, Vector3::new(0.5, 1.0, 0.0), epsilon = 1e-12);
        let frames = joint_frames(&chain);
        assert_relative_eq!(frames[2].origin, end, epsilon = 1e-12);
    }

    #[test]
    fn from_map_reads_all_fields() {
        let m = map(&[("d", 0.1), ("r", 0.2), ("theta", 0.3), ("alpha", 0.4), ("note", 9.0)]);
        let p = DhParameters::from_map(0, &m).unwrap();
        assert_eq!(p, DhParameters::new(0.1, 0.2, 0.3, 0.4));
    }

    #[test]
    fn from_map_reports_missing_field() {
        let m = map(&[("d", 0.1), ("r", 0.2), ("theta", 0.3)]);
        let err = DhParameters::from_map(2, &m).unwrap_err();
        assert_eq!(
            err,
            JacobianError::MissingParameter {
                joint: 2,
                field: "alpha"
            }
        );
    }

    #[test]
    fn from_array_order() {
        let p = DhParameters::from([1.0, 2.0, 3.0, 4.0]);
        assert_eq!(p.d, 1.0);
        assert_eq!(p.alpha, 4.0);
    }
}
