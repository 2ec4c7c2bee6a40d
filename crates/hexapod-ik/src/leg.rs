//! Geometry and closed-form kinematics of one 3-DOF leg.
//!
//! A [`Leg`] is a yaw joint at the root, a lift joint at the hip and a knee.
//! FK composes four rigid transforms from the tip back to the body:
//!
//! ```text
//! tip ──Ry(knee)+knee──► knee ──Ry(-lift)+hip──► hip ──Rz(yaw)+root──► body
//! ```
//!
//! IK aligns the target with the yaw plane and solves the remaining
//! femur/tibia triangle with the law of cosines.

use std::f64::consts::PI;

use nalgebra::Vector3;
use tracing::{debug, warn};

use hexapod_core::{
    IkConfig, JointAngles, JointKind, JointRange, KinematicsError, LegConfig, LegId, LegState,
    MirrorDir,
};

use crate::frames::{lift_axis_rotation, yaw_rotation};
use crate::joint::{Joint, Link};
use crate::limits::{JointLimits, LimitExceeded};

// ---------------------------------------------------------------------------
// LegGeometry
// ---------------------------------------------------------------------------

/// Fixed offsets of a leg, each expressed in its parent frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegGeometry {
    /// Body centre to yaw joint.
    pub root_offset: Vector3<f64>,
    /// Yaw joint to lift joint.
    pub hip_offset: Vector3<f64>,
    /// Lift joint to knee.
    pub knee_offset: Vector3<f64>,
    /// Knee to foot tip.
    pub tip_offset: Vector3<f64>,
}

impl From<&LegConfig> for LegGeometry {
    fn from(config: &LegConfig) -> Self {
        Self {
            root_offset: Vector3::from(config.root_offset),
            hip_offset: Vector3::from(config.hip_offset),
            knee_offset: Vector3::from(config.knee_offset),
            tip_offset: Vector3::from(config.tip_offset),
        }
    }
}

// ---------------------------------------------------------------------------
// LegDimensions
// ---------------------------------------------------------------------------

/// Scalars derived once from a leg's geometry and the body's knee limits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegDimensions {
    pub hip_length: f64,
    pub femur_length: f64,
    /// Elevation of the knee offset in the hip's X-Z plane.
    pub femur_angle_offset: f64,
    pub tibia_length: f64,
    /// Elevation of the tip offset in the knee's X-Z plane.
    pub tibia_angle_offset: f64,
    /// Hip-to-tip distance at the largest knee bend.
    pub min_leg_length: f64,
    /// Hip-to-tip distance at the smallest knee bend.
    pub max_leg_length: f64,
}

impl LegDimensions {
    pub fn derive(geometry: &LegGeometry, knee_bend: JointRange) -> Self {
        let femur = geometry.knee_offset;
        let tibia = geometry.tip_offset;
        let femur_length = femur.norm();
        let tibia_length = tibia.norm();

        // Law of cosines with the interior knee angle (pi - bend). Bends below
        // zero are floored so the interior angle never exceeds pi.
        let leg_length = |bend: f64| {
            let interior = PI - bend.max(0.0);
            (femur_length.powi(2) + tibia_length.powi(2)
                - 2.0 * femur_length * tibia_length * interior.cos())
            .sqrt()
        };

        Self {
            hip_length: geometry.hip_offset.norm(),
            femur_length,
            femur_angle_offset: femur.z.atan2(femur.x),
            tibia_length,
            tibia_angle_offset: tibia.z.atan2(tibia.x),
            min_leg_length: leg_length(knee_bend.max),
            max_leg_length: leg_length(knee_bend.min),
        }
    }
}

// ---------------------------------------------------------------------------
// IkSolution
// ---------------------------------------------------------------------------

/// Result of the planar IK solve, before it is applied to a leg.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IkSolution {
    pub angles: JointAngles,
    /// Hip-to-target distance in the leg plane, as requested.
    pub requested_length: f64,
    /// Distance actually solved for, after clamping into the reachable range.
    pub solved_length: f64,
}

impl IkSolution {
    /// Whether the target was outside the reachable range and got saturated.
    pub fn length_clamped(&self) -> bool {
        self.requested_length != self.solved_length
    }
}

// ---------------------------------------------------------------------------
// Leg
// ---------------------------------------------------------------------------

/// One limb: fixed geometry plus its current joint angles.
#[derive(Debug, Clone)]
pub struct Leg {
    id: LegId,
    mirror: MirrorDir,
    geometry: LegGeometry,
    knee_bend: JointRange,
    ik: IkConfig,
    dimensions: LegDimensions,
    state: LegState,

    angles: JointAngles,
    local_tip_position: Vector3<f64>,
    stance_tip_position: Vector3<f64>,

    joints: [Joint; 3],
    /// Hip, femur, tibia.
    links: [Link; 3],
}

impl Leg {
    /// Build a leg and initialise it at zero joint angles.
    ///
    /// # Errors
    ///
    /// Returns [`KinematicsError::DegenerateReach`] when the knee limits leave
    /// no usable leg-length range for IK.
    pub fn new(
        id: LegId,
        mirror: MirrorDir,
        geometry: LegGeometry,
        knee_bend: JointRange,
        ik: IkConfig,
    ) -> Result<Self, KinematicsError> {
        let dimensions = LegDimensions::derive(&geometry, knee_bend);
        let usable = dimensions.max_leg_length - dimensions.min_leg_length;
        if !(usable > 2.0 * ik.length_margin) {
            return Err(KinematicsError::DegenerateReach {
                leg: id,
                min: dimensions.min_leg_length,
                max: dimensions.max_leg_length,
            });
        }

        let mut leg = Self {
            id,
            mirror,
            geometry,
            knee_bend,
            ik,
            dimensions,
            state: LegState::default(),
            angles: JointAngles::default(),
            local_tip_position: Vector3::zeros(),
            stance_tip_position: Vector3::zeros(),
            joints: [Joint::default(); 3],
            links: [Link::default(); 3],
        };
        leg.init(JointAngles::default());
        Ok(leg)
    }

    /// Derive link lengths and reach, seed the joint angles, and run FK to set
    /// both the local and stance tip positions.
    pub fn init(&mut self, angles: JointAngles) {
        self.dimensions = LegDimensions::derive(&self.geometry, self.knee_bend);
        let dims = &self.dimensions;
        self.links = [
            Link::new(dims.hip_length),
            Link::new(dims.femur_length),
            Link::new(dims.tibia_length),
        ];
        self.joints = JointKind::ALL.map(|joint| Joint::at(angles.get(joint)));
        debug!(
            leg = %self.id,
            femur = dims.femur_length,
            tibia = dims.tibia_length,
            min_leg_length = dims.min_leg_length,
            max_leg_length = dims.max_leg_length,
            "leg initialised"
        );
        self.apply_fk(angles, true);
    }

    /// Tip position, in the body frame, for the given joint angles.
    ///
    /// Does not touch the leg's state.
    pub fn calculate_fk(&self, angles: JointAngles) -> Vector3<f64> {
        let g = &self.geometry;
        let mut tip = g.tip_offset;
        tip = lift_axis_rotation(angles.knee) * tip + g.knee_offset;
        tip = lift_axis_rotation(-angles.lift) * tip + g.hip_offset;
        tip = yaw_rotation(angles.yaw) * tip + g.root_offset;
        tip.x *= self.mirror.factor();
        tip
    }

    /// Set the joint angles and recompute the local tip position.
    ///
    /// With `update_stance` the stance tip position is overwritten too.
    pub fn apply_fk(&mut self, angles: JointAngles, update_stance: bool) -> Vector3<f64> {
        self.angles = angles;
        self.refresh_tip(update_stance)
    }

    /// Solve for the joint angles that place the tip at `target` without
    /// changing the leg.
    ///
    /// Targets beyond the reachable leg length are pulled onto the nearest
    /// bound (less the configured margin) rather than failing.
    ///
    /// Lift and knee both have `femur_angle_offset` subtracted. For a femur
    /// along X that term is zero and the angles are the plain law-of-cosines
    /// results.
    ///
    /// # Errors
    ///
    /// Returns [`KinematicsError::GeometryViolation`] when the target does not
    /// lie in the leg's yaw plane within `plane_tolerance`.
    pub fn solve_local_ik(&self, target: &Vector3<f64>) -> Result<IkSolution, KinematicsError> {
        let mut local = *target;
        local.x *= self.mirror.factor();
        local -= self.geometry.root_offset;

        let yaw = local.y.atan2(local.x);
        let mut planar = yaw_rotation(-yaw) * local - self.geometry.hip_offset;
        let residual = planar.y.abs();
        if !(residual <= self.ik.plane_tolerance) {
            return Err(KinematicsError::GeometryViolation {
                leg: self.id,
                residual,
                tolerance: self.ik.plane_tolerance,
            });
        }
        planar.y = 0.0;

        let requested_length = planar.norm();
        let target_angle_offset = planar.z.atan2(planar.x);

        let dims = &self.dimensions;
        let margin = self.ik.length_margin;
        let length = requested_length.clamp(
            dims.min_leg_length + margin,
            dims.max_leg_length - margin,
        );

        let femur = dims.femur_length;
        let tibia = dims.tibia_length;
        let hip_interior = ((length.powi(2) + femur.powi(2) - tibia.powi(2))
            / (2.0 * length * femur))
            .acos();
        let knee_bend = (-(femur.powi(2) + tibia.powi(2) - length.powi(2))
            / (2.0 * femur * tibia))
            .acos();

        // The femur offset rotates with the lift joint and the knee frame
        // rotates with the femur, so it is removed from both angles.
        let angles = JointAngles::new(
            yaw,
            target_angle_offset + hip_interior - dims.femur_angle_offset,
            dims.tibia_angle_offset + knee_bend - dims.femur_angle_offset,
        );

        Ok(IkSolution {
            angles,
            requested_length,
            solved_length: length,
        })
    }

    /// Solve IK for `target` and apply the result.
    ///
    /// The FK of the solved angles is authoritative: the cached tip position
    /// (and the stance position with `update_stance`) is recomputed from it.
    pub fn apply_local_ik(
        &mut self,
        target: &Vector3<f64>,
        update_stance: bool,
    ) -> Result<JointAngles, KinematicsError> {
        let solution = self.solve_local_ik(target)?;
        self.apply_solution(&solution, target, update_stance);
        Ok(solution.angles)
    }

    /// Apply a solution from [`Leg::solve_local_ik`] for `target`.
    ///
    /// Warns when a reachable target is missed by more than
    /// `residual_warning`.
    pub fn apply_solution(
        &mut self,
        solution: &IkSolution,
        target: &Vector3<f64>,
        update_stance: bool,
    ) -> Vector3<f64> {
        let achieved = self.apply_fk(solution.angles, update_stance);
        if !solution.length_clamped() {
            let residual = (achieved - target).norm();
            if residual > self.ik.residual_warning {
                warn!(
                    leg = %self.id,
                    residual,
                    "IK achieved tip differs from a reachable target"
                );
            }
        }
        achieved
    }

    /// Clamp the current angles into `limits`, appending one diagnostic per
    /// saturated joint. The local tip is refreshed if anything moved.
    pub fn clamp_to(&mut self, limits: &JointLimits, events: &mut Vec<LimitExceeded>) {
        let before = events.len();
        limits.clamp(self.id, &mut self.angles, events);
        if events.len() > before {
            self.refresh_tip(false);
        }
    }

    /// Copy the current angles into the per-axis joint records.
    pub fn record_joint_state(&mut self, dt: f64) {
        for joint in JointKind::ALL {
            self.joints[joint.index()].record(self.angles.get(joint), dt);
        }
    }

    fn refresh_tip(&mut self, update_stance: bool) -> Vector3<f64> {
        self.local_tip_position = self.calculate_fk(self.angles);
        if update_stance {
            self.stance_tip_position = self.local_tip_position;
        }
        self.local_tip_position
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub const fn id(&self) -> LegId {
        self.id
    }

    pub const fn mirror(&self) -> MirrorDir {
        self.mirror
    }

    pub const fn geometry(&self) -> &LegGeometry {
        &self.geometry
    }

    pub const fn dimensions(&self) -> &LegDimensions {
        &self.dimensions
    }

    pub const fn min_leg_length(&self) -> f64 {
        self.dimensions.min_leg_length
    }

    pub const fn max_leg_length(&self) -> f64 {
        self.dimensions.max_leg_length
    }

    pub const fn angles(&self) -> JointAngles {
        self.angles
    }

    pub const fn local_tip_position(&self) -> Vector3<f64> {
        self.local_tip_position
    }

    pub const fn stance_tip_position(&self) -> Vector3<f64> {
        self.stance_tip_position
    }

    pub const fn state(&self) -> LegState {
        self.state
    }

    pub fn set_state(&mut self, state: LegState) {
        self.state = state;
    }

    pub const fn ik_config(&self) -> &IkConfig {
        &self.ik
    }

    pub const fn joints(&self) -> &[Joint; 3] {
        &self.joints
    }

    pub const fn joint(&self, joint: JointKind) -> &Joint {
        &self.joints[joint.index()]
    }

    pub const fn links(&self) -> &[Link; 3] {
        &self.links
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
