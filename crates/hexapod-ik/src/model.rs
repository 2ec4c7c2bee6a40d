//! The six-legged body: a fixed `[position][side]` array of legs plus
//! body-wide limits.

use nalgebra::{Isometry3, Point3, UnitQuaternion, Vector3};
use tracing::{debug, info};

use hexapod_core::{
    HexapodError, JointAngles, KinematicsError, LEG_COUNT, LegId, LegPosition, LegState,
    ModelConfig, PerLeg, Side,
};

use crate::frames::{lift_axis_rotation, link_transform, mirror_point, yaw_rotation};
use crate::leg::{Leg, LegGeometry};
use crate::limits::{BodyLimits, LimitExceeded};

/// Any joint position at or beyond this squared distance from the body
/// origin is treated as a diverged computation.
pub const RUNAWAY_SQUARED_NORM: f64 = 1000.0;

/// Positions emitted per leg by [`Model::joint_positions`]: root, hip, knee, tip.
pub const JOINT_POSITIONS_PER_LEG: usize = 4;

/// Hexapod kinematic model.
#[derive(Debug, Clone)]
pub struct Model {
    legs: PerLeg<Leg>,
    limits: BodyLimits,
    current_pose: Isometry3<f64>,
}

impl Model {
    /// Build all six legs from a validated configuration, each initialised at
    /// zero angles and marked [`LegState::Walking`].
    pub fn new(config: &ModelConfig) -> Result<Self, HexapodError> {
        config.validate()?;
        let table = config.leg_table()?;
        let limits = BodyLimits::from(&config.limits);

        let build = |position: LegPosition, side: Side| -> Result<Leg, KinematicsError> {
            let id = LegId::new(position, side);
            let geometry = LegGeometry::from(table[position.index()][side.index()]);
            let mut leg = Leg::new(id, side.mirror(), geometry, limits.knee(), config.ik)?;
            leg.set_state(LegState::Walking);
            Ok(leg)
        };
        let row = |position| -> Result<[Leg; 2], KinematicsError> {
            Ok([build(position, Side::Left)?, build(position, Side::Right)?])
        };
        let legs = [
            row(LegPosition::Front)?,
            row(LegPosition::Middle)?,
            row(LegPosition::Rear)?,
        ];

        info!(legs = LEG_COUNT, "hexapod model constructed");
        Ok(Self {
            legs,
            limits,
            current_pose: Isometry3::identity(),
        })
    }

    pub const fn leg_count(&self) -> usize {
        LEG_COUNT
    }

    pub fn leg(&self, id: LegId) -> &Leg {
        &self.legs[id.position.index()][id.side.index()]
    }

    pub fn leg_mut(&mut self, id: LegId) -> &mut Leg {
        &mut self.legs[id.position.index()][id.side.index()]
    }

    /// Look up a leg by name, e.g. `"front_left"`.
    pub fn leg_by_name(&self, name: &str) -> Option<&Leg> {
        LegId::from_name(name).map(|id| self.leg(id))
    }

    /// All legs in canonical order (side-major, then front to rear).
    pub fn legs(&self) -> impl Iterator<Item = &Leg> {
        LegId::ALL.into_iter().map(|id| self.leg(id))
    }

    pub const fn limits(&self) -> &BodyLimits {
        &self.limits
    }

    pub const fn current_pose(&self) -> &Isometry3<f64> {
        &self.current_pose
    }

    pub fn set_current_pose(&mut self, pose: Isometry3<f64>) {
        self.current_pose = pose;
    }

    /// Re-initialise one leg at the given joint angles.
    pub fn set_leg_start_angles(&mut self, id: LegId, angles: JointAngles) {
        self.leg_mut(id).init(angles);
    }

    /// World-frame root, hip, knee and tip positions of every leg.
    ///
    /// Legs are visited side-major, front to rear, giving
    /// `LEG_COUNT * JOINT_POSITIONS_PER_LEG` points.
    ///
    /// # Errors
    ///
    /// Returns [`KinematicsError::RunawayJointPosition`] if any point lands
    /// implausibly far from the origin.
    pub fn joint_positions(
        &self,
        world_pose: &Isometry3<f64>,
    ) -> Result<Vec<Point3<f64>>, KinematicsError> {
        let mut positions = Vec::with_capacity(LEG_COUNT * JOINT_POSITIONS_PER_LEG);
        for leg in self.legs() {
            let g = leg.geometry();
            let angles = leg.angles();
            let chain = [
                link_transform(&g.root_offset, yaw_rotation(angles.yaw)),
                link_transform(&g.hip_offset, lift_axis_rotation(-angles.lift)),
                link_transform(&g.knee_offset, lift_axis_rotation(angles.knee)),
                link_transform(&g.tip_offset, UnitQuaternion::identity()),
            ];

            let mut transform = Isometry3::identity();
            for link in chain {
                transform *= link;
                let local = mirror_point(Point3::from(transform.translation.vector), leg.mirror());
                let world = world_pose * local;
                let squared_norm = world.coords.norm_squared();
                if !(squared_norm < RUNAWAY_SQUARED_NORM) {
                    return Err(KinematicsError::RunawayJointPosition {
                        leg: leg.id(),
                        squared_norm,
                    });
                }
                positions.push(world);
            }
        }
        Ok(positions)
    }

    /// Clamp every leg into the body limits.
    ///
    /// Returns one [`LimitExceeded`] per saturated joint. Clamping is expected
    /// at the edge of the workspace and never aborts the caller.
    pub fn clamp_to_limits(&mut self) -> Vec<LimitExceeded> {
        let mut events = Vec::new();
        for id in LegId::ALL {
            let joint_limits = self.limits.for_position(id.position);
            self.leg_mut(id).clamp_to(&joint_limits, &mut events);
        }
        for event in &events {
            debug!(
                leg = %event.leg,
                joint = ?event.joint,
                requested = event.requested,
                clamped = event.clamped,
                "joint limit exceeded"
            );
        }
        events
    }

    /// Drive every leg to its target tip position, offset vertically by
    /// `delta_z`, then clamp to limits.
    ///
    /// All six targets are solved before any leg moves, so a target that fails
    /// validation leaves every leg as it was. Stance positions are left
    /// untouched.
    pub fn update_local(
        &mut self,
        targets: &PerLeg<Vector3<f64>>,
        delta_z: &PerLeg<f64>,
    ) -> Result<Vec<LimitExceeded>, KinematicsError> {
        let mut solved = Vec::with_capacity(LEG_COUNT);
        for id in LegId::ALL {
            let (p, s) = (id.position.index(), id.side.index());
            let target = targets[p][s] + Vector3::z() * delta_z[p][s];
            solved.push((id, target, self.leg(id).solve_local_ik(&target)?));
        }
        for (id, target, solution) in &solved {
            self.leg_mut(*id).apply_solution(solution, target, false);
        }
        Ok(self.clamp_to_limits())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use hexapod_core::MirrorDir;
    use hexapod_test_utils::fixtures::sample_model_config;
    use nalgebra::Translation3;

    fn model() -> Model {
        Model::new(&sample_model_config()).unwrap()
    }

    #[test]
    fn construction_builds_six_walking_legs() {
        let m = model();
        assert_eq!(m.leg_count(), 6);
        assert_eq!(m.legs().count(), 6);
        for (i, leg) in m.legs().enumerate() {
            assert_eq!(leg.id().index(), i);
            assert_eq!(leg.state(), LegState::Walking);
            assert_eq!(leg.angles(), JointAngles::default());
        }
    }

    #[test]
    fn mirror_assigned_by_side() {
        let m = model();
        for leg in m.legs() {
            let expected = match leg.id().side {
                Side::Left => MirrorDir::Mirrored,
                Side::Right => MirrorDir::Identity,
            };
            assert_eq!(leg.mirror(), expected);
        }
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = sample_model_config();
        config.legs.pop();
        assert!(matches!(Model::new(&config), Err(HexapodError::Config(_))));
    }

    #[test]
    fn degenerate_reach_is_rejected() {
        let mut config = sample_model_config();
        config.limits.knee = hexapod_core::JointRange::new(1.0, 1.0);
        assert!(matches!(
            Model::new(&config),
            Err(HexapodError::Kinematics(KinematicsError::DegenerateReach { .. }))
        ));
    }

    #[test]
    fn leg_by_name_lookup() {
        let m = model();
        let leg = m.leg_by_name("rear_right").unwrap();
        assert_eq!(leg.id(), LegId::new(LegPosition::Rear, Side::Right));
        assert!(m.leg_by_name("rear_centre").is_none());
    }

    #[test]
    fn joint_positions_order_and_tip_match_fk() {
        let m = model();
        let positions = m.joint_positions(&Isometry3::identity()).unwrap();
        assert_eq!(positions.len(), 24);
        for (i, leg) in m.legs().enumerate() {
            let base = i * JOINT_POSITIONS_PER_LEG;
            let root = positions[base];
            let tip = positions[base + 3];
            let mut expected_root = leg.geometry().root_offset;
            expected_root.x *= leg.mirror().factor();
            assert_relative_eq!(root.coords, expected_root, epsilon = 1e-12);
            assert_relative_eq!(tip.coords, leg.local_tip_position(), epsilon = 1e-12);
        }
    }

    #[test]
    fn joint_positions_follow_solved_angles() {
        let mut m = model();
        let id = LegId::new(LegPosition::Middle, Side::Left);
        let target = m.leg(id).local_tip_position() + Vector3::new(0.02, 0.03, -0.08);
        m.leg_mut(id).apply_local_ik(&target, false).unwrap();
        let positions = m.joint_positions(&Isometry3::identity()).unwrap();
        let tip = positions[id.index() * JOINT_POSITIONS_PER_LEG + 3];
        assert_relative_eq!(tip.coords, m.leg(id).local_tip_position(), epsilon = 1e-12);
    }

    #[test]
    fn joint_positions_apply_world_pose() {
        let m = model();
        let pose = Isometry3::from_parts(
            Translation3::new(1.0, -2.0, 0.5),
            UnitQuaternion::from_axis_angle(&Vector3::z_axis(), 0.3),
        );
        let local = m.joint_positions(&Isometry3::identity()).unwrap();
        let world = m.joint_positions(&pose).unwrap();
        for (l, w) in local.iter().zip(&world) {
            assert_relative_eq!(pose * l, *w, epsilon = 1e-12);
        }
    }

    #[test]
    fn runaway_joint_position_is_fatal() {
        let m = model();
        let far = Isometry3::translation(40.0, 0.0, 0.0);
        let err = m.joint_positions(&far).unwrap_err();
        assert!(matches!(err, KinematicsError::RunawayJointPosition { .. }));
    }

    #[test]
    fn clamp_to_limits_reports_and_is_idempotent() {
        let mut m = model();
        // Zero start angles sit outside some yaw and knee limits.
        m.clamp_to_limits();

        let id = LegId::new(LegPosition::Front, Side::Right);
        m.leg_mut(id).apply_fk(JointAngles::new(3.0, -3.0, 5.0), false);
        let events = m.clamp_to_limits();
        assert_eq!(events.len(), 3);
        assert!(events.iter().all(|e| e.leg == id));

        let limits = m.limits().for_position(LegPosition::Front);
        let angles = m.leg(id).angles();
        assert_eq!(angles.yaw, limits.yaw.max);
        assert_eq!(angles.lift, limits.lift.min);
        assert_eq!(angles.knee, limits.knee.max);
        assert_relative_eq!(
            m.leg(id).local_tip_position(),
            m.leg(id).calculate_fk(angles),
            epsilon = 1e-12
        );

        let snapshot: Vec<_> = m.legs().map(Leg::angles).collect();
        assert!(m.clamp_to_limits().is_empty());
        let again: Vec<_> = m.legs().map(Leg::angles).collect();
        assert_eq!(snapshot, again);
    }

    #[test]
    fn set_leg_start_angles_reinitialises_one_leg() {
        let mut m = model();
        let id = LegId::new(LegPosition::Rear, Side::Left);
        let start = JointAngles::new(-0.7, 0.3, 1.2);
        m.set_leg_start_angles(id, start);
        assert_eq!(m.leg(id).angles(), start);
        assert_eq!(m.leg(id).stance_tip_position(), m.leg(id).calculate_fk(start));
        assert_eq!(
            m.leg(LegId::new(LegPosition::Rear, Side::Right)).angles(),
            JointAngles::default()
        );
    }

    #[test]
    fn current_pose_round_trip() {
        let mut m = model();
        assert_eq!(*m.current_pose(), Isometry3::identity());
        let pose = Isometry3::translation(0.0, 0.0, 0.12);
        m.set_current_pose(pose);
        assert_eq!(*m.current_pose(), pose);
    }

    #[test]
    fn update_local_moves_every_leg() {
        let mut m = model();
        let mut targets = [[Vector3::zeros(); 2]; 3];
        let mut expected = Vec::new();
        for id in LegId::ALL {
            let angles = JointAngles::new(m.limits().stance_yaw(id.position), 0.3, 1.2);
            targets[id.position.index()][id.side.index()] =
                m.leg(id).calculate_fk(angles) + Vector3::new(0.0, 0.0, 0.1);
            expected.push(angles);
        }

        let events = m.update_local(&targets, &[[-0.1; 2]; 3]).unwrap();
        assert!(events.is_empty());
        for (leg, angles) in m.legs().zip(&expected) {
            assert_relative_eq!(leg.angles().yaw, angles.yaw, epsilon = 1e-9);
            assert_relative_eq!(leg.angles().lift, angles.lift, epsilon = 1e-9);
            assert_relative_eq!(leg.angles().knee, angles.knee, epsilon = 1e-9);
            assert_ne!(leg.stance_tip_position(), leg.local_tip_position());
        }
    }

    #[test]
    fn update_local_failure_leaves_every_leg_unchanged() {
        let mut config = sample_model_config();
        // Rear right is solved last in canonical order.
        let rear_right = LegId::new(LegPosition::Rear, Side::Right);
        config.legs[rear_right.index()].hip_offset = [0.05, 0.04, 0.0];
        let mut m = Model::new(&config).unwrap();
        m.clamp_to_limits();
        let before: Vec<_> = m.legs().map(|leg| (leg.angles(), leg.local_tip_position())).collect();

        let targets = [[Vector3::new(0.0, -0.35, -0.05); 2]; 3];
        let err = m.update_local(&targets, &[[0.0; 2]; 3]).unwrap_err();
        assert!(matches!(
            err,
            KinematicsError::GeometryViolation { leg, .. } if leg == rear_right
        ));

        let after: Vec<_> = m.legs().map(|leg| (leg.angles(), leg.local_tip_position())).collect();
        assert_eq!(before, after);
        assert!(m.clamp_to_limits().is_empty());
    }

    #[test]
    fn update_local_stops_at_geometry_violation() {
        let mut config = sample_model_config();
        config.legs[0].hip_offset = [0.05, 0.04, 0.0];
        let mut m = Model::new(&config).unwrap();
        let targets = [[Vector3::new(0.3, 0.0, -0.1); 2]; 3];
        let err = m.update_local(&targets, &[[0.0; 2]; 3]).unwrap_err();
        assert!(matches!(err, KinematicsError::GeometryViolation { .. }));
    }
}
