//! Rigid-transform helpers shared by leg FK and the model's joint-position query.
//!
//! Legs rotate about two axes only: hip yaw about body Z, and lift/knee about
//! the leg-local Y axis.

use nalgebra::{Isometry3, Point3, Translation3, UnitQuaternion, Vector3};

use hexapod_core::MirrorDir;

/// Rotation about the vertical (yaw) axis.
pub fn yaw_rotation(angle: f64) -> UnitQuaternion<f64> {
    UnitQuaternion::from_axis_angle(&Vector3::z_axis(), angle)
}

/// Rotation about the leg's lift axis (local Y).
pub fn lift_axis_rotation(angle: f64) -> UnitQuaternion<f64> {
    UnitQuaternion::from_axis_angle(&Vector3::y_axis(), angle)
}

/// Link transform: translate by `offset`, then rotate by `rotation`.
pub fn link_transform(offset: &Vector3<f64>, rotation: UnitQuaternion<f64>) -> Isometry3<f64> {
    Isometry3::from_parts(Translation3::from(*offset), rotation)
}

/// Reflect a leg-local position across the body's symmetry plane.
pub fn mirror_point(point: Point3<f64>, mirror: MirrorDir) -> Point3<f64> {
    Point3::new(point.x * mirror.factor(), point.y, point.z)
}
