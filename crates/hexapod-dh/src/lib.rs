//! Denavit-Hartenberg chains and their positional Jacobians.
//!
//! ```text
//! [DhParameters; N] ──► joint_frames ──► jacobian ──► 3×N matrix
//! ```
//!
//! Everything here is a pure function of its inputs, so independent chains
//! can be evaluated from any number of threads.

pub mod jacobian;
pub mod params;

pub use jacobian::{MAX_ANALYTIC_DOF, MAX_DOF, create_jacobian, create_jacobian_from_maps, jacobian};
pub use params::{DhParameters, JointFrame, forward_kinematics, joint_frames};
