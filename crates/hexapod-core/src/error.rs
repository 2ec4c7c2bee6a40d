use thiserror::Error;

use crate::types::{LegId, LegPosition, Side};

/// Top-level error type for the hexapod kinematics core.
#[derive(Debug, Error)]
pub enum HexapodError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Kinematics error: {0}")]
    Kinematics(#[from] KinematicsError),

    #[error("Jacobian error: {0}")]
    Jacobian(#[from] JacobianError),
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Missing leg geometry for {position:?} {side:?}")]
    MissingLeg { position: LegPosition, side: Side },

    #[error("Duplicate leg geometry for {position:?} {side:?}")]
    DuplicateLeg { position: LegPosition, side: Side },

    #[error("Invalid range for {field}: min {min} > max {max}")]
    InvalidRange { field: String, min: f64, max: f64 },

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

/// Leg geometry and solve errors.
///
/// Copy so it can be returned from the per-cycle IK path without allocation.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum KinematicsError {
    #[error("{leg}: target is {residual:.4} off the leg plane (tolerance {tolerance})")]
    GeometryViolation {
        leg: LegId,
        residual: f64,
        tolerance: f64,
    },

    #[error("{leg}: reachable leg length range [{min}, {max}] is empty")]
    DegenerateReach { leg: LegId, min: f64, max: f64 },

    #[error("{leg}: joint position diverged (squared norm {squared_norm})")]
    RunawayJointPosition { leg: LegId, squared_norm: f64 },
}

/// Errors from the DH Jacobian generator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JacobianError {
    #[error("DH record {joint} is missing parameter `{field}`")]
    MissingParameter { joint: usize, field: &'static str },

    #[error("Unsupported chain length: {0} (expected 1..=6)")]
    UnsupportedArity(usize),

    #[error("Analytic Jacobian for {dof} DOF is not implemented")]
    Unimplemented { dof: usize },
}
