//! Analytic positional Jacobian of a revolute DH chain.
//!
//! For joint `i` (rotating about the Z axis of frame `i-1`) the column is
//!
//! ```text
//! J_i = z_{i-1} × (p_n - p_{i-1})
//! ```
//!
//! which is the exact derivative of the end-effector position with respect to
//! `theta_i`. Chains of one to five joints are supported. A six-joint chain is
//! reported as [`JacobianError::Unimplemented`].

use std::collections::HashMap;

use nalgebra::{DMatrix, SMatrix, Vector3};

use hexapod_core::JacobianError;

use crate::params::{DhParameters, joint_frames};

/// Longest chain with an analytic Jacobian.
pub const MAX_ANALYTIC_DOF: usize = 5;

/// Longest chain accepted by the generator's signature.
pub const MAX_DOF: usize = 6;

fn check_arity(dof: usize) -> Result<(), JacobianError> {
    match dof {
        1..=MAX_ANALYTIC_DOF => Ok(()),
        MAX_DOF => Err(JacobianError::Unimplemented { dof }),
        _ => Err(JacobianError::UnsupportedArity(dof)),
    }
}

fn columns(chain: &[DhParameters]) -> Vec<Vector3<f64>> {
    let frames = joint_frames(chain);
    let end = frames[chain.len()].origin;
    frames[..chain.len()]
        .iter()
        .map(|frame| frame.z_axis.cross(&(end - frame.origin)))
        .collect()
}

/// 3×N Jacobian of a fixed-arity chain, evaluated at each record's `theta`.
pub fn jacobian<const N: usize>(
    chain: &[DhParameters; N],
) -> Result<SMatrix<f64, 3, N>, JacobianError> {
    check_arity(N)?;
    let cols = columns(chain);
    Ok(SMatrix::<f64, 3, N>::from_fn(|row, col| cols[col][row]))
}

/// 3×n Jacobian of a chain whose length is only known at runtime.
pub fn create_jacobian(chain: &[DhParameters]) -> Result<DMatrix<f64>, JacobianError> {
    check_arity(chain.len())?;
    let cols = columns(chain);
    Ok(DMatrix::from_fn(3, chain.len(), |row, col| cols[col][row]))
}

/// Like [`create_jacobian`] but reads each record from a map keyed by
/// `d`, `r`, `theta`, `alpha`.
pub fn create_jacobian_from_maps(
    records: &[HashMap<String, f64>],
) -> Result<DMatrix<f64>, JacobianError> {
    let chain = records
        .iter()
        .enumerate()
        .map(|(joint, map)| DhParameters::from_map(joint, map))
        .collect::<Result<Vec<_>, _>>()?;
    create_jacobian(&chain)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
