//! Analytic Jacobians checked against central finite differences of the
//! chain forward kinematics.

use approx::assert_relative_eq;
use hexapod_core::JacobianError;
use hexapod_dh::{DhParameters, create_jacobian, forward_kinematics, jacobian};
use hexapod_test_utils::{random_dh_values, seeded_rng};
use nalgebra::{DMatrix, Vector3};

const STEP: f64 = 1e-5;

fn end_position(chain: &[DhParameters]) -> Vector3<f64> {
    forward_kinematics(chain).translation.vector
}

fn finite_difference(chain: &[DhParameters]) -> DMatrix<f64> {
    let mut j = DMatrix::zeros(3, chain.len());
    for i in 0..chain.len() {
        let mut plus = chain.to_vec();
        let mut minus = chain.to_vec();
        plus[i].theta += STEP;
        minus[i].theta -= STEP;
        let column = (end_position(&plus) - end_position(&minus)) / (2.0 * STEP);
        j.set_column(i, &column);
    }
    j
}

fn random_chain(seed: u64, dof: usize) -> Vec<DhParameters> {
    random_dh_values(&mut seeded_rng(seed), dof)
        .into_iter()
        .map(DhParameters::from)
        .collect()
}

// ---------------------------------------------------------------------------
// Finite-difference agreement
// ---------------------------------------------------------------------------

#[test]
fn matches_finite_difference_for_every_supported_arity() {
    for dof in 1..=5 {
        for seed in 0..20 {
            let chain = random_chain(1000 * dof as u64 + seed, dof);
            let analytic = create_jacobian(&chain).unwrap();
            let numeric = finite_difference(&chain);
            assert_eq!(analytic.shape(), (3, dof));
            for (a, n) in analytic.iter().zip(numeric.iter()) {
                assert!(
                    (a - n).abs() < 1e-6,
                    "dof {dof} seed {seed}: analytic {a} vs numeric {n}"
                );
            }
        }
    }
}

#[test]
fn fixed_arity_matches_finite_difference() {
    let chain = random_chain(77, 4);
    let fixed: [DhParameters; 4] = [chain[0], chain[1], chain[2], chain[3]];
    let analytic = jacobian(&fixed).unwrap();
    let numeric = finite_difference(&chain);
    for row in 0..3 {
        for col in 0..4 {
            assert_relative_eq!(analytic[(row, col)], numeric[(row, col)], epsilon = 1e-6);
        }
    }
}

#[test]
fn last_column_vanishes_without_last_offset() {
    // A final link with no reach (r = 0) and the tip on its own axis cannot
    // move the end effector by rotating.
    let mut chain = random_chain(5, 3);
    chain[2].r = 0.0;
    let j = create_jacobian(&chain).unwrap();
    assert_relative_eq!(j.column(2).norm(), 0.0, epsilon = 1e-12);
}

// ---------------------------------------------------------------------------
// Arity and concurrency
// ---------------------------------------------------------------------------

#[test]
fn six_dof_marker_is_never_a_matrix() {
    let chain = random_chain(9, 6);
    assert_eq!(
        create_jacobian(&chain).unwrap_err(),
        JacobianError::Unimplemented { dof: 6 }
    );
}

#[test]
fn concurrent_evaluation_is_consistent() {
    let chains: Vec<_> = (0..8).map(|seed| random_chain(seed, 5)).collect();
    let serial: Vec<_> = chains.iter().map(|c| create_jacobian(c).unwrap()).collect();
    let parallel: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = chains
            .iter()
            .map(|c| scope.spawn(move || create_jacobian(c).unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert_eq!(serial, parallel);
}
