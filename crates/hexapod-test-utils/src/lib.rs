//! Shared test fixtures and utilities for the hexapod crates.
//!
//! Provides deterministic RNG setup, random DH chains and reference leg and
//! model configurations.

pub mod fixtures;
pub mod rng;

// ---------------------------------------------------------------------------
// Re-exports for convenience
// ---------------------------------------------------------------------------

pub use fixtures::{sample_model_config, scenario_geometry};
pub use rng::{random_dh_values, seeded_rng};
