// hexapod-core: Types, config and errors shared by the hexapod kinematics crates.

pub mod config;
pub mod error;
pub mod types;

pub use config::{IkConfig, LegConfig, LimitsConfig, ModelConfig};
pub use error::{ConfigError, HexapodError, JacobianError, KinematicsError};
pub use types::{
    JointAngles, JointKind, JointRange, LEG_COUNT, LEG_POSITION_COUNT, LegId, LegPosition,
    LegState, MirrorDir, PerLeg, SIDE_COUNT, Side,
};
