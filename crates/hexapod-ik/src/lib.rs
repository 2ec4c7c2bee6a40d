//! Closed-form kinematics for a six-legged walker.
//!
//! Converts foot-tip targets into hip yaw, hip lift and knee angles (and
//! back), and enforces body-wide joint limits.
//!
//! # Architecture
//!
//! ```text
//! ModelConfig ──► Model ──► [[Leg; 2]; 3] ──► JointAngles ──► clamp_to_limits
//! ```
//!
//! A [`Model`] owns six [`Leg`]s indexed by leg-position and side. Each leg
//! derives its link lengths and reachable range once, then solves IK with the
//! law of cosines. Limits are passed into legs explicitly; legs never refer
//! back to the model.
//!
//! Nothing here locks. A single control thread is expected to own the model;
//! other readers must synchronise on their own.

pub mod frames;
pub mod joint;
pub mod leg;
pub mod limits;
pub mod model;

pub use joint::{Joint, Link};
pub use leg::{IkSolution, Leg, LegDimensions, LegGeometry};
pub use limits::{BodyLimits, JointLimits, LimitExceeded};
pub use model::{JOINT_POSITIONS_PER_LEG, Model, RUNAWAY_SQUARED_NORM};
