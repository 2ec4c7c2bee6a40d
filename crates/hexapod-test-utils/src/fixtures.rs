//! Reference leg and model configurations.

use hexapod_core::{JointRange, LegConfig, LegId, LegPosition, ModelConfig, Side};

/// Knee limits of the reference scenario leg.
pub const SCENARIO_KNEE_BEND: JointRange = JointRange::new(0.1, 3.0);

/// Straight reference leg: hip 0.1, femur 0.2, tibia 0.15, all along X,
/// rooted at the body origin.
pub fn scenario_geometry() -> LegConfig {
    LegConfig {
        position: LegPosition::Middle,
        side: Side::Right,
        root_offset: [0.0, 0.0, 0.0],
        hip_offset: [0.1, 0.0, 0.0],
        knee_offset: [0.2, 0.0, 0.0],
        tip_offset: [0.15, 0.0, 0.0],
    }
}

/// A complete six-leg configuration with distinct roots per leg-position and
/// a slightly drooped tibia.
pub fn sample_model_config() -> ModelConfig {
    let roots = [[0.12, 0.2, 0.0], [0.15, 0.0, 0.0], [0.12, -0.2, 0.0]];
    let mut config = ModelConfig::default();
    config.legs = LegId::ALL
        .into_iter()
        .map(|id| LegConfig {
            position: id.position,
            side: id.side,
            root_offset: roots[id.position.index()],
            hip_offset: [0.05, 0.0, 0.0],
            knee_offset: [0.1, 0.0, 0.0],
            tip_offset: [0.14, 0.0, -0.04],
        })
        .collect();
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_model_config_is_valid() {
        let config = sample_model_config();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn scenario_geometry_is_planar() {
        let leg = scenario_geometry();
        assert_eq!(leg.hip_offset[1], 0.0);
        assert_eq!(leg.knee_offset[1], 0.0);
        assert_eq!(leg.tip_offset[1], 0.0);
    }
}
