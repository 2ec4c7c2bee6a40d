use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::{
    JointRange, LEG_POSITION_COUNT, LegId, LegPosition, PerLeg, SIDE_COUNT, Side,
};

// ---------------------------------------------------------------------------
// Serde default functions
// ---------------------------------------------------------------------------

const fn default_plane_tolerance() -> f64 {
    0.01
}
const fn default_length_margin() -> f64 {
    1e-4
}
const fn default_residual_warning() -> f64 {
    1e-3
}
const fn default_joint_max_angular_speed() -> [f64; 3] {
    [3.0, 3.0, 3.0]
}

// ---------------------------------------------------------------------------
// IkConfig
// ---------------------------------------------------------------------------

/// Tolerances used by the closed-form leg IK.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IkConfig {
    /// Largest out-of-plane offset (after yaw alignment) accepted for a target.
    #[serde(default = "default_plane_tolerance")]
    pub plane_tolerance: f64,

    /// Margin kept between the solved leg length and its reachable bounds,
    /// so the inverse-cosine terms stay strictly in domain.
    #[serde(default = "default_length_margin")]
    pub length_margin: f64,

    /// Achieved-vs-requested tip distance above which a reachable solve is
    /// logged as a warning.
    #[serde(default = "default_residual_warning")]
    pub residual_warning: f64,
}

impl Default for IkConfig {
    fn default() -> Self {
        Self {
            plane_tolerance: default_plane_tolerance(),
            length_margin: default_length_margin(),
            residual_warning: default_residual_warning(),
        }
    }
}

// ---------------------------------------------------------------------------
// LimitsConfig
// ---------------------------------------------------------------------------

/// Body-wide joint limits. Per-position arrays are ordered front, middle, rear
/// and shared by both sides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Neutral yaw of each leg-position (rad).
    pub stance_yaw: [f64; LEG_POSITION_COUNT],

    /// Allowed yaw sweep either side of the stance yaw (rad).
    pub yaw_limit: [f64; LEG_POSITION_COUNT],

    /// Knee bend `[min, max]` (rad).
    pub knee: JointRange,

    /// Hip lift `[min, max]` (rad).
    pub hip_lift: JointRange,

    /// Max angular speed per joint: yaw, lift, knee (rad/s).
    #[serde(default = "default_joint_max_angular_speed")]
    pub joint_max_angular_speed: [f64; 3],
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            stance_yaw: [0.785, 0.0, -0.785],
            yaw_limit: [0.5, 0.5, 0.5],
            knee: JointRange::new(0.1, 3.0),
            hip_lift: JointRange::new(-1.5, 1.5),
            joint_max_angular_speed: default_joint_max_angular_speed(),
        }
    }
}

// ---------------------------------------------------------------------------
// LegConfig
// ---------------------------------------------------------------------------

/// Geometry of one leg. Offsets are expressed in the parent frame.
///
/// Both sides are specified in the unmirrored (right-hand) frame; the model
/// reflects left legs itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegConfig {
    pub position: LegPosition,
    pub side: Side,
    /// Body centre to hip-yaw joint.
    pub root_offset: [f64; 3],
    /// Yaw joint to lift joint.
    pub hip_offset: [f64; 3],
    /// Lift joint to knee joint.
    pub knee_offset: [f64; 3],
    /// Knee joint to foot tip.
    pub tip_offset: [f64; 3],
}

impl LegConfig {
    pub const fn id(&self) -> LegId {
        LegId::new(self.position, self.side)
    }

    fn offsets(&self) -> [(&'static str, &[f64; 3]); 4] {
        [
            ("root_offset", &self.root_offset),
            ("hip_offset", &self.hip_offset),
            ("knee_offset", &self.knee_offset),
            ("tip_offset", &self.tip_offset),
        ]
    }
}

// ---------------------------------------------------------------------------
// ModelConfig
// ---------------------------------------------------------------------------

/// Configuration consumed once at model construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub limits: LimitsConfig,

    #[serde(default)]
    pub ik: IkConfig,

    /// One entry per (position, side) pair.
    pub legs: Vec<LegConfig>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        let roots = [[0.08, 0.12, 0.0], [0.1, 0.0, 0.0], [0.08, -0.12, 0.0]];
        let legs = LegId::ALL
            .into_iter()
            .map(|id| LegConfig {
                position: id.position,
                side: id.side,
                root_offset: roots[id.position.index()],
                hip_offset: [0.05, 0.0, 0.0],
                knee_offset: [0.1, 0.0, 0.0],
                tip_offset: [0.15, 0.0, 0.0],
            })
            .collect();
        Self {
            limits: LimitsConfig::default(),
            ik: IkConfig::default(),
            legs,
        }
    }
}

impl ModelConfig {
    /// Validate configuration. Returns Err on invalid values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let limits = &self.limits;
        for (name, range) in [("limits.knee", &limits.knee), ("limits.hip_lift", &limits.hip_lift)] {
            if !range.is_valid() {
                return Err(ConfigError::InvalidRange {
                    field: name.into(),
                    min: range.min,
                    max: range.max,
                });
            }
        }
        for (i, yaw) in limits.stance_yaw.iter().enumerate() {
            if !yaw.is_finite() {
                return Err(invalid(format!("limits.stance_yaw[{i}]"), "must be finite"));
            }
        }
        for (i, limit) in limits.yaw_limit.iter().enumerate() {
            if !limit.is_finite() || *limit < 0.0 {
                return Err(invalid(format!("limits.yaw_limit[{i}]"), "must be finite and >= 0"));
            }
        }
        for (i, speed) in limits.joint_max_angular_speed.iter().enumerate() {
            if !speed.is_finite() || *speed < 0.0 {
                return Err(invalid(
                    format!("limits.joint_max_angular_speed[{i}]"),
                    "must be finite and >= 0",
                ));
            }
        }

        let ik = &self.ik;
        for (name, value) in [
            ("ik.plane_tolerance", ik.plane_tolerance),
            ("ik.length_margin", ik.length_margin),
            ("ik.residual_warning", ik.residual_warning),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(invalid(name.into(), "must be finite and > 0"));
            }
        }

        for leg in &self.legs {
            for (name, offset) in leg.offsets() {
                if offset.iter().any(|c| !c.is_finite()) {
                    return Err(invalid(format!("legs.{}.{name}", leg.id()), "must be finite"));
                }
            }
        }

        self.leg_table().map(|_| ())
    }

    /// Arrange leg entries into a `[position][side]` table.
    ///
    /// Fails if any pair is missing or given twice.
    pub fn leg_table(&self) -> Result<PerLeg<&LegConfig>, ConfigError> {
        let mut table: [[Option<&LegConfig>; SIDE_COUNT]; LEG_POSITION_COUNT] = Default::default();
        for leg in &self.legs {
            let slot = &mut table[leg.position.index()][leg.side.index()];
            if slot.is_some() {
                return Err(ConfigError::DuplicateLeg {
                    position: leg.position,
                    side: leg.side,
                });
            }
            *slot = Some(leg);
        }

        let row = |position: LegPosition| -> Result<[&LegConfig; SIDE_COUNT], ConfigError> {
            let [left, right] = table[position.index()];
            let missing = |side| ConfigError::MissingLeg { position, side };
            Ok([
                left.ok_or_else(|| missing(Side::Left))?,
                right.ok_or_else(|| missing(Side::Right))?,
            ])
        };
        Ok([
            row(LegPosition::Front)?,
            row(LegPosition::Middle)?,
            row(LegPosition::Rear)?,
        ])
    }

    /// Parse from a TOML string and validate.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from TOML file.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

fn invalid(field: String, message: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field,
        message: message.into(),
    }
}
