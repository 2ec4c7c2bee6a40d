use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of fore-aft leg slots per side.
pub const LEG_POSITION_COUNT: usize = 3;
/// Number of body sides.
pub const SIDE_COUNT: usize = 2;
/// Total number of legs on the body.
pub const LEG_COUNT: usize = LEG_POSITION_COUNT * SIDE_COUNT;

/// One value per leg, indexed `[position][side]`.
pub type PerLeg<T> = [[T; SIDE_COUNT]; LEG_POSITION_COUNT];

// ---------------------------------------------------------------------------
// LegPosition / Side
// ---------------------------------------------------------------------------

/// Fore-aft slot of a leg, shared by both sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegPosition {
    Front,
    Middle,
    Rear,
}

impl LegPosition {
    pub const ALL: [Self; LEG_POSITION_COUNT] = [Self::Front, Self::Middle, Self::Rear];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Front => "front",
            Self::Middle => "middle",
            Self::Rear => "rear",
        }
    }
}

/// Body side of a leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const ALL: [Self; SIDE_COUNT] = [Self::Left, Self::Right];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    /// Left legs are mirrored across the sagittal plane, right legs are not.
    pub const fn mirror(self) -> MirrorDir {
        match self {
            Self::Left => MirrorDir::Mirrored,
            Self::Right => MirrorDir::Identity,
        }
    }
}

// ---------------------------------------------------------------------------
// MirrorDir
// ---------------------------------------------------------------------------

/// Reflection of leg geometry across the body's left/right symmetry plane.
///
/// Applied as a multiplier on the X component of tip positions, so it is
/// always exactly `+1` or `-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MirrorDir {
    Identity,
    Mirrored,
}

impl MirrorDir {
    pub const fn factor(self) -> f64 {
        match self {
            Self::Identity => 1.0,
            Self::Mirrored => -1.0,
        }
    }
}

// ---------------------------------------------------------------------------
// LegId
// ---------------------------------------------------------------------------

/// Identity of one leg: a leg-position on a side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LegId {
    pub position: LegPosition,
    pub side: Side,
}

impl LegId {
    /// All legs in canonical order: outer loop over side, inner over position.
    pub const ALL: [Self; LEG_COUNT] = [
        Self::new(LegPosition::Front, Side::Left),
        Self::new(LegPosition::Middle, Side::Left),
        Self::new(LegPosition::Rear, Side::Left),
        Self::new(LegPosition::Front, Side::Right),
        Self::new(LegPosition::Middle, Side::Right),
        Self::new(LegPosition::Rear, Side::Right),
    ];

    pub const fn new(position: LegPosition, side: Side) -> Self {
        Self { position, side }
    }

    /// Index into [`LegId::ALL`].
    pub const fn index(self) -> usize {
        self.side.index() * LEG_POSITION_COUNT + self.position.index()
    }

    pub const fn mirror(self) -> MirrorDir {
        self.side.mirror()
    }

    /// Look up a leg by its `position_side` name, e.g. `"middle_right"`.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.to_string() == name)
    }
}

impl fmt::Display for LegId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.position.name(), self.side.name())
    }
}

// ---------------------------------------------------------------------------
// Joints
// ---------------------------------------------------------------------------

/// The three actuated joints of a 3-DOF leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JointKind {
    /// Hip yaw about the vertical axis.
    Yaw,
    /// Hip lift about the leg's horizontal axis.
    Lift,
    /// Knee bend.
    Knee,
}

impl JointKind {
    pub const ALL: [Self; 3] = [Self::Yaw, Self::Lift, Self::Knee];

    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Joint angles of a 3-DOF leg in radians.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct JointAngles {
    pub yaw: f64,
    pub lift: f64,
    pub knee: f64,
}

impl JointAngles {
    pub const fn new(yaw: f64, lift: f64, knee: f64) -> Self {
        Self { yaw, lift, knee }
    }

    pub const fn get(&self, joint: JointKind) -> f64 {
        match joint {
            JointKind::Yaw => self.yaw,
            JointKind::Lift => self.lift,
            JointKind::Knee => self.knee,
        }
    }

    pub fn set(&mut self, joint: JointKind, value: f64) {
        match joint {
            JointKind::Yaw => self.yaw = value,
            JointKind::Lift => self.lift = value,
            JointKind::Knee => self.knee = value,
        }
    }

    pub const fn to_array(self) -> [f64; 3] {
        [self.yaw, self.lift, self.knee]
    }

    pub fn is_finite(&self) -> bool {
        self.yaw.is_finite() && self.lift.is_finite() && self.knee.is_finite()
    }
}

impl From<[f64; 3]> for JointAngles {
    fn from([yaw, lift, knee]: [f64; 3]) -> Self {
        Self::new(yaw, lift, knee)
    }
}

/// Closed interval `[min, max]` of a joint angle in radians.
///
/// Serialized as a two-element array.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct JointRange {
    pub min: f64,
    pub max: f64,
}

impl JointRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Symmetric range of half-width `limit` about `center`.
    pub fn around(center: f64, limit: f64) -> Self {
        Self::new(center - limit, center + limit)
    }

    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }

    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }

    /// Clamp `value` into the range. Returns `None` when already inside.
    pub fn saturate(&self, value: f64) -> Option<f64> {
        if value < self.min {
            Some(self.min)
        } else if value > self.max {
            Some(self.max)
        } else {
            None
        }
    }
}

impl From<[f64; 2]> for JointRange {
    fn from([min, max]: [f64; 2]) -> Self {
        Self::new(min, max)
    }
}

impl From<JointRange> for [f64; 2] {
    fn from(range: JointRange) -> Self {
        [range.min, range.max]
    }
}

// ---------------------------------------------------------------------------
// LegState
// ---------------------------------------------------------------------------

/// Gait-layer flag carried by each leg. This core only stores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegState {
    #[default]
    Walking,
    Manual,
    Off,
}
