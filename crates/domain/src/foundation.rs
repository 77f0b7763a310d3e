//! Foundation: the optional motorized base under a bed.
//!
//! Actuator positions arrive from the service as two-character hexadecimal
//! strings and are decoded base-16 into a 0–100 raw value.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::bed::BedSide;
use crate::error::ValidationError;

/// Position reported when the service omits a field.
pub const DEFAULT_HEX_POSITION: &str = "00";

/// A position string that is not valid base-16.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("position \"{0}\" is not a hexadecimal value")]
pub struct InvalidHexPosition(pub String);

/// Decode a hexadecimal actuator position (`"64"` → 100), ignoring case.
///
/// # Errors
///
/// Returns [`InvalidHexPosition`] when `raw` is empty or not base-16.
pub fn decode_hex_position(raw: &str) -> Result<i64, InvalidHexPosition> {
    i64::from_str_radix(raw.trim(), 16).map_err(|_| InvalidHexPosition(raw.to_string()))
}

/// Raw status of a foundation, as reported for one bed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoundationStatus {
    pub left_head_position: String,
    pub left_foot_position: String,
    pub right_head_position: String,
    pub right_foot_position: String,
    pub configured: bool,
    pub needs_homing: bool,
    pub foundation_type: String,
}

impl Default for FoundationStatus {
    fn default() -> Self {
        Self {
            left_head_position: DEFAULT_HEX_POSITION.to_string(),
            left_foot_position: DEFAULT_HEX_POSITION.to_string(),
            right_head_position: DEFAULT_HEX_POSITION.to_string(),
            right_foot_position: DEFAULT_HEX_POSITION.to_string(),
            configured: false,
            needs_homing: false,
            foundation_type: String::new(),
        }
    }
}

impl FoundationStatus {
    /// Raw hex string for one actuator on one side.
    #[must_use]
    pub fn raw_position(&self, side: BedSide, actuator: Actuator) -> &str {
        match (side, actuator) {
            (BedSide::Left, Actuator::Head) => &self.left_head_position,
            (BedSide::Left, Actuator::Foot) => &self.left_foot_position,
            (BedSide::Right, Actuator::Head) => &self.right_head_position,
            (BedSide::Right, Actuator::Foot) => &self.right_foot_position,
        }
    }

    /// Decoded position for one actuator on one side.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHexPosition`] if the service sent a malformed value.
    pub fn position(&self, side: BedSide, actuator: Actuator) -> Result<i64, InvalidHexPosition> {
        decode_hex_position(self.raw_position(side, actuator))
    }
}

/// Capabilities of a foundation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct FoundationFeatures {
    pub has_foot_control: bool,
    pub has_foot_warming: bool,
    pub has_massage_and_light: bool,
    pub has_underbed_light: bool,
}

/// Which end of a side to move (`H` / `F` on the wire).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Actuator {
    #[serde(rename = "H")]
    Head,
    #[serde(rename = "F")]
    Foot,
}

impl Actuator {
    /// Both actuators, head first.
    pub const ALL: [Self; 2] = [Self::Head, Self::Foot];

    /// Single-letter code used by the remote API.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::Head => "H",
            Self::Foot => "F",
        }
    }

    /// Human label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Head => "Head",
            Self::Foot => "Foot",
        }
    }
}

impl fmt::Display for Actuator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Actuator {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "H" | "h" => Ok(Self::Head),
            "F" | "f" => Ok(Self::Foot),
            other => Err(ValidationError::InvalidActuator(other.to_string())),
        }
    }
}

/// Target actuator position, always within `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BasePosition(u8);

impl BasePosition {
    pub const FLAT: Self = Self(0);
    pub const MAX: Self = Self(100);

    /// Clamp any requested value into `0..=100`.
    #[must_use]
    pub fn clamped(value: i64) -> Self {
        Self(u8::try_from(value.clamp(0, 100)).unwrap_or(100))
    }

    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }
}

/// FlexFit preset positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Preset {
    Favorite,
    Read,
    WatchTv,
    Flat,
    ZeroG,
    Snore,
}

impl Preset {
    /// Numeric id used by the remote API (1 to 6).
    #[must_use]
    pub fn id(self) -> u8 {
        match self {
            Self::Favorite => 1,
            Self::Read => 2,
            Self::WatchTv => 3,
            Self::Flat => 4,
            Self::ZeroG => 5,
            Self::Snore => 6,
        }
    }

    /// Human label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Favorite => "Favorite",
            Self::Read => "Read",
            Self::WatchTv => "Watch TV",
            Self::Flat => "Flat",
            Self::ZeroG => "Zero G",
            Self::Snore => "Snore",
        }
    }
}

impl TryFrom<i64> for Preset {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Favorite),
            2 => Ok(Self::Read),
            3 => Ok(Self::WatchTv),
            4 => Ok(Self::Flat),
            5 => Ok(Self::ZeroG),
            6 => Ok(Self::Snore),
            other => Err(ValidationError::InvalidPreset(other)),
        }
    }
}

/// Foundation movement speed (0 = fast, 1 = slow on the wire).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Speed {
    #[default]
    Fast,
    Slow,
}

impl Speed {
    /// Numeric code used by the remote API.
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Self::Fast => 0,
            Self::Slow => 1,
        }
    }

    /// Human label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Fast => "Fast",
            Self::Slow => "Slow",
        }
    }
}

impl TryFrom<i64> for Speed {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Fast),
            1 => Ok(Self::Slow),
            other => Err(ValidationError::InvalidSpeed(other)),
        }
    }
}
