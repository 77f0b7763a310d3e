//! Bed: one smart bed registered with the SleepIQ account.
//!
//! A bed, its two sides and their sleepers only live for the duration of one
//! poll. They are rebuilt from scratch on every fetch and never diffed against
//! the previous poll.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::id::{BedId, SleeperId};

/// The result of one poll: every bed on the account, in service order.
pub type Snapshot = Vec<Bed>;

/// A smart bed with two independently sensed sides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Bed {
    pub bed_id: BedId,
    pub account_id: String,
    pub name: String,
    /// Foundation model; empty when the bed has no motorized base.
    pub base: String,
    pub dual_sleep: bool,
    pub generation: String,
    pub is_kids_bed: bool,
    pub mac_address: String,
    pub model: String,
    pub purchase_date: String,
    pub reference: String,
    pub registration_date: String,
    pub return_request_status: i64,
    pub serial: String,
    pub size: String,
    pub sku: String,
    pub status: i64,
    pub timezone: String,
    pub version: String,
    pub zipcode: String,
    pub left: SideStatus,
    pub right: SideStatus,
}

impl Bed {
    /// Create a bed with the given id and name and every other field defaulted.
    #[must_use]
    pub fn new(bed_id: impl Into<BedId>, name: impl Into<String>) -> Self {
        Self {
            bed_id: bed_id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Whether the bed sits on a motorized foundation.
    #[must_use]
    pub fn has_foundation(&self) -> bool {
        !self.base.is_empty()
    }

    /// Someone is on at least one side.
    #[must_use]
    pub fn anyone_in_bed(&self) -> bool {
        self.left.is_in_bed || self.right.is_in_bed
    }

    /// Both sides are occupied.
    #[must_use]
    pub fn everyone_in_bed(&self) -> bool {
        self.left.is_in_bed && self.right.is_in_bed
    }

    /// Borrow the status of one side.
    #[must_use]
    pub fn side(&self, side: BedSide) -> &SideStatus {
        match side {
            BedSide::Left => &self.left,
            BedSide::Right => &self.right,
        }
    }

    /// Display name, falling back to a placeholder for unnamed beds.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            "(unnamed)"
        } else {
            &self.name
        }
    }
}

/// Sensor data for one half of a bed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SideStatus {
    pub is_in_bed: bool,
    pub pressure: i64,
    pub sleep_number: i64,
    pub alert_id: String,
    pub alert_text: String,
    pub sleeper: Option<Sleeper>,
}

/// A named sleeper profile attached to one side.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sleeper {
    pub sleeper_id: SleeperId,
    pub first_name: String,
    pub sleep_goal: i64,
}

/// Selects the left or right half of a bed (`L` / `R` on the wire).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BedSide {
    #[serde(rename = "L")]
    Left,
    #[serde(rename = "R")]
    Right,
}

impl BedSide {
    /// Both sides, left first.
    pub const ALL: [Self; 2] = [Self::Left, Self::Right];

    /// Single-letter code used by the remote API.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::Left => "L",
            Self::Right => "R",
        }
    }

    /// Human label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Left => "Left",
            Self::Right => "Right",
        }
    }

    /// Prefix used for per-side device state keys.
    #[must_use]
    pub fn state_prefix(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl fmt::Display for BedSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for BedSide {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "L" | "l" => Ok(Self::Left),
            "R" | "r" => Ok(Self::Right),
            other => Err(ValidationError::InvalidSide(other.to_string())),
        }
    }
}
