//! Command values sent to a bed, plus the read-only sensor actions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::bed::BedSide;
use crate::error::ValidationError;
use crate::foundation::{Actuator, BasePosition, Preset, Speed};

/// A firmness setting: a multiple of 5 within `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct SleepNumber(u8);

impl SleepNumber {
    /// Validate a requested sleep number.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidSleepNumber`] when the value is out of
    /// range or not a multiple of 5.
    pub fn new(value: i64) -> Result<Self, ValidationError> {
        if !(0..=100).contains(&value) || value % 5 != 0 {
            return Err(ValidationError::InvalidSleepNumber(value));
        }
        u8::try_from(value)
            .map(Self)
            .map_err(|_| ValidationError::InvalidSleepNumber(value))
    }

    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }
}

impl fmt::Display for SleepNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated command aimed at one side of a bed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BedCommand {
    SetSleepNumber {
        side: BedSide,
        sleep_number: SleepNumber,
    },
    SelectPreset {
        side: BedSide,
        preset: Preset,
        speed: Speed,
    },
    SetBasePosition {
        side: BedSide,
        actuator: Actuator,
        position: BasePosition,
        speed: Speed,
    },
}

impl BedCommand {
    /// Human description of the command for the given device name.
    #[must_use]
    pub fn describe(&self, device_name: &str) -> String {
        match self {
            Self::SetSleepNumber { side, sleep_number } => format!(
                "set the {} side of \"{device_name}\" to SleepNumber {sleep_number}",
                side.label()
            ),
            Self::SelectPreset {
                side,
                preset,
                speed,
            } => format!(
                "set the {} side FlexFit position of \"{device_name}\" to preset {} at a {} speed",
                side.label(),
                preset.label(),
                speed.label()
            ),
            Self::SetBasePosition {
                side,
                actuator,
                position,
                speed,
            } => format!(
                "set the {} side {} position of \"{device_name}\" to {} at a {} speed",
                side.label(),
                actuator.label(),
                position.value(),
                speed.label()
            ),
        }
    }
}

/// Generic sensor actions the host may send to a bed device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorAction {
    TurnOn,
    TurnOff,
    Toggle,
    RequestStatus,
}

impl SensorAction {
    /// Short verb used in log lines.
    #[must_use]
    pub fn verb(self) -> &'static str {
        match self {
            Self::TurnOn => "on",
            Self::TurnOff => "off",
            Self::Toggle => "toggle",
            Self::RequestStatus => "status request",
        }
    }
}

impl FromStr for SensorAction {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "turn_on" => Ok(Self::TurnOn),
            "turn_off" => Ok(Self::TurnOff),
            "toggle" => Ok(Self::Toggle),
            "request_status" => Ok(Self::RequestStatus),
            other => Err(ValidationError::InvalidSensorAction(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_accept_multiples_of_five_within_range() {
        assert_eq!(SleepNumber::new(0).unwrap().value(), 0);
        assert_eq!(SleepNumber::new(50).unwrap().value(), 50);
        assert_eq!(SleepNumber::new(100).unwrap().value(), 100);
    }

    #[test]
    fn should_reject_sleep_number_when_not_multiple_of_five() {
        assert_eq!(
            SleepNumber::new(37),
            Err(ValidationError::InvalidSleepNumber(37))
        );
    }

    #[test]
    fn should_reject_sleep_number_when_out_of_range() {
        assert_eq!(
            SleepNumber::new(-5),
            Err(ValidationError::InvalidSleepNumber(-5))
        );
        assert_eq!(
            SleepNumber::new(105),
            Err(ValidationError::InvalidSleepNumber(105))
        );
    }

    #[test]
    fn should_describe_sleep_number_command() {
        let command = BedCommand::SetSleepNumber {
            side: BedSide::Left,
            sleep_number: SleepNumber::new(50).unwrap(),
        };
        assert_eq!(
            command.describe("Master Bed"),
            "set the Left side of \"Master Bed\" to SleepNumber 50"
        );
    }

    #[test]
    fn should_describe_preset_command() {
        let command = BedCommand::SelectPreset {
            side: BedSide::Right,
            preset: Preset::WatchTv,
            speed: Speed::Slow,
        };
        assert_eq!(
            command.describe("Master Bed"),
            "set the Right side FlexFit position of \"Master Bed\" to preset Watch TV at a Slow speed"
        );
    }

    #[test]
    fn should_describe_base_position_command() {
        let command = BedCommand::SetBasePosition {
            side: BedSide::Left,
            actuator: Actuator::Head,
            position: BasePosition::clamped(40),
            speed: Speed::Fast,
        };
        assert_eq!(
            command.describe("Master Bed"),
            "set the Left side Head position of \"Master Bed\" to 40 at a Fast speed"
        );
    }

    #[test]
    fn should_parse_sensor_actions() {
        assert_eq!(
            "request_status".parse::<SensorAction>(),
            Ok(SensorAction::RequestStatus)
        );
        assert_eq!("toggle".parse::<SensorAction>(), Ok(SensorAction::Toggle));
        assert!(matches!(
            "explode".parse::<SensorAction>(),
            Err(ValidationError::InvalidSensorAction(_))
        ));
    }
}
