//! Property and state keys written onto SleepNumber bed devices.

/// Foreign key binding a device to a remote bed.
pub const BED_ID: &str = "bedId";

pub const ACCOUNT_ID: &str = "accountId";
pub const ADDRESS: &str = "address";
pub const BASE: &str = "base";
pub const BED_NAME: &str = "bedName";
pub const DUAL_SLEEP: &str = "dualSleep";
pub const GENERATION: &str = "generation";
pub const IS_KIDS_BED: &str = "isKidsBed";
pub const MAC_ADDRESS: &str = "macAddress";
pub const MODEL: &str = "model";
pub const PURCHASE_DATE: &str = "purchaseDate";
pub const REFERENCE: &str = "reference";
pub const REGISTRATION_DATE: &str = "registrationDate";
pub const RETURN_REQUEST_STATUS: &str = "returnRequestStatus";
pub const SERIAL: &str = "serial";
pub const SIZE: &str = "size";
pub const SKU: &str = "sku";
pub const STATUS: &str = "status";
pub const TIME_ZONE: &str = "timeZone";
pub const VERSION: &str = "version";
pub const ZIP_CODE: &str = "zipCode";

// Only written when the bed has a foundation.
pub const BASE_CONFIGURED: &str = "baseConfigured";
pub const BASE_NEEDS_HOMING: &str = "baseNeedsHoming";
pub const BASE_TYPE: &str = "baseType";
pub const HAS_FOOT_CONTROL: &str = "hasFootControl";
pub const HAS_FOOT_WARMING: &str = "hasFootWarming";
pub const HAS_MASSAGE_AND_LIGHT: &str = "hasMassageAndLight";
pub const HAS_UNDERBED_LIGHT: &str = "hasUnderbedLight";

pub const ANYONE_IN_BED: &str = "anyoneInBed";
pub const EVERYONE_IN_BED: &str = "everyoneInBed";
pub const ON_OFF_STATE: &str = "onOffState";

// Per-side state suffixes, prefixed with `left` or `right`.
pub const IS_IN_BED: &str = "IsInBed";
pub const PRESSURE: &str = "Pressure";
pub const SLEEP_NUMBER: &str = "SleepNumber";
pub const SLEEPER_ID: &str = "SleeperId";
pub const SLEEPER_NAME: &str = "SleeperName";
pub const SLEEP_GOAL: &str = "SleepGoal";
pub const ALERT_ID: &str = "AlertId";
pub const ALERT_TEXT: &str = "AlertText";
pub const HEAD_POSITION: &str = "HeadPosition";
pub const FOOT_POSITION: &str = "FootPosition";

/// Build a per-side state key, e.g. `side_state(BedSide::Left, IS_IN_BED)` → `leftIsInBed`.
#[must_use]
pub fn side_state(side: crate::bed::BedSide, suffix: &str) -> String {
    format!("{}{suffix}", side.state_prefix())
}
