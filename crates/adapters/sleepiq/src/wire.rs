//! JSON payloads exchanged with the SleepIQ API and their mapping to domain types.

use serde::{Deserialize, Serialize};

use bedsync_domain::bed::{Bed, SideStatus, Sleeper};
use bedsync_domain::foundation::{DEFAULT_HEX_POSITION, FoundationFeatures, FoundationStatus};
use bedsync_domain::id::{BedId, SleeperId};

use crate::error::SleepIqError;

// `fsBoardFeatures` bits.
const FEATURE_MASSAGE_AND_LIGHT: u64 = 0x02;
const FEATURE_FOOT_CONTROL: u64 = 0x04;
const FEATURE_FOOT_WARMING: u64 = 0x08;
const FEATURE_UNDERBED_LIGHT: u64 = 0x10;

#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub login: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginResponse {
    pub key: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct BedsResponse {
    pub beds: Vec<BedPayload>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct BedPayload {
    pub bed_id: String,
    pub account_id: String,
    pub name: String,
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
    pub sleeper_left_id: String,
    pub sleeper_right_id: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct FamilyStatusResponse {
    pub beds: Vec<FamilyStatusPayload>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct FamilyStatusPayload {
    pub bed_id: String,
    pub left_side: SidePayload,
    pub right_side: SidePayload,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct SidePayload {
    pub is_in_bed: bool,
    pub alert_detailed_message: String,
    pub sleep_number: i64,
    pub alert_id: serde_json::Value,
    pub pressure: i64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct SleepersResponse {
    pub sleepers: Vec<SleeperPayload>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct SleeperPayload {
    pub sleeper_id: String,
    pub first_name: String,
    pub sleep_goal: i64,
}

#[derive(Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct FoundationStatusPayload {
    pub fs_left_head_position: String,
    pub fs_left_foot_position: String,
    pub fs_right_head_position: String,
    pub fs_right_foot_position: String,
    pub fs_configured: bool,
    pub fs_needs_homing: bool,
    pub fs_type: String,
}

impl Default for FoundationStatusPayload {
    fn default() -> Self {
        Self {
            fs_left_head_position: DEFAULT_HEX_POSITION.to_string(),
            fs_left_foot_position: DEFAULT_HEX_POSITION.to_string(),
            fs_right_head_position: DEFAULT_HEX_POSITION.to_string(),
            fs_right_foot_position: DEFAULT_HEX_POSITION.to_string(),
            fs_configured: false,
            fs_needs_homing: false,
            fs_type: String::new(),
        }
    }
}

impl From<FoundationStatusPayload> for FoundationStatus {
    fn from(value: FoundationStatusPayload) -> Self {
        Self {
            left_head_position: value.fs_left_head_position,
            left_foot_position: value.fs_left_foot_position,
            right_head_position: value.fs_right_head_position,
            right_foot_position: value.fs_right_foot_position,
            configured: value.fs_configured,
            needs_homing: value.fs_needs_homing,
            foundation_type: value.fs_type,
        }
    }
}

/// Board feature flags arrive either as a number or a hexadecimal string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum BoardFeatures {
    Number(u64),
    Text(String),
}

impl Default for BoardFeatures {
    fn default() -> Self {
        Self::Number(0)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct FoundationSystemPayload {
    pub fs_board_features: BoardFeatures,
}

impl TryFrom<FoundationSystemPayload> for FoundationFeatures {
    type Error = SleepIqError;

    fn try_from(value: FoundationSystemPayload) -> Result<Self, Self::Error> {
        let bits = match value.fs_board_features {
            BoardFeatures::Number(bits) => bits,
            BoardFeatures::Text(text) => {
                let digits = text.trim().trim_start_matches("0x");
                u64::from_str_radix(digits, 16)
                    .map_err(|_| SleepIqError::InvalidFeatures(text.clone()))?
            }
        };
        Ok(Self {
            has_foot_control: bits & FEATURE_FOOT_CONTROL != 0,
            has_foot_warming: bits & FEATURE_FOOT_WARMING != 0,
            has_massage_and_light: bits & FEATURE_MASSAGE_AND_LIGHT != 0,
            has_underbed_light: bits & FEATURE_UNDERBED_LIGHT != 0,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SleepNumberRequest<'a> {
    pub bed: &'a str,
    pub side: &'static str,
    pub sleep_number: u8,
}

#[derive(Debug, Serialize)]
pub(crate) struct PresetRequest {
    pub speed: u8,
    pub preset: u8,
    pub side: &'static str,
}

#[derive(Debug, Serialize)]
pub(crate) struct PositionRequest {
    pub position: u8,
    pub side: &'static str,
    pub actuator: &'static str,
    pub speed: u8,
}

/// Merge the three monitoring endpoints into domain beds, in `GET bed` order.
pub(crate) fn merge_beds(
    beds: BedsResponse,
    family: FamilyStatusResponse,
    sleepers: &SleepersResponse,
) -> Vec<Bed> {
    let mut family = family.beds;

    beds.beds
        .into_iter()
        .map(|payload| {
            let status = family
                .iter()
                .position(|status| status.bed_id == payload.bed_id)
                .map(|index| family.swap_remove(index))
                .unwrap_or_default();
            let sleeper = |id: &str| {
                sleepers
                    .sleepers
                    .iter()
                    .find(|sleeper| !id.is_empty() && sleeper.sleeper_id == id)
                    .map(|sleeper| Sleeper {
                        sleeper_id: SleeperId::new(sleeper.sleeper_id.as_str()),
                        first_name: sleeper.first_name.clone(),
                        sleep_goal: sleeper.sleep_goal,
                    })
            };

            Bed {
                left: side_status(status.left_side, sleeper(&payload.sleeper_left_id)),
                right: side_status(status.right_side, sleeper(&payload.sleeper_right_id)),
                bed_id: BedId::new(payload.bed_id),
                account_id: payload.account_id,
                name: payload.name,
                base: payload.base,
                dual_sleep: payload.dual_sleep,
                generation: payload.generation,
                is_kids_bed: payload.is_kids_bed,
                mac_address: payload.mac_address,
                model: payload.model,
                purchase_date: payload.purchase_date,
                reference: payload.reference,
                registration_date: payload.registration_date,
                return_request_status: payload.return_request_status,
                serial: payload.serial,
                size: payload.size,
                sku: payload.sku,
                status: payload.status,
                timezone: payload.timezone,
                version: payload.version,
                zipcode: payload.zipcode,
            }
        })
        .collect()
}

fn side_status(side: SidePayload, sleeper: Option<Sleeper>) -> SideStatus {
    SideStatus {
        is_in_bed: side.is_in_bed,
        pressure: side.pressure,
        sleep_number: side.sleep_number,
        alert_id: scalar_text(&side.alert_id),
        alert_text: side.alert_detailed_message,
        sleeper,
    }
}

// `alertId` is numeric on some firmware and a string on others.
fn scalar_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse<T: serde::de::DeserializeOwned>(json: &str) -> T {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn should_merge_family_status_and_sleepers_by_id() {
        let beds: BedsResponse = parse(
            r#"{"beds":[{"bedId":"b1","name":"Master","base":"FlexFit 2","sleeperLeftId":"s1","sleeperRightId":"s2","timezone":"US/Central"}]}"#,
        );
        let family: FamilyStatusResponse = parse(
            r#"{"beds":[{"bedId":"b1","leftSide":{"isInBed":true,"sleepNumber":45,"pressure":1100,"alertId":0,"alertDetailedMessage":"No Alert"},"rightSide":{"isInBed":false,"sleepNumber":60}}]}"#,
        );
        let sleepers: SleepersResponse = parse(
            r#"{"sleepers":[{"sleeperId":"s2","firstName":"Bob","sleepGoal":420},{"sleeperId":"s1","firstName":"Ann","sleepGoal":480}]}"#,
        );

        let merged = merge_beds(beds, family, &sleepers);

        assert_eq!(merged.len(), 1);
        let bed = &merged[0];
        assert_eq!(bed.bed_id, BedId::new("b1"));
        assert_eq!(bed.timezone, "US/Central");
        assert!(bed.left.is_in_bed);
        assert_eq!(bed.left.sleep_number, 45);
        assert_eq!(bed.left.alert_id, "0");
        assert_eq!(bed.left.alert_text, "No Alert");
        assert_eq!(bed.left.sleeper.as_ref().unwrap().first_name, "Ann");
        assert_eq!(bed.right.sleeper.as_ref().unwrap().sleep_goal, 420);
        assert_eq!(bed.right.sleep_number, 60);
    }

    #[test]
    fn should_default_sides_when_family_status_is_missing() {
        let beds: BedsResponse = parse(r#"{"beds":[{"bedId":"b1"}]}"#);

        let merged = merge_beds(beds, FamilyStatusResponse::default(), &SleepersResponse::default());

        assert_eq!(merged[0].left, SideStatus::default());
        assert!(merged[0].right.sleeper.is_none());
    }

    #[test]
    fn should_default_missing_foundation_positions_to_flat() {
        let payload: FoundationStatusPayload = parse(r#"{"fsLeftHeadPosition":"1E","fsType":"Split Head"}"#);

        let status = FoundationStatus::from(payload);

        assert_eq!(status.left_head_position, "1E");
        assert_eq!(status.right_foot_position, DEFAULT_HEX_POSITION);
        assert_eq!(status.foundation_type, "Split Head");
    }

    #[test]
    fn should_decode_board_features_from_hex_string() {
        let payload: FoundationSystemPayload = parse(r#"{"fsBoardFeatures":"0x0C"}"#);

        let features = FoundationFeatures::try_from(payload).unwrap();

        assert!(features.has_foot_control);
        assert!(features.has_foot_warming);
        assert!(!features.has_massage_and_light);
        assert!(!features.has_underbed_light);
    }

    #[test]
    fn should_decode_board_features_from_number() {
        let payload: FoundationSystemPayload = parse(r#"{"fsBoardFeatures":18}"#);

        let features = FoundationFeatures::try_from(payload).unwrap();

        assert!(features.has_massage_and_light);
        assert!(features.has_underbed_light);
        assert!(!features.has_foot_control);
    }

    #[test]
    fn should_reject_garbled_board_features() {
        let payload: FoundationSystemPayload = parse(r#"{"fsBoardFeatures":"zz"}"#);
        assert!(matches!(
            FoundationFeatures::try_from(payload),
            Err(SleepIqError::InvalidFeatures(_))
        ));
    }
}
