//! HTTP client implementing [`RemoteSession`] against the SleepIQ API.

use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;
use url::Url;

use bedsync_app::ports::RemoteSession;
use bedsync_domain::account::Credentials;
use bedsync_domain::bed::{BedSide, Snapshot};
use bedsync_domain::command::SleepNumber;
use bedsync_domain::error::RemoteError;
use bedsync_domain::foundation::{
    Actuator, BasePosition, FoundationFeatures, FoundationStatus, Preset, Speed,
};
use bedsync_domain::id::BedId;

use crate::config::SleepIqConfig;
use crate::error::SleepIqError;
use crate::wire;

/// Query parameter carrying the session key.
const SESSION_KEY_PARAM: &str = "_k";

/// SleepIQ client sharing one session across clones.
#[derive(Clone)]
pub struct SleepIqClient {
    http: reqwest::Client,
    base_url: Url,
    timeout: Duration,
    credentials: Credentials,
    session_key: Arc<RwLock<Option<String>>>,
}

impl SleepIqClient {
    /// Build a client for the configured endpoint. No request is made.
    ///
    /// # Errors
    ///
    /// Returns [`SleepIqError::Url`] when `base_url` is invalid or
    /// [`SleepIqError::Http`] when the HTTP client cannot be built.
    pub fn new(config: &SleepIqConfig, credentials: Credentials) -> Result<Self, SleepIqError> {
        Ok(Self {
            http: http_client(config.timeout())?,
            base_url: base_url(&config.base_url)?,
            timeout: config.timeout(),
            credentials,
            session_key: Arc::new(RwLock::new(None)),
        })
    }

    /// A logged-out client for other credentials on the same endpoint.
    ///
    /// Nothing is shared with `self`: not the session key, not the cookies.
    fn detached(&self, credentials: Credentials) -> Result<Self, SleepIqError> {
        Ok(Self {
            http: http_client(self.timeout)?,
            base_url: self.base_url.clone(),
            timeout: self.timeout,
            credentials,
            session_key: Arc::new(RwLock::new(None)),
        })
    }

    /// Whether a session key is currently held.
    pub async fn is_logged_in(&self) -> bool {
        self.session_key.read().await.is_some()
    }

    fn endpoint_url(&self, endpoint: &str) -> Result<Url, SleepIqError> {
        Ok(self.base_url.join(endpoint.trim_start_matches('/'))?)
    }

    async fn session_url(&self, endpoint: &str) -> Result<Url, SleepIqError> {
        let key = self
            .session_key
            .read()
            .await
            .clone()
            .ok_or(SleepIqError::NotLoggedIn)?;
        let mut url = self.endpoint_url(endpoint)?;
        url.query_pairs_mut().append_pair(SESSION_KEY_PARAM, &key);
        Ok(url)
    }

    async fn check_status(
        response: reqwest::Response,
        action: &str,
    ) -> Result<reqwest::Response, SleepIqError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::UNAUTHORIZED {
            return Err(SleepIqError::Unauthorized {
                action: action.to_string(),
            });
        }

        let body = response.text().await.unwrap_or_default();
        let details = if body.is_empty() {
            format!("{status}")
        } else {
            format!("{status}: {body}")
        };
        Err(SleepIqError::Status {
            action: action.to_string(),
            details,
        })
    }

    async fn decode<T: DeserializeOwned>(
        response: reqwest::Response,
        action: &str,
    ) -> Result<T, SleepIqError> {
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|source| SleepIqError::Decode {
            action: action.to_string(),
            source,
        })
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, SleepIqError> {
        let action = format!("GET {endpoint}");
        let url = self.session_url(endpoint).await?;
        tracing::trace!(%action, "sending request");
        let response = self.http.get(url).send().await?;
        let response = Self::check_status(response, &action).await?;
        Self::decode(response, &action).await
    }

    async fn put<B: Serialize>(&self, endpoint: &str, body: &B) -> Result<(), SleepIqError> {
        let action = format!("PUT {endpoint}");
        let url = self.session_url(endpoint).await?;
        tracing::trace!(%action, "sending request");
        let response = self.http.put(url).json(body).send().await?;
        Self::check_status(response, &action).await?;
        Ok(())
    }

    async fn try_login(&self) -> Result<(), SleepIqError> {
        let url = self.endpoint_url("login")?;
        let response = self
            .http
            .put(url)
            .json(&wire::LoginRequest {
                login: &self.credentials.username,
                password: &self.credentials.password,
            })
            .send()
            .await?;
        let response = Self::check_status(response, "PUT login").await?;
        let login: wire::LoginResponse = Self::decode(response, "PUT login").await?;

        *self.session_key.write().await = Some(login.key);
        tracing::debug!(username = %self.credentials.username, "logged in to SleepIQ");
        Ok(())
    }

    async fn try_beds(&self) -> Result<Snapshot, SleepIqError> {
        let beds: wire::BedsResponse = self.get("bed").await?;
        let family: wire::FamilyStatusResponse = self.get("bed/familyStatus").await?;
        let sleepers: wire::SleepersResponse = self.get("sleeper").await?;
        Ok(wire::merge_beds(beds, family, &sleepers))
    }
}

impl RemoteSession for SleepIqClient {
    async fn login(&self) -> Result<(), RemoteError> {
        // A failed login must not leave a stale key behind.
        *self.session_key.write().await = None;
        self.try_login().await.map_err(Into::into)
    }

    async fn check_credentials(&self, credentials: &Credentials) -> Result<(), RemoteError> {
        let scratch = self.detached(credentials.clone())?;
        scratch.try_login().await.map_err(Into::into)
    }

    async fn beds_with_sleeper_status(&self) -> Result<Snapshot, RemoteError> {
        self.try_beds().await.map_err(Into::into)
    }

    async fn foundation_status(&self, bed_id: &BedId) -> Result<FoundationStatus, RemoteError> {
        let payload: wire::FoundationStatusPayload = self
            .get(&format!("bed/{bed_id}/foundation/status"))
            .await?;
        Ok(payload.into())
    }

    async fn foundation_features(
        &self,
        bed_id: &BedId,
    ) -> Result<FoundationFeatures, RemoteError> {
        let payload: wire::FoundationSystemPayload = self
            .get(&format!("bed/{bed_id}/foundation/system"))
            .await?;
        FoundationFeatures::try_from(payload).map_err(Into::into)
    }

    async fn set_sleep_number(
        &self,
        bed_id: &BedId,
        side: BedSide,
        sleep_number: SleepNumber,
    ) -> Result<(), RemoteError> {
        let body = wire::SleepNumberRequest {
            bed: bed_id.as_str(),
            side: side.code(),
            sleep_number: sleep_number.value(),
        };
        self.put(&format!("bed/{bed_id}/sleepNumber"), &body)
            .await
            .map_err(Into::into)
    }

    async fn set_preset(
        &self,
        bed_id: &BedId,
        side: BedSide,
        preset: Preset,
        speed: Speed,
    ) -> Result<(), RemoteError> {
        let body = wire::PresetRequest {
            speed: speed.code(),
            preset: preset.id(),
            side: side.code(),
        };
        self.put(&format!("bed/{bed_id}/foundation/preset"), &body)
            .await
            .map_err(Into::into)
    }

    async fn set_foundation_position(
        &self,
        bed_id: &BedId,
        side: BedSide,
        actuator: Actuator,
        position: BasePosition,
        speed: Speed,
    ) -> Result<(), RemoteError> {
        let body = wire::PositionRequest {
            position: position.value(),
            side: side.code(),
            actuator: actuator.code(),
            speed: speed.code(),
        };
        self.put(&format!("bed/{bed_id}/foundation/adjustment/micro"), &body)
            .await
            .map_err(Into::into)
    }
}

fn http_client(timeout: Duration) -> Result<reqwest::Client, SleepIqError> {
    Ok(reqwest::Client::builder()
        .timeout(timeout)
        .cookie_store(true)
        .build()?)
}

fn base_url(raw: &str) -> Result<Url, SleepIqError> {
    // `Url::join` drops the last segment unless the base ends with a slash.
    if raw.ends_with('/') {
        Ok(Url::parse(raw)?)
    } else {
        Ok(Url::parse(&format!("{raw}/"))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server, ServerGuard};

    const KEY: &str = "session-key";

    fn client(server: &ServerGuard) -> SleepIqClient {
        let config = SleepIqConfig {
            base_url: format!("{}/rest", server.url()),
            timeout_secs: 5,
        };
        SleepIqClient::new(&config, Credentials::new("me@example.com", "secret")).unwrap()
    }

    async fn logged_in(server: &mut ServerGuard) -> SleepIqClient {
        let _login = server
            .mock("PUT", "/rest/login")
            .with_status(200)
            .with_body(format!(r#"{{"userId":"u1","key":"{KEY}"}}"#))
            .create_async()
            .await;
        let client = client(server);
        client.login().await.unwrap();
        client
    }

    fn with_key() -> Matcher {
        Matcher::UrlEncoded(SESSION_KEY_PARAM.to_string(), KEY.to_string())
    }

    #[tokio::test]
    async fn should_store_session_key_when_login_succeeds() {
        let mut server = Server::new_async().await;
        let login = server
            .mock("PUT", "/rest/login")
            .match_body(Matcher::Json(serde_json::json!({
                "login": "me@example.com",
                "password": "secret"
            })))
            .with_status(200)
            .with_body(r#"{"key":"abc"}"#)
            .create_async()
            .await;
        let client = client(&server);

        client.login().await.unwrap();

        login.assert_async().await;
        assert!(client.is_logged_in().await);
    }

    #[tokio::test]
    async fn should_return_authentication_error_when_login_is_refused() {
        let mut server = Server::new_async().await;
        let _refused = server
            .mock("PUT", "/rest/login")
            .with_status(401)
            .create_async()
            .await;
        let client = client(&server);

        let err = client.login().await.unwrap_err();

        assert!(err.is_authentication());
        assert!(!client.is_logged_in().await);
    }

    #[tokio::test]
    async fn should_require_login_before_fetching() {
        let server = Server::new_async().await;
        let client = client(&server);

        let err = client.beds_with_sleeper_status().await.unwrap_err();

        assert!(err.is_authentication());
    }

    #[tokio::test]
    async fn should_merge_monitoring_endpoints_into_beds() {
        let mut server = Server::new_async().await;
        let client = logged_in(&mut server).await;
        let _beds = server
            .mock("GET", "/rest/bed")
            .match_query(with_key())
            .with_body(r#"{"beds":[{"bedId":"b1","name":"Master","base":"","sleeperLeftId":"s1","sleeperRightId":"0"}]}"#)
            .create_async()
            .await;
        let _family = server
            .mock("GET", "/rest/bed/familyStatus")
            .match_query(with_key())
            .with_body(r#"{"beds":[{"bedId":"b1","leftSide":{"isInBed":true,"sleepNumber":40},"rightSide":{"isInBed":false}}]}"#)
            .create_async()
            .await;
        let _sleepers = server
            .mock("GET", "/rest/sleeper")
            .match_query(with_key())
            .with_body(r#"{"sleepers":[{"sleeperId":"s1","firstName":"Ann","sleepGoal":480}]}"#)
            .create_async()
            .await;

        let beds = client.beds_with_sleeper_status().await.unwrap();

        assert_eq!(beds.len(), 1);
        assert_eq!(beds[0].name, "Master");
        assert!(beds[0].left.is_in_bed);
        assert_eq!(beds[0].left.sleeper.as_ref().unwrap().first_name, "Ann");
        assert!(beds[0].right.sleeper.is_none());
    }

    #[tokio::test]
    async fn should_map_expired_session_to_authentication_error() {
        let mut server = Server::new_async().await;
        let client = logged_in(&mut server).await;
        let _expired = server
            .mock("GET", "/rest/bed")
            .match_query(with_key())
            .with_status(401)
            .create_async()
            .await;

        let err = client.beds_with_sleeper_status().await.unwrap_err();

        assert!(err.is_authentication());
    }

    #[tokio::test]
    async fn should_map_server_error_to_transport_error() {
        let mut server = Server::new_async().await;
        let client = logged_in(&mut server).await;
        let _unavailable = server
            .mock("GET", "/rest/bed")
            .match_query(with_key())
            .with_status(503)
            .with_body("maintenance")
            .create_async()
            .await;

        let err = client.beds_with_sleeper_status().await.unwrap_err();

        assert!(matches!(err, RemoteError::Transport(message) if message.contains("maintenance")));
    }

    #[tokio::test]
    async fn should_map_malformed_body_to_decode_error() {
        let mut server = Server::new_async().await;
        let client = logged_in(&mut server).await;
        let _garbled = server
            .mock("GET", "/rest/bed/b1/foundation/status")
            .match_query(with_key())
            .with_body("not json")
            .create_async()
            .await;

        let err = client.foundation_status(&BedId::new("b1")).await.unwrap_err();

        assert!(matches!(err, RemoteError::Decode(_)));
    }

    #[tokio::test]
    async fn should_fetch_foundation_status_and_features() {
        let mut server = Server::new_async().await;
        let client = logged_in(&mut server).await;
        let _status = server
            .mock("GET", "/rest/bed/b1/foundation/status")
            .match_query(with_key())
            .with_body(r#"{"fsLeftHeadPosition":"64","fsConfigured":true,"fsType":"Split King"}"#)
            .create_async()
            .await;
        let _system = server
            .mock("GET", "/rest/bed/b1/foundation/system")
            .match_query(with_key())
            .with_body(r#"{"fsBoardFeatures":"04"}"#)
            .create_async()
            .await;
        let bed_id = BedId::new("b1");

        let status = client.foundation_status(&bed_id).await.unwrap();
        let features = client.foundation_features(&bed_id).await.unwrap();

        assert_eq!(status.position(BedSide::Left, Actuator::Head), Ok(100));
        assert!(status.configured);
        assert!(features.has_foot_control);
    }

    #[tokio::test]
    async fn should_send_sleep_number_command() {
        let mut server = Server::new_async().await;
        let client = logged_in(&mut server).await;
        let command = server
            .mock("PUT", "/rest/bed/b1/sleepNumber")
            .match_query(with_key())
            .match_body(Matcher::Json(serde_json::json!({
                "bed": "b1",
                "side": "R",
                "sleepNumber": 55
            })))
            .with_status(200)
            .create_async()
            .await;

        client
            .set_sleep_number(&BedId::new("b1"), BedSide::Right, SleepNumber::new(55).unwrap())
            .await
            .unwrap();

        command.assert_async().await;
    }

    #[tokio::test]
    async fn should_send_preset_and_position_commands() {
        let mut server = Server::new_async().await;
        let client = logged_in(&mut server).await;
        let preset = server
            .mock("PUT", "/rest/bed/b1/foundation/preset")
            .match_query(with_key())
            .match_body(Matcher::Json(serde_json::json!({
                "speed": 1,
                "preset": 2,
                "side": "L"
            })))
            .create_async()
            .await;
        let position = server
            .mock("PUT", "/rest/bed/b1/foundation/adjustment/micro")
            .match_query(with_key())
            .match_body(Matcher::Json(serde_json::json!({
                "position": 30,
                "side": "L",
                "actuator": "F",
                "speed": 0
            })))
            .create_async()
            .await;
        let bed_id = BedId::new("b1");

        client
            .set_preset(&bed_id, BedSide::Left, Preset::Read, Speed::Slow)
            .await
            .unwrap();
        client
            .set_foundation_position(
                &bed_id,
                BedSide::Left,
                Actuator::Foot,
                BasePosition::clamped(30),
                Speed::Fast,
            )
            .await
            .unwrap();

        preset.assert_async().await;
        position.assert_async().await;
    }

    #[tokio::test]
    async fn should_keep_live_session_when_credential_check_fails() {
        let mut server = Server::new_async().await;
        let client = logged_in(&mut server).await;
        let _unavailable = server
            .mock("PUT", "/rest/login")
            .with_status(503)
            .create_async()
            .await;
        let status = server
            .mock("GET", "/rest/bed/b1/foundation/status")
            .match_query(with_key())
            .with_body(r#"{"fsConfigured":true}"#)
            .create_async()
            .await;

        let err = client
            .check_credentials(&Credentials::new("other@example.com", "secret"))
            .await
            .unwrap_err();

        assert!(matches!(err, RemoteError::Transport(_)));
        assert!(client.is_logged_in().await);
        client.foundation_status(&BedId::new("b1")).await.unwrap();
        status.assert_async().await;
    }

    #[tokio::test]
    async fn should_check_submitted_credentials_without_replacing_session_key() {
        let mut server = Server::new_async().await;
        let client = logged_in(&mut server).await;
        let check = server
            .mock("PUT", "/rest/login")
            .match_body(Matcher::Json(serde_json::json!({
                "login": "other@example.com",
                "password": "hunter2"
            })))
            .with_body(r#"{"key":"other-key"}"#)
            .expect(1)
            .create_async()
            .await;
        let status = server
            .mock("GET", "/rest/bed/b1/foundation/status")
            .match_query(with_key())
            .with_body(r#"{"fsConfigured":true}"#)
            .create_async()
            .await;

        client
            .check_credentials(&Credentials::new("other@example.com", "hunter2"))
            .await
            .unwrap();
        client.foundation_status(&BedId::new("b1")).await.unwrap();

        check.assert_async().await;
        status.assert_async().await;
    }

    #[tokio::test]
    async fn should_report_refused_credentials_as_authentication_error() {
        let mut server = Server::new_async().await;
        let client = logged_in(&mut server).await;
        let _refused = server
            .mock("PUT", "/rest/login")
            .with_status(401)
            .create_async()
            .await;

        let err = client
            .check_credentials(&Credentials::new("other@example.com", "wrong"))
            .await
            .unwrap_err();

        assert!(err.is_authentication());
        assert!(client.is_logged_in().await);
    }

    #[test]
    fn should_add_trailing_slash_to_base_url() {
        let url = base_url("https://example.com/rest").unwrap();
        assert_eq!(url.join("bed").unwrap().as_str(), "https://example.com/rest/bed");
    }
}
