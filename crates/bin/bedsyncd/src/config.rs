//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `bedsync.toml` in the working directory. Every field has a
//! default so the file is optional, but the account credentials must come
//! from somewhere. Environment variables take precedence over file values.

use std::fmt;
use std::time::Duration;

use serde::Deserialize;

use bedsync_adapter_sleepiq::SleepIqConfig;
use bedsync_app::services::poll_loop::PollConfig;
use bedsync_domain::account::Credentials;
use bedsync_domain::device::LocalDevice;
use bedsync_domain::error::BedSyncError;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// SleepIQ account.
    pub account: AccountConfig,
    /// Poll loop timing.
    pub polling: PollingConfig,
    /// SleepIQ client settings.
    pub sleepiq: SleepIqConfig,
    /// Bed devices mirrored by the host.
    pub devices: Vec<DeviceConfig>,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
    /// Raise every `bedsync` target to `DEBUG`.
    pub debug: bool,
}

#[derive(Default, Deserialize)]
#[serde(default)]
pub struct AccountConfig {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for AccountConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountConfig")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Poll loop timing.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    /// Seconds between two polls.
    pub interval_secs: u64,
    /// Polls after which a repeated error is logged again.
    pub reset_every: u32,
}

/// One local bed device and the bed it is bound to.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    pub id: String,
    pub name: String,
    pub bed_id: String,
    pub enabled: bool,
}

impl Config {
    /// Load configuration from `bedsync.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// result fails validation.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("bedsync.toml")?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("BEDSYNC_USERNAME") {
            self.account.username = val;
        }
        if let Ok(val) = std::env::var("BEDSYNC_PASSWORD") {
            self.account.password = val;
        }
        if let Ok(val) = std::env::var("BEDSYNC_HOST") {
            self.server.host = val;
        }
        if let Ok(val) = std::env::var("BEDSYNC_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Ok(val) = std::env::var("BEDSYNC_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if self.polling.interval_secs == 0 {
            return Err(ConfigError::Validation(
                "polling interval must be non-zero".to_string(),
            ));
        }
        if self.polling.reset_every == 0 {
            return Err(ConfigError::Validation(
                "polling reset_every must be non-zero".to_string(),
            ));
        }
        if self.sleepiq.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "sleepiq timeout must be non-zero".to_string(),
            ));
        }
        self.credentials()
            .validate()
            .map_err(|err| ConfigError::Validation(err.to_string()))?;
        self.local_devices()
            .map_err(|err| ConfigError::Validation(format!("{err}: {}", error_detail(&err))))?;
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Account credentials, as configured.
    #[must_use]
    pub fn credentials(&self) -> Credentials {
        Credentials::new(&self.account.username, &self.account.password)
    }

    #[must_use]
    pub fn poll_config(&self) -> PollConfig {
        PollConfig {
            interval: Duration::from_secs(self.polling.interval_secs),
            reset_every: self.polling.reset_every,
        }
    }

    /// Build the local device records the store is seeded with.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a device with an empty id or `bed_id`.
    pub fn local_devices(&self) -> Result<Vec<LocalDevice>, BedSyncError> {
        self.devices
            .iter()
            .map(|device| {
                LocalDevice::builder()
                    .id(device.id.as_str())
                    .name(device.name.as_str())
                    .enabled(device.enabled)
                    .bed_id(device.bed_id.as_str())
                    .build()
            })
            .collect()
    }
}

fn error_detail(err: &BedSyncError) -> String {
    std::error::Error::source(err).map_or_else(String::new, ToString::to_string)
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "bedsync=info,tower_http=debug".to_string(),
            debug: false,
        }
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        let defaults = PollConfig::default();
        Self {
            interval_secs: defaults.interval.as_secs(),
            reset_every: defaults.reset_every,
        }
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            bed_id: String::new(),
            enabled: true,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use bedsync_domain::device::keys;

    fn valid() -> Config {
        let mut config = Config::default();
        config.account.username = "me@example.com".to_string();
        config.account.password = "secret".to_string();
        config
    }

    #[test]
    fn should_produce_sensible_defaults() {
        let config = Config::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.polling.interval_secs, 30);
        assert_eq!(config.polling.reset_every, 20);
        assert!(!config.logging.debug);
        assert!(config.devices.is_empty());
    }

    #[test]
    fn should_parse_minimal_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn should_parse_full_toml() {
        let toml = "
            [server]
            host = '127.0.0.1'
            port = 9090

            [logging]
            filter = 'debug'
            debug = true

            [account]
            username = 'me@example.com'
            password = 'secret'

            [polling]
            interval_secs = 60
            reset_every = 10

            [sleepiq]
            base_url = 'http://localhost:8080/rest/'
            timeout_secs = 3

            [[devices]]
            id = '101'
            name = 'Master Bed'
            bed_id = 'bed-1'

            [[devices]]
            id = '102'
            bed_id = 'bed-2'
            enabled = false
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.logging.filter, "debug");
        assert!(config.logging.debug);
        assert_eq!(config.account.username, "me@example.com");
        assert_eq!(config.polling.interval_secs, 60);
        assert_eq!(config.sleepiq.base_url, "http://localhost:8080/rest/");
        assert_eq!(config.sleepiq.timeout_secs, 3);
        assert_eq!(config.devices.len(), 2);
        assert!(config.devices[0].enabled);
        assert!(!config.devices[1].enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn should_return_default_when_file_not_found() {
        let config = Config::from_file("nonexistent.toml").unwrap();
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn should_reject_zero_port() {
        let mut config = valid();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_zero_interval_and_reset() {
        let mut config = valid();
        config.polling.interval_secs = 0;
        assert!(config.validate().is_err());

        let mut config = valid();
        config.polling.reset_every = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_zero_sleepiq_timeout() {
        let mut config = valid();
        config.sleepiq.timeout_secs = 0;

        let err = config.validate().unwrap_err();

        assert!(matches!(err, ConfigError::Validation(message) if message.contains("timeout")));
    }

    #[test]
    fn should_reject_missing_credentials() {
        let err = Config::default().validate().unwrap_err();
        assert!(matches!(err, ConfigError::Validation(message) if message.contains("username")));
    }

    #[test]
    fn should_reject_device_without_bed_id() {
        let mut config = valid();
        config.devices.push(DeviceConfig {
            id: "101".to_string(),
            ..DeviceConfig::default()
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_build_local_devices_bound_to_their_beds() {
        let mut config = valid();
        config.devices.push(DeviceConfig {
            id: "101".to_string(),
            name: "Master Bed".to_string(),
            bed_id: "bed-1".to_string(),
            enabled: false,
        });

        let devices = config.local_devices().unwrap();

        assert_eq!(devices[0].id.as_str(), "101");
        assert_eq!(devices[0].properties[keys::BED_ID], "bed-1".into());
        assert!(!devices[0].enabled);
    }

    #[test]
    fn should_convert_polling_section_into_loop_timing() {
        let mut config = valid();
        config.polling.interval_secs = 45;
        assert_eq!(config.poll_config().interval, Duration::from_secs(45));
        assert_eq!(config.poll_config().reset_every, 20);
    }

    #[test]
    fn should_format_bind_addr() {
        let config = Config::default();
        assert_eq!(config.bind_addr(), "0.0.0.0:3000");
    }

    #[test]
    fn should_hide_password_in_debug_output() {
        let config = valid();
        let printed = format!("{:?}", config.account);
        assert!(!printed.contains("secret"));
    }

    #[test]
    fn should_report_parse_error_for_invalid_toml() {
        let result: Result<Config, _> = toml::from_str("invalid {{{");
        assert!(result.is_err());
    }
}
