use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use super::{deserialize_duration_from_ms, deserialize_duration_from_seconds};
use crate::engine::lifecycle::AlertTiming;

/// Provides the default value for touch_acceptance_delay_ms.
fn default_touch_acceptance_delay() -> Duration {
    Duration::from_millis(120)
}

/// Provides the default value for auto_dismiss_ms.
fn default_auto_dismiss() -> Duration {
    Duration::from_millis(5_000)
}

/// Provides the default value for snooze_length_ms.
fn default_snooze_length() -> Duration {
    Duration::from_millis(60_000)
}

/// Provides the default value for command_channel_capacity.
fn default_command_channel_capacity() -> u32 {
    256
}

/// Provides the default value for shutdown_timeout_secs.
fn default_shutdown_timeout() -> Duration {
    Duration::from_secs(30)
}

/// Application configuration for Headsup.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Grace period after posting before user touches are accepted.
    #[serde(
        deserialize_with = "deserialize_duration_from_ms",
        default = "default_touch_acceptance_delay"
    )]
    pub touch_acceptance_delay_ms: Duration,

    /// Requested auto-dismiss delay, before the accessibility floor.
    #[serde(deserialize_with = "deserialize_duration_from_ms", default = "default_auto_dismiss")]
    pub auto_dismiss_ms: Duration,

    /// How long a package stays snoozed after snoozing all alerts.
    #[serde(deserialize_with = "deserialize_duration_from_ms", default = "default_snooze_length")]
    pub snooze_length_ms: Duration,

    /// Accessibility-recommended minimum display time; zero disables the
    /// floor.
    #[serde(deserialize_with = "deserialize_duration_from_ms", default)]
    pub accessibility_minimum_ms: Duration,

    /// The user snooze records are evaluated against.
    #[serde(default)]
    pub user: i64,

    /// The capacity of the command channel feeding the worker task.
    #[serde(default = "default_command_channel_capacity")]
    pub command_channel_capacity: u32,

    /// The maximum time in seconds to wait for graceful shutdown.
    #[serde(
        deserialize_with = "deserialize_duration_from_seconds",
        default = "default_shutdown_timeout"
    )]
    pub shutdown_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            touch_acceptance_delay_ms: default_touch_acceptance_delay(),
            auto_dismiss_ms: default_auto_dismiss(),
            snooze_length_ms: default_snooze_length(),
            accessibility_minimum_ms: Duration::ZERO,
            user: 0,
            command_channel_capacity: default_command_channel_capacity(),
            shutdown_timeout: default_shutdown_timeout(),
        }
    }
}

impl AppConfig {
    /// Creates a new `AppConfig` by reading from the configuration directory.
    pub fn new(config_dir: Option<&str>) -> Result<Self, ConfigError> {
        let config_dir_str = config_dir.unwrap_or("configs");
        let s = Config::builder()
            .add_source(File::with_name(&format!("{}/alerts.yaml", config_dir_str)).required(false))
            .add_source(Environment::with_prefix("HEADSUP").separator("__"))
            .build()?;
        s.try_deserialize()
    }

    /// The timing inputs the lifecycle manager consumes.
    pub fn timing(&self) -> AlertTiming {
        AlertTiming {
            touch_acceptance_delay: self.touch_acceptance_delay_ms,
            auto_dismiss: self.auto_dismiss_ms,
            snooze_length: self.snooze_length_ms,
        }
    }
}
