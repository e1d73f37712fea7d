// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Configuration types for the thermostat coordinator.

use std::time::Duration;

use serde::Deserialize;

use crate::error::DeviceError;
use crate::protocol::Credentials;
use crate::types::{Field, PollInterval};

/// Endpoint of the vendor's public demo site.
pub const DEFAULT_BASE_URL: &str = "https://demo.officeclimatecontrol.net/api.cgi";

/// Configuration for a thermostat coordinator.
///
/// Immutable once the coordinator is built; the poller and the command
/// gateway share it read-only.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use pelican_lib::coordinator::ThermostatConfig;
/// use pelican_lib::types::PollInterval;
///
/// let config = ThermostatConfig::new("user@example.com", "secret", "Lobby")
///     .with_poll_interval(PollInterval::new(60).unwrap())
///     .with_core_timeout(Duration::from_secs(10));
///
/// assert_eq!(config.thermostat_name(), "Lobby");
/// assert!(config.validate().is_ok());
/// ```
///
/// Configuration can also be deserialized; omitted settings get their
/// defaults:
///
/// ```
/// use pelican_lib::coordinator::{ThermostatConfig, DEFAULT_BASE_URL};
///
/// let json = r#"{
///     "username": "user@example.com",
///     "password": "secret",
///     "thermostat_name": "Lobby",
///     "poll_interval": 120
/// }"#;
/// let config: ThermostatConfig = serde_json::from_str(json).unwrap();
/// assert_eq!(config.base_url(), DEFAULT_BASE_URL);
/// assert_eq!(config.poll_interval().as_secs(), 120);
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct ThermostatConfig {
    #[serde(flatten)]
    credentials: Credentials,
    #[serde(default = "default_base_url")]
    base_url: String,
    thermostat_name: String,
    #[serde(default)]
    poll_interval: PollInterval,
    #[serde(skip)]
    timeouts: Timeouts,
    #[serde(default)]
    fields: FieldGroups,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl ThermostatConfig {
    /// Creates a configuration with default endpoint, interval and timeouts.
    #[must_use]
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        thermostat_name: impl Into<String>,
    ) -> Self {
        Self {
            credentials: Credentials::new(username, password),
            base_url: default_base_url(),
            thermostat_name: thermostat_name.into(),
            poll_interval: PollInterval::default(),
            timeouts: Timeouts::default(),
            fields: FieldGroups::default(),
        }
    }

    /// Sets the API endpoint.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the poll interval.
    #[must_use]
    pub fn with_poll_interval(mut self, interval: PollInterval) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Sets all timeouts at once.
    #[must_use]
    pub fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Sets the timeout of the mandatory fetch.
    #[must_use]
    pub fn with_core_timeout(mut self, timeout: Duration) -> Self {
        self.timeouts.core_fetch = timeout;
        self
    }

    /// Sets the timeout of the optional fetch.
    #[must_use]
    pub fn with_optional_timeout(mut self, timeout: Duration) -> Self {
        self.timeouts.optional_fetch = timeout;
        self
    }

    /// Sets the timeout of `set` requests.
    #[must_use]
    pub fn with_command_timeout(mut self, timeout: Duration) -> Self {
        self.timeouts.command = timeout;
        self
    }

    /// Sets which fields are fetched by the mandatory and optional queries.
    #[must_use]
    pub fn with_fields(mut self, fields: FieldGroups) -> Self {
        self.fields = fields;
        self
    }

    /// Returns the credentials.
    #[must_use]
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Returns the API endpoint.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the logical name of the thermostat.
    #[must_use]
    pub fn thermostat_name(&self) -> &str {
        &self.thermostat_name
    }

    /// Returns the poll interval.
    #[must_use]
    pub fn poll_interval(&self) -> PollInterval {
        self.poll_interval
    }

    /// Returns the timeouts.
    #[must_use]
    pub fn timeouts(&self) -> &Timeouts {
        &self.timeouts
    }

    /// Returns the field grouping.
    #[must_use]
    pub fn fields(&self) -> &FieldGroups {
        &self.fields
    }

    /// Checks the configuration for values the API cannot work with.
    ///
    /// # Errors
    ///
    /// Returns `DeviceError::InvalidConfiguration` if the username or
    /// thermostat name is blank, the base URL is not HTTP(S), or the
    /// mandatory field group is empty.
    pub fn validate(&self) -> Result<(), DeviceError> {
        if self.credentials.username.trim().is_empty() {
            return Err(DeviceError::InvalidConfiguration(
                "username is required".to_string(),
            ));
        }
        if self.thermostat_name.trim().is_empty() {
            return Err(DeviceError::InvalidConfiguration(
                "thermostat name is required".to_string(),
            ));
        }
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(DeviceError::InvalidConfiguration(format!(
                "base URL must use http or https: {}",
                self.base_url
            )));
        }
        if self.fields.core.is_empty() {
            return Err(DeviceError::InvalidConfiguration(
                "at least one core field is required".to_string(),
            ));
        }
        Ok(())
    }
}

/// Per-request timeouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// Mandatory fetch. Expiry yields a stale snapshot, not an error.
    pub core_fetch: Duration,
    /// Optional fetch. Any failure is swallowed.
    pub optional_fetch: Duration,
    /// `set` requests. Expiry is treated as success.
    pub command: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            core_fetch: Duration::from_secs(15),
            optional_fetch: Duration::from_secs(10),
            command: Duration::from_secs(20),
        }
    }
}

/// Split of thermostat fields between the two sub-queries of a poll cycle.
///
/// Device firmwares differ in which fields they serve reliably, so the
/// grouping is configurable. The `core` query is mandatory; the `optional`
/// query is best effort and skipped when empty.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FieldGroups {
    /// Fields of the mandatory query.
    pub core: Vec<Field>,
    /// Fields of the optional query.
    pub optional: Vec<Field>,
}

impl Default for FieldGroups {
    fn default() -> Self {
        Self {
            core: vec![Field::Temperature, Field::Humidity, Field::Co2Level],
            optional: vec![Field::System, Field::HeatSetting, Field::CoolSetting],
        }
    }
}
