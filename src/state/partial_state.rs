// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Partial state decoded from a single sub-query.

use crate::types::SystemMode;

/// Thermostat fields returned by one sub-query.
///
/// A `None` field means the device did not report it. When the whole
/// sub-query failed, [`fetch_failed`](Self::fetch_failed) is set and every
/// field is `None`; such a record never contributes to a merge.
///
/// # Examples
///
/// ```
/// use pelican_lib::state::PartialState;
///
/// let part = PartialState {
///     temperature: Some(71.0),
///     humidity: Some(40.0),
///     ..PartialState::default()
/// };
/// assert!(!part.is_empty());
/// assert!(PartialState::failed().fetch_failed);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartialState {
    /// Current temperature.
    pub temperature: Option<f64>,
    /// Relative humidity in percent.
    pub humidity: Option<f64>,
    /// CO2 level in ppm.
    pub co2_level: Option<u32>,
    /// HVAC system mode.
    pub system_mode: Option<SystemMode>,
    /// Heating setpoint.
    pub heat_setting: Option<f64>,
    /// Cooling setpoint.
    pub cool_setting: Option<f64>,
    /// The sub-query as a whole failed (transport or decode error).
    pub fetch_failed: bool,
}

impl PartialState {
    /// Creates a record with no fields, as returned for a soft API failure.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a record marking a failed sub-query.
    #[must_use]
    pub fn failed() -> Self {
        Self {
            fetch_failed: true,
            ..Self::default()
        }
    }

    /// Returns `true` if no field is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.temperature.is_none()
            && self.humidity.is_none()
            && self.co2_level.is_none()
            && self.system_mode.is_none()
            && self.heat_setting.is_none()
            && self.cool_setting.is_none()
    }
}
