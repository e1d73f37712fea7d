// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Cached thermostat snapshot.

use chrono::{DateTime, Utc};

use super::PartialState;
use crate::types::SystemMode;

/// The coordinator's merged view of the thermostat.
///
/// All data fields are optional because nothing is known until the device
/// reports it. Once a field has been observed it keeps its value until a
/// later poll reports a new one; failed or timed-out sub-queries never
/// clear it.
///
/// # Examples
///
/// ```
/// use pelican_lib::state::{DeviceSnapshot, PartialState};
///
/// let mut snapshot = DeviceSnapshot::new();
/// snapshot.apply(&PartialState {
///     temperature: Some(70.5),
///     ..PartialState::default()
/// });
/// assert_eq!(snapshot.temperature(), Some(70.5));
///
/// // Absent fields leave known values alone
/// snapshot.apply(&PartialState::empty());
/// assert_eq!(snapshot.temperature(), Some(70.5));
/// ```
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct DeviceSnapshot {
    /// Current temperature.
    temperature: Option<f64>,
    /// Relative humidity in percent.
    humidity: Option<f64>,
    /// CO2 level in ppm.
    co2_level: Option<u32>,
    /// HVAC system mode.
    system_mode: Option<SystemMode>,
    /// Heating setpoint.
    heat_setting: Option<f64>,
    /// Cooling setpoint.
    cool_setting: Option<f64>,
    /// Start time of the last cycle that completed successfully.
    last_success: Option<DateTime<Utc>>,
    /// Whether the cycle that produced this snapshot succeeded.
    last_update_succeeded: bool,
}

impl DeviceSnapshot {
    /// Creates a new empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the current temperature.
    #[must_use]
    pub fn temperature(&self) -> Option<f64> {
        self.temperature
    }

    /// Gets the relative humidity.
    #[must_use]
    pub fn humidity(&self) -> Option<f64> {
        self.humidity
    }

    /// Gets the CO2 level in ppm.
    #[must_use]
    pub fn co2_level(&self) -> Option<u32> {
        self.co2_level
    }

    /// Gets the system mode.
    #[must_use]
    pub fn system_mode(&self) -> Option<SystemMode> {
        self.system_mode
    }

    /// Gets the heating setpoint.
    #[must_use]
    pub fn heat_setting(&self) -> Option<f64> {
        self.heat_setting
    }

    /// Gets the cooling setpoint.
    #[must_use]
    pub fn cool_setting(&self) -> Option<f64> {
        self.cool_setting
    }

    /// Gets the start time of the last successful cycle.
    #[must_use]
    pub fn last_success(&self) -> Option<DateTime<Utc>> {
        self.last_success
    }

    /// Returns `true` if the cycle that produced this snapshot succeeded.
    #[must_use]
    pub fn last_update_succeeded(&self) -> bool {
        self.last_update_succeeded
    }

    /// Returns `true` if no data field has been observed yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.temperature.is_none()
            && self.humidity.is_none()
            && self.co2_level.is_none()
            && self.system_mode.is_none()
            && self.heat_setting.is_none()
            && self.cool_setting.is_none()
    }

    /// Overwrites every field present in `part`.
    ///
    /// Absent fields are left untouched and failed parts are ignored.
    /// Returns `true` if any value actually changed.
    pub fn apply(&mut self, part: &PartialState) -> bool {
        if part.fetch_failed {
            return false;
        }

        let mut changed = false;
        changed |= overwrite(&mut self.temperature, part.temperature);
        changed |= overwrite(&mut self.humidity, part.humidity);
        changed |= overwrite(&mut self.co2_level, part.co2_level);
        changed |= overwrite(&mut self.system_mode, part.system_mode);
        changed |= overwrite(&mut self.heat_setting, part.heat_setting);
        changed |= overwrite(&mut self.cool_setting, part.cool_setting);
        changed
    }

    /// Records a successful cycle that started at `started_at`.
    pub(crate) fn mark_succeeded(&mut self, started_at: DateTime<Utc>) {
        self.last_success = Some(started_at);
        self.last_update_succeeded = true;
    }

    /// Marks this snapshot as stale, keeping every data field.
    pub(crate) fn mark_stale(&mut self) {
        self.last_update_succeeded = false;
    }
}

fn overwrite<T: PartialEq + Copy>(slot: &mut Option<T>, value: Option<T>) -> bool {
    match value {
        Some(v) if *slot != Some(v) => {
            *slot = Some(v);
            true
        }
        _ => false,
    }
}
