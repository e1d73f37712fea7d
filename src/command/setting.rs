// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Thermostat setting commands.

use crate::command::Command;
use crate::error::ValueError;
use crate::types::{Field, SystemMode};

/// A single field assignment sent with a `set` request.
///
/// # Examples
///
/// ```
/// use pelican_lib::command::{Command, CommandRequest};
/// use pelican_lib::types::SystemMode;
///
/// let mode = CommandRequest::SystemMode(SystemMode::Cool);
/// assert_eq!(mode.to_value_param(), "system:Cool");
///
/// let heat = CommandRequest::heat_setting(68.5).unwrap();
/// assert_eq!(heat.to_value_param(), "heatSetting:68.5");
///
/// assert!(CommandRequest::cool_setting(f64::NAN).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CommandRequest {
    /// Set the HVAC system mode.
    SystemMode(SystemMode),
    /// Set the heating setpoint.
    HeatSetting(f64),
    /// Set the cooling setpoint.
    CoolSetting(f64),
}

impl CommandRequest {
    /// Creates a heating setpoint command.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidTemperature` if `temperature` is not finite.
    pub fn heat_setting(temperature: f64) -> Result<Self, ValueError> {
        check_finite(temperature).map(Self::HeatSetting)
    }

    /// Creates a cooling setpoint command.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidTemperature` if `temperature` is not finite.
    pub fn cool_setting(temperature: f64) -> Result<Self, ValueError> {
        check_finite(temperature).map(Self::CoolSetting)
    }
}

impl Command for CommandRequest {
    fn field(&self) -> Field {
        match self {
            Self::SystemMode(_) => Field::System,
            Self::HeatSetting(_) => Field::HeatSetting,
            Self::CoolSetting(_) => Field::CoolSetting,
        }
    }

    fn value(&self) -> String {
        match self {
            Self::SystemMode(mode) => mode.as_str().to_string(),
            Self::HeatSetting(t) | Self::CoolSetting(t) => format_temperature(*t),
        }
    }
}

fn check_finite(temperature: f64) -> Result<f64, ValueError> {
    if temperature.is_finite() {
        Ok(temperature)
    } else {
        Err(ValueError::InvalidTemperature(temperature))
    }
}

/// Formats a setpoint with at least one decimal place (`72` -> `72.0`).
#[allow(clippy::float_cmp)]
fn format_temperature(temperature: f64) -> String {
    if temperature.fract() == 0.0 {
        format!("{temperature:.1}")
    } else {
        temperature.to_string()
    }
}
