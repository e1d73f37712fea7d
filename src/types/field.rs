// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Thermostat fields addressable through the API.

use std::fmt;

/// A field of the vendor's `Thermostat` object.
///
/// The serde names match the element names used on the wire, so field
/// groups can be written in configuration files as they appear in the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    /// Current temperature.
    Temperature,
    /// Relative humidity.
    Humidity,
    /// CO2 concentration in ppm.
    Co2Level,
    /// HVAC system mode.
    System,
    /// Heating setpoint.
    HeatSetting,
    /// Cooling setpoint.
    CoolSetting,
}

impl Field {
    /// Returns the element name used by the API.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Temperature => "temperature",
            Self::Humidity => "humidity",
            Self::Co2Level => "co2Level",
            Self::System => "system",
            Self::HeatSetting => "heatSetting",
            Self::CoolSetting => "coolSetting",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
