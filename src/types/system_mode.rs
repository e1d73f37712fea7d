// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HVAC system mode of the thermostat.

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;

/// Operating mode reported in, and written to, the `system` field.
///
/// # Examples
///
/// ```
/// use pelican_lib::types::SystemMode;
///
/// assert_eq!(SystemMode::Heat.as_str(), "Heat");
/// assert_eq!("cool".parse::<SystemMode>().unwrap(), SystemMode::Cool);
/// assert!("Fan".parse::<SystemMode>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum SystemMode {
    /// Heating and cooling are off.
    Off,
    /// Heating only.
    Heat,
    /// Cooling only.
    Cool,
    /// Automatic heat/cool changeover.
    Auto,
}

impl SystemMode {
    /// All modes, in the order the vendor documents them.
    pub const ALL: [Self; 4] = [Self::Off, Self::Heat, Self::Cool, Self::Auto];

    /// Returns the wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "Off",
            Self::Heat => "Heat",
            Self::Cool => "Cool",
            Self::Auto => "Auto",
        }
    }
}

impl fmt::Display for SystemMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SystemMode {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "OFF" => Ok(Self::Off),
            "HEAT" => Ok(Self::Heat),
            "COOL" => Ok(Self::Cool),
            "AUTO" => Ok(Self::Auto),
            _ => Err(ValueError::InvalidSystemMode(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("Heat".parse::<SystemMode>().unwrap(), SystemMode::Heat);
        assert_eq!("HEAT".parse::<SystemMode>().unwrap(), SystemMode::Heat);
        assert_eq!(" auto ".parse::<SystemMode>().unwrap(), SystemMode::Auto);
    }

    #[test]
    fn unknown_mode_is_rejected() {
        let err = "Emergency".parse::<SystemMode>().unwrap_err();
        assert_eq!(err, ValueError::InvalidSystemMode("Emergency".to_string()));
    }

    #[test]
    fn wire_names_parse_back() {
        for mode in SystemMode::ALL {
            assert_eq!(mode.as_str().parse::<SystemMode>().unwrap(), mode);
        }
    }

    #[test]
    fn display_matches_wire_name() {
        assert_eq!(SystemMode::Off.to_string(), "Off");
    }
}
