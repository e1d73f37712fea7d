// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Poll interval type for the refresh cadence.
//!
//! This module provides a type-safe representation of the poll interval,
//! ensuring values are always within the range the vendor API tolerates.

use std::fmt;
use std::time::Duration;

use crate::error::ValueError;

/// Time between two scheduled poll cycles, in whole seconds (30-300).
///
/// # Examples
///
/// ```
/// use pelican_lib::types::PollInterval;
///
/// let interval = PollInterval::new(60).unwrap();
/// assert_eq!(interval.as_secs(), 60);
///
/// // Out of range values are rejected...
/// assert!(PollInterval::new(20).is_err());
///
/// // ...or clamped on request
/// assert_eq!(PollInterval::clamped(20), PollInterval::MIN);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct PollInterval(u64);

impl PollInterval {
    /// Shortest allowed interval (30 seconds).
    pub const MIN: Self = Self(30);

    /// Longest allowed interval (300 seconds).
    pub const MAX: Self = Self(300);

    /// Default interval (70 seconds).
    pub const DEFAULT: Self = Self(70);

    /// Creates a new poll interval.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if `secs` is outside 30-300.
    pub fn new(secs: u64) -> Result<Self, ValueError> {
        if !(Self::MIN.0..=Self::MAX.0).contains(&secs) {
            return Err(ValueError::OutOfRange {
                min: Self::MIN.0,
                max: Self::MAX.0,
                actual: secs,
            });
        }
        Ok(Self(secs))
    }

    /// Creates a poll interval, clamping to the valid range.
    #[must_use]
    pub const fn clamped(secs: u64) -> Self {
        if secs < Self::MIN.0 {
            Self::MIN
        } else if secs > Self::MAX.0 {
            Self::MAX
        } else {
            Self(secs)
        }
    }

    /// Returns the interval in seconds.
    #[must_use]
    pub const fn as_secs(&self) -> u64 {
        self.0
    }

    /// Returns the interval as a [`Duration`].
    #[must_use]
    pub const fn as_duration(&self) -> Duration {
        Duration::from_secs(self.0)
    }
}

impl Default for PollInterval {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for PollInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

impl TryFrom<u64> for PollInterval {
    type Error = ValueError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<Duration> for PollInterval {
    type Error = ValueError;

    fn try_from(value: Duration) -> Result<Self, Self::Error> {
        Self::new(value.as_secs())
    }
}

impl From<PollInterval> for u64 {
    fn from(value: PollInterval) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_are_inclusive() {
        assert_eq!(PollInterval::new(30).unwrap(), PollInterval::MIN);
        assert_eq!(PollInterval::new(300).unwrap(), PollInterval::MAX);
    }

    #[test]
    fn below_minimum_is_rejected() {
        let err = PollInterval::new(20).unwrap_err();
        assert_eq!(
            err,
            ValueError::OutOfRange {
                min: 30,
                max: 300,
                actual: 20
            }
        );
    }

    #[test]
    fn above_maximum_is_rejected() {
        assert!(PollInterval::new(301).is_err());
    }

    #[test]
    fn clamped_values() {
        assert_eq!(PollInterval::clamped(20).as_secs(), 30);
        assert_eq!(PollInterval::clamped(0).as_secs(), 30);
        assert_eq!(PollInterval::clamped(90).as_secs(), 90);
        assert_eq!(PollInterval::clamped(10_000).as_secs(), 300);
    }

    #[test]
    fn default_is_seventy_seconds() {
        assert_eq!(PollInterval::default().as_duration(), Duration::from_secs(70));
    }

    #[test]
    fn from_duration() {
        let interval = PollInterval::try_from(Duration::from_secs(120)).unwrap();
        assert_eq!(interval.as_secs(), 120);
        assert!(PollInterval::try_from(Duration::from_millis(500)).is_err());
    }

    #[test]
    fn display() {
        assert_eq!(PollInterval::new(45).unwrap().to_string(), "45s");
    }
}
