// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for thermostat control.
//!
//! # Types
//!
//! - [`Field`] - Wire names of the `Thermostat` object fields
//! - [`SystemMode`] - Off/Heat/Cool/Auto
//! - [`PollInterval`] - Refresh cadence (30-300 seconds)

mod field;
mod poll_interval;
mod system_mode;

pub use field::Field;
pub use poll_interval::PollInterval;
pub use system_mode::SystemMode;
