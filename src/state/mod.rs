// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Thermostat state types.
//!
//! The [`DeviceSnapshot`] struct is the cached view of the thermostat, while
//! [`PartialState`] is what a single sub-query decodes to. [`merge`] folds
//! the partial records of one poll cycle into the previous snapshot.
//!
//! # Examples
//!
//! ```
//! use pelican_lib::state::{DeviceSnapshot, PartialState, merge};
//!
//! let base = DeviceSnapshot::new();
//! let merged = merge(base, &[PartialState {
//!     co2_level: Some(640),
//!     ..PartialState::default()
//! }]);
//!
//! assert_eq!(merged.co2_level(), Some(640));
//! ```

mod device_snapshot;
mod merge;
mod partial_state;

pub use device_snapshot::DeviceSnapshot;
pub use merge::merge;
pub use partial_state::PartialState;
