// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Merging partial records into a snapshot.

use super::{DeviceSnapshot, PartialState};

/// Combines `parts` on top of `base` and returns the merged snapshot.
///
/// Parts are applied in the given order. A field present in a part
/// overwrites the running value; an absent field leaves it alone, so no
/// part can clear a known value. Failed parts contribute nothing. The
/// bookkeeping fields (`last_success`, `last_update_succeeded`) are carried
/// over from `base` unchanged.
///
/// # Examples
///
/// ```
/// use pelican_lib::state::{DeviceSnapshot, PartialState, merge};
/// use pelican_lib::types::SystemMode;
///
/// let core = PartialState {
///     temperature: Some(71.0),
///     humidity: Some(40.0),
///     ..PartialState::default()
/// };
/// let optional = PartialState {
///     system_mode: Some(SystemMode::Heat),
///     heat_setting: Some(68.0),
///     ..PartialState::default()
/// };
///
/// let merged = merge(DeviceSnapshot::new(), &[core, optional]);
/// assert_eq!(merged.temperature(), Some(71.0));
/// assert_eq!(merged.system_mode(), Some(SystemMode::Heat));
/// ```
#[must_use]
pub fn merge(base: DeviceSnapshot, parts: &[PartialState]) -> DeviceSnapshot {
    parts.iter().fold(base, |mut snapshot, part| {
        snapshot.apply(part);
        snapshot
    })
}
