// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Decoding of `set` acknowledgements.

use roxmltree::Document;

use super::is_success;

/// Decodes the reply to a `set` request.
///
/// Returns `true` for `<success>1</success>` and `false` for any other
/// well-formed reply. A body that does not parse as XML is treated as
/// success: the thermostat's set acknowledgement is unreliable and often
/// arrives garbled even though the value was applied.
///
/// # Examples
///
/// ```
/// use pelican_lib::response::decode_set_ack;
///
/// assert!(decode_set_ack("<response><success>1</success></response>"));
/// assert!(!decode_set_ack("<response><success>0</success></response>"));
/// assert!(decode_set_ack("OK"));
/// ```
#[must_use]
pub fn decode_set_ack(body: &str) -> bool {
    match Document::parse(body) {
        Ok(doc) => is_success(doc.root_element()),
        Err(e) => {
            tracing::warn!(error = %e, "Could not parse set response, assuming success");
            true
        }
    }
}
