// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Response decoding for the thermostat's XML replies.
//!
//! Replies are shaped as:
//!
//! ```xml
//! <response>
//!   <success>1</success>
//!   <Thermostat>
//!     <temperature>71</temperature>
//!     <humidity>40</humidity>
//!   </Thermostat>
//! </response>
//! ```
//!
//! The API signals failure softly with `<success>0</success>`; that is
//! decoded as "no data", never as an error. Only a body that is not
//! well-formed XML is an error.

mod ack;
mod thermostat;

pub use ack::decode_set_ack;
pub use thermostat::{ApiResponse, decode_response, decode_state};

use roxmltree::Node;

/// Returns the first child element of `node` named `name`.
fn child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|n| n.is_element() && n.has_tag_name(name))
}

/// Returns the trimmed text of the child element `name`, if non-empty.
fn child_text<'a>(node: Node<'a, '_>, name: &str) -> Option<&'a str> {
    child(node, name)
        .and_then(|n| n.text())
        .map(str::trim)
        .filter(|text| !text.is_empty())
}

/// Returns `true` if the document root reports `<success>1</success>`.
fn is_success(root: Node<'_, '_>) -> bool {
    child_text(root, "success") == Some("1")
}
