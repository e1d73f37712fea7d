// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Transport to the thermostat API.
//!
//! The API is a single CGI endpoint driven entirely by GET query
//! parameters. A [`Transport`] performs one such request and hands back the
//! raw body; it never retries; callers decide what a failure means.
//!
//! - [`HttpTransport`]: production implementation over `reqwest`

mod http;

use std::fmt;
use std::future::Future;
use std::time::Duration;

pub use http::{HttpTransport, HttpTransportBuilder};

use crate::error::ProtocolError;

/// Encoded query parameters, in request order.
pub type QueryParams = Vec<(&'static str, String)>;

/// Static account credentials sent with every request.
///
/// The `Debug` output redacts the password.
#[derive(Clone, PartialEq, Eq, serde::Deserialize)]
pub struct Credentials {
    /// Account name (usually an e-mail address).
    pub username: String,
    /// Account password.
    pub password: String,
}

impl Credentials {
    /// Creates a credential pair.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Trait for issuing a single request to the thermostat API.
///
/// Implementations must honour `timeout` strictly and report expiry as
/// [`ProtocolError::Timeout`], a non-2xx status as
/// [`ProtocolError::HttpStatus`], and must not retry.
pub trait Transport: Send + Sync {
    /// Sends a GET request to `url` with `params` and returns the body.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the request times out, fails on the
    /// network, or gets a non-success status.
    fn fetch(
        &self,
        url: &str,
        params: &[(&'static str, String)],
        timeout: Duration,
    ) -> impl Future<Output = Result<String, ProtocolError>> + Send;
}
