// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP transport for the thermostat API.

use std::time::Duration;

use reqwest::Client;

use crate::command::PARAM_PASSWORD;
use crate::error::ProtocolError;
use crate::protocol::{QueryParams, Transport};

/// HTTP transport for the Pelican `api.cgi` endpoint.
///
/// Every call is an independent GET request; the transport keeps no state
/// between calls apart from the underlying `reqwest` client.
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use pelican_lib::protocol::{HttpTransport, Transport};
///
/// # async fn example() -> Result<(), pelican_lib::ProtocolError> {
/// let transport = HttpTransport::new()?;
/// let params = vec![("request", "get".to_string())];
/// let body = transport
///     .fetch(
///         "https://demo.officeclimatecontrol.net/api.cgi",
///         &params,
///         Duration::from_secs(10),
///     )
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Timeout applied by the client when a caller passes a longer one.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

    /// Creates a transport with default settings.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn new() -> Result<Self, ProtocolError> {
        HttpTransportBuilder::new().build()
    }

    /// Returns a builder for a customized transport.
    #[must_use]
    pub fn builder() -> HttpTransportBuilder {
        HttpTransportBuilder::new()
    }
}

impl Transport for HttpTransport {
    async fn fetch(
        &self,
        url: &str,
        params: &[(&'static str, String)],
        timeout: Duration,
    ) -> Result<String, ProtocolError> {
        reqwest::Url::parse(url)
            .map_err(|e| ProtocolError::InvalidAddress(format!("{url}: {e}")))?;

        let full_url = build_url(url, params);
        let timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);

        tracing::debug!(url = %build_url(url, &redacted(params)), "Sending HTTP request");

        let request = async {
            let response = self.client.get(&full_url).timeout(timeout).send().await?;

            let status = response.status();
            if !status.is_success() {
                return Err(ProtocolError::HttpStatus {
                    status: status.as_u16(),
                });
            }

            Ok::<_, ProtocolError>(response.text().await?)
        };

        match tokio::time::timeout(timeout, request).await {
            Ok(Ok(body)) => {
                tracing::debug!(body = %body, "Received HTTP response");
                Ok(body)
            }
            Ok(Err(ProtocolError::Network(e))) if e.is_timeout() => {
                Err(ProtocolError::Timeout(timeout_ms))
            }
            Ok(Err(e)) => Err(e),
            Err(_) => Err(ProtocolError::Timeout(timeout_ms)),
        }
    }
}

/// Builds the request URL, percent-encoding every parameter value.
fn build_url(base: &str, params: &[(&'static str, String)]) -> String {
    if params.is_empty() {
        return base.to_string();
    }

    let query = params
        .iter()
        .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&");

    let separator = if base.contains('?') { '&' } else { '?' };
    format!("{base}{separator}{query}")
}

/// Returns a copy of `params` safe to log.
fn redacted(params: &[(&'static str, String)]) -> QueryParams {
    params
        .iter()
        .map(|(key, value)| {
            if *key == PARAM_PASSWORD {
                (*key, "***".to_string())
            } else {
                (*key, value.clone())
            }
        })
        .collect()
}

/// Builder for creating an HTTP transport with custom configuration.
#[derive(Debug, Default)]
pub struct HttpTransportBuilder {
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl HttpTransportBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the client-wide timeout ceiling.
    ///
    /// Per-request timeouts passed to [`Transport::fetch`] still apply.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the `User-Agent` header.
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Builds the HTTP transport.
    ///
    /// # Errors
    ///
    /// Returns error if client creation fails.
    pub fn build(self) -> Result<HttpTransport, ProtocolError> {
        let user_agent = self
            .user_agent
            .unwrap_or_else(|| concat!("pelican_lib/", env!("CARGO_PKG_VERSION")).to_string());

        let client = Client::builder()
            .timeout(self.timeout.unwrap_or(HttpTransport::DEFAULT_TIMEOUT))
            .user_agent(user_agent)
            .build()
            .map_err(ProtocolError::Network)?;

        Ok(HttpTransport { client })
    }
}
