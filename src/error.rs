// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the Pelican library.
//!
//! This module provides the error hierarchy used across the library: value
//! validation, HTTP transport, XML decoding, and device operations.
//!
//! Not every error reaches the caller. Timeouts on the mandatory poll, any
//! failure of the optional poll, and command timeouts are absorbed by the
//! coordinator and only logged; see [`crate::coordinator`].

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred during value validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// Error occurred while talking to the thermostat API.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Error occurred while decoding a response.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Error reported by or about the device.
    #[error("device error: {0}")]
    Device(#[from] DeviceError),

    /// A poll cycle failed on its mandatory fetch.
    ///
    /// The cached snapshot is left as it was before the cycle.
    #[error("update failed: {0}")]
    UpdateFailed(#[source] Box<Error>),
}

impl Error {
    /// Wraps an error as a failed poll cycle.
    pub(crate) fn update_failed(err: impl Into<Error>) -> Self {
        Self::UpdateFailed(Box::new(err.into()))
    }
}

/// Errors related to value validation and constraints.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValueError {
    /// A numeric value is outside the allowed range.
    #[error("value {actual} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Minimum allowed value.
        min: u64,
        /// Maximum allowed value.
        max: u64,
        /// The actual value that was provided.
        actual: u64,
    },

    /// An unknown system mode string was provided.
    #[error("invalid system mode: {0}")]
    InvalidSystemMode(String),

    /// A setpoint temperature is NaN or infinite.
    #[error("invalid temperature: {0}")]
    InvalidTemperature(f64),
}

/// Errors related to HTTP communication with the thermostat API.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The request could not be sent or the body could not be read.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with a non-success HTTP status.
    #[error("HTTP status {status}")]
    HttpStatus {
        /// The HTTP status code.
        status: u16,
    },

    /// Request timed out.
    #[error("request timed out after {0} ms")]
    Timeout(u64),

    /// Invalid URL or address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),
}

impl ProtocolError {
    /// Returns `true` if this error is a timeout.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}

/// Errors related to decoding thermostat responses.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The body is not well-formed XML.
    #[error("XML parse error: {0}")]
    Xml(#[from] roxmltree::Error),

    /// Expected element is missing from the response.
    #[error("missing field in response: {0}")]
    MissingField(String),

    /// Failed to parse a specific value.
    #[error("failed to parse {field}: {message}")]
    InvalidValue {
        /// The field that failed to parse.
        field: String,
        /// Description of the parsing failure.
        message: String,
    },
}

/// Errors related to device operations.
#[derive(Debug, Error)]
pub enum DeviceError {
    /// The API answered with `success` other than `1`.
    #[error("request rejected: {0}")]
    CommandRejected(String),

    /// Coordinator configuration is invalid.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_error_display() {
        let err = ValueError::OutOfRange {
            min: 30,
            max: 300,
            actual: 20,
        };
        assert_eq!(err.to_string(), "value 20 is out of range [30, 300]");
    }

    #[test]
    fn error_from_value_error() {
        let value_err = ValueError::InvalidSystemMode("Fan".to_string());
        let err: Error = value_err.into();
        assert!(matches!(err, Error::Value(ValueError::InvalidSystemMode(_))));
    }

    #[test]
    fn http_status_display() {
        let err = ProtocolError::HttpStatus { status: 503 };
        assert_eq!(err.to_string(), "HTTP status 503");
    }

    #[test]
    fn update_failed_keeps_source() {
        let err = Error::update_failed(ProtocolError::HttpStatus { status: 500 });
        assert_eq!(
            err.to_string(),
            "update failed: protocol error: HTTP status 500"
        );
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn timeout_is_detected() {
        assert!(ProtocolError::Timeout(15_000).is_timeout());
        assert!(!ProtocolError::HttpStatus { status: 404 }.is_timeout());
    }

    #[test]
    fn parse_error_display() {
        let err = ParseError::MissingField("success".to_string());
        assert_eq!(err.to_string(), "missing field in response: success");
    }
}
