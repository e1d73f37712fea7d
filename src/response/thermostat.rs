// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Decoding of `get` replies into partial thermostat state.

use std::fmt::Display;
use std::str::FromStr;

use roxmltree::{Document, Node};

use super::{child, child_text, is_success};
use crate::command::OBJECT_THERMOSTAT;
use crate::error::ParseError;
use crate::state::PartialState;
use crate::types::{Field, SystemMode};

/// A decoded `get` reply.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApiResponse {
    /// The reply carried `<success>1</success>`.
    pub success: bool,
    /// Fields found in the `Thermostat` element.
    ///
    /// Always empty when `success` is `false`.
    pub state: PartialState,
}

/// Decodes a `get` reply, keeping the `success` flag.
///
/// # Errors
///
/// Returns `ParseError::Xml` if `body` is not well-formed XML.
///
/// # Examples
///
/// ```
/// use pelican_lib::response::decode_response;
///
/// let reply = decode_response("<response><success>0</success></response>").unwrap();
/// assert!(!reply.success);
/// assert!(reply.state.is_empty());
/// ```
pub fn decode_response(body: &str) -> Result<ApiResponse, ParseError> {
    let doc = Document::parse(body)?;
    let root = doc.root_element();

    if !is_success(root) {
        return Ok(ApiResponse::default());
    }

    let Some(thermostat) = child(root, OBJECT_THERMOSTAT) else {
        tracing::warn!(
            error = %ParseError::MissingField(OBJECT_THERMOSTAT.to_string()),
            "No thermostat data found in response"
        );
        return Ok(ApiResponse {
            success: true,
            state: PartialState::empty(),
        });
    };

    Ok(ApiResponse {
        success: true,
        state: decode_fields(thermostat),
    })
}

/// Decodes a `get` reply into a partial state record.
///
/// A soft API failure (`success` missing or not `1`) and a missing
/// `Thermostat` element both yield an empty record.
///
/// # Errors
///
/// Returns `ParseError::Xml` if `body` is not well-formed XML.
///
/// # Examples
///
/// ```
/// use pelican_lib::response::decode_state;
///
/// let body = "<response><success>1</success>\
///             <Thermostat><temperature>71</temperature></Thermostat></response>";
/// let state = decode_state(body).unwrap();
/// assert_eq!(state.temperature, Some(71.0));
/// assert!(state.humidity.is_none());
///
/// assert!(decode_state("not xml").is_err());
/// ```
pub fn decode_state(body: &str) -> Result<PartialState, ParseError> {
    let reply = decode_response(body)?;
    if !reply.success {
        tracing::debug!("API request was not successful");
    }
    Ok(reply.state)
}

fn decode_fields(thermostat: Node<'_, '_>) -> PartialState {
    PartialState {
        temperature: parse_reading(thermostat, Field::Temperature),
        humidity: parse_reading(thermostat, Field::Humidity),
        co2_level: parse_field(thermostat, Field::Co2Level),
        system_mode: parse_field::<SystemMode>(thermostat, Field::System),
        heat_setting: parse_reading(thermostat, Field::HeatSetting),
        cool_setting: parse_reading(thermostat, Field::CoolSetting),
        fetch_failed: false,
    }
}

/// Parses a decimal field, rejecting `NaN` and infinities.
fn parse_reading(thermostat: Node<'_, '_>, field: Field) -> Option<f64> {
    let value: f64 = parse_field(thermostat, field)?;
    if value.is_finite() {
        return Some(value);
    }
    let err = ParseError::InvalidValue {
        field: field.to_string(),
        message: format!("{value} is not a finite number"),
    };
    tracing::warn!(error = %err, "Ignoring invalid field value");
    None
}

/// Parses one field; an unparseable value is logged and treated as absent.
fn parse_field<T>(thermostat: Node<'_, '_>, field: Field) -> Option<T>
where
    T: FromStr,
    T::Err: Display,
{
    let text = child_text(thermostat, field.as_str())?;
    match text.parse() {
        Ok(value) => Some(value),
        Err(e) => {
            let err = ParseError::InvalidValue {
                field: field.to_string(),
                message: format!("{text:?}: {e}"),
            };
            tracing::warn!(error = %err, "Ignoring invalid field value");
            None
        }
    }
}
