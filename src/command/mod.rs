// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Request encoding for the thermostat API.
//!
//! Every request is a flat list of query parameters:
//!
//! | Parameter | Value |
//! |-----------|-------|
//! | `username`, `password` | Static credentials |
//! | `request` | `get` or `set` |
//! | `object` | Always `Thermostat` |
//! | `selection` | `name:<thermostat name>;` |
//! | `value` | `f1;f2;...` for `get`, `<field>:<value>` for `set` |
//!
//! # Examples
//!
//! ```
//! use pelican_lib::command::{Command, CommandRequest, Query};
//! use pelican_lib::protocol::Credentials;
//! use pelican_lib::types::{Field, SystemMode};
//!
//! let creds = Credentials::new("user@example.com", "secret");
//!
//! let get = Query::get([Field::Temperature, Field::Humidity]);
//! let params = get.to_params(&creds, "Lobby");
//! assert!(params.contains(&("value", "temperature;humidity".to_string())));
//!
//! let set = CommandRequest::SystemMode(SystemMode::Heat);
//! assert_eq!(set.to_value_param(), "system:Heat");
//! ```

mod setting;

pub use setting::CommandRequest;

use crate::protocol::{Credentials, QueryParams};
use crate::types::Field;

/// Query parameter carrying the account name.
pub const PARAM_USERNAME: &str = "username";
/// Query parameter carrying the account password.
pub const PARAM_PASSWORD: &str = "password";
/// Query parameter selecting `get` or `set`.
pub const PARAM_REQUEST: &str = "request";
/// Query parameter naming the API object.
pub const PARAM_OBJECT: &str = "object";
/// Query parameter selecting the thermostat.
pub const PARAM_SELECTION: &str = "selection";
/// Query parameter carrying the field list or the assignment.
pub const PARAM_VALUE: &str = "value";

/// The only API object this library talks to.
pub const OBJECT_THERMOSTAT: &str = "Thermostat";

/// A write command for a single thermostat field.
pub trait Command {
    /// Returns the field being written.
    fn field(&self) -> Field;

    /// Returns the value in its wire representation.
    fn value(&self) -> String;

    /// Returns the `value` parameter for a `set` request.
    ///
    /// Format: `<field>:<value>`.
    fn to_value_param(&self) -> String {
        format!("{}:{}", self.field(), self.value())
    }
}

/// A request to the thermostat API.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    /// Read a list of fields.
    Get {
        /// Fields to fetch, in request order.
        fields: Vec<Field>,
    },
    /// Write one field.
    Set(CommandRequest),
}

impl Query {
    /// Creates a `get` query for the given fields.
    #[must_use]
    pub fn get(fields: impl IntoIterator<Item = Field>) -> Self {
        Self::Get {
            fields: fields.into_iter().collect(),
        }
    }

    /// Creates a `set` query.
    #[must_use]
    pub fn set(command: CommandRequest) -> Self {
        Self::Set(command)
    }

    /// Returns the `request` parameter value.
    #[must_use]
    pub fn request_kind(&self) -> &'static str {
        match self {
            Self::Get { .. } => "get",
            Self::Set(_) => "set",
        }
    }

    /// Returns the `value` parameter.
    #[must_use]
    pub fn value_param(&self) -> String {
        match self {
            Self::Get { fields } => fields
                .iter()
                .map(Field::as_str)
                .collect::<Vec<_>>()
                .join(";"),
            Self::Set(command) => command.to_value_param(),
        }
    }

    /// Encodes the full parameter list, credentials included.
    #[must_use]
    pub fn to_params(&self, credentials: &Credentials, thermostat_name: &str) -> QueryParams {
        vec![
            (PARAM_USERNAME, credentials.username.clone()),
            (PARAM_PASSWORD, credentials.password.clone()),
            (PARAM_REQUEST, self.request_kind().to_string()),
            (PARAM_OBJECT, OBJECT_THERMOSTAT.to_string()),
            (PARAM_SELECTION, format!("name:{thermostat_name};")),
            (PARAM_VALUE, self.value_param()),
        ]
    }
}
