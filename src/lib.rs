// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pelican Lib - A Rust library to monitor and control Pelican thermostats.
//!
//! This library keeps an async, cached view of a thermostat served by the
//! vendor's cloud API (`api.cgi`, XML over HTTP GET) and forwards setting
//! changes to it.
//!
//! # Supported Features
//!
//! - **Polling**: Periodic refresh split into a mandatory and a best-effort query
//! - **Snapshot merging**: Known values survive partial or failed fetches
//! - **Commands**: System mode, heating and cooling setpoints
//! - **Refresh on demand**: Coalesced out-of-cycle refreshes after commands
//!
//! # Quick Start
//!
//! ```no_run
//! use pelican_lib::{ThermostatConfig, ThermostatCoordinator};
//!
//! #[tokio::main]
//! async fn main() -> pelican_lib::Result<()> {
//!     let config = ThermostatConfig::new("user@example.com", "secret", "Lobby");
//!     let coordinator = ThermostatCoordinator::new(config)?;
//!
//!     coordinator.check_connection().await?;
//!     coordinator.refresh_now().await?;
//!     coordinator.start();
//!
//!     let snapshot = coordinator.snapshot();
//!     println!("{:?} at {:?}% humidity", snapshot.temperature(), snapshot.humidity());
//!
//!     coordinator.set_heat_setting(68.0).await;
//!     Ok(())
//! }
//! ```
//!
//! ## Custom Transport
//!
//! Anything implementing [`protocol::Transport`] can replace the HTTP layer:
//!
//! ```
//! use std::time::Duration;
//! use pelican_lib::protocol::Transport;
//! use pelican_lib::{ProtocolError, ThermostatConfig, ThermostatCoordinator};
//!
//! struct Offline;
//!
//! impl Transport for Offline {
//!     async fn fetch(
//!         &self,
//!         _url: &str,
//!         _params: &[(&'static str, String)],
//!         timeout: Duration,
//!     ) -> Result<String, ProtocolError> {
//!         Err(ProtocolError::Timeout(timeout.as_millis() as u64))
//!     }
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let config = ThermostatConfig::new("user", "secret", "Lobby");
//! let coordinator = ThermostatCoordinator::with_transport(config, Offline).unwrap();
//!
//! // A timeout keeps the last snapshot and marks it stale
//! let outcome = coordinator.refresh_now().await.unwrap();
//! assert_eq!(outcome, pelican_lib::coordinator::CycleOutcome::Stale);
//! assert!(!coordinator.snapshot().last_update_succeeded());
//! # }
//! ```

pub mod command;
pub mod coordinator;
pub mod error;
pub mod protocol;
pub mod response;
pub mod state;
pub mod types;

pub use command::{Command, CommandRequest, Query};
pub use coordinator::{
    CycleOutcome, CyclePhase, RefreshHandle, ThermostatConfig, ThermostatCoordinator,
};
pub use error::{DeviceError, Error, ParseError, ProtocolError, Result, ValueError};
pub use protocol::{Credentials, HttpTransport, Transport};
pub use state::{DeviceSnapshot, PartialState};
pub use types::{Field, PollInterval, SystemMode};
