// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Coordinator keeping a thermostat snapshot in sync with the cloud API.
//!
//! # Overview
//!
//! The [`ThermostatCoordinator`] owns everything needed to track one
//! thermostat:
//!
//! - **Polling**: a background task runs one poll cycle per interval. Each
//!   cycle issues a mandatory and an optional `get` and merges both into
//!   the cached snapshot.
//! - **Snapshot access**: readers get clones or a `watch` receiver; only
//!   the poll task writes.
//! - **Commands**: `set` requests report a plain success flag and trigger
//!   an out-of-cycle refresh when they succeed.
//!
//! # Examples
//!
//! ```no_run
//! use pelican_lib::coordinator::{ThermostatConfig, ThermostatCoordinator};
//! use pelican_lib::types::SystemMode;
//!
//! #[tokio::main]
//! async fn main() -> pelican_lib::Result<()> {
//!     let config = ThermostatConfig::new("user@example.com", "secret", "Lobby");
//!     let coordinator = ThermostatCoordinator::new(config)?;
//!
//!     // Fail setup early if the first refresh does not work
//!     coordinator.refresh_now().await?;
//!     coordinator.start();
//!
//!     let mut updates = coordinator.subscribe();
//!     tokio::spawn(async move {
//!         while updates.changed().await.is_ok() {
//!             println!("Temperature: {:?}", updates.borrow().temperature());
//!         }
//!     });
//!
//!     if coordinator.set_system_mode(SystemMode::Heat).await {
//!         println!("Heating enabled");
//!     }
//!     Ok(())
//! }
//! ```

mod config;
mod gateway;
mod poller;
mod refresh;

pub use config::{DEFAULT_BASE_URL, FieldGroups, ThermostatConfig, Timeouts};
pub use poller::{CycleOutcome, CyclePhase};
pub use refresh::RefreshHandle;

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use self::gateway::CommandGateway;
use self::poller::Poller;
use crate::error::Result;
use crate::protocol::{HttpTransport, Transport};
use crate::state::DeviceSnapshot;
use crate::types::SystemMode;

/// Keeps a cached thermostat snapshot up to date and forwards commands.
///
/// Generic over the [`Transport`] so tests can substitute the HTTP layer.
/// Dropping the coordinator stops the poll task.
pub struct ThermostatCoordinator<T = HttpTransport> {
    config: Arc<ThermostatConfig>,
    poller: Arc<Poller<T>>,
    gateway: CommandGateway<T>,
    refresh: RefreshHandle,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl ThermostatCoordinator<HttpTransport> {
    /// Creates a coordinator talking HTTP to `config.base_url()`.
    ///
    /// The poll loop is not running until [`start`](Self::start) is called.
    ///
    /// # Errors
    ///
    /// Returns `DeviceError::InvalidConfiguration` if the configuration
    /// does not validate, or `ProtocolError` if the HTTP client cannot be
    /// built.
    pub fn new(config: ThermostatConfig) -> Result<Self> {
        let transport = HttpTransport::new()?;
        Self::with_transport(config, transport)
    }
}

impl<T: Transport + 'static> ThermostatCoordinator<T> {
    /// Creates a coordinator using a custom transport.
    ///
    /// # Errors
    ///
    /// Returns `DeviceError::InvalidConfiguration` if the configuration
    /// does not validate.
    pub fn with_transport(config: ThermostatConfig, transport: T) -> Result<Self> {
        config.validate()?;

        let config = Arc::new(config);
        let transport = Arc::new(transport);
        let refresh = RefreshHandle::new();

        let poller = Arc::new(Poller::new(
            Arc::clone(&transport),
            Arc::clone(&config),
            refresh.clone(),
        ));
        let gateway = CommandGateway::new(transport, Arc::clone(&config), refresh.clone());

        Ok(Self {
            config,
            poller,
            gateway,
            refresh,
            task: Mutex::new(None),
        })
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &ThermostatConfig {
        &self.config
    }

    /// Starts the background poll loop.
    ///
    /// The first cycle runs immediately. Calling `start` on a running
    /// coordinator does nothing.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn start(&self) {
        let mut task = self.task.lock();
        if task.as_ref().is_some_and(|handle| !handle.is_finished()) {
            tracing::debug!("Poll loop already running");
            return;
        }
        *task = Some(tokio::spawn(Arc::clone(&self.poller).run()));
    }

    /// Stops the background poll loop.
    ///
    /// A cycle in flight is abandoned; the last published snapshot stays
    /// readable.
    pub fn shutdown(&self) {
        if let Some(handle) = self.task.lock().take() {
            handle.abort();
            tracing::info!(
                thermostat = %self.config.thermostat_name(),
                "Stopped poll loop"
            );
        }
    }

    /// Returns `true` while the background poll loop is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.task
            .lock()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Runs one poll cycle now and waits for it.
    ///
    /// If a cycle is already in flight, this waits for it to finish and then
    /// runs another. Any pending refresh request is satisfied by this cycle.
    ///
    /// # Errors
    ///
    /// Returns `Error::UpdateFailed` if the mandatory fetch fails for any
    /// reason other than a timeout. A timeout is reported as
    /// [`CycleOutcome::Stale`] instead.
    pub async fn refresh_now(&self) -> Result<CycleOutcome> {
        self.refresh.take();
        self.poller.run_cycle().await
    }

    /// Asks the poll loop for an extra cycle as soon as possible.
    ///
    /// Never interrupts a cycle in flight; repeated requests coalesce.
    pub fn request_refresh(&self) {
        self.refresh.request();
    }

    /// Returns a handle for requesting refreshes from elsewhere.
    #[must_use]
    pub fn refresh_handle(&self) -> RefreshHandle {
        self.refresh.clone()
    }

    /// Returns a copy of the last published snapshot.
    #[must_use]
    pub fn snapshot(&self) -> DeviceSnapshot {
        self.poller.snapshot()
    }

    /// Subscribes to published snapshots.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<DeviceSnapshot> {
        self.poller.subscribe()
    }

    /// Returns whether the most recent poll cycle succeeded.
    ///
    /// Unlike the flag on the snapshot, this also turns `false` when a
    /// cycle failed without republishing.
    #[must_use]
    pub fn last_update_succeeded(&self) -> bool {
        self.poller.last_update_succeeded()
    }

    /// Returns the current poll cycle phase.
    #[must_use]
    pub fn phase(&self) -> CyclePhase {
        self.poller.phase()
    }

    /// Sets the HVAC system mode.
    ///
    /// Returns `true` if the thermostat acknowledged the command, its reply
    /// could not be parsed, or the request timed out. The thermostat often
    /// applies a setting without answering in time, so a timeout is
    /// optimistically reported as success. The next refresh shows the
    /// actual state.
    pub async fn set_system_mode(&self, mode: SystemMode) -> bool {
        self.gateway.set_system_mode(mode).await
    }

    /// Sets the heating setpoint.
    ///
    /// Same success semantics as [`set_system_mode`](Self::set_system_mode).
    /// Returns `false` without sending anything if `temperature` is not
    /// finite.
    pub async fn set_heat_setting(&self, temperature: f64) -> bool {
        self.gateway.set_heat_setting(temperature).await
    }

    /// Sets the cooling setpoint.
    ///
    /// Same success semantics as [`set_system_mode`](Self::set_system_mode).
    /// Returns `false` without sending anything if `temperature` is not
    /// finite.
    pub async fn set_cool_setting(&self, temperature: f64) -> bool {
        self.gateway.set_cool_setting(temperature).await
    }

    /// Checks that the endpoint and credentials work.
    ///
    /// Issues a single mandatory `get` without touching the snapshot.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` on transport failure, `ParseError` if the
    /// reply is not XML, or `DeviceError::CommandRejected` if the API
    /// did not report success.
    pub async fn check_connection(&self) -> Result<()> {
        self.poller.probe().await
    }
}

impl<T> Drop for ThermostatCoordinator<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.task.get_mut().take() {
            handle.abort();
        }
    }
}

impl<T> std::fmt::Debug for ThermostatCoordinator<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThermostatCoordinator")
            .field("config", &self.config)
            .field("running", &self.task.lock().is_some())
            .finish_non_exhaustive()
    }
}
