// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Command gateway for `set` requests.

use std::sync::Arc;

use super::config::ThermostatConfig;
use super::refresh::RefreshHandle;
use crate::command::{Command, CommandRequest, Query};
use crate::protocol::Transport;
use crate::response::decode_set_ack;
use crate::types::SystemMode;

/// Sends write commands and reports a simple success flag.
///
/// Commands are serialized against each other but run independently of
/// the poll cycle. A command that reports success schedules an
/// out-of-cycle refresh so the snapshot catches up with the change.
pub(crate) struct CommandGateway<T> {
    transport: Arc<T>,
    config: Arc<ThermostatConfig>,
    refresh: RefreshHandle,
    lock: tokio::sync::Mutex<()>,
}

impl<T: Transport> CommandGateway<T> {
    pub(crate) fn new(
        transport: Arc<T>,
        config: Arc<ThermostatConfig>,
        refresh: RefreshHandle,
    ) -> Self {
        Self {
            transport,
            config,
            refresh,
            lock: tokio::sync::Mutex::new(()),
        }
    }

    pub(crate) async fn set_system_mode(&self, mode: SystemMode) -> bool {
        self.send(CommandRequest::SystemMode(mode)).await
    }

    pub(crate) async fn set_heat_setting(&self, temperature: f64) -> bool {
        match CommandRequest::heat_setting(temperature) {
            Ok(command) => self.send(command).await,
            Err(e) => {
                tracing::warn!(error = %e, "Rejected heat setting");
                false
            }
        }
    }

    pub(crate) async fn set_cool_setting(&self, temperature: f64) -> bool {
        match CommandRequest::cool_setting(temperature) {
            Ok(command) => self.send(command).await,
            Err(e) => {
                tracing::warn!(error = %e, "Rejected cool setting");
                false
            }
        }
    }

    /// Sends one `set` request.
    ///
    /// A timeout counts as success: the thermostat routinely applies a
    /// setting without answering in time.
    pub(crate) async fn send(&self, command: CommandRequest) -> bool {
        let _guard = self.lock.lock().await;

        let value = command.to_value_param();
        tracing::debug!(command = %value, "Sending thermostat command");

        let params = Query::set(command)
            .to_params(self.config.credentials(), self.config.thermostat_name());
        let timeout = self.config.timeouts().command;

        let accepted = match self
            .transport
            .fetch(self.config.base_url(), &params, timeout)
            .await
        {
            Ok(body) => decode_set_ack(&body),
            Err(e) if e.is_timeout() => {
                tracing::warn!(
                    command = %value,
                    timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
                    "Command timed out, assuming it was applied"
                );
                true
            }
            Err(e) => {
                tracing::error!(command = %value, error = %e, "Command failed");
                false
            }
        };

        if accepted {
            tracing::info!(command = %value, "Command accepted");
            self.refresh.request();
        } else {
            tracing::warn!(command = %value, "Command rejected by thermostat");
        }
        accepted
    }
}
