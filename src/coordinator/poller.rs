// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scheduled poll cycle.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::Utc;
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use super::config::ThermostatConfig;
use super::refresh::RefreshHandle;
use crate::command::Query;
use crate::error::{DeviceError, Error, ProtocolError, Result};
use crate::protocol::Transport;
use crate::response::{decode_response, decode_state};
use crate::state::{DeviceSnapshot, PartialState, merge};
use crate::types::Field;

/// Phase of the poll cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CyclePhase {
    /// No cycle is running.
    Idle,
    /// Waiting for the mandatory fetch.
    Fetching,
    /// Waiting for the optional fetch.
    FetchingOptional,
    /// Merging the cycle's records.
    Merging,
    /// The last cycle published a fresh snapshot; no cycle is running.
    Published,
}

/// How a poll cycle that did not fail ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// A freshly merged snapshot was published.
    Updated,
    /// The mandatory fetch timed out; the previous snapshot was
    /// republished with `last_update_succeeded = false`.
    Stale,
}

/// Sets the final phase of a cycle, or `Idle` if the cycle is dropped
/// before it resolves.
struct PhaseReset<'a> {
    phase: &'a Mutex<CyclePhase>,
    resolved: Option<CyclePhase>,
}

impl<'a> PhaseReset<'a> {
    fn new(phase: &'a Mutex<CyclePhase>) -> Self {
        Self {
            phase,
            resolved: None,
        }
    }

    fn finish(mut self, phase: CyclePhase) {
        self.resolved = Some(phase);
    }
}

impl Drop for PhaseReset<'_> {
    fn drop(&mut self) {
        let phase = self.resolved.unwrap_or_else(|| {
            tracing::debug!("Poll cycle cancelled");
            CyclePhase::Idle
        });
        *self.phase.lock() = phase;
    }
}

/// Owner and only writer of the cached snapshot.
pub(crate) struct Poller<T> {
    transport: Arc<T>,
    config: Arc<ThermostatConfig>,
    snapshot_tx: watch::Sender<DeviceSnapshot>,
    phase: Mutex<CyclePhase>,
    last_update_succeeded: AtomicBool,
    cycle_lock: tokio::sync::Mutex<()>,
    refresh: RefreshHandle,
}

impl<T: Transport> Poller<T> {
    pub(crate) fn new(
        transport: Arc<T>,
        config: Arc<ThermostatConfig>,
        refresh: RefreshHandle,
    ) -> Self {
        let (snapshot_tx, _) = watch::channel(DeviceSnapshot::new());
        Self {
            transport,
            config,
            snapshot_tx,
            phase: Mutex::new(CyclePhase::Idle),
            last_update_succeeded: AtomicBool::new(false),
            cycle_lock: tokio::sync::Mutex::new(()),
            refresh,
        }
    }

    pub(crate) fn snapshot(&self) -> DeviceSnapshot {
        self.snapshot_tx.borrow().clone()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<DeviceSnapshot> {
        self.snapshot_tx.subscribe()
    }

    pub(crate) fn phase(&self) -> CyclePhase {
        *self.phase.lock()
    }

    pub(crate) fn last_update_succeeded(&self) -> bool {
        self.last_update_succeeded.load(Ordering::Acquire)
    }

    fn set_phase(&self, phase: CyclePhase) {
        tracing::trace!(?phase, "Poll cycle phase");
        *self.phase.lock() = phase;
    }

    /// Runs the poll loop until the task is aborted.
    ///
    /// The first cycle starts immediately. Cycles never overlap: the next
    /// tick or refresh request is only looked at once the previous cycle
    /// has resolved.
    pub(crate) async fn run(self: Arc<Self>) {
        let interval = self.config.poll_interval();
        let mut ticker = tokio::time::interval(interval.as_duration());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(
            thermostat = %self.config.thermostat_name(),
            %interval,
            "Starting poll loop"
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    // A scheduled cycle also satisfies any pending request.
                    self.refresh.take();
                }
                () = self.refresh.notified() => {
                    if !self.refresh.take() {
                        continue;
                    }
                    tracing::debug!("Running out-of-cycle refresh");
                }
            }

            match self.run_cycle().await {
                Ok(CycleOutcome::Updated) => {}
                Ok(CycleOutcome::Stale) => {
                    tracing::debug!("Keeping last known thermostat data");
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Thermostat update failed");
                }
            }
        }
    }

    /// Runs one poll cycle.
    ///
    /// Waits for any cycle already in flight to finish first.
    pub(crate) async fn run_cycle(&self) -> Result<CycleOutcome> {
        let _guard = self.cycle_lock.lock().await;
        let reset = PhaseReset::new(&self.phase);
        let result = self.cycle().await;
        reset.finish(match result {
            Ok(CycleOutcome::Updated) => CyclePhase::Published,
            _ => CyclePhase::Idle,
        });
        result
    }

    async fn cycle(&self) -> Result<CycleOutcome> {
        let started_at = Utc::now();
        let base = self.snapshot();
        let fields = self.config.fields();
        let timeouts = self.config.timeouts();

        self.set_phase(CyclePhase::Fetching);
        let core = match self.fetch(&fields.core, timeouts.core_fetch).await {
            Ok(body) => {
                let reply = decode_response(&body).map_err(|e| self.fail(e))?;
                if !reply.success {
                    tracing::warn!("API request was not successful");
                }
                reply.state
            }
            Err(ProtocolError::Timeout(timeout_ms)) => {
                tracing::warn!(
                    timeout_ms,
                    "Timeout fetching thermostat data (thermostat may be offline)"
                );
                self.publish_stale(base);
                return Ok(CycleOutcome::Stale);
            }
            Err(e) => return Err(self.fail(e)),
        };

        let mut parts = vec![core];
        if !fields.optional.is_empty() {
            self.set_phase(CyclePhase::FetchingOptional);
            parts.push(
                self.fetch_optional(&fields.optional, timeouts.optional_fetch)
                    .await,
            );
        }

        self.set_phase(CyclePhase::Merging);
        let mut merged = merge(base, &parts);
        merged.mark_succeeded(started_at);

        self.last_update_succeeded.store(true, Ordering::Release);
        self.snapshot_tx.send_replace(merged);
        tracing::debug!(snapshot = ?self.snapshot(), "Published thermostat snapshot");

        Ok(CycleOutcome::Updated)
    }

    /// Best-effort fetch; every failure becomes a failed record.
    async fn fetch_optional(&self, fields: &[Field], timeout: Duration) -> PartialState {
        match self.fetch(fields, timeout).await {
            Ok(body) => decode_state(&body).unwrap_or_else(|e| {
                tracing::debug!(error = %e, "Could not decode optional thermostat data");
                PartialState::failed()
            }),
            Err(e) => {
                tracing::debug!(error = %e, "Could not fetch optional thermostat data");
                PartialState::failed()
            }
        }
    }

    async fn fetch(
        &self,
        fields: &[Field],
        timeout: Duration,
    ) -> std::result::Result<String, ProtocolError> {
        let params = Query::get(fields.iter().copied())
            .to_params(self.config.credentials(), self.config.thermostat_name());
        self.transport
            .fetch(self.config.base_url(), &params, timeout)
            .await
    }

    /// Republishes `base` marked stale.
    fn publish_stale(&self, mut base: DeviceSnapshot) {
        base.mark_stale();
        self.last_update_succeeded.store(false, Ordering::Release);
        self.snapshot_tx.send_replace(base);
    }

    /// Records a failed cycle; the published snapshot is left untouched.
    fn fail(&self, err: impl Into<Error>) -> Error {
        self.last_update_succeeded.store(false, Ordering::Release);
        Error::update_failed(err)
    }

    /// Issues one mandatory query and requires `<success>1</success>`.
    pub(crate) async fn probe(&self) -> Result<()> {
        let body = self
            .fetch(&self.config.fields().core, self.config.timeouts().command)
            .await?;
        let reply = decode_response(&body)?;
        if !reply.success {
            return Err(DeviceError::CommandRejected(format!(
                "API did not accept the request for thermostat {:?}; \
                 check the credentials and thermostat name",
                self.config.thermostat_name()
            ))
            .into());
        }
        Ok(())
    }
}
