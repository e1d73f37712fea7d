// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Out-of-cycle refresh requests.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Notify;

/// Handle for requesting an immediate poll cycle.
///
/// Requests never interrupt a cycle in flight. Any number of requests made
/// before the poll loop gets to them coalesce into a single extra cycle,
/// which runs as soon as the current one (if any) resolves.
///
/// Cloning the handle is cheap; all clones signal the same poll loop.
#[derive(Debug, Clone, Default)]
pub struct RefreshHandle {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    pending: AtomicBool,
    notify: Notify,
}

impl RefreshHandle {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Requests an out-of-cycle refresh.
    pub fn request(&self) {
        if self.inner.pending.swap(true, Ordering::AcqRel) {
            tracing::trace!("Refresh already pending");
        } else {
            tracing::debug!("Refresh requested");
        }
        self.inner.notify.notify_one();
    }

    /// Returns `true` if a requested refresh has not started yet.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.inner.pending.load(Ordering::Acquire)
    }

    /// Consumes the pending request, returning whether there was one.
    pub(crate) fn take(&self) -> bool {
        self.inner.pending.swap(false, Ordering::AcqRel)
    }

    /// Waits until a refresh is requested.
    pub(crate) async fn notified(&self) {
        self.inner.notify.notified().await;
    }
}
