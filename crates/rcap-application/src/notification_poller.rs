//! Periodic notification refresh.

use crate::notification_store::NotificationStore;
use rcap_core::notification::NotificationFilters;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, interval_at};
use tokio_util::sync::CancellationToken;

/// Number of notifications fetched on every tick.
const LATEST_LIMIT: u32 = 5;

struct Running {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// Polls the unread count and the latest notifications on a fixed period.
///
/// Each tick spawns both fetches as independent tasks and moves on; a slow
/// response may still be in flight when the next tick fires. Stopping the
/// poller ends the interval loop only, fetches already spawned run to
/// completion.
pub struct NotificationPoller {
    store: Arc<NotificationStore>,
    period: Duration,
    running: Mutex<Option<Running>>,
}

impl NotificationPoller {
    pub fn new(store: Arc<NotificationStore>, period: Duration) -> Self {
        Self {
            store,
            period,
            running: Mutex::new(None),
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Starts polling; the first tick fires one period from now.
    ///
    /// Does nothing if the poller is already running. Must be called from
    /// within a tokio runtime.
    pub fn start(&self) {
        let mut running = self.running.lock().unwrap_or_else(|p| p.into_inner());
        if running.is_some() {
            tracing::debug!("[NotificationPoller] Already running, skipping");
            return;
        }

        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let store = self.store.clone();
        let period = self.period;

        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            tracing::info!("[NotificationPoller] Started ({}s interval)", period.as_secs());

            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        tracing::debug!("[NotificationPoller] Tick");
                        let counter = store.clone();
                        tokio::spawn(async move {
                            counter.fetch_unread_count().await;
                        });
                        let lister = store.clone();
                        tokio::spawn(async move {
                            if let Err(e) = lister
                                .fetch_notifications(&NotificationFilters::latest(LATEST_LIMIT))
                                .await
                            {
                                tracing::warn!("[NotificationPoller] Fetch failed: {}", e);
                            }
                        });
                    }
                }
            }
            tracing::info!("[NotificationPoller] Stopped");
        });

        *running = Some(Running { cancel, handle });
    }

    /// Stops the interval loop. Stopping an idle poller does nothing.
    pub fn stop(&self) {
        let taken = self
            .running
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .take();
        if let Some(running) = taken {
            running.cancel.cancel();
            drop(running.handle);
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .as_ref()
            .is_some_and(|running| !running.handle.is_finished())
    }
}

impl Drop for NotificationPoller {
    fn drop(&mut self) {
        self.stop();
    }
}
