//! The poll loop
//!
//! Each cycle fetches the ban list, relays every ban newer than the cursor
//! (oldest first) and then moves the cursor to the newest fetched ban. The
//! cursor moves even when some notifications fail, so nothing is re-sent.

use crate::ban::{BanId, BanRecord};
use crate::feed::BanFeed;
use crate::notifier::Notifier;
use crate::{RELAY_TARGET, logging, novelty};
use std::future::Future;
use std::time::Duration;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info};

/// State carried from one poll cycle to the next
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelayState {
    /// Newest ban seen by the last successful poll, `None` until primed
    pub cursor: Option<BanId>,
}

impl RelayState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_cursor(cursor: impl Into<BanId>) -> Self {
        Self {
            cursor: Some(cursor.into()),
        }
    }
}

/// What a single poll cycle did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Fetch failed or returned nothing; the cursor was left alone
    Skipped,
    /// The cursor was set without relaying anything
    Primed,
    /// New bans were relayed and the cursor advanced
    Processed {
        new: usize,
        delivered: usize,
        failed: usize,
    },
}

/// Drives the feed and the notifier on a fixed interval
#[derive(Debug)]
pub struct PollLoop<F, N> {
    feed: F,
    notifier: N,
    interval: Duration,
}

impl<F: BanFeed, N: Notifier> PollLoop<F, N> {
    #[must_use]
    pub fn new(feed: F, notifier: N, interval: Duration) -> Self {
        Self {
            feed,
            notifier,
            interval,
        }
    }

    /// Point the cursor at the newest ban without relaying anything
    pub async fn prime(&self, state: &mut RelayState) -> CycleOutcome {
        match self.fetch().await {
            Some(records) => Self::prime_with(state, &records),
            None => CycleOutcome::Skipped,
        }
    }

    /// Run one fetch, detect, notify, advance pass
    pub async fn run_cycle(&self, state: &mut RelayState) -> CycleOutcome {
        let Some(records) = self.fetch().await else {
            return CycleOutcome::Skipped;
        };

        // Startup priming failed, so there is no reference point yet.
        let Some(cursor) = state.cursor.as_ref() else {
            return Self::prime_with(state, &records);
        };

        let position = novelty::find_cursor(&records, cursor);
        if position.is_none() {
            logging::log_cursor_lost(records.len());
        }
        let fresh = novelty::new_before(&records, position);

        let mut delivered = 0;
        let mut failed = 0;
        for record in &fresh {
            logging::log_ban_detected(record);
            match self.notifier.notify(record).await {
                Ok(()) => delivered += 1,
                Err(e) => {
                    logging::log_notify_error(record, &e);
                    failed += 1;
                }
            }
        }

        state.cursor = records.first().map(|record| record.subject_id.clone());

        if !fresh.is_empty() {
            info!(
                target: RELAY_TARGET,
                new = fresh.len(),
                delivered = delivered,
                failed = failed,
                cursor = ?state.cursor.as_ref().map(BanId::as_str),
                "Poll cycle relayed new bans"
            );
        }

        CycleOutcome::Processed {
            new: fresh.len(),
            delivered,
            failed,
        }
    }

    /// Poll every interval until `shutdown` resolves
    ///
    /// The first cycle runs one interval after the call. A cycle that is
    /// already running finishes before shutdown is observed.
    pub async fn run<S>(&self, mut state: RelayState, shutdown: S) -> RelayState
    where
        S: Future<Output = ()>,
    {
        info!(
            target: RELAY_TARGET,
            "Starting poll loop with {}s interval",
            self.interval.as_secs()
        );

        let mut interval = tokio::time::interval_at(Instant::now() + self.interval, self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                () = &mut shutdown => {
                    info!(target: RELAY_TARGET, "Shutdown requested, stopping poll loop");
                    break;
                }
                _ = interval.tick() => {
                    let outcome = self.run_cycle(&mut state).await;
                    debug!(target: RELAY_TARGET, outcome = ?outcome, "Poll cycle finished");
                }
            }
        }

        state
    }

    /// Fetch the ban list, logging failures; `None` means nothing usable came back
    async fn fetch(&self) -> Option<Vec<BanRecord>> {
        match self.feed.fetch().await {
            Ok(records) if records.is_empty() => {
                debug!(target: RELAY_TARGET, "Ban list was empty");
                None
            }
            Ok(records) => Some(records),
            Err(e) => {
                logging::log_fetch_error(&e);
                None
            }
        }
    }

    fn prime_with(state: &mut RelayState, records: &[BanRecord]) -> CycleOutcome {
        state.cursor = records.first().map(|record| record.subject_id.clone());
        info!(
            target: RELAY_TARGET,
            cursor = ?state.cursor.as_ref().map(BanId::as_str),
            "Cursor primed from newest ban"
        );
        CycleOutcome::Primed
    }
}
