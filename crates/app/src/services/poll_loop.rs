//! Poll loop: the long-running task keeping devices in sync with the account.
//!
//! Every tick fetches the whole account, re-authenticates once on an expired
//! session, and hands successful snapshots to the [`Reconciler`]. Failures are
//! reported through an [`ErrorMemo`] so an outage does not flood the log; the
//! memo is cleared every `reset_every` ticks so a persisting error shows up
//! again periodically.

use std::time::Duration;

use bedsync_domain::error::RemoteError;
use tokio::sync::watch;

use super::error_memo::ErrorMemo;
use super::reconcile::Reconciler;
use crate::ports::{DeviceStore, RemoteSession};

pub const NO_BEDS_MESSAGE: &str = "There are no beds associated with this SleepIQ account. This plugin only works with beds that are registered with the SleepIQ service.";

pub const CREDENTIALS_REJECTED_MESSAGE: &str = "Unable to connect to the SleepIQ service with the provided username and password.  Please verify the username and password settings in the SleepyBed IQ configuration.";

/// Text reported when the account's bed list can't be fetched.
#[must_use]
pub fn load_failure_message(err: &impl std::fmt::Display) -> String {
    format!("Unable to load the list of beds associated with this SleepIQ account. Error: {err}")
}

/// Text reported when a (re-)login fails for any reason.
#[must_use]
pub fn login_failure_message(err: &RemoteError) -> String {
    if err.is_authentication() {
        CREDENTIALS_REJECTED_MESSAGE.to_string()
    } else {
        format!("Unable to connect to the SleepIQ service. Error: {err}")
    }
}

/// Timing of the poll loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    /// Pause between two ticks.
    pub interval: Duration,
    /// Number of ticks after which the error memo is cleared.
    pub reset_every: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(30),
            reset_every: 20,
        }
    }
}

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickStatus {
    /// A snapshot was fetched and applied.
    Reconciled { beds: usize, devices_updated: usize },
    /// The account answered with no beds.
    NoBeds,
    /// Nothing was applied this tick.
    Skipped,
}

/// Outcome of one tick, for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickOutcome {
    pub status: TickStatus,
    /// An error was logged (not suppressed by the memo).
    pub error_reported: bool,
    pub relogin_attempted: bool,
}

impl TickOutcome {
    fn new(status: TickStatus) -> Self {
        Self {
            status,
            error_reported: false,
            relogin_attempted: false,
        }
    }
}

/// Owns the polling state: the memo and the tick counter.
pub struct PollLoop<R, S> {
    reconciler: Reconciler<R, S>,
    config: PollConfig,
    memo: ErrorMemo,
    ticks: u32,
}

impl<R: RemoteSession, S: DeviceStore> PollLoop<R, S> {
    /// Create a new poll loop driving the given reconciler.
    pub fn new(reconciler: Reconciler<R, S>, config: PollConfig) -> Self {
        Self {
            reconciler,
            config,
            memo: ErrorMemo::default(),
            ticks: 0,
        }
    }

    #[must_use]
    pub fn memo(&self) -> &ErrorMemo {
        &self.memo
    }

    /// Run until `shutdown` flips to `true` (or its sender is dropped).
    ///
    /// Cancellation is observed while sleeping between ticks; a tick already
    /// in flight completes first.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        tracing::info!(
            interval_secs = self.config.interval.as_secs(),
            reset_every = self.config.reset_every,
            "poll loop started"
        );
        loop {
            let cancelled = *shutdown.borrow();
            if cancelled {
                break;
            }
            let outcome = self.tick().await;
            tracing::debug!(?outcome, "poll tick finished");

            tokio::select! {
                () = tokio::time::sleep(self.config.interval) => {}
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }
        tracing::info!("poll loop stopped");
    }

    /// Perform one fetch/reconcile cycle.
    #[tracing::instrument(skip(self), fields(tick = self.ticks))]
    pub async fn tick(&mut self) -> TickOutcome {
        let outcome = self.fetch_and_apply().await;

        self.ticks += 1;
        if self.ticks >= self.config.reset_every {
            tracing::debug!("resetting error conditions");
            self.ticks = 0;
            self.memo.clear();
        }

        outcome
    }

    async fn fetch_and_apply(&mut self) -> TickOutcome {
        tracing::debug!("updating beds and sleepers list");
        let remote = self.reconciler.remote();

        match remote.beds_with_sleeper_status().await {
            Ok(snapshot) if snapshot.is_empty() => TickOutcome {
                error_reported: self.memo.report(NO_BEDS_MESSAGE),
                ..TickOutcome::new(TickStatus::NoBeds)
            },
            Ok(snapshot) => match self.reconciler.apply(&snapshot, &mut self.memo).await {
                Ok(summary) => TickOutcome::new(TickStatus::Reconciled {
                    beds: summary.beds,
                    devices_updated: summary.devices_updated,
                }),
                Err(err) => TickOutcome {
                    error_reported: self
                        .memo
                        .report(format!("Unable to update the SleepNumber bed devices. Error: {err}")),
                    ..TickOutcome::new(TickStatus::Skipped)
                },
            },
            Err(err) if err.is_authentication() => {
                tracing::info!(%err, "session rejected, logging in again");
                let error_reported = match remote.login().await {
                    // The next tick fetches with the fresh session.
                    Ok(()) => false,
                    Err(login_err) => self.memo.report(login_failure_message(&login_err)),
                };
                TickOutcome {
                    status: TickStatus::Skipped,
                    error_reported,
                    relogin_attempted: true,
                }
            }
            Err(err) => TickOutcome {
                error_reported: self.memo.report(load_failure_message(&err)),
                ..TickOutcome::new(TickStatus::Skipped)
            },
        }
    }
}
