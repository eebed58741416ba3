//! Periodic zone occupancy polling.
//!
//! Each tick fetches the vessel list for every zone in one request and
//! replaces the published report. A failed tick keeps the previous report
//! and publishes the failure separately until the next successful poll.
//! A tick that fires while the previous poll is still waiting on the backend
//! is skipped.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use seawatch_core::error::{Result, SeawatchError};
use seawatch_core::models::OccupancyReport;
use seawatch_core::ports::OccupancyApi;

/// What a single poll did
#[derive(Debug)]
pub enum TickOutcome {
    Updated { zones: usize, vessels: usize },
    /// The previous poll was still in flight
    Skipped,
    /// The poll failed; the previous report is still published
    Failed(Arc<SeawatchError>),
}

/// Occupancy poller
pub struct ZoneSync {
    api: Arc<dyn OccupancyApi>,
    period: Duration,
    report: watch::Sender<Arc<OccupancyReport>>,
    failure: watch::Sender<Option<Arc<SeawatchError>>>,
    in_flight: AtomicBool,
}

impl ZoneSync {
    /// Fails with `ConfigInvalid` when `period` is zero
    pub fn new(api: Arc<dyn OccupancyApi>, period: Duration) -> Result<Self> {
        if period.is_zero() {
            return Err(SeawatchError::ConfigInvalid {
                key: "poll_interval_secs".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }

        let (report, _) = watch::channel(Arc::new(OccupancyReport::default()));
        let (failure, _) = watch::channel(None);
        Ok(Self { api, period, report, failure, in_flight: AtomicBool::new(false) })
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Latest report; empty until the first successful poll
    pub fn report(&self) -> Arc<OccupancyReport> {
        self.report.borrow().clone()
    }

    /// Receiver notified on every successful poll
    pub fn subscribe(&self) -> watch::Receiver<Arc<OccupancyReport>> {
        self.report.subscribe()
    }

    /// Error of the most recent poll, cleared by the next successful one
    pub fn last_failure(&self) -> Option<Arc<SeawatchError>> {
        self.failure.borrow().clone()
    }

    /// Receiver notified when a poll fails and when polling recovers
    pub fn subscribe_failures(&self) -> watch::Receiver<Option<Arc<SeawatchError>>> {
        self.failure.subscribe()
    }

    pub fn is_polling(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Poll once
    pub async fn tick(&self) -> TickOutcome {
        let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
            debug!("Previous occupancy poll still in flight, skipping tick");
            return TickOutcome::Skipped;
        };

        match self.api.fetch_occupancy().await {
            Ok(vessels) => {
                let report = OccupancyReport::new(vessels, Utc::now());
                let zones = report.zone_ids().count();
                let vessel_count = report.total_vessels();
                self.report.send_replace(Arc::new(report));
                self.failure.send_if_modified(|failure| failure.take().is_some());
                debug!(zones, vessels = vessel_count, "Occupancy report updated");
                TickOutcome::Updated { zones, vessels: vessel_count }
            }
            Err(e) => {
                warn!(error = %e, "Occupancy poll failed, keeping previous report");
                let e = Arc::new(e);
                self.failure.send_replace(Some(Arc::clone(&e)));
                TickOutcome::Failed(e)
            }
        }
    }

    /// Start polling every period, beginning immediately
    ///
    /// Each poll runs as its own task so a slow response never delays the
    /// timer; overlapping polls are skipped by [`ZoneSync::tick`].
    pub fn spawn(self: &Arc<Self>) -> PollerHandle {
        let token = CancellationToken::new();
        let cancelled = token.clone();
        let sync = Arc::clone(self);

        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(sync.period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            info!(period_secs = sync.period.as_secs_f64(), "Occupancy poller started");

            loop {
                tokio::select! {
                    _ = cancelled.cancelled() => break,
                    _ = interval.tick() => {
                        let sync = Arc::clone(&sync);
                        tokio::spawn(async move {
                            sync.tick().await;
                        });
                    }
                }
            }

            info!("Occupancy poller stopped");
        });

        PollerHandle { token, task: Some(task) }
    }
}

/// Clears the in-flight flag when the poll finishes, however it finishes
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire).ok()?;
        Some(Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Stops the poll loop when stopped or dropped
pub struct PollerHandle {
    token: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl PollerHandle {
    /// Stop the loop; safe to call more than once
    pub fn stop(&self) {
        self.token.cancel();
    }

    pub fn is_stopped(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Stop the loop and wait for it to exit
    ///
    /// Returns `false` when the loop ended by panicking rather than by being
    /// stopped.
    pub async fn join(mut self) -> bool {
        self.token.cancel();
        match self.task.take() {
            Some(task) => match task.await {
                Ok(()) => true,
                Err(e) => {
                    error!(error = %e, "Occupancy poller task failed");
                    false
                }
            },
            None => true,
        }
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
