// ── Poll orchestrator ──
//
// Fixed-cadence loop that reads the three telemetry endpoints
// concurrently and hands one `CycleReport` per cycle to whoever owns the
// dashboard. Failures never escape: they become a report with an error.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::Local;
use ctewatch_api::{
    CacheResponse, ChaosResponse, Endpoint, Error as ApiError, StatsResponse, TelemetryClient,
};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::CycleError;
use crate::model::Telemetry;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(2000);

// ── Source seam ──────────────────────────────────────────────────────

/// Anything that can serve the three snapshot reads.
pub trait TelemetrySource: Send + Sync + 'static {
    fn stats(&self) -> impl Future<Output = Result<StatsResponse, ApiError>> + Send;
    fn chaos(&self) -> impl Future<Output = Result<ChaosResponse, ApiError>> + Send;
    fn cache(&self) -> impl Future<Output = Result<CacheResponse, ApiError>> + Send;
}

impl TelemetrySource for TelemetryClient {
    fn stats(&self) -> impl Future<Output = Result<StatsResponse, ApiError>> + Send {
        TelemetryClient::stats(self)
    }

    fn chaos(&self) -> impl Future<Output = Result<ChaosResponse, ApiError>> + Send {
        TelemetryClient::chaos(self)
    }

    fn cache(&self) -> impl Future<Output = Result<CacheResponse, ApiError>> + Send {
        TelemetryClient::cache(self)
    }
}

// ── Config ───────────────────────────────────────────────────────────

/// What to do when a tick fires while the previous cycle is still running.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum OverlapPolicy {
    /// Start a new cycle anyway; reports land in completion order.
    #[default]
    Allow,
    /// Drop the tick.
    Skip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollerConfig {
    pub interval: Duration,
    pub overlap: OverlapPolicy,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            overlap: OverlapPolicy::default(),
        }
    }
}

// ── Cycle ────────────────────────────────────────────────────────────

/// Outcome of one poll cycle. `cycle` counts from 1 in start order.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    pub cycle: u64,
    pub result: Result<Telemetry, CycleError>,
}

impl CycleReport {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Run one cycle: all three reads concurrently, waiting for every one of
/// them to settle before deciding the outcome.
pub async fn run_cycle<S: TelemetrySource>(source: &S, cycle: u64) -> CycleReport {
    let (stats, chaos, cache) = tokio::join!(source.stats(), source.chaos(), source.cache());

    let result = assemble(stats, chaos, cache);
    match &result {
        Ok(_) => debug!(cycle, "poll cycle complete"),
        Err(e) => warn!(cycle, endpoint = %e.endpoint(), error = %e, "telemetry unreachable"),
    }
    CycleReport { cycle, result }
}

/// Combine settled reads; the first failure in endpoint order wins.
fn assemble(
    stats: Result<StatsResponse, ApiError>,
    chaos: Result<ChaosResponse, ApiError>,
    cache: Result<CacheResponse, ApiError>,
) -> Result<Telemetry, CycleError> {
    let stats = stats.map_err(|e| CycleError::from_api(Endpoint::Stats, &e))?;
    let chaos = chaos.map_err(|e| CycleError::from_api(Endpoint::Chaos, &e))?;
    let cache = cache.map_err(|e| CycleError::from_api(Endpoint::Dns, &e))?;
    Ok(Telemetry {
        stats: stats.into(),
        chaos: chaos.into(),
        cache: cache.into(),
        fetched_at: Local::now(),
    })
}

// ── Poller ───────────────────────────────────────────────────────────

pub struct Poller<S> {
    source: Arc<S>,
    config: PollerConfig,
}

impl<S: TelemetrySource> Poller<S> {
    pub fn new(source: S, config: PollerConfig) -> Self {
        Self {
            source: Arc::new(source),
            config,
        }
    }

    pub fn config(&self) -> PollerConfig {
        self.config
    }

    /// Spawn [`run`](Self::run) onto the current runtime.
    pub fn spawn(self, tx: mpsc::Sender<CycleReport>, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(self.run(tx, cancel))
    }

    /// Tick until `cancel` fires or the receiver goes away. The first cycle
    /// starts immediately. Each cycle runs on its own task so a hung read
    /// never delays the timer.
    pub async fn run(self, tx: mpsc::Sender<CycleReport>, cancel: CancellationToken) {
        let mut interval = tokio::time::interval(self.config.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let in_flight = Arc::new(AtomicBool::new(false));
        let mut cycle: u64 = 0;

        debug!(
            interval_ms = self.config.interval.as_millis(),
            overlap = %self.config.overlap,
            "poller started"
        );

        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                _ = interval.tick() => {
                    if tx.is_closed() {
                        debug!("report receiver dropped; stopping poller");
                        break;
                    }
                    let skip = self.config.overlap == OverlapPolicy::Skip
                        && in_flight.swap(true, Ordering::AcqRel);
                    if skip {
                        debug!("previous cycle still in flight; skipping tick");
                    } else {
                        cycle += 1;
                        self.spawn_cycle(cycle, &tx, &cancel, &in_flight);
                    }
                }
            }
        }

        debug!(cycles = cycle, "poller stopped");
    }

    fn spawn_cycle(
        &self,
        cycle: u64,
        tx: &mpsc::Sender<CycleReport>,
        cancel: &CancellationToken,
        in_flight: &Arc<AtomicBool>,
    ) {
        let source = Arc::clone(&self.source);
        let tx = tx.clone();
        let cancel = cancel.clone();
        let guard =
            (self.config.overlap == OverlapPolicy::Skip).then(|| InFlight(Arc::clone(in_flight)));

        tokio::spawn(async move {
            let _guard = guard;
            tokio::select! {
                biased;
                () = cancel.cancelled() => {}
                report = run_cycle(source.as_ref(), cycle) => {
                    if tx.send(report).await.is_err() {
                        debug!(cycle, "report receiver dropped");
                    }
                }
            }
        });
    }
}

/// Clears the in-flight flag when a cycle task ends, however it ends.
struct InFlight(Arc<AtomicBool>);

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
