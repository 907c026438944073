//! Polling, connectivity and visual-encoding pipeline between
//! `ctewatch-api` and the presentation layers (CLI / TUI).
//!
//! - **[`Poller`]** fetches the three telemetry endpoints on a fixed
//!   cadence and delivers one [`CycleReport`] per cycle over a channel.
//!
//! - **[`Dashboard`]** owns the connectivity state machine and the traffic
//!   sparkline. Applying a report either renders every section through a
//!   [`Presenter`] or runs the degraded reset.
//!
//! - **Formatters** ([`format`]) and **encoders** ([`encode`]) are pure
//!   functions turning numbers into readouts and gauge geometry.

pub mod connectivity;
pub mod convert;
pub mod dashboard;
pub mod debounce;
pub mod encode;
pub mod error;
pub mod format;
pub mod history;
pub mod model;
pub mod poller;
pub mod presenter;
pub mod sparkline;

// ── Primary re-exports ──────────────────────────────────────────────
pub use connectivity::{Connectivity, ConnectivityState, Transition};
pub use dashboard::Dashboard;
pub use debounce::Debouncer;
pub use encode::{ArcGeometry, Donut};
pub use error::CycleError;
pub use history::{HISTORY_CAPACITY, TrafficHistory};
pub use model::{
    CacheSnapshot, ChaosSnapshot, ConnectionCounts, ProtocolCounts, RoutingCounts, StatsSnapshot,
    Telemetry, TrafficCounts,
};
pub use poller::{CycleReport, OverlapPolicy, Poller, PollerConfig, TelemetrySource, run_cycle};
pub use presenter::{ArcSink, BarSink, Presenter, RecordingPresenter, TextSink};
pub use sparkline::{Padding, Point, Sparkline, SparklineFrame, Surface};
