//! `ctewatch snapshot`: one poll cycle, every readout.

use ctewatch_config::Config;
use ctewatch_core::format::{fmt_bytes, fmt_count, fmt_uptime};
use ctewatch_core::{Dashboard, RecordingPresenter, Telemetry, run_cycle};

use crate::cli::{GlobalOpts, SnapshotArgs};
use crate::error::CliError;
use crate::output::{self, Row};

pub async fn handle(
    args: &SnapshotArgs,
    config: &Config,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let client = super::client(config)?;
    let report = run_cycle(&client, 1).await;
    let telemetry = report
        .result
        .map_err(|e| CliError::from_cycle(e, &config.source.url))?;

    let raw = args.raw;
    let out = output::render_single(global.output, &telemetry, |t| {
        if raw { raw_rows(t) } else { readout_rows(t) }
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}

/// The dashboard's readouts, exactly as the live view would show them.
pub fn readout_rows(telemetry: &Telemetry) -> Vec<Row> {
    let mut dashboard = Dashboard::new(RecordingPresenter::new());
    dashboard.on_success(telemetry);
    dashboard
        .presenter()
        .texts()
        .into_iter()
        .map(|(sink, text)| Row::new(sink.to_string(), text))
        .collect()
}

/// Unformatted counters, for when exact numbers matter.
fn raw_rows(t: &Telemetry) -> Vec<Row> {
    let s = &t.stats;
    let c = &t.cache;
    vec![
        Row::new("uptime_secs", format!("{:.0}", s.uptime)),
        Row::new("connections.active", s.connections.active.to_string()),
        Row::new("connections.total", s.connections.total.to_string()),
        Row::new("connections.success", s.connections.success.to_string()),
        Row::new("connections.failed", s.connections.failed.to_string()),
        Row::new("traffic.sent", s.traffic.sent.to_string()),
        Row::new("traffic.received", s.traffic.received.to_string()),
        Row::new("traffic.total", s.traffic.total.to_string()),
        Row::new("routing.bypassed", s.routing.bypassed.to_string()),
        Row::new("routing.tunneled", s.routing.tunneled.to_string()),
        Row::new("protocols.http", s.protocols.http.to_string()),
        Row::new("protocols.socks5", s.protocols.socks5.to_string()),
        Row::new("protocols.shadowsocks", s.protocols.shadowsocks.to_string()),
        Row::new("chaos.lyapunov_exponent", t.chaos.lyapunov_exponent.to_string()),
        Row::new("chaos.shannon_entropy", t.chaos.shannon_entropy.to_string()),
        Row::new(
            "chaos.correlation_dimension",
            t.chaos.correlation_dimension.to_string(),
        ),
        Row::new("chaos.samples_collected", t.chaos.samples_collected.to_string()),
        Row::new("dns.cache_size", c.cache_size.to_string()),
        Row::new("dns.cache_hits", c.cache_hits.to_string()),
        Row::new("dns.cache_misses", c.cache_misses.to_string()),
        Row::new("dns.hit_rate", c.hit_rate.clone().unwrap_or_default()),
    ]
}

/// Compact one-line summary used by `watch`.
pub fn summary(t: &Telemetry) -> String {
    format!(
        "up {}  active {}  total {}  traffic {}",
        fmt_uptime(t.stats.uptime),
        fmt_count(t.stats.connections.active),
        fmt_count(t.stats.connections.total),
        fmt_bytes(t.stats.traffic.total),
    )
}
