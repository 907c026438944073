//! `ctewatch watch`: poll on the configured cadence, one line per cycle.

use std::time::Duration;

use owo_colors::OwoColorize;
use serde::Serialize;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use ctewatch_config::Config;
use ctewatch_core::{
    CycleReport, Dashboard, Poller, RecordingPresenter, Telemetry, TextSink, Transition,
};

use crate::cli::{GlobalOpts, OutputFormat, WatchArgs};
use crate::error::CliError;
use crate::output;

use super::snapshot;

/// One cycle as emitted by the structured formats (one document per line).
#[derive(Debug, Serialize)]
struct WatchEvent<'a> {
    cycle: u64,
    online: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    telemetry: Option<&'a Telemetry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

pub async fn handle(args: &WatchArgs, config: &Config, global: &GlobalOpts) -> Result<(), CliError> {
    let client = super::client(config)?;
    let mut poller = config.to_poller_config()?;
    if let Some(ms) = args.interval {
        if ms == 0 {
            return Err(CliError::Validation {
                field: "--interval".into(),
                reason: "must be at least 1".into(),
            });
        }
        poller.interval = Duration::from_millis(ms);
    }

    let color = output::should_color(global.color);
    let cancel = CancellationToken::new();
    let (tx, mut rx) = mpsc::channel(16);
    let task = Poller::new(client, poller).spawn(tx, cancel.child_token());
    let mut dashboard = Dashboard::new(RecordingPresenter::new());
    let mut seen: u64 = 0;

    loop {
        tokio::select! {
            biased;
            _ = tokio::signal::ctrl_c() => {
                debug!("interrupted");
                break;
            }
            report = rx.recv() => {
                let Some(report) = report else { break };
                let transition = dashboard.apply(&report);
                let line = render_cycle(global.output, &report, transition, &dashboard, color)?;
                output::print_output(&line, global.quiet);
                seen += 1;
                if args.count.is_some_and(|n| seen >= n) {
                    break;
                }
            }
        }
    }

    cancel.cancel();
    if let Err(e) = task.await {
        warn!(error = %e, "poller task ended abnormally");
    }
    Ok(())
}

fn render_cycle(
    format: OutputFormat,
    report: &CycleReport,
    transition: Transition,
    dashboard: &Dashboard<RecordingPresenter>,
    color: bool,
) -> Result<String, CliError> {
    match format {
        OutputFormat::Table | OutputFormat::Plain => {
            Ok(summary_line(report, transition, dashboard, color))
        }
        OutputFormat::Json | OutputFormat::JsonCompact | OutputFormat::Yaml => {
            let event = WatchEvent {
                cycle: report.cycle,
                online: report.is_ok(),
                telemetry: report.result.as_ref().ok(),
                error: report.result.as_ref().err().map(ToString::to_string),
            };
            if format == OutputFormat::Yaml {
                Ok(format!("---\n{}", output::render_yaml(&event)?.trim_end()))
            } else {
                serde_json::to_string(&event).map_err(|e| CliError::Render(e.to_string()))
            }
        }
    }
}

fn summary_line(
    report: &CycleReport,
    transition: Transition,
    dashboard: &Dashboard<RecordingPresenter>,
    color: bool,
) -> String {
    let p = dashboard.presenter();
    let text = |sink| p.text(sink).unwrap_or_default().to_owned();

    match &report.result {
        Ok(telemetry) => {
            let mark = if transition == Transition::BecameOnline {
                "● online (connected)"
            } else {
                "● online"
            };
            let detail = format!(
                "{}  success {}  hit {}",
                snapshot::summary(telemetry),
                text(TextSink::HeaderSuccessRate),
                text(TextSink::HitRate),
            );
            let time = text(TextSink::LastUpdate);
            if color {
                format!("[{}] {} {detail}", time.dimmed(), mark.green())
            } else {
                format!("[{time}] {mark} {detail}")
            }
        }
        Err(err) => {
            let mark = "○ offline";
            if color {
                format!("[#{}] {} {}", report.cycle, mark.red(), err.to_string().red())
            } else {
                format!("[#{}] {mark} {err}", report.cycle)
            }
        }
    }
}
