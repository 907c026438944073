//! Data bridge: runs the [`Poller`] and forwards every finished cycle into
//! the TUI's action channel.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use ctewatch_core::{Poller, PollerConfig, TelemetrySource};

use crate::action::Action;

/// Reports buffered between the poller and the bridge.
const REPORT_BUFFER: usize = 16;

/// Drive `source` until `cancel` fires or the UI drops its receiver.
pub async fn run_data_bridge<S: TelemetrySource>(
    source: S,
    config: PollerConfig,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    let (report_tx, mut report_rx) = mpsc::channel(REPORT_BUFFER);
    let poller = Poller::new(source, config).spawn(report_tx, cancel.child_token());

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            report = report_rx.recv() => {
                let Some(report) = report else { break };
                if action_tx.send(Action::Cycle(Box::new(report))).is_err() {
                    debug!("action channel closed; stopping data bridge");
                    break;
                }
            }
        }
    }

    cancel.cancel();
    if let Err(e) = poller.await {
        warn!(error = %e, "poller task ended abnormally");
    }
    debug!("data bridge stopped");
}
