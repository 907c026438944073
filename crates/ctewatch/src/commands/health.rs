//! `ctewatch health`: liveness probe against `/api/health`.

use serde::Serialize;

use ctewatch_config::Config;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output::{self, Row};

#[derive(Debug, Serialize)]
struct HealthReport {
    url: String,
    status: Option<String>,
    running: Option<bool>,
}

pub async fn handle(config: &Config, global: &GlobalOpts) -> Result<(), CliError> {
    let client = super::client(config)?;
    let resp = client
        .health()
        .await
        .map_err(|e| CliError::from_api(e, &config.source.url, config.source.timeout_secs))?;

    let report = HealthReport {
        url: client.base_url().to_string(),
        status: resp.status,
        running: resp.running,
    };
    let out = output::render_single(global.output, &report, |r| {
        vec![
            Row::new("URL", r.url.clone()),
            Row::new("Status", r.status.clone().unwrap_or_else(|| "unknown".into())),
            Row::new(
                "Running",
                r.running.map_or_else(|| "unknown".into(), |b| b.to_string()),
            ),
        ]
    })?;
    output::print_output(&out, global.quiet);

    if report.running == Some(false) {
        return Err(CliError::Unhealthy {
            status: report.status.unwrap_or_else(|| "unknown".into()),
        });
    }
    Ok(())
}
