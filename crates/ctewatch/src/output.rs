//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde, plain emits `label<TAB>value` lines.

use std::io::{self, IsTerminal, Write};

use serde::Serialize;
use tabled::{Table, Tabled, settings::Style};

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

/// Determine whether color output should be enabled.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none(),
    }
}

/// One `label | value` row of a detail table.
#[derive(Debug, Clone, PartialEq, Eq, Tabled)]
pub struct Row {
    #[tabled(rename = "Readout")]
    pub label: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

impl Row {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render one serde-serializable item in the chosen format.
///
/// `rows_fn` supplies the label/value pairs used by both `table` and
/// `plain`; structured formats serialize `data` itself.
pub fn render_single<T>(
    format: OutputFormat,
    data: &T,
    rows_fn: impl FnOnce(&T) -> Vec<Row>,
) -> Result<String, CliError>
where
    T: Serialize + ?Sized,
{
    match format {
        OutputFormat::Table => Ok(render_table(&rows_fn(data))),
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => Ok(render_plain(&rows_fn(data))),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Format-specific renderers ────────────────────────────────────────

fn render_table(rows: &[Row]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

fn render_plain(rows: &[Row]) -> String {
    rows.iter()
        .map(|row| format!("{}\t{}", row.label, row.value))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_json<T: Serialize + ?Sized>(data: &T, compact: bool) -> Result<String, CliError> {
    let rendered = if compact {
        serde_json::to_string(data)
    } else {
        serde_json::to_string_pretty(data)
    };
    rendered.map_err(|e| CliError::Render(e.to_string()))
}

pub fn render_yaml<T: Serialize + ?Sized>(data: &T) -> Result<String, CliError> {
    serde_yaml::to_string(data).map_err(|e| CliError::Render(e.to_string()))
}
