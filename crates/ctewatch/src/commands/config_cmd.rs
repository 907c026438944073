//! Config subcommand handlers.

use ctewatch_config::{self as config, Config};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

pub fn handle(args: &ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let path = global.config.clone().unwrap_or_else(config::config_path);

    match args.command {
        ConfigCommand::Path => {
            output::print_output(&path.display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = super::resolve_config(global)?;
            let out = render_config(global.output, &cfg)?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Init { force } => {
            if path.exists() && !force {
                return Err(CliError::ConfigExists {
                    path: path.display().to_string(),
                });
            }
            config::save_config_to(&Config::default(), &path)?;
            if !global.quiet {
                eprintln!("Wrote {}", path.display());
            }
            Ok(())
        }
    }
}

/// Table and plain show the config as the TOML it would be saved as.
fn render_config(format: OutputFormat, cfg: &Config) -> Result<String, CliError> {
    match format {
        OutputFormat::Table | OutputFormat::Plain => toml::to_string_pretty(cfg)
            .map(|s| s.trim_end().to_owned())
            .map_err(|e| CliError::Render(e.to_string())),
        OutputFormat::Json => {
            serde_json::to_string_pretty(cfg).map_err(|e| CliError::Render(e.to_string()))
        }
        OutputFormat::JsonCompact => {
            serde_json::to_string(cfg).map_err(|e| CliError::Render(e.to_string()))
        }
        OutputFormat::Yaml => output::render_yaml(cfg),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn toml_view_has_every_section() {
        let out = render_config(OutputFormat::Table, &Config::default()).unwrap();
        assert!(out.contains("[source]"));
        assert!(out.contains("[poll]"));
        assert!(out.contains("interval_ms = 2000"));
        assert!(out.contains("[ui]"));
    }

    #[test]
    fn json_view_nests_sections() {
        let out = render_config(OutputFormat::JsonCompact, &Config::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["source"]["url"], "http://127.0.0.1:8080");
        assert_eq!(value["ui"]["resize_debounce_ms"], 100);
    }
}
