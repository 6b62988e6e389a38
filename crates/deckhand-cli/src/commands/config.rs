//! Config command - view, create, and validate configuration
//!
//! Provides the `deckhand config` CLI command which:
//! 1. Shows the effective configuration (YAML or JSON)
//! 2. Writes a starter configuration file
//! 3. Validates the configuration file and reports errors

use anyhow::{Context, Result};
use clap::Subcommand;
use tracing::info;

use deckhand_core::config::Config;

use crate::commands::config_path;
use crate::output::{reporter_for, OutputFormat};

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display the effective configuration
    Show,
    /// Write a starter configuration file
    Init,
    /// Validate the configuration file
    Validate,
}

impl ConfigCommand {
    pub async fn execute(&self, format: OutputFormat, config: Option<&str>) -> Result<()> {
        match self {
            ConfigCommand::Show => self.execute_show(format, config).await,
            ConfigCommand::Init => self.execute_init(format, config).await,
            ConfigCommand::Validate => self.execute_validate(format, config).await,
        }
    }

    async fn execute_show(&self, format: OutputFormat, config: Option<&str>) -> Result<()> {
        let reporter = reporter_for(format);

        let path = config_path(config);
        let config = Config::load_or_default(&path);

        info!(config_path = %path.display(), "Showing configuration");

        if format.is_json() {
            let json = serde_json::to_value(&config)
                .context("Failed to serialize configuration to JSON")?;
            reporter.payload(&json);
        } else {
            reporter.done(&format!("Configuration ({})", path.display()));
            reporter.detail("");

            let yaml = serde_yaml::to_string(&config)
                .context("Failed to serialize configuration to YAML")?;
            for line in yaml.lines() {
                reporter.detail(line);
            }
        }

        Ok(())
    }

    async fn execute_init(&self, format: OutputFormat, config: Option<&str>) -> Result<()> {
        let reporter = reporter_for(format);

        let path = config_path(config);
        if path.exists() {
            reporter.fail(&format!("{} already exists; not overwriting", path.display()));
            return Ok(());
        }

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .context("Failed to create configuration directory")?;
            }
        }

        let yaml = serde_yaml::to_string(&Config::default())
            .context("Failed to serialize configuration")?;
        std::fs::write(&path, &yaml).context("Failed to write configuration file")?;

        if format.is_json() {
            reporter.payload(&serde_json::json!({
                "success": true,
                "config_path": path.display().to_string(),
            }));
        } else {
            reporter.done(&format!("Wrote {}", path.display()));
            reporter.detail("Set remote.base_url before deploying.");
        }
        Ok(())
    }

    async fn execute_validate(&self, format: OutputFormat, config: Option<&str>) -> Result<()> {
        let reporter = reporter_for(format);

        let path = config_path(config);
        let config = match Config::load(&path) {
            Ok(cfg) => cfg,
            Err(e) => {
                let message = if path.exists() {
                    format!("Failed to parse configuration: {}", e)
                } else {
                    "Configuration file not found. Run 'deckhand config init' to create one."
                        .to_string()
                };
                if format.is_json() {
                    reporter.payload(&serde_json::json!({
                        "valid": false,
                        "config_path": path.display().to_string(),
                        "errors": [message],
                    }));
                } else {
                    reporter.fail(&message);
                    reporter.detail(&format!("File: {}", path.display()));
                }
                return Ok(());
            }
        };

        info!(config_path = %path.display(), "Validating configuration");

        let errors = config.validate();

        if format.is_json() {
            let error_strings: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            reporter.payload(&serde_json::json!({
                "valid": errors.is_empty(),
                "config_path": path.display().to_string(),
                "errors": error_strings,
            }));
        } else if errors.is_empty() {
            reporter.done("Configuration is valid");
            reporter.detail(&format!("File: {}", path.display()));
        } else {
            reporter.fail(&format!(
                "Configuration has {} error{}:",
                errors.len(),
                if errors.len() == 1 { "" } else { "s" }
            ));
            reporter.detail(&format!("File: {}", path.display()));
            reporter.detail("");
            for error in &errors {
                reporter.detail(&format!("  {} - {}", error.field, error.message));
            }
        }

        Ok(())
    }
}
