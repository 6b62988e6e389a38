//! Push-assets command - publish binary assets plus their manifest entry
//!
//! Selects assets from the workspace snapshot (everything under the assets
//! directory that is not a structured document) and hands them to the
//! engine, which registers each in the shared manifest and writes the
//! manifest as the final item of the same batch.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Args;
use tracing::info;

use deckhand_core::ports::workspace_source::IWorkspaceSource;
use deckhand_deploy::DeployOutcome;

use crate::commands::deploy::render_report;
use crate::commands::{build_wiring, load_valid_config};
use crate::output::{reporter_for, OutputFormat};
use crate::prompt::PromptArbiter;

#[derive(Debug, Args)]
pub struct PushAssetsCommand {
    /// Specific asset paths (relative to the workspace root); all assets
    /// when omitted
    pub paths: Vec<String>,
}

impl PushAssetsCommand {
    pub async fn execute(&self, format: OutputFormat, config: Option<&str>) -> Result<()> {
        let reporter = reporter_for(format);
        let config = load_valid_config(config)?;

        // The asset path never consults the arbiter; conflicts there are
        // staleness aborts, not per-file decisions.
        let wiring = build_wiring(&config, Arc::new(PromptArbiter::auto_cancel())).await?;

        let snapshot = wiring
            .workspace
            .snapshot()
            .await
            .context("reading workspace snapshot")?;
        let mut assets: Vec<_> = snapshot.into_iter().filter(|f| !f.is_document).collect();

        if !self.paths.is_empty() {
            for requested in &self.paths {
                if !assets.iter().any(|a| a.path.as_str() == requested) {
                    bail!("no such asset in the workspace: {}", requested);
                }
            }
            assets.retain(|a| self.paths.iter().any(|p| p == a.path.as_str()));
        }

        if assets.is_empty() {
            reporter.done("No assets to push");
            return Ok(());
        }

        info!(count = assets.len(), "Pushing assets");
        let report = wiring
            .engine
            .push_assets(assets)
            .await
            .context("asset push failed")?;

        render_report(&report, format, reporter.as_ref())?;
        if report.outcome == DeployOutcome::PartialFailure {
            bail!(
                "{} of {} write(s) failed",
                report.failed_count(),
                report.results.len()
            );
        }
        Ok(())
    }
}
