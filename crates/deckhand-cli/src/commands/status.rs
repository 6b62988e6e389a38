//! Status command - show pending changes without touching the network
//!
//! Compares the workspace snapshot against the fingerprint cache and lists
//! what a deploy would attempt. Read-only: no credential check, no remote
//! probe, no cache mutation.

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use deckhand_cache::JsonFingerprintStore;
use deckhand_core::config::Config;
use deckhand_core::ports::fingerprint_store::IFingerprintStore;
use deckhand_core::ports::workspace_source::IWorkspaceSource;
use deckhand_deploy::detector::detect_changes;
use deckhand_deploy::DirWorkspaceSource;

use crate::commands::config_path;
use crate::output::{reporter_for, OutputFormat};

/// Status command with an optional path filter
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Only show changes for this repository path
    pub path: Option<String>,
}

impl StatusCommand {
    pub async fn execute(&self, format: OutputFormat, config: Option<&str>) -> Result<()> {
        let reporter = reporter_for(format);

        let path = config_path(config);
        let config = Config::load_or_default(&path);

        let workspace = DirWorkspaceSource::new(
            &config.workspace.root,
            &config.workspace.documents,
            &config.workspace.assets_dir,
            &config.workspace.ignore,
        )
        .context("setting up workspace source")?;
        let fingerprints = JsonFingerprintStore::load(
            config.workspace.root.join(&config.fingerprints.path),
        )
        .context("loading fingerprint cache")?;

        let snapshot = workspace
            .snapshot()
            .await
            .context("reading workspace snapshot")?;
        let entries = fingerprints
            .get_all()
            .await
            .context("loading fingerprint entries")?;

        info!(
            files = snapshot.len(),
            tracked = entries.len(),
            "Computing workspace status"
        );

        let mut changes = detect_changes(&snapshot, &entries);
        if let Some(filter) = &self.path {
            changes.retain(|c| c.path().as_str() == filter);
        }

        if format.is_json() {
            let json = serde_json::json!({
                "tracked": entries.len(),
                "changes": changes
                    .iter()
                    .map(|c| {
                        serde_json::json!({
                            "path": c.path().as_str(),
                            "kind": c.kind().to_string(),
                        })
                    })
                    .collect::<Vec<_>>(),
            });
            reporter.payload(&json);
            return Ok(());
        }

        if changes.is_empty() {
            reporter.done("Workspace is in sync with the fingerprint cache");
            return Ok(());
        }

        reporter.done(&format!(
            "{} pending change{}",
            changes.len(),
            if changes.len() == 1 { "" } else { "s" }
        ));
        for change in &changes {
            reporter.detail(&format!("{:<9} {}", change.kind().to_string(), change.path()));
        }
        Ok(())
    }
}
