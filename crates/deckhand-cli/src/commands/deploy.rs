//! Deploy command - run a full deploy attempt
//!
//! Wires the engine stack from configuration, runs the attempt, and renders
//! the terminal report. Conflicts are resolved interactively unless
//! `--no-input` is given, in which case any conflict cancels the deploy.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Args;
use tracing::debug;

use deckhand_deploy::{DeployEvent, DeployOutcome, DeployReport};

use crate::commands::{build_wiring, load_valid_config};
use crate::output::{reporter_for, OutputFormat, Reporter};
use crate::prompt::PromptArbiter;

#[derive(Debug, Args)]
pub struct DeployCommand {
    /// Cancel instead of prompting when conflicts need decisions
    #[arg(long)]
    pub no_input: bool,
}

impl DeployCommand {
    pub async fn execute(&self, format: OutputFormat, config: Option<&str>) -> Result<()> {
        let reporter = reporter_for(format);
        let config = load_valid_config(config)?;

        let arbiter = if self.no_input {
            Arc::new(PromptArbiter::auto_cancel())
        } else {
            Arc::new(PromptArbiter::interactive())
        };
        let wiring = build_wiring(&config, arbiter).await?;

        // Live per-file progress for humans; JSON callers get the report.
        let (engine, printer) = if matches!(format, OutputFormat::Human) {
            let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
            let printer = tokio::spawn(async move {
                while let Some(event) = rx.recv().await {
                    print_event(&event);
                }
            });
            (wiring.engine.with_events(tx), Some(printer))
        } else {
            (wiring.engine, None)
        };

        let report = engine.run().await.context("deploy attempt failed")?;

        // Close the event channel so the printer drains and exits.
        drop(engine);
        if let Some(printer) = printer {
            let _ = printer.await;
        }

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

fn print_event(event: &DeployEvent) {
    match event {
        DeployEvent::PhaseChanged(phase) => debug!(?phase, "Phase change"),
        DeployEvent::Reconciled(path) => println!("  = {} (absorbed, no write)", path),
        DeployEvent::Pulled(path) => println!("  < {} (remote content pulled)", path),
        DeployEvent::Skipped(path) => println!("  - {} (skipped)", path),
        DeployEvent::FileCommitted {
            path,
            new_version_id,
        } => match new_version_id {
            Some(id) => println!("  \u{2713} {} ({})", path, id),
            None => println!("  \u{2713} {} (deleted)", path),
        },
        DeployEvent::FileFailed { path, error } => {
            eprintln!("  \u{2717} {}: {}", path, error)
        }
    }
}

pub(crate) fn render_report(
    report: &DeployReport,
    format: OutputFormat,
    reporter: &dyn Reporter,
) -> Result<()> {
    if format.is_json() {
        let json = serde_json::to_value(report).context("serializing deploy report")?;
        reporter.payload(&json);
        return Ok(());
    }

    match report.outcome {
        DeployOutcome::Completed => {
            reporter.done(&format!(
                "Deploy complete: {} committed, {} pulled, {} skipped ({} ms)",
                report.succeeded_count(),
                report.pulled.len(),
                report.skipped.len(),
                report.duration_ms
            ));
        }
        DeployOutcome::NoChanges => {
            if report.reconciled.is_empty() {
                reporter.done("Nothing to deploy");
            } else {
                reporter.done(&format!(
                    "Nothing to deploy ({} false conflict{} absorbed)",
                    report.reconciled.len(),
                    if report.reconciled.len() == 1 { "" } else { "s" }
                ));
            }
        }
        DeployOutcome::Cancelled => {
            reporter.caution("Deploy cancelled; nothing was written");
        }
        DeployOutcome::PartialFailure => {
            reporter.fail(&format!(
                "Deploy finished with failures: {} succeeded, {} failed",
                report.succeeded_count(),
                report.failed_count()
            ));
            for result in report.results.iter().filter(|r| !r.success) {
                reporter.commit_row(result);
            }
        }
    }
    Ok(())
}
