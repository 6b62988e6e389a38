//! Interactive conflict arbiter
//!
//! Presents each genuine conflict on stderr and reads one decision per path
//! from stdin. An empty line, `c`, or EOF cancels the whole deploy, which
//! the engine treats as "write nothing, persist nothing".

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use async_trait::async_trait;

use deckhand_core::domain::change::{ConflictInfo, ResolvedConflict, Resolution};
use deckhand_core::ports::conflict_arbiter::IConflictArbiter;

/// `IConflictArbiter` over the controlling terminal
pub struct PromptArbiter {
    interactive: bool,
}

impl PromptArbiter {
    /// Prompts on stdin/stderr for every conflict.
    pub fn interactive() -> Self {
        Self { interactive: true }
    }

    /// Cancels immediately on any conflict. Used with `--no-input` so a
    /// scripted run never blocks on a prompt.
    pub fn auto_cancel() -> Self {
        Self { interactive: false }
    }
}

/// What the prompt needs to show for one conflict; detached from
/// `ConflictInfo` so the blocking stdin loop owns its data.
struct PromptItem {
    path: deckhand_core::domain::newtypes::RepoPath,
    kind: String,
    remote: String,
}

fn read_decisions(items: Vec<PromptItem>) -> Result<Option<Vec<ResolvedConflict>>> {
    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    let mut stderr = std::io::stderr();

    writeln!(
        stderr,
        "{} conflict{} need a decision:",
        items.len(),
        if items.len() == 1 { "" } else { "s" }
    )?;

    let mut decisions = Vec::with_capacity(items.len());
    for item in items {
        loop {
            write!(
                stderr,
                "  {} ({}, remote {}) [o]verwrite / [p]ull / [s]kip / [c]ancel: ",
                item.path, item.kind, item.remote
            )?;
            stderr.flush()?;

            let line = match lines.next() {
                Some(line) => line.context("reading conflict decision")?,
                // EOF: no way to finish the decision list.
                None => return Ok(None),
            };

            let resolution = match line.trim().to_lowercase().as_str() {
                "o" | "overwrite" => Resolution::Overwrite,
                "p" | "pull" => Resolution::Pull,
                "s" | "skip" => Resolution::Skip,
                "" | "c" | "cancel" => return Ok(None),
                other => {
                    writeln!(stderr, "  unrecognized answer: {:?}", other)?;
                    continue;
                }
            };
            decisions.push(ResolvedConflict::new(item.path.clone(), resolution));
            break;
        }
    }
    Ok(Some(decisions))
}

#[async_trait]
impl IConflictArbiter for PromptArbiter {
    async fn resolve(
        &self,
        conflicts: &[ConflictInfo],
    ) -> Result<Option<Vec<ResolvedConflict>>> {
        if !self.interactive {
            eprintln!(
                "{} conflict(s) found and --no-input is set; cancelling",
                conflicts.len()
            );
            return Ok(None);
        }

        let items: Vec<PromptItem> = conflicts
            .iter()
            .map(|c| PromptItem {
                path: c.path().clone(),
                kind: c.change().kind().to_string(),
                remote: c
                    .remote_version_id()
                    .map(|v| v.to_string())
                    .unwrap_or_else(|| "absent".to_string()),
            })
            .collect();

        // Stdin reads block; keep them off the async runtime.
        tokio::task::spawn_blocking(move || read_decisions(items))
            .await
            .context("conflict prompt task")?
    }
}
