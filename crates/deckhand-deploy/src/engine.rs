//! The deploy orchestrator
//!
//! [`DeployEngine`] drives a full deploy attempt through the phase machine:
//!
//! 1. **detecting**: credential check, workspace snapshot, change detection
//! 2. **fetching**: remote version probe, classification, baseline
//!    reconciliation
//! 3. **resolving**: conflict decisions via the arbiter (only when needed)
//! 4. **committing**: the sequential write batch, then one durable
//!    fingerprint save
//!
//! Failures before `committing` are total and non-destructive. Failures
//! during `committing` are per-file; the terminal [`DeployReport`] always
//! carries the full result list. Cancellation never persists staged
//! fingerprint absorptions.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use serde::Serialize;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{info, warn};

use deckhand_conflict::{
    apply_resolutions, classify_changes, reconcile_baseline, ResolutionOutcome,
};
use deckhand_core::domain::canonical::hash_content;
use deckhand_core::domain::change::{ConflictInfo, FileChange};
use deckhand_core::domain::commit::CommitResult;
use deckhand_core::domain::newtypes::{AttemptId, RepoPath, VersionId};
use deckhand_core::ports::conflict_arbiter::IConflictArbiter;
use deckhand_core::ports::content_store::IContentStore;
use deckhand_core::ports::credential_source::ICredentialSource;
use deckhand_core::ports::fingerprint_store::IFingerprintStore;
use deckhand_core::ports::workspace_source::{IWorkspaceSource, LocalFile};

use crate::committer::commit_batch;
use crate::detector::detect_changes;
use crate::manifest::{AssetEntry, AssetManifest};
use crate::phase::DeployPhase;
use crate::DeployError;

/// Progress notification emitted during a deploy attempt
#[derive(Debug, Clone)]
pub enum DeployEvent {
    PhaseChanged(DeployPhase),
    /// A false-positive conflict was absorbed with zero writes
    Reconciled(RepoPath),
    /// Remote content was applied locally per a `pull` decision
    Pulled(RepoPath),
    /// A path left the commit set per a `skip` decision
    Skipped(RepoPath),
    FileCommitted {
        path: RepoPath,
        new_version_id: Option<VersionId>,
    },
    FileFailed {
        path: RepoPath,
        error: String,
    },
}

/// How a deploy attempt ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeployOutcome {
    /// Every attempted write succeeded
    Completed,
    /// Nothing needed writing (possibly after reconciliation)
    NoChanges,
    /// The collaborator declined conflict resolution; zero writes
    Cancelled,
    /// Some writes succeeded, some failed
    PartialFailure,
}

/// Terminal report of a deploy attempt
///
/// Every candidate path ends in exactly one place: `results` (committed or
/// failed-with-reason), `reconciled`, `pulled`, or `skipped`.
#[derive(Debug, Clone, Serialize)]
pub struct DeployReport {
    pub attempt_id: AttemptId,
    pub outcome: DeployOutcome,
    pub results: Vec<CommitResult>,
    pub reconciled: Vec<RepoPath>,
    pub pulled: Vec<RepoPath>,
    pub skipped: Vec<RepoPath>,
    /// First failure's message, for quick context alongside the full list
    pub first_error: Option<String>,
    pub duration_ms: u64,
}

impl DeployReport {
    pub fn succeeded_count(&self) -> usize {
        self.results.iter().filter(|r| r.success).count()
    }

    pub fn failed_count(&self) -> usize {
        self.results.iter().filter(|r| !r.success).count()
    }
}

/// The deploy orchestrator
///
/// Single-task and sequential by design: every remote write's precondition
/// is derived from a fetch earlier in the same attempt, so concurrent
/// writes would invalidate each other.
pub struct DeployEngine {
    store: Arc<dyn IContentStore>,
    workspace: Arc<dyn IWorkspaceSource>,
    fingerprints: Arc<dyn IFingerprintStore>,
    credentials: Arc<dyn ICredentialSource>,
    arbiter: Arc<dyn IConflictArbiter>,
    /// Prefix for remote commit messages
    message_prefix: String,
    /// Repository path of the shared asset manifest
    manifest_path: RepoPath,
    events: Option<UnboundedSender<DeployEvent>>,
}

impl DeployEngine {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        store: Arc<dyn IContentStore>,
        workspace: Arc<dyn IWorkspaceSource>,
        fingerprints: Arc<dyn IFingerprintStore>,
        credentials: Arc<dyn ICredentialSource>,
        arbiter: Arc<dyn IConflictArbiter>,
        message_prefix: impl Into<String>,
        manifest_path: RepoPath,
    ) -> Self {
        Self {
            store,
            workspace,
            fingerprints,
            credentials,
            arbiter,
            message_prefix: message_prefix.into(),
            manifest_path,
            events: None,
        }
    }

    /// Attaches a progress event channel.
    pub fn with_events(mut self, events: UnboundedSender<DeployEvent>) -> Self {
        self.events = Some(events);
        self
    }

    /// Read-only change detection, for `status`-style queries. Touches
    /// neither the network nor the fingerprint file.
    pub async fn detect(&self) -> Result<Vec<FileChange>, DeployError> {
        let snapshot = self
            .workspace
            .snapshot()
            .await
            .context("reading workspace snapshot")?;
        let fingerprints = self
            .fingerprints
            .get_all()
            .await
            .context("loading fingerprint entries")?;
        Ok(detect_changes(&snapshot, &fingerprints))
    }

    /// Runs a full deploy attempt.
    #[tracing::instrument(skip(self))]
    pub async fn run(&self) -> Result<DeployReport, DeployError> {
        let attempt_id = AttemptId::new();
        let started = Instant::now();
        info!(%attempt_id, "Starting deploy attempt");

        let mut phase = DeployPhase::Idle;
        self.enter(&mut phase, DeployPhase::Detecting)?;

        if let Err(e) = self.credentials.bearer_token().await {
            self.fail(&mut phase);
            return Err(e.into());
        }

        let changes = self.detect().await?;
        if changes.is_empty() {
            info!("No changes to deploy");
            self.enter(&mut phase, DeployPhase::Done)?;
            return Ok(self.report(attempt_id, DeployOutcome::NoChanges, started));
        }

        self.enter(&mut phase, DeployPhase::Fetching)?;
        let paths: Vec<RepoPath> = changes.iter().map(|c| c.path().clone()).collect();
        let remote_ids = match self.store.fetch_version_ids(&paths).await {
            Ok(ids) => ids,
            Err(e) => {
                self.fail(&mut phase);
                return Err(e.into());
            }
        };

        let classified = classify_changes(changes, &remote_ids);
        let baseline = match reconcile_baseline(
            classified,
            self.store.as_ref(),
            self.fingerprints.as_ref(),
        )
        .await
        {
            Ok(outcome) => outcome,
            Err(e) => {
                self.fail(&mut phase);
                return Err(e.into());
            }
        };
        for path in &baseline.reconciled {
            self.emit(DeployEvent::Reconciled(path.clone()));
        }

        if baseline.remaining.is_empty() {
            info!(
                reconciled = baseline.reconciled.len(),
                "Reconciliation emptied the change set"
            );
            self.fingerprints
                .save()
                .await
                .context("persisting absorbed fingerprints")?;
            self.enter(&mut phase, DeployPhase::Done)?;
            let mut report = self.report(attempt_id, DeployOutcome::NoChanges, started);
            report.reconciled = baseline.reconciled;
            return Ok(report);
        }

        let has_conflicts = baseline.remaining.iter().any(ConflictInfo::has_conflict);
        let (commit_set, pulled, skipped) = if has_conflicts {
            self.enter(&mut phase, DeployPhase::Resolving)?;
            let conflicting: Vec<ConflictInfo> = baseline
                .remaining
                .iter()
                .filter(|i| i.has_conflict())
                .cloned()
                .collect();
            let decisions = self
                .arbiter
                .resolve(&conflicting)
                .await
                .context("collecting conflict decisions")?;

            let resolved = match apply_resolutions(
                baseline.remaining,
                decisions,
                self.store.as_ref(),
                self.workspace.as_ref(),
                self.fingerprints.as_ref(),
            )
            .await
            {
                Ok(outcome) => outcome,
                Err(e) => {
                    self.fail(&mut phase);
                    return Err(e.into());
                }
            };

            match resolved {
                ResolutionOutcome::Cancelled => {
                    // Staged absorptions are deliberately not saved: the
                    // attempt must leave no trace.
                    info!("Deploy cancelled; nothing written, nothing persisted");
                    self.enter(&mut phase, DeployPhase::Done)?;
                    let mut report =
                        self.report(attempt_id, DeployOutcome::Cancelled, started);
                    report.reconciled = baseline.reconciled;
                    return Ok(report);
                }
                ResolutionOutcome::Resolved {
                    commit,
                    pulled,
                    skipped,
                } => {
                    for path in &pulled {
                        self.emit(DeployEvent::Pulled(path.clone()));
                    }
                    for path in &skipped {
                        self.emit(DeployEvent::Skipped(path.clone()));
                    }
                    (commit, pulled, skipped)
                }
            }
        } else {
            (baseline.remaining, Vec::new(), Vec::new())
        };

        if commit_set.is_empty() {
            // Everything was reconciled, pulled, or skipped; absorbed
            // entries persist.
            self.fingerprints
                .save()
                .await
                .context("persisting fingerprints")?;
            self.enter(&mut phase, DeployPhase::Done)?;
            let mut report = self.report(attempt_id, DeployOutcome::Completed, started);
            report.reconciled = baseline.reconciled;
            report.pulled = pulled;
            report.skipped = skipped;
            return Ok(report);
        }

        self.enter(&mut phase, DeployPhase::Committing)?;
        let results = commit_batch(
            commit_set,
            self.store.as_ref(),
            self.fingerprints.as_ref(),
            &self.message_prefix,
            self.events.as_ref(),
        )
        .await;

        self.fingerprints
            .save()
            .await
            .context("persisting fingerprints after commit")?;

        let first_error = results
            .iter()
            .find(|r| !r.success)
            .and_then(|r| r.error.clone());
        let outcome = if first_error.is_none() {
            self.enter(&mut phase, DeployPhase::Done)?;
            DeployOutcome::Completed
        } else {
            warn!(
                failed = results.iter().filter(|r| !r.success).count(),
                "Deploy finished with per-file failures"
            );
            self.enter(&mut phase, DeployPhase::Error)?;
            DeployOutcome::PartialFailure
        };

        let mut report = self.report(attempt_id, outcome, started);
        report.results = results;
        report.reconciled = baseline.reconciled;
        report.pulled = pulled;
        report.skipped = skipped;
        report.first_error = first_error;
        Ok(report)
    }

    /// Publishes binary assets plus their manifest registration, as one
    /// sequential batch.
    ///
    /// Aborts wholesale when the manifest's remote version moved since the
    /// fingerprint cache last saw it: merging a stale manifest is guessing.
    #[tracing::instrument(skip(self, assets))]
    pub async fn push_assets(
        &self,
        assets: Vec<LocalFile>,
    ) -> Result<DeployReport, DeployError> {
        let attempt_id = AttemptId::new();
        let started = Instant::now();
        info!(%attempt_id, count = assets.len(), "Starting asset push");

        let mut phase = DeployPhase::Idle;
        self.enter(&mut phase, DeployPhase::Detecting)?;

        if let Err(e) = self.credentials.bearer_token().await {
            self.fail(&mut phase);
            return Err(e.into());
        }

        self.enter(&mut phase, DeployPhase::Fetching)?;
        let remote_manifest = match self.store.fetch_content(&self.manifest_path).await {
            Ok(content) => content,
            Err(e) => {
                self.fail(&mut phase);
                return Err(e.into());
            }
        };

        let known = self
            .fingerprints
            .get(&self.manifest_path)
            .await
            .context("reading manifest fingerprint")?;
        if let Some(known) = known {
            let fetched_id = remote_manifest.as_ref().map(|r| &r.version_id);
            if fetched_id != Some(known.remote_version_id()) {
                warn!(
                    path = %self.manifest_path,
                    known = %known.remote_version_id(),
                    fetched = ?fetched_id,
                    "Manifest moved remotely since last publish"
                );
                self.fail(&mut phase);
                return Err(DeployError::StaleRemoteState {
                    path: self.manifest_path.to_string(),
                });
            }
        }

        let mut manifest = match &remote_manifest {
            Some(remote) => AssetManifest::parse(&remote.content)?,
            None => AssetManifest::empty(),
        };

        let asset_paths: Vec<RepoPath> = assets.iter().map(|a| a.path.clone()).collect();
        let remote_ids = match self.store.fetch_version_ids(&asset_paths).await {
            Ok(ids) => ids,
            Err(e) => {
                self.fail(&mut phase);
                return Err(e.into());
            }
        };

        let mut commit_set = Vec::new();
        let mut skipped = Vec::new();
        for asset in &assets {
            let name = asset.path.file_name().to_string();
            let hash = hash_content(&asset.content);
            let entry = AssetEntry {
                path: asset.path.clone(),
                hash: hash.clone(),
                size: asset.content.len() as u64,
            };
            if !manifest.register(&name, entry) {
                info!(path = %asset.path, name = %name, "Asset already registered; skipping");
                self.emit(DeployEvent::Skipped(asset.path.clone()));
                skipped.push(asset.path.clone());
                continue;
            }

            let mut change = FileChange::added(asset.path.clone(), asset.content.clone(), hash);
            let remote_id = remote_ids.get(&asset.path).cloned().flatten();
            if let Some(id) = remote_id.clone() {
                change.rearm_precondition(id);
            }
            commit_set.push(ConflictInfo::new(change, remote_id, false));
        }

        if commit_set.is_empty() {
            info!("Every asset is already registered");
            self.enter(&mut phase, DeployPhase::Done)?;
            let mut report = self.report(attempt_id, DeployOutcome::NoChanges, started);
            report.skipped = skipped;
            return Ok(report);
        }

        // The manifest travels in the same batch, so a manifest-write
        // failure is reported like any other per-file failure.
        let manifest_bytes = manifest.to_bytes();
        let manifest_hash = hash_content(&manifest_bytes);
        let manifest_change = match &remote_manifest {
            Some(remote) => FileChange::modified(
                self.manifest_path.clone(),
                manifest_bytes,
                manifest_hash,
                remote.version_id.clone(),
            ),
            None => FileChange::added(self.manifest_path.clone(), manifest_bytes, manifest_hash),
        };
        commit_set.push(ConflictInfo::new(
            manifest_change,
            remote_manifest.map(|r| r.version_id),
            false,
        ));

        self.enter(&mut phase, DeployPhase::Committing)?;
        let results = commit_batch(
            commit_set,
            self.store.as_ref(),
            self.fingerprints.as_ref(),
            &self.message_prefix,
            self.events.as_ref(),
        )
        .await;

        self.fingerprints
            .save()
            .await
            .context("persisting fingerprints after asset push")?;

        let first_error = results
            .iter()
            .find(|r| !r.success)
            .and_then(|r| r.error.clone());
        let outcome = if first_error.is_none() {
            self.enter(&mut phase, DeployPhase::Done)?;
            DeployOutcome::Completed
        } else {
            self.enter(&mut phase, DeployPhase::Error)?;
            DeployOutcome::PartialFailure
        };

        let mut report = self.report(attempt_id, outcome, started);
        report.results = results;
        report.skipped = skipped;
        report.first_error = first_error;
        Ok(report)
    }

    fn report(&self, attempt_id: AttemptId, outcome: DeployOutcome, started: Instant) -> DeployReport {
        DeployReport {
            attempt_id,
            outcome,
            results: Vec::new(),
            reconciled: Vec::new(),
            pulled: Vec::new(),
            skipped: Vec::new(),
            first_error: None,
            duration_ms: started.elapsed().as_millis() as u64,
        }
    }

    fn enter(&self, phase: &mut DeployPhase, target: DeployPhase) -> Result<(), DeployError> {
        phase
            .transition_to(target)
            .map_err(|e| DeployError::Persistence(anyhow::Error::new(e)))?;
        self.emit(DeployEvent::PhaseChanged(target));
        Ok(())
    }

    /// Best-effort move to the error phase on a total failure.
    fn fail(&self, phase: &mut DeployPhase) {
        if phase.can_transition_to(DeployPhase::Error) {
            *phase = DeployPhase::Error;
            self.emit(DeployEvent::PhaseChanged(DeployPhase::Error));
        }
    }

    fn emit(&self, event: DeployEvent) {
        if let Some(tx) = &self.events {
            let _ = tx.send(event);
        }
    }
}
