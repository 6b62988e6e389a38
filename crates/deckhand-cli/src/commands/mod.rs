//! CLI command implementations
//!
//! Each command owns its clap `Args` struct and an `execute` method; shared
//! adapter wiring (config resolution, store/workspace/engine construction)
//! lives here so every command builds the stack the same way.

pub mod config;
pub mod deploy;
pub mod push_assets;
pub mod status;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};

use deckhand_cache::JsonFingerprintStore;
use deckhand_core::config::Config;
use deckhand_core::domain::newtypes::RepoPath;
use deckhand_core::ports::conflict_arbiter::IConflictArbiter;
use deckhand_core::ports::credential_source::ICredentialSource;
use deckhand_deploy::{DeployEngine, DirWorkspaceSource};
use deckhand_remote::auth::EnvCredentialSource;
use deckhand_remote::{ContentsClient, RemoteContentStore};

/// Resolves the config file path: `--config` wins, else `deckhand.yaml` in
/// the current directory.
pub(crate) fn config_path(path_override: Option<&str>) -> PathBuf {
    path_override
        .map(PathBuf::from)
        .unwrap_or_else(Config::default_path)
}

/// Loads the config and fails on validation errors, listing every problem.
pub(crate) fn load_valid_config(path_override: Option<&str>) -> Result<Config> {
    let path = config_path(path_override);
    let config = Config::load_or_default(&path);
    let errors = config.validate();
    if !errors.is_empty() {
        let lines: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        bail!(
            "invalid configuration ({}): {}",
            path.display(),
            lines.join("; ")
        );
    }
    Ok(config)
}

/// The wired adapter stack behind a command.
pub(crate) struct Wiring {
    pub engine: DeployEngine,
    pub workspace: Arc<DirWorkspaceSource>,
}

/// Builds the full engine stack from a validated config.
///
/// The bearer token is resolved eagerly so a missing credential fails
/// before any phase starts.
pub(crate) async fn build_wiring(
    config: &Config,
    arbiter: Arc<dyn IConflictArbiter>,
) -> Result<Wiring> {
    let credentials = Arc::new(EnvCredentialSource::new(config.remote.token_env.clone()));
    let token = credentials.bearer_token().await.with_context(|| {
        format!(
            "not authenticated: set the {} environment variable",
            config.remote.token_env
        )
    })?;

    let client = ContentsClient::new(config.remote.base_url.clone(), token);
    let store = Arc::new(RemoteContentStore::new(client));

    let fingerprint_path = config.workspace.root.join(&config.fingerprints.path);
    let fingerprints = Arc::new(
        JsonFingerprintStore::load(fingerprint_path).context("loading fingerprint cache")?,
    );

    let workspace = Arc::new(
        DirWorkspaceSource::new(
            &config.workspace.root,
            &config.workspace.documents,
            &config.workspace.assets_dir,
            &config.workspace.ignore,
        )
        .context("setting up workspace source")?,
    );

    let manifest_path =
        RepoPath::new(config.manifest.path.clone()).context("manifest.path in configuration")?;

    let engine = DeployEngine::new(
        store,
        workspace.clone(),
        fingerprints,
        credentials,
        arbiter,
        config.commit.message_prefix.clone(),
        manifest_path,
    );

    Ok(Wiring { engine, workspace })
}
