//! Configuration module for deckhand.
//!
//! Provides typed configuration structs that map to the YAML configuration
//! file (`deckhand.yaml` in the project root, overridable with `--config`),
//! with loading, validation, and defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Config struct with sub-sections
// ---------------------------------------------------------------------------

/// Top-level configuration for deckhand.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub remote: RemoteConfig,
    pub workspace: WorkspaceConfig,
    pub manifest: ManifestConfig,
    pub fingerprints: FingerprintsConfig,
    pub commit: CommitConfig,
    pub logging: LoggingConfig,
}

/// Remote content store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Base URL of the contents API.
    pub base_url: String,
    /// Environment variable the bundled credential source reads the bearer
    /// token from.
    pub token_env: String,
}

/// Local working-state settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceConfig {
    /// Root directory of the local project.
    pub root: PathBuf,
    /// Glob (relative to root) selecting structured documents.
    pub documents: String,
    /// Directory (relative to root) holding binary assets.
    pub assets_dir: String,
    /// Globs (relative to root) to exclude from the snapshot.
    pub ignore: Vec<String>,
}

/// Shared asset manifest settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ManifestConfig {
    /// Repository path of the shared asset manifest document.
    pub path: String,
}

/// Fingerprint cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FingerprintsConfig {
    /// Path of the fingerprint cache file, relative to the workspace root.
    pub path: PathBuf,
}

/// Remote commit message settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CommitConfig {
    /// Prefix applied to every write's commit message.
    pub message_prefix: String,
}

/// Logging / tracing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: `trace`, `debug`, `info`, `warn`, or `error`.
    pub level: String,
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            token_env: "DECKHAND_TOKEN".to_string(),
        }
    }
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            documents: "**/*.json".to_string(),
            assets_dir: "assets".to_string(),
            ignore: vec![".deckhand/**".to_string()],
        }
    }
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            path: "assets/manifest.json".to_string(),
        }
    }
}

impl Default for FingerprintsConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(".deckhand/fingerprints.json"),
        }
    }
}

impl Default for CommitConfig {
    fn default() -> Self {
        Self {
            message_prefix: "deckhand".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

impl Config {
    /// Load configuration from a YAML file at `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Try to load from `path`; fall back to [`Config::default`] on any error.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Default path for the configuration file: `deckhand.yaml` in the
    /// current directory.
    pub fn default_path() -> PathBuf {
        PathBuf::from("deckhand.yaml")
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// A single validation error found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path to the offending field, e.g. `"remote.base_url"`.
    pub field: String,
    /// Human-readable explanation.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Valid values for `logging.level`.
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

impl Config {
    /// Validate the configuration and return all errors found.
    ///
    /// An empty vector means the configuration is valid.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        // --- remote ---
        if self.remote.base_url.is_empty() {
            errors.push(ValidationError {
                field: "remote.base_url".into(),
                message: "must be set".into(),
            });
        } else if !self.remote.base_url.starts_with("http://")
            && !self.remote.base_url.starts_with("https://")
        {
            errors.push(ValidationError {
                field: "remote.base_url".into(),
                message: format!("must be an http(s) URL: {}", self.remote.base_url),
            });
        }
        if self.remote.token_env.is_empty() {
            errors.push(ValidationError {
                field: "remote.token_env".into(),
                message: "must name an environment variable".into(),
            });
        }

        // --- workspace ---
        if self.workspace.documents.is_empty() {
            errors.push(ValidationError {
                field: "workspace.documents".into(),
                message: "must be a non-empty glob".into(),
            });
        }
        if self.workspace.assets_dir.is_empty() {
            errors.push(ValidationError {
                field: "workspace.assets_dir".into(),
                message: "must be set".into(),
            });
        }

        // --- manifest ---
        if self.manifest.path.is_empty() {
            errors.push(ValidationError {
                field: "manifest.path".into(),
                message: "must be set".into(),
            });
        }

        // --- commit ---
        if self.commit.message_prefix.is_empty() {
            errors.push(ValidationError {
                field: "commit.message_prefix".into(),
                message: "must be set".into(),
            });
        }

        // --- logging ---
        if !VALID_LOG_LEVELS.contains(&self.logging.level.as_str()) {
            errors.push(ValidationError {
                field: "logging.level".into(),
                message: format!(
                    "must be one of {}: got '{}'",
                    VALID_LOG_LEVELS.join(", "),
                    self.logging.level
                ),
            });
        }

        errors
    }
}
