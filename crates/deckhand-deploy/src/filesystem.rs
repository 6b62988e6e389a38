//! Directory-backed workspace adapter
//!
//! Scans the workspace root for structured documents (paths matching the
//! `documents` glob) and binary assets (anything under `assets_dir`),
//! honouring `ignore` globs. Pulled content is written back atomically
//! (temp file + rename), the same pattern the fingerprint store uses.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use glob::Pattern;
use tracing::debug;

use deckhand_core::domain::newtypes::RepoPath;
use deckhand_core::ports::workspace_source::{IWorkspaceSource, LocalFile};

/// `IWorkspaceSource` over a local directory tree
pub struct DirWorkspaceSource {
    root: PathBuf,
    documents: Pattern,
    /// `documents` with a leading `**/` stripped, so top-level files match
    /// too (glob's `**` wants at least one component on some inputs)
    documents_flat: Option<Pattern>,
    assets_prefix: String,
    ignore: Vec<Pattern>,
}

impl DirWorkspaceSource {
    pub fn new(
        root: impl Into<PathBuf>,
        documents_glob: &str,
        assets_dir: &str,
        ignore_globs: &[String],
    ) -> Result<Self> {
        let documents = Pattern::new(documents_glob)
            .with_context(|| format!("invalid documents glob: {documents_glob}"))?;
        let documents_flat = documents_glob
            .strip_prefix("**/")
            .map(Pattern::new)
            .transpose()
            .with_context(|| format!("invalid documents glob: {documents_glob}"))?;
        let ignore = ignore_globs
            .iter()
            .map(|g| Pattern::new(g).with_context(|| format!("invalid ignore glob: {g}")))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            root: root.into(),
            documents,
            documents_flat,
            assets_prefix: format!("{}/", assets_dir.trim_end_matches('/')),
            ignore,
        })
    }

    fn is_ignored(&self, rel: &str) -> bool {
        self.ignore.iter().any(|p| p.matches(rel))
    }

    fn is_document(&self, rel: &str) -> bool {
        self.documents.matches(rel)
            || self
                .documents_flat
                .as_ref()
                .is_some_and(|p| p.matches(rel))
    }

    fn is_asset(&self, rel: &str) -> bool {
        rel.starts_with(&self.assets_prefix)
    }

    fn collect_files(&self, dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
        for entry in std::fs::read_dir(dir)
            .with_context(|| format!("reading directory {}", dir.display()))?
        {
            let entry = entry?;
            let path = entry.path();
            if path.is_dir() {
                self.collect_files(&path, out)?;
            } else {
                out.push(path);
            }
        }
        Ok(())
    }

    fn relative(&self, path: &Path) -> Option<String> {
        let rel = path.strip_prefix(&self.root).ok()?;
        let mut parts = Vec::new();
        for component in rel.components() {
            parts.push(component.as_os_str().to_str()?);
        }
        Some(parts.join("/"))
    }
}

#[async_trait::async_trait]
impl IWorkspaceSource for DirWorkspaceSource {
    async fn snapshot(&self) -> Result<Vec<LocalFile>> {
        let mut paths = Vec::new();
        self.collect_files(&self.root, &mut paths)?;
        paths.sort();

        let mut files = Vec::new();
        for abs in paths {
            let Some(rel) = self.relative(&abs) else {
                continue;
            };
            if self.is_ignored(&rel) {
                continue;
            }

            let is_document = self.is_document(&rel);
            if !is_document && !self.is_asset(&rel) {
                debug!(path = rel, "Not a document or asset; excluded from snapshot");
                continue;
            }

            let content = std::fs::read(&abs)
                .with_context(|| format!("reading workspace file {}", abs.display()))?;
            let path = RepoPath::new(rel).context("workspace file path")?;
            files.push(if is_document {
                LocalFile::document(path, content)
            } else {
                LocalFile::asset(path, content)
            });
        }
        Ok(files)
    }

    async fn apply_remote(&self, path: &RepoPath, content: &[u8]) -> Result<()> {
        let target = self.root.join(path.as_str());
        if let Some(dir) = target.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("creating directory {}", dir.display()))?;
        }

        // Suffix the full file name so siblings differing only in extension
        // never share a temp path.
        let mut tmp_name = std::ffi::OsString::from(path.file_name());
        tmp_name.push(".pull.tmp");
        let tmp = target.with_file_name(tmp_name);
        std::fs::write(&tmp, content)
            .with_context(|| format!("writing pulled content for {path}"))?;
        std::fs::rename(&tmp, &target)
            .with_context(|| format!("renaming pulled content for {path}"))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &[u8]) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    fn source(root: &Path) -> DirWorkspaceSource {
        DirWorkspaceSource::new(
            root,
            "**/*.json",
            "assets",
            &[".deckhand/**".to_string()],
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_snapshot_classifies_documents_and_assets() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "top.json", b"{}");
        write(dir.path(), "docs/nested.json", br#"{"n":1}"#);
        write(dir.path(), "assets/logo.png", &[0x89, 0x50, 0x4e, 0x47]);
        write(dir.path(), "notes.txt", b"not in snapshot");

        let files = source(dir.path()).snapshot().await.unwrap();
        let names: Vec<(&str, bool)> = files
            .iter()
            .map(|f| (f.path.as_str(), f.is_document))
            .collect();

        assert_eq!(
            names,
            vec![
                ("assets/logo.png", false),
                ("docs/nested.json", true),
                ("top.json", true),
            ]
        );
    }

    #[tokio::test]
    async fn test_ignore_globs_exclude_files() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.json", b"{}");
        write(dir.path(), ".deckhand/fingerprints.json", b"{}");

        let files = source(dir.path()).snapshot().await.unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path.as_str(), "a.json");
    }

    #[tokio::test]
    async fn test_json_asset_counts_as_asset_unless_glob_matches() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "assets/manifest.json", b"{}");

        let files = source(dir.path()).snapshot().await.unwrap();
        // Matches the documents glob, so it is a document even under assets/.
        assert!(files[0].is_document);
    }

    #[tokio::test]
    async fn test_apply_remote_writes_atomically() {
        let dir = TempDir::new().unwrap();
        let source = source(dir.path());
        let path = RepoPath::new("docs/pulled.json".to_string()).unwrap();

        source.apply_remote(&path, br#"{"pulled":true}"#).await.unwrap();

        let written = std::fs::read(dir.path().join("docs/pulled.json")).unwrap();
        assert_eq!(written, br#"{"pulled":true}"#);
        assert!(!dir.path().join("docs/pulled.json.pull.tmp").exists());
    }

    #[tokio::test]
    async fn test_apply_remote_temp_names_keep_extensions_apart() {
        let dir = TempDir::new().unwrap();
        let source = source(dir.path());
        let json = RepoPath::new("docs/report.json".to_string()).unwrap();
        let yaml = RepoPath::new("docs/report.yaml".to_string()).unwrap();

        source.apply_remote(&json, br#"{"format":"json"}"#).await.unwrap();
        source.apply_remote(&yaml, b"format: yaml\n").await.unwrap();

        assert_eq!(
            std::fs::read(dir.path().join("docs/report.json")).unwrap(),
            br#"{"format":"json"}"#
        );
        assert_eq!(
            std::fs::read(dir.path().join("docs/report.yaml")).unwrap(),
            b"format: yaml\n"
        );
        // The shared stem must not leave a collided temp file behind.
        assert!(!dir.path().join("docs/report.pull.tmp").exists());
    }

    #[tokio::test]
    async fn test_invalid_glob_rejected() {
        let dir = TempDir::new().unwrap();
        let result = DirWorkspaceSource::new(dir.path(), "[", "assets", &[]);
        assert!(result.is_err());
    }
}
