//
// workspace.rs
// Dicom-Anonymizer-rs
//
// Request-scoped scratch directories for uploads, extraction, and output trees.
//
// Thales Matheus Mendonça Santos - January 2026

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::error::Result;

/// Scratch area backing one anonymization request.
///
/// Every intermediate artifact (the staged upload, the extracted input tree,
/// the anonymized output tree, the final archive) lives under one temporary
/// directory that is removed when the workspace drops, whichever way the
/// request ends.
pub struct RequestWorkspace {
    dir: TempDir,
}

impl RequestWorkspace {
    pub fn new() -> Result<Self> {
        Ok(Self {
            dir: TempDir::new()?,
        })
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Persist uploaded bytes under a sanitized version of the declared name.
    pub fn stage_upload(&self, original_name: Option<&str>, bytes: &[u8]) -> Result<PathBuf> {
        let path = self.dir.path().join(safe_file_name(original_name));
        fs::write(&path, bytes)?;
        Ok(path)
    }

    /// Extraction directory for uploaded archives.
    pub fn input_dir(&self) -> Result<PathBuf> {
        let path = self.dir.path().join("input");
        fs::create_dir_all(&path)?;
        Ok(path)
    }

    /// Root of the anonymized output tree.
    pub fn output_dir(&self) -> Result<PathBuf> {
        let path = self.dir.path().join("anon");
        fs::create_dir_all(&path)?;
        Ok(path)
    }

    /// Path where the final archive is assembled.
    pub fn archive_path(&self) -> PathBuf {
        self.dir.path().join("anonymized.zip")
    }
}

/// Reduce an attacker-controlled filename to a safe single path component,
/// keeping the extension so archive detection still works after staging.
pub fn safe_file_name(original: Option<&str>) -> String {
    let stem = original
        .and_then(|n| Path::new(n).file_stem().and_then(|s| s.to_str()))
        .map(sanitize)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "upload".to_string());

    let ext = original
        .and_then(|n| Path::new(n).extension().and_then(|s| s.to_str()))
        .map(sanitize)
        .filter(|s| !s.is_empty());

    match ext {
        Some(ext) => format!("{}.{}", stem, ext),
        None => stem,
    }
}

fn sanitize(input: &str) -> String {
    // Keep only ASCII word characters and a few safe separators to avoid filesystem surprises.
    input
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safe_file_name_strips_dangerous_characters() {
        assert_eq!(
            safe_file_name(Some("../weird name 123.dcm")),
            "weirdname123.dcm"
        );
        assert_eq!(safe_file_name(Some("série.zip")), "srie.zip");
        assert_eq!(safe_file_name(None), "upload");
    }

    #[test]
    fn workspace_is_released_on_drop() {
        let workspace = RequestWorkspace::new().expect("workspace");
        let root = workspace.root().to_path_buf();

        let staged = workspace
            .stage_upload(Some("scan.dcm"), b"not really dicom")
            .expect("stage");
        workspace.input_dir().expect("input dir");
        workspace.output_dir().expect("output dir");
        assert!(staged.exists());

        drop(workspace);
        assert!(!root.exists());
    }
}
