//
// models.rs
// Dicom-Anonymizer-rs
//
// Defines serializable result structures shared by the CLI and the web API.
//
// Thales Matheus Mendonça Santos - January 2026

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Classification assigned to one file during a tree run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryKind {
    /// Parsed as a DICOM object; routed through the anonymizer.
    Dicom,
    /// Anything else; copied through unchanged.
    Other,
}

/// What happened to a single file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileOutcome {
    pub relative_path: PathBuf,
    pub kind: EntryKind,
    /// `None` on success, otherwise the failure rendered for reporting.
    pub error: Option<String>,
}

impl FileOutcome {
    pub fn ok(relative_path: impl Into<PathBuf>, kind: EntryKind) -> Self {
        Self {
            relative_path: relative_path.into(),
            kind,
            error: None,
        }
    }

    pub fn failed(
        relative_path: impl Into<PathBuf>,
        kind: EntryKind,
        error: impl std::fmt::Display,
    ) -> Self {
        Self {
            relative_path: relative_path.into(),
            kind,
            error: Some(error.to_string()),
        }
    }
}

/// Structured result of one tree run.
///
/// The walker only collects; whoever drives it (CLI, web handler, test)
/// decides how the outcomes are surfaced.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TreeReport {
    pub outcomes: Vec<FileOutcome>,
}

impl TreeReport {
    pub fn push(&mut self, outcome: FileOutcome) {
        self.outcomes.push(outcome);
    }

    /// DICOM files successfully anonymized.
    pub fn anonymized(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.kind == EntryKind::Dicom && o.error.is_none())
            .count()
    }

    /// Non-DICOM files copied through unchanged.
    pub fn copied(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.kind == EntryKind::Other && o.error.is_none())
            .count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &FileOutcome> {
        self.outcomes.iter().filter(|o| o.error.is_some())
    }
}
