use std::fs;
use std::path::Path;

use walkdir::WalkDir;

use crate::anonymize::{self, AnonymizationPolicy};
use crate::detect;
use crate::error::Result;
use crate::models::{EntryKind, FileOutcome, TreeReport};

/// Mirror `input_root` under `output_root`, anonymizing every DICOM file and
/// copying everything else through unchanged.
///
/// Directories are visited top-down and created under the output root before
/// the files inside them, so destinations always exist when files are
/// written. `identifier` is assigned to PatientID on every anonymized file.
///
/// Per-file failures are recorded in the report and never abort the walk;
/// failures that make mirroring impossible (output directory creation) do.
pub fn process_tree(
    input_root: &Path,
    output_root: &Path,
    identifier: &str,
    policy: &AnonymizationPolicy,
) -> Result<TreeReport> {
    fs::create_dir_all(output_root)?;

    let mut report = TreeReport::default();

    for entry in WalkDir::new(input_root) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                let rel = err
                    .path()
                    .and_then(|p| p.strip_prefix(input_root).ok())
                    .map(Path::to_path_buf)
                    .unwrap_or_default();
                tracing::warn!(path = %rel.display(), error = %err, "skipping unreadable entry");
                report.push(FileOutcome::failed(rel, EntryKind::Other, &err));
                continue;
            }
        };

        let rel = match entry.path().strip_prefix(input_root) {
            Ok(rel) => rel,
            Err(_) => continue, // every walked path sits under the input root
        };
        let dest = output_root.join(rel);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&dest)?;
            continue;
        }
        if !entry.file_type().is_file() {
            // Symlinks and other non-regular files are not carried over.
            continue;
        }

        report.push(process_entry(entry.path(), &dest, rel, identifier, policy));
    }

    Ok(report)
}

fn process_entry(
    src: &Path,
    dest: &Path,
    rel: &Path,
    identifier: &str,
    policy: &AnonymizationPolicy,
) -> FileOutcome {
    if detect::is_dicom(src) {
        // Copy first, then anonymize the copy in place, so the mirrored
        // layout is the same whether or not anonymization succeeds.
        if let Err(err) = fs::copy(src, dest) {
            tracing::warn!(path = %rel.display(), error = %err, "failed to copy DICOM file");
            return FileOutcome::failed(rel, EntryKind::Dicom, err);
        }
        match anonymize::anonymize_file(dest, dest, identifier, policy) {
            Ok(()) => FileOutcome::ok(rel, EntryKind::Dicom),
            Err(err) => {
                tracing::warn!(path = %rel.display(), error = %err, "failed to anonymize file");
                FileOutcome::failed(rel, EntryKind::Dicom, err)
            }
        }
    } else {
        match fs::copy(src, dest) {
            Ok(_) => FileOutcome::ok(rel, EntryKind::Other),
            Err(err) => {
                tracing::warn!(path = %rel.display(), error = %err, "failed to copy file");
                FileOutcome::failed(rel, EntryKind::Other, err)
            }
        }
    }
}
