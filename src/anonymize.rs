use dicom::core::{DataElement, PrimitiveValue, Tag, VR};
use dicom::object::{open_file, DefaultDicomObject};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::error::{AnonymizerError, Result};

/// What a policy rule writes into its target field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Replacement {
    /// Clear the field to an empty value.
    Clear,
    /// Assign the caller-supplied identifier.
    Identifier,
}

/// One field targeted by the anonymization policy.
#[derive(Debug, Clone)]
pub struct FieldRule {
    pub tag: Tag,
    pub vr: VR,
    pub replacement: Replacement,
}

/// The set of fields rewritten during anonymization.
///
/// The default policy clears patient name, birth date, series date and study
/// ID, and assigns the caller-supplied identifier to patient ID. Every other
/// tag, pixel data and UIDs included, is left untouched.
#[derive(Debug, Clone)]
pub struct AnonymizationPolicy {
    rules: Vec<FieldRule>,
}

impl Default for AnonymizationPolicy {
    fn default() -> Self {
        Self {
            rules: vec![
                FieldRule {
                    tag: Tag(0x0010, 0x0010), // PatientName
                    vr: VR::PN,
                    replacement: Replacement::Clear,
                },
                FieldRule {
                    tag: Tag(0x0010, 0x0020), // PatientID
                    vr: VR::LO,
                    replacement: Replacement::Identifier,
                },
                FieldRule {
                    tag: Tag(0x0010, 0x0030), // PatientBirthDate
                    vr: VR::DA,
                    replacement: Replacement::Clear,
                },
                FieldRule {
                    tag: Tag(0x0008, 0x0021), // SeriesDate
                    vr: VR::DA,
                    replacement: Replacement::Clear,
                },
                FieldRule {
                    tag: Tag(0x0020, 0x0010), // StudyID
                    vr: VR::SH,
                    replacement: Replacement::Clear,
                },
            ],
        }
    }
}

impl AnonymizationPolicy {
    pub fn new(rules: Vec<FieldRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[FieldRule] {
        &self.rules
    }

    /// Rewrite every targeted field on the parsed object. Fields absent from
    /// the dataset are inserted, matching assignment semantics.
    pub fn apply(&self, obj: &mut DefaultDicomObject, identifier: &str) {
        for rule in &self.rules {
            let value = match rule.replacement {
                Replacement::Clear => "",
                Replacement::Identifier => identifier,
            };
            obj.put(DataElement::new(rule.tag, rule.vr, PrimitiveValue::from(value)));
        }
    }
}

/// Anonymize the DICOM file at `input` into `output`.
///
/// `input` must already be classified as DICOM; this is not re-checked here.
/// `input == output` is safe: the object is fully materialized in memory
/// before any byte of the destination is touched.
pub fn anonymize_file(
    input: &Path,
    output: &Path,
    identifier: &str,
    policy: &AnonymizationPolicy,
) -> Result<()> {
    // 1. Full parse, pixel data included; full fidelity is required for
    //    re-serialization under the original transfer syntax.
    let mut obj = open_file(input)?;

    // 2. Rewrite the targeted fields.
    policy.apply(&mut obj, identifier);

    // 3. Serialize next to the destination and rename into place, so a failed
    //    write never leaves a half-written file at `output`.
    let parent = output
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let staging = NamedTempFile::new_in(parent)?;
    obj.write_to_file(staging.path())?;
    staging
        .persist(output)
        .map_err(|e| AnonymizerError::Io(e.error))?;

    Ok(())
}

/// Anonymize `input`, defaulting the output to `<stem>_anon.dcm` next to it.
/// Returns the path actually written.
pub fn process_file(
    input: &Path,
    output: Option<PathBuf>,
    identifier: &str,
    policy: &AnonymizationPolicy,
) -> Result<PathBuf> {
    let output_path = output.unwrap_or_else(|| {
        let mut p = input.to_path_buf();
        let stem = p
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("output");
        p.set_file_name(format!("{}_anon.dcm", stem));
        p
    });

    anonymize_file(input, &output_path, identifier, policy)?;
    Ok(output_path)
}
