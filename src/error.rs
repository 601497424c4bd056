use std::path::PathBuf;

use thiserror::Error;

/// Result type for anonymizer operations
pub type Result<T> = std::result::Result<T, AnonymizerError>;

/// Failure taxonomy for anonymizer operations.
///
/// A file that simply fails DICOM classification is not an error; the
/// detector answers `false` and the file is passed through untouched.
#[derive(Error, Debug)]
pub enum AnonymizerError {
    /// Parse, mutation, or serialization error on a presumed-DICOM file
    #[error("DICOM error: {0}")]
    Dicom(String),

    /// A single uploaded file failed DICOM classification
    #[error("not a valid DICOM file: {}", .0.display())]
    NotDicom(PathBuf),

    /// ZIP container error
    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// Directory walk error
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

// Convert dicom-object errors
impl From<dicom_object::ReadError> for AnonymizerError {
    fn from(e: dicom_object::ReadError) -> Self {
        AnonymizerError::Dicom(format!("{}", e))
    }
}

impl From<dicom_object::WriteError> for AnonymizerError {
    fn from(e: dicom_object::WriteError) -> Self {
        AnonymizerError::Dicom(format!("{}", e))
    }
}
