use std::path::Path;

use dicom::core::Tag;
use dicom::object::OpenFileOptions;

const PIXEL_DATA: Tag = Tag(0x7FE0, 0x0010);

/// Check whether the file at `path` parses as a valid DICOM object.
///
/// Only the file meta group and the dataset up to (not including) Pixel Data
/// are read; pixel data is irrelevant to the classification and may be large.
/// Any failure, from a missing magic code to a truncated header or an
/// unreadable path, is a negative classification, never an error.
pub fn is_dicom(path: &Path) -> bool {
    OpenFileOptions::new()
        .read_until(PIXEL_DATA)
        .open_file(path)
        .is_ok()
}
