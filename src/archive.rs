use std::fs::File;
use std::io;
use std::path::Path;

use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::Result;

/// Extract the whole archive into `dest_dir` before any processing happens.
/// Entry paths are validated by the extractor, so a crafted archive cannot
/// write outside `dest_dir`.
pub fn extract(zip_path: &Path, dest_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dest_dir)?;
    let file = File::open(zip_path)?;
    let mut archive = ZipArchive::new(file)?;
    archive.extract(dest_dir)?;
    Ok(())
}

/// Package `src_dir` into a deflate ZIP at `zip_path`, entries addressed by
/// their path relative to `src_dir`. Directory entries are written as well so
/// empty directories survive the round trip.
pub fn create(src_dir: &Path, zip_path: &Path) -> Result<()> {
    let file = File::create(zip_path)?;
    let mut writer = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for entry in WalkDir::new(src_dir).min_depth(1) {
        let entry = entry?;
        let rel = match entry.path().strip_prefix(src_dir) {
            Ok(rel) => rel,
            Err(_) => continue,
        };
        // ZIP entry names always use forward slashes.
        let name = rel
            .iter()
            .map(|c| c.to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        if entry.file_type().is_dir() {
            writer.add_directory(name, options)?;
        } else if entry.file_type().is_file() {
            writer.start_file(name, options)?;
            let mut f = File::open(entry.path())?;
            io::copy(&mut f, &mut writer)?;
        }
    }

    writer.finish()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn round_trip_preserves_files_and_empty_dirs() {
        let dir = tempdir().expect("tmpdir");
        let src = dir.path().join("src");
        fs::create_dir_all(src.join("nested")).expect("create nested");
        fs::create_dir_all(src.join("empty")).expect("create empty");
        fs::write(src.join("a.txt"), b"hello").expect("write a");
        fs::write(src.join("nested/b.bin"), [0u8, 1, 2, 255]).expect("write b");

        let zip_path = dir.path().join("out.zip");
        create(&src, &zip_path).expect("create zip");

        let restored = dir.path().join("restored");
        extract(&zip_path, &restored).expect("extract zip");

        assert_eq!(fs::read(restored.join("a.txt")).expect("read a"), b"hello");
        assert_eq!(
            fs::read(restored.join("nested/b.bin")).expect("read b"),
            [0u8, 1, 2, 255]
        );
        assert!(restored.join("empty").is_dir());
    }
}
