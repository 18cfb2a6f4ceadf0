use eyre::{Context, Result};
use std::fs::File;
use std::path::Path;
use tempfile::TempDir;

/// An export archive unpacked into a scratch directory.
///
/// The directory is removed when this value is dropped, whether the
/// conversion finished or bailed out with an error.
pub struct StagedArchive {
    dir: TempDir,
}

impl StagedArchive {
    pub fn extract(archive_path: &Path) -> Result<Self> {
        let file = File::open(archive_path)
            .wrap_err_with(|| format!("Failed to open archive: {}", archive_path.display()))?;
        let mut zip = zip::ZipArchive::new(file)
            .wrap_err_with(|| format!("Not a readable zip archive: {}", archive_path.display()))?;

        let dir = tempfile::Builder::new()
            .prefix("dayone-export-")
            .tempdir()
            .wrap_err("Failed to create staging directory")?;
        zip.extract(dir.path())
            .wrap_err_with(|| format!("Failed to extract archive: {}", archive_path.display()))?;

        tracing::info!(
            archive = %archive_path.display(),
            files = zip.len(),
            staged = %dir.path().display(),
            "staged archive"
        );
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn write_zip(path: &Path, files: &[(&str, &[u8])]) {
        let mut zip = zip::ZipWriter::new(File::create(path).unwrap());
        let opts = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
        for (name, data) in files {
            zip.start_file(*name, opts).unwrap();
            zip.write_all(data).unwrap();
        }
        zip.finish().unwrap();
    }

    #[test]
    fn extracts_nested_files_and_cleans_up() {
        let work = TempDir::new().unwrap();
        let archive = work.path().join("export.zip");
        write_zip(
            &archive,
            &[("Journal.json", b"{}"), ("photos/deadbeef.jpg", b"\xff\xd8")],
        );

        let staged = StagedArchive::extract(&archive).unwrap();
        let root = staged.path().to_path_buf();
        assert_eq!(std::fs::read(root.join("Journal.json")).unwrap(), b"{}");
        assert!(root.join("photos/deadbeef.jpg").is_file());

        drop(staged);
        assert!(!root.exists());
    }

    #[test]
    fn missing_archive_is_an_error() {
        let work = TempDir::new().unwrap();
        let err = StagedArchive::extract(&work.path().join("nope.zip")).err().unwrap();
        assert!(format!("{:#}", err).contains("Failed to open archive"));
    }

    #[test]
    fn non_zip_is_an_error() {
        let work = TempDir::new().unwrap();
        let path = work.path().join("export.zip");
        std::fs::write(&path, "definitely not a zip").unwrap();
        let err = StagedArchive::extract(&path).err().unwrap();
        assert!(format!("{:#}", err).contains("Not a readable zip archive"));
    }
}
