use crate::importer::journal_name;
use std::path::{Path, PathBuf};

/// Configuration required to run one conversion.
/// This decouples the logic from how the arguments were parsed (CLI/Config file).
#[derive(Clone, Debug)]
pub struct ExportConfig {
    pub archive_path: PathBuf,
    pub destination: PathBuf,
    pub journal: Option<String>,
}

impl ExportConfig {
    /// Folder the entry directories are created in.
    pub fn destination_root(&self) -> PathBuf {
        destination_root(&self.destination, self.journal.as_deref())
    }
}

/// Named journals nest under their own folder; the default journal does not.
pub fn destination_root(destination: &Path, journal: Option<&str>) -> PathBuf {
    match journal_name(journal) {
        Some(name) => destination.join(name),
        None => destination.to_path_buf(),
    }
}
