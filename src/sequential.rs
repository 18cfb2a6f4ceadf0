use crate::archive::StagedArchive;
use crate::diagnostics::Diagnostics;
use crate::exporter::materialize_entry;
use crate::importer::load_document;
use crate::utils::ExportConfig;
use eyre::{Context, Result};
use std::path::PathBuf;

/// What a finished conversion produced.
#[derive(Debug)]
pub struct ConvertReport {
    /// Entry folders written, in document order.
    pub written: Vec<PathBuf>,
    pub diagnostics: Diagnostics,
}

/// The main entry point for the export logic.
/// Stages the archive, loads the document and writes every entry in order.
pub fn execute(config: &ExportConfig) -> Result<ConvertReport> {
    let staged = StagedArchive::extract(&config.archive_path)?;
    let doc = load_document(staged.path(), config.journal.as_deref())?;
    let dest_root = config.destination_root();

    let mut diagnostics = Diagnostics::new();
    let mut written = Vec::with_capacity(doc.entries.len());

    for entry in &doc.entries {
        let dir = materialize_entry(entry, staged.path(), &dest_root, &mut diagnostics)
            .wrap_err_with(|| format!("Failed to convert entry {}", entry.uuid))?;
        tracing::info!(entry = %entry.uuid, folder = %dir.display(), "wrote entry");
        written.push(dir);
    }

    tracing::debug!(journal = %doc.journal, "conversion finished");
    Ok(ConvertReport {
        written,
        diagnostics,
    })
}
