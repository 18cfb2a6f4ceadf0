/// Type definitions for the Day One JSON export, plus the loader that finds and
/// parses the journal document inside a staged archive.
///
/// Archive layout:
/// ```text
/// Journal.json          -- default document ("<journal>.json" for named journals)
/// photos/<md5>.<type>   -- photo attachments
/// pdfs/<md5>.<type>     -- PDF attachments
/// ```
///
/// Only the fields the converter interprets are typed. Everything else on an
/// entry lands in `extra` and is passed through to the frontmatter verbatim.
use eyre::{Context, Result, eyre};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Document read when no journal name is given.
pub const DEFAULT_DOCUMENT: &str = "Journal.json";

#[derive(Debug, Clone, Deserialize)]
pub struct ExportDocument {
    /// Name of the journal this document was loaded for.
    #[serde(skip)]
    pub journal: String,
    pub entries: Vec<Entry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Entry {
    pub uuid: String,
    #[serde(rename = "creationDate")]
    pub creation_date: String,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default, rename = "richText")]
    pub rich_text: Option<Value>,
    #[serde(default)]
    pub photos: Option<Vec<AttachmentRecord>>,
    #[serde(default, rename = "pdfAttachments")]
    pub pdf_attachments: Option<Vec<AttachmentRecord>>,
    #[serde(default, deserialize_with = "present")]
    pub location: Option<Option<Location>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A photo or PDF attachment as it appears in the export.
#[derive(Debug, Clone, Deserialize)]
pub struct AttachmentRecord {
    pub identifier: String,
    #[serde(default)]
    pub md5: Option<String>,
    #[serde(default, rename = "type")]
    pub file_type: Option<String>,
}

/// Location fields, kept exactly as exported.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Location {
    pub fields: Map<String, Value>,
}

impl Location {
    pub fn place_name(&self) -> Option<&str> {
        self.fields.get("placeName").and_then(Value::as_str)
    }
}

/// Tell an absent key (`None`) apart from an explicit `null` (`Some(None)`).
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Normalise the journal option: an empty name means "no journal".
pub fn journal_name(journal: Option<&str>) -> Option<&str> {
    journal.filter(|j| !j.is_empty())
}

/// File name of the JSON document for `journal` inside the archive.
pub fn document_file_name(journal: Option<&str>) -> String {
    match journal_name(journal) {
        Some(name) => format!("{}.json", name),
        None => DEFAULT_DOCUMENT.to_string(),
    }
}

/// Read and parse the journal document from a staged archive directory.
pub fn load_document(staged: &Path, journal: Option<&str>) -> Result<ExportDocument> {
    let path = staged.join(document_file_name(journal));

    let bytes = match fs::read(&path) {
        Ok(b) => b,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(eyre!("document not found: {}", path.display()));
        }
        Err(e) => {
            return Err(e).wrap_err_with(|| format!("Failed to read document: {}", path.display()));
        }
    };

    let mut doc: ExportDocument = serde_json::from_slice(&bytes)
        .wrap_err_with(|| format!("malformed document: {}", path.display()))?;
    doc.journal = journal_name(journal)
        .unwrap_or(DEFAULT_DOCUMENT.trim_end_matches(".json"))
        .to_string();

    tracing::info!(
        document = %path.display(),
        entries = doc.entries.len(),
        "loaded export document"
    );
    Ok(doc)
}
