use crate::attachments::{self, AttachmentKind, AttachmentTable};
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::importer::Entry;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use eyre::{Context, Result, eyre};
use serde_json::{Map, Value};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Name of the Markdown file written into every entry folder.
pub const INDEX_FILE: &str = "index.md";

/// Timestamp layouts with a numeric offset (`+0200`, `+02:00`).
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y%m%dT%H%M%S%.f%z",
];

/// Timestamp layouts without an offset, or with a `Z` already stripped.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y%m%dT%H%M%S%.f",
];

/// Calendar date of an ISO-8601 timestamp, in the offset it was written with.
fn creation_day(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    if let Some(dt) = OFFSET_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(raw, fmt).ok())
    {
        return Some(dt.date_naive());
    }

    let naive = raw.strip_suffix(['Z', 'z']).unwrap_or(raw);
    if let Some(dt) = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(naive, fmt).ok())
    {
        return Some(dt.date());
    }
    NaiveDate::parse_from_str(naive, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(naive, "%Y%m%d"))
        .ok()
}

/// `YYYY-MM-DD-<lowercased uuid>`
pub fn entry_dir_name(entry: &Entry) -> Result<String> {
    let day = creation_day(&entry.creation_date).ok_or_else(|| {
        eyre!(
            "Invalid creationDate {:?} on entry {}",
            entry.creation_date,
            entry.uuid
        )
    })?;
    Ok(format!(
        "{}-{}",
        day.format("%Y-%m-%d"),
        entry.uuid.to_lowercase()
    ))
}

/// Map an entry onto its frontmatter fields.
///
/// Pass-through fields are copied as-is. The body, rich text and raw
/// attachment lists are never written; `creationDate` becomes `date`, and a
/// location with a string `placeName` gets it mirrored into `title`.
pub fn build_frontmatter(entry: &Entry) -> Map<String, Value> {
    let mut fm = entry.extra.clone();
    fm.insert("uuid".into(), Value::String(entry.uuid.clone()));
    fm.insert("date".into(), Value::String(entry.creation_date.clone()));

    match &entry.location {
        None => {}
        Some(None) => {
            fm.insert("location".into(), Value::Null);
        }
        Some(Some(location)) => {
            let mut fields = location.fields.clone();
            if let Some(place) = location.place_name() {
                fields.insert("title".into(), Value::String(place.to_string()));
            }
            fm.insert("location".into(), Value::Object(fields));
        }
    }

    fm
}

pub fn write_entry_markdown<W: Write>(
    writer: &mut W,
    frontmatter: &Map<String, Value>,
    body: &str,
) -> std::io::Result<()> {
    writeln!(writer, "---")?;
    let yaml = serde_yaml::to_string(frontmatter).map_err(std::io::Error::other)?;
    write!(writer, "{}", yaml)?;
    writeln!(writer, "---")?;
    writeln!(writer)?;
    write!(writer, "{}", body)?;
    writeln!(writer)?;
    Ok(())
}

fn copy_attachments(
    entry: &Entry,
    table: &AttachmentTable,
    staged: &Path,
    entry_dir: &Path,
    diagnostics: &mut Diagnostics,
) {
    for attachment in table.iter() {
        let source = attachment.source_path(staged);
        let destination = entry_dir.join(&attachment.basename);
        match fs::copy(&source, &destination) {
            Ok(_) => tracing::debug!(file = %destination.display(), "copied attachment"),
            Err(e) => diagnostics.push(
                &entry.uuid,
                DiagnosticKind::CopyFailed {
                    source,
                    destination,
                    reason: e.to_string(),
                },
            ),
        }
    }
}

/// Write one entry to `dest_root/<entry_dir_name>/` and return that folder.
///
/// Fails if the folder already exists; attachment problems are only recorded.
pub fn materialize_entry(
    entry: &Entry,
    staged: &Path,
    dest_root: &Path,
    diagnostics: &mut Diagnostics,
) -> Result<PathBuf> {
    let entry_dir = dest_root.join(entry_dir_name(entry)?);
    fs::create_dir_all(dest_root)
        .wrap_err_with(|| format!("Failed to create destination: {}", dest_root.display()))?;
    fs::create_dir(&entry_dir)
        .wrap_err_with(|| format!("Failed to create entry folder: {}", entry_dir.display()))?;

    let text = match &entry.text {
        Some(t) => t.as_str(),
        None => {
            diagnostics.push(&entry.uuid, DiagnosticKind::MissingText);
            ""
        }
    };

    let (photos, text) = attachments::resolve(
        &entry.uuid,
        AttachmentKind::Photo,
        entry.photos.as_deref(),
        text,
        diagnostics,
    );
    let (pdfs, body) = attachments::resolve(
        &entry.uuid,
        AttachmentKind::Pdf,
        entry.pdf_attachments.as_deref(),
        &text,
        diagnostics,
    );

    copy_attachments(entry, &photos, staged, &entry_dir, diagnostics);
    copy_attachments(entry, &pdfs, staged, &entry_dir, diagnostics);

    let frontmatter = build_frontmatter(entry);
    let md_path = entry_dir.join(INDEX_FILE);
    let md_file = File::create(&md_path)
        .wrap_err_with(|| format!("Failed to create: {}", md_path.display()))?;
    let mut writer = BufWriter::new(md_file);
    write_entry_markdown(&mut writer, &frontmatter, &body)
        .wrap_err_with(|| format!("Failed to write: {}", md_path.display()))?;
    writer.flush().wrap_err("Failed to flush markdown file")?;

    Ok(entry_dir)
}
