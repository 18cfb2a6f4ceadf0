use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::importer::AttachmentRecord;
use regex::Regex;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Checksum used when an attachment record has no `md5`.
pub const STUB_CHECKSUM: &str = "stubbed_basename";

static PHOTO_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"dayone-moment://([0-9a-zA-Z]+)").expect("valid regex"));
static PDF_PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"dayone-moment:/pdfAttachment/([0-9a-zA-Z]+)").expect("valid regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttachmentKind {
    Photo,
    Pdf,
}

impl AttachmentKind {
    pub fn label(self) -> &'static str {
        match self {
            AttachmentKind::Photo => "photo",
            AttachmentKind::Pdf => "pdf",
        }
    }

    /// Folder inside the archive holding this kind of file.
    pub fn source_dir(self) -> &'static str {
        match self {
            AttachmentKind::Photo => "photos",
            AttachmentKind::Pdf => "pdfs",
        }
    }

    pub fn default_extension(self) -> &'static str {
        match self {
            AttachmentKind::Photo => "jpeg",
            AttachmentKind::Pdf => "pdf",
        }
    }

    /// Text written in place of a placeholder whose identifier has no record.
    pub fn missing_sentinel(self) -> &'static str {
        match self {
            AttachmentKind::Photo => "missing_photo",
            AttachmentKind::Pdf => "missing_pdf",
        }
    }

    fn placeholder(self) -> &'static Regex {
        match self {
            AttachmentKind::Photo => &PHOTO_PLACEHOLDER,
            AttachmentKind::Pdf => &PDF_PLACEHOLDER,
        }
    }
}

/// An attachment record with its output filename worked out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAttachment {
    pub kind: AttachmentKind,
    pub identifier: String,
    pub basename: String,
}

impl ResolvedAttachment {
    pub fn from_record(kind: AttachmentKind, record: &AttachmentRecord) -> Self {
        let checksum = record.md5.as_deref().unwrap_or(STUB_CHECKSUM);
        let ext = record
            .file_type
            .as_deref()
            .unwrap_or_else(|| kind.default_extension());
        Self {
            kind,
            identifier: record.identifier.clone(),
            basename: format!("{}.{}", checksum, ext),
        }
    }

    /// Where the file lives inside the staged archive.
    pub fn source_path(&self, staged: &Path) -> PathBuf {
        staged.join(self.kind.source_dir()).join(&self.basename)
    }
}

/// Identifier → attachment, for one entry and one kind.
///
/// Iterates in the order the records appear in the export. A repeated
/// identifier keeps its first position and takes the later record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttachmentTable {
    items: Vec<ResolvedAttachment>,
    index: BTreeMap<String, usize>,
}

impl AttachmentTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, attachment: ResolvedAttachment) {
        let existing = self.index.get(&attachment.identifier).copied();
        match existing {
            Some(pos) => self.items[pos] = attachment,
            None => {
                self.index
                    .insert(attachment.identifier.clone(), self.items.len());
                self.items.push(attachment);
            }
        }
    }

    pub fn get(&self, identifier: &str) -> Option<&ResolvedAttachment> {
        self.index.get(identifier).map(|&pos| &self.items[pos])
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResolvedAttachment> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    pub text: String,
    /// Identifiers referenced in the text with no entry in the table.
    pub unmatched: Vec<String>,
}

/// Build the identifier table for one kind of attachment on an entry.
///
/// Records without a checksum are kept under [`STUB_CHECKSUM`] and reported.
pub fn build_table(
    entry_id: &str,
    kind: AttachmentKind,
    records: Option<&[AttachmentRecord]>,
    diagnostics: &mut Diagnostics,
) -> AttachmentTable {
    let mut table = AttachmentTable::new();
    for record in records.unwrap_or_default() {
        if record.md5.is_none() {
            diagnostics.push(entry_id, DiagnosticKind::MissingChecksum { kind });
        }
        table.insert(ResolvedAttachment::from_record(kind, record));
    }
    table
}

/// Replace every placeholder of `kind` in `text` with the matching basename.
pub fn substitute(kind: AttachmentKind, table: &AttachmentTable, text: &str) -> Substitution {
    let mut out = String::with_capacity(text.len());
    let mut unmatched = Vec::new();
    let mut last = 0;

    for caps in kind.placeholder().captures_iter(text) {
        let (Some(whole), Some(id)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        out.push_str(&text[last..whole.start()]);
        match table.get(id.as_str()) {
            Some(attachment) => out.push_str(&attachment.basename),
            None => {
                out.push_str(kind.missing_sentinel());
                unmatched.push(id.as_str().to_string());
            }
        }
        last = whole.end();
    }
    out.push_str(&text[last..]);

    Substitution {
        text: out,
        unmatched,
    }
}

/// Build the table for `kind`, rewrite `text` against it and report misses.
pub fn resolve(
    entry_id: &str,
    kind: AttachmentKind,
    records: Option<&[AttachmentRecord]>,
    text: &str,
    diagnostics: &mut Diagnostics,
) -> (AttachmentTable, String) {
    let table = build_table(entry_id, kind, records, diagnostics);
    let Substitution { text, unmatched } = substitute(kind, &table, text);
    for identifier in unmatched {
        diagnostics.push(
            entry_id,
            DiagnosticKind::UnmatchedReference { kind, identifier },
        );
    }
    (table, text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, md5: Option<&str>, ty: Option<&str>) -> AttachmentRecord {
        AttachmentRecord {
            identifier: id.into(),
            md5: md5.map(Into::into),
            file_type: ty.map(Into::into),
        }
    }

    #[test]
    fn default_extensions_per_kind() {
        let photo = ResolvedAttachment::from_record(
            AttachmentKind::Photo,
            &record("a", Some("abc"), None),
        );
        let pdf =
            ResolvedAttachment::from_record(AttachmentKind::Pdf, &record("b", Some("cafef00d"), None));
        assert_eq!(photo.basename, "abc.jpeg");
        assert_eq!(pdf.basename, "cafef00d.pdf");
        assert_eq!(
            pdf.source_path(Path::new("/stage")),
            PathBuf::from("/stage/pdfs/cafef00d.pdf")
        );
    }

    #[test]
    fn missing_checksum_uses_stub_and_reports() {
        let mut diags = Diagnostics::new();
        let records = [record("p1", None, Some("png"))];
        let table = build_table("E1", AttachmentKind::Photo, Some(&records[..]), &mut diags);
        assert_eq!(table.get("p1").unwrap().basename, "stubbed_basename.png");
        let diag = diags.iter().next().unwrap();
        assert_eq!(diag.entry_id, "E1");
        assert_eq!(
            diag.kind,
            DiagnosticKind::MissingChecksum {
                kind: AttachmentKind::Photo
            }
        );
    }

    #[test]
    fn replaces_every_photo_occurrence() {
        let mut diags = Diagnostics::new();
        let records = [record("photo1", Some("deadbeef"), Some("jpg"))];
        let (table, text) = resolve(
            "ABC123",
            AttachmentKind::Photo,
            Some(&records[..]),
            "![](dayone-moment://photo1) and again dayone-moment://photo1",
            &mut diags,
        );
        assert_eq!(table.len(), 1);
        assert_eq!(text, "![](deadbeef.jpg) and again deadbeef.jpg");
        assert!(diags.is_empty());
    }

    #[test]
    fn photo_pattern_leaves_pdf_tokens_alone() {
        let table = AttachmentTable::new();
        let out = substitute(
            AttachmentKind::Photo,
            &table,
            "See dayone-moment:/pdfAttachment/p1",
        );
        assert_eq!(out.text, "See dayone-moment:/pdfAttachment/p1");
        assert!(out.unmatched.is_empty());
    }

    #[test]
    fn unmatched_pdf_gets_sentinel_and_diagnostic() {
        let mut diags = Diagnostics::new();
        let records = [record("p1", Some("cafef00d"), None)];
        let (_, text) = resolve(
            "E2",
            AttachmentKind::Pdf,
            Some(&records[..]),
            "a dayone-moment:/pdfAttachment/p1 b dayone-moment:/pdfAttachment/zz9",
            &mut diags,
        );
        assert_eq!(text, "a cafef00d.pdf b missing_pdf");
        let diag = diags.iter().next().unwrap();
        assert_eq!(diag.to_string(), "missing pdf (pdf identifier: zz9) in E2");
    }

    #[test]
    fn unmatched_photo_mirrors_pdf_policy() {
        let mut diags = Diagnostics::new();
        let (table, text) = resolve(
            "E3",
            AttachmentKind::Photo,
            None,
            "dayone-moment://nope",
            &mut diags,
        );
        assert!(table.is_empty());
        assert_eq!(text, "missing_photo");
        assert_eq!(
            diags.iter().next().map(|d| d.kind.clone()),
            Some(DiagnosticKind::UnmatchedReference {
                kind: AttachmentKind::Photo,
                identifier: "nope".into()
            })
        );
    }

    #[test]
    fn table_keeps_export_order() {
        let mut diags = Diagnostics::new();
        let records = [
            record("zeta", Some("111"), None),
            record("alpha", Some("222"), None),
            record("zeta", Some("333"), None),
        ];
        let table = build_table("E4", AttachmentKind::Photo, Some(&records[..]), &mut diags);
        let order: Vec<&str> = table.iter().map(|a| a.basename.as_str()).collect();
        assert_eq!(order, ["333.jpeg", "222.jpeg"]);
        assert_eq!(table.get("zeta").unwrap().basename, "333.jpeg");
    }

    #[test]
    fn text_without_placeholders_is_untouched() {
        let out = substitute(AttachmentKind::Pdf, &AttachmentTable::new(), "plain ✓ text");
        assert_eq!(out.text, "plain ✓ text");
    }
}
