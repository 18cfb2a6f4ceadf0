use crate::attachments::AttachmentKind;
use std::fmt;
use std::path::PathBuf;

/// A recoverable problem noticed while converting one entry.
///
/// None of these stop the run: the entry is still written, with an empty
/// body, a sentinel filename or a missing attachment file as appropriate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// The entry has no `text` field; its body is written empty.
    MissingText,
    /// An attachment record has no `md5`; a sentinel basename was used.
    MissingChecksum { kind: AttachmentKind },
    /// Copying an attachment into the entry folder failed.
    CopyFailed {
        source: PathBuf,
        destination: PathBuf,
        reason: String,
    },
    /// A placeholder in the body names an identifier with no record.
    UnmatchedReference {
        kind: AttachmentKind,
        identifier: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub entry_id: String,
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    /// Missing text is expected for photo-only posts; everything else is an error.
    pub fn is_error(&self) -> bool {
        !matches!(self.kind, DiagnosticKind::MissingText)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            DiagnosticKind::MissingText => write!(f, "post without text ({})", self.entry_id),
            DiagnosticKind::MissingChecksum { kind } => {
                write!(f, "{} without md5 ({})", kind.label(), self.entry_id)
            }
            DiagnosticKind::CopyFailed {
                source,
                destination,
                reason,
            } => write!(
                f,
                "attachment copy failed: ({})\n  src: {}\n  dst: {}\n  reason: {}",
                self.entry_id,
                source.display(),
                destination.display(),
                reason
            ),
            DiagnosticKind::UnmatchedReference { kind, identifier } => write!(
                f,
                "missing {} ({} identifier: {}) in {}",
                kind.label(),
                kind.label(),
                identifier,
                self.entry_id
            ),
        }
    }
}

/// Ordered collection of everything worth reporting from one conversion.
#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Log the problem right away and keep it for the final report.
    pub fn push(&mut self, entry_id: &str, kind: DiagnosticKind) {
        let diag = Diagnostic {
            entry_id: entry_id.to_string(),
            kind,
        };
        if diag.is_error() {
            tracing::error!("{}", diag);
        } else {
            tracing::warn!("{}", diag);
        }
        self.items.push(diag);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
