//! # dayone-to-markdown
//!
//! A CLI tool that converts a [Day One](https://dayoneapp.com) JSON export into a tree of
//! Markdown folders, one per journal entry.
//!
//! ## What it does
//!
//! A Day One export is a zip holding a JSON document (`Journal.json`, or `<journal>.json`)
//! plus `photos/` and `pdfs/` folders whose files are named by MD5 checksum. This tool
//! unpacks the archive into a temporary directory, and for each entry writes
//! `<YYYY-MM-DD>-<uuid>/index.md` with YAML frontmatter built from the entry's metadata,
//! copies the entry's attachments next to it, and rewrites the `dayone-moment:` links in
//! the body to point at the copied files.
//!
//! Problems with individual attachments never abort the run; they are collected as
//! [`Diagnostics`] and returned with the [`ConvertReport`].
//!
//! ## Usage
//!
//! ```sh
//! # Convert the default journal
//! dayone-to-markdown export.zip ~/notes/journal
//!
//! # Convert the "Work" journal into ~/notes/journal/Work
//! dayone-to-markdown export.zip ~/notes/journal --journal Work
//! ```
//!
//! Defaults can be persisted in `~/.config/dayone-to-markdown/config.toml`.
pub mod archive;
pub mod attachments;
pub mod diagnostics;
pub mod exporter;
pub mod importer;
pub mod sequential;
pub mod utils;

pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use sequential::{ConvertReport, execute};
pub use utils::ExportConfig;
