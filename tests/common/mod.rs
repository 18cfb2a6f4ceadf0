#![allow(dead_code)]

use assert_cmd::Command;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use zip::write::SimpleFileOptions;

pub fn converter_cmd() -> Command {
    let mut cmd = Command::cargo_bin("dayone-to-markdown").unwrap();
    cmd.env_remove("RUST_LOG");
    // Keep a developer's own config.toml out of the picture.
    cmd.env("XDG_CONFIG_HOME", "/nonexistent-dayone-config");
    cmd
}

/// Write a zip at `path` holding `files` (name, contents).
pub fn write_archive(path: &Path, files: &[(&str, &[u8])]) {
    let mut zip = zip::ZipWriter::new(File::create(path).unwrap());
    let opts = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
    for (name, data) in files {
        zip.start_file(*name, opts).unwrap();
        zip.write_all(data).unwrap();
    }
    zip.finish().unwrap();
}

pub const PHOTO_ENTRY: &str = r#"{
  "metadata": {"version": "1.0"},
  "entries": [{
    "uuid": "ABC123",
    "creationDate": "2023-05-01T10:00:00Z",
    "text": "Hello dayone-moment://photo1 world",
    "starred": true,
    "photos": [{"identifier": "photo1", "md5": "deadbeef", "type": "jpg"}]
  }]
}"#;

pub const JPEG_BYTES: &[u8] = b"\xff\xd8\xff\xe0fake-jpeg";
