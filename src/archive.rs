use std::fs::{self, File};
use std::io::{self, Cursor, Write};
use std::path::Path;

use tracing::warn;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::entry::{TextRecord, TEXT_RECORD};
use crate::error::Result;
use crate::store::Bundle;

/// Archive entry name the text record is flattened into.
pub const TEXT_ENTRY: &str = "text.txt";

/// Builds an in-memory deflate zip of a bundle's storage location: the
/// submitted text (if any) as [`TEXT_ENTRY`], then every regular file
/// flat under its original name.
///
/// The text side is best-effort; a record that no longer parses is
/// omitted rather than failing the archive. The returned buffer is ready
/// for sequential read from the start.
pub fn package(bundle: &Bundle) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    if let Some(text) = read_record_text(&bundle.path.join(TEXT_RECORD)) {
        if !text.is_empty() {
            zip.start_file(TEXT_ENTRY, options)?;
            zip.write_all(text.as_bytes())?;
        }
    }

    if let Ok(entries) = fs::read_dir(&bundle.files_path) {
        for entry in entries {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            zip.start_file(name, options)?;
            let mut file = File::open(&path)?;
            io::copy(&mut file, &mut zip)?;
        }
    }

    Ok(zip.finish()?.into_inner())
}

/// Parses the text record, swallowing a malformed one entirely.
fn read_record_text(path: &Path) -> Option<String> {
    let raw = fs::read_to_string(path).ok()?;
    match serde_json::from_str::<TextRecord>(&raw) {
        Ok(record) => Some(record.text),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "omitting malformed text record from archive");
            None
        }
    }
}
