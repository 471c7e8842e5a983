use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Separator between the fields of a submission directory name. Codes
/// and timestamps are decimal digits, so it can never appear inside a
/// field.
pub const SEPARATOR: char = '_';

/// Name of the optional structured text record inside a submission.
pub const TEXT_RECORD: &str = "text.json";

/// Name of the subdirectory holding raw file copies.
pub const FILES_DIR: &str = "files";

/// The single-field object the submitted text is stored as. serde_json
/// writes non-ASCII verbatim, so the record round-trips byte-identical.
#[derive(Serialize, Deserialize)]
pub struct TextRecord {
    pub text: String,
}

/// Metadata recoverable from a submission directory's name,
/// `<code>_<created_at>_<expires_at>`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntryMeta {
    pub code: String,
    pub created_at: i64,
    pub expires_at: i64,
    pub path: PathBuf,
}

impl EntryMeta {
    /// Parses a directory into its metadata. Anything that is not the
    /// three-part structure is a foreign directory and yields `None`.
    #[must_use]
    pub fn parse(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?;
        let mut parts = name.split(SEPARATOR);
        let code = parts.next()?;
        let created_at = parts.next()?.parse().ok()?;
        let expires_at = parts.next()?.parse().ok()?;
        if code.is_empty() || parts.next().is_some() {
            return None;
        }

        Some(Self {
            code: code.to_owned(),
            created_at,
            expires_at,
            path: path.to_owned(),
        })
    }

    #[must_use]
    pub fn dir_name(code: &str, created_at: i64, expires_at: i64) -> String {
        format!("{code}{SEPARATOR}{created_at}{SEPARATOR}{expires_at}")
    }

    /// An entry is live until the wall clock passes its expiry; there is
    /// no in-between state.
    #[must_use]
    pub const fn expired(&self, now: i64) -> bool {
        now > self.expires_at
    }

    #[must_use]
    pub fn files_dir(&self) -> PathBuf {
        self.path.join(FILES_DIR)
    }

    #[must_use]
    pub fn text_record(&self) -> PathBuf {
        self.path.join(TEXT_RECORD)
    }
}
