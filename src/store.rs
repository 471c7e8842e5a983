use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use rand::prelude::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};

use crate::code::{CodeGenerator, PickupCode};
use crate::entry::{EntryMeta, TextRecord, FILES_DIR, TEXT_RECORD};
use crate::error::{Error, Result};
use crate::time::{self, Ttl};

/// Placeholder handed back when a text record exists but cannot be read.
pub const UNREADABLE_TEXT: &str = "[text record could not be read]";

/// One uploaded file: original name plus raw content.
#[derive(Clone, Debug)]
pub struct FileUpload {
    pub name: String,
    pub bytes: Bytes,
}

impl FileUpload {
    pub fn new(name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

/// Everything a successful lookup hands back to the shell: the text (if
/// any), the stored file names, where they live on disk, and how long
/// the submission has left.
#[derive(Clone, Debug)]
pub struct Bundle {
    pub text: Option<String>,
    pub files: Vec<String>,
    pub path: PathBuf,
    pub files_path: PathBuf,
    pub remaining_hours: f64,
}

impl Bundle {
    /// Location of a listed file, for direct single-file download
    /// without packaging.
    #[must_use]
    pub fn file_path(&self, name: &str) -> PathBuf {
        self.files_path.join(name)
    }
}

/// Filesystem-backed retention store.
///
/// Directory names are the only durable index; the in-memory map is
/// rebuilt from them on [`open`](Self::open) so lookups avoid a full
/// rescan. Expired submissions are removed lazily at the start of each
/// lookup. Single logical actor: no locking, no transactions, and
/// concurrent processes over the same root can hand out duplicate codes.
pub struct DropStore {
    root: PathBuf,
    index: HashMap<String, Vec<EntryMeta>>,
    codes: CodeGenerator,
    rng: StdRng,
}

impl DropStore {
    /// Opens a store rooted at `root`, creating the directory if needed,
    /// and rebuilds the code index from the directory names found there.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;

        let mut index: HashMap<String, Vec<EntryMeta>> = HashMap::new();
        let mut existing = 0;
        for dir in fs::read_dir(&root)? {
            let path = dir?.path();
            if !path.is_dir() {
                continue;
            }
            // Foreign directories still count toward the sequence seed
            // but are never indexed or cleaned.
            existing += 1;
            if let Some(meta) = EntryMeta::parse(&path) {
                index.entry(meta.code.clone()).or_default().push(meta);
            }
        }

        Ok(Self {
            root,
            index,
            codes: CodeGenerator::seeded(existing),
            rng: StdRng::from_entropy(),
        })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Stores a submission and returns its pickup code.
    ///
    /// Empty submissions are rejected before anything touches the
    /// filesystem. The `files/` subdirectory is created even when there
    /// are no files; within one submission the last write wins on
    /// duplicate file names. A failure to create the directory itself
    /// propagates with nothing left behind claiming success.
    pub fn submit(
        &mut self,
        text: Option<&str>,
        files: &[FileUpload],
        ttl: Ttl,
    ) -> Result<PickupCode> {
        if text.map_or(true, str::is_empty) && files.is_empty() {
            return Err(Error::EmptySubmission);
        }

        let code = self.codes.generate(&mut self.rng);
        let created_at = time::now_ts();
        let expires_at = ttl.expires_at(created_at);

        let path = self
            .root
            .join(EntryMeta::dir_name(code.as_str(), created_at, expires_at));
        let files_dir = path.join(FILES_DIR);
        fs::create_dir_all(&files_dir)?;

        if let Some(text) = text.filter(|t| !t.is_empty()) {
            let record = serde_json::to_string(&TextRecord {
                text: text.to_owned(),
            })?;
            fs::write(path.join(TEXT_RECORD), record)?;
        }

        for file in files {
            fs::write(files_dir.join(&file.name), &file.bytes)?;
        }

        info!(code = %code, expires_at, "stored submission");
        self.index
            .entry(code.as_str().to_owned())
            .or_default()
            .push(EntryMeta {
                code: code.as_str().to_owned(),
                created_at,
                expires_at,
                path,
            });

        Ok(code)
    }

    /// Deletes every expired submission, wholesale. Runs at the start of
    /// each lookup rather than on a schedule. Best-effort: a failed
    /// deletion is logged and retried on the next pass, and never aborts
    /// the scan of the remaining entries.
    pub fn clean_expired(&mut self) {
        let now = time::now_ts();
        self.index.retain(|_, entries| {
            entries.retain(|meta| {
                if !meta.expired(now) {
                    return true;
                }
                match fs::remove_dir_all(&meta.path) {
                    Ok(()) => {
                        info!(path = %meta.path.display(), "removed expired submission");
                        false
                    }
                    // Someone beat us to it; drop the stale entry.
                    Err(e) if e.kind() == io::ErrorKind::NotFound => false,
                    Err(e) => {
                        warn!(
                            path = %meta.path.display(), error = %e,
                            "failed to remove expired submission",
                        );
                        true
                    }
                }
            });
            !entries.is_empty()
        });
    }

    /// Looks up a live submission by its pickup code.
    ///
    /// Expired submissions are cleaned first, so `None` covers
    /// never-existed, just-expired, and collision-shadowed codes alike.
    /// Codes are not unique; on a collision this returns the first entry
    /// the opening scan found, in unspecified directory-listing order.
    pub fn lookup(&mut self, code: &str) -> Option<Bundle> {
        self.clean_expired();

        let now = time::now_ts();
        let meta = self.index.get(code).and_then(|entries| entries.first())?;
        if meta.expired(now) {
            // Cleanup failed to delete it; still absent to callers.
            return None;
        }
        let meta = meta.clone();

        if !meta.path.is_dir() {
            // Deleted behind our back; forget it.
            if let Some(entries) = self.index.get_mut(code) {
                entries.retain(|m| m.path != meta.path);
                if entries.is_empty() {
                    self.index.remove(code);
                }
            }
            return None;
        }

        Some(Bundle {
            text: read_text(&meta.text_record()),
            files: list_files(&meta.files_dir()),
            files_path: meta.files_dir(),
            remaining_hours: time::remaining_hours(meta.expires_at, now),
            path: meta.path,
        })
    }
}

/// Text record contents, degraded to [`UNREADABLE_TEXT`] if the record
/// exists but does not read or parse. A missing record is simply `None`.
fn read_text(path: &Path) -> Option<String> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to read text record");
            return Some(UNREADABLE_TEXT.to_owned());
        }
    };

    match serde_json::from_str::<TextRecord>(&raw) {
        Ok(record) => Some(record.text),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "malformed text record");
            Some(UNREADABLE_TEXT.to_owned())
        }
    }
}

/// Names of the regular files under `dir`, in directory-listing order.
/// A missing or unreadable directory is an empty listing, not an error.
fn list_files(dir: &Path) -> Vec<String> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };

    entries
        .filter_map(|entry| {
            let entry = entry.ok()?;
            if !entry.path().is_file() {
                return None;
            }
            entry.file_name().into_string().ok()
        })
        .collect()
}
