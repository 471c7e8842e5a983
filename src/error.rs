use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// The caller submitted neither text nor files. Nothing is persisted.
    #[error("a submission needs text or at least one file")]
    EmptySubmission,
    /// Retention outside the range the drop form offers.
    #[error("retention must be between 1 and 168 hours, got {0}")]
    InvalidTtl(u32),
    #[error("storage io: {0}")]
    Io(#[from] std::io::Error),
    #[error("text record: {0}")]
    TextRecord(#[from] serde_json::Error),
    #[error("archive: {0}")]
    Archive(#[from] zip::result::ZipError),
}
