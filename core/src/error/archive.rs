use thiserror::Error;

/// Failures while selecting or reading a step log inside a CI log archive.
#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("no archive entry matches prefix '{prefix}'")]
    NotFound { prefix: String },

    #[error("opening entry '{name}' in zip archive: {source}")]
    Entry {
        name: String,
        source: zip::result::ZipError,
    },

    #[error("zip archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ArchiveError {
    /// True when the archive was readable but held no matching entry.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
