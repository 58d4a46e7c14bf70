use thiserror::Error;

use super::archive::ArchiveError;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("config error: {0}")]
    Config(String),
    #[error("provider error: {0}")]
    Provider(String),
    #[error("archive error: {0}")]
    Archive(#[from] ArchiveError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e.to_string())
    }
}

/// Rule-table problems found while compiling `TriageRules`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("mute phrase #{index} is empty")]
    EmptyMutePhrase { index: usize },
    #[error("mute pair #{index} has an empty {which} token")]
    EmptyMutePair { index: usize, which: &'static str },
    #[error("highlight rule #{index} has an empty phrase")]
    EmptyHighlightPhrase { index: usize },
    #[error("highlight rule '{phrase}' uses unknown color '{color}'")]
    UnknownColor { phrase: String, color: String },
    #[error("truncate_to ({to}) must not exceed truncate_over ({over})")]
    TruncateBounds { over: usize, to: usize },
}
