#[allow(clippy::module_inception)]
pub mod error;
pub mod archive;

pub use archive::ArchiveError;
pub use error::{CliError, ConfigError};
