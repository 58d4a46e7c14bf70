//! Stable re-exports for consumers (`cli`, `plugins`, and external crates).
//!
//! Prefer importing from `citriage_core::api` instead of reaching into internal modules.

pub use crate::archive::{
    open_archive, open_step_log, read_step_log, triage_step_log, ArchiveCache, PendingArchive,
    StepLog, StepLogKey,
};
pub use crate::config::{
    load_default, load_from_path, AppConfig, CacheConfig, ColorMode, GithubConfig, LoggingConfig,
    ReportConfig,
};
pub use crate::error::{ArchiveError, CliError, ConfigError};
pub use crate::provider::{
    CheckRun, CiProvider, Conclusion, JobStep, PullRequest, RepoRef, WorkflowJob,
};
pub use crate::triage::{
    render_report, CompiledRules, FailedTest, HighlightRule, MutePair, Outcome, ReportMarkers,
    TriageEngine, TriageReport, TriageRules, TriageSummary,
};
