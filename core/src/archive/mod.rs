//! CI log archives: picking one step's log out of a run archive, and the
//! on-disk cache downloaded archives live in.

mod cache;
mod locate;

pub use cache::{ArchiveCache, PendingArchive};
pub use locate::{
    open_archive, open_step_log, read_step_log, triage_step_log, StepLog, StepLogKey,
};
