//! The CI service the triage pipeline pulls check runs and logs from.
//!
//! `citriage-core` only describes the collaborator; the HTTP implementation
//! lives in `citriage-plugins`.

mod types;

pub use types::{CheckRun, Conclusion, JobStep, PullRequest, RepoRef, WorkflowJob};

use tokio::io::AsyncWrite;

#[async_trait::async_trait]
pub trait CiProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn pull_request(&self, repo: &RepoRef, number: u64) -> anyhow::Result<PullRequest>;

    /// All check runs reported for `git_ref` (branch, tag or commit sha).
    async fn check_runs(&self, repo: &RepoRef, git_ref: &str) -> anyhow::Result<Vec<CheckRun>>;

    /// The workflow job behind a check run; GitHub Actions reuses the check
    /// run id as the job id.
    async fn workflow_job(&self, repo: &RepoRef, job_id: u64) -> anyhow::Result<WorkflowJob>;

    /// Stream the zipped logs of a workflow run into `sink`, returning the
    /// number of bytes written.
    async fn download_run_logs(
        &self,
        repo: &RepoRef,
        run_id: u64,
        sink: &mut (dyn AsyncWrite + Unpin + Send),
    ) -> anyhow::Result<u64>;
}
