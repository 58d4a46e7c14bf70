//! Pull-request flow: failed check runs -> workflow jobs -> cached run
//! archives -> one triage pass per failed step.
use std::io::Write;
use std::path::PathBuf;

use citriage_core::api::{
    render_report, triage_step_log, ArchiveCache, CiProvider, CliError, RepoRef, ReportMarkers,
    StepLogKey, TriageEngine, WorkflowJob,
};

use super::progress::DownloadSpinner;

pub struct PrFlow<'a> {
    pub provider: &'a dyn CiProvider,
    pub cache: &'a ArchiveCache,
    pub engine: &'a TriageEngine,
    pub markers: &'a ReportMarkers,
    pub progress: bool,
}

impl PrFlow<'_> {
    #[tracing::instrument(name = "cli.pr_flow", skip(self, repo, out), fields(repo = %repo))]
    pub async fn run<W: Write>(
        &self,
        repo: &RepoRef,
        number: u64,
        out: &mut W,
    ) -> Result<i32, CliError> {
        let pr = self
            .provider
            .pull_request(repo, number)
            .await
            .map_err(provider_error)?;
        writeln!(out, "{} PR: {}", self.markers.title, pr.title)?;

        let runs = self
            .provider
            .check_runs(repo, &pr.head_sha)
            .await
            .map_err(provider_error)?;
        tracing::debug!(
            target: "citriage.cli",
            stage = "pr.check_runs",
            total = runs.len(),
            failed = runs.iter().filter(|r| r.failed()).count()
        );

        for run in runs.iter().filter(|r| r.failed()) {
            let job = match self.provider.workflow_job(repo, run.id).await {
                Ok(job) => job,
                Err(e) => {
                    tracing::warn!(
                        check_run = run.id,
                        error = %format!("{e:#}"),
                        "failed to get workflow job"
                    );
                    continue;
                }
            };

            let archive = match self.ensure_archive(repo, job.run_id, out).await {
                Ok(path) => path,
                Err(e) => {
                    tracing::warn!(
                        run_id = job.run_id,
                        error = %format!("{e:#}"),
                        "failed to download logs"
                    );
                    continue;
                }
            };

            self.triage_job(&job, archive, out).await?;
        }

        Ok(0)
    }

    async fn ensure_archive<W: Write>(
        &self,
        repo: &RepoRef,
        run_id: u64,
        out: &mut W,
    ) -> anyhow::Result<PathBuf> {
        if let Some(path) = self.cache.lookup(run_id) {
            tracing::debug!(target: "citriage.cli", path = %path.display(), "run archive cached");
            return Ok(path);
        }

        writeln!(out, "{} Downloading log file", self.markers.download)?;
        let mut pending = self.cache.begin(run_id).await?;
        let spinner = DownloadSpinner::start(format!("run {run_id}"), self.progress);
        match self
            .provider
            .download_run_logs(repo, run_id, pending.writer()?)
            .await
        {
            Ok(bytes) => {
                spinner.finish();
                let path = pending.commit().await?;
                tracing::debug!(
                    target: "citriage.cli",
                    path = %path.display(),
                    bytes,
                    "run archive stored"
                );
                Ok(path)
            }
            Err(e) => {
                spinner.abandon();
                Err(e)
            }
        }
    }

    async fn triage_job<W: Write>(
        &self,
        job: &WorkflowJob,
        archive: PathBuf,
        out: &mut W,
    ) -> Result<(), CliError> {
        for step in job.failed_steps() {
            writeln!(
                out,
                "{} Job {:?} (Step {})",
                self.markers.job, step.name, step.number
            )?;

            let key = StepLogKey::new(job.name.clone(), step.number);
            let engine = self.engine.clone();
            let path = archive.clone();
            let triaged = tokio::task::spawn_blocking(move || triage_step_log(&path, &key, &engine))
                .await
                .map_err(anyhow::Error::from)?;

            match triaged {
                Ok(report) => render_report(&report, self.markers, out)?,
                Err(e) => {
                    tracing::warn!(
                        job = %job.name,
                        step = step.number,
                        error = %e,
                        "step log unavailable"
                    );
                }
            }
        }
        Ok(())
    }
}

fn provider_error(e: anyhow::Error) -> CliError {
    CliError::Provider(format!("{e:#}"))
}
