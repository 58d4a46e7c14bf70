use std::time::Duration;

use citriage_core::api::{CheckRun, CiProvider, GithubConfig, PullRequest, RepoRef, WorkflowJob};
use futures::StreamExt;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde::de::DeserializeOwned;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use super::error::GithubHttpError;
use super::models::{CheckRunsPageDto, PullRequestDto, WorkflowJobDto};

const CHECK_RUNS_PER_PAGE: u64 = 100;

/// Pass 2xx responses through; turn anything else into a [`GithubHttpError`]
/// carrying GitHub's own error message.
async fn ensure_success(resp: reqwest::Response) -> Result<reqwest::Response, GithubHttpError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let url = resp.url().to_string();
    let headers = resp.headers().clone();
    let body = resp
        .text()
        .await
        .map_err(|err| GithubHttpError::from_reqwest(err, &url))?;
    Err(GithubHttpError::from_response(status, &headers, &url, &body))
}

async fn decode_json<T: DeserializeOwned>(resp: reqwest::Response) -> anyhow::Result<T> {
    let resp = ensure_success(resp).await?;
    let status = resp.status();
    let url = resp.url().to_string();
    let body = resp
        .text()
        .await
        .map_err(|err| GithubHttpError::from_reqwest(err, &url))?;
    serde_json::from_str::<T>(&body)
        .map_err(|err| GithubHttpError::decode(status, &url, err, &body).into())
}

/// GitHub REST v3 client covering the handful of endpoints triage needs.
#[derive(Clone)]
pub struct GithubClient {
    token: Option<String>,
    http: reqwest::Client,
    base_url: String,
}

impl GithubClient {
    pub fn new(cfg: &GithubConfig, token: Option<String>) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static("2022-11-28"),
        );
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(cfg.timeout_ms))
            .user_agent(cfg.user_agent.clone())
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::limited(cfg.max_redirects))
            .build()?;
        Ok(Self {
            token: token.filter(|t| !t.trim().is_empty()),
            http,
            base_url: cfg.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn repo_url(&self, repo: &RepoRef, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/{}",
            self.base_url, repo.owner, repo.name, path
        )
    }

    fn auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> anyhow::Result<T> {
        let req = self.http.get(url).query(query);
        let resp = self
            .auth(req)
            .send()
            .await
            .map_err(|err| GithubHttpError::from_reqwest(err, url))?;
        decode_json(resp).await
    }
}

#[async_trait::async_trait]
impl CiProvider for GithubClient {
    fn name(&self) -> &str {
        "github"
    }

    async fn pull_request(&self, repo: &RepoRef, number: u64) -> anyhow::Result<PullRequest> {
        let url = self.repo_url(repo, &format!("pulls/{number}"));
        tracing::debug!(target: "citriage.github", stage = "github.pull.in", url = %url);
        let dto: PullRequestDto = self.get_json(&url, &[]).await?;
        Ok(dto.into())
    }

    async fn check_runs(&self, repo: &RepoRef, git_ref: &str) -> anyhow::Result<Vec<CheckRun>> {
        let url = self.repo_url(repo, &format!("commits/{git_ref}/check-runs"));
        let mut runs = Vec::new();
        let mut page = 1u64;
        loop {
            tracing::debug!(
                target: "citriage.github",
                stage = "github.check_runs.in",
                url = %url,
                page = page
            );
            let dto: CheckRunsPageDto = self
                .get_json(
                    &url,
                    &[
                        ("per_page", CHECK_RUNS_PER_PAGE.to_string()),
                        ("page", page.to_string()),
                    ],
                )
                .await?;
            let fetched = dto.check_runs.len();
            runs.extend(dto.check_runs.into_iter().map(CheckRun::from));
            if fetched == 0 || runs.len() as u64 >= dto.total_count {
                break;
            }
            page += 1;
        }
        tracing::debug!(
            target: "citriage.github",
            stage = "github.check_runs.out",
            count = runs.len()
        );
        Ok(runs)
    }

    async fn workflow_job(&self, repo: &RepoRef, job_id: u64) -> anyhow::Result<WorkflowJob> {
        let url = self.repo_url(repo, &format!("actions/jobs/{job_id}"));
        tracing::debug!(target: "citriage.github", stage = "github.job.in", url = %url);
        let dto: WorkflowJobDto = self.get_json(&url, &[]).await?;
        Ok(dto.into())
    }

    async fn download_run_logs(
        &self,
        repo: &RepoRef,
        run_id: u64,
        sink: &mut (dyn AsyncWrite + Unpin + Send),
    ) -> anyhow::Result<u64> {
        let url = self.repo_url(repo, &format!("actions/runs/{run_id}/logs"));
        tracing::debug!(target: "citriage.github", stage = "github.logs.in", url = %url);
        let resp = self
            .auth(self.http.get(&url))
            .send()
            .await
            .map_err(|err| GithubHttpError::from_reqwest(err, &url))?;
        let resp = ensure_success(resp).await?;

        let mut total = 0u64;
        let mut body = resp.bytes_stream();
        while let Some(chunk) = body.next().await {
            let chunk = chunk.map_err(|err| GithubHttpError::from_reqwest(err, &url))?;
            sink.write_all(&chunk).await?;
            total += chunk.len() as u64;
        }
        sink.flush().await?;
        tracing::debug!(
            target: "citriage.github",
            stage = "github.logs.out",
            run_id = run_id,
            bytes = total
        );
        Ok(total)
    }
}
