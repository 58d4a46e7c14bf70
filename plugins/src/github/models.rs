//! Wire shapes of the GitHub REST responses we read. Only the fields used
//! downstream are declared; everything else is ignored.

use citriage_core::api::{CheckRun, Conclusion, JobStep, PullRequest, WorkflowJob};
use serde::Deserialize;

/// Body GitHub sends with every non-2xx answer.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorDto {
    pub message: String,
    #[serde(default)]
    pub documentation_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PullRequestDto {
    pub number: u64,
    pub title: String,
    pub head: HeadDto,
}

#[derive(Debug, Deserialize)]
pub(crate) struct HeadDto {
    #[serde(rename = "ref")]
    pub ref_name: String,
    pub sha: String,
}

impl From<PullRequestDto> for PullRequest {
    fn from(dto: PullRequestDto) -> Self {
        PullRequest {
            number: dto.number,
            title: dto.title,
            head_ref: dto.head.ref_name,
            head_sha: dto.head.sha,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CheckRunsPageDto {
    pub total_count: u64,
    #[serde(default)]
    pub check_runs: Vec<CheckRunDto>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CheckRunDto {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub conclusion: Option<String>,
}

impl From<CheckRunDto> for CheckRun {
    fn from(dto: CheckRunDto) -> Self {
        CheckRun {
            id: dto.id,
            name: dto.name,
            conclusion: dto.conclusion.as_deref().map(Conclusion::from_api),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct WorkflowJobDto {
    pub id: u64,
    pub run_id: u64,
    pub name: String,
    #[serde(default)]
    pub steps: Vec<JobStepDto>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct JobStepDto {
    pub name: String,
    pub number: u64,
    #[serde(default)]
    pub conclusion: Option<String>,
}

impl From<WorkflowJobDto> for WorkflowJob {
    fn from(dto: WorkflowJobDto) -> Self {
        WorkflowJob {
            id: dto.id,
            run_id: dto.run_id,
            name: dto.name,
            steps: dto
                .steps
                .into_iter()
                .map(|s| JobStep {
                    name: s.name,
                    number: s.number,
                    conclusion: s.conclusion.as_deref().map(Conclusion::from_api),
                })
                .collect(),
        }
    }
}
