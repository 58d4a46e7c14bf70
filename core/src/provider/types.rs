use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Conclusion {
    Success,
    Failure,
    Cancelled,
    Skipped,
    TimedOut,
    Neutral,
    ActionRequired,
    Stale,
    Other(String),
}

impl Conclusion {
    pub fn from_api(value: &str) -> Self {
        match value {
            "success" => Self::Success,
            "failure" => Self::Failure,
            "cancelled" => Self::Cancelled,
            "skipped" => Self::Skipped,
            "timed_out" => Self::TimedOut,
            "neutral" => Self::Neutral,
            "action_required" => Self::ActionRequired,
            "stale" => Self::Stale,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    pub head_ref: String,
    pub head_sha: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckRun {
    pub id: u64,
    pub name: String,
    /// `None` while the run is still in progress.
    pub conclusion: Option<Conclusion>,
}

impl CheckRun {
    pub fn failed(&self) -> bool {
        self.conclusion.as_ref().is_some_and(Conclusion::is_failure)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobStep {
    pub name: String,
    pub number: u64,
    pub conclusion: Option<Conclusion>,
}

impl JobStep {
    pub fn failed(&self) -> bool {
        self.conclusion.as_ref().is_some_and(Conclusion::is_failure)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowJob {
    pub id: u64,
    pub run_id: u64,
    pub name: String,
    pub steps: Vec<JobStep>,
}

impl WorkflowJob {
    pub fn failed_steps(&self) -> impl Iterator<Item = &JobStep> {
        self.steps.iter().filter(|s| s.failed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_failure_counts_as_failed() {
        let run = |c: Option<&str>| CheckRun {
            id: 1,
            name: "ci".into(),
            conclusion: c.map(Conclusion::from_api),
        };
        assert!(run(Some("failure")).failed());
        assert!(!run(Some("timed_out")).failed());
        assert!(!run(None).failed());
        assert_eq!(Conclusion::from_api("weird"), Conclusion::Other("weird".into()));
    }
}
