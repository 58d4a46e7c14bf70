use std::sync::Arc;

use anyhow::Result;

use citriage_core::api::{CiProvider, GithubConfig};

use crate::github::GithubClient;

pub fn build_provider(cfg: &GithubConfig) -> Result<Arc<dyn CiProvider>> {
    let token = cfg
        .resolve_token()
        .map_err(|e| anyhow::anyhow!("read token file: {e}"))?;
    if token.is_none() {
        tracing::debug!(
            target: "citriage.github",
            "no token configured; requests are unauthenticated"
        );
    }
    Ok(Arc::new(GithubClient::new(cfg, token)?))
}
