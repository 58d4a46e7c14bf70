//! Application wiring: fold CLI flags into the loaded config, compile the
//! triage rules once, and dispatch to a flow.
use std::path::PathBuf;
use std::sync::Arc;

use citriage_core::api::{
    AppConfig, ArchiveCache, CliError, ReportMarkers, RepoRef, StepLogKey, TriageEngine,
};

use crate::commands::cli::{Args, Commands};
use crate::flow::{local, pr::PrFlow, progress};

/// Flags win over file and environment settings.
pub fn apply_overrides(cfg: &mut AppConfig, args: &Args) {
    if let Some(color) = args.color {
        cfg.report.color = color.into();
    }
    if args.ascii {
        cfg.report.ascii = true;
    }
    if args.include_unresolved {
        cfg.report.include_unresolved = true;
    }
    if let Some(dir) = &args.cache_dir {
        cfg.cache.directory = Some(dir.to_string_lossy().to_string());
    }
    if let Some(token) = &args.token {
        cfg.github.token = Some(token.clone());
    }
}

pub fn build_engine(cfg: &AppConfig, stdout_is_tty: bool) -> Result<TriageEngine, CliError> {
    let color = cfg.report.color.enabled(stdout_is_tty);
    let rules = cfg.triage.compile(color)?;
    Ok(TriageEngine::new(Arc::new(rules)).include_unresolved(cfg.report.include_unresolved))
}

pub fn markers(cfg: &AppConfig) -> ReportMarkers {
    if cfg.report.ascii {
        ReportMarkers::ascii()
    } else {
        ReportMarkers::unicode()
    }
}

fn cache_dir(cfg: &AppConfig) -> PathBuf {
    match cfg.cache.directory.as_deref().map(str::trim) {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => PathBuf::from("cache"),
    }
}

#[tracing::instrument(name = "cli.run_app", skip_all)]
pub async fn run_app(args: Args, cfg: AppConfig) -> Result<i32, CliError> {
    let engine = build_engine(&cfg, atty::is(atty::Stream::Stdout))?;
    let markers = markers(&cfg);
    let mut stdout = std::io::stdout();

    match args.command {
        Commands::Pr(pr) => {
            let provider = citriage_plugins::factory::build_provider(&cfg.github)
                .map_err(|e| CliError::Config(format!("{e:#}")))?;
            tracing::debug!(provider = provider.name(), "provider ready");
            let cache = ArchiveCache::new(cache_dir(&cfg));
            let flow = PrFlow {
                provider: provider.as_ref(),
                cache: &cache,
                engine: &engine,
                markers: &markers,
                progress: progress::stderr_is_tty(),
            };
            flow.run(&RepoRef::new(pr.owner, pr.repo), pr.number, &mut stdout)
                .await
        }
        Commands::Archive(step) => {
            let key = StepLogKey::new(step.job, step.step);
            local::run_archive_flow(&engine, &markers, &step.archive, key, &mut stdout).await
        }
        Commands::Extract(step) => {
            let key = StepLogKey::new(step.job, step.step);
            local::run_extract_flow(&step.archive, key, &mut stdout).await
        }
        Commands::Log(log) => local::run_log_flow(&engine, &markers, log.path, &mut stdout).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use citriage_core::api::ColorMode;
    use clap::Parser;

    fn args(argv: &[&str]) -> Args {
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn flags_override_config() {
        let mut cfg = AppConfig::default();
        cfg.github.token = Some("from-file".into());
        apply_overrides(
            &mut cfg,
            &args(&[
                "citriage",
                "--color",
                "always",
                "--ascii",
                "--cache-dir",
                "/tmp/runs",
                "--token",
                "from-flag",
                "log",
            ]),
        );
        assert_eq!(cfg.report.color, ColorMode::Always);
        assert!(cfg.report.ascii);
        assert!(!cfg.report.include_unresolved);
        assert_eq!(cfg.cache.directory.as_deref(), Some("/tmp/runs"));
        assert_eq!(cfg.github.token.as_deref(), Some("from-flag"));
    }

    #[test]
    fn absent_flags_keep_config() {
        let mut cfg = AppConfig::default();
        cfg.report.color = ColorMode::Never;
        apply_overrides(&mut cfg, &args(&["citriage", "log"]));
        assert_eq!(cfg.report.color, ColorMode::Never);
        assert!(cfg.github.token.is_none());
    }

    #[test]
    fn color_follows_mode_and_tty() {
        let mut cfg = AppConfig::default();
        assert!(build_engine(&cfg, true).unwrap().rules().color_enabled());
        assert!(!build_engine(&cfg, false).unwrap().rules().color_enabled());
        cfg.report.color = ColorMode::Always;
        assert!(build_engine(&cfg, false).unwrap().rules().color_enabled());
    }

    #[test]
    fn bad_rules_are_config_errors() {
        let mut cfg = AppConfig::default();
        cfg.triage.mute_lines.push(String::new());
        assert!(matches!(build_engine(&cfg, false), Err(CliError::Config(_))));
    }

    #[test]
    fn marker_set_follows_ascii_flag() {
        let mut cfg = AppConfig::default();
        assert_eq!(markers(&cfg).failed, "⚠️ ");
        cfg.report.ascii = true;
        assert_eq!(markers(&cfg).failed, "[FAIL]");
    }
}
