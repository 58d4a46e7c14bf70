use std::path::{Path, PathBuf};

use super::types::AppConfig;

/// Get the default citriage data directory: ~/.citriage
pub fn get_citriage_data_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map_err(|_| anyhow::anyhow!("Cannot determine home directory"))?;
    Ok(PathBuf::from(home).join(".citriage"))
}

pub fn load_default() -> anyhow::Result<AppConfig> {
    // Priority 1: ~/.citriage/config.toml (highest)
    let data_dir = get_citriage_data_dir()?;
    let user_config = data_dir.join("config.toml");

    // Priority 2: ./citriage.toml (current directory)
    let local_config = Path::new("citriage.toml");

    let cfg = if user_config.exists() {
        read_config(&user_config)?
    } else if local_config.exists() {
        read_config(local_config)?
    } else {
        AppConfig::default()
    };

    finish(cfg, &data_dir)
}

/// Load an explicit config file (`--config`), then apply the same defaults
/// and environment overrides as [`load_default`].
pub fn load_from_path(path: &Path) -> anyhow::Result<AppConfig> {
    let cfg = read_config(path)?;
    finish(cfg, &get_citriage_data_dir()?)
}

fn read_config(path: &Path) -> anyhow::Result<AppConfig> {
    let s = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("read {}: {e}", path.display()))?;
    toml::from_str::<AppConfig>(&s).map_err(|e| anyhow::anyhow!("parse {}: {e}", path.display()))
}

fn finish(mut cfg: AppConfig, data_dir: &Path) -> anyhow::Result<AppConfig> {
    if is_blank(cfg.cache.directory.as_deref()) {
        cfg.cache.directory = Some(data_dir.join("cache").to_string_lossy().to_string());
    }

    if cfg.logging.file && is_blank(cfg.logging.directory.as_deref()) {
        cfg.logging.directory = Some(data_dir.join("logs").to_string_lossy().to_string());
    }

    apply_env_overrides(&mut cfg, |key| std::env::var(key).ok());
    Ok(cfg)
}

fn is_blank(value: Option<&str>) -> bool {
    match value {
        Some(v) => v.trim().is_empty(),
        None => true,
    }
}

// Environment variable overrides (Priority 0: highest)
fn apply_env_overrides(cfg: &mut AppConfig, env: impl Fn(&str) -> Option<String>) {
    let non_empty = |key: &str| env(key).filter(|v| !v.trim().is_empty());

    if let Some(v) = non_empty("CITRIAGE_GITHUB_TOKEN").or_else(|| non_empty("GITHUB_TOKEN")) {
        cfg.github.token = Some(v);
    }
    if let Some(v) = non_empty("CITRIAGE_GITHUB_API_URL") {
        cfg.github.api_base_url = v;
    }
    if let Some(v) = non_empty("CITRIAGE_CACHE_DIR") {
        cfg.cache.directory = Some(v);
    }
    if let Some(v) = non_empty("CITRIAGE_LOG_LEVEL") {
        cfg.logging.level = v;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn env_overrides_win() {
        let vars: HashMap<&str, &str> = [
            ("GITHUB_TOKEN", "from-gh"),
            ("CITRIAGE_GITHUB_API_URL", "http://127.0.0.1:9"),
            ("CITRIAGE_CACHE_DIR", "  "),
        ]
        .into_iter()
        .collect();

        let mut cfg = AppConfig::default();
        cfg.cache.directory = Some("/tmp/c".into());
        apply_env_overrides(&mut cfg, |k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(cfg.github.token.as_deref(), Some("from-gh"));
        assert_eq!(cfg.github.api_base_url, "http://127.0.0.1:9");
        assert_eq!(cfg.cache.directory.as_deref(), Some("/tmp/c"));
    }

    #[test]
    fn citriage_token_beats_generic_token() {
        let mut cfg = AppConfig::default();
        apply_env_overrides(&mut cfg, |k| match k {
            "CITRIAGE_GITHUB_TOKEN" => Some("specific".into()),
            "GITHUB_TOKEN" => Some("generic".into()),
            _ => None,
        });
        assert_eq!(cfg.github.token.as_deref(), Some("specific"));
    }

    #[test]
    fn explicit_file_fills_cache_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("citriage.toml");
        std::fs::write(&path, "[report]\nascii = true\n").unwrap();

        let cfg = finish(read_config(&path).unwrap(), tmp.path()).unwrap();
        assert!(cfg.report.ascii);
        assert!(cfg.cache.directory.is_some());
    }

    #[test]
    fn bad_file_reports_path() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("broken.toml");
        std::fs::write(&path, "[report\n").unwrap();
        let err = read_config(&path).unwrap_err().to_string();
        assert!(err.contains("broken.toml"));
    }
}
