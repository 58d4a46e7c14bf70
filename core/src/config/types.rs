use serde::{Deserialize, Serialize};

use crate::triage::TriageRules;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub github: GithubConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub report: ReportConfig,

    #[serde(default)]
    pub triage: TriageRules,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_enabled")]
    pub enabled: bool,

    /// If true, log to stderr.
    #[serde(default = "default_logging_console")]
    pub console: bool,

    /// If true, log to a file under `directory` (or OS temp dir if unset).
    #[serde(default)]
    pub file: bool,

    /// EnvFilter string, e.g. "warn" or "citriage_core=debug".
    #[serde(default = "default_logging_level")]
    pub level: String,

    /// Optional directory for log files. If empty or unset, uses OS temp dir.
    #[serde(default)]
    pub directory: Option<String>,
}

fn default_logging_enabled() -> bool {
    true
}

fn default_logging_console() -> bool {
    true
}

fn default_logging_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_logging_enabled(),
            console: default_logging_console(),
            file: false,
            level: default_logging_level(),
            directory: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubConfig {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Access token used as-is; never written back anywhere.
    #[serde(default)]
    pub token: Option<String>,

    /// Read the token from this file when `token` and the environment are empty.
    #[serde(default = "default_token_file")]
    pub token_file: Option<String>,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Log downloads are served through a redirect to blob storage.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
}

fn default_api_base_url() -> String {
    "https://api.github.com".to_string()
}

fn default_token_file() -> Option<String> {
    Some("token.txt".to_string())
}

fn default_timeout_ms() -> u64 {
    120_000
}

fn default_user_agent() -> String {
    format!("citriage/{}", env!("CARGO_PKG_VERSION"))
}

fn default_max_redirects() -> usize {
    5
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            token: None,
            token_file: default_token_file(),
            timeout_ms: default_timeout_ms(),
            user_agent: default_user_agent(),
            max_redirects: default_max_redirects(),
        }
    }
}

impl GithubConfig {
    /// Token from config, else the token file (trimmed). Empty values count
    /// as unset.
    pub fn resolve_token(&self) -> std::io::Result<Option<String>> {
        if let Some(token) = self.token.as_deref().map(str::trim) {
            if !token.is_empty() {
                return Ok(Some(token.to_string()));
            }
        }
        let Some(path) = self.token_file.as_deref().map(str::trim) else {
            return Ok(None);
        };
        if path.is_empty() || !std::path::Path::new(path).is_file() {
            return Ok(None);
        }
        let token = std::fs::read_to_string(path)?;
        let token = token.trim();
        Ok((!token.is_empty()).then(|| token.to_string()))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Where downloaded run archives are kept. Defaults to `~/.citriage/cache`.
    #[serde(default)]
    pub directory: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    /// Resolve against whether the output is a terminal.
    pub fn enabled(self, is_tty: bool) -> bool {
        match self {
            Self::Auto => is_tty,
            Self::Always => true,
            Self::Never => false,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportConfig {
    /// ASCII markers instead of emoji.
    #[serde(default)]
    pub ascii: bool,

    #[serde(default)]
    pub color: ColorMode,

    /// Also report tests that never got a result marker (e.g. the log ends
    /// in a panic or timeout).
    #[serde(default)]
    pub include_unresolved: bool,
}
