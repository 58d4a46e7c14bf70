use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};

use citriage_core::api::ColorMode;

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorChoice {
    Auto,
    Always,
    Never,
}

impl From<ColorChoice> for ColorMode {
    fn from(choice: ColorChoice) -> Self {
        match choice {
            ColorChoice::Auto => ColorMode::Auto,
            ColorChoice::Always => ColorMode::Always,
            ColorChoice::Never => ColorMode::Never,
        }
    }
}

/// Show only the failed Go tests from CI logs, with noise muted.
#[derive(Parser, Debug)]
#[command(name = "citriage", version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file to load instead of ~/.citriage/config.toml or ./citriage.toml.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Colour highlighted lines.
    #[arg(long, value_enum, global = true)]
    pub color: Option<ColorChoice>,

    /// ASCII markers instead of emoji.
    #[arg(long, global = true)]
    pub ascii: bool,

    /// Also report tests that never printed a result.
    #[arg(long, global = true)]
    pub include_unresolved: bool,

    #[arg(long, global = true)]
    pub cache_dir: Option<PathBuf>,

    /// GitHub token; overrides config, environment and token file.
    #[arg(long, global = true)]
    pub token: Option<String>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct PrArgs {
    pub owner: String,
    pub repo: String,
    pub number: u64,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct StepArgs {
    /// Workflow run log archive (.zip).
    pub archive: PathBuf,

    /// Job name, i.e. the top-level directory inside the archive.
    #[arg(long)]
    pub job: String,

    #[arg(long)]
    pub step: u64,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct LogArgs {
    /// Raw `go test -v` log; stdin when omitted or `-`.
    pub path: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Triage every failed step of every failed check run of a pull request.
    Pr(PrArgs),
    /// Triage one job step from a local run archive.
    Archive(StepArgs),
    /// Print one job step's raw log from a local run archive.
    Extract(StepArgs),
    /// Triage a raw log file or stdin.
    Log(LogArgs),
}
