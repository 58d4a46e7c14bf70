//! Flows over local inputs: a downloaded run archive or a raw log.
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

use citriage_core::api::{
    read_step_log, render_report, triage_step_log, CliError, ReportMarkers, StepLogKey,
    TriageEngine, TriageReport,
};

pub async fn run_archive_flow<W: Write>(
    engine: &TriageEngine,
    markers: &ReportMarkers,
    archive: &Path,
    key: StepLogKey,
    out: &mut W,
) -> Result<i32, CliError> {
    let engine = engine.clone();
    let path = archive.to_path_buf();
    let report = tokio::task::spawn_blocking(move || triage_step_log(&path, &key, &engine))
        .await
        .map_err(anyhow::Error::from)??;
    render_report(&report, markers, out)?;
    Ok(0)
}

pub async fn run_extract_flow<W: Write>(
    archive: &Path,
    key: StepLogKey,
    out: &mut W,
) -> Result<i32, CliError> {
    let path = archive.to_path_buf();
    let raw = tokio::task::spawn_blocking(move || read_step_log(&path, &key))
        .await
        .map_err(anyhow::Error::from)??;
    out.write_all(&raw)?;
    out.flush()?;
    Ok(0)
}

/// Triage a raw log file, or stdin when `path` is `None` or `-`.
pub async fn run_log_flow<W: Write>(
    engine: &TriageEngine,
    markers: &ReportMarkers,
    path: Option<PathBuf>,
    out: &mut W,
) -> Result<i32, CliError> {
    let engine = engine.clone();
    let report = tokio::task::spawn_blocking(move || triage_log(&engine, path.as_deref()))
        .await
        .map_err(anyhow::Error::from)??;
    render_report(&report, markers, out)?;
    Ok(0)
}

fn triage_log(engine: &TriageEngine, path: Option<&Path>) -> std::io::Result<TriageReport> {
    match path {
        Some(p) if p != Path::new("-") => engine.run(BufReader::new(File::open(p)?)),
        _ => engine.run(std::io::stdin().lock()),
    }
}
