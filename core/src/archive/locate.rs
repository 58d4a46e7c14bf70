use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use zip::ZipArchive;

use crate::error::ArchiveError;
use crate::triage::{TriageEngine, TriageReport};

/// Identifies one job step's log inside a workflow-run archive, which stores
/// it as `<job name>/<step number>_<step name>.txt`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StepLogKey {
    pub job_name: String,
    pub step_number: u64,
}

impl StepLogKey {
    pub fn new(job_name: impl Into<String>, step_number: u64) -> Self {
        Self {
            job_name: job_name.into(),
            step_number,
        }
    }

    pub fn prefix(&self) -> String {
        format!("{}/{}_", self.job_name, self.step_number)
    }
}

/// A readable archive entry plus the name it was stored under.
pub struct StepLog<R> {
    pub name: String,
    pub reader: R,
}

pub fn open_archive(path: &Path) -> Result<ZipArchive<BufReader<File>>, ArchiveError> {
    let file = File::open(path)?;
    Ok(ZipArchive::new(BufReader::new(file))?)
}

// First entry, in stored order, whose name starts with `prefix`.
fn find_entry<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    prefix: &str,
) -> Result<Option<(usize, String)>, ArchiveError> {
    for idx in 0..archive.len() {
        let entry = archive.by_index_raw(idx)?;
        if entry.name().starts_with(prefix) {
            return Ok(Some((idx, entry.name().to_string())));
        }
    }
    Ok(None)
}

pub fn open_step_log<'a, R: Read + Seek>(
    archive: &'a mut ZipArchive<R>,
    key: &StepLogKey,
) -> Result<StepLog<impl Read + 'a>, ArchiveError> {
    let prefix = key.prefix();
    let Some((idx, name)) = find_entry(archive, &prefix)? else {
        return Err(ArchiveError::NotFound { prefix });
    };
    tracing::debug!(target: "citriage.archive", entry = %name, "step log located");
    let reader = archive
        .by_index(idx)
        .map_err(|source| ArchiveError::Entry {
            name: name.clone(),
            source,
        })?;
    Ok(StepLog { name, reader })
}

/// Read a step's raw log into memory.
pub fn read_step_log(path: &Path, key: &StepLogKey) -> Result<Vec<u8>, ArchiveError> {
    let mut archive = open_archive(path)?;
    let mut log = open_step_log(&mut archive, key)?;
    let mut data = Vec::new();
    log.reader.read_to_end(&mut data)?;
    Ok(data)
}

/// Run one triage pass over a step's log, streaming it out of the archive.
pub fn triage_step_log(
    path: &Path,
    key: &StepLogKey,
    engine: &TriageEngine,
) -> Result<TriageReport, ArchiveError> {
    let mut archive = open_archive(path)?;
    let log = open_step_log(&mut archive, key)?;
    Ok(engine.run(BufReader::new(log.reader))?)
}
