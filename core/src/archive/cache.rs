use std::io;
use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Directory of downloaded workflow-run log archives, one file per run.
#[derive(Debug, Clone)]
pub struct ArchiveCache {
    dir: PathBuf,
}

impl ArchiveCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for_run(&self, run_id: u64) -> PathBuf {
        self.dir.join(format!("log_{run_id}.zip"))
    }

    /// Path of the cached archive for `run_id`, if one was committed earlier.
    pub fn lookup(&self, run_id: u64) -> Option<PathBuf> {
        let path = self.path_for_run(run_id);
        path.is_file().then_some(path)
    }

    /// Start writing the archive for `run_id`. Nothing is visible under the
    /// final name until [`PendingArchive::commit`].
    pub async fn begin(&self, run_id: u64) -> io::Result<PendingArchive> {
        fs::create_dir_all(&self.dir).await?;
        let dest = self.path_for_run(run_id);
        let part = dest.with_extension("zip.part");
        let file = fs::File::create(&part).await?;
        Ok(PendingArchive {
            file: Some(file),
            part,
            dest,
        })
    }
}

/// An archive being downloaded. Dropped without commit, the partial file is
/// removed.
#[derive(Debug)]
pub struct PendingArchive {
    file: Option<fs::File>,
    part: PathBuf,
    dest: PathBuf,
}

impl PendingArchive {
    pub fn writer(&mut self) -> io::Result<&mut fs::File> {
        self.file
            .as_mut()
            .ok_or_else(|| io::Error::other("archive already committed"))
    }

    pub async fn commit(mut self) -> io::Result<PathBuf> {
        if let Some(mut file) = self.file.take() {
            file.flush().await?;
            file.sync_all().await?;
        }
        fs::rename(&self.part, &self.dest).await?;
        Ok(self.dest.clone())
    }
}

impl Drop for PendingArchive {
    fn drop(&mut self) {
        // commit() takes the file; a live handle means the write never finished
        if let Some(file) = self.file.take() {
            drop(file);
            let _ = std::fs::remove_file(&self.part);
        }
    }
}
