#![allow(dead_code)]

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use citriage_core::api::{TriageEngine, TriageRules};

pub const GO_STEP_LOG: &str = include_str!("../fixtures/go_test_step.log");

pub fn plain_engine() -> TriageEngine {
    TriageEngine::new(Arc::new(TriageRules::default().compile(false).unwrap()))
}

pub fn color_engine() -> TriageEngine {
    TriageEngine::new(Arc::new(TriageRules::default().compile(true).unwrap()))
}

/// Write a zip archive with the given entries, in order, and return its path.
pub fn write_archive(dir: &Path, entries: &[(&str, &str)]) -> PathBuf {
    let path = dir.join("log_1.zip");
    let file = std::fs::File::create(&path).unwrap();
    let mut w = zip::ZipWriter::new(file);
    for (name, body) in entries {
        w.start_file(*name, zip::write::SimpleFileOptions::default())
            .unwrap();
        w.write_all(body.as_bytes()).unwrap();
    }
    w.finish().unwrap();
    path
}
