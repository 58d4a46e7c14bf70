use std::borrow::Cow;
use std::io::{self, Write};

use super::demux::TriageSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Failed,
    /// No result marker before the input ended.
    Unresolved,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedTest {
    pub name: String,
    pub output: Vec<u8>,
    pub outcome: Outcome,
}

impl FailedTest {
    pub fn output_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.output)
    }
}

/// Retained tests of one pass, in the order their first stage marker appeared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TriageReport {
    pub tests: Vec<FailedTest>,
    pub summary: TriageSummary,
}

impl TriageReport {
    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.tests.iter().map(|t| t.name.as_str()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&FailedTest> {
        self.tests.iter().find(|t| t.name == name)
    }
}

#[derive(Debug, Clone)]
pub struct ReportMarkers {
    pub failed: &'static str,
    pub unresolved: &'static str,
    pub title: &'static str,
    pub job: &'static str,
    pub download: &'static str,
}

impl ReportMarkers {
    pub fn unicode() -> Self {
        Self {
            failed: "⚠️ ",
            unresolved: "⏳",
            title: "✳️ ",
            job: "🔄",
            download: "⬇️ ",
        }
    }

    pub fn ascii() -> Self {
        Self {
            failed: "[FAIL]",
            unresolved: "[UNRESOLVED]",
            title: "[PR]",
            job: "[JOB]",
            download: "[DOWNLOAD]",
        }
    }
}

/// Write one block per retained test: header, accumulated output, and a
/// separating blank region.
pub fn render_report<W: Write>(
    report: &TriageReport,
    markers: &ReportMarkers,
    out: &mut W,
) -> io::Result<()> {
    for test in &report.tests {
        let marker = match test.outcome {
            Outcome::Failed => markers.failed,
            Outcome::Unresolved => markers.unresolved,
        };
        writeln!(out, "{} Test {}", marker, test.name)?;
        out.write_all(&test.output)?;
        out.write_all(b"\n\n\n")?;
    }
    Ok(())
}
