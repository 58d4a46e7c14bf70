use std::io::{self, BufRead};
use std::sync::Arc;

use super::classify::{classify_line, stage_name, LineKind};
use super::demux::TriageState;
use super::report::TriageReport;
use super::rules::CompiledRules;

/// Stateless front of the triage pipeline. Cheap to clone; every pass gets
/// its own `TriageState` and only shares the read-only rules.
#[derive(Debug, Clone)]
pub struct TriageEngine {
    rules: Arc<CompiledRules>,
    include_unresolved: bool,
}

impl TriageEngine {
    pub fn new(rules: Arc<CompiledRules>) -> Self {
        Self {
            rules,
            include_unresolved: false,
        }
    }

    /// Also report tests that never received a result marker.
    pub fn include_unresolved(mut self, include: bool) -> Self {
        self.include_unresolved = include;
        self
    }

    pub fn rules(&self) -> &CompiledRules {
        &self.rules
    }

    pub fn pass(&self) -> TriagePass<'_> {
        TriagePass {
            engine: self,
            state: TriageState::new(),
            lines: 0,
        }
    }

    /// Run one complete pass over `rd`. Only read errors fail the pass.
    pub fn run<R: BufRead>(&self, mut rd: R) -> io::Result<TriageReport> {
        let mut pass = self.pass();
        let mut buf: Vec<u8> = Vec::with_capacity(8 * 1024);
        loop {
            buf.clear();
            if rd.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            pass.feed_line(trim_newline(&buf));
        }
        Ok(pass.finish())
    }
}

/// Incremental form of [`TriageEngine::run`] for callers that already have lines.
#[derive(Debug)]
pub struct TriagePass<'a> {
    engine: &'a TriageEngine,
    state: TriageState,
    lines: usize,
}

impl TriagePass<'_> {
    /// Feed one raw line without its terminator.
    pub fn feed_line(&mut self, raw: &[u8]) {
        self.lines += 1;
        match classify_line(raw) {
            (LineKind::Stage, line) => {
                if let Some(name) = stage_name(line) {
                    self.state.on_stage(&String::from_utf8_lossy(name));
                }
            }
            (LineKind::Result | LineKind::SubResult, line) => self.state.on_result(line),
            (LineKind::Content, line) => self.state.on_content(line, &self.engine.rules),
        }
    }

    pub fn state(&self) -> &TriageState {
        &self.state
    }

    pub fn finish(self) -> TriageReport {
        let report = self.state.into_report(self.engine.include_unresolved);
        let s = &report.summary;
        tracing::debug!(
            target: "citriage.triage",
            stage = "triage.pass.done",
            lines = self.lines,
            tests = s.tests_seen,
            failed = s.failed,
            discarded = s.discarded,
            unresolved = s.unresolved,
            muted = s.lines_muted,
            truncated = s.lines_truncated
        );
        report
    }
}

fn trim_newline(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}
