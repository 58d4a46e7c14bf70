use std::borrow::Cow;
use std::collections::HashMap;

use super::highlight;
use super::mute::{self, MuteState};
use super::rules::CompiledRules;

const ELLIPSIS: &[u8] = b"...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamStatus {
    /// Seen a stage marker, no terminal result yet.
    Pending,
    /// Result marker reported a failure; retained for the report.
    Failed,
    /// Passed or any other non-failure result; buffer released.
    Discarded,
}

/// Output collected for one test name.
#[derive(Debug, Clone)]
pub struct LogStream {
    name: String,
    buffer: Vec<u8>,
    mute: MuteState,
    status: StreamStatus,
}

impl LogStream {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            buffer: Vec::new(),
            mute: MuteState::Open,
            status: StreamStatus::Pending,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    pub fn mute_state(&self) -> MuteState {
        self.mute
    }

    pub fn status(&self) -> StreamStatus {
        self.status
    }

    pub(crate) fn push_line(&mut self, line: &[u8]) {
        self.buffer.extend_from_slice(line);
        self.buffer.push(b'\n');
    }

    pub(crate) fn mark_failed(&mut self) {
        self.status = StreamStatus::Failed;
    }

    pub(crate) fn discard(&mut self) {
        self.buffer = Vec::new();
        self.mute = MuteState::Open;
        self.status = StreamStatus::Discarded;
    }

    pub(crate) fn into_parts(self) -> (String, Vec<u8>, StreamStatus) {
        (self.name, self.buffer, self.status)
    }
}

/// Counters for one pass, logged once the input is consumed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TriageSummary {
    pub tests_seen: usize,
    pub failed: usize,
    pub discarded: usize,
    pub unresolved: usize,
    pub lines_muted: usize,
    pub lines_truncated: usize,
}

/// Per-pass state. Streams are kept in first-seen order so the report order
/// falls out of iteration; `index` maps names to their slot.
#[derive(Debug, Default)]
pub struct TriageState {
    pub(crate) streams: Vec<LogStream>,
    pub(crate) index: HashMap<String, usize>,
    pub(crate) active: Option<usize>,
    pub(crate) summary: TriageSummary,
}

impl TriageState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn streams(&self) -> &[LogStream] {
        &self.streams
    }

    pub fn stream(&self, name: &str) -> Option<&LogStream> {
        self.index.get(name).map(|&idx| &self.streams[idx])
    }

    pub fn active(&self) -> Option<&LogStream> {
        self.active.map(|idx| &self.streams[idx])
    }

    /// A stage marker names `name`: create its stream if needed and route
    /// subsequent content to it.
    pub fn on_stage(&mut self, name: &str) {
        let idx = match self.index.get(name) {
            Some(&idx) => {
                let stream = &mut self.streams[idx];
                if stream.status == StreamStatus::Discarded {
                    // re-run of a discarded test starts over in its old slot
                    *stream = LogStream::new(name);
                }
                idx
            }
            None => {
                let idx = self.streams.len();
                self.streams.push(LogStream::new(name));
                self.index.insert(name.to_string(), idx);
                idx
            }
        };
        self.active = Some(idx);
    }

    /// Route one plain content line to the active stream.
    pub fn on_content(&mut self, line: &[u8], rules: &CompiledRules) {
        let Some(idx) = self.active else {
            return;
        };
        if is_blank(line) {
            return;
        }

        let stream = &mut self.streams[idx];
        if mute::decide(&mut stream.mute, line, rules).is_dropped() {
            self.summary.lines_muted += 1;
            return;
        }

        let line = if line.len() > rules.truncate_over {
            self.summary.lines_truncated += 1;
            let mut cut = Vec::with_capacity(rules.truncate_to + ELLIPSIS.len());
            cut.extend_from_slice(&line[..rules.truncate_to]);
            cut.extend_from_slice(ELLIPSIS);
            Cow::Owned(cut)
        } else {
            Cow::Borrowed(line)
        };

        stream.push_line(&highlight::render(&line, rules));
    }
}

// Unicode-aware: vertical tab and NBSP-only lines are blank too.
fn is_blank(line: &[u8]) -> bool {
    String::from_utf8_lossy(line).trim().is_empty()
}
