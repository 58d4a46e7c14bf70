//! Failed-test triage over verbose test-runner logs.
//!
//! A single pass reads the log line by line, routes content to one buffer per
//! test, drops known noise, highlights diagnostic keywords and finally keeps
//! only the buffers of tests whose result marker reports a failure.

mod classify;
mod collect;
mod demux;
mod engine;
mod highlight;
mod mute;
mod report;
mod rules;

pub use classify::{
    classify_line, parse_result, stage_name, strip_timestamp, LineKind, ResultMarker,
};
pub use demux::{LogStream, StreamStatus, TriageState, TriageSummary};
pub use engine::{TriageEngine, TriagePass};
pub use mute::{MuteDecision, MuteState};
pub use report::{render_report, FailedTest, Outcome, ReportMarkers, TriageReport};
pub use rules::{CompiledRules, HighlightRule, MutePair, TriageRules};
