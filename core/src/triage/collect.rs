use super::classify::parse_result;
use super::demux::{StreamStatus, TriageState};
use super::report::{FailedTest, Outcome, TriageReport};

impl TriageState {
    /// Apply a normalized result marker. Malformed markers and names never
    /// seen in a stage marker are ignored.
    pub fn on_result(&mut self, line: &[u8]) {
        let Some(marker) = parse_result(line) else {
            tracing::trace!(
                target: "citriage.triage",
                line = %String::from_utf8_lossy(line),
                "ignoring malformed result marker"
            );
            return;
        };

        let name = String::from_utf8_lossy(marker.name);
        let Some(&idx) = self.index.get(&*name) else {
            tracing::trace!(target: "citriage.triage", test = %name, "result for unknown test");
            return;
        };
        let stream = &mut self.streams[idx];
        if stream.status() == StreamStatus::Discarded {
            return;
        }

        // the section is over until the next stage marker
        self.active = None;

        if !marker.failed {
            stream.discard();
            return;
        }

        stream.push_line(line);
        stream.mark_failed();
    }

    /// Consume the state and keep the failed streams, in first-seen order.
    pub fn into_report(self, include_unresolved: bool) -> TriageReport {
        let mut summary = self.summary;
        summary.tests_seen = self.streams.len();

        let mut tests = Vec::new();
        for stream in self.streams {
            let (name, output, status) = stream.into_parts();
            let outcome = match status {
                StreamStatus::Failed => {
                    summary.failed += 1;
                    Outcome::Failed
                }
                StreamStatus::Discarded => {
                    summary.discarded += 1;
                    continue;
                }
                StreamStatus::Pending => {
                    summary.unresolved += 1;
                    if !include_unresolved {
                        continue;
                    }
                    Outcome::Unresolved
                }
            };
            tests.push(FailedTest {
                name,
                output,
                outcome,
            });
        }

        TriageReport { tests, summary }
    }
}
