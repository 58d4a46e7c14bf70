mod common;

use std::sync::Arc;

use citriage_core::api::{MutePair, Outcome, TriageEngine, TriageRules};
use common::plain_engine;

#[test]
fn unresolved_tests_are_never_reported_by_default() {
    let log = "=== RUN   TestHang\nwaiting...\npanic: test timed out after 10m0s\n";
    let report = plain_engine().run(log.as_bytes()).unwrap();
    assert!(report.is_empty());
    assert_eq!(report.summary.unresolved, 1);

    let report = plain_engine()
        .include_unresolved(true)
        .run(log.as_bytes())
        .unwrap();
    assert_eq!(report.tests[0].outcome, Outcome::Unresolved);
    assert_eq!(
        report.tests[0].output_lossy(),
        "waiting...\npanic: test timed out after 10m0s\n"
    );
}

#[test]
fn skipped_tests_are_discarded() {
    let log = "=== RUN   TestSkip\n    skip_test.go:3: not on CI\n--- SKIP: TestSkip (0.00s)\n";
    assert!(plain_engine().run(log.as_bytes()).unwrap().is_empty());
}

#[test]
fn content_after_result_is_dropped_until_next_stage() {
    let log = "\
=== RUN   TestA
a
--- FAIL: TestA (0.00s)
FAIL
exit status 1
=== RUN   TestB
b
--- FAIL: TestB (0.00s)
";
    let report = plain_engine().run(log.as_bytes()).unwrap();
    assert_eq!(report.tests[0].output_lossy(), "a\n--- FAIL: TestA (0.00s)\n");
    assert_eq!(report.tests[1].output_lossy(), "b\n--- FAIL: TestB (0.00s)\n");
}

#[test]
fn rerun_after_pass_starts_fresh_in_the_old_slot() {
    let log = "\
=== RUN   TestFlaky
first
--- PASS: TestFlaky (0.00s)
=== RUN   TestOther
--- FAIL: TestOther (0.00s)
=== RUN   TestFlaky
second
--- FAIL: TestFlaky (0.00s)
";
    let report = plain_engine().run(log.as_bytes()).unwrap();
    assert_eq!(report.names(), vec!["TestFlaky", "TestOther"]);
    assert_eq!(
        report.tests[0].output_lossy(),
        "second\n--- FAIL: TestFlaky (0.00s)\n"
    );
}

#[test]
fn mute_region_spans_lines_and_resumes() {
    let rules = TriageRules {
        mute_lines: Vec::new(),
        mute_pairs: vec![MutePair::new("-----BEGIN DUMP", "-----END DUMP")],
        highlights: Vec::new(),
        ..TriageRules::default()
    };
    let engine = TriageEngine::new(Arc::new(rules.compile(true).unwrap()));
    let log = "\
=== RUN   TestDump
before
-----BEGIN DUMP-----
secret 1

secret 2
-----END DUMP-----
after
--- FAIL: TestDump (0.00s)
";
    let report = engine.run(log.as_bytes()).unwrap();
    assert_eq!(
        report.tests[0].output_lossy(),
        "before\nafter\n--- FAIL: TestDump (0.00s)\n"
    );
    assert_eq!(report.summary.lines_muted, 4);
}

#[test]
fn mute_state_is_per_stream() {
    let log = "\
=== RUN   TestA
<!DOCTYPE html>
=== RUN   TestB
visible in b
=== NAME  TestA
still muted
</html>
visible in a
--- FAIL: TestA (0.00s)
--- FAIL: TestB (0.00s)
";
    let report = plain_engine().run(log.as_bytes()).unwrap();
    assert_eq!(
        report.get("TestA").unwrap().output_lossy(),
        "visible in a\n--- FAIL: TestA (0.00s)\n"
    );
    assert_eq!(
        report.get("TestB").unwrap().output_lossy(),
        "visible in b\n--- FAIL: TestB (0.00s)\n"
    );
}

#[test]
fn invalid_utf8_is_carried_through() {
    let mut log = b"=== RUN   TestBin\n".to_vec();
    log.extend_from_slice(b"raw \xff\xfe bytes\n--- FAIL: TestBin (0.00s)\n");
    let report = plain_engine().run(log.as_slice()).unwrap();
    assert!(report.tests[0].output.starts_with(b"raw \xff\xfe bytes\n"));
}
