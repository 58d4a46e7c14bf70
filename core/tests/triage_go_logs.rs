mod common;

use citriage_core::api::{render_report, ReportMarkers, StepLogKey};
use citriage_core::archive::triage_step_log;
use common::{color_engine, plain_engine, write_archive, GO_STEP_LOG};
use pretty_assertions::assert_eq;

#[test]
fn keeps_only_failed_tests_in_first_seen_order() {
    let report = plain_engine().run(GO_STEP_LOG.as_bytes()).unwrap();

    // TestProxy was seen before TestUpload, even though it failed later
    assert_eq!(
        report.names(),
        vec!["TestProxy", "TestUpload", "TestUpload/large"]
    );
    assert!(report.get("TestHealthz").is_none());
    assert!(report.get("TestUpload/small").is_none());
    assert_eq!(report.summary.tests_seen, 5);
    assert_eq!(report.summary.discarded, 2);
}

#[test]
fn mutes_noise_and_html_dump() {
    let report = plain_engine().run(GO_STEP_LOG.as_bytes()).unwrap();
    assert_eq!(
        report.get("TestProxy").unwrap().output_lossy(),
        "    proxy_test.go:30: calling upstream\n\
         \x20   proxy_test.go:41: unexpected status 502\n\
         --- FAIL: TestProxy (0.20s)\n"
    );
}

#[test]
fn content_lands_in_the_stage_that_was_active() {
    let report = plain_engine().run(GO_STEP_LOG.as_bytes()).unwrap();
    let large = report.get("TestUpload/large").unwrap().output_lossy();
    assert!(large.contains("upload_test.go:88: uploading 4096 bytes"));
    assert!(large.contains("Error:      \tNot equal: 200 != 413"));
    assert!(large.ends_with("--- FAIL: TestUpload/large (0.01s)\n"));

    // the parent only gets its own result line
    assert_eq!(
        report.get("TestUpload").unwrap().output_lossy(),
        "--- FAIL: TestUpload (0.03s)\n"
    );
}

#[test]
fn highlights_diagnostic_lines() {
    let engine = color_engine();
    let report = engine.run(GO_STEP_LOG.as_bytes()).unwrap();
    let large = &report.get("TestUpload/large").unwrap().output;
    let reset = engine.rules().reset_marker();

    let lines: Vec<&[u8]> = large.split(|&b| b == b'\n').collect();
    let trace = lines.iter().find(|l| l.windows(11).any(|w| w == b"Error Trace")).unwrap();
    assert!(trace.starts_with(engine.rules().highlight_marker(1).unwrap()));
    assert!(trace.ends_with(reset));

    let error = lines.iter().find(|l| l.windows(9).any(|w| w == b"Not equal")).unwrap();
    assert!(error.starts_with(engine.rules().highlight_marker(0).unwrap()));

    let plain = lines.iter().find(|l| l.windows(9).any(|w| w == b"uploading")).unwrap();
    assert!(!plain.ends_with(reset));
}

#[test]
fn renders_report_blocks() {
    let report = plain_engine().run(GO_STEP_LOG.as_bytes()).unwrap();
    let mut out = Vec::new();
    render_report(&report, &ReportMarkers::ascii(), &mut out).unwrap();
    let out = String::from_utf8(out).unwrap();

    assert!(out.starts_with("[FAIL] Test TestProxy\n"));
    assert_eq!(out.matches("[FAIL] Test ").count(), 3);
    assert!(out.ends_with("--- FAIL: TestUpload/large (0.01s)\n\n\n\n"));
}

#[test]
fn triages_a_step_inside_an_archive() {
    let tmp = tempfile::tempdir().unwrap();
    let path = write_archive(
        tmp.path(),
        &[
            ("test/1_Set up job.txt", "setup\n"),
            ("test/5_Run tests.txt", GO_STEP_LOG),
            ("lint/5_Run tests.txt", "=== RUN   X\n--- FAIL: X\n"),
        ],
    );

    let report = triage_step_log(&path, &StepLogKey::new("test", 5), &plain_engine()).unwrap();
    assert_eq!(report.tests.len(), 3);

    let err = triage_step_log(&path, &StepLogKey::new("test", 9), &plain_engine()).unwrap_err();
    assert!(err.is_not_found());
}
