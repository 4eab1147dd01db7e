// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Property-based tests for testmark-runners
//!
//! These tests use proptest to check that parsing only ever inserts lines,
//! that a second pass over augmented output changes nothing, and that no
//! input makes a parser panic.

use proptest::prelude::*;

use testmark_runners::{RunnerKind, nose, pytest};

const SESSION_BANNER: &str =
    "============================= test session starts ==============================";
const ERRORS_BANNER: &str =
    "==================================== ERRORS ====================================";
const FAILURES_BANNER: &str =
    "=================================== FAILURES ===================================";
const SUMMARY_BANNER: &str =
    "==================== 2 failed, 1 passed, 1 error in 0.21 seconds ====================";
const NOSE_BANNER: &str = "======================================================================";

// ============================================================================
// Strategies
// ============================================================================

/// Lines that show up inside runner reports, plus arbitrary filler
///
/// None of them is a `==` section banner, so pytest keeps every line.
fn report_line() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just("    ".to_string()),
        Just("_________________________________ test_myfunc __________________________________".to_string()),
        Just("__________________ ERROR collecting tests/test_something.py ___________________".to_string()),
        Just("________________ ERROR at setup of TestSomething.test_something ________________".to_string()),
        Just("_______________________________ ERROR collecting  _______________________________".to_string()),
        Just("tests/test_assertion.py:283: in test_assert_false".to_string()),
        Just("tests/conftest.py:26:  def session_fixture(db)".to_string()),
        Just("E   assert False".to_string()),
        Just("E   NameError: name 'unknown' is not defined".to_string()),
        Just("E   _pytest.config.ConftestImportFailure: (local('/p/conftest.py'), (ImportError('x',),))".to_string()),
        Just("file /srv/app/tests/test_fixtures.py, line 12".to_string()),
        Just("        fixture 'a_fixture' not found".to_string()),
        Just("ScopeMismatch: You tried to access the function scoped fixture db".to_string()),
        Just("------------------------------ Captured stderr call ------------------------------".to_string()),
        Just("------------------------------ Captured stderr setup -----------------------------".to_string()),
        Just("----------------------------------------------------------------------".to_string()),
        Just("Traceback (most recent call last):".to_string()),
        Just(r#"  File "/application/dal.py", line 236, in _convert_to_user"#.to_string()),
        Just(r#"  File "/venv/lib/python3.4/site-packages/tornado/web.py", line 1332, in _execute"#.to_string()),
        Just("NameError: name 'blarg' is not defined".to_string()),
        Just("AssertionError".to_string()),
        Just("FAIL: test_false (tests.TestAuthentication)".to_string()),
        "[a-z ]{0,20}".prop_map(|s| s),
    ]
}

fn report_body() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec(report_line(), 0..12)
}

/// A pytest report with an optional ERRORS section, an optional FAILURES
/// section and an optional summary banner
fn pytest_report() -> impl Strategy<Value = Vec<String>> {
    (
        report_body(),
        proptest::option::of(report_body()),
        proptest::option::of(report_body()),
        any::<bool>(),
    )
        .prop_map(|(session, errors, failures, summary)| {
            let mut lines = vec![SESSION_BANNER.to_string()];
            lines.extend(session);
            if let Some(errors) = errors {
                lines.push(ERRORS_BANNER.to_string());
                lines.extend(errors);
            }
            if let Some(failures) = failures {
                lines.push(FAILURES_BANNER.to_string());
                lines.extend(failures);
            }
            if summary {
                lines.push(SUMMARY_BANNER.to_string());
            }
            lines
        })
}

/// A nose report: progress line followed by `=` delimited blocks
fn nose_report() -> impl Strategy<Value = Vec<String>> {
    (
        "[.EF]{0,30}",
        proptest::collection::vec(report_body(), 0..4),
    )
        .prop_map(|(progress, blocks)| {
            let mut lines = vec![progress];
            for block in blocks {
                lines.push(NOSE_BANNER.to_string());
                lines.extend(block);
            }
            lines
        })
}

/// Whether every line of `needle` appears in `haystack`, in order
fn is_subsequence(needle: &[String], haystack: &[String]) -> bool {
    let mut rest = haystack.iter();
    needle.iter().all(|line| rest.any(|candidate| candidate == line))
}

// ============================================================================
// pytest
// ============================================================================

proptest! {
    #[test]
    fn pytest_only_inserts_lines(input in pytest_report()) {
        let output = pytest::parse_augmented(&input);
        prop_assert!(output.len() >= input.len());
        prop_assert!(output.markers() >= output.len() - input.len());
        let lines = output.into_lines();
        prop_assert!(is_subsequence(&input, &lines));
    }

    #[test]
    fn pytest_reparse_is_stable(input in pytest_report()) {
        let once = pytest::parse(&input);
        let twice = pytest::parse(&once);
        prop_assert_eq!(twice, once);
    }

    #[test]
    fn pytest_session_failure_only_inserts_lines(input in report_body()) {
        prop_assume!(input.first().is_none_or(|first| first != SESSION_BANNER));
        let output = pytest::parse(&input);
        prop_assert!(output.len() <= input.len() + 1);
        prop_assert!(is_subsequence(&input, &output));
        prop_assert_eq!(pytest::parse(&output), output);
    }
}

// ============================================================================
// nose
// ============================================================================

proptest! {
    #[test]
    fn nose_only_inserts_lines(input in nose_report()) {
        let output = nose::parse_augmented(&input);
        prop_assert!(output.len() >= input.len());
        prop_assert!(output.markers() >= output.len() - input.len());
        let lines = output.into_lines();
        prop_assert!(is_subsequence(&input, &lines));
    }

    #[test]
    fn nose_reparse_is_stable(input in nose_report()) {
        let once = nose::parse(&input);
        let twice = nose::parse(&once);
        prop_assert_eq!(twice, once);
    }
}

// ============================================================================
// Robustness
// ============================================================================

proptest! {
    #[test]
    fn parsers_never_panic(input in proptest::collection::vec(".{0,120}", 0..40)) {
        let pytest_output = RunnerKind::Pytest.parse(&input);
        prop_assert!(input.is_empty() || !pytest_output.is_empty() || input[0].starts_with("=="));
        let nose_output = RunnerKind::Nose.parse(&input);
        prop_assert!(is_subsequence(&input, &nose_output));
    }

    #[test]
    fn empty_input_gives_empty_output(kind in prop_oneof![Just(RunnerKind::Pytest), Just(RunnerKind::Nose)]) {
        prop_assert!(kind.parse(&[]).is_empty());
    }
}
