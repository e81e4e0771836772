use pretty_assertions::assert_eq;
use sitecheck_core::{Disposition, FailureKind, Job, ProbeOutcome};

fn init_logging() {
    probe_logging::initialize_for_tests();
}

fn ok() -> ProbeOutcome {
    ProbeOutcome::success(200)
}

fn refused() -> ProbeOutcome {
    ProbeOutcome::failure(FailureKind::Connect, "http://a.example: connection refused")
}

fn bad_status(code: u16) -> ProbeOutcome {
    ProbeOutcome::failure(FailureKind::HttpStatus(code), "http://a.example")
}

/// Drives a job through the state machine the way a worker would, feeding
/// outcomes in order until it is exhausted.
fn drive(url: &str, max_attempts: u32, outcomes: &[ProbeOutcome]) -> Job {
    let mut job = Job::new(url);
    let mut script = outcomes.iter();
    loop {
        match job.into_disposition(max_attempts) {
            Disposition::Exhausted(done) => return done,
            Disposition::Active(active) => {
                let outcome = script.next().expect("script shorter than attempt budget");
                job = active.record(outcome);
            }
        }
    }
}

#[test]
fn new_job_starts_empty_and_active() {
    init_logging();
    let job = Job::new("http://a.example");
    assert_eq!(job.url(), "http://a.example");
    assert_eq!(job.success_count(), 0);
    assert_eq!(job.try_count(), 0);
    assert!(job.errors().is_empty());

    match job.into_disposition(3) {
        Disposition::Active(active) => assert_eq!(active.attempt(), 1),
        Disposition::Exhausted(_) => panic!("fresh job must be active"),
    }
}

#[test]
fn two_failures_then_success_counts_one_success() {
    init_logging();
    let job = drive("http://a.example", 3, &[refused(), refused(), ok()]);
    assert_eq!(job.success_count(), 1);
    assert_eq!(job.try_count(), 3);
    // The trailing success clears the diagnostic trail.
    assert!(job.errors().is_empty());
}

#[test]
fn always_failing_keeps_every_error() {
    init_logging();
    let job = drive("http://a.example", 3, &[refused(), refused(), refused()]);
    assert_eq!(job.success_count(), 0);
    assert_eq!(job.try_count(), 3);
    assert_eq!(job.errors().len(), 3);
    assert!(job.errors()[0].contains("connection refused"));
}

#[test]
fn bad_status_lowers_ratio_without_recording_error() {
    init_logging();
    let job = drive("http://a.example", 3, &[bad_status(503), ok(), bad_status(404)]);
    assert_eq!(job.success_count(), 1);
    assert_eq!(job.try_count(), 3);
    assert!(job.errors().is_empty());
}

#[test]
fn only_a_success_clears_recorded_errors() {
    init_logging();
    let job = drive("http://a.example", 2, &[refused(), bad_status(500)]);
    assert_eq!(job.errors().len(), 1);
    assert!(job.errors()[0].contains("connection refused"));

    let job = drive("http://a.example", 3, &[refused(), bad_status(500), ok()]);
    assert_eq!(job.success_count(), 1);
    assert!(job.errors().is_empty());
}

#[test]
fn fatal_outcome_consumes_an_attempt() {
    init_logging();
    let fatal = ProbeOutcome::fatal(FailureKind::InvalidUrl, "not a url");
    let job = drive("not a url", 2, &[fatal.clone(), fatal]);
    assert_eq!(job.try_count(), 2);
    assert_eq!(job.success_count(), 0);
    assert_eq!(
        job.errors().to_vec(),
        vec!["invalid url for not a url".to_string(); 2]
    );
}

#[test]
fn single_attempt_budget_finalizes_after_one_try() {
    init_logging();
    for outcome in [ok(), refused(), bad_status(500)] {
        let job = drive("http://a.example", 1, &[outcome]);
        assert_eq!(job.try_count(), 1);
    }
}

#[test]
fn counters_never_pass_the_budget() {
    init_logging();
    let outcomes = [ok(), refused(), bad_status(302), ok(), ok()];
    for max_attempts in 1..=5 {
        let job = drive("http://a.example", max_attempts, &outcomes);
        assert_eq!(job.try_count(), max_attempts);
        assert!(job.success_count() <= job.try_count());
        assert!(matches!(
            job.into_disposition(max_attempts),
            Disposition::Exhausted(_)
        ));
    }
}

#[test]
fn same_outcomes_give_same_job() {
    init_logging();
    let outcomes = [refused(), ok(), bad_status(500), refused()];
    let first = drive("http://a.example", 4, &outcomes);
    let second = drive("http://a.example", 4, &outcomes);
    assert_eq!(first, second);
    assert_eq!(first.errors().len(), 1);
}
