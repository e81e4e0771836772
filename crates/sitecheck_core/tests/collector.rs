use std::time::Duration;

use pretty_assertions::assert_eq;
use sitecheck_core::{
    CollectError, ConfigError, Disposition, FailureKind, Job, ProbeConfig, ProbeOutcome,
    ResultCollector,
};

fn finished(url: &str, max_attempts: u32, successes: u32) -> Job {
    let mut job = Job::new(url);
    for attempt in 0..max_attempts {
        let outcome = if attempt < successes {
            ProbeOutcome::success(200)
        } else {
            ProbeOutcome::failure(FailureKind::Timeout, url)
        };
        job = match job.into_disposition(max_attempts) {
            Disposition::Active(active) => active.record(&outcome),
            Disposition::Exhausted(_) => unreachable!(),
        };
    }
    job
}

#[test]
fn collector_completes_after_expected_jobs() {
    let mut collector = ResultCollector::new(2, 3);
    assert_eq!(collector.remaining(), 2);
    assert!(!collector.is_complete());

    let report = collector.accept(finished("http://b.example", 3, 2)).unwrap();
    assert_eq!(report.url, "http://b.example");
    assert_eq!(report.success_count, 2);
    assert!((report.success_ratio() - 2.0 / 3.0).abs() < f64::EPSILON);

    collector.accept(finished("http://a.example", 3, 0)).unwrap();
    assert!(collector.is_complete());
    assert_eq!(collector.received(), 2);

    let run = collector.finish(Duration::from_millis(1500));
    assert_eq!(run.len(), 2);
    // Arrival order is kept.
    assert_eq!(run.results[0].url, "http://b.example");
    assert_eq!(run.total_successes(), 2);
    assert_eq!(run.total_attempts(), 6);
    assert_eq!(run.elapsed, Duration::from_millis(1500));
    assert_eq!(run.find("http://a.example").unwrap().errors.len(), 3);
    assert!(!run.find("http://a.example").unwrap().is_healthy());
}

#[test]
fn collector_rejects_unfinished_job() {
    let mut collector = ResultCollector::new(1, 3);
    let err = collector.accept(finished("http://a.example", 2, 1)).unwrap_err();
    assert_eq!(
        err,
        CollectError::Unfinished {
            url: "http://a.example".to_string(),
            try_count: 2,
            max_attempts: 3,
        }
    );
    assert_eq!(collector.remaining(), 1);
}

#[test]
fn collector_rejects_jobs_beyond_expected() {
    let mut collector = ResultCollector::new(1, 1);
    collector.accept(finished("http://a.example", 1, 1)).unwrap();
    let err = collector.accept(finished("http://b.example", 1, 1)).unwrap_err();
    assert!(matches!(err, CollectError::Overflow { expected: 1, .. }));
}

#[test]
fn empty_collector_is_complete_immediately() {
    let collector = ResultCollector::new(0, 3);
    assert!(collector.is_complete());
    assert!(collector.finish(Duration::ZERO).is_empty());
}

#[test]
fn default_config_matches_cli_defaults() {
    let config = ProbeConfig::default();
    assert_eq!(config.max_attempts, 3);
    assert_eq!(config.request_timeout_secs, 5);
    assert_eq!(config.worker_count, 3);
    assert_eq!(config.request_timeout(), Duration::from_secs(5));
    assert_eq!(config.validate(), Ok(()));
}

#[test]
fn config_rejects_zero_values() {
    let zero_attempts = ProbeConfig {
        max_attempts: 0,
        ..ProbeConfig::default()
    };
    assert_eq!(zero_attempts.validate(), Err(ConfigError::ZeroAttempts));

    let zero_timeout = ProbeConfig {
        request_timeout_secs: 0,
        ..ProbeConfig::default()
    };
    assert_eq!(zero_timeout.validate(), Err(ConfigError::ZeroTimeout));

    let zero_workers = ProbeConfig {
        worker_count: 0,
        ..ProbeConfig::default()
    };
    assert_eq!(zero_workers.validate(), Err(ConfigError::ZeroWorkers));
}

#[test]
fn config_fills_missing_fields_from_defaults() {
    let config: ProbeConfig = ron::from_str("(max_attempts: 5, user_agents: [\"probe/1\"])")
        .expect("valid ron");
    assert_eq!(config.max_attempts, 5);
    assert_eq!(config.worker_count, 3);
    assert_eq!(config.user_agents, vec!["probe/1".to_string()]);
}
