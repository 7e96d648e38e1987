//! Tests for the retry loop.

use super::*;
use std::cell::Cell;
use std::error::Error as _;
use std::fmt;

#[derive(Debug, PartialEq, Eq)]
enum TestError {
    Flaky(u32),
    Fatal(&'static str),
}

impl fmt::Display for TestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestError::Flaky(n) => write!(f, "flaky #{}", n),
            TestError::Fatal(why) => write!(f, "fatal: {}", why),
        }
    }
}

impl std::error::Error for TestError {}

fn is_flaky(e: &TestError) -> bool {
    matches!(e, TestError::Flaky(_))
}

fn always_transient(_: &TestError) -> bool {
    true
}

fn policy(max_attempts: u32) -> RetryPolicy {
    RetryPolicy::new(max_attempts, Duration::ZERO).unwrap()
}

#[test]
fn always_failing_op_runs_exactly_max_attempts_times() {
    for n in 2..=6 {
        let calls = Cell::new(0u32);
        let result: Result<u32, _> = policy(n).execute_function(
            || {
                calls.set(calls.get() + 1);
                Err(TestError::Flaky(calls.get()))
            },
            &always_transient,
        );
        assert_eq!(calls.get(), n);
        let err = result.unwrap_err();
        assert!(err.is_exhausted());
        match err {
            RetryError::Exhausted(x) => {
                assert_eq!(x.max_attempts(), n);
                assert_eq!(x.history().len(), n as usize);
                let attempts: Vec<u32> = x.history().iter().map(|a| a.attempt).collect();
                assert_eq!(attempts, (1..=n).collect::<Vec<_>>());
                assert_eq!(x.last_error(), Some(&TestError::Flaky(n)));
            }
            other => panic!("expected Exhausted, got {:?}", other),
        }
    }
}

#[test]
fn non_transient_error_is_returned_unchanged_without_waiting() {
    let p = RetryPolicy::new(5, Duration::from_secs(10)).unwrap();
    let calls = Cell::new(0u32);
    let started = Instant::now();
    let result = p.execute_action(
        || {
            calls.set(calls.get() + 1);
            Err(TestError::Fatal("constraint violation"))
        },
        &is_flaky,
    );
    assert!(started.elapsed() < Duration::from_secs(1));
    assert_eq!(calls.get(), 1);
    let err = result.unwrap_err();
    assert!(err.is_non_transient());
    assert!(err.history().is_empty());
    assert_eq!(err.into_inner(), Some(TestError::Fatal("constraint violation")));
}

#[test]
fn non_transient_after_transient_still_fails_fast() {
    let calls = Cell::new(0u32);
    let result: Result<(), _> = policy(5).execute_action(
        || {
            calls.set(calls.get() + 1);
            if calls.get() < 3 {
                Err(TestError::Flaky(calls.get()))
            } else {
                Err(TestError::Fatal("boom"))
            }
        },
        &is_flaky,
    );
    assert_eq!(calls.get(), 3);
    match result.unwrap_err() {
        RetryError::NonTransient(e) => assert_eq!(e, TestError::Fatal("boom")),
        other => panic!("expected NonTransient, got {:?}", other),
    }
}

#[test]
fn succeeds_after_k_transient_failures() {
    let calls = Cell::new(0u32);
    let value = policy(4)
        .execute_function(
            || {
                calls.set(calls.get() + 1);
                if calls.get() <= 3 {
                    Err(TestError::Flaky(calls.get()))
                } else {
                    Ok("done")
                }
            },
            &is_flaky,
        )
        .unwrap();
    assert_eq!(value, "done");
    assert_eq!(calls.get(), 4);
}

#[test]
fn success_on_first_call_does_not_wait() {
    let p = RetryPolicy::new(3, Duration::from_secs(10)).unwrap();
    let started = Instant::now();
    p.execute_action(|| Ok::<(), TestError>(()), &always_transient)
        .unwrap();
    assert!(started.elapsed() < Duration::from_secs(1));
}

#[test]
fn waits_between_attempts() {
    let p = RetryPolicy::new(3, Duration::from_millis(20)).unwrap();
    let started = Instant::now();
    let err = p
        .execute_action(|| Err(TestError::Flaky(0)), &always_transient)
        .unwrap_err();
    assert!(err.is_exhausted());
    // Two waits: after attempts 1 and 2, none after the last.
    assert!(started.elapsed() >= Duration::from_millis(40));
}

#[test]
fn history_is_fresh_for_each_call() {
    let p = policy(3);
    let first = p
        .execute_action(|| Err(TestError::Flaky(1)), &always_transient)
        .unwrap_err();
    let second = p
        .execute_action(|| Err(TestError::Flaky(2)), &always_transient)
        .unwrap_err();
    assert_eq!(first.history().len(), 3);
    assert_eq!(second.history().len(), 3);
    assert!(second
        .history()
        .iter()
        .all(|a| a.error == TestError::Flaky(2)));
}

#[test]
fn exhausted_error_reports_limit_and_source() {
    let err = policy(2)
        .execute_action(|| Err(TestError::Flaky(7)), &always_transient)
        .unwrap_err();
    assert_eq!(err.to_string(), "operation retry limit '2' exceeded");
    let source = std::error::Error::source(&err).unwrap();
    assert_eq!(source.to_string(), "operation retry limit '2' exceeded");
    assert_eq!(source.source().unwrap().to_string(), "flaky #7");
}

#[test]
fn abort_before_first_attempt() {
    let abort = AtomicBool::new(true);
    let calls = Cell::new(0u32);
    let err = policy(3)
        .execute_function_with_abort(
            || {
                calls.set(calls.get() + 1);
                Ok::<u32, TestError>(1)
            },
            &always_transient,
            &abort,
        )
        .unwrap_err();
    assert_eq!(calls.get(), 0);
    assert!(err.is_aborted());
    assert!(err.history().is_empty());
}

#[test]
fn abort_interrupts_wait() {
    let p = RetryPolicy::new(5, Duration::from_secs(30)).unwrap();
    let abort = AtomicBool::new(false);
    let started = Instant::now();
    let err = p
        .execute_action_with_abort(
            || {
                abort.store(true, Ordering::Relaxed);
                Err(TestError::Flaky(1))
            },
            &always_transient,
            &abort,
        )
        .unwrap_err();
    assert!(started.elapsed() < Duration::from_secs(5));
    assert!(err.is_aborted());
    assert_eq!(err.history().len(), 1);
    assert_eq!(err.to_string(), "operation aborted after 1 failed attempt(s)");
}

#[test]
fn unset_abort_token_behaves_like_plain_execute() {
    let abort = AtomicBool::new(false);
    let calls = Cell::new(0u32);
    let value = policy(3)
        .execute_function_with_abort(
            || {
                calls.set(calls.get() + 1);
                if calls.get() == 1 {
                    Err(TestError::Flaky(1))
                } else {
                    Ok(42)
                }
            },
            &is_flaky,
            &abort,
        )
        .unwrap();
    assert_eq!(value, 42);
    assert_eq!(calls.get(), 2);
}

#[test]
fn one_policy_shared_across_threads() {
    let p = policy(3);
    std::thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|| {
                let err = p
                    .execute_action(|| Err(TestError::Flaky(0)), &always_transient)
                    .unwrap_err();
                assert_eq!(err.history().len(), 3);
            });
        }
    });
}

#[test]
fn wait_without_representable_deadline_still_honours_abort() {
    let token = AtomicBool::new(true);
    assert!(wait(Duration::MAX, Some(&token)));

    let token = AtomicBool::new(false);
    let started = Instant::now();
    let aborted = std::thread::scope(|s| {
        s.spawn(|| {
            std::thread::sleep(Duration::from_millis(100));
            token.store(true, Ordering::Relaxed);
        });
        wait(Duration::MAX, Some(&token))
    });
    assert!(aborted);
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[test]
fn longest_accepted_wait_is_cut_short_by_abort() {
    let p = RetryPolicy::new(2, RetryPolicy::MAX_WAIT_INTERVAL).unwrap();
    let abort = AtomicBool::new(false);
    let started = Instant::now();
    let err = p
        .execute_function_with_abort(
            || {
                abort.store(true, Ordering::Relaxed);
                Err::<u32, _>(TestError::Flaky(1))
            },
            &always_transient,
            &abort,
        )
        .unwrap_err();
    assert!(err.is_aborted());
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[test]
fn unbounded_waits_never_reach_the_loop() {
    use crate::config::RetryConfig;
    use crate::retry::PolicyError;

    for wait in [Duration::MAX, Duration::from_secs(u64::MAX / 2)] {
        assert!(matches!(
            RetryPolicy::new(2, wait),
            Err(PolicyError::WaitIntervalTooLong { .. })
        ));
    }
    for secs in [f64::INFINITY, 1e300] {
        let cfg = RetryConfig {
            max_attempts: 2,
            wait_interval_secs: secs,
        };
        assert!(cfg.to_policy().is_err(), "{} accepted", secs);
    }
}
