//! Retry executor behavior: backoff counts, classification, exhaustion.

use shiftlog::core::retry::{self, RetryPolicy};
use shiftlog::errors::AppError;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, Instant};

fn policy(max_retries: u32) -> RetryPolicy {
    RetryPolicy {
        max_retries,
        initial_delay: Duration::from_millis(10),
        max_delay: Duration::from_millis(40),
    }
}

#[test]
fn transient_failures_are_retried_until_success() {
    let calls = AtomicU32::new(0);
    let started = Instant::now();

    let result = retry::run(&policy(3), || {
        let n = calls.fetch_add(1, Ordering::SeqCst);
        if n < 2 {
            Err(AppError::TransientStore("database is locked".to_string()))
        } else {
            Ok(42)
        }
    });

    assert_eq!(result.unwrap(), 42);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    // Two delays: 10ms + 20ms.
    assert!(started.elapsed() >= Duration::from_millis(30));
}

#[test]
fn permanent_errors_fail_immediately() {
    let calls = AtomicU32::new(0);
    let started = Instant::now();

    let result: Result<(), _> = retry::run(&policy(3), || {
        calls.fetch_add(1, Ordering::SeqCst);
        Err(AppError::LocationRequired)
    });

    assert!(matches!(result, Err(AppError::LocationRequired)));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(started.elapsed() < Duration::from_millis(10));
}

#[test]
fn exhausted_retries_surface_as_store_unavailable() {
    let calls = AtomicU32::new(0);

    let result: Result<(), _> = retry::run(&policy(2), || {
        calls.fetch_add(1, Ordering::SeqCst);
        Err(AppError::TransientStore("connection reset".to_string()))
    });

    // 1 initial attempt + 2 retries.
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    match result.unwrap_err() {
        AppError::StoreUnavailable { attempts, reason } => {
            assert_eq!(attempts, 3);
            assert_eq!(reason, "connection reset");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn delay_doubles_up_to_the_cap() {
    let calls = AtomicU32::new(0);
    let started = Instant::now();

    let result: Result<(), _> = retry::run(&policy(4), || {
        calls.fetch_add(1, Ordering::SeqCst);
        Err(AppError::TransientStore("busy".to_string()))
    });

    assert!(result.is_err());
    // Delays: 10 + 20 + 40 + 40 (capped) = 110ms.
    assert!(started.elapsed() >= Duration::from_millis(110));
}
