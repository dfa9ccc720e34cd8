//! Retry-with-backoff wrapper for transient storage failures.
//!
//! Only errors the storage adapter classified as transient
//! ([`AppError::TransientStore`]) are retried; everything else surfaces
//! immediately. Holds no shared state, so concurrent invocations are
//! independent.

use crate::errors::{AppError, AppResult};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Retries after the first attempt (3 → up to 4 attempts total).
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_millis(2000),
        }
    }
}

/// Run `op`, retrying transient failures with doubling delays capped at
/// `policy.max_delay`. Once retries are exhausted the transient error is
/// surfaced as [`AppError::StoreUnavailable`].
pub fn run<T, F>(policy: &RetryPolicy, mut op: F) -> AppResult<T>
where
    F: FnMut() -> AppResult<T>,
{
    let mut delay = policy.initial_delay;
    let mut attempt: u32 = 1;

    loop {
        match op() {
            Ok(value) => return Ok(value),
            Err(err) if err.is_transient() && attempt <= policy.max_retries => {
                thread::sleep(delay);
                delay = (delay * 2).min(policy.max_delay);
                attempt += 1;
            }
            Err(AppError::TransientStore(reason)) => {
                return Err(AppError::StoreUnavailable {
                    attempts: attempt,
                    reason,
                });
            }
            Err(err) => return Err(err),
        }
    }
}
