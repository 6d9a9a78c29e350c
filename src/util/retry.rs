use std::time::Duration;

use crate::util::basic::SError;

/// Bounded retry with exponential backoff, for operations that can fail
/// transiently (reading reference data files that may still be syncing,
/// for example).
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            base_delay,
        }
    }

    pub fn no_delay(max_attempts: u32) -> RetryPolicy {
        RetryPolicy::new(max_attempts, Duration::ZERO)
    }

    fn delay_for_attempt(&self, attempt: u32) -> Duration {
        // attempt is 1-based. 1 -> base, 2 -> 2x base, 3 -> 4x base, ...
        self.base_delay * 2u32.saturating_pow(attempt.saturating_sub(1))
    }
}

pub fn run_with_retries<T, F>(policy: &RetryPolicy, mut f: F) -> Result<T, SError>
where
    F: FnMut() -> Result<T, SError>,
{
    let attempts = std::cmp::max(policy.max_attempts, 1);
    let mut last_err: SError = "retry ran zero attempts".to_string();
    for attempt in 1..=attempts {
        match f() {
            Ok(v) => return Ok(v),
            Err(e) => {
                tracing::debug!("attempt {attempt} of {attempts} failed: {e}");
                last_err = e;
                if attempt < attempts {
                    std::thread::sleep(policy.delay_for_attempt(attempt));
                }
            }
        }
    }
    Err(last_err)
}
