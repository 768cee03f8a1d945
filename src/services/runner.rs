//! Bounded retry around one insurer's navigation sequence.

use std::future::Future;
use std::time::Duration;

use crate::config::Config;
use crate::error::EligibilityError;
use crate::models::EligibilityResult;

/// Retry behavior for a verification run, passed in explicitly.
///
/// The baseline matches the portals' observed flakiness tolerance: two
/// attempts, no backoff, no page reset between attempts.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            backoff: Duration::ZERO,
        }
    }
}

impl RetryPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_attempts: config.retry_max.max(1),
            backoff: Duration::from_millis(config.retry_backoff_ms),
        }
    }
}

/// Runs `attempt` until it succeeds or the policy is exhausted.
///
/// Fatal errors (browser setup, validation, inactive adapter) abort
/// immediately. Transient errors consume one attempt each; when the last
/// attempt fails the caller receives `AttemptsExhausted` carrying the
/// final error — never a silent drop.
pub async fn run_with_retry<F, Fut>(
    policy: &RetryPolicy,
    mut attempt: F,
) -> Result<EligibilityResult, EligibilityError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<EligibilityResult, EligibilityError>>,
{
    let mut last_error = None;

    for ordinal in 1..=policy.max_attempts {
        tracing::info!("🔁 Attempt {}/{}", ordinal, policy.max_attempts);

        match attempt(ordinal).await {
            Ok(result) => return Ok(result),
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                tracing::error!("❌ Attempt {} failed: {}", ordinal, e);
                last_error = Some(e);

                if ordinal < policy.max_attempts && !policy.backoff.is_zero() {
                    tokio::time::sleep(policy.backoff).await;
                }
            }
        }
    }

    Err(EligibilityError::AttemptsExhausted {
        attempts: policy.max_attempts,
        last: Box::new(
            last_error
                .unwrap_or_else(|| EligibilityError::Navigation("no attempts executed".into())),
        ),
    })
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::models::EligibilityResult;

    fn sample_result() -> EligibilityResult {
        EligibilityResult::skipped("784199012345671", "stub")
    }

    #[tokio::test]
    async fn returns_second_attempt_result_after_transient_failure() {
        let opened = Arc::new(AtomicU32::new(0));
        let released = Arc::new(AtomicU32::new(0));
        let policy = RetryPolicy::default();

        let (o, r) = (opened.clone(), released.clone());
        let result = run_with_retry(&policy, move |ordinal| {
            let (o, r) = (o.clone(), r.clone());
            async move {
                o.fetch_add(1, Ordering::SeqCst);
                // Each attempt releases its browser exactly once, on every
                // path, mirroring the adapter session structure.
                let outcome = if ordinal == 1 {
                    Err(EligibilityError::Navigation("locator missing".into()))
                } else {
                    Ok(sample_result())
                };
                r.fetch_add(1, Ordering::SeqCst);
                outcome
            }
        })
        .await;

        assert!(result.is_ok());
        assert_eq!(opened.load(Ordering::SeqCst), 2);
        assert_eq!(released.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn surfaces_extraction_failure_with_single_release() {
        let released = Arc::new(AtomicU32::new(0));
        let policy = RetryPolicy {
            max_attempts: 1,
            backoff: Duration::ZERO,
        };

        let r = released.clone();
        let result = run_with_retry(&policy, move |_| {
            let r = r.clone();
            async move {
                let outcome = Err(EligibilityError::Extraction("field missing".into()));
                r.fetch_add(1, Ordering::SeqCst);
                outcome
            }
        })
        .await;

        assert_eq!(released.load(Ordering::SeqCst), 1);
        match result {
            Err(EligibilityError::AttemptsExhausted { attempts, last }) => {
                assert_eq!(attempts, 1);
                assert!(matches!(*last, EligibilityError::Extraction(_)));
            }
            other => panic!("expected AttemptsExhausted, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn exhaustion_reports_attempt_count_and_last_error() {
        let calls = Arc::new(AtomicU32::new(0));
        let policy = RetryPolicy::default();

        let c = calls.clone();
        let result = run_with_retry(&policy, move |_| {
            let c = c.clone();
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err(EligibilityError::Timeout("result container".into()))
            }
        })
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        match result {
            Err(EligibilityError::AttemptsExhausted { attempts, last }) => {
                assert_eq!(attempts, 2);
                assert!(matches!(*last, EligibilityError::Timeout(_)));
            }
            other => panic!("expected AttemptsExhausted, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn fatal_setup_error_consumes_no_further_attempts() {
        let calls = Arc::new(AtomicU32::new(0));
        let policy = RetryPolicy::default();

        let c = calls.clone();
        let result = run_with_retry(&policy, move |_| {
            let c = c.clone();
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err(EligibilityError::BrowserSetup("chrome not found".into()))
            }
        })
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(result, Err(EligibilityError::BrowserSetup(_))));
    }

    #[tokio::test]
    async fn backoff_waits_between_attempts() {
        let policy = RetryPolicy {
            max_attempts: 2,
            backoff: Duration::from_millis(50),
        };

        let start = tokio::time::Instant::now();
        let _ = run_with_retry(&policy, |_| async {
            Err(EligibilityError::Navigation("flaky".into()))
        })
        .await;

        assert!(start.elapsed() >= Duration::from_millis(50));
    }
}
