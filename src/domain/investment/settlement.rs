//! Settlement seam: the collaborator that turns a confirmed investment into
//! a transaction id, plus the retry loop around it.

use crate::domain::catalog::ListingId;
use crate::domain::errors::{ConfigurationError, SettlementError};
use crate::domain::investment::state::TransactionId;
use futures::future::{Either, LocalBoxFuture, select};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Source of delays. Production code sleeps on the browser clock; tests
/// resolve immediately.
pub trait Timer {
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()>;
}

/// Everything the gateway needs to settle one confirmation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementOrder {
    /// Same for every attempt of one confirmation
    pub idempotency_key: String,
    pub listing: ListingId,
    pub amount: f64,
    pub tokens: u64,
    pub wallet_address: String,
    pub network: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementReceipt {
    pub transaction_id: TransactionId,
    pub idempotency_key: String,
}

pub trait SettlementGateway {
    /// Submit one attempt. `attempt` starts at 1.
    fn submit(
        &mut self,
        order: &SettlementOrder,
        attempt: u32,
    ) -> LocalBoxFuture<'_, Result<SettlementReceipt, SettlementError>>;
}

/// Bounded exponential backoff between settlement attempts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub multiplier: f64,
    pub max_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 500,
            multiplier: 2.0,
            max_delay_ms: 4_000,
        }
    }
}

impl RetryPolicy {
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.max_attempts == 0 {
            return Err(ConfigurationError::InvalidParameter("retry.maxAttempts must be at least 1".into()));
        }
        if !self.multiplier.is_finite() || self.multiplier < 1.0 {
            return Err(ConfigurationError::InvalidParameter("retry.multiplier must be >= 1".into()));
        }
        if self.base_delay_ms > self.max_delay_ms {
            return Err(ConfigurationError::InvalidParameter("retry.baseDelayMs exceeds retry.maxDelayMs".into()));
        }
        Ok(())
    }

    /// Delay after failed attempt number `attempt` (1-based)
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(32) as i32;
        let raw = self.base_delay_ms as f64 * self.multiplier.powi(exponent);
        let capped = raw.min(self.max_delay_ms as f64).max(0.0);
        Duration::from_millis(capped as u64)
    }
}

/// Result of the retry loop: what happened and how many attempts it took
#[derive(Debug, Clone, PartialEq)]
pub struct SettlementReport {
    pub result: Result<SettlementReceipt, SettlementError>,
    pub attempts: u32,
}

/// Drive `gateway` until it settles, fails permanently, or the policy runs
/// out of attempts. Each attempt races `attempt_timeout` on `timer`.
pub async fn settle_with_retry<G, T, F>(
    gateway: &mut G,
    timer: &T,
    order: &SettlementOrder,
    policy: &RetryPolicy,
    attempt_timeout: Duration,
    mut on_failure: F,
) -> SettlementReport
where
    G: SettlementGateway + ?Sized,
    T: Timer + ?Sized,
    F: FnMut(u32, &SettlementError),
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        let outcome = {
            let submission = gateway.submit(order, attempt);
            let deadline = timer.sleep(attempt_timeout);
            match select(submission, deadline).await {
                Either::Left((result, _)) => result,
                Either::Right(((), _)) => Err(SettlementError::Timeout(attempt)),
            }
        };

        match outcome {
            Ok(receipt) => {
                return SettlementReport {
                    result: Ok(receipt),
                    attempts: attempt,
                };
            }
            Err(error) => {
                on_failure(attempt, &error);
                if !error.is_retryable() || attempt >= max_attempts {
                    return SettlementReport {
                        result: Err(error),
                        attempts: attempt,
                    };
                }
                timer.sleep(policy.delay_after(attempt)).await;
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_up_to_the_cap() {
        let policy = RetryPolicy::default();
        let delays: Vec<u64> = (1..=5).map(|n| policy.delay_after(n).as_millis() as u64).collect();
        assert_eq!(delays, vec![500, 1_000, 2_000, 4_000, 4_000]);
    }

    #[test]
    fn zero_attempts_is_rejected() {
        let policy = RetryPolicy {
            max_attempts: 0,
            ..RetryPolicy::default()
        };
        assert!(policy.validate().is_err());
        assert!(RetryPolicy::no_retry().validate().is_ok());
    }
}
