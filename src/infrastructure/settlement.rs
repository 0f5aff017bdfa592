use crate::domain::errors::{ConfigurationError, SettlementError};
use crate::domain::investment::{SettlementGateway, SettlementOrder, SettlementReceipt, Timer, TransactionId};
use crate::domain::logging::{LogComponent, LogEntry, LogLevel, get_logger};
use futures::FutureExt;
use futures::future::LocalBoxFuture;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// When the simulated gateway should fail an attempt
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", content = "value", rename_all = "camelCase")]
pub enum FailureInjection {
    /// Every attempt settles
    #[default]
    Never,
    /// Every attempt is unavailable
    Always,
    /// The first `n` attempts of each order are unavailable
    FirstAttempts(u32),
    /// Each attempt is unavailable with probability `p`
    Rate(f64),
    /// Every attempt is rejected outright
    Reject,
}

impl FailureInjection {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        match self {
            FailureInjection::Rate(p) if !(0.0..=1.0).contains(p) => Err(ConfigurationError::InvalidParameter(
                format!("failure rate {} must be within [0, 1]", p),
            )),
            _ => Ok(()),
        }
    }
}

/// Stand-in for a chain: waits, then hands out a random transaction hash.
///
/// Receipts are keyed by idempotency key, so resubmitting a settled order
/// returns the first receipt without waiting.
pub struct SimulatedSettlementGateway<T: Timer> {
    timer: T,
    delay: Duration,
    failure: FailureInjection,
    rng: StdRng,
    receipts: HashMap<String, SettlementReceipt>,
    submissions: u32,
}

impl<T: Timer> SimulatedSettlementGateway<T> {
    pub fn new(timer: T, delay: Duration) -> Self {
        Self {
            timer,
            delay,
            failure: FailureInjection::Never,
            rng: StdRng::from_os_rng(),
            receipts: HashMap::new(),
            submissions: 0,
        }
    }

    pub fn with_failure(mut self, failure: FailureInjection) -> Self {
        self.failure = failure;
        self
    }

    /// Deterministic transaction ids and failure draws
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn failure(&self) -> FailureInjection {
        self.failure
    }

    /// Attempts received, including replays of settled orders
    pub fn submissions(&self) -> u32 {
        self.submissions
    }

    pub fn settled_count(&self) -> usize {
        self.receipts.len()
    }

    pub fn receipt_for(&self, idempotency_key: &str) -> Option<&SettlementReceipt> {
        self.receipts.get(idempotency_key)
    }

    fn injected_failure(&mut self, attempt: u32) -> Option<SettlementError> {
        let unavailable = || SettlementError::Unavailable("simulated outage".to_string());
        match self.failure {
            FailureInjection::Never => None,
            FailureInjection::Always => Some(unavailable()),
            FailureInjection::FirstAttempts(n) if attempt <= n => Some(unavailable()),
            FailureInjection::FirstAttempts(_) => None,
            FailureInjection::Rate(p) => (self.rng.random::<f64>() < p).then(unavailable),
            FailureInjection::Reject => Some(SettlementError::Rejected("simulated rejection".to_string())),
        }
    }

    fn next_transaction_id(&mut self) -> TransactionId {
        let mut bytes = [0u8; 32];
        self.rng.fill(&mut bytes);
        TransactionId::from_bytes(&bytes)
    }
}

impl<T: Timer> SettlementGateway for SimulatedSettlementGateway<T> {
    fn submit(
        &mut self,
        order: &SettlementOrder,
        attempt: u32,
    ) -> LocalBoxFuture<'_, Result<SettlementReceipt, SettlementError>> {
        let order = order.clone();
        async move {
            self.submissions += 1;
            if let Some(receipt) = self.receipts.get(&order.idempotency_key) {
                get_logger().debug(
                    LogComponent::Infrastructure("Settlement"),
                    &format!("replaying receipt for {}", order.idempotency_key),
                );
                return Ok(receipt.clone());
            }

            self.timer.sleep(self.delay).await;
            if let Some(error) = self.injected_failure(attempt) {
                return Err(error);
            }

            let receipt = SettlementReceipt {
                transaction_id: self.next_transaction_id(),
                idempotency_key: order.idempotency_key.clone(),
            };
            get_logger().log(
                LogEntry::new(
                    LogLevel::Info,
                    LogComponent::Infrastructure("Settlement"),
                    &format!("settled {} tokens of {}", order.tokens, order.listing),
                )
                .with("attempt", attempt)
                .with("tx", receipt.transaction_id.short()),
            );
            self.receipts.insert(order.idempotency_key, receipt.clone());
            Ok(receipt)
        }
        .boxed_local()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::timers::ImmediateTimer;
    use futures::executor::block_on;

    fn order(key: &str) -> SettlementOrder {
        SettlementOrder {
            idempotency_key: key.to_string(),
            listing: "OTP-EURC".into(),
            amount: 1_000.0,
            tokens: 5,
            wallet_address: "0xabc".into(),
            network: "Polygon".into(),
        }
    }

    #[test]
    fn first_attempts_fail_then_settle() {
        let mut gateway = SimulatedSettlementGateway::new(ImmediateTimer::new(), Duration::from_millis(3_000))
            .with_failure(FailureInjection::FirstAttempts(1))
            .with_seed(7);
        let first = block_on(gateway.submit(&order("k"), 1));
        assert!(matches!(first, Err(SettlementError::Unavailable(_))));
        let second = block_on(gateway.submit(&order("k"), 2)).unwrap();
        assert_eq!(second.idempotency_key, "k");
        assert_eq!(second.transaction_id.value().len(), 66);
    }

    #[test]
    fn rate_must_be_a_probability() {
        assert!(FailureInjection::Rate(1.5).validate().is_err());
        assert!(FailureInjection::Rate(0.25).validate().is_ok());
    }
}
