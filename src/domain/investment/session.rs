//! The invest modal as an explicit state machine.
//!
//! ```text
//! Input --invest--> Confirm --confirm--> Processing --> Success
//!   ^                  |                     |
//!   +------back--------+                     +--------> Error --retry--> Input
//! ```
//!
//! Processing is the only asynchronous step. Its settlement future is
//! registered with the session's [`SessionTeardown`], so closing the modal
//! aborts it and no state update lands afterwards.

use super::settlement::{RetryPolicy, SettlementGateway, SettlementOrder, SettlementReport, Timer, settle_with_retry};
use super::state::{
    AmountPolicy, ConfirmationSnapshot, InvestmentQuote, InvestmentTerms, SettlementOutcome, TransactionFailure,
    TransactionState, TransactionStep,
};
use crate::domain::catalog::ListingRecord;
use crate::domain::errors::{ConfigurationError, DomainResult, SettlementError, TransitionError, ValidationError};
use crate::domain::events::{EventDispatcher, InvestmentEvent};
use crate::domain::logging::{LogComponent, get_logger};
use crate::domain::metrics::{estimated_annual_return, token_count};
use crate::domain::session::WalletConnection;
use crate::{log_debug, log_info};
use futures::future::{AbortHandle, Abortable};
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

/// Tunables of the invest flow
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InvestmentSettings {
    pub amount_policy: AmountPolicy,
    /// Flat fee added to the total, in the listing currency
    pub transaction_fee: f64,
    pub attempt_timeout_ms: u64,
    pub retry: RetryPolicy,
}

impl Default for InvestmentSettings {
    fn default() -> Self {
        Self {
            amount_policy: AmountPolicy::Clamp,
            transaction_fee: 0.05,
            attempt_timeout_ms: 10_000,
            retry: RetryPolicy::default(),
        }
    }
}

impl InvestmentSettings {
    pub fn attempt_timeout(&self) -> Duration {
        Duration::from_millis(self.attempt_timeout_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !self.transaction_fee.is_finite() || self.transaction_fee < 0.0 {
            return Err(ConfigurationError::InvalidParameter(
                "investment.transactionFee must be a non-negative number".into(),
            ));
        }
        if self.attempt_timeout_ms == 0 {
            return Err(ConfigurationError::InvalidParameter(
                "investment.attemptTimeoutMs must be positive".into(),
            ));
        }
        self.retry.validate()
    }
}

/// What `invest` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvestAction {
    /// Wallet was not connected; its connect flow was started and the
    /// session stayed in Input.
    ConnectionRequested,
    /// Moved to Confirm
    AwaitingConfirmation,
}

#[derive(Default)]
struct TeardownState {
    closed: Cell<bool>,
    in_flight: RefCell<Option<AbortHandle>>,
}

/// Shared teardown flag of one session. The host view keeps a clone and
/// calls [`SessionTeardown::close`] when the modal goes away.
#[derive(Clone, Default)]
pub struct SessionTeardown {
    inner: Rc<TeardownState>,
}

impl SessionTeardown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Abort in-flight settlement and refuse further async work
    pub fn close(&self) {
        self.inner.closed.set(true);
        if let Some(handle) = self.inner.in_flight.borrow_mut().take() {
            handle.abort();
        }
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.get()
    }

    fn arm(&self, handle: AbortHandle) {
        if self.is_closed() {
            handle.abort();
        }
        *self.inner.in_flight.borrow_mut() = Some(handle);
    }

    fn disarm(&self) {
        self.inner.in_flight.borrow_mut().take();
    }
}

impl std::fmt::Debug for SessionTeardown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionTeardown")
            .field("closed", &self.is_closed())
            .field("in_flight", &self.inner.in_flight.borrow().is_some())
            .finish()
    }
}

/// One opening of the invest modal for one listing
pub struct InvestmentSession {
    terms: InvestmentTerms,
    settings: InvestmentSettings,
    amount: f64,
    tokens: u64,
    state: TransactionState,
    history: Vec<(TransactionStep, TransactionStep)>,
    teardown: SessionTeardown,
    dispatcher: Option<Rc<dyn EventDispatcher>>,
    nonce: u64,
    confirmations: u32,
}

impl InvestmentSession {
    /// Open in Input with the amount at the listing minimum
    pub fn open(listing: &ListingRecord, settings: InvestmentSettings) -> DomainResult<Self> {
        let terms = InvestmentTerms::from(listing);
        if !(terms.token_price.is_finite() && terms.token_price > 0.0) {
            return Err(ValidationError::InvalidListing {
                id: terms.listing.to_string(),
                reason: "token price must be positive".into(),
            }
            .into());
        }
        if terms.maximum_investment < terms.minimum_investment {
            return Err(ValidationError::NoAvailableSupply(terms.listing.to_string()).into());
        }

        let amount = terms.minimum_investment;
        let tokens = token_count(amount, terms.token_price)?;
        log_info!(
            LogComponent::Domain("Investment"),
            "opened {} with range [{}, {}]",
            terms.listing,
            terms.minimum_investment,
            terms.maximum_investment
        );

        Ok(Self {
            terms,
            settings,
            amount,
            tokens,
            state: TransactionState::Input,
            history: Vec::new(),
            teardown: SessionTeardown::new(),
            dispatcher: None,
            nonce: rand::random::<u64>(),
            confirmations: 0,
        })
    }

    pub fn with_dispatcher(mut self, dispatcher: Rc<dyn EventDispatcher>) -> Self {
        self.dispatcher = Some(dispatcher);
        self
    }

    pub fn terms(&self) -> &InvestmentTerms {
        &self.terms
    }

    pub fn settings(&self) -> &InvestmentSettings {
        &self.settings
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn tokens(&self) -> u64 {
        self.tokens
    }

    pub fn state(&self) -> &TransactionState {
        &self.state
    }

    pub fn step(&self) -> TransactionStep {
        self.state.step()
    }

    /// Every `(from, to)` transition taken so far
    pub fn transitions(&self) -> &[(TransactionStep, TransactionStep)] {
        &self.history
    }

    /// Handle for the host view to cancel in-flight work
    pub fn teardown_handle(&self) -> SessionTeardown {
        self.teardown.clone()
    }

    pub fn is_closed(&self) -> bool {
        self.teardown.is_closed()
    }

    /// Figures for the current amount
    pub fn quote(&self) -> DomainResult<InvestmentQuote> {
        Ok(InvestmentQuote {
            amount: self.amount,
            tokens: self.tokens,
            token_price: self.terms.token_price,
            estimated_annual_return: estimated_annual_return(self.amount, self.terms.estimated_yield)?,
            transaction_fee: self.settings.transaction_fee,
            total: self.amount + self.settings.transaction_fee,
        })
    }

    /// Edit the amount. Returns the amount actually stored.
    pub fn set_amount(&mut self, requested: f64) -> DomainResult<f64> {
        self.ensure_step(TransactionStep::Input, "set amount")?;
        if !requested.is_finite() {
            return Err(ValidationError::NonFiniteAmount.into());
        }

        let minimum = self.terms.minimum_investment;
        let maximum = self.terms.maximum_investment;
        let amount = match self.settings.amount_policy {
            AmountPolicy::Clamp => requested.clamp(minimum, maximum),
            AmountPolicy::Reject if requested < minimum || requested > maximum => {
                return Err(ValidationError::AmountOutOfRange {
                    amount: requested,
                    minimum,
                    maximum,
                }
                .into());
            }
            AmountPolicy::Reject => requested,
        };

        self.tokens = token_count(amount, self.terms.token_price)?;
        self.amount = amount;
        log_debug!(
            LogComponent::Domain("Investment"),
            "amount {} -> {} ({} tokens)",
            requested,
            amount,
            self.tokens
        );
        Ok(amount)
    }

    /// The "Invest Now" button
    pub fn invest<W: WalletConnection + ?Sized>(&mut self, wallet: &mut W) -> DomainResult<InvestAction> {
        self.ensure_step(TransactionStep::Input, "invest")?;
        if !wallet.is_connected() {
            wallet.request_connection();
            self.publish(InvestmentEvent::ConnectionRequested {
                listing: self.terms.listing.clone(),
            });
            return Ok(InvestAction::ConnectionRequested);
        }

        let snapshot = ConfirmationSnapshot {
            amount: self.amount,
            tokens: self.tokens,
            network: self.terms.network.clone(),
            wallet_address: wallet.address().unwrap_or_default().to_string(),
            estimated_annual_return: estimated_annual_return(self.amount, self.terms.estimated_yield)?,
        };
        self.transition(TransactionState::Confirm(snapshot));
        Ok(InvestAction::AwaitingConfirmation)
    }

    /// Confirm -> Input, keeping the amount
    pub fn back(&mut self) -> DomainResult<()> {
        self.ensure_step(TransactionStep::Confirm, "back")?;
        self.transition(TransactionState::Input);
        Ok(())
    }

    /// Confirm the investment and settle it.
    ///
    /// Resolves to Success or Error. If the session is torn down while
    /// processing, resolves to `SettlementError::Cancelled` and the state
    /// is left untouched.
    pub async fn confirm<G, T>(&mut self, gateway: &mut G, timer: &T) -> DomainResult<TransactionStep>
    where
        G: SettlementGateway + ?Sized,
        T: Timer + ?Sized,
    {
        if self.teardown.is_closed() {
            return Err(SettlementError::Cancelled.into());
        }
        let snapshot = match &self.state {
            TransactionState::Confirm(snapshot) => snapshot.clone(),
            other => {
                return Err(TransitionError {
                    step: other.step(),
                    action: "confirm",
                }
                .into());
            }
        };

        self.confirmations += 1;
        let order = SettlementOrder {
            idempotency_key: format!("{}-{:016x}-{}", self.terms.listing, self.nonce, self.confirmations),
            listing: self.terms.listing.clone(),
            amount: snapshot.amount,
            tokens: snapshot.tokens,
            wallet_address: snapshot.wallet_address.clone(),
            network: snapshot.network.clone(),
        };
        self.transition(TransactionState::Processing(snapshot.clone()));

        let (handle, registration) = AbortHandle::new_pair();
        self.teardown.arm(handle);

        let dispatcher = self.dispatcher.clone();
        let listing = self.terms.listing.clone();
        let report_failure = move |attempt: u32, error: &SettlementError| {
            get_logger().warn(
                LogComponent::Domain("Investment"),
                &format!("settlement attempt {} for {} failed: {}", attempt, listing, error),
            );
            if let Some(dispatcher) = &dispatcher {
                dispatcher.publish_investment_event(InvestmentEvent::SettlementAttemptFailed {
                    listing: listing.clone(),
                    attempt,
                    reason: error.to_string(),
                });
            }
        };

        let retry = self.settings.retry;
        let settlement = settle_with_retry(
            gateway,
            timer,
            &order,
            &retry,
            self.settings.attempt_timeout(),
            report_failure,
        );
        let outcome = Abortable::new(settlement, registration).await;
        self.teardown.disarm();

        let SettlementReport { result, attempts } = match outcome {
            Ok(report) if !self.teardown.is_closed() => report,
            _ => {
                log_info!(
                    LogComponent::Domain("Investment"),
                    "settlement for {} cancelled by teardown",
                    self.terms.listing
                );
                return Err(SettlementError::Cancelled.into());
            }
        };

        match result {
            Ok(receipt) => self.transition(TransactionState::Success(SettlementOutcome {
                transaction_id: receipt.transaction_id,
                amount: snapshot.amount,
                tokens_received: snapshot.tokens,
                estimated_annual_return: snapshot.estimated_annual_return,
                attempts,
            })),
            Err(error) => {
                get_logger().error(
                    LogComponent::Domain("Investment"),
                    &format!("settlement for {} failed after {} attempt(s): {}", self.terms.listing, attempts, error),
                );
                self.transition(TransactionState::Error(TransactionFailure {
                    reason: error.to_string(),
                    attempts,
                }))
            }
        }
        Ok(self.step())
    }

    /// Error -> Input with the amount preserved
    pub fn retry(&mut self) -> DomainResult<()> {
        self.ensure_step(TransactionStep::Error, "retry")?;
        self.transition(TransactionState::Input);
        Ok(())
    }

    /// Close the modal, aborting anything in flight
    pub fn close(self) {
        drop(self);
    }

    fn ensure_step(&self, expected: TransactionStep, action: &'static str) -> Result<(), TransitionError> {
        let step = self.step();
        if step == expected {
            Ok(())
        } else {
            Err(TransitionError { step, action })
        }
    }

    fn transition(&mut self, next: TransactionState) {
        let from = self.state.step();
        let to = next.step();
        self.state = next;
        self.history.push((from, to));
        log_info!(
            LogComponent::Domain("Investment"),
            "{}: {} -> {}",
            self.terms.listing,
            from,
            to
        );
        self.publish(InvestmentEvent::StateChanged {
            listing: self.terms.listing.clone(),
            from,
            to,
        });
    }

    fn publish(&self, event: InvestmentEvent) {
        if let Some(dispatcher) = &self.dispatcher {
            dispatcher.publish_investment_event(event);
        }
    }
}

impl Drop for InvestmentSession {
    fn drop(&mut self) {
        self.teardown.close();
    }
}

impl std::fmt::Debug for InvestmentSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InvestmentSession")
            .field("terms", &self.terms)
            .field("amount", &self.amount)
            .field("tokens", &self.tokens)
            .field("state", &self.state)
            .finish()
    }
}
