pub mod session;
pub mod settlement;
pub mod state;

pub use session::{InvestAction, InvestmentSession, InvestmentSettings, SessionTeardown};
pub use settlement::{
    RetryPolicy, SettlementGateway, SettlementOrder, SettlementReceipt, SettlementReport, Timer, settle_with_retry,
};
pub use state::{
    AmountPolicy, ConfirmationSnapshot, InvestmentQuote, InvestmentTerms, SettlementOutcome, TransactionFailure,
    TransactionId, TransactionState, TransactionStep,
};
