//! Error taxonomy shared by every layer.
//!
//! Pure catalog/metrics functions return [`DomainError`] variants instead of
//! producing `NaN`, `Infinity` or silent defaults.

use derive_more::{Display, From};

use crate::domain::investment::TransactionStep;

/// Root error type for the entire application
#[derive(Debug, Clone, PartialEq, Display, From)]
pub enum AppError {
    #[display(fmt = "Domain Error: {}", _0)]
    Domain(DomainError),
    #[display(fmt = "Application Error: {}", _0)]
    Application(ApplicationError),
    #[display(fmt = "Infrastructure Error: {}", _0)]
    Infrastructure(InfrastructureError),
}

/// Domain layer specific errors
#[derive(Debug, Clone, PartialEq, Display, From)]
pub enum DomainError {
    #[display(fmt = "Validation: {}", _0)]
    Validation(ValidationError),
    #[display(fmt = "Configuration: {}", _0)]
    Configuration(ConfigurationError),
    #[display(fmt = "Computation: {}", _0)]
    Computation(ComputationError),
    #[display(fmt = "Transition: {}", _0)]
    Transition(TransitionError),
    #[display(fmt = "Settlement: {}", _0)]
    Settlement(SettlementError),
}

/// Input values that break a domain rule
#[derive(Debug, Clone, PartialEq, Display)]
pub enum ValidationError {
    #[display(fmt = "amount {} is outside [{}, {}]", amount, minimum, maximum)]
    AmountOutOfRange { amount: f64, minimum: f64, maximum: f64 },
    #[display(fmt = "amount is not a finite number")]
    NonFiniteAmount,
    #[display(fmt = "cannot parse amount '{}'", _0)]
    UnparsableAmount(String),
    #[display(fmt = "listing {} has no purchasable supply", _0)]
    NoAvailableSupply(String),
    #[display(fmt = "listing {} is invalid: {}", id, reason)]
    InvalidListing { id: String, reason: String },
}

/// Unknown selections coming from UI controls or bad config values
#[derive(Debug, Clone, PartialEq, Display)]
pub enum ConfigurationError {
    #[display(fmt = "unknown sort key '{}'", _0)]
    UnknownSortKey(String),
    #[display(fmt = "unknown category '{}'", _0)]
    UnknownCategory(String),
    #[display(fmt = "unknown status '{}'", _0)]
    UnknownStatus(String),
    #[display(fmt = "invalid parameter: {}", _0)]
    InvalidParameter(String),
    #[display(fmt = "malformed configuration: {}", _0)]
    Malformed(String),
}

/// Arithmetic that has no meaningful result
#[derive(Debug, Clone, PartialEq, Display)]
pub enum ComputationError {
    #[display(fmt = "division by zero computing {}", _0)]
    DivisionByZero(&'static str),
    #[display(fmt = "invalid input: {}", _0)]
    InvalidInput(String),
}

/// An action that is not allowed in the current transaction step
#[derive(Debug, Clone, PartialEq, Display)]
#[display(fmt = "'{}' is not allowed while in {}", action, step)]
pub struct TransitionError {
    pub step: TransactionStep,
    pub action: &'static str,
}

/// Outcome of a failed settlement attempt
#[derive(Debug, Clone, PartialEq, Display)]
pub enum SettlementError {
    #[display(fmt = "attempt {} timed out", _0)]
    Timeout(u32),
    #[display(fmt = "settlement unavailable: {}", _0)]
    Unavailable(String),
    #[display(fmt = "settlement rejected: {}", _0)]
    Rejected(String),
    #[display(fmt = "settlement cancelled")]
    Cancelled,
}

impl SettlementError {
    /// Only transient failures are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SettlementError::Timeout(_) | SettlementError::Unavailable(_))
    }
}

/// Application layer errors
#[derive(Debug, Clone, PartialEq, Display)]
pub enum ApplicationError {
    #[display(fmt = "listing '{}' not found", _0)]
    ListingNotFound(String),
    #[display(fmt = "investment session already closed")]
    SessionClosed,
    #[display(fmt = "session is busy: {}", _0)]
    SessionBusy(String),
}

/// Infrastructure layer errors
#[derive(Debug, Clone, PartialEq, Display)]
pub enum InfrastructureError {
    #[display(fmt = "repository: {}", _0)]
    Repository(String),
    #[display(fmt = "serialization: {}", _0)]
    Serialization(String),
}

impl std::error::Error for AppError {}
impl std::error::Error for DomainError {}
impl std::error::Error for ValidationError {}
impl std::error::Error for ConfigurationError {}
impl std::error::Error for ComputationError {}
impl std::error::Error for TransitionError {}
impl std::error::Error for SettlementError {}
impl std::error::Error for ApplicationError {}
impl std::error::Error for InfrastructureError {}

impl From<ValidationError> for AppError {
    fn from(error: ValidationError) -> Self {
        AppError::Domain(error.into())
    }
}

impl From<ConfigurationError> for AppError {
    fn from(error: ConfigurationError) -> Self {
        AppError::Domain(error.into())
    }
}

impl From<ComputationError> for AppError {
    fn from(error: ComputationError) -> Self {
        AppError::Domain(error.into())
    }
}

impl From<TransitionError> for AppError {
    fn from(error: TransitionError) -> Self {
        AppError::Domain(error.into())
    }
}

// Simple convenience type aliases
pub type DomainResult<T> = Result<T, DomainError>;
pub type AppResult<T> = Result<T, AppError>;
