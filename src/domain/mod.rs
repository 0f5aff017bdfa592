//! Pure business rules: catalogs, metrics and the invest flow.
//!
//! Nothing in here touches the browser; time, randomness of settlement and
//! wallets come in through traits.

pub mod catalog;
pub mod errors;
pub mod events;
pub mod investment;
pub mod logging;
pub mod metrics;
pub mod session;

pub use errors::{AppError, AppResult, DomainError, DomainResult};
