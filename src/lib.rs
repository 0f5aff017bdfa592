//! Core of a tokenized real-estate investment demo: catalog filtering and
//! sorting, investment metrics, and a simulated investment transaction.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

use crate::config::AppConfig;
use crate::domain::logging::{LogComponent, get_logger};

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
#[cfg(not(feature = "logic-only"))]
pub mod presentation;

pub use application::{CatalogBrowser, InvestmentCoordinator};
pub use domain::catalog::{CatalogEngine, CatalogView, FilterCriteria, ListingRecord, SortKey};
pub use domain::errors::{AppError, AppResult, DomainError};
pub use domain::investment::{InvestmentSession, TransactionStep};
pub use infrastructure::SeedListingSource;

/// Install the console logger and wall clock for `config`
pub fn initialize_with_config(config: &AppConfig) {
    domain::logging::init_logger(Box::new(infrastructure::ConsoleLogger::new(config.logging.level)));
    domain::logging::init_time_provider(Box::new(infrastructure::ClockTimeProvider::new()));

    get_logger().info(
        LogComponent::Presentation("Initialize"),
        &format!("logging at {:?} and above", config.logging.level),
    );
}

/// Module start hook in the browser
#[cfg_attr(target_arch = "wasm32", wasm_bindgen(start))]
pub fn initialize() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
    initialize_with_config(&AppConfig::default());
}
