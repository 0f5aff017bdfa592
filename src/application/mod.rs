pub mod catalog;
pub mod investment;

pub use catalog::{CatalogBrowser, CatalogSummary, ListingDetail};
pub use investment::InvestmentCoordinator;
