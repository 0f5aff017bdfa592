//! Listing catalog aggregate: records, filter criteria and the filter/sort engine.

pub mod criteria;
pub mod entities;
pub mod repositories;
pub mod services;
pub mod value_objects;

pub use criteria::*;
pub use entities::*;
pub use repositories::ListingSource;
pub use services::{CatalogEngine, CatalogView};
pub use value_objects::*;
