//! JavaScript bridge. Inputs are plain strings and numbers, outputs are
//! JSON strings; `confirm` returns a `Promise`.

pub mod wasm_api;

pub use wasm_api::{CatalogApi, DemoSession, InvestmentApi, ReturnsApi};
