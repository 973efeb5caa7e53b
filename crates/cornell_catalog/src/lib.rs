//! Client for the Cornell class roster API.
//!
//! [`api::CatalogFetcher`] fetches and validates one route at a time;
//! [`api::CatalogCollector`] walks every roster, subject and class into an
//! in-memory [`api::CatalogData`].

pub mod api;

pub use api::{CatalogCollector, CatalogConfig, CatalogData, CatalogError, CatalogFetcher};
