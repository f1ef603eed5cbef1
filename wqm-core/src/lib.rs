//! Core types for the water quality map toolkit.
//!
//! - `records`: declared row schemas per backend view
//! - `classify`: concentration, treatment, and land-cover color rules
//! - `filter`: year/month filter index and row predicate
//! - `query` / `source`: read queries and the row source abstraction
//! - `client` (feature `api`): HTTP row source for the hosted backend

pub mod classify;
pub mod date;
pub mod filter;
pub mod kpi;
pub mod query;
pub mod records;
pub mod source;
pub mod views;

#[cfg(feature = "api")]
pub mod client;

pub use query::Query;
pub use source::{RowSource, SourceError};
pub use views::View;
