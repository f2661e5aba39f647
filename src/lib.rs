//! Local-disk video store with HTTP byte-range streaming.
//!
//! [`services::content_store::ContentStore`] places uploads under a
//! date-partitioned root and hands back a relative identifier;
//! [`routes::routes::routes`] serves those identifiers under `/uploads` with
//! single-range `Range` support.

pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
