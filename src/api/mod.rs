//! REST API client module for the BLT backend.
//!
//! This module provides the `ApiClient` for talking to the BLT API with
//! bearer-token authentication and a short-lived GET response cache.
//!
//! Failures are never swallowed here; see `ApiError` for the taxonomy.

pub mod client;
pub mod error;

pub use client::{ApiClient, RequestOptions};
pub use error::ApiError;
