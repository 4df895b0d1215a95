//! Authentication flows for the BLT backend.
//!
//! This module provides:
//! - `AuthController`: login, signup, logout, and session-check flows
//! - `AuthOutcome`: the uniform success/failure result for login and signup
//!
//! The bearer token lives in the key-value storage under a fixed key;
//! presence of a token means "possibly authenticated" until `check_auth`
//! verifies it against the backend.

pub mod controller;

pub use controller::{AuthController, AuthOutcome};
