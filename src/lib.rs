//! BLT TUI - a terminal client for the BLT REST API.
//!
//! This crate provides the building blocks of the client: a typed event
//! bus and state holder, an HTTP client with bearer-token auth and a
//! short-lived GET cache, the login/signup/logout/session-check flows,
//! and the ratatui presentation layer. The binary in `main.rs` wires them
//! together.

pub mod api;
pub mod app;
pub mod auth;
pub mod config;
pub mod models;
pub mod state;
pub mod storage;
pub mod ui;
pub mod utils;
