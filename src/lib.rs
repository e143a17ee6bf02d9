//! URLynk - link configuration validation, wire encoding and API client
//!
//! This library describes URLynk short links as typed configuration,
//! validates them before submission and encodes them into the JSON shape
//! the URLynk service expects.
//!
//! # Features
//! - **client**: async API client (default)
//! - **cli**: `urlynk` command-line tool (default)
//!
//! # Architecture
//! - `models`: link configuration and its enums
//! - `validation`: first-error-wins validation pipeline
//! - `wire`: wire-format encoding and API payloads
//! - `client`: async SDK client over a pluggable transport
//! - `config`: TOML / environment configuration for the CLI
//! - `system`: logging initialization
//! - `interfaces`: command-line interface

#[cfg(feature = "cli")]
pub mod cli;
#[cfg(feature = "client")]
pub mod client;
pub mod config;
pub mod errors;
#[cfg(feature = "cli")]
pub mod interfaces;
pub mod models;
pub mod system;
pub mod utils;
pub mod validation;
pub mod wire;

pub use errors::{Result, UrlynkError};
pub use models::LinkConfig;
pub use validation::{ValidationError, validate};
pub use wire::to_wire_format;
