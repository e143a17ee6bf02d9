//! CLI command implementations
//!
//! This module re-exports all CLI command functions.

mod api;
mod config_gen;
mod link_file;

pub use api::*;
pub use config_gen::*;
pub use link_file::*;
