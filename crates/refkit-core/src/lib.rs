//! Core of refkit: entity reference resolution and button pagination.
//!
//! This crate is framework-agnostic. Gateway caches, REST fetchers and chat
//! views live behind ports (traits) implemented by host crates.

pub mod cache;
pub mod config;
pub mod domain;
pub mod errors;
pub mod logging;
pub mod matcher;
pub mod pagination;
pub mod ports;
pub mod resolver;
pub mod utils;

pub use errors::{Error, Result};
