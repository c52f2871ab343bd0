//! Reqwest client module.
//!
//! This module provides the main client interface for HTTP operations.
//! It wraps the `reqwest` crate for the integrations API.

mod client;
mod config;

pub use client::{IDENTITY_HEADER, ReqwestClient, TRACING_TARGET};
pub use config::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT, ReqwestConfig};
