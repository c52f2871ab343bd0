//! Reqwest-based HTTP client for the beacon integrations API.
//!
//! This crate provides the [`ReqwestClient`], an implementation of
//! [`beacon_core::api::IntegrationsProvider`] over the notifications server's
//! REST endpoints.
//!
//! # Example
//!
//! ```rust,ignore
//! use beacon_core::query::{Pagination, build_list_request};
//! use beacon_reqwest::{ReqwestClient, ReqwestConfig};
//!
//! // Create a client with default configuration
//! let client = ReqwestClient::new(ReqwestConfig::default())?;
//!
//! // Convert to a service for dependency injection
//! let service = client.into_service();
//!
//! let request = build_list_request(&filters, &Pagination::default(), None, None);
//! let page = service.list_integrations(&request).await?;
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod connect;
mod error;
mod service;

pub use crate::connect::{
    DEFAULT_BASE_URL, DEFAULT_TIMEOUT, IDENTITY_HEADER, ReqwestClient, ReqwestConfig,
    TRACING_TARGET,
};
pub use crate::error::{Error, Result};
