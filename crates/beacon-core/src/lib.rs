#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod error;

pub mod actions;
pub mod api;
pub mod filter;
pub mod flags;
pub mod notify;
pub mod prelude;
pub mod query;
pub mod types;

pub use error::{BoxedError, Error, ErrorKind, Result};
