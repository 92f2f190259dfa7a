//! Core types and trait definitions for the Itinera journey-sharing
//! service.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod actor;
pub mod audit;
pub mod authz;
pub mod collaborator;
pub mod email;
pub mod error;
pub mod journey;
pub mod notify;
pub mod sharing;
pub mod store;
pub mod token;

pub use error::{Error, Result};
