//! SQLite backend for the Itinera share store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated
//! thread without blocking the async runtime. Every state transition
//! executes inside one explicit transaction, which is what gives the
//! `ShareStore` contract its compare-and-set guarantees.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
