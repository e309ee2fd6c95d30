//! SQLite backend for the mosque registry.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Besides the [`MosqueStore`] reads, the
//! store hands out whole transactions to the migration runner through
//! [`SqliteStore::transaction`].
//!
//! [`MosqueStore`]: mosque_core::store::MosqueStore

mod encode;
mod schema;
mod store;

pub mod error;
pub mod ledger;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
