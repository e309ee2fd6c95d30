//! Core types and trait definitions for the mosque registry.
//!
//! Records here mirror the relational schema one-to-one: genealogy
//! (GEDCOM-shaped individuals, families and events), the member registry,
//! contributions and other finance records, access control, and reference
//! data. The crate has no database
//! dependency; storage backends implement [`store::MosqueStore`].

// Native `async fn` in traits; the returned futures carry explicit `Send`
// bounds in the trait declarations.
#![allow(async_fn_in_trait)]

pub mod access;
pub mod enums;
pub mod error;
pub mod finance;
pub mod gedcom;
pub mod registry;
pub mod relatives;
pub mod store;
pub mod tenant;

pub use error::{Error, Result};
pub use tenant::{MosqueAware, MosqueId, TenantScope};
