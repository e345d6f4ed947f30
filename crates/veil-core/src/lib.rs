//! Core types and trait definitions for the Veil personal information store.
//!
//! Veil is an indirection layer for personally identifiable information: the
//! application stores a PII value under an opaque *personal token* (the data
//! subject) and a *key name* (the semantic field), and persists only the
//! opaque *reference token* it gets back. The store is then the single place
//! where raw PII at rest is read or written, which makes right-to-erasure and
//! data-minimisation operations centralisable and auditable.
//!
//! This crate is deliberately free of database dependencies. Storage backends
//! (`veil-store-memory`, `veil-store-sqlite`) and application code both
//! depend on it; it depends on nothing heavier than the domain requires.

pub mod clock;
pub mod data;
pub mod disposal;
pub mod error;
pub mod lawful_basis;
pub mod redact;
pub mod store;
pub mod token;
pub mod value;

pub use error::{Error, Result};
