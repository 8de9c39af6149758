//! In-memory reference implementation of the Tabula store port.
//!
//! [`MemoryBackend`] holds every company's rows behind one lock;
//! [`MemoryBackend::scoped`] hands out per-company
//! [`tabula_core::store::CompanyScopedStore`] handles. Write batches are
//! atomic: all preconditions are validated before any operation applies.
//!
//! The store-backed lifecycle tests for the journal, invoice, report, and
//! statutory engines live here too.

pub mod memory;


pub use memory::{MemoryBackend, MemoryStore};
