//! Double-entry journal engine.
//!
//! Journal entries move through `Draft -> Posted -> Voided`. Drafts may be
//! edited or deleted; posting requires an exactly balanced entry; voiding a
//! posted entry appends a reversing entry instead of deleting history.

pub mod error;
pub mod reversal;
pub mod service;
pub mod types;
pub mod validation;

pub use error::JournalError;
pub use service::JournalService;
pub use types::{
    CreateJournalInput, JournalEntry, JournalStatus, LineInput, SourceType, TransactionLine,
};
