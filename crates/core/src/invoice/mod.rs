//! AR/AP invoice lifecycle engine.
//!
//! Invoices move through `Draft -> Verified -> Posted -> Voided`. Posting
//! derives a balanced journal entry from the invoice's type and tax
//! classification; voiding a posted invoice reverses that entry first.

pub mod error;
pub mod posting;
pub mod service;
pub mod types;

pub use error::InvoiceError;
pub use service::InvoiceService;
pub use types::{
    CreateInvoiceInput, Invoice, InvoiceStatus, InvoiceType, Payment, PaymentMethod,
    TaxClassification,
};
