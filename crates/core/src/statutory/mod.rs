//! Statutory VAT filing outputs.
//!
//! Three artifacts per filing period: Form 401 (general taxpayers),
//! Form 403 (taxpayers with exempt sales), and the fixed-width media file
//! the government system ingests alongside either form. All generators are
//! pure transforms over a [`crate::reports::TaxPeriodSummary`]; malformed
//! invoices are rejected upstream, never coerced here.

pub mod forms;
pub mod media;
pub mod types;
pub mod xml;

pub use forms::{generate_form_401, generate_form_403};
pub use media::{generate_media_file, media_file_name};
pub use types::{BucketTotals, Form401Data, Form403Data, MediaFile, MediaFileOptions};
pub use xml::{form_401_xml, form_403_xml};
