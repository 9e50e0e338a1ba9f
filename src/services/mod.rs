//! Service layer for wimm
//!
//! The service layer provides business logic on top of the storage layer,
//! handling defaults, validation and writes that span several files.

pub mod import;
pub mod invoice;

pub use import::{ImportResult, ImportService};
pub use invoice::{InvoiceService, NewInvoice};
