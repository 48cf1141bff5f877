//! Sales domain read views.
//!
//! **Responsibility:** the read-only shapes of invoices, customers and
//! products that the analytics engine consumes.
//!
//! The surrounding application owns the writable entities and their CRUD
//! lifecycle; this crate only describes what analytics is allowed to see.
//! Pure data, no IO, no HTTP, no storage.

pub mod customer;
pub mod invoice;
pub mod product;

pub use customer::CustomerView;
pub use invoice::{InvoiceItemView, InvoiceView};
pub use product::ProductView;
