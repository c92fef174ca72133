//! Customer document schema.
//!
//! Shape of a customer document, its required-field constraints and the
//! conversions to and from the untyped documents a store persists. Pure
//! domain code: no IO, no HTTP, no storage.

pub mod customer;
pub mod schema;

pub use customer::{Customer, CustomerFields};
pub use schema::{CustomerDraft, CustomerPatch, Document, COLLECTION, REQUIRED_FIELDS};
