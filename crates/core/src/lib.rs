//! Domain core for the ROLÊ agenda backend.
//!
//! Pure logic only: identifiers, the error taxonomy, content enums, slug and
//! sanitization utilities, and the schemas every write goes through. Nothing
//! in here touches the network or the database.

#[macro_use]
mod text_enum;

pub mod agenda;
pub mod directory;
pub mod error;
pub mod pagination;
pub mod roles;
pub mod sanitize;
pub mod slug;
pub mod types;
pub mod validation;

pub use text_enum::UnknownVariant;
