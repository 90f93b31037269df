//! Row models and list filters.
//!
//! Each submodule contains a `FromRow` + `Serialize` struct per table and the
//! `Deserialize` filter used by its list query. Inserts and updates take the
//! validated `*Data` types from `agenda_core::validation` directly.

pub mod agenda;
pub mod artist;
pub mod event;
pub mod organizer;
pub mod profile;
pub mod venue;
