//! Shared query parameter types for API handlers.
//!
//! Listing filters live next to their models in `agenda_db::models`; the
//! structs here cover the one-off agenda endpoints.

use agenda_core::types::DbId;
use serde::Deserialize;

/// `GET /agenda/slug-exists?slug=&exclude_id=`
#[derive(Debug, Deserialize)]
pub struct SlugExistsParams {
    pub slug: Option<String>,
    pub exclude_id: Option<DbId>,
}

/// `GET /agenda/{id}/preview?token=`
///
/// Kept as a raw string so a malformed token is a mismatch, not a 400.
#[derive(Debug, Deserialize)]
pub struct PreviewParams {
    pub token: Option<String>,
}
