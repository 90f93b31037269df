//! Organizer rows.

use agenda_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `organizers` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Organizer {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub bio: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub instagram: Option<String>,
    pub logo_url: Option<String>,
    pub city: Option<String>,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Compact form embedded in event details.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OrganizerSummary {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub logo_url: Option<String>,
}

/// Query parameters for `GET /organizers`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrganizerFilter {
    pub status: Option<String>,
    pub city: Option<String>,
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
