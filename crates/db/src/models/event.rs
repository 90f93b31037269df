//! Public event rows.

use agenda_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::organizer::OrganizerSummary;
use super::venue::VenueSummary;

/// A row from the `events` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Event {
    pub id: DbId,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub date_start: Timestamp,
    pub date_end: Option<Timestamp>,
    pub city: Option<String>,
    pub venue_id: Option<DbId>,
    pub organizer_id: Option<DbId>,
    pub ticket_url: Option<String>,
    pub ticket_platform: Option<String>,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    pub is_free: bool,
    pub age_rating: Option<String>,
    pub genres: Vec<String>,
    pub highlight_type: String,
    pub image_url: Option<String>,
    pub image_alt: Option<String>,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// An event with its venue and organizer resolved.
#[derive(Debug, Clone, Serialize)]
pub struct EventDetail {
    #[serde(flatten)]
    pub event: Event,
    pub venue: Option<VenueSummary>,
    pub organizer: Option<OrganizerSummary>,
}

/// Query parameters for `GET /events`.
///
/// Every field is optional; only the ones present become predicates.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventFilter {
    pub status: Option<String>,
    pub city: Option<String>,
    pub search: Option<String>,
    pub date_from: Option<Timestamp>,
    pub date_to: Option<Timestamp>,
    pub venue_id: Option<DbId>,
    pub organizer_id: Option<DbId>,
    pub genre: Option<String>,
    pub highlight_type: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
