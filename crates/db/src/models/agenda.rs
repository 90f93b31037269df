//! Agenda item rows and their owned children.
//!
//! Child rows (occurrences, ticket tiers, media) belong to exactly one item
//! and are always replaced as a set. Former slugs are kept in
//! `agenda_slug_history` so old links keep resolving.

use agenda_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `agenda_itens` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AgendaItem {
    pub id: DbId,
    pub title: String,
    pub slug: String,
    pub subtitle: Option<String>,
    pub listing_type: Option<String>,
    pub visibility_type: String,
    pub city: Option<String>,
    pub start_at_utc: Option<Timestamp>,
    pub end_at_utc: Option<Timestamp>,
    pub summary: Option<String>,
    pub cover_url: Option<String>,
    pub cover_alt: Option<String>,
    pub organizer_id: Option<DbId>,
    pub venue_id: Option<DbId>,
    pub artist_ids: Vec<DbId>,
    pub artists_names: Vec<String>,
    pub ticket_url: Option<String>,
    pub source_url: Option<String>,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    pub currency: String,
    pub status: String,
    pub priority: i32,
    pub tags: Vec<String>,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub noindex: bool,
    /// Never serialized; exposed only through the admin detail.
    #[serde(skip_serializing)]
    pub preview_token: DbId,
    pub published_at: Option<Timestamp>,
    pub created_by: Option<DbId>,
    pub updated_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<Timestamp>,
}

/// A row from the `agenda_occurrences` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AgendaOccurrence {
    pub id: DbId,
    pub agenda_item_id: DbId,
    pub start_at_utc: Timestamp,
    pub end_at_utc: Option<Timestamp>,
    pub sort_order: i32,
}

/// A row from the `agenda_ticket_tiers` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AgendaTicketTier {
    pub id: DbId,
    pub agenda_item_id: DbId,
    pub name: String,
    pub price: Option<f64>,
    pub currency: String,
    pub available: bool,
    pub sort_order: i32,
}

/// A row from the `agenda_media` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AgendaMedia {
    pub id: DbId,
    pub agenda_item_id: DbId,
    pub kind: String,
    pub url: String,
    pub alt_text: Option<String>,
    pub sort_order: i32,
}

/// A row from the `agenda_slug_history` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AgendaSlugHistory {
    pub id: DbId,
    pub agenda_item_id: DbId,
    pub old_slug: String,
    pub new_slug: String,
    pub changed_by: Option<DbId>,
    pub changed_at: Timestamp,
}

/// An agenda item with its children.
#[derive(Debug, Clone, Serialize)]
pub struct AgendaItemDetail {
    #[serde(flatten)]
    pub item: AgendaItem,
    pub occurrences: Vec<AgendaOccurrence>,
    pub ticket_tiers: Vec<AgendaTicketTier>,
    pub media: Vec<AgendaMedia>,
    /// Set only for back-office callers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview_token: Option<DbId>,
}

impl AgendaItemDetail {
    /// Expose the preview token (admin/editor responses only).
    pub fn with_preview_token(mut self) -> Self {
        self.preview_token = Some(self.item.preview_token);
        self
    }
}

/// Query parameters for agenda listings.
///
/// The public listing ignores `status` and always returns published items.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AgendaFilter {
    pub city: Option<String>,
    pub date_from: Option<Timestamp>,
    pub date_to: Option<Timestamp>,
    pub search: Option<String>,
    /// Comma-separated; matches items carrying any of the tags.
    pub tags: Option<String>,
    pub listing_type: Option<String>,
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl AgendaFilter {
    pub fn tag_list(&self) -> Vec<String> {
        self.tags
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    }
}
