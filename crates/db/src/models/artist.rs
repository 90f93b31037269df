//! Artist rows.

use agenda_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `artists` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Artist {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub bio: Option<String>,
    pub genres: Vec<String>,
    pub city: Option<String>,
    pub instagram: Option<String>,
    pub website: Option<String>,
    pub spotify_url: Option<String>,
    pub image_url: Option<String>,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Query parameters for `GET /artists`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArtistFilter {
    pub status: Option<String>,
    pub city: Option<String>,
    pub genre: Option<String>,
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
