//! Repository for the `events` table.

use agenda_core::pagination::Page;
use agenda_core::types::DbId;
use agenda_core::validation::event::EventData;
use sqlx::PgPool;

use super::{fetch_page, like_pattern, OrganizerRepo, VenueRepo};
use crate::models::event::{Event, EventDetail, EventFilter};

/// Column list for the `events` table.
const COLUMNS: &str = "id, title, slug, description, date_start, date_end, city, venue_id, \
    organizer_id, ticket_url, ticket_platform, price_min, price_max, is_free, age_rating, \
    genres, highlight_type, image_url, image_alt, status, created_at, updated_at";

pub struct EventRepo;

impl EventRepo {
    /// List events matching `filter`, soonest first.
    pub async fn list(pool: &PgPool, filter: &EventFilter) -> Result<Page<Event>, sqlx::Error> {
        fetch_page(
            pool,
            "events",
            COLUMNS,
            "TRUE",
            "date_start ASC, id ASC",
            filter.limit,
            filter.offset,
            |qb| {
                if let Some(status) = &filter.status {
                    qb.push(" AND status = ").push_bind(status.clone());
                }
                if let Some(city) = &filter.city {
                    qb.push(" AND city = ").push_bind(city.clone());
                }
                if let Some(from) = filter.date_from {
                    qb.push(" AND COALESCE(date_end, date_start) >= ").push_bind(from);
                }
                if let Some(to) = filter.date_to {
                    qb.push(" AND date_start <= ").push_bind(to);
                }
                if let Some(venue_id) = filter.venue_id {
                    qb.push(" AND venue_id = ").push_bind(venue_id);
                }
                if let Some(organizer_id) = filter.organizer_id {
                    qb.push(" AND organizer_id = ").push_bind(organizer_id);
                }
                if let Some(genre) = &filter.genre {
                    qb.push(" AND ").push_bind(genre.clone()).push(" = ANY(genres)");
                }
                if let Some(highlight) = &filter.highlight_type {
                    qb.push(" AND highlight_type = ").push_bind(highlight.clone());
                }
                if let Some(search) = &filter.search {
                    let pattern = like_pattern(search);
                    qb.push(" AND (title ILIKE ")
                        .push_bind(pattern.clone())
                        .push(" OR description ILIKE ")
                        .push_bind(pattern)
                        .push(")");
                }
            },
        )
        .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Event>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM events WHERE id = $1");
        sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Event>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM events WHERE slug = $1");
        sqlx::query_as::<_, Event>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// Resolve the venue and organizer of an event.
    pub async fn with_relations(pool: &PgPool, event: Event) -> Result<EventDetail, sqlx::Error> {
        let venue = match event.venue_id {
            Some(id) => VenueRepo::find_summary(pool, id).await?,
            None => None,
        };
        let organizer = match event.organizer_id {
            Some(id) => OrganizerRepo::find_summary(pool, id).await?,
            None => None,
        };
        Ok(EventDetail {
            event,
            venue,
            organizer,
        })
    }

    pub async fn create(pool: &PgPool, data: &EventData) -> Result<Event, sqlx::Error> {
        let query = format!(
            "INSERT INTO events \
                (title, slug, description, date_start, date_end, city, venue_id, organizer_id, \
                 ticket_url, ticket_platform, price_min, price_max, is_free, age_rating, genres, \
                 highlight_type, image_url, image_alt, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, \
                     $17, $18, $19) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(&data.title)
            .bind(&data.slug)
            .bind(&data.description)
            .bind(data.date_start)
            .bind(data.date_end)
            .bind(&data.city)
            .bind(data.venue_id)
            .bind(data.organizer_id)
            .bind(&data.ticket_url)
            .bind(&data.ticket_platform)
            .bind(data.price_min)
            .bind(data.price_max)
            .bind(data.is_free)
            .bind(data.age_rating.map(|r| r.as_str()))
            .bind(&data.genres)
            .bind(data.highlight_type.as_str())
            .bind(&data.image_url)
            .bind(&data.image_alt)
            .bind(data.status.as_str())
            .fetch_one(pool)
            .await
    }

    /// Overwrite every column with an already merged and validated value.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        data: &EventData,
    ) -> Result<Option<Event>, sqlx::Error> {
        let query = format!(
            "UPDATE events SET \
                title = $2, slug = $3, description = $4, date_start = $5, date_end = $6, \
                city = $7, venue_id = $8, organizer_id = $9, ticket_url = $10, \
                ticket_platform = $11, price_min = $12, price_max = $13, is_free = $14, \
                age_rating = $15, genres = $16, highlight_type = $17, image_url = $18, \
                image_alt = $19, status = $20 \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .bind(&data.title)
            .bind(&data.slug)
            .bind(&data.description)
            .bind(data.date_start)
            .bind(data.date_end)
            .bind(&data.city)
            .bind(data.venue_id)
            .bind(data.organizer_id)
            .bind(&data.ticket_url)
            .bind(&data.ticket_platform)
            .bind(data.price_min)
            .bind(data.price_max)
            .bind(data.is_free)
            .bind(data.age_rating.map(|r| r.as_str()))
            .bind(&data.genres)
            .bind(data.highlight_type.as_str())
            .bind(&data.image_url)
            .bind(&data.image_alt)
            .bind(data.status.as_str())
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
