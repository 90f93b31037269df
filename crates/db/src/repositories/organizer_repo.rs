//! Repository for the `organizers` table.

use agenda_core::pagination::Page;
use agenda_core::types::DbId;
use agenda_core::validation::directory::OrganizerData;
use sqlx::PgPool;

use super::{fetch_page, like_pattern};
use crate::models::organizer::{Organizer, OrganizerFilter, OrganizerSummary};

/// Column list for the `organizers` table.
const COLUMNS: &str = "id, name, slug, bio, email, phone, website, instagram, logo_url, city, \
    status, created_at, updated_at";

pub struct OrganizerRepo;

impl OrganizerRepo {
    /// List organizers matching `filter`, ordered by name.
    pub async fn list(
        pool: &PgPool,
        filter: &OrganizerFilter,
    ) -> Result<Page<Organizer>, sqlx::Error> {
        fetch_page(
            pool,
            "organizers",
            COLUMNS,
            "TRUE",
            "name ASC, id ASC",
            filter.limit,
            filter.offset,
            |qb| {
                if let Some(status) = &filter.status {
                    qb.push(" AND status = ").push_bind(status.clone());
                }
                if let Some(city) = &filter.city {
                    qb.push(" AND city = ").push_bind(city.clone());
                }
                if let Some(search) = &filter.search {
                    qb.push(" AND name ILIKE ").push_bind(like_pattern(search));
                }
            },
        )
        .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Organizer>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM organizers WHERE id = $1");
        sqlx::query_as::<_, Organizer>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Organizer>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM organizers WHERE slug = $1");
        sqlx::query_as::<_, Organizer>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_summary(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<OrganizerSummary>, sqlx::Error> {
        sqlx::query_as::<_, OrganizerSummary>(
            "SELECT id, name, slug, logo_url FROM organizers WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn create(pool: &PgPool, data: &OrganizerData) -> Result<Organizer, sqlx::Error> {
        let query = format!(
            "INSERT INTO organizers \
                (name, slug, bio, email, phone, website, instagram, logo_url, city, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Organizer>(&query)
            .bind(&data.name)
            .bind(&data.slug)
            .bind(&data.bio)
            .bind(&data.email)
            .bind(&data.phone)
            .bind(&data.website)
            .bind(&data.instagram)
            .bind(&data.logo_url)
            .bind(&data.city)
            .bind(data.status.as_str())
            .fetch_one(pool)
            .await
    }

    /// Overwrite every column with an already merged and validated value.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        data: &OrganizerData,
    ) -> Result<Option<Organizer>, sqlx::Error> {
        let query = format!(
            "UPDATE organizers SET \
                name = $2, slug = $3, bio = $4, email = $5, phone = $6, website = $7, \
                instagram = $8, logo_url = $9, city = $10, status = $11 \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Organizer>(&query)
            .bind(id)
            .bind(&data.name)
            .bind(&data.slug)
            .bind(&data.bio)
            .bind(&data.email)
            .bind(&data.phone)
            .bind(&data.website)
            .bind(&data.instagram)
            .bind(&data.logo_url)
            .bind(&data.city)
            .bind(data.status.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Delete an organizer. Events and agenda items referencing it keep a
    /// `NULL` organizer. Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM organizers WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
