//! Repository for the `venues` table.

use agenda_core::pagination::Page;
use agenda_core::types::DbId;
use agenda_core::validation::directory::VenueData;
use sqlx::PgPool;

use super::{fetch_page, like_pattern};
use crate::models::venue::{Venue, VenueFilter, VenueSummary};

/// Column list for the `venues` table.
const COLUMNS: &str = "id, name, slug, address, neighborhood, city, capacity, latitude, \
    longitude, website, instagram, phone, status, created_at, updated_at";

pub struct VenueRepo;

impl VenueRepo {
    /// List venues matching `filter`, ordered by name.
    pub async fn list(pool: &PgPool, filter: &VenueFilter) -> Result<Page<Venue>, sqlx::Error> {
        fetch_page(
            pool,
            "venues",
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
                if let Some(neighborhood) = &filter.neighborhood {
                    qb.push(" AND neighborhood ILIKE ")
                        .push_bind(like_pattern(neighborhood));
                }
                if let Some(search) = &filter.search {
                    let pattern = like_pattern(search);
                    qb.push(" AND (name ILIKE ")
                        .push_bind(pattern.clone())
                        .push(" OR address ILIKE ")
                        .push_bind(pattern)
                        .push(")");
                }
            },
        )
        .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Venue>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM venues WHERE id = $1");
        sqlx::query_as::<_, Venue>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Venue>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM venues WHERE slug = $1");
        sqlx::query_as::<_, Venue>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_summary(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<VenueSummary>, sqlx::Error> {
        sqlx::query_as::<_, VenueSummary>(
            "SELECT id, name, slug, address, city, latitude, longitude FROM venues WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn create(pool: &PgPool, data: &VenueData) -> Result<Venue, sqlx::Error> {
        let query = format!(
            "INSERT INTO venues \
                (name, slug, address, neighborhood, city, capacity, latitude, longitude, \
                 website, instagram, phone, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Venue>(&query)
            .bind(&data.name)
            .bind(&data.slug)
            .bind(&data.address)
            .bind(&data.neighborhood)
            .bind(&data.city)
            .bind(data.capacity)
            .bind(data.latitude)
            .bind(data.longitude)
            .bind(&data.website)
            .bind(&data.instagram)
            .bind(&data.phone)
            .bind(data.status.as_str())
            .fetch_one(pool)
            .await
    }

    /// Overwrite every column with an already merged and validated value.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        data: &VenueData,
    ) -> Result<Option<Venue>, sqlx::Error> {
        let query = format!(
            "UPDATE venues SET \
                name = $2, slug = $3, address = $4, neighborhood = $5, city = $6, \
                capacity = $7, latitude = $8, longitude = $9, website = $10, \
                instagram = $11, phone = $12, status = $13 \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Venue>(&query)
            .bind(id)
            .bind(&data.name)
            .bind(&data.slug)
            .bind(&data.address)
            .bind(&data.neighborhood)
            .bind(&data.city)
            .bind(data.capacity)
            .bind(data.latitude)
            .bind(data.longitude)
            .bind(&data.website)
            .bind(&data.instagram)
            .bind(&data.phone)
            .bind(data.status.as_str())
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM venues WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
