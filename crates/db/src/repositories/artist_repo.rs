//! Repository for the `artists` table.

use agenda_core::pagination::Page;
use agenda_core::types::DbId;
use agenda_core::validation::directory::ArtistData;
use sqlx::PgPool;

use super::{fetch_page, like_pattern};
use crate::models::artist::{Artist, ArtistFilter};

/// Column list for the `artists` table.
const COLUMNS: &str = "id, name, slug, bio, genres, city, instagram, website, spotify_url, \
    image_url, status, created_at, updated_at";

pub struct ArtistRepo;

impl ArtistRepo {
    /// List artists matching `filter`, ordered by name.
    pub async fn list(pool: &PgPool, filter: &ArtistFilter) -> Result<Page<Artist>, sqlx::Error> {
        fetch_page(
            pool,
            "artists",
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
                if let Some(genre) = &filter.genre {
                    qb.push(" AND ").push_bind(genre.clone()).push(" = ANY(genres)");
                }
                if let Some(search) = &filter.search {
                    qb.push(" AND name ILIKE ").push_bind(like_pattern(search));
                }
            },
        )
        .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Artist>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM artists WHERE id = $1");
        sqlx::query_as::<_, Artist>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Artist>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM artists WHERE slug = $1");
        sqlx::query_as::<_, Artist>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    pub async fn create(pool: &PgPool, data: &ArtistData) -> Result<Artist, sqlx::Error> {
        let query = format!(
            "INSERT INTO artists \
                (name, slug, bio, genres, city, instagram, website, spotify_url, image_url, \
                 status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Artist>(&query)
            .bind(&data.name)
            .bind(&data.slug)
            .bind(&data.bio)
            .bind(&data.genres)
            .bind(&data.city)
            .bind(&data.instagram)
            .bind(&data.website)
            .bind(&data.spotify_url)
            .bind(&data.image_url)
            .bind(data.status.as_str())
            .fetch_one(pool)
            .await
    }

    /// Overwrite every column with an already merged and validated value.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        data: &ArtistData,
    ) -> Result<Option<Artist>, sqlx::Error> {
        let query = format!(
            "UPDATE artists SET \
                name = $2, slug = $3, bio = $4, genres = $5, city = $6, instagram = $7, \
                website = $8, spotify_url = $9, image_url = $10, status = $11 \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Artist>(&query)
            .bind(id)
            .bind(&data.name)
            .bind(&data.slug)
            .bind(&data.bio)
            .bind(&data.genres)
            .bind(&data.city)
            .bind(&data.instagram)
            .bind(&data.website)
            .bind(&data.spotify_url)
            .bind(&data.image_url)
            .bind(data.status.as_str())
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM artists WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
