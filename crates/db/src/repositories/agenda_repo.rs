//! Repository for `agenda_itens` and its child tables.
//!
//! Every write that touches more than one table runs in a single transaction:
//! the parent row, the slug-history entry and the child replacement commit
//! together or not at all.

use agenda_core::agenda::AgendaStatus;
use agenda_core::pagination::Page;
use agenda_core::types::{DbId, Timestamp};
use agenda_core::validation::agenda::AgendaItemData;
use sqlx::postgres::PgArguments;
use sqlx::query::QueryAs;
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};

use super::{fetch_page, like_pattern};
use crate::models::agenda::{
    AgendaFilter, AgendaItem, AgendaItemDetail, AgendaMedia, AgendaOccurrence, AgendaSlugHistory,
    AgendaTicketTier,
};

/// Column list for the `agenda_itens` table.
const COLUMNS: &str = "id, title, slug, subtitle, listing_type, visibility_type, city, \
    start_at_utc, end_at_utc, summary, cover_url, cover_alt, organizer_id, venue_id, \
    artist_ids, artists_names, ticket_url, source_url, price_min, price_max, currency, status, \
    priority, tags, seo_title, seo_description, noindex, preview_token, published_at, \
    created_by, updated_by, created_at, updated_at, deleted_at";

/// Columns written from [`AgendaItemData`], in bind order `$1..$26`.
const DATA_COLUMNS: &str = "title, slug, subtitle, listing_type, visibility_type, city, \
    start_at_utc, end_at_utc, summary, cover_url, cover_alt, organizer_id, venue_id, \
    artist_ids, artists_names, ticket_url, source_url, price_min, price_max, currency, status, \
    priority, tags, seo_title, seo_description, noindex";

/// Columns copied verbatim when duplicating an item.
const COPIED_COLUMNS: &str = "subtitle, listing_type, visibility_type, city, start_at_utc, \
    end_at_utc, summary, cover_url, cover_alt, organizer_id, venue_id, artist_ids, \
    artists_names, ticket_url, source_url, price_min, price_max, currency, priority, tags, \
    seo_title, seo_description, noindex";

/// Bind position of `status` within [`DATA_COLUMNS`].
const STATUS_PARAM: usize = 21;
const DATA_PARAMS: usize = 26;

const OCCURRENCE_COLUMNS: &str = "id, agenda_item_id, start_at_utc, end_at_utc, sort_order";
const TIER_COLUMNS: &str = "id, agenda_item_id, name, price, currency, available, sort_order";
const MEDIA_COLUMNS: &str = "id, agenda_item_id, kind, url, alt_text, sort_order";

type ItemQuery<'q> = QueryAs<'q, Postgres, AgendaItem, PgArguments>;

/// Bind the [`DATA_COLUMNS`] values in order.
fn bind_data<'q>(query: ItemQuery<'q>, data: &'q AgendaItemData) -> ItemQuery<'q> {
    query
        .bind(&data.title)
        .bind(&data.slug)
        .bind(&data.subtitle)
        .bind(data.listing_type.map(|v| v.as_str()))
        .bind(data.visibility_type.as_str())
        .bind(data.city.map(|v| v.as_str()))
        .bind(data.start_at_utc)
        .bind(data.end_at_utc)
        .bind(&data.summary)
        .bind(&data.cover_url)
        .bind(&data.cover_alt)
        .bind(data.organizer_id)
        .bind(data.venue_id)
        .bind(&data.artist_ids)
        .bind(&data.artists_names)
        .bind(&data.ticket_url)
        .bind(&data.source_url)
        .bind(data.price_min)
        .bind(data.price_max)
        .bind(&data.currency)
        .bind(data.status.as_str())
        .bind(data.priority)
        .bind(&data.tags)
        .bind(&data.seo_title)
        .bind(&data.seo_description)
        .bind(data.noindex)
}

pub struct AgendaRepo;

impl AgendaRepo {
    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// Published, non-deleted items; highest priority first, then soonest.
    pub async fn list_published(
        pool: &PgPool,
        filter: &AgendaFilter,
    ) -> Result<Page<AgendaItem>, sqlx::Error> {
        Self::list_where(
            pool,
            "deleted_at IS NULL AND status = 'published'",
            "priority DESC, start_at_utc ASC NULLS LAST, id ASC",
            filter,
            false,
        )
        .await
    }

    /// Non-deleted items of any status, most recently edited first.
    pub async fn list_admin(
        pool: &PgPool,
        filter: &AgendaFilter,
    ) -> Result<Page<AgendaItem>, sqlx::Error> {
        Self::list_where(pool, "deleted_at IS NULL", "updated_at DESC, id ASC", filter, true).await
    }

    async fn list_where(
        pool: &PgPool,
        base_condition: &str,
        order_by: &str,
        filter: &AgendaFilter,
        honor_status: bool,
    ) -> Result<Page<AgendaItem>, sqlx::Error> {
        let tags = filter.tag_list();
        fetch_page(
            pool,
            "agenda_itens",
            COLUMNS,
            base_condition,
            order_by,
            filter.limit,
            filter.offset,
            |qb| {
                if honor_status {
                    if let Some(status) = &filter.status {
                        qb.push(" AND status = ").push_bind(status.clone());
                    }
                }
                if let Some(city) = &filter.city {
                    qb.push(" AND city = ").push_bind(city.clone());
                }
                if let Some(listing_type) = &filter.listing_type {
                    qb.push(" AND listing_type = ").push_bind(listing_type.clone());
                }
                if let Some(from) = filter.date_from {
                    qb.push(" AND COALESCE(end_at_utc, start_at_utc) >= ")
                        .push_bind(from);
                }
                if let Some(to) = filter.date_to {
                    qb.push(" AND start_at_utc <= ").push_bind(to);
                }
                if !tags.is_empty() {
                    qb.push(" AND tags && ").push_bind(tags.clone());
                }
                if let Some(search) = &filter.search {
                    let pattern = like_pattern(search);
                    qb.push(" AND (title ILIKE ")
                        .push_bind(pattern.clone())
                        .push(" OR summary ILIKE ")
                        .push_bind(pattern)
                        .push(")");
                }
            },
        )
        .await
    }

    /// Whether `slug` is taken, optionally ignoring one item (the one being edited).
    ///
    /// Soft-deleted items still hold their slug.
    pub async fn slug_exists(
        pool: &PgPool,
        slug: &str,
        exclude_id: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (\
                SELECT 1 FROM agenda_itens \
                WHERE slug = $1 AND ($2::uuid IS NULL OR id <> $2)\
             )",
        )
        .bind(slug)
        .bind(exclude_id)
        .fetch_one(pool)
        .await
    }

    /// Find a non-deleted item by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<AgendaItem>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM agenda_itens WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, AgendaItem>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a non-deleted item by ID, with its children.
    pub async fn find_detail(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<AgendaItemDetail>, sqlx::Error> {
        match Self::find_by_id(pool, id).await? {
            Some(item) => Ok(Some(Self::with_children(pool, item).await?)),
            None => Ok(None),
        }
    }

    /// Find a published item by its current slug or, failing that, by a slug
    /// it used to have.
    pub async fn find_published_by_slug(
        pool: &PgPool,
        slug: &str,
    ) -> Result<Option<AgendaItemDetail>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM agenda_itens \
             WHERE deleted_at IS NULL AND status = 'published' \
               AND (slug = $1 OR id = (\
                    SELECT agenda_item_id FROM agenda_slug_history \
                    WHERE old_slug = $1 \
                    ORDER BY changed_at DESC LIMIT 1)) \
             ORDER BY (slug = $1) DESC \
             LIMIT 1"
        );
        let item = sqlx::query_as::<_, AgendaItem>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await?;
        match item {
            Some(item) => Ok(Some(Self::with_children(pool, item).await?)),
            None => Ok(None),
        }
    }

    /// Slug changes of an item, newest first.
    pub async fn slug_history(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Vec<AgendaSlugHistory>, sqlx::Error> {
        sqlx::query_as::<_, AgendaSlugHistory>(
            "SELECT id, agenda_item_id, old_slug, new_slug, changed_by, changed_at \
             FROM agenda_slug_history \
             WHERE agenda_item_id = $1 \
             ORDER BY changed_at DESC, id",
        )
        .bind(id)
        .fetch_all(pool)
        .await
    }

    async fn with_children(
        pool: &PgPool,
        item: AgendaItem,
    ) -> Result<AgendaItemDetail, sqlx::Error> {
        let occurrences = sqlx::query_as::<_, AgendaOccurrence>(&format!(
            "SELECT {OCCURRENCE_COLUMNS} FROM agenda_occurrences \
             WHERE agenda_item_id = $1 ORDER BY sort_order, start_at_utc"
        ))
        .bind(item.id)
        .fetch_all(pool)
        .await?;
        let ticket_tiers = sqlx::query_as::<_, AgendaTicketTier>(&format!(
            "SELECT {TIER_COLUMNS} FROM agenda_ticket_tiers \
             WHERE agenda_item_id = $1 ORDER BY sort_order"
        ))
        .bind(item.id)
        .fetch_all(pool)
        .await?;
        let media = sqlx::query_as::<_, AgendaMedia>(&format!(
            "SELECT {MEDIA_COLUMNS} FROM agenda_media \
             WHERE agenda_item_id = $1 ORDER BY sort_order"
        ))
        .bind(item.id)
        .fetch_all(pool)
        .await?;

        Ok(AgendaItemDetail {
            item,
            occurrences,
            ticket_tiers,
            media,
            preview_token: None,
        })
    }

    // -----------------------------------------------------------------------
    // Writes
    // -----------------------------------------------------------------------

    /// Insert an item and any children it carries. A fresh preview token is
    /// generated by the database.
    pub async fn create(
        pool: &PgPool,
        data: &AgendaItemData,
        actor: DbId,
    ) -> Result<AgendaItem, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO agenda_itens ({DATA_COLUMNS}, created_by, updated_by, published_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, \
                     $17, $18, $19, $20, $21, $22, $23, $24, $25, $26, $27, $27, \
                     CASE WHEN ${STATUS_PARAM} = 'published' THEN NOW() END) \
             RETURNING {COLUMNS}"
        );
        let item = bind_data(sqlx::query_as::<_, AgendaItem>(&query), data)
            .bind(actor)
            .fetch_one(&mut *tx)
            .await?;

        Self::replace_children_inner(&mut tx, item.id, data).await?;

        tx.commit().await?;
        Ok(item)
    }

    /// Overwrite an item with an already merged and validated value.
    ///
    /// When the slug changes the old one is recorded in the history table.
    /// `published_at` follows the same rule as [`AgendaRepo::set_status`].
    /// Children present in `data` replace the stored ones. With
    /// `expected_updated_at` the write only applies if the row was not
    /// modified since; otherwise (and when the item does not exist) `None`
    /// is returned and nothing is written.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        data: &AgendaItemData,
        actor: DbId,
        expected_updated_at: Option<Timestamp>,
    ) -> Result<Option<AgendaItem>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let current_slug = sqlx::query_scalar::<_, String>(
            "SELECT slug FROM agenda_itens WHERE id = $1 AND deleted_at IS NULL FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some(current_slug) = current_slug else {
            return Ok(None);
        };

        let id_param = DATA_PARAMS + 2;
        let expected_param = DATA_PARAMS + 3;
        let query = format!(
            "UPDATE agenda_itens SET ({DATA_COLUMNS}, updated_by) = \
                ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, \
                 $17, $18, $19, $20, $21, $22, $23, $24, $25, $26, $27), \
                published_at = CASE WHEN ${STATUS_PARAM} = 'published' \
                    THEN COALESCE(published_at, NOW()) ELSE NULL END \
             WHERE id = ${id_param} AND deleted_at IS NULL \
               AND (${expected_param}::timestamptz IS NULL OR updated_at = ${expected_param}) \
             RETURNING {COLUMNS}"
        );
        let item = bind_data(sqlx::query_as::<_, AgendaItem>(&query), data)
            .bind(actor)
            .bind(id)
            .bind(expected_updated_at)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(item) = item else {
            return Ok(None);
        };

        if current_slug != item.slug {
            sqlx::query(
                "INSERT INTO agenda_slug_history (agenda_item_id, old_slug, new_slug, changed_by) \
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(id)
            .bind(&current_slug)
            .bind(&item.slug)
            .bind(actor)
            .execute(&mut *tx)
            .await?;
        }

        Self::replace_children_inner(&mut tx, id, data).await?;

        tx.commit().await?;
        Ok(Some(item))
    }

    /// Move a non-deleted item to `status`.
    ///
    /// Publishing stamps `published_at` if it is not already set; any other
    /// status clears it.
    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        status: AgendaStatus,
        actor: DbId,
    ) -> Result<Option<AgendaItem>, sqlx::Error> {
        let query = format!(
            "UPDATE agenda_itens SET \
                status = $2, \
                updated_by = $3, \
                published_at = CASE WHEN $2 = 'published' \
                    THEN COALESCE(published_at, NOW()) ELSE NULL END \
             WHERE id = $1 AND deleted_at IS NULL \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AgendaItem>(&query)
            .bind(id)
            .bind(status.as_str())
            .bind(actor)
            .fetch_optional(pool)
            .await
    }

    /// Copy an item and all of its children as a new draft.
    ///
    /// The copy gets `new_title`, `new_slug`, a new preview token
    /// and no `published_at`. Returns `None` if the source does not exist.
    pub async fn duplicate(
        pool: &PgPool,
        id: DbId,
        new_title: &str,
        new_slug: &str,
        actor: DbId,
    ) -> Result<Option<AgendaItem>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO agenda_itens \
                (title, slug, status, created_by, updated_by, {COPIED_COLUMNS}) \
             SELECT $2, $3, 'draft', $4, $4, {COPIED_COLUMNS} \
             FROM agenda_itens WHERE id = $1 AND deleted_at IS NULL \
             RETURNING {COLUMNS}"
        );
        let copy = sqlx::query_as::<_, AgendaItem>(&query)
            .bind(id)
            .bind(new_title)
            .bind(new_slug)
            .bind(actor)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(copy) = copy else {
            return Ok(None);
        };

        sqlx::query(
            "INSERT INTO agenda_occurrences (agenda_item_id, start_at_utc, end_at_utc, sort_order) \
             SELECT $2, start_at_utc, end_at_utc, sort_order \
             FROM agenda_occurrences WHERE agenda_item_id = $1",
        )
        .bind(id)
        .bind(copy.id)
        .execute(&mut *tx)
        .await?;
        sqlx::query(
            "INSERT INTO agenda_ticket_tiers \
                (agenda_item_id, name, price, currency, available, sort_order) \
             SELECT $2, name, price, currency, available, sort_order \
             FROM agenda_ticket_tiers WHERE agenda_item_id = $1",
        )
        .bind(id)
        .bind(copy.id)
        .execute(&mut *tx)
        .await?;
        sqlx::query(
            "INSERT INTO agenda_media (agenda_item_id, kind, url, alt_text, sort_order) \
             SELECT $2, kind, url, alt_text, sort_order \
             FROM agenda_media WHERE agenda_item_id = $1",
        )
        .bind(id)
        .bind(copy.id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(copy))
    }

    /// Soft-delete an item: stamp `deleted_at` and archive it.
    ///
    /// Returns `false` if the item does not exist or is already deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId, actor: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE agenda_itens \
             SET deleted_at = NOW(), status = 'archived', updated_by = $2 \
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(actor)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    /// Replace each child collection present in `data`, within `tx`.
    async fn replace_children_inner(
        tx: &mut Transaction<'_, Postgres>,
        item_id: DbId,
        data: &AgendaItemData,
    ) -> Result<(), sqlx::Error> {
        if let Some(occurrences) = &data.occurrences {
            sqlx::query("DELETE FROM agenda_occurrences WHERE agenda_item_id = $1")
                .bind(item_id)
                .execute(&mut **tx)
                .await?;
            if !occurrences.is_empty() {
                let mut qb = QueryBuilder::<Postgres>::new(
                    "INSERT INTO agenda_occurrences \
                        (agenda_item_id, start_at_utc, end_at_utc, sort_order) ",
                );
                qb.push_values(occurrences.iter().enumerate(), |mut row, (i, o)| {
                    row.push_bind(item_id)
                        .push_bind(o.start_at_utc)
                        .push_bind(o.end_at_utc)
                        .push_bind(i as i32);
                });
                qb.build().execute(&mut **tx).await?;
            }
        }

        if let Some(tiers) = &data.ticket_tiers {
            sqlx::query("DELETE FROM agenda_ticket_tiers WHERE agenda_item_id = $1")
                .bind(item_id)
                .execute(&mut **tx)
                .await?;
            if !tiers.is_empty() {
                let mut qb = QueryBuilder::<Postgres>::new(
                    "INSERT INTO agenda_ticket_tiers \
                        (agenda_item_id, name, price, currency, available, sort_order) ",
                );
                qb.push_values(tiers.iter().enumerate(), |mut row, (i, t)| {
                    row.push_bind(item_id)
                        .push_bind(t.name.clone())
                        .push_bind(t.price)
                        .push_bind(t.currency.clone())
                        .push_bind(t.available)
                        .push_bind(i as i32);
                });
                qb.build().execute(&mut **tx).await?;
            }
        }

        if let Some(media) = &data.media {
            sqlx::query("DELETE FROM agenda_media WHERE agenda_item_id = $1")
                .bind(item_id)
                .execute(&mut **tx)
                .await?;
            if !media.is_empty() {
                let mut qb = QueryBuilder::<Postgres>::new(
                    "INSERT INTO agenda_media (agenda_item_id, kind, url, alt_text, sort_order) ",
                );
                qb.push_values(media.iter().enumerate(), |mut row, (i, m)| {
                    row.push_bind(item_id)
                        .push_bind(m.kind.as_str())
                        .push_bind(m.url.clone())
                        .push_bind(m.alt_text.clone())
                        .push_bind(i as i32);
                });
                qb.build().execute(&mut **tx).await?;
            }
        }

        Ok(())
    }
}
