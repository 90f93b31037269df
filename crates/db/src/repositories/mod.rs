//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that accept
//! `&PgPool` as the first argument. Multi-table writes open their own
//! transaction and commit it before returning.

pub mod agenda_repo;
pub mod artist_repo;
pub mod event_repo;
pub mod organizer_repo;
pub mod profile_repo;
pub mod venue_repo;

pub use agenda_repo::AgendaRepo;
pub use artist_repo::ArtistRepo;
pub use event_repo::EventRepo;
pub use organizer_repo::OrganizerRepo;
pub use profile_repo::ProfileRepo;
pub use venue_repo::VenueRepo;

use agenda_core::pagination::{
    clamp_limit, clamp_offset, Page, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT,
};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

/// `%term%` with LIKE metacharacters escaped, for `ILIKE` predicates.
pub(crate) fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

/// Run a filtered, paginated listing plus its total count.
///
/// `push_filters` appends ` AND ...` predicates after a `WHERE <base>` clause
/// and is applied identically to the count and the page query.
#[allow(clippy::too_many_arguments)]
pub(crate) async fn fetch_page<T>(
    pool: &PgPool,
    from: &str,
    columns: &str,
    base_condition: &str,
    order_by: &str,
    limit: Option<i64>,
    offset: Option<i64>,
    push_filters: impl Fn(&mut QueryBuilder<'_, Postgres>),
) -> Result<Page<T>, sqlx::Error>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let limit = clamp_limit(limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT);
    let offset = clamp_offset(offset);

    let mut count =
        QueryBuilder::new(format!("SELECT COUNT(*) FROM {from} WHERE {base_condition}"));
    push_filters(&mut count);
    let total: i64 = count.build_query_scalar().fetch_one(pool).await?;

    let mut page = QueryBuilder::new(format!(
        "SELECT {columns} FROM {from} WHERE {base_condition}"
    ));
    push_filters(&mut page);
    page.push(format!(" ORDER BY {order_by} LIMIT "))
        .push_bind(limit)
        .push(" OFFSET ")
        .push_bind(offset);
    let items = page.build_query_as::<T>().fetch_all(pool).await?;

    Ok(Page {
        items,
        total,
        limit,
        offset,
    })
}
