//! Integration tests for the agenda repository.
//!
//! Exercises `AgendaRepo` against a real database:
//! - Create with children, read back in order
//! - Update with slug history and child replacement
//! - Optimistic concurrency through `expected_updated_at`
//! - Publish / unpublish timestamps
//! - Duplicate and soft delete
//! - Public listing filters and ordering

use agenda_core::agenda::AgendaStatus;
use agenda_core::types::DbId;
use agenda_core::validation::agenda::{AgendaItemData, AgendaItemInput};
use agenda_core::validation::{validate_value, Locale};
use agenda_db::models::agenda::AgendaFilter;
use agenda_db::models::profile::CreateProfile;
use agenda_db::repositories::{AgendaRepo, ProfileRepo};
use serde_json::{json, Value};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn editor(pool: &PgPool) -> DbId {
    ProfileRepo::create(
        pool,
        &CreateProfile {
            email: "editor@role.example".to_string(),
            display_name: Some("Editora".to_string()),
            role: "editor".to_string(),
        },
    )
    .await
    .unwrap()
    .id
}

fn data(value: Value) -> AgendaItemData {
    validate_value::<AgendaItemInput>(value, Locale::PtBr).unwrap()
}

fn draft(title: &str) -> AgendaItemData {
    data(json!({ "title": title }))
}

fn scheduled(title: &str, city: &str, start: &str, end: &str) -> AgendaItemData {
    data(json!({
        "title": title,
        "city": city,
        "start_at_utc": start,
        "end_at_utc": end,
        "status": "scheduled",
    }))
}

async fn publish(pool: &PgPool, id: DbId, actor: DbId) {
    AgendaRepo::set_status(pool, id, AgendaStatus::Published, actor)
        .await
        .unwrap()
        .unwrap();
}

// ---------------------------------------------------------------------------
// Create / read
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_with_children(pool: PgPool) {
    let actor = editor(&pool).await;
    let input = data(json!({
        "title": "Festival de Inverno",
        "occurrences": [
            { "start_at_utc": "2026-07-10T22:00:00Z", "end_at_utc": "2026-07-11T01:00:00Z" },
            { "start_at_utc": "2026-07-11T22:00:00Z" }
        ],
        "ticket_tiers": [
            { "name": "Pista", "price": 40.0 },
            { "name": "Camarote", "price": 120.0, "available": false }
        ],
        "media": [{ "kind": "video", "url": "https://video.example/teaser" }]
    }));

    let item = AgendaRepo::create(&pool, &input, actor).await.unwrap();
    assert_eq!(item.slug, "festival-de-inverno");
    assert_eq!(item.status, "draft");
    assert_eq!(item.created_by, Some(actor));
    assert!(item.published_at.is_none());

    let detail = AgendaRepo::find_detail(&pool, item.id).await.unwrap().unwrap();
    assert_eq!(detail.occurrences.len(), 2);
    assert_eq!(detail.occurrences[0].sort_order, 0);
    assert!(detail.occurrences[1].end_at_utc.is_none());
    assert_eq!(detail.ticket_tiers[0].name, "Pista");
    assert_eq!(detail.ticket_tiers[0].currency, "BRL");
    assert!(!detail.ticket_tiers[1].available);
    assert_eq!(detail.media[0].kind, "video");
    assert!(detail.preview_token.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_published_stamps_published_at(pool: PgPool) {
    let actor = editor(&pool).await;
    let mut input = scheduled(
        "Show",
        "porto-alegre",
        "2026-05-01T23:00:00Z",
        "2026-05-02T02:00:00Z",
    );
    input.status = AgendaStatus::Published;

    let item = AgendaRepo::create(&pool, &input, actor).await.unwrap();
    assert!(item.published_at.is_some());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_slug_violates_unique_constraint(pool: PgPool) {
    let actor = editor(&pool).await;
    AgendaRepo::create(&pool, &draft("Samba na Praça"), actor)
        .await
        .unwrap();

    let err = AgendaRepo::create(&pool, &draft("Samba na Praça"), actor)
        .await
        .unwrap_err();
    match err {
        sqlx::Error::Database(db) => {
            assert_eq!(db.code().as_deref(), Some("23505"));
            assert_eq!(db.constraint(), Some("uq_agenda_itens_slug"));
        }
        other => panic!("expected unique violation, got {other:?}"),
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_slug_exists_excludes_self(pool: PgPool) {
    let actor = editor(&pool).await;
    let item = AgendaRepo::create(&pool, &draft("Jazz no Parque"), actor)
        .await
        .unwrap();

    assert!(AgendaRepo::slug_exists(&pool, "jazz-no-parque", None).await.unwrap());
    assert!(!AgendaRepo::slug_exists(&pool, "jazz-no-parque", Some(item.id))
        .await
        .unwrap());
    assert!(!AgendaRepo::slug_exists(&pool, "outro", None).await.unwrap());
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_records_slug_history(pool: PgPool) {
    let actor = editor(&pool).await;
    let item = AgendaRepo::create(&pool, &draft("Noite Gótica"), actor)
        .await
        .unwrap();

    let mut changed = draft("Noite Gótica");
    changed.slug = "noite-gotica-2026".to_string();
    let updated = AgendaRepo::update(&pool, item.id, &changed, actor, None)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.slug, "noite-gotica-2026");

    let history = AgendaRepo::slug_history(&pool, item.id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].old_slug, "noite-gotica");
    assert_eq!(history[0].new_slug, "noite-gotica-2026");
    assert_eq!(history[0].changed_by, Some(actor));

    // Same slug again: no new history row.
    AgendaRepo::update(&pool, item.id, &changed, actor, None)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(AgendaRepo::slug_history(&pool, item.id).await.unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_replaces_only_present_children(pool: PgPool) {
    let actor = editor(&pool).await;
    let item = AgendaRepo::create(
        &pool,
        &data(json!({
            "title": "Feira",
            "occurrences": [{ "start_at_utc": "2026-03-01T13:00:00Z" }],
            "ticket_tiers": [{ "name": "Único" }]
        })),
        actor,
    )
    .await
    .unwrap();

    let patch = data(json!({
        "title": "Feira",
        "occurrences": [
            { "start_at_utc": "2026-03-08T13:00:00Z" },
            { "start_at_utc": "2026-03-15T13:00:00Z" }
        ]
    }));
    AgendaRepo::update(&pool, item.id, &patch, actor, None)
        .await
        .unwrap()
        .unwrap();

    let detail = AgendaRepo::find_detail(&pool, item.id).await.unwrap().unwrap();
    assert_eq!(detail.occurrences.len(), 2);
    assert_eq!(detail.ticket_tiers.len(), 1, "absent collection is kept");

    let clear = data(json!({ "title": "Feira", "ticket_tiers": [] }));
    AgendaRepo::update(&pool, item.id, &clear, actor, None)
        .await
        .unwrap()
        .unwrap();
    let detail = AgendaRepo::find_detail(&pool, item.id).await.unwrap().unwrap();
    assert!(detail.ticket_tiers.is_empty());
    assert_eq!(detail.occurrences.len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_with_stale_timestamp_is_rejected(pool: PgPool) {
    let actor = editor(&pool).await;
    let item = AgendaRepo::create(&pool, &draft("Sarau"), actor).await.unwrap();

    let fresh = AgendaRepo::update(&pool, item.id, &draft("Sarau"), actor, Some(item.updated_at))
        .await
        .unwrap();
    assert!(fresh.is_some());

    // `item.updated_at` is now stale.
    let stale = AgendaRepo::update(
        &pool,
        item.id,
        &draft("Sarau Novo"),
        actor,
        Some(item.updated_at),
    )
    .await
    .unwrap();
    assert!(stale.is_none());

    let current = AgendaRepo::find_by_id(&pool, item.id).await.unwrap().unwrap();
    assert_eq!(current.title, "Sarau");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_missing_item_returns_none(pool: PgPool) {
    let actor = editor(&pool).await;
    let result = AgendaRepo::update(&pool, DbId::new_v4(), &draft("Nada"), actor, None)
        .await
        .unwrap();
    assert!(result.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_follows_status_for_published_at(pool: PgPool) {
    let actor = editor(&pool).await;
    let mut input = scheduled(
        "Cineclube",
        "porto-alegre",
        "2026-08-14T22:00:00Z",
        "2026-08-15T00:00:00Z",
    );
    let item = AgendaRepo::create(&pool, &input, actor).await.unwrap();
    publish(&pool, item.id, actor).await;

    input.status = AgendaStatus::Published;
    let still_published = AgendaRepo::update(&pool, item.id, &input, actor, None)
        .await
        .unwrap()
        .unwrap();
    assert!(still_published.published_at.is_some());

    input.status = AgendaStatus::Draft;
    let drafted = AgendaRepo::update(&pool, item.id, &input, actor, None)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(drafted.status, "draft");
    assert!(drafted.published_at.is_none());
}

// ---------------------------------------------------------------------------
// Status transitions
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_publish_keeps_first_published_at(pool: PgPool) {
    let actor = editor(&pool).await;
    let item = AgendaRepo::create(
        &pool,
        &scheduled("Roda", "curitiba", "2026-04-04T20:00:00Z", "2026-04-04T23:00:00Z"),
        actor,
    )
    .await
    .unwrap();

    let published = AgendaRepo::set_status(&pool, item.id, AgendaStatus::Published, actor)
        .await
        .unwrap()
        .unwrap();
    let first = published.published_at.unwrap();

    let again = AgendaRepo::set_status(&pool, item.id, AgendaStatus::Published, actor)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(again.published_at, Some(first));

    let unpublished = AgendaRepo::set_status(&pool, item.id, AgendaStatus::Draft, actor)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(unpublished.status, "draft");
    assert!(unpublished.published_at.is_none());
}

// ---------------------------------------------------------------------------
// Duplicate / delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_copies_children_as_draft(pool: PgPool) {
    let actor = editor(&pool).await;
    let mut input = data(json!({
        "title": "Baile",
        "city": "sao-paulo",
        "start_at_utc": "2026-06-06T23:00:00Z",
        "end_at_utc": "2026-06-07T03:00:00Z",
        "tags": ["funk"],
        "ticket_tiers": [{ "name": "Lote 1", "price": 30.0 }]
    }));
    input.status = AgendaStatus::Published;
    let item = AgendaRepo::create(&pool, &input, actor).await.unwrap();

    let copy = AgendaRepo::duplicate(&pool, item.id, "Baile (cópia)", "baile-copia", actor)
        .await
        .unwrap()
        .unwrap();
    assert_ne!(copy.id, item.id);
    assert_eq!(copy.title, "Baile (cópia)");
    assert_eq!(copy.slug, "baile-copia");
    assert_eq!(copy.status, "draft");
    assert!(copy.published_at.is_none());
    assert_ne!(copy.preview_token, item.preview_token);
    assert_eq!(copy.tags, vec!["funk"]);
    assert_eq!(copy.city.as_deref(), Some("sao-paulo"));

    let detail = AgendaRepo::find_detail(&pool, copy.id).await.unwrap().unwrap();
    assert_eq!(detail.ticket_tiers.len(), 1);
    assert_eq!(detail.ticket_tiers[0].name, "Lote 1");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_soft_delete_hides_and_archives(pool: PgPool) {
    let actor = editor(&pool).await;
    let item = AgendaRepo::create(&pool, &draft("Apagar"), actor).await.unwrap();

    assert!(AgendaRepo::soft_delete(&pool, item.id, actor).await.unwrap());
    assert!(!AgendaRepo::soft_delete(&pool, item.id, actor).await.unwrap());
    assert!(AgendaRepo::find_by_id(&pool, item.id).await.unwrap().is_none());

    let (status, deleted): (String, bool) =
        sqlx::query_as("SELECT status, deleted_at IS NOT NULL FROM agenda_itens WHERE id = $1")
            .bind(item.id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(status, "archived");
    assert!(deleted);

    // The slug stays reserved.
    assert!(AgendaRepo::slug_exists(&pool, "apagar", None).await.unwrap());
}

// ---------------------------------------------------------------------------
// Listings
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_public_listing_only_shows_published(pool: PgPool) {
    let actor = editor(&pool).await;
    let visible = AgendaRepo::create(
        &pool,
        &scheduled("Visível", "porto-alegre", "2026-08-01T22:00:00Z", "2026-08-02T01:00:00Z"),
        actor,
    )
    .await
    .unwrap();
    publish(&pool, visible.id, actor).await;
    AgendaRepo::create(&pool, &draft("Rascunho"), actor).await.unwrap();

    let page = AgendaRepo::list_published(&pool, &AgendaFilter::default())
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].id, visible.id);

    let admin = AgendaRepo::list_admin(&pool, &AgendaFilter::default())
        .await
        .unwrap();
    assert_eq!(admin.total, 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_public_listing_filters_and_orders(pool: PgPool) {
    let actor = editor(&pool).await;
    let mut early = scheduled(
        "Cedo",
        "porto-alegre",
        "2026-08-01T22:00:00Z",
        "2026-08-02T01:00:00Z",
    );
    early.tags = vec!["rock".to_string()];
    let mut late = scheduled(
        "Tarde",
        "porto-alegre",
        "2026-09-01T22:00:00Z",
        "2026-09-02T01:00:00Z",
    );
    late.tags = vec!["samba".to_string()];
    let mut boosted = scheduled(
        "Destaque",
        "curitiba",
        "2026-10-01T22:00:00Z",
        "2026-10-02T01:00:00Z",
    );
    boosted.priority = 90;

    let mut ids = Vec::new();
    for input in [&early, &late, &boosted] {
        let item = AgendaRepo::create(&pool, input, actor).await.unwrap();
        publish(&pool, item.id, actor).await;
        ids.push(item.id);
    }

    let all = AgendaRepo::list_published(&pool, &AgendaFilter::default())
        .await
        .unwrap();
    let order: Vec<DbId> = all.items.iter().map(|i| i.id).collect();
    assert_eq!(order, vec![ids[2], ids[0], ids[1]]);

    let city = AgendaRepo::list_published(
        &pool,
        &AgendaFilter {
            city: Some("porto-alegre".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(city.total, 2);

    let tagged = AgendaRepo::list_published(
        &pool,
        &AgendaFilter {
            tags: Some("samba,jazz".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(tagged.total, 1);
    assert_eq!(tagged.items[0].title, "Tarde");

    let search = AgendaRepo::list_published(
        &pool,
        &AgendaFilter {
            search: Some("desta".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(search.total, 1);

    let paged = AgendaRepo::list_published(
        &pool,
        &AgendaFilter {
            limit: Some(1),
            offset: Some(1),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(paged.total, 3);
    assert_eq!(paged.items.len(), 1);
    assert_eq!(paged.items[0].id, ids[0]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_find_published_by_old_slug(pool: PgPool) {
    let actor = editor(&pool).await;
    let item = AgendaRepo::create(
        &pool,
        &scheduled("Tributo", "florianopolis", "2026-11-11T22:00:00Z", "2026-11-12T00:00:00Z"),
        actor,
    )
    .await
    .unwrap();
    publish(&pool, item.id, actor).await;

    let mut renamed = scheduled(
        "Tributo",
        "florianopolis",
        "2026-11-11T22:00:00Z",
        "2026-11-12T00:00:00Z",
    );
    renamed.status = AgendaStatus::Published;
    renamed.slug = "tributo-2026".to_string();
    AgendaRepo::update(&pool, item.id, &renamed, actor, None)
        .await
        .unwrap()
        .unwrap();

    let by_new = AgendaRepo::find_published_by_slug(&pool, "tributo-2026")
        .await
        .unwrap()
        .unwrap();
    let by_old = AgendaRepo::find_published_by_slug(&pool, "tributo")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_new.item.id, item.id);
    assert_eq!(by_old.item.id, item.id);
    assert_eq!(by_old.item.slug, "tributo-2026");

    AgendaRepo::set_status(&pool, item.id, AgendaStatus::Draft, actor)
        .await
        .unwrap();
    assert!(AgendaRepo::find_published_by_slug(&pool, "tributo-2026")
        .await
        .unwrap()
        .is_none());
}
