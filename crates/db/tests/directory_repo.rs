//! Integration tests for the directory and event repositories.
//!
//! - CRUD round trip for organizers, venues and artists
//! - Listing filters (status, city, genre, search)
//! - Deleting a venue or organizer detaches the events that reference it
//! - Event relations and date filters

use agenda_core::validation::directory::{
    ArtistData, ArtistInput, OrganizerData, OrganizerInput, VenueData, VenueInput,
};
use agenda_core::validation::event::{EventData, EventInput};
use agenda_core::validation::{validate_value, Locale};
use agenda_db::models::artist::ArtistFilter;
use agenda_db::models::event::EventFilter;
use agenda_db::models::organizer::OrganizerFilter;
use agenda_db::models::venue::VenueFilter;
use agenda_db::repositories::{ArtistRepo, EventRepo, OrganizerRepo, VenueRepo};
use serde_json::{json, Value};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn organizer(value: Value) -> OrganizerData {
    validate_value::<OrganizerInput>(value, Locale::PtBr).unwrap()
}

fn venue(value: Value) -> VenueData {
    validate_value::<VenueInput>(value, Locale::PtBr).unwrap()
}

fn artist(value: Value) -> ArtistData {
    validate_value::<ArtistInput>(value, Locale::PtBr).unwrap()
}

fn event(value: Value) -> EventData {
    validate_value::<EventInput>(value, Locale::PtBr).unwrap()
}

// ---------------------------------------------------------------------------
// Organizers
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_organizer_crud(pool: PgPool) {
    let created = OrganizerRepo::create(
        &pool,
        &organizer(json!({ "name": "Coletivo Sonoro", "instagram": "@coletivo.sonoro" })),
    )
    .await
    .unwrap();
    assert_eq!(created.slug, "coletivo-sonoro");
    assert_eq!(created.status, "active");

    let by_slug = OrganizerRepo::find_by_slug(&pool, "coletivo-sonoro")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_slug.id, created.id);

    let updated = OrganizerRepo::update(
        &pool,
        created.id,
        &organizer(json!({ "name": "Coletivo Sonoro", "status": "inactive" })),
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(updated.status, "inactive");
    assert!(updated.instagram.is_none(), "update overwrites every column");

    assert!(OrganizerRepo::delete(&pool, created.id).await.unwrap());
    assert!(!OrganizerRepo::delete(&pool, created.id).await.unwrap());
    assert!(OrganizerRepo::find_by_id(&pool, created.id)
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_organizer_list_filters(pool: PgPool) {
    for (name, city, status) in [
        ("Casa Azul", "porto-alegre", "active"),
        ("Casa Verde", "curitiba", "active"),
        ("Casa Roxa", "porto-alegre", "inactive"),
    ] {
        OrganizerRepo::create(
            &pool,
            &organizer(json!({ "name": name, "city": city, "status": status })),
        )
        .await
        .unwrap();
    }

    let active = OrganizerRepo::list(
        &pool,
        &OrganizerFilter {
            status: Some("active".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(active.total, 2);
    assert_eq!(active.items[0].name, "Casa Azul");

    let poa = OrganizerRepo::list(
        &pool,
        &OrganizerFilter {
            city: Some("porto-alegre".into()),
            search: Some("roxa".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(poa.total, 1);
    assert_eq!(poa.items[0].name, "Casa Roxa");
}

// ---------------------------------------------------------------------------
// Venues / artists
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_venue_neighborhood_filter_and_summary(pool: PgPool) {
    let created = VenueRepo::create(
        &pool,
        &venue(json!({
            "name": "Teatro do Bairro",
            "neighborhood": "Cidade Baixa",
            "city": "porto-alegre",
            "latitude": -30.04,
            "longitude": -51.22
        })),
    )
    .await
    .unwrap();
    VenueRepo::create(&pool, &venue(json!({ "name": "Galpão", "neighborhood": "Centro" })))
        .await
        .unwrap();

    let page = VenueRepo::list(
        &pool,
        &VenueFilter {
            neighborhood: Some("Cidade Baixa".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(page.total, 1);

    let summary = VenueRepo::find_summary(&pool, created.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(summary.slug, "teatro-do-bairro");
    assert_eq!(summary.latitude, Some(-30.04));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_artist_genre_filter(pool: PgPool) {
    ArtistRepo::create(&pool, &artist(json!({ "name": "Banda A", "genres": ["rock", "indie"] })))
        .await
        .unwrap();
    ArtistRepo::create(&pool, &artist(json!({ "name": "Banda B", "genres": ["samba"] })))
        .await
        .unwrap();

    let rock = ArtistRepo::list(
        &pool,
        &ArtistFilter {
            genre: Some("indie".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(rock.total, 1);
    assert_eq!(rock.items[0].name, "Banda A");
    assert_eq!(rock.items[0].genres, vec!["rock", "indie"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_venue_slug_unique(pool: PgPool) {
    VenueRepo::create(&pool, &venue(json!({ "name": "Bar" })))
        .await
        .unwrap();
    let err = VenueRepo::create(&pool, &venue(json!({ "name": "Bar" })))
        .await
        .unwrap_err();
    match err {
        sqlx::Error::Database(db) => assert_eq!(db.constraint(), Some("uq_venues_slug")),
        other => panic!("expected unique violation, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_event_relations_and_detach_on_delete(pool: PgPool) {
    let place = VenueRepo::create(&pool, &venue(json!({ "name": "Opinião" })))
        .await
        .unwrap();
    let host = OrganizerRepo::create(&pool, &organizer(json!({ "name": "Produtora X" })))
        .await
        .unwrap();
    let show = EventRepo::create(
        &pool,
        &event(json!({
            "title": "Show de Estreia",
            "date_start": "2026-05-20T23:00:00Z",
            "venue_id": place.id,
            "organizer_id": host.id,
            "status": "published"
        })),
    )
    .await
    .unwrap();

    let detail = EventRepo::with_relations(&pool, show.clone()).await.unwrap();
    assert_eq!(detail.venue.unwrap().name, "Opinião");
    assert_eq!(detail.organizer.unwrap().slug, "produtora-x");

    assert!(VenueRepo::delete(&pool, place.id).await.unwrap());
    let after = EventRepo::find_by_id(&pool, show.id).await.unwrap().unwrap();
    assert!(after.venue_id.is_none());
    assert_eq!(after.organizer_id, Some(host.id));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_event_date_window(pool: PgPool) {
    for (title, start, end) in [
        ("Passado", "2026-01-10T20:00:00Z", None),
        ("Longo", "2026-01-01T20:00:00Z", Some("2026-02-28T20:00:00Z")),
        ("Futuro", "2026-03-10T20:00:00Z", None),
    ] {
        EventRepo::create(
            &pool,
            &event(json!({ "title": title, "date_start": start, "date_end": end })),
        )
        .await
        .unwrap();
    }

    let window = EventRepo::list(
        &pool,
        &EventFilter {
            date_from: Some("2026-02-01T00:00:00Z".parse().unwrap()),
            date_to: Some("2026-02-28T23:59:59Z".parse().unwrap()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(window.total, 1, "multi-day events overlapping the window count");
    assert_eq!(window.items[0].title, "Longo");
}
