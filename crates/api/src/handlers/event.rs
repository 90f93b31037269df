//! Handlers for the `/events` resource.
//!
//! The public surface only ever shows published events; unpublished ones
//! answer 404 as if they did not exist. Editors read every status through
//! the `/admin` routes.

use agenda_core::directory::EventStatus;
use agenda_core::error::CoreError;
use agenda_core::pagination::Page;
use agenda_core::types::DbId;
use agenda_core::validation::event::EventInput;
use agenda_db::models::event::{Event, EventDetail, EventFilter};
use agenda_db::repositories::EventRepo;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use super::patched;
use crate::error::{AppError, AppResult};
use crate::middleware::params::{Path, Query};
use crate::middleware::rbac::{RequireAdmin, RequireEditor};
use crate::middleware::validation::{RequestLocale, SanitizedJson, ValidatedJson};
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;

const ENTITY: &str = "Evento";

fn not_found(id: impl std::fmt::Display) -> AppError {
    AppError::Core(CoreError::not_found(ENTITY, id))
}

fn published(event: Event) -> Option<Event> {
    (event.status == EventStatus::Published.as_str()).then_some(event)
}

/// GET /api/v1/events
pub async fn list(
    State(state): State<AppState>,
    Query(mut filter): Query<EventFilter>,
) -> AppResult<Json<DataResponse<Page<Event>>>> {
    filter.status = Some(EventStatus::Published.as_str().to_string());
    let page = EventRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse::new(page)))
}

/// GET /api/v1/events/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<EventDetail>>> {
    let event = EventRepo::find_by_id(&state.pool, id)
        .await?
        .and_then(published)
        .ok_or_else(|| not_found(id))?;
    let detail = EventRepo::with_relations(&state.pool, event).await?;
    Ok(Json(DataResponse::new(detail)))
}

/// GET /api/v1/events/slug/{slug}
pub async fn get_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<DataResponse<EventDetail>>> {
    let event = EventRepo::find_by_slug(&state.pool, &slug)
        .await?
        .and_then(published)
        .ok_or_else(|| not_found(&slug))?;
    let detail = EventRepo::with_relations(&state.pool, event).await?;
    Ok(Json(DataResponse::new(detail)))
}

/// GET /api/v1/events/admin
///
/// Any status; `?status=` narrows it.
pub async fn list_admin(
    RequireEditor(_user): RequireEditor,
    State(state): State<AppState>,
    Query(filter): Query<EventFilter>,
) -> AppResult<Json<DataResponse<Page<Event>>>> {
    let page = EventRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse::new(page)))
}

/// GET /api/v1/events/admin/{id}
pub async fn get_admin(
    RequireEditor(_user): RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<EventDetail>>> {
    let event = EventRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    let detail = EventRepo::with_relations(&state.pool, event).await?;
    Ok(Json(DataResponse::new(detail)))
}

/// POST /api/v1/events
pub async fn create(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    ValidatedJson(data): ValidatedJson<EventInput>,
) -> AppResult<(StatusCode, Json<DataResponse<Event>>)> {
    let event = EventRepo::create(&state.pool, &data).await?;
    tracing::info!(
        event_id = %event.id,
        slug = %event.slug,
        user_id = %user.user_id,
        "Event created"
    );
    Ok((
        StatusCode::CREATED,
        Json(DataResponse::with_message(event, "Evento criado com sucesso")),
    ))
}

/// PATCH /api/v1/events/{id}
pub async fn update(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    RequestLocale(locale): RequestLocale,
    SanitizedJson(patch): SanitizedJson,
) -> AppResult<Json<DataResponse<Event>>> {
    let current = EventRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    let data = patched::<EventInput, _>(&current, patch, locale)?;
    let event = EventRepo::update(&state.pool, id, &data)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(event_id = %id, user_id = %user.user_id, "Event updated");
    Ok(Json(DataResponse::with_message(event, "Evento atualizado com sucesso")))
}

/// DELETE /api/v1/events/{id}
pub async fn delete(
    RequireAdmin(user): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<MessageResponse>> {
    if !EventRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }
    tracing::info!(event_id = %id, user_id = %user.user_id, "Event deleted");
    Ok(Json(MessageResponse::new("Evento removido com sucesso")))
}
