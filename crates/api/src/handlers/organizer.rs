//! Handlers for the `/organizers` resource.

use agenda_core::directory::EntityStatus;
use agenda_core::error::CoreError;
use agenda_core::pagination::Page;
use agenda_core::types::DbId;
use agenda_core::validation::directory::OrganizerInput;
use agenda_db::models::organizer::{Organizer, OrganizerFilter};
use agenda_db::repositories::OrganizerRepo;
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

const ENTITY: &str = "Organizador";

fn not_found(id: impl std::fmt::Display) -> AppError {
    AppError::Core(CoreError::not_found(ENTITY, id))
}

/// GET /api/v1/organizers
///
/// Defaults to active organizers; `?status=inactive` lists the others.
pub async fn list(
    State(state): State<AppState>,
    Query(mut filter): Query<OrganizerFilter>,
) -> AppResult<Json<DataResponse<Page<Organizer>>>> {
    filter
        .status
        .get_or_insert_with(|| EntityStatus::Active.as_str().to_string());
    let page = OrganizerRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse::new(page)))
}

/// GET /api/v1/organizers/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Organizer>>> {
    let organizer = OrganizerRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse::new(organizer)))
}

/// GET /api/v1/organizers/slug/{slug}
pub async fn get_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<DataResponse<Organizer>>> {
    let organizer = OrganizerRepo::find_by_slug(&state.pool, &slug)
        .await?
        .ok_or_else(|| not_found(&slug))?;
    Ok(Json(DataResponse::new(organizer)))
}

/// POST /api/v1/organizers
pub async fn create(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    ValidatedJson(data): ValidatedJson<OrganizerInput>,
) -> AppResult<(StatusCode, Json<DataResponse<Organizer>>)> {
    let organizer = OrganizerRepo::create(&state.pool, &data).await?;
    tracing::info!(organizer_id = %organizer.id, user_id = %user.user_id, "Organizer created");
    Ok((
        StatusCode::CREATED,
        Json(DataResponse::with_message(
            organizer,
            "Organizador criado com sucesso",
        )),
    ))
}

/// PATCH /api/v1/organizers/{id}
pub async fn update(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    RequestLocale(locale): RequestLocale,
    SanitizedJson(patch): SanitizedJson,
) -> AppResult<Json<DataResponse<Organizer>>> {
    let current = OrganizerRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    let data = patched::<OrganizerInput, _>(&current, patch, locale)?;
    let organizer = OrganizerRepo::update(&state.pool, id, &data)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(organizer_id = %id, user_id = %user.user_id, "Organizer updated");
    Ok(Json(DataResponse::with_message(
        organizer,
        "Organizador atualizado com sucesso",
    )))
}

/// DELETE /api/v1/organizers/{id}
pub async fn delete(
    RequireAdmin(user): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<MessageResponse>> {
    if !OrganizerRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }
    tracing::info!(organizer_id = %id, user_id = %user.user_id, "Organizer deleted");
    Ok(Json(MessageResponse::new("Organizador removido com sucesso")))
}
