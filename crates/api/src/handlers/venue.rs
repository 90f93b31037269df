//! Handlers for the `/venues` resource.

use agenda_core::directory::EntityStatus;
use agenda_core::error::CoreError;
use agenda_core::pagination::Page;
use agenda_core::types::DbId;
use agenda_core::validation::directory::VenueInput;
use agenda_db::models::venue::{Venue, VenueFilter};
use agenda_db::repositories::VenueRepo;
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

const ENTITY: &str = "Local";

fn not_found(id: impl std::fmt::Display) -> AppError {
    AppError::Core(CoreError::not_found(ENTITY, id))
}

/// GET /api/v1/venues
pub async fn list(
    State(state): State<AppState>,
    Query(mut filter): Query<VenueFilter>,
) -> AppResult<Json<DataResponse<Page<Venue>>>> {
    filter
        .status
        .get_or_insert_with(|| EntityStatus::Active.as_str().to_string());
    let page = VenueRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse::new(page)))
}

/// GET /api/v1/venues/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Venue>>> {
    let venue = VenueRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse::new(venue)))
}

/// GET /api/v1/venues/slug/{slug}
pub async fn get_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<DataResponse<Venue>>> {
    let venue = VenueRepo::find_by_slug(&state.pool, &slug)
        .await?
        .ok_or_else(|| not_found(&slug))?;
    Ok(Json(DataResponse::new(venue)))
}

/// POST /api/v1/venues
pub async fn create(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    ValidatedJson(data): ValidatedJson<VenueInput>,
) -> AppResult<(StatusCode, Json<DataResponse<Venue>>)> {
    let venue = VenueRepo::create(&state.pool, &data).await?;
    tracing::info!(venue_id = %venue.id, user_id = %user.user_id, "Venue created");
    Ok((
        StatusCode::CREATED,
        Json(DataResponse::with_message(venue, "Local criado com sucesso")),
    ))
}

/// PATCH /api/v1/venues/{id}
pub async fn update(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    RequestLocale(locale): RequestLocale,
    SanitizedJson(patch): SanitizedJson,
) -> AppResult<Json<DataResponse<Venue>>> {
    let current = VenueRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    let data = patched::<VenueInput, _>(&current, patch, locale)?;
    let venue = VenueRepo::update(&state.pool, id, &data)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(venue_id = %id, user_id = %user.user_id, "Venue updated");
    Ok(Json(DataResponse::with_message(venue, "Local atualizado com sucesso")))
}

/// DELETE /api/v1/venues/{id}
///
/// Events and agenda items at this venue keep existing with no venue.
pub async fn delete(
    RequireAdmin(user): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<MessageResponse>> {
    if !VenueRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }
    tracing::info!(venue_id = %id, user_id = %user.user_id, "Venue deleted");
    Ok(Json(MessageResponse::new("Local removido com sucesso")))
}
