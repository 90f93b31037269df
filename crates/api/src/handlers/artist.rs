//! Handlers for the `/artists` resource.
//!
//! Artists are only ever created here; free-text names on agenda items never
//! create directory entries.

use agenda_core::directory::EntityStatus;
use agenda_core::error::CoreError;
use agenda_core::pagination::Page;
use agenda_core::types::DbId;
use agenda_core::validation::directory::ArtistInput;
use agenda_db::models::artist::{Artist, ArtistFilter};
use agenda_db::repositories::ArtistRepo;
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

const ENTITY: &str = "Artista";

fn not_found(id: impl std::fmt::Display) -> AppError {
    AppError::Core(CoreError::not_found(ENTITY, id))
}

/// GET /api/v1/artists
pub async fn list(
    State(state): State<AppState>,
    Query(mut filter): Query<ArtistFilter>,
) -> AppResult<Json<DataResponse<Page<Artist>>>> {
    filter
        .status
        .get_or_insert_with(|| EntityStatus::Active.as_str().to_string());
    let page = ArtistRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse::new(page)))
}

/// GET /api/v1/artists/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Artist>>> {
    let artist = ArtistRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse::new(artist)))
}

/// GET /api/v1/artists/slug/{slug}
pub async fn get_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<DataResponse<Artist>>> {
    let artist = ArtistRepo::find_by_slug(&state.pool, &slug)
        .await?
        .ok_or_else(|| not_found(&slug))?;
    Ok(Json(DataResponse::new(artist)))
}

/// POST /api/v1/artists
pub async fn create(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    ValidatedJson(data): ValidatedJson<ArtistInput>,
) -> AppResult<(StatusCode, Json<DataResponse<Artist>>)> {
    let artist = ArtistRepo::create(&state.pool, &data).await?;
    tracing::info!(artist_id = %artist.id, user_id = %user.user_id, "Artist created");
    Ok((
        StatusCode::CREATED,
        Json(DataResponse::with_message(artist, "Artista criado com sucesso")),
    ))
}

/// PATCH /api/v1/artists/{id}
pub async fn update(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    RequestLocale(locale): RequestLocale,
    SanitizedJson(patch): SanitizedJson,
) -> AppResult<Json<DataResponse<Artist>>> {
    let current = ArtistRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    let data = patched::<ArtistInput, _>(&current, patch, locale)?;
    let artist = ArtistRepo::update(&state.pool, id, &data)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(artist_id = %id, user_id = %user.user_id, "Artist updated");
    Ok(Json(DataResponse::with_message(artist, "Artista atualizado com sucesso")))
}

/// DELETE /api/v1/artists/{id}
pub async fn delete(
    RequireAdmin(user): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<MessageResponse>> {
    if !ArtistRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }
    tracing::info!(artist_id = %id, user_id = %user.user_id, "Artist deleted");
    Ok(Json(MessageResponse::new("Artista removido com sucesso")))
}
