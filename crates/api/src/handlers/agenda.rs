//! Handlers for the `/agenda` resource.
//!
//! Reads of published items and token-gated previews are public; every other
//! route needs an editor, and deletes need an admin. Role extractors come
//! first in each signature so they run before the body is read.

use agenda_core::agenda::{duplicate_title, AgendaStatus};
use agenda_core::error::CoreError;
use agenda_core::pagination::Page;
use agenda_core::slug::duplicate_slug;
use agenda_core::types::{DbId, Timestamp};
use agenda_core::validation::agenda::AgendaItemInput;
use agenda_core::validation::Locale;
use agenda_db::models::agenda::{AgendaFilter, AgendaItem, AgendaItemDetail, AgendaSlugHistory};
use agenda_db::repositories::AgendaRepo;
use agenda_db::DbPool;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use serde_json::{json, Value};

use super::{field_error, patched};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::UNAUTHORIZED_MESSAGE;
use crate::middleware::params::{Path, Query};
use crate::middleware::rbac::{RequireAdmin, RequireEditor, FORBIDDEN_MESSAGE};
use crate::middleware::validation::{
    validate_request, RequestLocale, SanitizedJson, ValidatedJson,
};
use crate::query::{PreviewParams, SlugExistsParams};
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;

const ENTITY: &str = "Item";
const STALE_MESSAGE: &str =
    "O item foi alterado por outra pessoa; recarregue antes de salvar novamente";

fn not_found(id: impl std::fmt::Display) -> AppError {
    AppError::Core(CoreError::not_found(ENTITY, id))
}

async fn load_detail(pool: &DbPool, id: DbId) -> AppResult<AgendaItemDetail> {
    AgendaRepo::find_detail(pool, id)
        .await?
        .ok_or_else(|| not_found(id))
}

fn stored_status(item: &AgendaItem) -> AppResult<AgendaStatus> {
    item.status
        .parse()
        .map_err(|e| AppError::InternalError(format!("Stored agenda status: {e}")))
}

// ---------------------------------------------------------------------------
// Public
// ---------------------------------------------------------------------------

/// GET /api/v1/agenda
pub async fn list_published(
    State(state): State<AppState>,
    Query(filter): Query<AgendaFilter>,
) -> AppResult<Json<DataResponse<Page<AgendaItem>>>> {
    let page = AgendaRepo::list_published(&state.pool, &filter).await?;
    Ok(Json(DataResponse::new(page)))
}

#[derive(Debug, Serialize)]
pub struct SlugExists {
    pub slug: String,
    pub exists: bool,
}

/// GET /api/v1/agenda/slug-exists?slug=&exclude_id=
pub async fn slug_exists(
    State(state): State<AppState>,
    RequestLocale(locale): RequestLocale,
    Query(params): Query<SlugExistsParams>,
) -> AppResult<Json<DataResponse<SlugExists>>> {
    let slug = params
        .slug
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| field_error("slug", "required", locale))?;
    let exists = AgendaRepo::slug_exists(&state.pool, &slug, params.exclude_id).await?;
    Ok(Json(DataResponse::new(SlugExists { slug, exists })))
}

/// GET /api/v1/agenda/slug/{slug}
///
/// Former slugs resolve to the item that now carries a new one.
pub async fn get_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<DataResponse<AgendaItemDetail>>> {
    let detail = AgendaRepo::find_published_by_slug(&state.pool, &slug)
        .await?
        .ok_or_else(|| not_found(&slug))?;
    Ok(Json(DataResponse::new(detail)))
}

/// GET /api/v1/agenda/{id}/preview?token=
///
/// Missing token is 401, a wrong token 403. Works for any status.
pub async fn preview(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<PreviewParams>,
) -> AppResult<Json<DataResponse<AgendaItemDetail>>> {
    let token = params
        .token
        .filter(|t| !t.trim().is_empty())
        .ok_or(AppError::Core(CoreError::Unauthorized(
            UNAUTHORIZED_MESSAGE.into(),
        )))?;

    let detail = load_detail(&state.pool, id).await?;
    if DbId::parse_str(token.trim()).ok() != Some(detail.item.preview_token) {
        tracing::warn!(agenda_item_id = %id, "Preview token mismatch");
        return Err(AppError::Core(CoreError::Forbidden(FORBIDDEN_MESSAGE.into())));
    }
    Ok(Json(DataResponse::new(detail)))
}

// ---------------------------------------------------------------------------
// Back office reads
// ---------------------------------------------------------------------------

/// GET /api/v1/agenda/admin
pub async fn list_admin(
    RequireEditor(_user): RequireEditor,
    State(state): State<AppState>,
    Query(filter): Query<AgendaFilter>,
) -> AppResult<Json<DataResponse<Page<AgendaItem>>>> {
    let page = AgendaRepo::list_admin(&state.pool, &filter).await?;
    Ok(Json(DataResponse::new(page)))
}

/// GET /api/v1/agenda/{id}
pub async fn get_by_id(
    RequireEditor(_user): RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<AgendaItemDetail>>> {
    let detail = load_detail(&state.pool, id).await?;
    Ok(Json(DataResponse::new(detail.with_preview_token())))
}

/// GET /api/v1/agenda/{id}/slug-history
pub async fn slug_history(
    RequireEditor(_user): RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<AgendaSlugHistory>>>> {
    AgendaRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    let history = AgendaRepo::slug_history(&state.pool, id).await?;
    Ok(Json(DataResponse::new(history)))
}

// ---------------------------------------------------------------------------
// Writes
// ---------------------------------------------------------------------------

/// POST /api/v1/agenda
pub async fn create(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    ValidatedJson(data): ValidatedJson<AgendaItemInput>,
) -> AppResult<(StatusCode, Json<DataResponse<AgendaItemDetail>>)> {
    let item = AgendaRepo::create(&state.pool, &data, user.user_id).await?;
    tracing::info!(
        agenda_item_id = %item.id,
        slug = %item.slug,
        user_id = %user.user_id,
        "Agenda item created"
    );
    let detail = load_detail(&state.pool, item.id).await?;
    Ok((
        StatusCode::CREATED,
        Json(DataResponse::with_message(
            detail.with_preview_token(),
            "Item criado com sucesso",
        )),
    ))
}

/// PATCH /api/v1/agenda/{id}
///
/// The body is merged over the stored item and the result is validated as a
/// whole. Child collections present in the body replace the stored ones.
/// An optional `expected_updated_at` makes the write conditional.
pub async fn update(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    RequestLocale(locale): RequestLocale,
    SanitizedJson(patch): SanitizedJson,
) -> AppResult<Json<DataResponse<AgendaItemDetail>>> {
    let (patch, expected_updated_at) = take_expected_updated_at(patch, locale)?;

    let current = AgendaRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    let data = patched::<AgendaItemInput, _>(&current, patch, locale)?;
    if !stored_status(&current)?.can_transition_to(data.status) {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Transição de status inválida: {} → {}",
            current.status, data.status
        ))));
    }

    let item = AgendaRepo::update(&state.pool, id, &data, user.user_id, expected_updated_at)
        .await?
        .ok_or_else(|| match expected_updated_at {
            Some(_) => AppError::Core(CoreError::Conflict(STALE_MESSAGE.into())),
            None => not_found(id),
        })?;

    if item.slug != current.slug {
        tracing::info!(
            agenda_item_id = %id,
            old_slug = %current.slug,
            new_slug = %item.slug,
            "Agenda item slug changed"
        );
    }
    tracing::info!(agenda_item_id = %id, user_id = %user.user_id, "Agenda item updated");

    let detail = load_detail(&state.pool, id).await?;
    Ok(Json(DataResponse::with_message(
        detail.with_preview_token(),
        "Item atualizado com sucesso",
    )))
}

/// POST /api/v1/agenda/{id}/publish
///
/// The stored item must satisfy the publish requirements.
pub async fn publish(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    RequestLocale(locale): RequestLocale,
) -> AppResult<Json<DataResponse<AgendaItem>>> {
    let current = AgendaRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    let mut candidate = serde_json::to_value(&current)
        .map_err(|e| AppError::InternalError(format!("Failed to serialize stored row: {e}")))?;
    candidate["status"] = json!(AgendaStatus::Published.as_str());
    validate_request::<AgendaItemInput>(candidate, locale)?;

    set_status(
        &state.pool,
        &current,
        AgendaStatus::Published,
        user.user_id,
    )
    .await
    .map(|item| Json(DataResponse::with_message(item, "Item publicado com sucesso")))
}

/// POST /api/v1/agenda/{id}/unpublish
pub async fn unpublish(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<AgendaItem>>> {
    let current = AgendaRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    set_status(&state.pool, &current, AgendaStatus::Draft, user.user_id)
        .await
        .map(|item| Json(DataResponse::with_message(item, "Item despublicado com sucesso")))
}

async fn set_status(
    pool: &DbPool,
    current: &AgendaItem,
    next: AgendaStatus,
    actor: DbId,
) -> AppResult<AgendaItem> {
    let from = stored_status(current)?;
    if !from.can_transition_to(next) {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Transição de status inválida: {from} → {next}"
        ))));
    }
    let item = AgendaRepo::set_status(pool, current.id, next, actor)
        .await?
        .ok_or_else(|| not_found(current.id))?;
    tracing::info!(
        agenda_item_id = %item.id,
        from = %from,
        to = %next,
        user_id = %actor,
        "Agenda item status changed"
    );
    Ok(item)
}

/// POST /api/v1/agenda/{id}/duplicate
pub async fn duplicate(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<(StatusCode, Json<DataResponse<AgendaItemDetail>>)> {
    let source = AgendaRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    let title = duplicate_title(&source.title);
    let slug = duplicate_slug(&source.slug, chrono::Utc::now().timestamp_millis());

    let copy = AgendaRepo::duplicate(&state.pool, id, &title, &slug, user.user_id)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(
        source_id = %id,
        agenda_item_id = %copy.id,
        slug = %copy.slug,
        user_id = %user.user_id,
        "Agenda item duplicated"
    );

    let detail = load_detail(&state.pool, copy.id).await?;
    Ok((
        StatusCode::CREATED,
        Json(DataResponse::with_message(
            detail.with_preview_token(),
            "Item duplicado com sucesso",
        )),
    ))
}

/// DELETE /api/v1/agenda/{id}
///
/// Soft delete. A second delete of the same item is a 404.
pub async fn delete(
    RequireAdmin(user): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<MessageResponse>> {
    if !AgendaRepo::soft_delete(&state.pool, id, user.user_id).await? {
        return Err(not_found(id));
    }
    tracing::info!(agenda_item_id = %id, user_id = %user.user_id, "Agenda item deleted");
    Ok(Json(MessageResponse::new("Item removido com sucesso")))
}

/// Split the optional concurrency token off a PATCH body.
fn take_expected_updated_at(
    mut patch: Value,
    locale: Locale,
) -> AppResult<(Value, Option<Timestamp>)> {
    let raw = patch
        .as_object_mut()
        .and_then(|body| body.remove("expected_updated_at"));
    let expected = match raw {
        None | Some(Value::Null) => None,
        Some(value) => Some(
            serde_json::from_value::<Timestamp>(value)
                .map_err(|_| field_error("expected_updated_at", "timestamp_format", locale))?,
        ),
    };
    Ok((patch, expected))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn expected_updated_at_is_split_off() {
        let body = json!({ "title": "Novo", "expected_updated_at": "2026-05-01T12:00:00.123456Z" });
        let (patch, expected) = take_expected_updated_at(body, Locale::PtBr).unwrap();
        assert_eq!(patch, json!({ "title": "Novo" }));
        assert_eq!(
            expected,
            Some("2026-05-01T12:00:00.123456Z".parse().unwrap())
        );
    }

    #[test]
    fn malformed_expected_updated_at_is_a_field_error() {
        let body = json!({ "expected_updated_at": "ontem" });
        assert_matches!(
            take_expected_updated_at(body, Locale::PtBr),
            Err(AppError::Core(CoreError::Validation(fields))) => {
                assert_eq!(fields["expected_updated_at"], "Data e hora inválidas");
            }
        );
    }
}
