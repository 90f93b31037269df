//! Route definitions for the `/agenda` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::agenda;
use crate::state::AppState;

/// Routes mounted at `/agenda`.
///
/// ```text
/// GET    /                      -> list_published     (public)
/// POST   /                      -> create             (editor)
/// GET    /admin                 -> list_admin         (editor)
/// GET    /slug-exists           -> slug_exists        (public)
/// GET    /slug/{slug}           -> get_by_slug        (public)
/// GET    /{id}                  -> get_by_id          (editor)
/// PATCH  /{id}                  -> update             (editor)
/// DELETE /{id}                  -> delete             (admin)
/// GET    /{id}/preview          -> preview            (token)
/// GET    /{id}/slug-history     -> slug_history       (editor)
/// POST   /{id}/publish          -> publish            (editor)
/// POST   /{id}/unpublish        -> unpublish          (editor)
/// POST   /{id}/duplicate        -> duplicate          (editor)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(agenda::list_published).post(agenda::create))
        .route("/admin", get(agenda::list_admin))
        .route("/slug-exists", get(agenda::slug_exists))
        .route("/slug/{slug}", get(agenda::get_by_slug))
        .route(
            "/{id}",
            get(agenda::get_by_id)
                .patch(agenda::update)
                .delete(agenda::delete),
        )
        .route("/{id}/preview", get(agenda::preview))
        .route("/{id}/slug-history", get(agenda::slug_history))
        .route("/{id}/publish", post(agenda::publish))
        .route("/{id}/unpublish", post(agenda::unpublish))
        .route("/{id}/duplicate", post(agenda::duplicate))
}
