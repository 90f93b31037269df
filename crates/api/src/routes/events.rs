//! Route definitions for the `/events` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::event;
use crate::state::AppState;

/// Routes mounted at `/events`. Public reads only see published events.
///
/// ```text
/// GET    /              -> list           (public)
/// POST   /              -> create         (editor)
/// GET    /admin         -> list_admin     (editor)
/// GET    /admin/{id}    -> get_admin      (editor)
/// GET    /slug/{slug}   -> get_by_slug    (public)
/// GET    /{id}          -> get_by_id      (public)
/// PATCH  /{id}          -> update         (editor)
/// DELETE /{id}          -> delete         (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(event::list).post(event::create))
        .route("/admin", get(event::list_admin))
        .route("/admin/{id}", get(event::get_admin))
        .route("/slug/{slug}", get(event::get_by_slug))
        .route(
            "/{id}",
            get(event::get_by_id)
                .patch(event::update)
                .delete(event::delete),
        )
}
