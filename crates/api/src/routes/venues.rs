//! Route definitions for the `/venues` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::venue;
use crate::state::AppState;

/// Routes mounted at `/venues`.
///
/// ```text
/// GET    /              -> list           (public)
/// POST   /              -> create         (editor)
/// GET    /slug/{slug}   -> get_by_slug    (public)
/// GET    /{id}          -> get_by_id      (public)
/// PATCH  /{id}          -> update         (editor)
/// DELETE /{id}          -> delete         (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(venue::list).post(venue::create))
        .route("/slug/{slug}", get(venue::get_by_slug))
        .route(
            "/{id}",
            get(venue::get_by_id)
                .patch(venue::update)
                .delete(venue::delete),
        )
}
