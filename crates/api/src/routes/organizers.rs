//! Route definitions for the `/organizers` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::organizer;
use crate::state::AppState;

/// Routes mounted at `/organizers`.
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
        .route("/", get(organizer::list).post(organizer::create))
        .route("/slug/{slug}", get(organizer::get_by_slug))
        .route(
            "/{id}",
            get(organizer::get_by_id)
                .patch(organizer::update)
                .delete(organizer::delete),
        )
}
