//! Route definitions for the `/artists` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::artist;
use crate::state::AppState;

/// Routes mounted at `/artists`.
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
        .route("/", get(artist::list).post(artist::create))
        .route("/slug/{slug}", get(artist::get_by_slug))
        .route(
            "/{id}",
            get(artist::get_by_id)
                .patch(artist::update)
                .delete(artist::delete),
        )
}
