pub mod agenda;
pub mod artists;
pub mod events;
pub mod health;
pub mod organizers;
pub mod venues;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /agenda        curated agenda items (see routes::agenda)
/// /events        public events
/// /artists       artist directory
/// /venues        venue directory
/// /organizers    organizer directory
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/agenda", agenda::router())
        .nest("/events", events::router())
        .nest("/artists", artists::router())
        .nest("/venues", venues::router())
        .nest("/organizers", organizers::router())
}
