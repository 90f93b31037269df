//! JWT-based authentication extractor for Axum handlers.

use agenda_core::error::CoreError;
use agenda_core::types::DbId;
use agenda_db::repositories::ProfileRepo;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

pub(crate) const UNAUTHORIZED_MESSAGE: &str = "Não autorizado";

/// Authenticated caller, resolved from a Bearer token and the `profiles` row.
///
/// The role always comes from the database, never from the token.
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = %user.user_id, role = %user.role, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: DbId,
    pub role: String,
}

fn unauthorized() -> AppError {
    AppError::Core(CoreError::Unauthorized(UNAUTHORIZED_MESSAGE.into()))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(unauthorized)?;

        let claims = validate_token(token, &state.config.jwt).map_err(|err| {
            tracing::debug!(error = %err, "Rejected bearer token");
            unauthorized()
        })?;

        let role = ProfileRepo::find_role(&state.pool, claims.sub)
            .await?
            .ok_or_else(|| {
                tracing::debug!(profile_id = %claims.sub, "Token for unknown profile");
                unauthorized()
            })?;

        Ok(AuthUser {
            user_id: claims.sub,
            role,
        })
    }
}
