//! Role-based access control (RBAC) extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose role does not
//! meet the minimum requirement. Parts extractors run before the body is
//! read, so a rejected caller never reaches validation or a write.

use agenda_core::error::CoreError;
use agenda_core::roles::{can_delete, can_edit};
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

pub(crate) const FORBIDDEN_MESSAGE: &str = "Permissões insuficientes";

fn forbidden(user: &AuthUser) -> AppError {
    tracing::warn!(user_id = %user.user_id, role = %user.role, "Insufficient role");
    AppError::Core(CoreError::Forbidden(FORBIDDEN_MESSAGE.into()))
}

/// Requires the `admin` or `editor` role. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn edit(RequireEditor(user): RequireEditor) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireEditor(pub AuthUser);

impl FromRequestParts<AppState> for RequireEditor {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !can_edit(&user.role) {
            return Err(forbidden(&user));
        }
        Ok(RequireEditor(user))
    }
}

/// Requires the `admin` role. Rejects with 403 Forbidden otherwise.
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !can_delete(&user.role) {
            return Err(forbidden(&user));
        }
        Ok(RequireAdmin(user))
    }
}
