//! Request hygiene and schema validation.
//!
//! Every mutating handler takes its body through [`SanitizedJson`] (parse,
//! strip active content, trim, drop empty strings) and then through
//! [`validate_request`], usually both at once via [`ValidatedJson`].

use agenda_core::error::CoreError;
use agenda_core::sanitize::prepare_payload;
use agenda_core::validation::{messages, validate_value, Locale, Schema};
use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::header::ACCEPT_LANGUAGE;
use axum::http::request::Parts;
use axum::Json;
use serde_json::Value;

use crate::error::AppError;
use crate::state::AppState;

/// Locale for validation messages: `Accept-Language`, else the configured
/// default.
#[derive(Debug, Clone, Copy)]
pub struct RequestLocale(pub Locale);

impl FromRequestParts<AppState> for RequestLocale {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let locale = parts
            .headers
            .get(ACCEPT_LANGUAGE)
            .and_then(|v| v.to_str().ok())
            .and_then(Locale::from_accept_language)
            .unwrap_or(state.config.default_locale);
        Ok(RequestLocale(locale))
    }
}

/// A JSON object body after [`prepare_payload`].
#[derive(Debug)]
pub struct SanitizedJson(pub Value);

impl FromRequest<AppState> for SanitizedJson {
    type Rejection = AppError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let (mut parts, body) = req.into_parts();
        let RequestLocale(locale) =
            match RequestLocale::from_request_parts(&mut parts, state).await {
                Ok(locale) => locale,
                Err(never) => match never {},
            };
        let req = Request::from_parts(parts, body);

        let Json(value) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| body_error(locale, &rejection.body_text()))?;
        if !value.is_object() {
            return Err(body_error(locale, "expected a JSON object"));
        }
        Ok(SanitizedJson(prepare_payload(value)))
    }
}

/// A sanitized body validated through schema `S`.
pub struct ValidatedJson<S: Schema>(pub S::Output);

impl<S: Schema> FromRequest<AppState> for ValidatedJson<S> {
    type Rejection = AppError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let (mut parts, body) = req.into_parts();
        let RequestLocale(locale) =
            match RequestLocale::from_request_parts(&mut parts, state).await {
                Ok(locale) => locale,
                Err(never) => match never {},
            };
        let req = Request::from_parts(parts, body);

        let SanitizedJson(value) = SanitizedJson::from_request(req, state).await?;
        validate_request::<S>(value, locale).map(ValidatedJson)
    }
}

/// Validate an already sanitized document, logging failures with the payload.
pub fn validate_request<S: Schema>(value: Value, locale: Locale) -> Result<S::Output, AppError> {
    let payload = value.clone();
    validate_value::<S>(value, locale).map_err(|err| {
        if let CoreError::Validation(fields) = &err {
            tracing::warn!(
                schema = std::any::type_name::<S>(),
                errors = ?fields,
                %payload,
                "Validation failed"
            );
        }
        AppError::Core(err)
    })
}

/// Overlay `patch` on `base`: keys present in `patch` win, `null` removes
/// the key.
///
/// Only the top level is merged; nested values (child collections, arrays)
/// are replaced whole.
pub fn merge_patch(base: Value, patch: Value) -> Value {
    let (Value::Object(mut merged), Value::Object(patch)) = (base, patch) else {
        return Value::Null;
    };
    for (key, value) in patch {
        if value.is_null() {
            merged.remove(&key);
        } else {
            merged.insert(key, value);
        }
    }
    Value::Object(merged)
}

fn body_error(locale: Locale, detail: &str) -> AppError {
    tracing::warn!(detail, "Unreadable request body");
    AppError::Core(CoreError::field("body", messages::invalid_body(locale, detail)))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn patch_overrides_and_clears() {
        let base = json!({ "title": "A", "subtitle": "B", "tags": ["x"] });
        let patch = json!({ "title": "C", "subtitle": null, "tags": [] });
        assert_eq!(
            merge_patch(base, patch),
            json!({ "title": "C", "tags": [] })
        );
    }

    #[test]
    fn absent_keys_are_kept() {
        let base = json!({ "title": "A", "city": "curitiba" });
        assert_eq!(
            merge_patch(base.clone(), json!({})),
            base
        );
    }
}
