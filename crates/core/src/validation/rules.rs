//! Custom field rules for the `validator` derive, plus small helpers shared by
//! the schemas' cross-field checks.

use std::borrow::Cow;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::json;
use validator::{ValidateUrl, ValidationError};

use super::Violations;
use crate::agenda::{is_on_slot, AgendaStatus, City, ListingType, MediaKind, VisibilityType};
use crate::directory::{AgeRating, EntityStatus, EventStatus, HighlightType};
use crate::slug::{generate_slug, validate_slug, SLUG_MAX_LEN, SLUG_MIN_LEN};
use crate::types::Timestamp;

/// Longest accepted tag or genre.
pub const TAG_MAX_LEN: usize = 40;
/// Longest accepted free-text artist name.
pub const ARTIST_NAME_MAX_LEN: usize = 120;

static INSTAGRAM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^@?[A-Za-z0-9._]{1,30}$").expect("instagram pattern is valid")
});

static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9 +()\-]{8,20}$").expect("phone pattern is valid"));

fn error_with(code: &'static str, params: &[(&'static str, usize)]) -> ValidationError {
    let mut error = ValidationError::new(code);
    for (name, value) in params {
        error.add_param(Cow::from(*name), value);
    }
    error
}

pub fn slug(value: &str) -> Result<(), ValidationError> {
    validate_slug(value).map_err(|err| match err.code() {
        "length" => error_with("length", &[("min", SLUG_MIN_LEN), ("max", SLUG_MAX_LEN)]),
        code => ValidationError::new(code),
    })
}

/// Absolute `http://` or `https://` URL.
pub fn is_http_url(value: &str) -> bool {
    (value.starts_with("http://") || value.starts_with("https://"))
        && value.to_string().validate_url()
}

pub fn http_url(value: &str) -> Result<(), ValidationError> {
    if is_http_url(value) {
        Ok(())
    } else {
        Err(ValidationError::new("http_url"))
    }
}

fn choice<T: FromStr>(value: &str) -> Result<(), ValidationError> {
    value
        .parse::<T>()
        .map(|_| ())
        .map_err(|_| ValidationError::new("invalid_option"))
}

pub fn listing_type(value: &str) -> Result<(), ValidationError> {
    choice::<ListingType>(value)
}

pub fn visibility_type(value: &str) -> Result<(), ValidationError> {
    choice::<VisibilityType>(value)
}

pub fn city(value: &str) -> Result<(), ValidationError> {
    choice::<City>(value)
}

/// Statuses an agenda payload may carry. `archived` is checked in `refine`.
pub fn agenda_status(value: &str) -> Result<(), ValidationError> {
    choice::<AgendaStatus>(value)
}

pub fn media_kind(value: &str) -> Result<(), ValidationError> {
    choice::<MediaKind>(value)
}

pub fn entity_status(value: &str) -> Result<(), ValidationError> {
    choice::<EntityStatus>(value)
}

pub fn event_status(value: &str) -> Result<(), ValidationError> {
    choice::<EventStatus>(value)
}

pub fn age_rating(value: &str) -> Result<(), ValidationError> {
    choice::<AgeRating>(value)
}

pub fn highlight_type(value: &str) -> Result<(), ValidationError> {
    choice::<HighlightType>(value)
}

/// ISO 4217 shape: three uppercase ASCII letters.
pub fn is_currency(value: &str) -> bool {
    value.len() == 3 && value.bytes().all(|b| b.is_ascii_uppercase())
}

pub fn currency(value: &str) -> Result<(), ValidationError> {
    if is_currency(value) {
        Ok(())
    } else {
        Err(ValidationError::new("currency_format"))
    }
}

pub fn quarter_hour(value: &Timestamp) -> Result<(), ValidationError> {
    if is_on_slot(value) {
        Ok(())
    } else {
        Err(ValidationError::new("quarter_hour"))
    }
}

fn items_within(items: &[String], max: usize) -> Result<(), ValidationError> {
    if items.iter().all(|item| item.chars().count() <= max) {
        Ok(())
    } else {
        Err(error_with("item_length", &[("max", max)]))
    }
}

/// Tags and genres.
pub fn short_items(items: &[String]) -> Result<(), ValidationError> {
    items_within(items, TAG_MAX_LEN)
}

pub fn artist_names(items: &[String]) -> Result<(), ValidationError> {
    items_within(items, ARTIST_NAME_MAX_LEN)
}

pub fn instagram(value: &str) -> Result<(), ValidationError> {
    if INSTAGRAM.is_match(value) {
        Ok(())
    } else {
        Err(ValidationError::new("instagram_format"))
    }
}

/// Store handles without the leading `@`.
pub fn normalize_instagram(handle: Option<String>) -> Option<String> {
    handle.map(|h| h.trim_start_matches('@').to_string())
}

pub fn phone(value: &str) -> Result<(), ValidationError> {
    if PHONE.is_match(value) {
        Ok(())
    } else {
        Err(ValidationError::new("phone_format"))
    }
}

/// Flag an absent slug whose source text yields nothing usable.
pub fn check_derivable_slug(slug: Option<&str>, source: Option<&str>, violations: &mut Violations) {
    if slug.is_some() || violations.has("slug") {
        return;
    }
    if let Some(source) = source {
        if validate_slug(&generate_slug(source)).is_err() {
            violations.add("slug", "slug_underivable");
        }
    }
}

/// The explicit slug, or one derived from `source`.
pub fn resolve_slug(slug: Option<String>, source: &str) -> String {
    slug.unwrap_or_else(|| generate_slug(source))
}

/// Record a `length` violation at `path` when `value` exceeds `max` characters.
pub fn check_max_len(path: &str, value: &str, max: usize, violations: &mut Violations) {
    if value.chars().count() > max {
        violations.add_with(path, "length", [("max", json!(max))]);
    }
}
