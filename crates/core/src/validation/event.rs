//! Public event schema.
//!
//! Events are a parallel, less strict content type than agenda items: no
//! time grid, no status-gated completeness, dates only need to be ordered.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{rules, Schema, Violations};
use crate::directory::{AgeRating, EventStatus, HighlightType};
use crate::types::{DbId, Timestamp};

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct EventInput {
    #[validate(length(min = 3, max = 200))]
    pub title: Option<String>,
    #[validate(custom(function = "rules::slug"))]
    pub slug: Option<String>,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    pub date_start: Option<Timestamp>,
    pub date_end: Option<Timestamp>,
    #[validate(length(max = 80))]
    pub city: Option<String>,
    pub venue_id: Option<DbId>,
    pub organizer_id: Option<DbId>,
    #[validate(custom(function = "rules::http_url"))]
    pub ticket_url: Option<String>,
    #[validate(length(max = 80))]
    pub ticket_platform: Option<String>,
    #[validate(range(min = 0.0))]
    pub price_min: Option<f64>,
    #[validate(range(min = 0.0))]
    pub price_max: Option<f64>,
    pub is_free: Option<bool>,
    #[validate(custom(function = "rules::age_rating"))]
    pub age_rating: Option<String>,
    #[validate(
        length(max = 10, code = "max_items"),
        custom(function = "rules::short_items")
    )]
    pub genres: Option<Vec<String>>,
    #[validate(custom(function = "rules::highlight_type"))]
    pub highlight_type: Option<String>,
    #[validate(custom(function = "rules::http_url"))]
    pub image_url: Option<String>,
    #[validate(length(max = 200))]
    pub image_alt: Option<String>,
    #[validate(custom(function = "rules::event_status"))]
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventData {
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub date_start: Timestamp,
    pub date_end: Option<Timestamp>,
    pub city: Option<String>,
    pub venue_id: Option<DbId>,
    pub organizer_id: Option<DbId>,
    pub ticket_url: Option<String>,
    pub ticket_platform: Option<String>,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    pub is_free: bool,
    pub age_rating: Option<AgeRating>,
    pub genres: Vec<String>,
    pub highlight_type: HighlightType,
    pub image_url: Option<String>,
    pub image_alt: Option<String>,
    pub status: EventStatus,
}

impl Schema for EventInput {
    type Output = EventData;

    const NOT_NULL: &'static [&'static str] = &["status", "highlight_type", "is_free"];

    fn refine(&self, violations: &mut Violations) {
        if self.title.is_none() {
            violations.add("title", "required");
        }
        rules::check_derivable_slug(self.slug.as_deref(), self.title.as_deref(), violations);

        match (&self.date_start, &self.date_end) {
            (None, _) => violations.add("date_start", "required"),
            (Some(start), Some(end)) if end <= start => {
                violations.add("date_end", "end_before_start")
            }
            _ => {}
        }
        if let (Some(min), Some(max)) = (self.price_min, self.price_max) {
            if min > max {
                violations.add("price_max", "price_order");
            }
        }
        if self.image_url.is_some() && self.image_alt.is_none() {
            violations.add("image_alt", "image_alt_required");
        }
    }

    fn into_output(self) -> EventData {
        let title = self.title.unwrap_or_default();
        EventData {
            slug: rules::resolve_slug(self.slug, &title),
            description: self.description,
            date_start: self.date_start.unwrap_or_default(),
            date_end: self.date_end,
            city: self.city,
            venue_id: self.venue_id,
            organizer_id: self.organizer_id,
            ticket_url: self.ticket_url,
            ticket_platform: self.ticket_platform,
            price_min: self.price_min,
            price_max: self.price_max,
            is_free: self.is_free.unwrap_or(false),
            age_rating: self.age_rating.and_then(|v| v.parse().ok()),
            genres: self.genres.unwrap_or_default(),
            highlight_type: self
                .highlight_type
                .and_then(|v| v.parse().ok())
                .unwrap_or_default(),
            image_url: self.image_url,
            image_alt: self.image_alt,
            status: self.status.and_then(|v| v.parse().ok()).unwrap_or_default(),
            title,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::validation::{check, validate_value, Locale};

    #[test]
    fn event_needs_title_and_start() {
        let input: EventInput = serde_json::from_value(json!({})).unwrap();
        let v = check(&input);
        assert_eq!(v.codes("title"), vec!["required"]);
        assert_eq!(v.codes("date_start"), vec!["required"]);
    }

    #[test]
    fn end_must_follow_start() {
        let input: EventInput = serde_json::from_value(json!({
            "title": "Festival de Inverno",
            "date_start": "2026-07-10T20:00:00Z",
            "date_end": "2026-07-10T20:00:00Z"
        }))
        .unwrap();
        assert_eq!(check(&input).codes("date_end"), vec!["end_before_start"]);
    }

    #[test]
    fn event_is_not_bound_to_the_quarter_hour_grid() {
        let data = validate_value::<EventInput>(
            json!({
                "title": "Festival de Inverno",
                "date_start": "2026-07-10T20:07:00Z",
                "age_rating": "16",
                "genres": ["mpb", "jazz"]
            }),
            Locale::PtBr,
        )
        .unwrap();
        assert_eq!(data.slug, "festival-de-inverno");
        assert_eq!(data.age_rating, Some(AgeRating::Sixteen));
        assert_eq!(data.status, EventStatus::Draft);
        assert_eq!(data.highlight_type, HighlightType::None);
    }

    #[test]
    fn image_needs_alt_and_rating_must_be_known() {
        let input: EventInput = serde_json::from_value(json!({
            "title": "Show",
            "date_start": "2026-07-10T20:00:00Z",
            "image_url": "https://cdn.example.com/show.jpg",
            "age_rating": "21"
        }))
        .unwrap();
        let v = check(&input);
        assert_eq!(v.codes("image_alt"), vec!["image_alt_required"]);
        assert_eq!(v.codes("age_rating"), vec!["invalid_option"]);
    }
}
