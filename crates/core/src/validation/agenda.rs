//! Agenda item schema.

use serde::{Deserialize, Serialize};
use serde_json::json;
use validator::Validate;

use super::{rules, Schema, Violations};
use crate::agenda::{
    is_on_slot, spans_min_duration, AgendaStatus, City, ListingType, MediaKind, VisibilityType,
    SLOT_MINUTES,
};
use crate::slug::{generate_slug, validate_slug};
use crate::types::{DbId, Timestamp};

pub const MAX_OCCURRENCES: usize = 100;
pub const MAX_TICKET_TIERS: usize = 20;
pub const MAX_MEDIA: usize = 30;
pub const TIER_NAME_MAX_LEN: usize = 80;
pub const ALT_TEXT_MAX_LEN: usize = 200;
pub const DEFAULT_CURRENCY: &str = "BRL";

/// Candidate agenda item as submitted by the back office.
///
/// Enumerations arrive as text so that an unknown value becomes a field
/// violation instead of a decode failure. Child collections distinguish
/// "absent" (keep what is stored) from "present" (replace wholesale).
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct AgendaItemInput {
    #[validate(length(min = 3, max = 200))]
    pub title: Option<String>,
    #[validate(custom(function = "rules::slug"))]
    pub slug: Option<String>,
    #[validate(length(max = 250))]
    pub subtitle: Option<String>,
    #[validate(custom(function = "rules::listing_type"))]
    pub listing_type: Option<String>,
    #[validate(custom(function = "rules::visibility_type"))]
    pub visibility_type: Option<String>,
    #[validate(custom(function = "rules::city"))]
    pub city: Option<String>,
    #[validate(custom(function = "rules::quarter_hour"))]
    pub start_at_utc: Option<Timestamp>,
    #[validate(custom(function = "rules::quarter_hour"))]
    pub end_at_utc: Option<Timestamp>,
    #[validate(length(max = 500))]
    pub summary: Option<String>,
    #[validate(custom(function = "rules::http_url"))]
    pub cover_url: Option<String>,
    #[validate(length(max = 200))]
    pub cover_alt: Option<String>,
    pub organizer_id: Option<DbId>,
    pub venue_id: Option<DbId>,
    #[validate(length(max = 12, code = "max_items"))]
    pub artist_ids: Option<Vec<DbId>>,
    /// Free-text names. Never creates or links artist records.
    #[validate(
        length(max = 12, code = "max_items"),
        custom(function = "rules::artist_names")
    )]
    pub artists_names: Option<Vec<String>>,
    #[validate(custom(function = "rules::http_url"))]
    pub ticket_url: Option<String>,
    #[validate(custom(function = "rules::http_url"))]
    pub source_url: Option<String>,
    #[validate(range(min = 0.0))]
    pub price_min: Option<f64>,
    #[validate(range(min = 0.0))]
    pub price_max: Option<f64>,
    #[validate(custom(function = "rules::currency"))]
    pub currency: Option<String>,
    #[validate(custom(function = "rules::agenda_status"))]
    pub status: Option<String>,
    #[validate(range(min = 0, max = 100))]
    pub priority: Option<i32>,
    #[validate(
        length(max = 20, code = "max_items"),
        custom(function = "rules::short_items")
    )]
    pub tags: Option<Vec<String>>,
    #[validate(length(max = 70))]
    pub seo_title: Option<String>,
    #[validate(length(max = 160))]
    pub seo_description: Option<String>,
    pub noindex: Option<bool>,
    pub occurrences: Option<Vec<OccurrenceInput>>,
    pub ticket_tiers: Option<Vec<TicketTierInput>>,
    pub media: Option<Vec<MediaInput>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OccurrenceInput {
    pub start_at_utc: Option<Timestamp>,
    pub end_at_utc: Option<Timestamp>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TicketTierInput {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub currency: Option<String>,
    pub available: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MediaInput {
    pub kind: Option<String>,
    pub url: Option<String>,
    pub alt_text: Option<String>,
}

/// A validated agenda item with defaults applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgendaItemData {
    pub title: String,
    pub slug: String,
    pub subtitle: Option<String>,
    pub listing_type: Option<ListingType>,
    pub visibility_type: VisibilityType,
    pub city: Option<City>,
    pub start_at_utc: Option<Timestamp>,
    pub end_at_utc: Option<Timestamp>,
    pub summary: Option<String>,
    pub cover_url: Option<String>,
    pub cover_alt: Option<String>,
    pub organizer_id: Option<DbId>,
    pub venue_id: Option<DbId>,
    pub artist_ids: Vec<DbId>,
    pub artists_names: Vec<String>,
    pub ticket_url: Option<String>,
    pub source_url: Option<String>,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    pub currency: String,
    pub status: AgendaStatus,
    pub priority: i32,
    pub tags: Vec<String>,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub noindex: bool,
    pub occurrences: Option<Vec<OccurrenceData>>,
    pub ticket_tiers: Option<Vec<TicketTierData>>,
    pub media: Option<Vec<MediaData>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OccurrenceData {
    pub start_at_utc: Timestamp,
    pub end_at_utc: Option<Timestamp>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TicketTierData {
    pub name: String,
    pub price: Option<f64>,
    pub currency: String,
    pub available: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MediaData {
    pub kind: MediaKind,
    pub url: String,
    pub alt_text: Option<String>,
}

impl AgendaItemInput {
    /// Whether `field` counts as filled for the status completeness rules.
    fn is_filled(&self, field: &str) -> bool {
        match field {
            "title" => self.title.is_some(),
            "city" => self.city.is_some(),
            "slug" => {
                self.slug.is_some()
                    || self
                        .title
                        .as_deref()
                        .is_some_and(|t| validate_slug(&generate_slug(t)).is_ok())
            }
            "start_at_utc" => self.start_at_utc.is_some(),
            "end_at_utc" => self.end_at_utc.is_some(),
            "organizer_id" => self.organizer_id.is_some(),
            "venue_id" => self.venue_id.is_some(),
            _ => true,
        }
    }

    fn refine_status(&self, violations: &mut Violations) {
        let Some(status) = self.status.as_deref().and_then(|s| s.parse::<AgendaStatus>().ok())
        else {
            return;
        };
        let code = match status {
            AgendaStatus::Archived => {
                violations.add("status", "archive_via_delete");
                return;
            }
            AgendaStatus::Published => "required_for_publish",
            AgendaStatus::Scheduled => "required_for_schedule",
            AgendaStatus::Draft => return,
        };
        for field in status.required_fields() {
            if !self.is_filled(field) {
                violations.add(*field, code);
            }
        }
    }

    fn refine_occurrences(&self, violations: &mut Violations) {
        let Some(occurrences) = &self.occurrences else {
            return;
        };
        if occurrences.len() > MAX_OCCURRENCES {
            violations.add_with("occurrences", "max_items", [("max", json!(MAX_OCCURRENCES))]);
        }
        for (i, occurrence) in occurrences.iter().enumerate() {
            let start_path = format!("occurrences[{i}].start_at_utc");
            let end_path = format!("occurrences[{i}].end_at_utc");
            match &occurrence.start_at_utc {
                None => violations.add(start_path, "required"),
                Some(start) if !is_on_slot(start) => violations.add(start_path, "quarter_hour"),
                Some(_) => {}
            }
            if let Some(end) = &occurrence.end_at_utc {
                if !is_on_slot(end) {
                    violations.add(end_path, "quarter_hour");
                } else if let Some(start) = &occurrence.start_at_utc {
                    if !spans_min_duration(start, end) {
                        violations.add_with(
                            end_path,
                            "end_too_soon",
                            [("minutes", json!(SLOT_MINUTES))],
                        );
                    }
                }
            }
        }
    }

    fn refine_ticket_tiers(&self, violations: &mut Violations) {
        let Some(tiers) = &self.ticket_tiers else {
            return;
        };
        if tiers.len() > MAX_TICKET_TIERS {
            violations.add_with("ticket_tiers", "max_items", [("max", json!(MAX_TICKET_TIERS))]);
        }
        for (i, tier) in tiers.iter().enumerate() {
            match &tier.name {
                None => violations.add(format!("ticket_tiers[{i}].name"), "required"),
                Some(name) => rules::check_max_len(
                    &format!("ticket_tiers[{i}].name"),
                    name,
                    TIER_NAME_MAX_LEN,
                    violations,
                ),
            }
            if tier.price.is_some_and(|p| p < 0.0) {
                violations.add_with(
                    format!("ticket_tiers[{i}].price"),
                    "range",
                    [("min", json!(0))],
                );
            }
            if tier.currency.as_deref().is_some_and(|c| !rules::is_currency(c)) {
                violations.add(format!("ticket_tiers[{i}].currency"), "currency_format");
            }
        }
    }

    fn refine_media(&self, violations: &mut Violations) {
        let Some(media) = &self.media else {
            return;
        };
        if media.len() > MAX_MEDIA {
            violations.add_with("media", "max_items", [("max", json!(MAX_MEDIA))]);
        }
        for (i, entry) in media.iter().enumerate() {
            let kind = entry.kind.as_deref().map(str::parse::<MediaKind>);
            match kind {
                None => violations.add(format!("media[{i}].kind"), "required"),
                Some(Err(_)) => violations.add(format!("media[{i}].kind"), "invalid_option"),
                Some(Ok(_)) => {}
            }
            match entry.url.as_deref() {
                None => violations.add(format!("media[{i}].url"), "required"),
                Some(url) if !rules::is_http_url(url) => {
                    violations.add(format!("media[{i}].url"), "http_url")
                }
                Some(_) => {}
            }
            match entry.alt_text.as_deref() {
                None if matches!(kind, Some(Ok(MediaKind::Image))) => {
                    violations.add(format!("media[{i}].alt_text"), "image_alt_required")
                }
                Some(alt) => rules::check_max_len(
                    &format!("media[{i}].alt_text"),
                    alt,
                    ALT_TEXT_MAX_LEN,
                    violations,
                ),
                None => {}
            }
        }
    }
}

impl Schema for AgendaItemInput {
    type Output = AgendaItemData;

    const NOT_NULL: &'static [&'static str] =
        &["status", "visibility_type", "currency", "priority", "noindex"];

    fn refine(&self, violations: &mut Violations) {
        if self.title.is_none() {
            violations.add("title", "required");
        }
        rules::check_derivable_slug(self.slug.as_deref(), self.title.as_deref(), violations);

        if let (Some(start), Some(end)) = (&self.start_at_utc, &self.end_at_utc) {
            if !spans_min_duration(start, end) {
                violations.add_with(
                    "end_at_utc",
                    "end_too_soon",
                    [("minutes", json!(SLOT_MINUTES))],
                );
            }
        }
        if let (Some(min), Some(max)) = (self.price_min, self.price_max) {
            if min > max {
                violations.add("price_max", "price_order");
            }
        }
        if self.cover_url.is_some() && self.cover_alt.is_none() {
            violations.add("cover_alt", "cover_alt_required");
        }

        self.refine_status(violations);
        self.refine_occurrences(violations);
        self.refine_ticket_tiers(violations);
        self.refine_media(violations);
    }

    fn into_output(self) -> AgendaItemData {
        let title = self.title.unwrap_or_default();
        let currency = self.currency.unwrap_or_else(|| DEFAULT_CURRENCY.to_string());
        AgendaItemData {
            slug: rules::resolve_slug(self.slug, &title),
            subtitle: self.subtitle,
            listing_type: self.listing_type.and_then(|v| v.parse().ok()),
            visibility_type: self
                .visibility_type
                .and_then(|v| v.parse().ok())
                .unwrap_or_default(),
            city: self.city.and_then(|v| v.parse().ok()),
            start_at_utc: self.start_at_utc,
            end_at_utc: self.end_at_utc,
            summary: self.summary,
            cover_url: self.cover_url,
            cover_alt: self.cover_alt,
            organizer_id: self.organizer_id,
            venue_id: self.venue_id,
            artist_ids: self.artist_ids.unwrap_or_default(),
            artists_names: self.artists_names.unwrap_or_default(),
            ticket_url: self.ticket_url,
            source_url: self.source_url,
            price_min: self.price_min,
            price_max: self.price_max,
            status: self.status.and_then(|v| v.parse().ok()).unwrap_or_default(),
            priority: self.priority.unwrap_or(0),
            tags: self.tags.unwrap_or_default(),
            seo_title: self.seo_title,
            seo_description: self.seo_description,
            noindex: self.noindex.unwrap_or(false),
            occurrences: self.occurrences.map(|list| {
                list.into_iter()
                    .filter_map(|o| {
                        o.start_at_utc.map(|start_at_utc| OccurrenceData {
                            start_at_utc,
                            end_at_utc: o.end_at_utc,
                        })
                    })
                    .collect()
            }),
            ticket_tiers: self.ticket_tiers.map(|list| {
                list.into_iter()
                    .map(|t| TicketTierData {
                        name: t.name.unwrap_or_default(),
                        price: t.price,
                        currency: t.currency.unwrap_or_else(|| currency.clone()),
                        available: t.available.unwrap_or(true),
                    })
                    .collect()
            }),
            media: self.media.map(|list| {
                list.into_iter()
                    .filter_map(|m| {
                        let kind = m.kind.as_deref()?.parse().ok()?;
                        Some(MediaData {
                            kind,
                            url: m.url?,
                            alt_text: m.alt_text,
                        })
                    })
                    .collect()
            }),
            currency,
            title,
        }
    }
}
