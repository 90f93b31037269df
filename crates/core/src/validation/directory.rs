//! Organizer, artist and venue schemas.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{rules, Schema, Violations};
use crate::directory::EntityStatus;

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct OrganizerInput {
    #[validate(length(min = 2, max = 120))]
    pub name: Option<String>,
    #[validate(custom(function = "rules::slug"))]
    pub slug: Option<String>,
    #[validate(length(max = 2000))]
    pub bio: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(custom(function = "rules::phone"))]
    pub phone: Option<String>,
    #[validate(custom(function = "rules::http_url"))]
    pub website: Option<String>,
    #[validate(custom(function = "rules::instagram"))]
    pub instagram: Option<String>,
    #[validate(custom(function = "rules::http_url"))]
    pub logo_url: Option<String>,
    #[validate(length(max = 80))]
    pub city: Option<String>,
    #[validate(custom(function = "rules::entity_status"))]
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrganizerData {
    pub name: String,
    pub slug: String,
    pub bio: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub instagram: Option<String>,
    pub logo_url: Option<String>,
    pub city: Option<String>,
    pub status: EntityStatus,
}

impl Schema for OrganizerInput {
    type Output = OrganizerData;

    const NOT_NULL: &'static [&'static str] = &["status"];

    fn refine(&self, violations: &mut Violations) {
        if self.name.is_none() {
            violations.add("name", "required");
        }
        rules::check_derivable_slug(self.slug.as_deref(), self.name.as_deref(), violations);
    }

    fn into_output(self) -> OrganizerData {
        let name = self.name.unwrap_or_default();
        OrganizerData {
            slug: rules::resolve_slug(self.slug, &name),
            bio: self.bio,
            email: self.email,
            phone: self.phone,
            website: self.website,
            instagram: rules::normalize_instagram(self.instagram),
            logo_url: self.logo_url,
            city: self.city,
            status: parse_status(self.status),
            name,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ArtistInput {
    #[validate(length(min = 1, max = 120))]
    pub name: Option<String>,
    #[validate(custom(function = "rules::slug"))]
    pub slug: Option<String>,
    #[validate(length(max = 2000))]
    pub bio: Option<String>,
    #[validate(
        length(max = 10, code = "max_items"),
        custom(function = "rules::short_items")
    )]
    pub genres: Option<Vec<String>>,
    #[validate(length(max = 80))]
    pub city: Option<String>,
    #[validate(custom(function = "rules::instagram"))]
    pub instagram: Option<String>,
    #[validate(custom(function = "rules::http_url"))]
    pub website: Option<String>,
    #[validate(custom(function = "rules::http_url"))]
    pub spotify_url: Option<String>,
    #[validate(custom(function = "rules::http_url"))]
    pub image_url: Option<String>,
    #[validate(custom(function = "rules::entity_status"))]
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtistData {
    pub name: String,
    pub slug: String,
    pub bio: Option<String>,
    pub genres: Vec<String>,
    pub city: Option<String>,
    pub instagram: Option<String>,
    pub website: Option<String>,
    pub spotify_url: Option<String>,
    pub image_url: Option<String>,
    pub status: EntityStatus,
}

impl Schema for ArtistInput {
    type Output = ArtistData;

    const NOT_NULL: &'static [&'static str] = &["status"];

    fn refine(&self, violations: &mut Violations) {
        if self.name.is_none() {
            violations.add("name", "required");
        }
        rules::check_derivable_slug(self.slug.as_deref(), self.name.as_deref(), violations);
    }

    fn into_output(self) -> ArtistData {
        let name = self.name.unwrap_or_default();
        ArtistData {
            slug: rules::resolve_slug(self.slug, &name),
            bio: self.bio,
            genres: self.genres.unwrap_or_default(),
            city: self.city,
            instagram: rules::normalize_instagram(self.instagram),
            website: self.website,
            spotify_url: self.spotify_url,
            image_url: self.image_url,
            status: parse_status(self.status),
            name,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct VenueInput {
    #[validate(length(min = 2, max = 150))]
    pub name: Option<String>,
    #[validate(custom(function = "rules::slug"))]
    pub slug: Option<String>,
    #[validate(length(max = 250))]
    pub address: Option<String>,
    #[validate(length(max = 100))]
    pub neighborhood: Option<String>,
    #[validate(length(max = 80))]
    pub city: Option<String>,
    #[validate(range(min = 1))]
    pub capacity: Option<i32>,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,
    #[validate(custom(function = "rules::http_url"))]
    pub website: Option<String>,
    #[validate(custom(function = "rules::instagram"))]
    pub instagram: Option<String>,
    #[validate(custom(function = "rules::phone"))]
    pub phone: Option<String>,
    #[validate(custom(function = "rules::entity_status"))]
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VenueData {
    pub name: String,
    pub slug: String,
    pub address: Option<String>,
    pub neighborhood: Option<String>,
    pub city: Option<String>,
    pub capacity: Option<i32>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub website: Option<String>,
    pub instagram: Option<String>,
    pub phone: Option<String>,
    pub status: EntityStatus,
}

impl Schema for VenueInput {
    type Output = VenueData;

    const NOT_NULL: &'static [&'static str] = &["status"];

    fn refine(&self, violations: &mut Violations) {
        if self.name.is_none() {
            violations.add("name", "required");
        }
        rules::check_derivable_slug(self.slug.as_deref(), self.name.as_deref(), violations);
        if self.latitude.is_some() != self.longitude.is_some() {
            let missing = if self.latitude.is_none() { "latitude" } else { "longitude" };
            violations.add(missing, "required");
        }
    }

    fn into_output(self) -> VenueData {
        let name = self.name.unwrap_or_default();
        VenueData {
            slug: rules::resolve_slug(self.slug, &name),
            address: self.address,
            neighborhood: self.neighborhood,
            city: self.city,
            capacity: self.capacity,
            latitude: self.latitude,
            longitude: self.longitude,
            website: self.website,
            instagram: rules::normalize_instagram(self.instagram),
            phone: self.phone,
            status: parse_status(self.status),
            name,
        }
    }
}

fn parse_status(status: Option<String>) -> EntityStatus {
    status.and_then(|v| v.parse().ok()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::validation::{check, validate_value, Locale};

    #[test]
    fn organizer_contact_fields() {
        let input: OrganizerInput = serde_json::from_value(json!({
            "name": "Coletivo Noturno",
            "email": "contato@",
            "phone": "abc",
            "website": "coletivo.example"
        }))
        .unwrap();
        let v = check(&input);
        assert_eq!(v.codes("email"), vec!["email"]);
        assert_eq!(v.codes("phone"), vec!["phone_format"]);
        assert_eq!(v.codes("website"), vec!["http_url"]);
    }

    #[test]
    fn organizer_output_is_normalized() {
        let data = validate_value::<OrganizerInput>(
            json!({ "name": "Coletivo Noturno", "instagram": "@coletivonoturno" }),
            Locale::PtBr,
        )
        .unwrap();
        assert_eq!(data.slug, "coletivo-noturno");
        assert_eq!(data.instagram.as_deref(), Some("coletivonoturno"));
        assert_eq!(data.status, EntityStatus::Active);
    }

    #[test]
    fn artist_requires_name() {
        let input: ArtistInput = serde_json::from_value(json!({ "status": "hidden" })).unwrap();
        let v = check(&input);
        assert_eq!(v.codes("name"), vec!["required"]);
        assert_eq!(v.codes("status"), vec!["invalid_option"]);
    }

    #[test]
    fn venue_coordinates_come_in_pairs_and_in_range() {
        let input: VenueInput = serde_json::from_value(json!({
            "name": "Teatro São Pedro",
            "latitude": -30.03
        }))
        .unwrap();
        assert_eq!(check(&input).codes("longitude"), vec!["required"]);

        let input: VenueInput = serde_json::from_value(json!({
            "name": "Teatro São Pedro",
            "latitude": -120.0,
            "longitude": -51.23,
            "capacity": 0
        }))
        .unwrap();
        let v = check(&input);
        assert_eq!(v.codes("latitude"), vec!["range"]);
        assert_eq!(v.codes("capacity"), vec!["range"]);
    }
}
