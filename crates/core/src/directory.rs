//! Vocabulary for the public directory: events, artists, venues, organizers.

define_text_enum! {
    /// Whether a directory entry (artist, venue, organizer) is listed.
    EntityStatus {
        Active => "active",
        Inactive => "inactive",
    }
}

define_text_enum! {
    /// Public event lifecycle status.
    EventStatus {
        Draft => "draft",
        Published => "published",
        Cancelled => "cancelled",
    }
}

define_text_enum! {
    /// Brazilian age classification ("classificação indicativa").
    AgeRating {
        Free => "L",
        Ten => "10",
        Twelve => "12",
        Fourteen => "14",
        Sixteen => "16",
        Eighteen => "18",
    }
}

define_text_enum! {
    /// How an event is highlighted on the listing surface.
    HighlightType {
        None => "none",
        Curatorial => "curatorial",
        Vitrine => "vitrine",
    }
}

impl Default for EntityStatus {
    fn default() -> Self {
        EntityStatus::Active
    }
}

impl Default for EventStatus {
    fn default() -> Self {
        EventStatus::Draft
    }
}

impl Default for HighlightType {
    fn default() -> Self {
        HighlightType::None
    }
}
