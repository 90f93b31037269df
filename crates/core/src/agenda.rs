//! Agenda item vocabulary: listing/visibility kinds, cities, lifecycle status
//! and the scheduling grid.

use chrono::{Duration, Timelike};

use crate::types::Timestamp;

define_text_enum! {
    /// Editorial surface an agenda item is listed under.
    ListingType {
        CuratorialHighlight => "curatorial-highlight",
        CulturalShowcase => "cultural-showcase",
    }
}

define_text_enum! {
    /// Who placed the item on the agenda.
    VisibilityType {
        Curatorial => "curatorial",
        Sponsored => "sponsored",
        Community => "community",
    }
}

define_text_enum! {
    /// Cities covered by the agenda.
    City {
        PortoAlegre => "porto-alegre",
        SaoPaulo => "sao-paulo",
        RioDeJaneiro => "rio-de-janeiro",
        Florianopolis => "florianopolis",
        Curitiba => "curitiba",
    }
}

define_text_enum! {
    /// Agenda item lifecycle status.
    AgendaStatus {
        Draft => "draft",
        Published => "published",
        Scheduled => "scheduled",
        /// Terminal; only reached through soft delete.
        Archived => "archived",
    }
}

define_text_enum! {
    /// Kind of media attached to an agenda item.
    MediaKind {
        Image => "image",
        Video => "video",
    }
}

impl Default for VisibilityType {
    fn default() -> Self {
        VisibilityType::Curatorial
    }
}

impl Default for AgendaStatus {
    fn default() -> Self {
        AgendaStatus::Draft
    }
}

/// Fields that must be filled before an item may be published.
pub const PUBLISH_REQUIRED_FIELDS: &[&str] = &[
    "title",
    "city",
    "slug",
    "start_at_utc",
    "end_at_utc",
    "organizer_id",
    "venue_id",
];

/// Fields that must be filled before an item may be scheduled.
pub const SCHEDULE_REQUIRED_FIELDS: &[&str] =
    &["title", "city", "slug", "start_at_utc", "end_at_utc"];

impl AgendaStatus {
    /// The completeness requirements for entering this status.
    pub fn required_fields(self) -> &'static [&'static str] {
        match self {
            AgendaStatus::Published => PUBLISH_REQUIRED_FIELDS,
            AgendaStatus::Scheduled => SCHEDULE_REQUIRED_FIELDS,
            AgendaStatus::Draft | AgendaStatus::Archived => &[],
        }
    }

    /// Whether an edit may move an item from `self` to `next`.
    ///
    /// Draft, published and scheduled move freely between each other.
    /// Archived is terminal and is never an edit target.
    pub fn can_transition_to(self, next: AgendaStatus) -> bool {
        !matches!(self, AgendaStatus::Archived) && !matches!(next, AgendaStatus::Archived)
    }
}

/// Longest title an agenda item may carry, in characters.
pub const TITLE_MAX_LEN: usize = 200;

/// Appended to the title of a duplicated item.
pub const DUPLICATE_TITLE_SUFFIX: &str = " (cópia)";

/// Title given to a duplicated item, cut so it stays within [`TITLE_MAX_LEN`].
pub fn duplicate_title(original: &str) -> String {
    let keep = TITLE_MAX_LEN - DUPLICATE_TITLE_SUFFIX.chars().count();
    let base: String = original.chars().take(keep).collect();
    format!("{}{DUPLICATE_TITLE_SUFFIX}", base.trim_end())
}

/// Granularity of agenda start/end times, in minutes.
pub const SLOT_MINUTES: u32 = 15;

/// Minimum gap between start and end of an agenda item or occurrence.
pub fn min_duration() -> Duration {
    Duration::minutes(i64::from(SLOT_MINUTES))
}

/// Whether `ts` sits exactly on a 15-minute boundary.
pub fn is_on_slot(ts: &Timestamp) -> bool {
    ts.minute() % SLOT_MINUTES == 0 && ts.second() == 0 && ts.nanosecond() == 0
}

/// Whether `end` is at least one slot after `start`.
pub fn spans_min_duration(start: &Timestamp, end: &Timestamp) -> bool {
    *end - *start >= min_duration()
}
