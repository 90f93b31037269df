//! Slug derivation and validation.
//!
//! Shared by every write path so that a slug generated for a form preview is
//! byte-identical to the one the server derives when the field is left blank.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Shortest accepted slug.
pub const SLUG_MIN_LEN: usize = 3;
/// Longest accepted (and generated) slug.
pub const SLUG_MAX_LEN: usize = 100;

/// Why a slug was rejected by [`validate_slug`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SlugError {
    #[error("slug is empty")]
    Empty,
    #[error("slug is shorter than 3 characters")]
    TooShort,
    #[error("slug is longer than 100 characters")]
    TooLong,
    #[error("slug may only contain lowercase letters, digits and single hyphens")]
    InvalidFormat,
}

impl SlugError {
    /// Violation code used by the message catalog.
    pub fn code(self) -> &'static str {
        match self {
            SlugError::Empty => "required",
            SlugError::TooShort | SlugError::TooLong => "length",
            SlugError::InvalidFormat => "slug_format",
        }
    }
}

/// Generate a URL-safe slug from a title.
///
/// Strips diacritics, lowercases, turns every run of non-alphanumeric
/// characters into a single hyphen, trims hyphens from both ends and caps the
/// result at [`SLUG_MAX_LEN`]. Applying it to its own output is a no-op.
pub fn generate_slug(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;

    for c in text.nfd().filter(|c| !is_combining_mark(*c)) {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    if slug.len() > SLUG_MAX_LEN {
        slug.truncate(SLUG_MAX_LEN);
        let trimmed = slug.trim_end_matches('-').len();
        slug.truncate(trimmed);
    }
    slug
}

/// Validate slug format and length.
pub fn validate_slug(slug: &str) -> Result<(), SlugError> {
    if slug.is_empty() {
        return Err(SlugError::Empty);
    }
    if slug.len() < SLUG_MIN_LEN {
        return Err(SlugError::TooShort);
    }
    if slug.len() > SLUG_MAX_LEN {
        return Err(SlugError::TooLong);
    }
    let well_formed = slug.split('-').all(|part| {
        !part.is_empty()
            && part
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
    });
    if !well_formed {
        return Err(SlugError::InvalidFormat);
    }
    Ok(())
}

/// Slug given to a duplicated item: `{slug}-copia-{millis}`.
///
/// The original is shortened (at a hyphen boundary when the cut leaves one
/// dangling) so the result never exceeds [`SLUG_MAX_LEN`].
pub fn duplicate_slug(original: &str, unix_millis: i64) -> String {
    let suffix = format!("-copia-{unix_millis}");
    let mut keep = SLUG_MAX_LEN.saturating_sub(suffix.len()).min(original.len());
    while !original.is_char_boundary(keep) {
        keep -= 1;
    }
    let base = original[..keep].trim_end_matches('-');
    format!("{base}{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_from_title_with_punctuation() {
        assert_eq!(
            generate_slug("Festa de Ano Novo!! 2025"),
            "festa-de-ano-novo-2025"
        );
    }

    #[test]
    fn slug_strips_diacritics() {
        assert_eq!(generate_slug("Rolê na Praça São João"), "role-na-praca-sao-joao");
        assert_eq!(generate_slug("Ação & Reação"), "acao-reacao");
    }

    #[test]
    fn slug_is_idempotent() {
        let once = generate_slug("  Noite   do Forró — Edição #3  ");
        assert_eq!(once, "noite-do-forro-edicao-3");
        assert_eq!(generate_slug(&once), once);
    }

    #[test]
    fn slug_of_only_symbols_is_empty() {
        assert_eq!(generate_slug("!!! ???"), "");
    }

    #[test]
    fn slug_is_capped_without_trailing_hyphen() {
        let title = format!("{} fim", "a".repeat(SLUG_MAX_LEN - 1));
        let slug = generate_slug(&title);
        assert!(slug.len() <= SLUG_MAX_LEN);
        assert!(!slug.ends_with('-'));
    }

    #[test]
    fn validate_accepts_generated_slugs() {
        assert_eq!(validate_slug("festa-de-ano-novo-2025"), Ok(()));
    }

    #[test]
    fn validate_rejects_bad_shapes() {
        assert_eq!(validate_slug(""), Err(SlugError::Empty));
        assert_eq!(validate_slug("ab"), Err(SlugError::TooShort));
        assert_eq!(validate_slug(&"a".repeat(101)), Err(SlugError::TooLong));
        assert_eq!(validate_slug("Festa"), Err(SlugError::InvalidFormat));
        assert_eq!(validate_slug("festa--nova"), Err(SlugError::InvalidFormat));
        assert_eq!(validate_slug("-festa"), Err(SlugError::InvalidFormat));
        assert_eq!(validate_slug("festa_nova"), Err(SlugError::InvalidFormat));
    }

    #[test]
    fn duplicate_slug_format() {
        assert_eq!(
            duplicate_slug("show-de-sexta", 1_767_225_600_000),
            "show-de-sexta-copia-1767225600000"
        );
    }

    #[test]
    fn duplicate_slug_of_a_long_slug_stays_valid() {
        let original = format!("{}-b", "a".repeat(79));
        assert_eq!(original.len(), 81);

        let copy = duplicate_slug(&original, 1_767_225_600_000);

        assert!(copy.len() <= SLUG_MAX_LEN, "{} chars", copy.len());
        assert!(copy.ends_with("-copia-1767225600000"));
        assert_eq!(copy, format!("{}-copia-1767225600000", "a".repeat(79)));
        assert_eq!(validate_slug(&copy), Ok(()));
    }
}
