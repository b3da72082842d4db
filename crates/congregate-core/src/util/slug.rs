//! Slug generation utilities for event identifiers.
//!
//! ## Summary
//! Event ids are derived from human-readable input (a title or a parent id plus a
//! timestamp). Slugs are lowercase ASCII alphanumerics separated by single hyphens,
//! with no leading or trailing hyphen.

/// Longest id accepted by the `events.id` column.
pub const MAX_ID_LEN: usize = 255;

/// Generate a slug from arbitrary text.
///
/// Converts to lowercase, replaces every non-alphanumeric character with a hyphen,
/// collapses runs of hyphens, and trims edge hyphens.
///
/// Examples:
/// - "Sunday Service" -> "sunday-service"
/// - "Youth Night @ 7pm!" -> "youth-night-7pm"
/// - "evt-2024-01-07T10:00:00.000Z" -> "evt-2024-01-07t10-00-00-000z"
#[must_use]
pub fn generate_slug(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Generate a slug no longer than `max_len` bytes.
///
/// Truncation never leaves a trailing hyphen behind.
#[must_use]
pub fn generate_bounded_slug(name: &str, max_len: usize) -> String {
    let mut slug = generate_slug(name);
    if slug.len() > max_len {
        // Slugs are pure ASCII, so any byte offset is a char boundary.
        slug.truncate(max_len);
        let trimmed = slug.trim_end_matches('-').len();
        slug.truncate(trimmed);
    }
    slug
}
