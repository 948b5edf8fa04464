// SPDX-License-Identifier: Apache-2.0

use gigboard_model::{Region, TagId, Weekday};
use gigboard_query::{ArtistFilter, GigFilter};
use std::collections::BTreeMap;

/// Gig search criteria from query parameters: `q`, `tags` (comma-separated
/// ids), `region`.
///
/// Malformed or absent criteria degrade to "no filter applied" rather than
/// failing the request: unparseable tag entries are dropped, an unknown
/// region is ignored, whitespace-only text is ignored.
#[must_use]
pub fn parse_gig_search(query: &BTreeMap<String, String>) -> GigFilter {
    GigFilter {
        text: parse_text(query.get("q")),
        tags: parse_tags(query.get("tags")),
        region: query.get("region").and_then(|raw| Region::parse(raw.trim())),
    }
}

/// Artist search criteria from query parameters: `q`, `tags`, `day`
/// (weekday name or Monday-first index). Same degrade rules as gig search.
#[must_use]
pub fn parse_artist_search(query: &BTreeMap<String, String>) -> ArtistFilter {
    ArtistFilter {
        text: parse_text(query.get("q")),
        tags: parse_tags(query.get("tags")),
        day: query.get("day").and_then(|raw| parse_weekday(raw)),
    }
}

fn parse_text(raw: Option<&String>) -> Option<String> {
    let text = raw?.trim();
    if text.is_empty() {
        return None;
    }
    Some(text.to_owned())
}

fn parse_tags(raw: Option<&String>) -> Vec<TagId> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    let mut tags = Vec::new();
    for entry in raw.split(',') {
        let Ok(id) = entry.trim().parse::<i64>() else {
            continue;
        };
        let tag = TagId::new(id);
        if !tags.contains(&tag) {
            tags.push(tag);
        }
    }
    tags
}

/// Accepts `monday`..`sunday` (any case) or a Monday-first index `0`..`6`.
#[must_use]
pub fn parse_weekday(raw: &str) -> Option<Weekday> {
    let raw = raw.trim();
    if let Ok(index) = raw.parse::<usize>() {
        return Weekday::from_index(index);
    }
    match raw.to_ascii_lowercase().as_str() {
        "monday" => Some(Weekday::Monday),
        "tuesday" => Some(Weekday::Tuesday),
        "wednesday" => Some(Weekday::Wednesday),
        "thursday" => Some(Weekday::Thursday),
        "friday" => Some(Weekday::Friday),
        "saturday" => Some(Weekday::Saturday),
        "sunday" => Some(Weekday::Sunday),
        _ => None,
    }
}
