use std::collections::{BTreeMap, HashSet};

use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::{DateTime, TimeZone, Utc};
use rand::{Rng, distr::Alphanumeric};

use crate::types::{PlayCountPerDay, TimeRange, TrackArtist};

/// Random value sent as the OAuth `state` parameter and checked on callback.
pub fn generate_state() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

/// `Authorization` header value for the client credentials.
pub fn basic_auth_header(client_id: &str, client_secret: &str) -> String {
    let credentials = format!("{}:{}", client_id, client_secret);
    format!("Basic {}", STANDARD.encode(credentials))
}

pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Value parser for `--time-range`.
pub fn parse_time_range(s: &str) -> Result<TimeRange, String> {
    s.parse::<TimeRange>()
        .map_err(|_| format!("invalid time range '{}', use short, medium or long", s))
}

/// Formats a track length as `m:ss`.
pub fn format_duration(duration_ms: u64) -> String {
    let total_secs = duration_ms / 1000;
    format!("{}:{:02}", total_secs / 60, total_secs % 60)
}

pub fn join_artist_names(artists: &[TrackArtist]) -> String {
    artists
        .iter()
        .map(|a| a.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Shortens `text` to at most `max` characters, marking the cut with `…`.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", kept)
}

/// Keeps the first occurrence of every value, preserving order.
pub fn dedup_preserving_order(values: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .into_iter()
        .filter(|v| seen.insert(v.clone()))
        .collect()
}

/// Groups scrobble timestamps (Unix seconds) by calendar day in `tz`,
/// ascending by date.
pub fn group_plays_by_day<Tz, I>(timestamps: I, tz: &Tz) -> Vec<PlayCountPerDay>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
    I: IntoIterator<Item = i64>,
{
    let mut grouped: BTreeMap<String, u32> = BTreeMap::new();
    for uts in timestamps {
        let Some(utc) = DateTime::<Utc>::from_timestamp(uts, 0) else {
            continue;
        };
        let day = utc.with_timezone(tz).format("%Y-%m-%d").to_string();
        *grouped.entry(day).or_insert(0) += 1;
    }

    grouped
        .into_iter()
        .map(|(date, count)| PlayCountPerDay { date, count })
        .collect()
}

/// Formats follower counts as `1.2M`, `45.3K` or the plain number.
pub fn format_followers(followers: Option<u64>) -> String {
    match followers {
        None => "-".to_string(),
        Some(n) if n >= 1_000_000 => format!("{:.1}M", n as f64 / 1_000_000.0),
        Some(n) if n >= 1_000 => format!("{:.1}K", n as f64 / 1_000.0),
        Some(n) => n.to_string(),
    }
}

/// Human readable distance between `now_ms` and a token expiry.
pub fn describe_expiry(expires_at_ms: i64, now_ms: i64) -> String {
    let diff_secs = (expires_at_ms - now_ms) / 1000;
    if diff_secs <= 0 {
        return "expired".to_string();
    }
    let minutes = diff_secs / 60;
    if minutes == 0 {
        format!("expires in {}s", diff_secs)
    } else {
        format!("expires in {}m", minutes)
    }
}
