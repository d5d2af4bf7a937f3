use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::{FixedOffset, TimeZone, Utc};
use spotinsights::types::{PlayCountPerDay, TimeRange, TrackArtist};
use spotinsights::utils::*;

// Helper function to create a track artist
fn artist(name: &str) -> TrackArtist {
    TrackArtist {
        id: format!("{}_id", name.to_lowercase()),
        name: name.to_string(),
        spotify_url: String::new(),
    }
}

// Unix seconds for a UTC wall-clock time
fn uts(y: i32, m: u32, d: u32, h: u32, min: u32) -> i64 {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap().timestamp()
}

#[test]
fn test_generate_state() {
    let state = generate_state();

    assert_eq!(state.len(), 32);
    assert!(state.chars().all(|c| c.is_ascii_alphanumeric()));

    // Two generated values should differ
    assert_ne!(state, generate_state());
}

#[test]
fn test_basic_auth_header() {
    let header = basic_auth_header("client", "secret");
    assert!(header.starts_with("Basic "));

    let decoded = STANDARD.decode(header.trim_start_matches("Basic ")).unwrap();
    assert_eq!(String::from_utf8(decoded).unwrap(), "client:secret");
}

#[test]
fn test_parse_time_range() {
    assert_eq!(parse_time_range("short").unwrap(), TimeRange::ShortTerm);
    assert_eq!(parse_time_range("medium_term").unwrap(), TimeRange::MediumTerm);
    assert_eq!(parse_time_range("Long").unwrap(), TimeRange::LongTerm);

    let err = parse_time_range("decade").unwrap_err();
    assert!(err.contains("decade"));
}

#[test]
fn test_format_duration() {
    assert_eq!(format_duration(0), "0:00");
    assert_eq!(format_duration(59_999), "0:59");
    assert_eq!(format_duration(201_000), "3:21");
    assert_eq!(format_duration(3_600_000), "60:00");
}

#[test]
fn test_join_artist_names() {
    assert_eq!(join_artist_names(&[]), "");
    assert_eq!(
        join_artist_names(&[artist("Daft Punk"), artist("Pharrell")]),
        "Daft Punk, Pharrell"
    );
}

#[test]
fn test_truncate() {
    assert_eq!(truncate("short", 10), "short");
    assert_eq!(truncate("exactly10!", 10), "exactly10!");
    assert_eq!(truncate("a much longer title", 10), "a much lo…");
    assert_eq!(truncate("björk björk", 6).chars().count(), 6);
}

#[test]
fn test_dedup_preserving_order() {
    let values = vec!["rock", "indie", "rock", "pop", "indie"]
        .into_iter()
        .map(String::from)
        .collect();
    assert_eq!(dedup_preserving_order(values), vec!["rock", "indie", "pop"]);
}

#[test]
fn test_group_plays_by_day_is_sorted_ascending() {
    let timestamps = vec![
        uts(2024, 3, 2, 10, 0),
        uts(2024, 3, 1, 9, 0),
        uts(2024, 3, 2, 23, 0),
        uts(2024, 2, 28, 12, 0),
    ];

    let grouped = group_plays_by_day(timestamps, &Utc);
    assert_eq!(
        grouped,
        vec![
            PlayCountPerDay {
                date: "2024-02-28".to_string(),
                count: 1
            },
            PlayCountPerDay {
                date: "2024-03-01".to_string(),
                count: 1
            },
            PlayCountPerDay {
                date: "2024-03-02".to_string(),
                count: 2
            },
        ]
    );
}

#[test]
fn test_group_plays_by_day_uses_the_given_timezone() {
    // 23:30 UTC is already the next day two hours east
    let timestamps = vec![uts(2024, 3, 1, 23, 30), uts(2024, 3, 2, 0, 30)];
    let east = FixedOffset::east_opt(2 * 3600).unwrap();

    let grouped = group_plays_by_day(timestamps, &east);
    assert_eq!(grouped.len(), 1);
    assert_eq!(grouped[0].date, "2024-03-02");
    assert_eq!(grouped[0].count, 2);
}

#[test]
fn test_group_plays_by_day_empty() {
    assert!(group_plays_by_day(Vec::new(), &Utc).is_empty());
}

#[test]
fn test_format_followers() {
    assert_eq!(format_followers(None), "-");
    assert_eq!(format_followers(Some(999)), "999");
    assert_eq!(format_followers(Some(45_300)), "45.3K");
    assert_eq!(format_followers(Some(1_200_000)), "1.2M");
}

#[test]
fn test_describe_expiry() {
    let now = 1_000_000;
    assert_eq!(describe_expiry(now - 1, now), "expired");
    assert_eq!(describe_expiry(now + 30_000, now), "expires in 30s");
    assert_eq!(describe_expiry(now + 3_600_000, now), "expires in 60m");
}
