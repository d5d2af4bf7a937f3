//! Last.fm response shapes

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::types::{LastFmArtist, LastFmTag};

/// Last.fm encodes most counters as strings; accept both.
fn lenient_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

#[derive(Debug, Deserialize)]
pub(crate) struct ArtistInfoResponse {
    pub artist: Option<RawArtist>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawArtist {
    pub name: String,
    #[serde(default)]
    pub mbid: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub stats: Option<RawArtistStats>,
    #[serde(default)]
    pub bio: Option<RawArtistBio>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawArtistStats {
    #[serde(default, deserialize_with = "lenient_u64")]
    pub listeners: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub playcount: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawArtistBio {
    #[serde(default)]
    pub summary: Option<String>,
}

impl From<RawArtist> for LastFmArtist {
    fn from(raw: RawArtist) -> Self {
        let (listeners, playcount) = raw
            .stats
            .map_or((None, None), |s| (s.listeners, s.playcount));

        Self {
            name: raw.name,
            mbid: raw.mbid.filter(|s| !s.is_empty()),
            url: raw.url.filter(|s| !s.is_empty()),
            summary: raw
                .bio
                .and_then(|b| b.summary)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            listeners,
            playcount,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct TopTagsResponse {
    pub toptags: Option<TopTagsWrapper>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TopTagsWrapper {
    #[serde(default)]
    pub tag: Vec<RawTag>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawTag {
    pub name: String,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub count: Option<u64>,
    #[serde(default)]
    pub url: Option<String>,
}

impl From<RawTag> for LastFmTag {
    fn from(raw: RawTag) -> Self {
        Self {
            name: raw.name,
            count: raw.count,
            url: raw.url.filter(|s| !s.is_empty()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RecentTracksResponse {
    pub recenttracks: Option<RecentTracksWrapper>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RecentTracksWrapper {
    #[serde(default)]
    pub track: Vec<RawRecentTrack>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawRecentTrack {
    /// Missing for the track that is currently playing
    #[serde(default)]
    pub date: Option<RawScrobbleDate>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawScrobbleDate {
    #[serde(default, deserialize_with = "lenient_u64")]
    pub uts: Option<u64>,
}

/// Last.fm API error document
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorResponse {
    pub error: i32,
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artist_counters_accept_strings_and_numbers() {
        let response: ArtistInfoResponse = serde_json::from_str(
            r#"{"artist": {
                "name": "Radiohead",
                "mbid": "",
                "url": "https://www.last.fm/music/Radiohead",
                "stats": {"listeners": "5000000", "playcount": 700000000},
                "bio": {"summary": "  An English rock band.  ", "content": "..."}
            }}"#,
        )
        .unwrap();

        let artist: LastFmArtist = response.artist.unwrap().into();
        assert_eq!(artist.listeners, Some(5_000_000));
        assert_eq!(artist.playcount, Some(700_000_000));
        assert_eq!(artist.mbid, None);
        assert_eq!(artist.summary.as_deref(), Some("An English rock band."));
    }

    #[test]
    fn test_now_playing_track_has_no_date() {
        let response: RecentTracksResponse = serde_json::from_str(
            r##"{"recenttracks": {"track": [
                {"name": "Live", "@attr": {"nowplaying": "true"}},
                {"name": "Past", "date": {"uts": "1700000000", "#text": "14 Nov 2023"}}
            ]}}"##,
        )
        .unwrap();

        let tracks = response.recenttracks.unwrap().track;
        assert!(tracks[0].date.is_none());
        assert_eq!(tracks[1].date.as_ref().unwrap().uts, Some(1_700_000_000));
    }
}
