//! Turns raw catalog payloads into domain values.
//!
//! The upstream schema is not under our control: fields come and go between
//! releases and nested records are sometimes flattened to plain strings. Every
//! function here accepts any mapping and only fails when the payload is not a
//! mapping at all.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    catalog::error::{CatalogError, Result},
    domain::{
        AlbumRef, Artist, Author, Track,
        normalize::{self, is_truthy},
        track::IN_LIBRARY_FIELDS,
    },
};

/// Compact view of a library playlist. Missing upstream fields stay absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistSummary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub playlist_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnails: Option<Vec<Thumbnail>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Vec<Author>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thumbnail {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

fn as_mapping<'a>(raw: &'a Value, what: &'static str) -> Result<&'a Map<String, Value>> {
    raw.as_object().ok_or(CatalogError::NotAMapping { what })
}

/// Non-empty string value of `field`.
fn text<'a>(record: &'a Map<String, Value>, field: &str) -> Option<&'a str> {
    record
        .get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

fn first_text(record: &Map<String, Value>, fields: &[&str]) -> Option<String> {
    fields
        .iter()
        .find_map(|field| text(record, field))
        .map(str::to_string)
}

fn artist_from_entry(entry: &Value) -> Option<Artist> {
    match entry {
        Value::Object(record) => {
            let name = text(record, "name")?;
            Some(Artist {
                name: name.to_string(),
                id: first_text(record, &["id", "browseId"]),
            })
        }
        Value::String(name) if !name.is_empty() => Some(Artist::new(name.as_str())),
        _ => None,
    }
}

fn album_name(value: Option<&Value>) -> Option<AlbumRef> {
    match value? {
        Value::Object(record) => text(record, "name").map(AlbumRef::from),
        Value::String(name) if !name.is_empty() => Some(AlbumRef::from(name.as_str())),
        _ => None,
    }
}

/// Maps one upstream track payload.
///
/// The id falls back from `videoId` to `id` and finally to an empty string;
/// callers that cannot use an empty id must drop such tracks themselves.
pub fn to_track(raw: &Value) -> Result<Track> {
    let record = as_mapping(raw, "track")?;

    let artists = match record.get("artists") {
        Some(Value::Array(entries)) => entries.iter().filter_map(artist_from_entry).collect(),
        _ => Vec::new(),
    };

    Ok(Track {
        id: first_text(record, &["videoId", "id"]).unwrap_or_default(),
        title: text(record, "title").unwrap_or_default().to_string(),
        artists,
        album: album_name(record.get("album")),
        duration: normalize::duration_seconds(record),
        like_status: first_text(record, &["likeStatus", "like_status"]),
        in_library: IN_LIBRARY_FIELDS
            .iter()
            .any(|field| is_truthy(record.get(*field))),
    })
}

fn count(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn thumbnails(value: Option<&Value>) -> Option<Vec<Thumbnail>> {
    let entries = value?.as_array()?;
    let as_u32 = |v: Option<&Value>| v.and_then(Value::as_u64).and_then(|n| u32::try_from(n).ok());

    Some(
        entries
            .iter()
            .filter_map(Value::as_object)
            .filter_map(|thumb| {
                Some(Thumbnail {
                    url: text(thumb, "url")?.to_string(),
                    width: as_u32(thumb.get("width")),
                    height: as_u32(thumb.get("height")),
                })
            })
            .collect(),
    )
}

fn authors(value: Option<&Value>) -> Option<Vec<Author>> {
    match value? {
        Value::String(name) => Some(vec![Author::new(name.as_str())]),
        Value::Array(entries) => Some(
            entries
                .iter()
                .filter_map(Value::as_object)
                .filter_map(|author| {
                    Some(Author {
                        name: text(author, "name")?.to_string(),
                        id: first_text(author, &["id"]),
                    })
                })
                .collect(),
        ),
        _ => None,
    }
}

/// Maps one upstream library playlist entry.
pub fn to_summary(raw: &Value) -> Result<PlaylistSummary> {
    let record = as_mapping(raw, "playlist summary")?;

    Ok(PlaylistSummary {
        playlist_id: first_text(record, &["playlistId"]),
        title: first_text(record, &["title"]),
        count: count(record.get("count")),
        thumbnails: thumbnails(record.get("thumbnails")),
        author: authors(record.get("author")),
    })
}

/// True when any listed author of the playlist is one of `excluded`.
pub fn is_system_authored(summary: &PlaylistSummary, excluded: &[String]) -> bool {
    summary
        .author
        .iter()
        .flatten()
        .any(|author| excluded.iter().any(|name| *name == author.name))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn names(track: &Track) -> Vec<&str> {
        track.artists.iter().map(|a| a.name.as_str()).collect()
    }

    #[test]
    fn maps_common_shape() -> anyhow::Result<()> {
        let track = to_track(&json!({
            "videoId": "abc123",
            "title": "Test Song",
            "artists": [{"name": "Artist One"}, {"name": "Artist Two", "id": "UC2"}],
            "album": {"name": "Album X", "id": "MPRE1"},
            "inLibrary": true
        }))?;

        assert_eq!(track.id, "abc123");
        assert_eq!(track.title, "Test Song");
        assert_eq!(names(&track), ["Artist One", "Artist Two"]);
        assert_eq!(track.artists[1].id.as_deref(), Some("UC2"));
        assert_eq!(track.album, Some(AlbumRef::Named("Album X".into())));
        assert!(track.in_library);
        Ok(())
    }

    #[test]
    fn artists_as_strings_and_no_album() -> anyhow::Result<()> {
        let track = to_track(&json!({
            "videoId": "zzz999",
            "title": "Loose Data",
            "artists": ["Solo Artist", "Second"]
        }))?;

        assert_eq!(names(&track), ["Solo Artist", "Second"]);
        assert!(track.artists.iter().all(|a| a.id.is_none()));
        assert_eq!(track.album, None);
        assert!(!track.in_library);
        Ok(())
    }

    #[test]
    fn album_as_string() -> anyhow::Result<()> {
        let track = to_track(&json!({"videoId": "v", "title": "t", "album": "Loose Album"}))?;
        assert_eq!(track.album, Some(AlbumRef::Named("Loose Album".into())));
        Ok(())
    }

    #[test]
    fn unusable_entries_are_skipped_in_order() -> anyhow::Result<()> {
        let track = to_track(&json!({
            "videoId": "v",
            "title": "t",
            "artists": [{"id": "no-name"}, "", 7, null, "B", {"name": "C"}],
            "album": 12
        }))?;

        assert_eq!(names(&track), ["B", "C"]);
        assert_eq!(track.album, None);
        Ok(())
    }

    #[test]
    fn in_library_alias() -> anyhow::Result<()> {
        let track = to_track(&json!({"videoId": "id42", "title": "Alias", "artists": [], "in_library": true}))?;
        assert!(track.in_library);
        Ok(())
    }

    #[test]
    fn id_fallbacks() -> anyhow::Result<()> {
        assert_eq!(to_track(&json!({"id": "generic"}))?.id, "generic");
        assert_eq!(to_track(&json!({"videoId": null, "id": "generic"}))?.id, "generic");

        let empty = to_track(&json!({}))?;
        assert_eq!(empty.id, "");
        assert_eq!(empty.title, "");
        assert!(empty.artists.is_empty());
        Ok(())
    }

    #[test]
    fn duration_and_like_status() -> anyhow::Result<()> {
        let track = to_track(&json!({"videoId": "v", "duration": "3:05", "likeStatus": "LIKE"}))?;
        assert_eq!(track.duration, Some(185));
        assert_eq!(track.like_status.as_deref(), Some("LIKE"));
        Ok(())
    }

    #[test]
    fn non_mapping_track_is_an_error() {
        assert!(matches!(
            to_track(&json!(["videoId", "v"])),
            Err(CatalogError::NotAMapping { what: "track" })
        ));
        assert!(matches!(
            to_summary(&json!("PL1")),
            Err(CatalogError::NotAMapping { what: "playlist summary" })
        ));
    }

    #[test]
    fn oversized_duration_is_absent() -> anyhow::Result<()> {
        for duration in ["99999999:00", "2000000:00:00"] {
            let track = to_track(&json!({"videoId": "v", "title": "t", "duration": duration}))?;
            assert_eq!(track.id, "v");
            assert_eq!(track.duration, None);
        }
        Ok(())
    }

    #[test]
    fn summary_passes_missing_fields_as_absent() -> anyhow::Result<()> {
        let summary = to_summary(&json!({"playlistId": "PL1"}))?;

        assert_eq!(summary.playlist_id.as_deref(), Some("PL1"));
        assert_eq!(summary.title, None);
        assert_eq!(summary.count, None);
        assert_eq!(summary.thumbnails, None);
        assert_eq!(serde_json::to_value(&summary)?, json!({"playlistId": "PL1"}));
        Ok(())
    }

    #[test]
    fn summary_full_shape() -> anyhow::Result<()> {
        let summary = to_summary(&json!({
            "playlistId": "PL2",
            "title": "Gym",
            "count": 25,
            "thumbnails": [
                {"url": "https://i.example/1.jpg", "width": 60, "height": 60},
                {"width": 10}
            ],
            "author": [{"name": "YouTube Music", "id": null}]
        }))?;

        assert_eq!(summary.count.as_deref(), Some("25"));
        assert_eq!(
            summary.thumbnails,
            Some(vec![Thumbnail {
                url: "https://i.example/1.jpg".into(),
                width: Some(60),
                height: Some(60)
            }])
        );
        assert_eq!(summary.author, Some(vec![Author::new("YouTube Music")]));
        Ok(())
    }

    #[test]
    fn system_authored_detection() -> anyhow::Result<()> {
        let excluded = vec!["YouTube Music".to_string()];

        let system = to_summary(&json!({"playlistId": "LM", "author": [{"name": "YouTube Music"}]}))?;
        let bare = to_summary(&json!({"playlistId": "LM", "author": "YouTube Music"}))?;
        let mine = to_summary(&json!({"playlistId": "PL", "author": [{"name": "Me"}]}))?;
        let nobody = to_summary(&json!({"playlistId": "PL"}))?;

        assert!(is_system_authored(&system, &excluded));
        assert!(is_system_authored(&bare, &excluded));
        assert!(!is_system_authored(&mine, &excluded));
        assert!(!is_system_authored(&nobody, &excluded));
        Ok(())
    }
}
