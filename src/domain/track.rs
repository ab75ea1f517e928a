use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{
    album::{Album, AlbumRef},
    artist::Artist,
    error::ValidationError,
    normalize::{self, RawRecord},
};

/// Represent a music track of a playlist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub artists: Vec<Artist>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album: Option<AlbumRef>,
    /// Length in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub like_status: Option<String>,
    #[serde(default)]
    pub in_library: bool,
}

/// Source spellings of the in-library flag.
pub const IN_LIBRARY_FIELDS: &[&str] = &["inLibrary", "in_library"];

impl Track {
    const ENTITY: &'static str = "Track";

    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            artists: Vec::new(),
            album: None,
            duration: None,
            like_status: None,
            in_library: false,
        }
    }

    pub fn with_artists<I, A>(mut self, artists: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        self.artists = artists.into_iter().map(Artist::new).collect();
        self
    }

    pub fn with_album(mut self, album: impl Into<AlbumRef>) -> Self {
        self.album = Some(album.into());
        self
    }

    /// `videoId` wins over a generic `id`; `likeStatus` stands in for
    /// `like_status`; every in-library spelling collapses into one boolean.
    pub fn normalize(raw: &Value) -> Result<RawRecord, ValidationError> {
        let mut record = normalize::as_record(raw, Self::ENTITY)?;
        normalize::prefer(&mut record, "videoId", "id");
        normalize::promote(&mut record, "likeStatus", "like_status");

        let in_library = IN_LIBRARY_FIELDS
            .iter()
            .any(|field| normalize::is_truthy(record.get(*field)));
        record.insert("in_library".to_string(), Value::Bool(in_library));
        Ok(record)
    }

    pub fn from_value(raw: &Value) -> Result<Self, ValidationError> {
        let record = Self::normalize(raw)?;

        let artists = normalize::optional_list(&record, Self::ENTITY, "artists")?
            .map(|items| items.iter().map(Artist::from_value).collect::<Result<Vec<_>, _>>())
            .unwrap_or_else(|| Ok(Vec::new()))?;

        let album = match record.get("album") {
            None | Some(Value::Null) => None,
            Some(Value::String(name)) => Some(AlbumRef::Named(name.clone())),
            Some(value @ Value::Object(_)) => Some(AlbumRef::Album(Album::from_value(value)?)),
            Some(_) => {
                return Err(ValidationError::WrongType {
                    entity: Self::ENTITY,
                    field: "album",
                    expected: "a mapping or a string",
                });
            }
        };

        Ok(Self {
            id: normalize::required_non_empty(&record, Self::ENTITY, "id")?,
            title: normalize::required_str(&record, Self::ENTITY, "title")?,
            artists,
            album,
            duration: normalize::duration_seconds(&record),
            like_status: normalize::optional_str(&record, Self::ENTITY, "like_status")?,
            in_library: normalize::is_truthy(record.get("in_library")),
        })
    }
}
