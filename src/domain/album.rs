use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{
    artist::Artist,
    error::ValidationError,
    normalize::{self, RawRecord},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Album {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artists: Option<Vec<Artist>>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl Album {
    const ENTITY: &'static str = "Album";

    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: None,
            year: None,
            artists: None,
            kind: None,
        }
    }

    /// `title` stands in for `name`, `browseId` for `id`.
    pub fn normalize(raw: &Value) -> Result<RawRecord, ValidationError> {
        let mut record = normalize::as_record(raw, Self::ENTITY)?;
        normalize::promote(&mut record, "title", "name");
        normalize::promote(&mut record, "browseId", "id");
        Ok(record)
    }

    pub fn from_value(raw: &Value) -> Result<Self, ValidationError> {
        let record = Self::normalize(raw)?;

        let artists = normalize::optional_list(&record, Self::ENTITY, "artists")?
            .map(|items| items.iter().map(Artist::from_value).collect::<Result<Vec<_>, _>>())
            .transpose()?;

        // upstream sends the year as a string most of the time, a number sometimes
        let year = match record.get("year") {
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => normalize::optional_str(&record, Self::ENTITY, "year")?,
        };

        Ok(Self {
            name: normalize::required_non_empty(&record, Self::ENTITY, "name")?,
            id: normalize::optional_str(&record, Self::ENTITY, "id")?,
            year,
            artists,
            kind: normalize::optional_str(&record, Self::ENTITY, "type")?,
        })
    }
}

/// A track's album: either a structured record or just its display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AlbumRef {
    Album(Album),
    Named(String),
}

impl AlbumRef {
    pub fn name(&self) -> &str {
        match self {
            AlbumRef::Album(album) => &album.name,
            AlbumRef::Named(name) => name,
        }
    }
}

impl From<&str> for AlbumRef {
    fn from(name: &str) -> Self {
        AlbumRef::Named(name.to_string())
    }
}

impl From<Album> for AlbumRef {
    fn from(album: Album) -> Self {
        AlbumRef::Album(album)
    }
}
