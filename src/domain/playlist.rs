use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{
    artist::Author,
    error::ValidationError,
    normalize::{self, RawRecord},
    track::Track,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Vec<Author>>,
    #[serde(default)]
    pub tracks: Vec<Track>,
}

impl Playlist {
    const ENTITY: &'static str = "Playlist";

    /// Every playlist owns a fresh, empty track list.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            author: None,
            tracks: Vec::new(),
        }
    }

    /// Stand-in returned for ids that have never been stored.
    pub fn placeholder(id: &str) -> Self {
        Self::new(id, format!("Playlist {id}"))
    }

    pub fn with_tracks(mut self, tracks: Vec<Track>) -> Self {
        self.tracks = tracks;
        self
    }

    /// `playlistId` stands in for `id`, `title` for `name`.
    pub fn normalize(raw: &Value) -> Result<RawRecord, ValidationError> {
        let mut record = normalize::as_record(raw, Self::ENTITY)?;
        normalize::promote(&mut record, "playlistId", "id");
        normalize::promote(&mut record, "title", "name");
        Ok(record)
    }

    pub fn from_value(raw: &Value) -> Result<Self, ValidationError> {
        let record = Self::normalize(raw)?;

        let author = match record.get("author") {
            None | Some(Value::Null) => None,
            // a few upstream endpoints send the owner as a bare name
            Some(Value::String(name)) => Some(vec![Author::new(name.clone())]),
            Some(Value::Array(items)) => Some(
                items
                    .iter()
                    .map(Author::from_value)
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            Some(_) => {
                return Err(ValidationError::WrongType {
                    entity: Self::ENTITY,
                    field: "author",
                    expected: "a list of authors",
                });
            }
        };

        let tracks = normalize::optional_list(&record, Self::ENTITY, "tracks")?
            .map(|items| items.iter().map(Track::from_value).collect::<Result<Vec<_>, _>>())
            .unwrap_or_else(|| Ok(Vec::new()))?;

        Ok(Self {
            id: normalize::required_non_empty(&record, Self::ENTITY, "id")?,
            name: normalize::required_str(&record, Self::ENTITY, "name")?,
            description: normalize::optional_str(&record, Self::ENTITY, "description")?,
            author,
            tracks,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn default_track_lists_are_not_shared() {
        let mut a = Playlist::new("A", "One");
        let b = Playlist::new("B", "Two");

        a.tracks.push(Track::new("x", "X").with_artists(["Z"]));

        assert_eq!(a.tracks.len(), 1);
        assert_eq!(b.tracks.len(), 0);
    }

    #[test]
    fn deserialized_defaults_are_not_shared() -> anyhow::Result<()> {
        let mut a = Playlist::from_value(&json!({"id": "A", "name": "One"}))?;
        let b = Playlist::from_value(&json!({"id": "B", "name": "Two"}))?;

        a.tracks.push(Track::new("x", "X"));
        assert!(b.tracks.is_empty());
        Ok(())
    }

    #[test]
    fn summary_payload_builds_a_playlist() -> anyhow::Result<()> {
        let playlist = Playlist::from_value(&json!({
            "playlistId": "PL1",
            "title": "Road trip",
            "count": "25",
            "author": [{"name": "Me", "id": "UC9"}],
            "thumbnails": []
        }))?;

        assert_eq!(playlist.id, "PL1");
        assert_eq!(playlist.name, "Road trip");
        assert_eq!(
            playlist.author,
            Some(vec![Author {
                name: "Me".into(),
                id: Some("UC9".into())
            }])
        );
        assert!(playlist.tracks.is_empty());
        Ok(())
    }

    #[test]
    fn bare_author_name_is_accepted() -> anyhow::Result<()> {
        let playlist =
            Playlist::from_value(&json!({"id": "p", "name": "n", "author": "YouTube Music"}))?;
        assert_eq!(playlist.author, Some(vec![Author::new("YouTube Music")]));
        Ok(())
    }

    #[test]
    fn missing_name_is_rejected() {
        assert_eq!(
            Playlist::from_value(&json!({"playlistId": "p"})),
            Err(ValidationError::MissingField {
                entity: "Playlist",
                field: "name"
            })
        );
    }

    #[test]
    fn invalid_nested_track_fails_construction() {
        let err = Playlist::from_value(&json!({
            "id": "p",
            "name": "n",
            "tracks": [{"title": "no id"}]
        }))
        .unwrap_err();
        assert!(matches!(err, ValidationError::MissingField { entity: "Track", field: "id" }));
    }

    #[test]
    fn placeholder_name_is_derived_from_id() {
        let p = Playlist::placeholder("missing-id");
        assert_eq!(p.id, "missing-id");
        assert_eq!(p.name, "Playlist missing-id");
        assert!(p.tracks.is_empty());
    }
}
