use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{
    error::ValidationError,
    normalize::{self, RawRecord},
};

/// A performer credited on a track or album.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artist {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl Artist {
    const ENTITY: &'static str = "Artist";

    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// `artist` stands in for `name`, `browseId` for `id`.
    pub fn normalize(raw: &Value) -> Result<RawRecord, ValidationError> {
        let mut record = normalize::as_record(raw, Self::ENTITY)?;
        normalize::promote(&mut record, "artist", "name");
        normalize::promote(&mut record, "browseId", "id");
        Ok(record)
    }

    pub fn from_value(raw: &Value) -> Result<Self, ValidationError> {
        let record = Self::normalize(raw)?;
        Ok(Self {
            name: normalize::required_non_empty(&record, Self::ENTITY, "name")?,
            id: normalize::optional_str(&record, Self::ENTITY, "id")?,
        })
    }
}

/// Listed owner of a playlist. Unlike [`Artist`] there are no field synonyms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl Author {
    const ENTITY: &'static str = "Author";

    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: None,
        }
    }

    pub fn from_value(raw: &Value) -> Result<Self, ValidationError> {
        let record = normalize::as_record(raw, Self::ENTITY)?;
        Ok(Self {
            name: normalize::required_str(&record, Self::ENTITY, "name")?,
            id: normalize::optional_str(&record, Self::ENTITY, "id")?,
        })
    }
}
