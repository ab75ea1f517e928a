//! Access to the remote music catalog.
//!
//! [`CatalogAdapter`] is the only entry point the rest of the crate uses. It
//! opens an upstream session lazily on first use, keeps it for its own
//! lifetime, and maps every raw payload through [`mapping`].

use std::sync::{Arc, Mutex};

use serde_json::Value;

use crate::domain::Track;

pub mod error;
pub mod http;
pub mod mapping;
pub mod sample;

pub use error::{CatalogError, Result};
pub use mapping::{PlaylistSummary, is_system_authored};

/// Upper bound for library listings.
pub const MAX_LIBRARY_LIMIT: u32 = 500;

/// Raw upstream calls. Payloads are returned untouched.
pub trait CatalogService {
    fn list_library_playlists(&self, limit: u32) -> Result<Vec<Value>>;

    /// Raw playlist record; its `tracks` field holds the track payloads.
    fn get_playlist(&self, playlist_id: &str, limit: Option<u32>) -> Result<Value>;
}

/// Opens an authenticated upstream session.
pub trait SessionFactory {
    type Session: CatalogService;

    fn connect(&self) -> Result<Self::Session>;
}

pub struct CatalogAdapter<F: SessionFactory> {
    factory: F,
    session: Mutex<Option<Arc<F::Session>>>,
}

impl<F: SessionFactory> CatalogAdapter<F> {
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            session: Mutex::new(None),
        }
    }

    /// Returns the session, connecting at most once per adapter. The lock is
    /// held while connecting so concurrent first calls share one session.
    fn session(&self) -> Result<Arc<F::Session>> {
        let mut slot = self
            .session
            .lock()
            .map_err(|e| CatalogError::Session(format!("session lock poisoned: {e}")))?;

        if let Some(session) = slot.as_ref() {
            return Ok(Arc::clone(session));
        }

        log::info!("opening catalog session");
        let session = Arc::new(self.factory.connect()?);
        *slot = Some(Arc::clone(&session));
        Ok(session)
    }

    pub fn list_library_playlists(&self, limit: u32) -> Result<Vec<PlaylistSummary>> {
        if limit == 0 || limit > MAX_LIBRARY_LIMIT {
            return Err(CatalogError::InvalidLimit {
                got: limit,
                max: MAX_LIBRARY_LIMIT,
            });
        }

        let raw = self.session()?.list_library_playlists(limit)?;
        log::debug!("catalog returned {} library playlists", raw.len());

        raw.iter()
            .take(limit as usize)
            .map(mapping::to_summary)
            .collect()
    }

    /// Tracks of a playlist. Tracks without any usable id are dropped.
    pub fn get_playlist_tracks(&self, playlist_id: &str, limit: Option<u32>) -> Result<Vec<Track>> {
        if limit == Some(0) {
            return Err(CatalogError::NonPositiveLimit);
        }

        let raw = self.session()?.get_playlist(playlist_id, limit)?;
        let entries: &[Value] = match raw.get("tracks") {
            Some(Value::Array(entries)) => entries.as_slice(),
            Some(Value::Null) | None => &[],
            Some(_) => {
                return Err(CatalogError::Malformed(format!(
                    "tracks of playlist {playlist_id} are not a list"
                )));
            }
        };

        let mut tracks = Vec::with_capacity(entries.len());
        for entry in entries {
            let track = mapping::to_track(entry)?;
            if track.id.is_empty() {
                log::warn!(
                    "skipping track {:?} of playlist {playlist_id}: no id",
                    track.title
                );
                continue;
            }
            tracks.push(track);
        }

        if let Some(limit) = limit {
            tracks.truncate(limit as usize);
        }
        Ok(tracks)
    }
}
