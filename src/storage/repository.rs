use crate::{
    domain::Playlist,
    rules::{self, Rule, RuleError},
    storage::{KeyValueStore, error::StorageError},
};

pub const KEY_PREFIX: &str = "playlist:";

/// Store key for a playlist id. The same id always maps to the same key.
pub fn playlist_key(playlist_id: &str) -> String {
    format!("{KEY_PREFIX}{playlist_id}")
}

pub trait PlaylistRepository {
    /// Stored playlist, or a fresh placeholder when nothing is stored under `playlist_id`.
    fn get(&self, playlist_id: &str) -> Result<Playlist, StorageError>;

    /// Replaces the whole stored record for `playlist.id`.
    fn save(&self, playlist: &Playlist) -> Result<(), StorageError>;

    fn load_rule(&self, name: &str) -> Result<Box<dyn Rule>, RuleError> {
        rules::resolve(name)
    }
}

/// Playlists serialized as JSON, one record per playlist id.
pub struct KvPlaylistRepository<S> {
    store: S,
}

impl<S: KeyValueStore> KvPlaylistRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S: KeyValueStore> PlaylistRepository for KvPlaylistRepository<S> {
    fn get(&self, playlist_id: &str) -> Result<Playlist, StorageError> {
        let Some(raw) = self.store.get(&playlist_key(playlist_id))? else {
            log::debug!("no stored record for playlist {playlist_id}, using placeholder");
            return Ok(Playlist::placeholder(playlist_id));
        };

        serde_json::from_slice(&raw).map_err(|source| StorageError::CorruptRecord {
            id: playlist_id.to_string(),
            source,
        })
    }

    fn save(&self, playlist: &Playlist) -> Result<(), StorageError> {
        let raw = serde_json::to_vec(playlist).map_err(|source| StorageError::Serialize {
            id: playlist.id.clone(),
            source,
        })?;
        self.store.set(&playlist_key(&playlist.id), &raw)?;
        log::info!(
            "saved playlist {} ({} tracks)",
            playlist.id,
            playlist.tracks.len()
        );
        Ok(())
    }
}
