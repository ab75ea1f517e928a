pub mod db;
pub mod error;
pub mod kv;
pub mod memory;
pub mod repository;
pub(crate) mod schema;

use error::StorageError;

/// Byte-oriented store the playlist repository writes through.
///
/// `set` always replaces the whole value stored under `key`.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    fn set(&self, key: &str, value: &[u8]) -> Result<(), StorageError>;
}

pub use kv::SqliteStore;
pub use memory::MemoryStore;
pub use repository::{KvPlaylistRepository, PlaylistRepository};
