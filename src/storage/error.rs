use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("stored record for playlist {id} could not be decoded: {source}")]
    CorruptRecord {
        id: String,
        source: serde_json::Error,
    },

    #[error("playlist {id} could not be encoded: {source}")]
    Serialize {
        id: String,
        source: serde_json::Error,
    },

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}
