pub mod album;
pub mod artist;
pub mod error;
pub mod normalize;
pub mod playlist;
pub mod track;

pub use album::{Album, AlbumRef};
pub use artist::{Artist, Author};
pub use error::ValidationError;
pub use playlist::Playlist;
pub use track::Track;
